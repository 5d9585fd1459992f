//! Grid storage: a fixed `width` x `height` board holding exactly one tile per cell.

use crate::error::GridParseError;
use crate::tile::{COLOR_GLYPHS, Pos, Tile};
use std::fmt;
use std::str::FromStr;

/// Playfield: cells stored row-major, `cells[row * width + col]`. Row 0 is the top.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<Tile>,
}

impl Grid {
    /// Grid with every cell set to `fill`.
    pub fn filled(width: usize, height: usize, fill: Tile) -> Self {
        Self {
            width,
            height,
            cells: vec![fill; width * height],
        }
    }

    /// Build from row-major tiles. Returns `None` if the length does not match.
    pub fn from_tiles(width: usize, height: usize, cells: Vec<Tile>) -> Option<Self> {
        (cells.len() == width * height).then_some(Self {
            width,
            height,
            cells,
        })
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn contains(&self, pos: Pos) -> bool {
        pos.col < self.width && pos.row < self.height
    }

    #[inline]
    fn index(&self, pos: Pos) -> usize {
        pos.row * self.width + pos.col
    }

    #[inline]
    pub fn get(&self, pos: Pos) -> Option<&Tile> {
        if !self.contains(pos) {
            return None;
        }
        self.cells.get(self.index(pos))
    }

    #[inline]
    pub fn get_mut(&mut self, pos: Pos) -> Option<&mut Tile> {
        if !self.contains(pos) {
            return None;
        }
        let i = self.index(pos);
        self.cells.get_mut(i)
    }

    /// Overwrite a cell. Out-of-range positions are ignored.
    #[inline]
    pub fn set(&mut self, pos: Pos, tile: Tile) {
        if let Some(cell) = self.get_mut(pos) {
            *cell = tile;
        }
    }

    /// Exchange the contents of two cells. Out-of-range positions are ignored.
    pub fn swap(&mut self, a: Pos, b: Pos) {
        if self.contains(a) && self.contains(b) {
            let (ia, ib) = (self.index(a), self.index(b));
            self.cells.swap(ia, ib);
        }
    }

    /// All positions, row by row.
    pub fn positions(&self) -> impl Iterator<Item = Pos> + use<> {
        let (w, h) = (self.width, self.height);
        (0..h).flat_map(move |row| (0..w).map(move |col| Pos::new(col, row)))
    }

    /// (position, tile) pairs, row by row.
    pub fn iter(&self) -> impl Iterator<Item = (Pos, &Tile)> {
        self.positions().zip(self.cells.iter())
    }

    /// Number of cells whose tile matches `color` by colour (walls and colour bombs excluded).
    pub fn count_color(&self, color: u8) -> usize {
        self.cells
            .iter()
            .filter(|t| t.match_color() == Some(color))
            .count()
    }

    pub fn wall_count(&self) -> usize {
        self.cells.iter().filter(|t| t.is_wall()).count()
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..self.height {
            for col in 0..self.width {
                if let Some(tile) = self.get(Pos::new(col, row)) {
                    write!(f, "{}", tile)?;
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Compact fixture format, one glyph per cell, whitespace ignored:
/// `R B G Y P O` normal colours, lowercase for iced, `1`-`9` wall with that health,
/// `@` colour bomb. Rows are separated by newlines; blank lines are skipped.
impl FromStr for Grid {
    type Err = GridParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let rows: Vec<Vec<char>> = s
            .lines()
            .map(|l| l.chars().filter(|c| !c.is_whitespace()).collect::<Vec<_>>())
            .filter(|r| !r.is_empty())
            .collect();
        let width = rows.first().map(Vec::len).ok_or(GridParseError::Empty)?;
        let height = rows.len();
        let mut cells = Vec::with_capacity(width * height);
        for (row, glyphs) in rows.iter().enumerate() {
            if glyphs.len() != width {
                return Err(GridParseError::Ragged {
                    row,
                    got: glyphs.len(),
                    expected: width,
                });
            }
            for (col, &glyph) in glyphs.iter().enumerate() {
                let tile = parse_glyph(glyph).ok_or(GridParseError::UnknownGlyph {
                    glyph,
                    pos: Pos::new(col, row),
                })?;
                cells.push(tile);
            }
        }
        Ok(Self {
            width,
            height,
            cells,
        })
    }
}

fn parse_glyph(glyph: char) -> Option<Tile> {
    if glyph == '@' {
        return Some(Tile::special(0, crate::tile::TileKind::ColorBomb));
    }
    if let Some(health) = glyph.to_digit(10) {
        return (health > 0).then(|| Tile::wall(health as u8));
    }
    let upper = glyph.to_ascii_uppercase();
    let color = COLOR_GLYPHS.iter().position(|&g| g == upper)? as u8;
    Some(if glyph.is_ascii_lowercase() {
        Tile::iced(color)
    } else {
        Tile::normal(color)
    })
}
