//! Tile model: position, colour, special kind and obstacle state.

use std::fmt;

/// Maximum number of distinct balloon colours.
pub const MAX_COLORS: u8 = 6;

/// Glyphs for colour indices 0..6 (red, blue, green, yellow, purple, orange).
pub const COLOR_GLYPHS: [char; MAX_COLORS as usize] = ['R', 'B', 'G', 'Y', 'P', 'O'];

/// Grid coordinate. `row` 0 is the top; gravity pulls toward higher rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Pos {
    pub col: usize,
    pub row: usize,
}

impl Pos {
    pub const fn new(col: usize, row: usize) -> Self {
        Self { col, row }
    }

    /// True if `other` is directly left/right/above/below.
    pub fn is_adjacent(self, other: Self) -> bool {
        self.col.abs_diff(other.col) + self.row.abs_diff(other.row) == 1
    }

    /// Up to four orthogonal neighbours inside a `width` x `height` grid.
    pub fn neighbours(self, width: usize, height: usize) -> impl Iterator<Item = Self> {
        const STEPS: [(isize, isize); 4] = [(0, -1), (0, 1), (-1, 0), (1, 0)];
        STEPS.into_iter().filter_map(move |(dc, dr)| {
            let col = self.col.checked_add_signed(dc)?;
            let row = self.row.checked_add_signed(dr)?;
            (col < width && row < height).then_some(Self { col, row })
        })
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.col, self.row)
    }
}

/// Game-effect variant of a tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TileKind {
    #[default]
    Normal,
    /// Clears its whole row when consumed.
    StripedRow,
    /// Clears its whole column when consumed.
    StripedColumn,
    /// Clears the 3x3 block around it when consumed.
    AreaBomb,
    /// Colourless; fires when swapped against another tile.
    ColorBomb,
}

impl TileKind {
    pub fn is_special(self) -> bool {
        self != Self::Normal
    }
}

/// Obstacle layered on top of the tile's colour and kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Obstacle {
    #[default]
    None,
    /// Absorbs one hit before the tile can be cleared.
    Ice,
    /// Immovable, colourless; broken by matches next to it.
    Wall { health: u8 },
}

/// One grid cell's content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tile {
    /// Colour index in `0..num_colors`. Meaningless for walls and colour bombs.
    pub color: u8,
    pub kind: TileKind,
    pub obstacle: Obstacle,
}

impl Tile {
    pub const fn normal(color: u8) -> Self {
        Self {
            color,
            kind: TileKind::Normal,
            obstacle: Obstacle::None,
        }
    }

    pub const fn special(color: u8, kind: TileKind) -> Self {
        Self {
            color,
            kind,
            obstacle: Obstacle::None,
        }
    }

    pub const fn iced(color: u8) -> Self {
        Self {
            color,
            kind: TileKind::Normal,
            obstacle: Obstacle::Ice,
        }
    }

    pub const fn wall(health: u8) -> Self {
        Self {
            color: 0,
            kind: TileKind::Normal,
            obstacle: Obstacle::Wall { health },
        }
    }

    #[inline]
    pub fn is_wall(&self) -> bool {
        matches!(self.obstacle, Obstacle::Wall { .. })
    }

    #[inline]
    pub fn is_iced(&self) -> bool {
        self.obstacle == Obstacle::Ice
    }

    /// Colour used for run detection; `None` for walls and colour bombs.
    #[inline]
    pub fn match_color(&self) -> Option<u8> {
        if self.is_wall() || self.kind == TileKind::ColorBomb {
            None
        } else {
            Some(self.color)
        }
    }
}

impl fmt::Display for Tile {
    /// Three glyphs: colour, kind marker, ice marker. Walls print `#` and their health.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Obstacle::Wall { health } = self.obstacle {
            return write!(f, "#{} ", health);
        }
        let color = if self.kind == TileKind::ColorBomb {
            '@'
        } else {
            COLOR_GLYPHS.get(self.color as usize).copied().unwrap_or('?')
        };
        let kind = match self.kind {
            TileKind::Normal | TileKind::ColorBomb => ' ',
            TileKind::StripedRow => '-',
            TileKind::StripedColumn => '|',
            TileKind::AreaBomb => '*',
        };
        let ice = if self.is_iced() { '~' } else { ' ' };
        write!(f, "{}{}{}", color, kind, ice)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adjacency_is_orthogonal_only() {
        let p = Pos::new(3, 3);
        assert!(p.is_adjacent(Pos::new(4, 3)));
        assert!(p.is_adjacent(Pos::new(3, 2)));
        assert!(!p.is_adjacent(Pos::new(4, 4)));
        assert!(!p.is_adjacent(p));
    }

    #[test]
    fn corner_has_two_neighbours() {
        let n: Vec<_> = Pos::new(0, 0).neighbours(8, 8).collect();
        assert_eq!(n.len(), 2);
        assert!(n.contains(&Pos::new(1, 0)));
        assert!(n.contains(&Pos::new(0, 1)));
    }

    #[test]
    fn walls_and_color_bombs_have_no_match_color() {
        assert_eq!(Tile::wall(2).match_color(), None);
        assert_eq!(Tile::special(3, TileKind::ColorBomb).match_color(), None);
        assert_eq!(Tile::iced(1).match_color(), Some(1));
        assert_eq!(Tile::special(2, TileKind::StripedRow).match_color(), Some(2));
    }
}
