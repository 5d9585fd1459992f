//! Special tiles: which match shapes create them, and what they destroy.

use crate::event::RemovalReason;
use crate::grid::Grid;
use crate::matching::{Axis, Run};
use crate::tile::{Pos, Tile, TileKind};
use std::collections::BTreeSet;

/// Special tile to be created by a swap's match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpecialPlan {
    pub pos: Pos,
    pub kind: TileKind,
    pub color: u8,
}

impl SpecialPlan {
    pub fn tile(&self) -> Tile {
        Tile::special(self.color, self.kind)
    }
}

/// Creation rules, first hit wins: run of 5+ gives a colour bomb, crossing row and
/// column runs give an area bomb, a run of exactly 4 gives a striped tile clearing
/// across the run.
pub fn plan_creation(runs: &[Run], swapped: (Pos, Pos)) -> Option<SpecialPlan> {
    if let Some(run) = pick_run(runs, swapped, |r| r.len >= 5) {
        return Some(SpecialPlan {
            pos: anchor(run, swapped),
            kind: TileKind::ColorBomb,
            color: run.color,
        });
    }
    for (i, a) in runs.iter().enumerate() {
        for b in &runs[i + 1..] {
            if let Some(pos) = a.intersection(b) {
                return Some(SpecialPlan {
                    pos,
                    kind: TileKind::AreaBomb,
                    color: a.color,
                });
            }
        }
    }
    pick_run(runs, swapped, |r| r.len == 4).map(|run| SpecialPlan {
        pos: anchor(run, swapped),
        kind: match run.axis {
            Axis::Horizontal => TileKind::StripedColumn,
            Axis::Vertical => TileKind::StripedRow,
        },
        color: run.color,
    })
}

/// Prefer a qualifying run that contains one of the swapped cells.
fn pick_run(runs: &[Run], swapped: (Pos, Pos), pred: impl Fn(&Run) -> bool) -> Option<&Run> {
    let mut candidates = runs.iter().filter(|r| pred(r));
    let first = candidates.clone().next()?;
    Some(
        candidates
            .find(|r| r.contains(swapped.0) || r.contains(swapped.1))
            .unwrap_or(first),
    )
}

/// The swapped cell the special lands on: the destination if it is in the run,
/// otherwise the origin, otherwise the destination.
fn anchor(run: &Run, (a, b): (Pos, Pos)) -> Pos {
    if run.contains(b) {
        b
    } else if run.contains(a) {
        a
    } else {
        b
    }
}

/// Cells destroyed when a special at `pos` is consumed by a match. Walls are excluded.
pub fn activation_area(grid: &Grid, pos: Pos, kind: TileKind) -> (Vec<Pos>, RemovalReason) {
    match kind {
        TileKind::StripedRow => (row(grid, pos.row).collect(), RemovalReason::StripedLine),
        TileKind::StripedColumn => (column(grid, pos.col).collect(), RemovalReason::StripedLine),
        TileKind::AreaBomb => (square(grid, pos, 1).collect(), RemovalReason::AreaBlast),
        // Colour bombs only fire on a direct swap.
        TileKind::Normal | TileKind::ColorBomb => (Vec::new(), RemovalReason::Matched),
    }
}

/// True if swapping `a` and `b` fires a direct effect instead of normal matching.
pub fn is_direct_trigger(a: &Tile, b: &Tile) -> bool {
    a.kind == TileKind::ColorBomb
        || b.kind == TileKind::ColorBomb
        || (a.kind.is_special() && b.kind.is_special())
}

/// Cells destroyed by swapping the tiles at `a` and `b` directly, keyed by the
/// pair of kinds. `b` is the centre of area effects. Returns `None` if the pair is
/// not a direct trigger.
pub fn direct_effect(grid: &Grid, a: Pos, b: Pos) -> Option<(BTreeSet<Pos>, RemovalReason)> {
    use TileKind::{AreaBomb, ColorBomb, Normal, StripedColumn, StripedRow};

    let ta = *grid.get(a)?;
    let tb = *grid.get(b)?;
    if !is_direct_trigger(&ta, &tb) {
        return None;
    }
    let mut cells: BTreeSet<Pos> = BTreeSet::new();
    let reason = match (ta.kind, tb.kind) {
        (ColorBomb, ColorBomb) => {
            cells.extend(non_walls(grid));
            RemovalReason::Compound
        }
        (ColorBomb, other) | (other, ColorBomb) => {
            let partner = if ta.kind == ColorBomb { tb } else { ta };
            cells.extend(
                grid.iter()
                    .filter(|(_, t)| t.match_color() == Some(partner.color))
                    .map(|(p, _)| p),
            );
            cells.insert(a);
            cells.insert(b);
            if other == Normal {
                RemovalReason::ColorBomb
            } else {
                RemovalReason::Compound
            }
        }
        (StripedRow | StripedColumn, StripedRow | StripedColumn) => {
            for p in [a, b] {
                cells.extend(row(grid, p.row));
                cells.extend(column(grid, p.col));
            }
            RemovalReason::Compound
        }
        (AreaBomb, StripedRow | StripedColumn) | (StripedRow | StripedColumn, AreaBomb) => {
            if a.row == b.row {
                for r in b.row.saturating_sub(1)..=b.row + 1 {
                    cells.extend(row(grid, r));
                }
            } else {
                for c in b.col.saturating_sub(1)..=b.col + 1 {
                    cells.extend(column(grid, c));
                }
            }
            RemovalReason::Compound
        }
        (AreaBomb, AreaBomb) => {
            cells.extend(square(grid, b, 2));
            RemovalReason::Compound
        }
        (Normal, _) | (_, Normal) => return None,
    };
    Some((cells, reason))
}

fn non_walls(grid: &Grid) -> impl Iterator<Item = Pos> + '_ {
    grid.iter().filter(|(_, t)| !t.is_wall()).map(|(p, _)| p)
}

fn is_open(grid: &Grid, pos: Pos) -> bool {
    grid.get(pos).is_some_and(|t| !t.is_wall())
}

fn row(grid: &Grid, row: usize) -> impl Iterator<Item = Pos> + '_ {
    (0..grid.width())
        .map(move |col| Pos::new(col, row))
        .filter(|&p| is_open(grid, p))
}

fn column(grid: &Grid, col: usize) -> impl Iterator<Item = Pos> + '_ {
    (0..grid.height())
        .map(move |row| Pos::new(col, row))
        .filter(|&p| is_open(grid, p))
}

/// (2r+1)x(2r+1) block around `centre`, clipped to the grid.
fn square(grid: &Grid, centre: Pos, r: usize) -> impl Iterator<Item = Pos> + '_ {
    let rows = centre.row.saturating_sub(r)..=centre.row + r;
    rows.flat_map(move |row| {
        (centre.col.saturating_sub(r)..=centre.col + r).map(move |col| Pos::new(col, row))
    })
    .filter(|&p| is_open(grid, p))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::find_runs;

    fn grid(s: &str) -> Grid {
        s.parse().unwrap()
    }

    #[test]
    fn four_in_a_row_makes_perpendicular_stripe() {
        let g = grid(
            "BGYP
             RRRR
             GYPB",
        );
        let runs = find_runs(&g);
        let plan = plan_creation(&runs, (Pos::new(1, 0), Pos::new(1, 1))).unwrap();
        assert_eq!(plan.kind, TileKind::StripedColumn);
        assert_eq!(plan.pos, Pos::new(1, 1));
        assert_eq!(plan.color, 0);
    }

    #[test]
    fn vertical_four_makes_row_stripe() {
        let g = grid(
            "BG
             BY
             BP
             BR
             GY",
        );
        let runs = find_runs(&g);
        let plan = plan_creation(&runs, (Pos::new(1, 2), Pos::new(0, 2))).unwrap();
        assert_eq!(plan.kind, TileKind::StripedRow);
        assert_eq!(plan.pos, Pos::new(0, 2));
    }

    #[test]
    fn five_beats_cross_and_four() {
        let g = grid(
            "RRRRR
             GRBYG
             YRGBY",
        );
        let runs = find_runs(&g);
        let plan = plan_creation(&runs, (Pos::new(2, 0), Pos::new(2, 1))).unwrap();
        assert_eq!(plan.kind, TileKind::ColorBomb);
        assert_eq!(plan.pos, Pos::new(2, 0));
    }

    #[test]
    fn cross_makes_area_bomb_at_intersection() {
        let g = grid(
            "GRBY
             YRGB
             RRRG
             BYGY",
        );
        let runs = find_runs(&g);
        let plan = plan_creation(&runs, (Pos::new(3, 2), Pos::new(2, 2))).unwrap();
        assert_eq!(plan.kind, TileKind::AreaBomb);
        assert_eq!(plan.pos, Pos::new(1, 2));
    }

    #[test]
    fn plain_three_makes_nothing() {
        let g = grid(
            "RRRG
             GYBY",
        );
        assert!(plan_creation(&find_runs(&g), (Pos::new(0, 0), Pos::new(0, 1))).is_none());
    }

    #[test]
    fn activation_areas_skip_walls_and_clip() {
        let g = grid(
            "RGBY
             G2YR
             BYRG",
        );
        let (row, reason) = activation_area(&g, Pos::new(0, 1), TileKind::StripedRow);
        assert_eq!(reason, RemovalReason::StripedLine);
        assert_eq!(row, vec![Pos::new(0, 1), Pos::new(2, 1), Pos::new(3, 1)]);

        let (block, reason) = activation_area(&g, Pos::new(0, 0), TileKind::AreaBomb);
        assert_eq!(reason, RemovalReason::AreaBlast);
        assert_eq!(block.len(), 3);
        assert!(!block.contains(&Pos::new(1, 1)));
    }

    #[test]
    fn color_bomb_takes_partner_colour() {
        let mut g = grid(
            "RGBR
             GRYB
             BYRG",
        );
        g.set(Pos::new(1, 0), Tile::special(0, TileKind::ColorBomb));
        let (cells, reason) = direct_effect(&g, Pos::new(1, 0), Pos::new(0, 0)).unwrap();
        assert_eq!(reason, RemovalReason::ColorBomb);
        // four reds plus the bomb
        assert_eq!(cells.len(), 5);
        assert!(cells.contains(&Pos::new(1, 0)));
    }

    #[test]
    fn compound_table() {
        let base = grid(
            "RGBYRG
             GBYRGB
             BYRGBY
             YRGBYR
             RGBYRG
             GBYRGB",
        );
        let with = |a: TileKind, b: TileKind| {
            let mut g = base.clone();
            g.set(Pos::new(2, 2), Tile::special(0, a));
            g.set(Pos::new(3, 2), Tile::special(1, b));
            direct_effect(&g, Pos::new(2, 2), Pos::new(3, 2)).unwrap()
        };

        let (cells, reason) = with(TileKind::StripedRow, TileKind::StripedColumn);
        assert_eq!(reason, RemovalReason::Compound);
        // row 2 plus columns 2 and 3
        assert_eq!(cells.len(), 6 + 5 + 5);

        let (cells, _) = with(TileKind::AreaBomb, TileKind::AreaBomb);
        // 5x5 around (3,2): cols 1..=5, rows 0..=4
        assert_eq!(cells.len(), 25);

        let (cells, _) = with(TileKind::AreaBomb, TileKind::StripedRow);
        // horizontal swap: rows 1..=3
        assert_eq!(cells.len(), 18);

        let (cells, _) = with(TileKind::ColorBomb, TileKind::ColorBomb);
        assert_eq!(cells.len(), 36);

        let (cells, reason) = with(TileKind::ColorBomb, TileKind::AreaBomb);
        assert_eq!(reason, RemovalReason::Compound);
        assert!(cells.contains(&Pos::new(2, 2)));
        assert!(cells.contains(&Pos::new(3, 2)));

        let mut g = base.clone();
        g.set(Pos::new(2, 2), Tile::special(0, TileKind::StripedRow));
        assert!(direct_effect(&g, Pos::new(2, 2), Pos::new(3, 2)).is_none());

        // Vertical swap: three columns centred on the second cell.
        let mut g = base.clone();
        g.set(Pos::new(2, 2), Tile::special(0, TileKind::AreaBomb));
        g.set(Pos::new(2, 3), Tile::special(1, TileKind::StripedColumn));
        let (cells, reason) = direct_effect(&g, Pos::new(2, 2), Pos::new(2, 3)).unwrap();
        assert_eq!(reason, RemovalReason::Compound);
        assert_eq!(cells.len(), 18);
        assert!(cells.iter().all(|p| (1..=3).contains(&p.col)));

        // Near the edge the band is clipped to the board.
        let mut g = base.clone();
        g.set(Pos::new(0, 4), Tile::special(0, TileKind::StripedRow));
        g.set(Pos::new(0, 5), Tile::special(1, TileKind::AreaBomb));
        let (cells, _) = direct_effect(&g, Pos::new(0, 4), Pos::new(0, 5)).unwrap();
        assert_eq!(cells.len(), 12);
    }
}
