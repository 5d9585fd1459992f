//! Legal move search: used for stalemate detection and the idle hint.

use crate::grid::Grid;
use crate::matching::run_through;
use crate::special::is_direct_trigger;
use crate::tile::Pos;

/// True if swapping `a` and `b` would create a run through either cell.
/// The grid is swapped back before returning.
pub fn swap_creates_match(grid: &mut Grid, a: Pos, b: Pos) -> bool {
    grid.swap(a, b);
    let hit = run_through(grid, a) || run_through(grid, b);
    grid.swap(a, b);
    hit
}

/// First adjacent swap (scanning right and down neighbours row by row) that
/// matches or fires a direct special effect. Walls never take part.
pub fn find_legal_move(grid: &Grid) -> Option<(Pos, Pos)> {
    let mut scratch = grid.clone();
    for a in grid.positions() {
        let Some(ta) = grid.get(a).copied() else {
            continue;
        };
        if ta.is_wall() {
            continue;
        }
        for b in [Pos::new(a.col + 1, a.row), Pos::new(a.col, a.row + 1)] {
            let Some(tb) = grid.get(b).copied() else {
                continue;
            };
            if tb.is_wall() {
                continue;
            }
            if is_direct_trigger(&ta, &tb) || swap_creates_match(&mut scratch, a, b) {
                return Some((a, b));
            }
        }
    }
    None
}

pub fn has_legal_move(grid: &Grid) -> bool {
    find_legal_move(grid).is_some()
}
