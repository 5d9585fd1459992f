//! Column compaction after removals, with walls as fixed anchors.

use crate::grid::Grid;
use crate::tile::{Pos, Tile};
use rand::Rng;
use std::collections::BTreeSet;

/// Random fresh tile for refills.
pub fn random_tile<R: Rng + ?Sized>(rng: &mut R, num_colors: u8) -> Tile {
    Tile::normal(rng.gen_range(0..num_colors))
}

/// Let tiles fall into `vacated` cells and refill from the top.
///
/// Each column is split into segments by walls that are not themselves vacated.
/// Survivors keep their order and drop to the bottom of their segment; the empty
/// top of every segment gets fresh tiles. Returns the refilled cells.
pub fn settle<R: Rng + ?Sized>(
    grid: &mut Grid,
    vacated: &BTreeSet<Pos>,
    num_colors: u8,
    rng: &mut R,
) -> Vec<Pos> {
    let mut refilled = Vec::new();
    if vacated.is_empty() {
        return refilled;
    }
    let height = grid.height();
    for col in 0..grid.width() {
        if !vacated.iter().any(|p| p.col == col) {
            continue;
        }
        let is_anchor = |grid: &Grid, row: usize| {
            let pos = Pos::new(col, row);
            !vacated.contains(&pos) && grid.get(pos).is_some_and(Tile::is_wall)
        };
        // Walk segments bottom-up: [top, bottom] between anchors.
        let mut bottom = height;
        while bottom > 0 {
            if is_anchor(grid, bottom - 1) {
                bottom -= 1;
                continue;
            }
            let mut top = bottom;
            while top > 0 && !is_anchor(grid, top - 1) {
                top -= 1;
            }
            // Survivors listed bottom to top.
            let survivors: Vec<Tile> = (top..bottom)
                .rev()
                .map(|row| Pos::new(col, row))
                .filter(|p| !vacated.contains(p))
                .filter_map(|p| grid.get(p).copied())
                .collect();
            let mut row = bottom;
            for tile in survivors {
                row -= 1;
                grid.set(Pos::new(col, row), tile);
            }
            while row > top {
                row -= 1;
                let pos = Pos::new(col, row);
                grid.set(pos, random_tile(rng, num_colors));
                refilled.push(pos);
            }
            bottom = top;
        }
    }
    refilled
}
