//! Board generation, reshuffling and the deterministic repair pass.

use crate::config::LevelConfig;
use crate::grid::Grid;
use crate::hint::has_legal_move;
use crate::matching::{find_matches, has_match, run_through};
use crate::tile::{Obstacle, Pos, Tile};
use rand::Rng;
use rand::seq::SliceRandom;
use tracing::{debug, warn};

/// Attempts before falling back to [`repair`].
pub const MAX_ATTEMPTS: usize = 100;

/// Build a starting board: walls on interior cells, colours chosen so no run of
/// three exists, at least one legal move, then ice on random non-wall cells.
///
/// If no attempt yields a legal move the last board is repaired; see [`repair`].
pub fn initialize_grid<R: Rng + ?Sized>(config: &LevelConfig, rng: &mut R) -> Grid {
    let walls = place_walls(config, rng);
    let mut grid = Grid::filled(config.width, config.height, Tile::normal(0));
    let mut ok = false;
    for attempt in 0..MAX_ATTEMPTS {
        fill_colors(&mut grid, &walls, config, rng);
        if has_legal_move(&grid) {
            debug!(attempt, "generated board");
            ok = true;
            break;
        }
    }
    if !ok {
        warn!(
            attempts = MAX_ATTEMPTS,
            "board generation exhausted, repairing"
        );
        repair(&mut grid, config.num_colors);
    }
    place_ice(&mut grid, config.ice_count, rng);
    grid
}

fn place_walls<R: Rng + ?Sized>(config: &LevelConfig, rng: &mut R) -> Vec<Pos> {
    let interior: Vec<Pos> = (1..config.height.saturating_sub(1))
        .flat_map(|row| (1..config.width.saturating_sub(1)).map(move |col| Pos::new(col, row)))
        .collect();
    interior
        .choose_multiple(rng, config.wall_count)
        .copied()
        .collect()
}

fn place_ice<R: Rng + ?Sized>(grid: &mut Grid, count: usize, rng: &mut R) {
    let free: Vec<Pos> = grid
        .iter()
        .filter(|(_, t)| !t.is_wall())
        .map(|(p, _)| p)
        .collect();
    for &pos in free.choose_multiple(rng, count) {
        if let Some(tile) = grid.get_mut(pos) {
            tile.obstacle = Obstacle::Ice;
        }
    }
}

/// Colour every non-wall cell left to right, top to bottom, excluding any colour
/// that would complete a run with the two cells to the left or the two above.
fn fill_colors<R: Rng + ?Sized>(
    grid: &mut Grid,
    walls: &[Pos],
    config: &LevelConfig,
    rng: &mut R,
) {
    for pos in grid.positions() {
        if walls.contains(&pos) {
            grid.set(pos, Tile::wall(config.wall_health));
            continue;
        }
        let mut excluded = Vec::with_capacity(2);
        if pos.col >= 2 {
            excluded.extend(pair_color(
                grid,
                Pos::new(pos.col - 1, pos.row),
                Pos::new(pos.col - 2, pos.row),
            ));
        }
        if pos.row >= 2 {
            excluded.extend(pair_color(
                grid,
                Pos::new(pos.col, pos.row - 1),
                Pos::new(pos.col, pos.row - 2),
            ));
        }
        let allowed: Vec<u8> = (0..config.num_colors)
            .filter(|c| !excluded.contains(c))
            .collect();
        let color = allowed
            .choose(rng)
            .copied()
            .unwrap_or_else(|| rng.gen_range(0..config.num_colors));
        grid.set(pos, Tile::normal(color));
    }
}

/// Colour shared by two cells, if both are matchable and equal.
fn pair_color(grid: &Grid, a: Pos, b: Pos) -> Option<u8> {
    let ca = grid.get(a)?.match_color()?;
    let cb = grid.get(b)?.match_color()?;
    (ca == cb).then_some(ca)
}

/// Redistribute colours and kinds among non-wall cells (obstacles stay where they
/// are) until the board has no match and at least one legal move.
pub fn shuffle<R: Rng + ?Sized>(grid: &mut Grid, num_colors: u8, rng: &mut R) {
    let slots: Vec<Pos> = grid
        .iter()
        .filter(|(_, t)| !t.is_wall())
        .map(|(p, _)| p)
        .collect();
    let mut faces: Vec<(u8, crate::tile::TileKind)> = slots
        .iter()
        .filter_map(|&p| grid.get(p).map(|t| (t.color, t.kind)))
        .collect();
    for attempt in 0..MAX_ATTEMPTS {
        faces.shuffle(rng);
        for (&pos, &(color, kind)) in slots.iter().zip(&faces) {
            if let Some(tile) = grid.get_mut(pos) {
                tile.color = color;
                tile.kind = kind;
            }
        }
        if !has_match(grid) && has_legal_move(grid) {
            debug!(attempt, "shuffled board");
            return;
        }
    }
    warn!(attempts = MAX_ATTEMPTS, "shuffle exhausted, repairing");
    repair(grid, num_colors);
}

/// Deterministic fallback: recolour matched cells until no run remains, then, if
/// the board has no legal move, recolour single cells until one appears.
///
/// Returns whether the board ended with no match and a legal move. When it did
/// not, the board is still left without matches whenever recolouring allows it.
pub fn repair(grid: &mut Grid, num_colors: u8) -> bool {
    loop {
        let matched = find_matches(grid);
        if matched.is_empty() {
            break;
        }
        let mut progress = false;
        for pos in matched {
            if run_through(grid, pos) && recolor_without_run(grid, pos, num_colors, |_| true) {
                progress = true;
            }
        }
        if !progress {
            warn!("repair could not break every run");
            return false;
        }
    }
    if has_legal_move(grid) {
        return true;
    }
    let cells: Vec<Pos> = grid.positions().collect();
    for pos in cells {
        if recolor_without_run(grid, pos, num_colors, has_legal_move) {
            debug!(%pos, "planted a legal move");
            return true;
        }
    }
    warn!("repair left a board without legal moves");
    false
}

/// Try every colour at `pos` in order; keep the first that creates no run through
/// `pos` and satisfies `accept`. Restores the original colour on failure.
fn recolor_without_run(
    grid: &mut Grid,
    pos: Pos,
    num_colors: u8,
    accept: impl Fn(&Grid) -> bool,
) -> bool {
    let Some(original) = grid.get(pos).copied() else {
        return false;
    };
    if original.match_color().is_none() {
        return false;
    }
    for color in 0..num_colors {
        if color == original.color {
            continue;
        }
        grid.set(pos, Tile { color, ..original });
        if !run_through(grid, pos) && accept(grid) {
            return true;
        }
    }
    grid.set(pos, original);
    false
}
