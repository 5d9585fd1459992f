//! One resolution step: pick targets, break ice and walls, clear, create specials,
//! apply gravity. The session calls [`resolve_step`] in a loop until it returns `None`.

use crate::event::{Removal, RemovalReason, SpecialCreation, StepReport, WallHit};
use crate::gravity;
use crate::grid::Grid;
use crate::matching::{Run, find_runs};
use crate::special::{activation_area, direct_effect, plan_creation};
use crate::tile::{Obstacle, Pos, Tile};
use rand::Rng;
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

/// Per matched tile, multiplied by the combo.
pub const MATCH_POINTS: u32 = 10;
/// Per tile destroyed by a striped line or area bomb.
pub const EFFECT_POINTS: u32 = 15;
/// Per tile destroyed by a colour bomb or a compound effect.
pub const BOMB_POINTS: u32 = 20;
pub const ICE_BREAK_POINTS: u32 = 20;
pub const WALL_BREAK_POINTS: u32 = 30;

/// What starts a resolution step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// Detected runs. `swap` is set only for the player's own swap, the one case
    /// that may create a special tile.
    Matches { swap: Option<(Pos, Pos)> },
    /// Colour bomb or special pair swapped directly; `b` is the effect centre.
    Direct { a: Pos, b: Pos },
}

pub fn points(reason: RemovalReason, combo: u32) -> u32 {
    match reason {
        RemovalReason::Matched => MATCH_POINTS * combo,
        RemovalReason::StripedLine | RemovalReason::AreaBlast => EFFECT_POINTS,
        RemovalReason::ColorBomb | RemovalReason::Compound => BOMB_POINTS,
        RemovalReason::WallBroken => WALL_BREAK_POINTS,
    }
}

/// Run one step on `grid`. Returns `None` (grid untouched) when the trigger has
/// nothing to act on: no runs, or a swap pair that is not a direct trigger.
pub fn resolve_step<R: Rng + ?Sized>(
    grid: &mut Grid,
    trigger: Trigger,
    combo: u32,
    num_colors: u8,
    rng: &mut R,
) -> Option<StepReport> {
    let mut targets: BTreeMap<Pos, RemovalReason> = BTreeMap::new();
    let mut matched = Vec::new();
    let mut plan = None;

    match trigger {
        Trigger::Matches { swap } => {
            let runs: Vec<Run> = find_runs(grid);
            if runs.is_empty() {
                return None;
            }
            let cells: BTreeSet<Pos> = runs.iter().flat_map(Run::cells).collect();
            for &pos in &cells {
                targets.insert(pos, RemovalReason::Matched);
            }
            // Consumed specials fire once; specials caught in their area do not.
            for &pos in &cells {
                let Some(tile) = grid.get(pos) else { continue };
                if tile.kind.is_special() && !tile.is_iced() {
                    let (area, reason) = activation_area(grid, pos, tile.kind);
                    for hit in area {
                        targets.entry(hit).or_insert(reason);
                    }
                }
            }
            plan = swap.and_then(|s| plan_creation(&runs, s));
            matched = cells.into_iter().collect();
        }
        Trigger::Direct { a, b } => {
            let (cells, reason) = direct_effect(grid, a, b)?;
            for pos in cells {
                targets.insert(pos, reason);
            }
        }
    }

    let mut vacated = BTreeSet::new();
    let mut removals = Vec::with_capacity(targets.len());
    let mut ice_broken = Vec::new();
    let mut score = 0u32;

    for (&pos, &reason) in &targets {
        let Some(tile) = grid.get_mut(pos) else {
            continue;
        };
        match tile.obstacle {
            Obstacle::Wall { .. } => continue,
            Obstacle::Ice => {
                tile.obstacle = Obstacle::None;
                ice_broken.push(pos);
                score += ICE_BREAK_POINTS;
            }
            Obstacle::None => {
                vacated.insert(pos);
                removals.push(Removal { pos, reason });
                score += points(reason, combo);
            }
        }
    }

    // Each wall next to any targeted cell takes one hit per step.
    let (w, h) = (grid.width(), grid.height());
    let walls: BTreeSet<Pos> = targets
        .keys()
        .flat_map(|p| p.neighbours(w, h))
        .filter(|p| grid.get(*p).is_some_and(Tile::is_wall))
        .collect();
    let mut walls_hit = Vec::with_capacity(walls.len());
    for pos in walls {
        let Some(tile) = grid.get_mut(pos) else {
            continue;
        };
        if let Obstacle::Wall { health } = tile.obstacle {
            let remaining = health.saturating_sub(1);
            tile.obstacle = Obstacle::Wall { health: remaining };
            walls_hit.push(WallHit { pos, remaining });
            if remaining == 0 {
                vacated.insert(pos);
                removals.push(Removal {
                    pos,
                    reason: RemovalReason::WallBroken,
                });
                score += WALL_BREAK_POINTS;
            }
        }
    }

    // The special lands on its cell after the column settles. It is dropped when
    // ice kept the original tile there, or an iced tile fell into the cell.
    let mut refilled = gravity::settle(grid, &vacated, num_colors, rng);
    let special = plan.map(|plan| {
        let placed = vacated.contains(&plan.pos)
            && grid.get(plan.pos).is_some_and(|t| !t.is_iced() && !t.is_wall());
        if placed {
            grid.set(plan.pos, plan.tile());
            refilled.retain(|&p| p != plan.pos);
        }
        SpecialCreation {
            pos: plan.pos,
            kind: plan.kind,
            placed,
        }
    });

    debug!(
        combo,
        matched = matched.len(),
        removed = removals.len(),
        ice = ice_broken.len(),
        walls = walls_hit.len(),
        score,
        "resolution step"
    );

    Some(StepReport {
        combo,
        matched,
        removals,
        ice_broken,
        walls_hit,
        special,
        refilled,
        score_delta: score,
        grid: grid.clone(),
    })
}
