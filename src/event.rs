//! Engine output consumed by the presentation layer: per-step reports and swap outcomes.

use crate::grid::Grid;
use crate::tile::{Pos, TileKind};

/// Why a cell was emptied during a resolution step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RemovalReason {
    /// Part of a run of three or more.
    Matched,
    /// Hit by a striped tile's line.
    StripedLine,
    /// Hit by an area bomb.
    AreaBlast,
    /// Colour bomb swapped against a normal tile.
    ColorBomb,
    /// Two specials swapped against each other, or a colour bomb against a special.
    Compound,
    /// Wall health reached zero.
    WallBroken,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Removal {
    pub pos: Pos,
    pub reason: RemovalReason,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WallHit {
    pub pos: Pos,
    /// Health left after the hit; zero means the wall broke.
    pub remaining: u8,
}

/// Special tile requested by the swap's match shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpecialCreation {
    pub pos: Pos,
    pub kind: TileKind,
    /// False when the cell could not take the special after gravity: ice kept the
    /// original tile, or an iced tile settled there.
    pub placed: bool,
}

/// Everything that happened in one resolution step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepReport {
    /// Combo multiplier applied to matched tiles (1 for the swap itself).
    pub combo: u32,
    /// Cells of detected runs (empty for a direct special trigger).
    pub matched: Vec<Pos>,
    /// Cells actually emptied, with the reason.
    pub removals: Vec<Removal>,
    /// Tiles that lost their ice and stayed on the board.
    pub ice_broken: Vec<Pos>,
    pub walls_hit: Vec<WallHit>,
    pub special: Option<SpecialCreation>,
    /// Cells that received a freshly generated tile, column by column.
    pub refilled: Vec<Pos>,
    pub score_delta: u32,
    /// Board after gravity and refill.
    pub grid: Grid,
}

impl StepReport {
    pub fn cleared_count(&self) -> usize {
        self.removals.len()
    }

    /// Removals with the given reason.
    pub fn removed_by(&self, reason: RemovalReason) -> impl Iterator<Item = Pos> + '_ {
        self.removals
            .iter()
            .filter(move |r| r.reason == reason)
            .map(|r| r.pos)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LevelStatus {
    #[default]
    InProgress,
    Won,
    Lost,
}

impl LevelStatus {
    pub fn is_over(self) -> bool {
        self != Self::InProgress
    }
}

/// Full result of one accepted, match-producing (or directly triggered) swap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub steps: Vec<StepReport>,
    /// The settled board had no legal move and was reshuffled.
    pub shuffled: bool,
    pub score: u32,
    pub moves_left: u32,
    pub status: LevelStatus,
}

impl Resolution {
    pub fn score_gained(&self) -> u32 {
        self.steps.iter().map(|s| s.score_delta).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SwapOutcome {
    /// No match: tiles were swapped back and no move was spent.
    Reverted,
    Resolved(Resolution),
}
