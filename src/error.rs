//! Error types for swaps, level configuration and text grids.

use crate::tile::Pos;
use thiserror::Error;

/// Why a swap request was rejected. Rejection never changes the grid.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SwapError {
    #[error("cell {0} is outside the grid")]
    OutOfBounds(Pos),
    #[error("cells {0} and {1} are not adjacent")]
    NotAdjacent(Pos, Pos),
    #[error("cell {0} holds a wall")]
    WallInvolved(Pos),
    #[error("engine is busy resolving the previous move")]
    NotIdle,
    #[error("level is over")]
    LevelOver,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("grid must be at least 3x3, got {width}x{height}")]
    GridTooSmall { width: usize, height: usize },
    #[error("grid sides are capped at {max}, got {width}x{height}")]
    GridTooLarge {
        width: usize,
        height: usize,
        max: usize,
    },
    #[error("colour count must be in 3..={max}, got {got}")]
    ColorCount { got: u8, max: u8 },
    #[error("{walls} walls do not fit in {interior} interior cells")]
    TooManyWalls { walls: usize, interior: usize },
    #[error("{ice} ice tiles do not fit in {free} free cells")]
    TooManyIce { ice: usize, free: usize },
    #[error("move budget must be positive")]
    NoMoves,
    #[error("wall health must be positive")]
    ZeroWallHealth,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridParseError {
    #[error("empty grid")]
    Empty,
    #[error("row {row} has {got} cells, expected {expected}")]
    Ragged {
        row: usize,
        got: usize,
        expected: usize,
    },
    #[error("unknown glyph {glyph:?} at {pos}")]
    UnknownGlyph { glyph: char, pos: Pos },
}
