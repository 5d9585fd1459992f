//! Balloon Crush grid resolution engine: a match-3 board with special tiles, ice and
//! walls, cascading resolution, combo scoring and level progression.

pub mod config;
pub mod error;
pub mod event;
pub mod generate;
pub mod gravity;
pub mod grid;
pub mod highscores;
pub mod hint;
pub mod matching;
pub mod resolve;
pub mod session;
pub mod special;
pub mod tile;

pub use config::LevelConfig;
pub use error::{ConfigError, GridParseError, SwapError};
pub use event::{LevelStatus, Resolution, StepReport, SwapOutcome};
pub use grid::Grid;
pub use highscores::{FileSubmitter, NoopSubmitter, ScoreReport, ScoreSubmitter};
pub use session::{GameSession, Phase, SessionState};
pub use tile::{Obstacle, Pos, Tile, TileKind};
