//! Level configuration: board size, colours, goals and obstacle counts.

use crate::error::ConfigError;
use crate::tile::MAX_COLORS;

/// Target score for level 1; each level adds the same amount.
pub const TARGET_STEP: u32 = 500;
/// Moves granted per level.
pub const DEFAULT_MOVES: u32 = 25;
pub const DEFAULT_SIZE: usize = 8;
pub const DEFAULT_WALL_HEALTH: u8 = 2;
/// Largest board side accepted; hint search is exhaustive per cell.
pub const MAX_SIDE: usize = 16;
const MAX_LEVEL_ICE: usize = 16;
const MAX_LEVEL_WALLS: usize = 6;

/// Immutable record read once when a level begins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelConfig {
    pub width: usize,
    pub height: usize,
    pub num_colors: u8,
    pub target_score: u32,
    pub moves: u32,
    pub ice_count: usize,
    pub wall_count: usize,
    /// Hits a wall takes before breaking.
    pub wall_health: u8,
}

impl Default for LevelConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_SIZE,
            height: DEFAULT_SIZE,
            num_colors: MAX_COLORS,
            target_score: TARGET_STEP,
            moves: DEFAULT_MOVES,
            ice_count: 0,
            wall_count: 0,
            wall_health: DEFAULT_WALL_HEALTH,
        }
    }
}

impl LevelConfig {
    /// Standard progression: the target grows by `TARGET_STEP` per level and
    /// obstacles appear from level 2 on.
    pub fn for_level(level: u32) -> Self {
        let level = level.max(1);
        let extra = (level - 1) as usize;
        Self {
            target_score: TARGET_STEP.saturating_mul(level),
            ice_count: (extra * 2).min(MAX_LEVEL_ICE),
            wall_count: extra.min(MAX_LEVEL_WALLS),
            ..Self::default()
        }
    }

    /// Cells walls may occupy (never on the border).
    pub fn interior_cells(&self) -> usize {
        self.width
            .saturating_sub(2)
            .saturating_mul(self.height.saturating_sub(2))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width < 3 || self.height < 3 {
            return Err(ConfigError::GridTooSmall {
                width: self.width,
                height: self.height,
            });
        }
        if !(3..=MAX_COLORS).contains(&self.num_colors) {
            return Err(ConfigError::ColorCount {
                got: self.num_colors,
                max: MAX_COLORS,
            });
        }
        if self.width > MAX_SIDE || self.height > MAX_SIDE {
            return Err(ConfigError::GridTooLarge {
                width: self.width,
                height: self.height,
                max: MAX_SIDE,
            });
        }
        let interior = self.interior_cells();
        if self.wall_count > interior {
            return Err(ConfigError::TooManyWalls {
                walls: self.wall_count,
                interior,
            });
        }
        let free = self
            .width
            .checked_mul(self.height)
            .map_or(0, |cells| cells.saturating_sub(self.wall_count));
        if self.ice_count > free {
            return Err(ConfigError::TooManyIce {
                ice: self.ice_count,
                free,
            });
        }
        if self.moves == 0 {
            return Err(ConfigError::NoMoves);
        }
        if self.wall_count > 0 && self.wall_health == 0 {
            return Err(ConfigError::ZeroWallHealth);
        }
        Ok(())
    }
}
