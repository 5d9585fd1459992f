//! Game session: owns the board, the counters and the phase machine, and turns a
//! player's swap into a complete resolution.

use crate::config::LevelConfig;
use crate::error::{ConfigError, SwapError};
use crate::event::{LevelStatus, Resolution, StepReport, SwapOutcome};
use crate::generate::{initialize_grid, shuffle};
use crate::grid::Grid;
use crate::highscores::{GUEST, NoopSubmitter, ScoreReport, ScoreSubmitter};
use crate::hint::{find_legal_move, has_legal_move};
use crate::matching::run_through;
use crate::resolve::{Trigger, resolve_step};
use crate::special::is_direct_trigger;
use crate::tile::Pos;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::fmt;
use tracing::{debug, info, instrument, warn};

/// Engine phase. Swaps are accepted only while `Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Resolving,
    Shuffling,
}

/// Mutable per-level counters.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SessionState {
    pub level: u32,
    pub score: u32,
    pub moves_left: u32,
    /// Combo multiplier of the last step; 0 before the first step of a swap.
    pub combo: u32,
    pub phase: Phase,
    pub status: LevelStatus,
}

pub struct GameSession {
    config: LevelConfig,
    grid: Grid,
    state: SessionState,
    rng: StdRng,
    player: String,
    submitter: Box<dyn ScoreSubmitter>,
}

impl fmt::Debug for GameSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GameSession")
            .field("config", &self.config)
            .field("state", &self.state)
            .field("player", &self.player)
            .finish_non_exhaustive()
    }
}

impl GameSession {
    /// Level 1 session with an entropy-seeded RNG.
    pub fn new(config: LevelConfig) -> Result<Self, ConfigError> {
        Self::build(config, StdRng::from_entropy(), None)
    }

    /// Deterministic session: same seed and config give the same game.
    pub fn with_seed(config: LevelConfig, seed: u64) -> Result<Self, ConfigError> {
        Self::build(config, StdRng::seed_from_u64(seed), None)
    }

    /// Session on a prepared board. Width and height are taken from `grid`;
    /// `seed` drives refills and shuffles.
    pub fn from_grid(mut config: LevelConfig, grid: Grid, seed: u64) -> Result<Self, ConfigError> {
        config.width = grid.width();
        config.height = grid.height();
        config.wall_count = grid.wall_count();
        Self::build(config, StdRng::seed_from_u64(seed), Some(grid))
    }

    fn build(config: LevelConfig, mut rng: StdRng, grid: Option<Grid>) -> Result<Self, ConfigError> {
        config.validate()?;
        let grid = grid.unwrap_or_else(|| initialize_grid(&config, &mut rng));
        let state = SessionState {
            level: 1,
            moves_left: config.moves,
            ..SessionState::default()
        };
        info!(
            level = state.level,
            target = config.target_score,
            moves = config.moves,
            "level started"
        );
        Ok(Self {
            config,
            grid,
            state,
            rng,
            player: GUEST.to_string(),
            submitter: Box::new(NoopSubmitter),
        })
    }

    /// Player name used in score reports.
    pub fn with_player(mut self, player: impl Into<String>) -> Self {
        self.player = player.into();
        self
    }

    pub fn with_submitter(mut self, submitter: Box<dyn ScoreSubmitter>) -> Self {
        self.submitter = submitter;
        self
    }

    /// Start numbering from `level` (the board is not regenerated).
    pub fn at_level(mut self, level: u32) -> Self {
        self.state.level = level.max(1);
        self
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn config(&self) -> &LevelConfig {
        &self.config
    }

    pub fn player(&self) -> &str {
        &self.player
    }

    pub fn level(&self) -> u32 {
        self.state.level
    }

    pub fn score(&self) -> u32 {
        self.state.score
    }

    pub fn moves_left(&self) -> u32 {
        self.state.moves_left
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    pub fn status(&self) -> LevelStatus {
        self.state.status
    }

    /// A swap that would match or fire a special, if any.
    pub fn hint(&self) -> Option<(Pos, Pos)> {
        find_legal_move(&self.grid)
    }

    /// Swap two adjacent cells and resolve everything that follows.
    ///
    /// A swap with no match is undone and costs nothing. A matching swap, or one
    /// that fires a colour bomb or special pair, costs exactly one move and runs
    /// to completion: cascades, a reshuffle if the board is dead, then the level
    /// end check.
    #[instrument(skip(self), fields(level = self.state.level))]
    pub fn attempt_swap(&mut self, a: Pos, b: Pos) -> Result<SwapOutcome, SwapError> {
        self.validate_swap(a, b)?;

        let (Some(&ta), Some(&tb)) = (self.grid.get(a), self.grid.get(b)) else {
            return Err(SwapError::OutOfBounds(a));
        };
        let first = if is_direct_trigger(&ta, &tb) {
            Trigger::Direct { a, b }
        } else {
            self.grid.swap(a, b);
            if !(run_through(&self.grid, a) || run_through(&self.grid, b)) {
                self.grid.swap(a, b);
                debug!(%a, %b, "no match, swap reverted");
                return Ok(SwapOutcome::Reverted);
            }
            Trigger::Matches { swap: Some((a, b)) }
        };

        self.state.phase = Phase::Resolving;
        self.state.combo = 0;
        self.state.moves_left = self.state.moves_left.saturating_sub(1);

        let steps = self.run_cascade(first);
        let shuffled = self.recover_stalemate();

        self.state.phase = Phase::Idle;
        self.check_level_end();

        Ok(SwapOutcome::Resolved(Resolution {
            steps,
            shuffled,
            score: self.state.score,
            moves_left: self.state.moves_left,
            status: self.state.status,
        }))
    }

    fn validate_swap(&self, a: Pos, b: Pos) -> Result<(), SwapError> {
        if self.state.status.is_over() {
            return Err(SwapError::LevelOver);
        }
        if self.state.phase != Phase::Idle {
            return Err(SwapError::NotIdle);
        }
        for p in [a, b] {
            match self.grid.get(p) {
                None => return Err(SwapError::OutOfBounds(p)),
                Some(t) if t.is_wall() => return Err(SwapError::WallInvolved(p)),
                Some(_) => {}
            }
        }
        if !a.is_adjacent(b) {
            return Err(SwapError::NotAdjacent(a, b));
        }
        Ok(())
    }

    /// Resolve steps until the board settles with no runs. The combo multiplier is
    /// 1 for the first step and grows by one per cascade.
    fn run_cascade(&mut self, first: Trigger) -> Vec<StepReport> {
        let mut steps = Vec::new();
        let mut trigger = first;
        loop {
            let combo = self.state.combo + 1;
            let Some(report) = resolve_step(
                &mut self.grid,
                trigger,
                combo,
                self.config.num_colors,
                &mut self.rng,
            ) else {
                break;
            };
            self.state.combo = combo;
            self.state.score = self.state.score.saturating_add(report.score_delta);
            steps.push(report);
            trigger = Trigger::Matches { swap: None };
        }
        steps
    }

    fn recover_stalemate(&mut self) -> bool {
        if has_legal_move(&self.grid) {
            return false;
        }
        self.state.phase = Phase::Shuffling;
        info!("no legal move left, shuffling");
        shuffle(&mut self.grid, self.config.num_colors, &mut self.rng);
        true
    }

    fn check_level_end(&mut self) {
        let status = if self.state.score >= self.config.target_score {
            LevelStatus::Won
        } else if self.state.moves_left == 0 {
            LevelStatus::Lost
        } else {
            return;
        };
        self.state.status = status;
        info!(
            level = self.state.level,
            score = self.state.score,
            ?status,
            "level finished"
        );
        self.submit_result();
    }

    /// Fire-and-forget: failures are logged and never touch game state.
    fn submit_result(&self) {
        if self.player == GUEST {
            debug!("guest player, score not submitted");
            return;
        }
        let report = ScoreReport {
            player: self.player.clone(),
            level: self.state.level,
            score: self.state.score,
            won: self.state.status == LevelStatus::Won,
        };
        if let Err(err) = self.submitter.submit(&report) {
            warn!(error = %err, "score submission failed");
        }
    }

    /// Begin the next level with its standard goals, keeping board shape, colour
    /// count and wall health.
    pub fn next_level(&mut self) -> Result<(), ConfigError> {
        let level = self.state.level + 1;
        let config = LevelConfig {
            width: self.config.width,
            height: self.config.height,
            num_colors: self.config.num_colors,
            wall_health: self.config.wall_health,
            ..LevelConfig::for_level(level)
        };
        self.start_level(level, config)
    }

    /// Replay the current level on a fresh board.
    pub fn restart_level(&mut self) -> Result<(), ConfigError> {
        self.start_level(self.state.level, self.config.clone())
    }

    /// Reset counters and generate a new board for `level`.
    #[instrument(skip(self, config))]
    pub fn start_level(&mut self, level: u32, config: LevelConfig) -> Result<(), ConfigError> {
        config.validate()?;
        self.grid = initialize_grid(&config, &mut self.rng);
        self.state = SessionState {
            level: level.max(1),
            moves_left: config.moves,
            ..SessionState::default()
        };
        info!(
            target = config.target_score,
            moves = config.moves,
            walls = config.wall_count,
            ice = config.ice_count,
            "level started"
        );
        self.config = config;
        Ok(())
    }
}
