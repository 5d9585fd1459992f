//! balloon-crush: headless match-3 driver for the Balloon Crush resolution engine.

mod app;
mod input;

use anyhow::{Context, Result};
use app::App;
use balloon_crush::highscores::{FileSubmitter, GUEST, NoopSubmitter, ScoreSubmitter};
use balloon_crush::LevelConfig;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);
    let config = args.level_config();
    config
        .validate()
        .with_context(|| format!("invalid level settings: {config:?}"))?;
    let scores = args
        .scores_file
        .as_ref()
        .map_or_else(FileSubmitter::default_location, FileSubmitter::new);
    let scores_path = scores.path().to_path_buf();
    let submitter: Box<dyn ScoreSubmitter> = if args.no_submit || args.player == GUEST {
        Box::new(NoopSubmitter)
    } else {
        Box::new(scores)
    };
    let mut app = App::new(args, config, scores_path, submitter)?;
    app.run()
}

/// Logs go to stderr so the board printout on stdout stays clean. `RUST_LOG`
/// overrides the level picked by `--verbose`.
fn init_tracing(verbose: bool) {
    let default = if verbose { "balloon_crush=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Match-3 balloon puzzle: swap neighbours, line up three or more, chain cascades.
#[derive(Debug, Parser)]
#[command(
    name = "balloon-crush",
    version,
    about = "Match-3 balloon puzzle: swap neighbours, line up three or more, chain cascades.",
    long_about = "Balloon Crush plays a match-3 board on the terminal without a UI.\n\n\
        In autoplay mode the engine plays its own hinted moves and prints each resolution. \
        In interactive mode commands are read from stdin:\n  \
        swap C R C R   or   C R left|right|up|down (h/l/k/j)\n  \
        hint (?)   show (s)   help   quit (q)\n\n\
        Runs of four make striped balloons, five make colour bombs, crossing runs make area bombs. \
        Ice takes one hit to break; walls take several and block gravity."
)]
pub struct Args {
    /// How moves are chosen: the built-in hint, or commands from stdin.
    #[arg(short, long, default_value = "autoplay")]
    pub mode: PlayMode,

    /// Level to start at. Sets target, ice and walls unless overridden below.
    #[arg(short, long, default_value = "1", value_name = "N")]
    pub level: u32,

    /// Number of levels to play in autoplay before stopping.
    #[arg(long, default_value = "1", value_name = "N")]
    pub levels: u32,

    /// Board width in cells.
    #[arg(long, default_value = "8", value_name = "COLS")]
    pub width: usize,

    /// Board height in cells.
    #[arg(long, default_value = "8", value_name = "ROWS")]
    pub height: usize,

    /// Balloon colours in play (3 to 6).
    #[arg(short, long, default_value = "6", value_name = "N")]
    pub colors: u8,

    /// Moves per level (default: level default).
    #[arg(long, value_name = "N")]
    pub moves: Option<u32>,

    /// Target score (default: 500 per level).
    #[arg(long, value_name = "POINTS")]
    pub target: Option<u32>,

    /// Iced cells (default: level default).
    #[arg(long, value_name = "N")]
    pub ice: Option<usize>,

    /// Walls (default: level default).
    #[arg(long, value_name = "N")]
    pub walls: Option<usize>,

    /// Hits a wall takes before breaking.
    #[arg(long, default_value = "2", value_name = "HITS")]
    pub wall_health: u8,

    /// RNG seed for a reproducible game.
    #[arg(long, value_name = "SEED")]
    pub seed: Option<u64>,

    /// Player name for score reports. GUEST never submits.
    #[arg(short, long, default_value = GUEST, value_name = "NAME")]
    pub player: String,

    /// Scores file (default: $XDG_CONFIG_HOME/balloon-crush/scores.jsonl).
    #[arg(long, value_name = "FILE")]
    pub scores_file: Option<PathBuf>,

    /// Do not record level results.
    #[arg(long)]
    pub no_submit: bool,

    /// Debug logging on stderr.
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    /// Level defaults with the command line overrides applied.
    pub fn level_config(&self) -> LevelConfig {
        let base = LevelConfig::for_level(self.level);
        LevelConfig {
            width: self.width,
            height: self.height,
            num_colors: self.colors,
            wall_health: self.wall_health,
            moves: self.moves.unwrap_or(base.moves),
            target_score: self.target.unwrap_or(base.target_score),
            ice_count: self.ice.unwrap_or(base.ice_count),
            wall_count: self.walls.unwrap_or(base.wall_count),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum PlayMode {
    #[default]
    #[value(alias = "auto")]
    Autoplay,
    #[value(alias = "play")]
    Interactive,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_level_one() {
        let args = Args::parse_from(["balloon-crush"]);
        assert_eq!(args.mode, PlayMode::Autoplay);
        assert_eq!(args.level_config(), LevelConfig::default());
    }

    #[test]
    fn overrides_win_over_level_defaults() {
        let args = Args::parse_from([
            "balloon-crush",
            "--level",
            "3",
            "--colors",
            "4",
            "--walls",
            "0",
            "--target",
            "90",
            "-m",
            "interactive",
        ]);
        let cfg = args.level_config();
        assert_eq!(args.mode, PlayMode::Interactive);
        assert_eq!(cfg.num_colors, 4);
        assert_eq!(cfg.wall_count, 0);
        assert_eq!(cfg.ice_count, 4);
        assert_eq!(cfg.target_score, 90);
    }

    #[test]
    fn oversized_boards_are_rejected_before_play() {
        let args = Args::parse_from(["balloon-crush", "--width", "100000", "--height", "100000"]);
        assert!(matches!(
            args.level_config().validate(),
            Err(balloon_crush::ConfigError::GridTooLarge { .. })
        ));
    }
}
