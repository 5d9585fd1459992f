//! Score submission: one report per finished level, appended as JSON lines
//! (XDG config or ~/.config/balloon-crush).

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs::{self, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

const APP_DIR: &str = "balloon-crush";
const FILENAME: &str = "scores.jsonl";

/// Anonymous player name; guests never submit.
pub const GUEST: &str = "GUEST";

/// Final result of one level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreReport {
    pub player: String,
    pub level: u32,
    pub score: u32,
    pub won: bool,
}

/// Receives level results. Callers log and ignore errors: a failed submission
/// never affects the game.
pub trait ScoreSubmitter: Send {
    fn submit(&self, report: &ScoreReport) -> Result<()>;
}

/// Discards every report.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSubmitter;

impl ScoreSubmitter for NoopSubmitter {
    fn submit(&self, _report: &ScoreReport) -> Result<()> {
        Ok(())
    }
}

/// Appends each report as one JSON line.
#[derive(Debug, Clone)]
pub struct FileSubmitter {
    path: PathBuf,
}

impl FileSubmitter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Submitter writing to the default scores file.
    pub fn default_location() -> Self {
        Self::new(config_path())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ScoreSubmitter for FileSubmitter {
    fn submit(&self, report: &ScoreReport) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let mut f = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(f, "{}", serde_json::to_string(report)?)?;
        Ok(())
    }
}

/// Default scores file: `$XDG_CONFIG_HOME/balloon-crush/scores.jsonl`, falling back to
/// `~/.config` when the variable is unset or empty, and to the working directory
/// without a home.
pub fn config_path() -> PathBuf {
    let env_dir = |key: &str| std::env::var_os(key).filter(|v| !v.is_empty()).map(PathBuf::from);
    env_dir("XDG_CONFIG_HOME")
        .or_else(|| env_dir("HOME").map(|home| home.join(".config")))
        .unwrap_or_default()
        .join(APP_DIR)
        .join(FILENAME)
}

/// Best recorded score for `player`; 0 on a missing file. Unparseable lines are skipped.
pub fn load_best_score(path: &Path, player: &str) -> u32 {
    let content = match fs::read(path) {
        Ok(c) => c,
        Err(_) => return 0,
    };
    BufReader::new(&content[..])
        .lines()
        .map_while(std::result::Result::ok)
        .filter_map(|line| serde_json::from_str::<ScoreReport>(line.trim()).ok())
        .filter(|r| r.player == player)
        .map(|r| r.score)
        .max()
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_submitter_appends_and_best_score_reads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(FILENAME);
        let sink = FileSubmitter::new(&path);
        assert_eq!(sink.path(), path);
        for (level, score) in [(1, 520), (2, 340), (2, 1010)] {
            sink.submit(&ScoreReport {
                player: "ada".into(),
                level,
                score,
                won: score >= 500,
            })
            .unwrap();
        }
        sink.submit(&ScoreReport {
            player: "bob".into(),
            level: 1,
            score: 9000,
            won: true,
        })
        .unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert_eq!(text.lines().count(), 4);
        assert_eq!(load_best_score(&path, "ada"), 1010);
        assert_eq!(load_best_score(&path, "bob"), 9000);
        assert_eq!(load_best_score(&path, "eve"), 0);
    }

    #[test]
    fn default_location_points_at_the_app_scores_file() {
        let sink = FileSubmitter::default_location();
        assert!(sink.path().ends_with("balloon-crush/scores.jsonl"));
        assert_eq!(sink.path(), config_path());
    }

    #[test]
    fn missing_or_corrupt_file_reads_as_zero() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(FILENAME);
        assert_eq!(load_best_score(&path, "ada"), 0);
        fs::write(&path, "not json\n{\"player\":\"ada\",\"level\":1,\"score\":70,\"won\":false}\n")
            .unwrap();
        assert_eq!(load_best_score(&path, "ada"), 70);
    }
}
