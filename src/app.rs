//! App: session setup, the autoplay loop and the interactive stdin loop.

use crate::input::{Command, HELP, line_to_command};
use crate::{Args, PlayMode};
use anyhow::{Context, Result};
use balloon_crush::event::RemovalReason;
use balloon_crush::highscores::{ScoreSubmitter, load_best_score};
use balloon_crush::{GameSession, LevelConfig, LevelStatus, Resolution, SwapError, SwapOutcome};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use tracing::{debug, warn};

pub struct App {
    args: Args,
    session: GameSession,
    scores_path: PathBuf,
    best_score: u32,
}

impl App {
    pub fn new(
        args: Args,
        config: LevelConfig,
        scores_path: PathBuf,
        submitter: Box<dyn ScoreSubmitter>,
    ) -> Result<Self> {
        let session = match args.seed {
            Some(seed) => GameSession::with_seed(config, seed),
            None => GameSession::new(config),
        }
        .context("could not start level")?
        .with_player(args.player.clone())
        .with_submitter(submitter)
        .at_level(args.level);
        let best_score = load_best_score(&scores_path, &args.player);
        Ok(Self {
            args,
            session,
            scores_path,
            best_score,
        })
    }

    pub fn run(&mut self) -> Result<()> {
        let mut out = io::stdout().lock();
        writeln!(
            out,
            "player {} | best {} ({})",
            self.args.player,
            self.best_score,
            self.scores_path.display()
        )?;
        match self.args.mode {
            PlayMode::Autoplay => self.autoplay(&mut out),
            PlayMode::Interactive => {
                let stdin = io::stdin();
                self.interactive(stdin.lock(), &mut out)
            }
        }
    }

    fn banner(&self, out: &mut impl Write) -> Result<()> {
        let cfg = self.session.config();
        writeln!(
            out,
            "\nlevel {} | target {} | moves {} | {}x{} {} colours",
            self.session.level(),
            cfg.target_score,
            cfg.moves,
            cfg.width,
            cfg.height,
            cfg.num_colors
        )?;
        writeln!(out, "{}", self.session.grid())?;
        Ok(())
    }

    /// Play hinted moves until the level ends; advance while levels remain and
    /// the previous one was won.
    fn autoplay(&mut self, out: &mut impl Write) -> Result<()> {
        let last_level = self.session.level() + self.args.levels.max(1) - 1;
        loop {
            self.banner(out)?;
            while !self.session.status().is_over() {
                let Some((a, b)) = self.session.hint() else {
                    warn!("no hint on an idle board");
                    break;
                };
                match self.session.attempt_swap(a, b)? {
                    SwapOutcome::Resolved(res) => {
                        writeln!(out, "{a} <-> {b}: {}", summarize(&res))?;
                    }
                    SwapOutcome::Reverted => debug!(%a, %b, "hint reverted"),
                }
            }
            self.finish_level(out)?;
            if self.session.status() != LevelStatus::Won || self.session.level() >= last_level {
                return Ok(());
            }
            self.session.next_level()?;
        }
    }

    fn interactive(&mut self, input: impl BufRead, out: &mut impl Write) -> Result<()> {
        self.banner(out)?;
        writeln!(out, "{HELP}")?;
        for line in input.lines() {
            let line = line?;
            match line_to_command(&line) {
                Command::Quit => break,
                Command::Help => writeln!(out, "{HELP}")?,
                Command::Show => writeln!(out, "{}", self.session.grid())?,
                Command::Hint => match self.session.hint() {
                    Some((a, b)) => writeln!(out, "try {a} <-> {b}")?,
                    None => writeln!(out, "no move available")?,
                },
                Command::Unknown(text) => writeln!(out, "unknown command {text:?}; try help")?,
                Command::Swap(a, b) => match self.session.attempt_swap(a, b) {
                    Ok(SwapOutcome::Reverted) => writeln!(out, "no match, swap undone")?,
                    Ok(SwapOutcome::Resolved(res)) => {
                        writeln!(out, "{}", summarize(&res))?;
                        writeln!(out, "{}", self.session.grid())?;
                        if res.status.is_over() {
                            self.finish_level(out)?;
                            if res.status == LevelStatus::Won {
                                self.session.next_level()?;
                            } else {
                                self.session.restart_level()?;
                            }
                            self.banner(out)?;
                        }
                    }
                    Err(err @ SwapError::LevelOver) => return Err(err.into()),
                    Err(err) => writeln!(out, "rejected: {err}")?,
                },
            }
        }
        Ok(())
    }

    fn finish_level(&mut self, out: &mut impl Write) -> Result<()> {
        let score = self.session.score();
        let verdict = match self.session.status() {
            LevelStatus::Won => "cleared",
            LevelStatus::Lost => "failed",
            LevelStatus::InProgress => "stopped",
        };
        let mut line = format!("level {} {verdict} with {score} points", self.session.level());
        if score > self.best_score {
            self.best_score = score;
            line.push_str(" (new best)");
        }
        writeln!(out, "{line}")?;
        Ok(())
    }
}

/// One-line summary of a resolution: cascade depth, clears, obstacles, points.
fn summarize(res: &Resolution) -> String {
    let cleared: usize = res.steps.iter().map(|s| s.cleared_count()).sum();
    let ice: usize = res.steps.iter().map(|s| s.ice_broken.len()).sum();
    let walls = res
        .steps
        .iter()
        .flat_map(|s| s.removed_by(RemovalReason::WallBroken))
        .count();
    let specials: Vec<String> = res
        .steps
        .iter()
        .filter_map(|s| s.special)
        .filter(|c| c.placed)
        .map(|c| format!("{:?}@{}", c.kind, c.pos))
        .collect();
    let mut text = format!(
        "{} step(s), {cleared} cleared, +{} -> {} | {} moves left",
        res.steps.len(),
        res.score_gained(),
        res.score,
        res.moves_left
    );
    if ice > 0 {
        text.push_str(&format!(", {ice} ice broken"));
    }
    if walls > 0 {
        text.push_str(&format!(", {walls} wall(s) broken"));
    }
    if !specials.is_empty() {
        text.push_str(&format!(", created {}", specials.join(" ")));
    }
    if res.shuffled {
        text.push_str(", board shuffled");
    }
    text
}
