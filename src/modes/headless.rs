//! Rendering-free runner.
//!
//! Plays one game as fast as possible, optionally writing every snapshot as
//! a JSON line, and reports the outcome. Useful for scripting and for
//! checking the heuristic without a terminal.

use anyhow::{Context, Result};
use std::io::Write;
use tracing::info;

use crate::game::{GameConfig, GameEngine, RandomSpawner, TargetSpawner, TerminationReason};

/// Outcome of a headless run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeadlessReport {
    pub score: u32,
    pub ticks: u32,
    pub radius: u32,
    /// None when the tick limit stopped the run first
    pub outcome: Option<TerminationReason>,
}

impl HeadlessReport {
    pub fn message(&self) -> String {
        match self.outcome {
            Some(reason) => format!(
                "Game over! Final score: {} ({} after {} ticks, hook radius {})",
                self.score,
                reason.as_str(),
                self.ticks,
                self.radius
            ),
            None => format!(
                "Stopped after {} ticks. Score: {} (hook radius {})",
                self.ticks, self.score, self.radius
            ),
        }
    }
}

pub struct HeadlessMode<S: TargetSpawner> {
    engine: GameEngine<S>,
    max_ticks: Option<u32>,
    emit_snapshots: bool,
}

impl HeadlessMode<RandomSpawner> {
    pub fn new(config: GameConfig, seed: Option<u64>) -> Result<Self> {
        let engine = match seed {
            Some(seed) => GameEngine::seeded(config, seed),
            None => GameEngine::new(config),
        }
        .context("Failed to create game engine")?;
        Ok(Self::with_engine(engine))
    }
}

impl<S: TargetSpawner> HeadlessMode<S> {
    pub fn with_engine(engine: GameEngine<S>) -> Self {
        Self {
            engine,
            max_ticks: None,
            emit_snapshots: false,
        }
    }

    /// Stop after this many ticks even if the snake is still alive
    pub fn max_ticks(mut self, limit: Option<u32>) -> Self {
        self.max_ticks = limit;
        self
    }

    /// Write each snapshot to the output as a JSON line
    pub fn emit_snapshots(mut self, emit: bool) -> Self {
        self.emit_snapshots = emit;
        self
    }

    /// Play a single game to completion or to the tick limit
    pub fn run<W: Write>(&mut self, mut out: W) -> Result<HeadlessReport> {
        let mut state = self.engine.reset().context("Failed to start game")?;

        if self.emit_snapshots {
            self.write_line(&mut out, &self.engine.snapshot(&state))?;
        }

        while state.is_running() && self.max_ticks.map_or(true, |max| state.steps < max) {
            let result = self
                .engine
                .step(&mut state)
                .with_context(|| format!("Game step {} failed", state.steps))?;

            if self.emit_snapshots {
                self.write_line(&mut out, &result.snapshot)?;
            }
        }

        out.flush().context("Failed to flush snapshot output")?;

        let report = HeadlessReport {
            score: state.score,
            ticks: state.steps,
            radius: state.radius,
            outcome: state.outcome(),
        };
        info!(score = report.score, ticks = report.ticks, "headless run finished");

        Ok(report)
    }

    fn write_line<W: Write, T: serde::Serialize>(&self, out: &mut W, value: &T) -> Result<()> {
        serde_json::to_writer(&mut *out, value).context("Failed to serialize snapshot")?;
        writeln!(out).context("Failed to write snapshot")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Direction, Position, ScriptedSpawner};

    #[test]
    fn test_tick_limit() {
        let mut mode = HeadlessMode::new(GameConfig::default(), Some(4))
            .unwrap()
            .max_ticks(Some(25));
        let report = mode.run(Vec::new()).unwrap();

        assert!(report.ticks <= 25);
        if report.outcome.is_none() {
            assert_eq!(report.ticks, 25);
        }
        assert!(report.radius >= 1);
        assert!(report.score <= report.ticks);
    }

    #[test]
    fn test_emits_one_line_per_tick() {
        let mut mode = HeadlessMode::new(GameConfig::small(), Some(9))
            .unwrap()
            .max_ticks(Some(10))
            .emit_snapshots(true);
        let mut out = Vec::new();
        let report = mode.run(&mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), report.ticks as usize + 1);

        let first: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first["ticks"], 0);
        assert_eq!(first["grid_width"], 10);
        let last: serde_json::Value = serde_json::from_str(lines[lines.len() - 1]).unwrap();
        assert_eq!(last["ticks"], report.ticks);
    }

    #[test]
    fn test_scripted_run_captures() {
        let mut config = GameConfig::small();
        config.initial_head = Some(Position::new(5, 5));
        config.initial_heading = Direction::Up;
        // The snake walks straight into these, one per tick
        let spawner = ScriptedSpawner::new([
            Position::new(5, 4),
            Position::new(5, 3),
            Position::new(5, 2),
            Position::new(4, 2),
        ]);
        let engine = GameEngine::with_spawner(config, spawner).unwrap();
        let mut mode = HeadlessMode::with_engine(engine).max_ticks(Some(3));

        let report = mode.run(Vec::new()).unwrap();

        assert_eq!(report.outcome, None);
        assert_eq!(report.ticks, 3);
        assert_eq!(report.score, 3);
        assert_eq!(report.radius, 4);
    }

    #[test]
    fn test_report_message() {
        let report = HeadlessReport {
            score: 4,
            ticks: 90,
            radius: 5,
            outcome: Some(TerminationReason::SelfCollision),
        };
        assert_eq!(
            report.message(),
            "Game over! Final score: 4 (ran into itself after 90 ticks, hook radius 5)"
        );
    }
}
