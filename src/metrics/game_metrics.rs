use std::time::{Duration, Instant};

use crate::game::TerminationReason;

/// Session statistics across consecutive self-played games
pub struct GameMetrics {
    pub start_time: Instant,
    pub elapsed_time: Duration,
    pub games_played: u32,
    pub high_score: u32,
    pub best_radius: u32,
    pub last_score: Option<u32>,
    pub last_outcome: Option<TerminationReason>,
}

impl GameMetrics {
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            elapsed_time: Duration::ZERO,
            games_played: 0,
            high_score: 0,
            best_radius: 0,
            last_score: None,
            last_outcome: None,
        }
    }

    pub fn update(&mut self) {
        self.elapsed_time = self.start_time.elapsed();
    }

    pub fn on_game_start(&mut self) {
        self.start_time = Instant::now();
        self.elapsed_time = Duration::ZERO;
    }

    pub fn on_game_over(&mut self, final_score: u32, radius: u32, reason: TerminationReason) {
        self.games_played += 1;
        self.high_score = self.high_score.max(final_score);
        self.best_radius = self.best_radius.max(radius);
        self.last_score = Some(final_score);
        self.last_outcome = Some(reason);
    }

    pub fn format_time(&self) -> String {
        let total_secs = self.elapsed_time.as_secs();
        format!("{:02}:{:02}", total_secs / 60, total_secs % 60)
    }

    /// One-line session report printed when the driver exits
    pub fn summary(&self) -> String {
        match (self.last_score, self.last_outcome) {
            (Some(score), Some(reason)) => format!(
                "Game over! Final score: {} ({}) | games: {} | high score: {} | best hook: {}",
                score,
                reason.as_str(),
                self.games_played,
                self.high_score,
                self.best_radius
            ),
            _ => "No game finished".to_string(),
        }
    }
}

impl Default for GameMetrics {
    fn default() -> Self {
        Self::new()
    }
}
