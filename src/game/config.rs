use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{fs, path::Path, time::Duration};

use super::{
    direction::Direction,
    error::ConfigError,
    spawner::SpawnRegion,
    state::{Position, Snake},
};

/// Largest accepted grid width or height
pub const MAX_GRID_SIDE: usize = 4096;

/// Configuration for the game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Width of the game grid
    pub grid_width: usize,
    /// Height of the game grid
    pub grid_height: usize,
    /// Length of the snake (constant for the whole game)
    pub initial_snake_length: usize,
    /// Heading at game start
    pub initial_heading: Direction,
    /// Head cell at game start; the grid center when unset
    pub initial_head: Option<Position>,

    // Grappling hook
    /// Capture radius at game start
    pub initial_radius: u32,
    /// Upper bound for the capture radius
    pub max_radius: u32,

    // Targets
    /// Number of targets kept on the board
    pub target_count: usize,
    /// Distance kept between spawned targets and every wall
    pub spawn_padding: usize,
    /// Random draws before falling back to exact free-cell sampling
    pub spawn_attempts: usize,

    // Pacing
    /// Game ticks per second
    pub tick_rate_hz: u32,
    /// Interpolation steps of the hook animation
    pub hook_frames: u32,
    /// Delay between hook animation frames
    pub hook_frame_delay_ms: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_width: 40,
            grid_height: 30,
            initial_snake_length: 1,
            initial_heading: Direction::Up,
            initial_head: None,
            initial_radius: 1,
            max_radius: 10,
            target_count: 1,
            spawn_padding: 2,
            spawn_attempts: 1000,
            tick_rate_hz: 5,
            hook_frames: 5,
            hook_frame_delay_ms: 30,
        }
    }
}

impl GameConfig {
    /// Create a new configuration with custom grid size
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            grid_width: width,
            grid_height: height,
            ..Default::default()
        }
    }

    /// Create a small grid for testing
    pub fn small() -> Self {
        Self::new(10, 10)
    }

    /// Load a configuration from a JSON file; absent fields keep their defaults
    pub fn from_file(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {:?}", path))?;
        let config: Self = serde_json::from_str(&json)
            .with_context(|| format!("Failed to parse config file {:?}", path))?;
        Ok(config)
    }

    /// Head cell at game start
    pub fn start_head(&self) -> Position {
        self.initial_head.unwrap_or_else(|| {
            Position::new((self.grid_width / 2) as i32, (self.grid_height / 2) as i32)
        })
    }

    /// Snake at game start
    pub fn initial_snake(&self) -> Snake {
        Snake::new(
            self.start_head(),
            self.initial_heading,
            self.initial_snake_length,
        )
    }

    /// Cells new targets may be placed on
    pub fn spawn_region(&self) -> SpawnRegion {
        let pad = self.spawn_padding as i32;
        SpawnRegion {
            min: Position::new(pad, pad),
            max: Position::new(
                self.grid_width as i32 - 1 - pad,
                self.grid_height as i32 - 1 - pad,
            ),
        }
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_secs_f64(1.0 / f64::from(self.tick_rate_hz.max(1)))
    }

    pub fn hook_frame_delay(&self) -> Duration {
        Duration::from_millis(self.hook_frame_delay_ms)
    }

    /// Reject configurations the engine cannot run
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid_width <= 4 || self.grid_height <= 4 {
            return Err(ConfigError::GridTooSmall {
                width: self.grid_width,
                height: self.grid_height,
            });
        }

        if self.grid_width > MAX_GRID_SIDE || self.grid_height > MAX_GRID_SIDE {
            return Err(ConfigError::GridTooLarge {
                width: self.grid_width,
                height: self.grid_height,
                max: MAX_GRID_SIDE,
            });
        }

        let min_side = self.grid_width.min(self.grid_height);
        if self.spawn_padding.saturating_mul(2) >= min_side {
            return Err(ConfigError::NoSpawnRegion {
                width: self.grid_width,
                height: self.grid_height,
                padding: self.spawn_padding,
            });
        }

        if self.initial_radius == 0 {
            return Err(ConfigError::ZeroRadius);
        }

        if self.max_radius < self.initial_radius {
            return Err(ConfigError::RadiusRange {
                initial: self.initial_radius,
                max: self.max_radius,
            });
        }

        if self.initial_snake_length == 0 {
            return Err(ConfigError::EmptySnake);
        }

        let cells = self.grid_width * self.grid_height;
        if self.initial_snake_length > cells {
            return Err(ConfigError::SnakeTooLong {
                length: self.initial_snake_length,
                cells,
            });
        }

        let (w, h) = (self.grid_width as i32, self.grid_height as i32);
        let out_of_grid = |p: &Position| p.x < 0 || p.x >= w || p.y < 0 || p.y >= h;
        let head = self.start_head();
        let stray = if out_of_grid(&head) {
            Some(head)
        } else {
            self.initial_snake().body.into_iter().find(out_of_grid)
        };
        if let Some(cell) = stray {
            return Err(ConfigError::SnakeOutOfBounds {
                x: cell.x,
                y: cell.y,
                width: self.grid_width,
                height: self.grid_height,
            });
        }

        if self.tick_rate_hz == 0 {
            return Err(ConfigError::ZeroTickRate);
        }

        if self.hook_frames == 0 {
            return Err(ConfigError::ZeroHookFrames);
        }

        if self.target_count == 0 {
            return Err(ConfigError::NoTargets);
        }

        if self.spawn_attempts == 0 {
            return Err(ConfigError::ZeroSpawnAttempts);
        }

        Ok(())
    }
}
