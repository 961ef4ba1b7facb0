//! Core game logic for the self-playing hook snake
//!
//! This module contains all the game logic without any I/O or rendering dependencies.
//! Drivers call [`GameEngine::step`] once per tick and hand the returned
//! [`Snapshot`] and [`HookFrame`]s to whatever presents them.

pub mod config;
pub mod direction;
pub mod engine;
pub mod error;
pub mod navigator;
pub mod snapshot;
pub mod spawner;
pub mod state;

// Re-export commonly used types
pub use config::GameConfig;
pub use direction::Direction;
pub use engine::{GameEngine, StepResult};
pub use error::{ConfigError, GameError, SpawnError};
pub use navigator::{select_target, Navigator, TargetSelection};
pub use snapshot::{hook_frames, Capture, HookFrame, Snapshot};
pub use spawner::{RandomSpawner, ScriptedSpawner, SpawnRegion, TargetSpawner};
pub use state::{GameState, GameStatus, Position, Snake, TerminationReason};
