//! Error types for the game core.
//!
//! Collisions are not errors: they end a game through
//! [`GameStatus::Terminated`](super::GameStatus). These types cover the
//! cases where the core cannot run at all.

use thiserror::Error;

/// Rejected game configuration
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("grid must be larger than 4x4, got {width}x{height}")]
    GridTooSmall { width: usize, height: usize },

    #[error("grid sides are limited to {max} cells, got {width}x{height}")]
    GridTooLarge {
        width: usize,
        height: usize,
        max: usize,
    },

    #[error(
        "no room to spawn targets: a {width}x{height} grid leaves no cells {padding} away from every wall"
    )]
    NoSpawnRegion {
        width: usize,
        height: usize,
        padding: usize,
    },

    #[error("initial capture radius must be at least 1")]
    ZeroRadius,

    #[error("maximum capture radius {max} is below the initial radius {initial}")]
    RadiusRange { initial: u32, max: u32 },

    #[error("initial snake length must be at least 1")]
    EmptySnake,

    #[error("initial snake length {length} exceeds the {cells} cells of the grid")]
    SnakeTooLong { length: usize, cells: usize },

    #[error("initial snake body leaves the {width}x{height} grid at ({x}, {y})")]
    SnakeOutOfBounds {
        x: i32,
        y: i32,
        width: usize,
        height: usize,
    },

    #[error("tick rate must be greater than zero")]
    ZeroTickRate,

    #[error("hook animation needs at least one frame")]
    ZeroHookFrames,

    #[error("at least one target must be on the board")]
    NoTargets,

    #[error("spawn attempt budget must be greater than zero")]
    ZeroSpawnAttempts,
}

/// Failure to place a target
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SpawnError {
    #[error("no space to spawn target: every cell in the spawn region is occupied ({attempts} random attempts)")]
    NoSpace { attempts: usize },

    #[error("scripted target sequence exhausted")]
    Exhausted,
}

/// Error raised by the game engine
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Spawn(#[from] SpawnError),
}
