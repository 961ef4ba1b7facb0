//! Read-only views of the game handed to renderers and exporters.

use serde::Serialize;

use super::{
    direction::Direction,
    state::{GameState, GameStatus, Position},
};

/// Immutable copy of the board after a tick
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    /// Snake cells, head first
    pub snake: Vec<Position>,
    pub targets: Vec<Position>,
    pub heading: Direction,
    pub radius: u32,
    pub max_radius: u32,
    pub score: u32,
    pub ticks: u32,
    pub status: GameStatus,
    pub grid_width: usize,
    pub grid_height: usize,
}

impl Snapshot {
    pub fn capture(state: &GameState, max_radius: u32) -> Self {
        Self {
            snake: state.snake.body.clone(),
            targets: state.targets.clone(),
            heading: state.snake.direction,
            radius: state.radius,
            max_radius,
            score: state.score,
            ticks: state.steps,
            status: state.status,
            grid_width: state.grid_width,
            grid_height: state.grid_height,
        }
    }

    pub fn head(&self) -> Option<Position> {
        self.snake.first().copied()
    }

    pub fn is_running(&self) -> bool {
        self.status == GameStatus::Running
    }
}

/// A target collected by the hook
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Capture {
    /// Head position before the move that triggered the capture
    pub origin: Position,
    pub target: Position,
    /// Capture radius after growth
    pub radius: u32,
    /// Score after the capture
    pub score: u32,
}

/// One step of the hook reel-in animation, in grid cell coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HookFrame {
    pub progress: f64,
    pub x: f64,
    pub y: f64,
}

impl HookFrame {
    /// Cell the hook head is drawn in
    pub fn cell(&self) -> Position {
        Position::new(self.x.round() as i32, self.y.round() as i32)
    }
}

/// Straight-line interpolation from the capture origin to the target.
///
/// Yields `frames + 1` frames: progress runs from 0.0 to exactly 1.0.
pub fn hook_frames(capture: &Capture, frames: u32) -> Vec<HookFrame> {
    let frames = frames.max(1);
    let (x0, y0) = (f64::from(capture.origin.x), f64::from(capture.origin.y));
    let (x1, y1) = (f64::from(capture.target.x), f64::from(capture.target.y));

    (0..=frames)
        .map(|i| {
            let progress = f64::from(i) / f64::from(frames);
            HookFrame {
                progress,
                x: x0 + (x1 - x0) * progress,
                y: y0 + (y1 - y0) * progress,
            }
        })
        .collect()
}
