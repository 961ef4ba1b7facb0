//! Terminal rendering of game snapshots

pub mod renderer;

pub use renderer::{hook_line_cells, Renderer};
