//! Hook Snake - a self-playing Snake with a grappling hook
//!
//! The snake steers itself toward the nearest target and collects it once
//! the target falls inside a capture radius that grows with every catch.
//!
//! This library provides:
//! - Core game logic: navigator, tick engine, snapshots (game module)
//! - TUI rendering of snapshots (render module)
//! - Key handling for the terminal driver (input module)
//! - Session metrics (metrics module)
//! - Interactive and headless drivers (modes module)

pub mod game;
pub mod input;
pub mod metrics;
pub mod modes;
pub mod render;
