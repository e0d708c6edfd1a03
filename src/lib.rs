//! Snake - a terminal Snake game
//!
//! This library provides:
//! - Core game logic with no I/O (game module)
//! - Key to intent mapping (input module)
//! - TUI rendering (render module)
//! - Session stats (metrics module)
//! - The interactive driver (modes module)

pub mod game;
pub mod input;
pub mod logging;
pub mod metrics;
pub mod modes;
pub mod render;
