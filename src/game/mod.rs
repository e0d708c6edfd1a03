//! Core game logic module for Snake
//!
//! This module contains all the game logic without any I/O or rendering dependencies.
//! The engine is driven by an external tick source and consumes player intents.

pub mod action;
pub mod config;
pub mod engine;
pub mod state;

// Re-export commonly used types
pub use action::{Direction, Intent};
pub use config::{ConfigError, GameConfig, INITIAL_SNAKE_LENGTH};
pub use engine::{GameEngine, TickResult};
pub use state::{CollisionType, GameState, Position, RunState, Snake};
