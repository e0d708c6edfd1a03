use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Length of the snake at the start of every session
pub const INITIAL_SNAKE_LENGTH: usize = 3;

/// Reasons a configuration cannot host a game
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("grid dimensions must be non-zero (got {width}x{height})")]
    ZeroDimension { width: usize, height: usize },

    #[error("grid width {width} is too narrow for the initial snake of length {required}")]
    GridTooNarrow { width: usize, required: usize },

    #[error("grid {width}x{height} does not fit a terminal at cell width {cell_width}")]
    GridTooLarge {
        width: usize,
        height: usize,
        cell_width: u16,
    },

    #[error("grid {width}x{height} leaves no free cell for food")]
    NoRoomForFood { width: usize, height: usize },

    #[error("tick interval must be at least 1ms")]
    ZeroTickInterval,

    #[error("cell width must be at least one column")]
    ZeroCellWidth,
}

/// Configuration for the game
///
/// Fixed for the lifetime of an engine; there is no runtime reconfiguration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Width of the game grid in cells
    pub grid_width: usize,
    /// Height of the game grid in cells
    pub grid_height: usize,
    /// Milliseconds between two simulation ticks
    pub tick_interval_ms: u64,
    /// Terminal columns used to draw one cell (render only)
    pub cell_width: u16,
    /// Seed for food placement; random when absent
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_width: 30,
            grid_height: 30,
            tick_interval_ms: 100,
            cell_width: 2,
            seed: None,
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

    /// Same configuration with a fixed food seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Load a configuration from a JSON file; missing fields take defaults
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        serde_json::from_str(&json)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    /// Terminal columns and rows the bordered board needs
    ///
    /// `None` when it cannot be addressed in terminal coordinates. Every grid
    /// that passes [`validate`](Self::validate) fits, which also keeps cell
    /// coordinates well inside `i32`.
    pub fn board_size(&self) -> Option<(u16, u16)> {
        let columns = u16::try_from(self.grid_width)
            .ok()?
            .checked_mul(self.cell_width)?
            .checked_add(2)?;
        let rows = u16::try_from(self.grid_height).ok()?.checked_add(2)?;
        Some((columns, rows))
    }

    /// Check that a session can be started on this configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        let (width, height) = (self.grid_width, self.grid_height);

        if width == 0 || height == 0 {
            return Err(ConfigError::ZeroDimension { width, height });
        }
        if width < INITIAL_SNAKE_LENGTH {
            return Err(ConfigError::GridTooNarrow {
                width,
                required: INITIAL_SNAKE_LENGTH,
            });
        }
        if self.board_size().is_none() {
            return Err(ConfigError::GridTooLarge {
                width,
                height,
                cell_width: self.cell_width,
            });
        }
        if width.saturating_mul(height) <= INITIAL_SNAKE_LENGTH {
            return Err(ConfigError::NoRoomForFood { width, height });
        }
        if self.tick_interval_ms == 0 {
            return Err(ConfigError::ZeroTickInterval);
        }
        if self.cell_width == 0 {
            return Err(ConfigError::ZeroCellWidth);
        }

        Ok(())
    }
}
