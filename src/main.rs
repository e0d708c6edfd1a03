use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use snake_tui::game::GameConfig;
use snake_tui::logging::{LogLevel, init_file_logger};
use snake_tui::modes::HumanMode;

#[derive(Parser)]
#[command(name = "snake_tui")]
#[command(version, about = "Snake in the terminal")]
struct Cli {
    /// JSON config file; flags below override its values
    #[arg(long)]
    config: Option<PathBuf>,

    /// Grid width in cells [default: 30]
    #[arg(long)]
    width: Option<usize>,

    /// Grid height in cells [default: 30]
    #[arg(long)]
    height: Option<usize>,

    /// Milliseconds between moves [default: 100]
    #[arg(long)]
    tick_ms: Option<u64>,

    /// Terminal columns per cell [default: 2]
    #[arg(long)]
    cell_width: Option<u16>,

    /// Seed for food placement
    #[arg(long)]
    seed: Option<u64>,

    /// Write logs to this file
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Log verbosity
    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    log_level: LogLevel,
}

impl Cli {
    /// Merge the config file (or defaults) with explicit flags
    fn game_config(&self) -> Result<GameConfig> {
        let mut config = match &self.config {
            Some(path) => GameConfig::load(path)?,
            None => GameConfig::default(),
        };

        if let Some(width) = self.width {
            config.grid_width = width;
        }
        if let Some(height) = self.height {
            config.grid_height = height;
        }
        if let Some(tick_ms) = self.tick_ms {
            config.tick_interval_ms = tick_ms;
        }
        if let Some(cell_width) = self.cell_width {
            config.cell_width = cell_width;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }

        config.validate()?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(path) = &cli.log_file {
        init_file_logger(path, cli.log_level)?;
    }

    // Fail before touching the terminal
    let config = cli.game_config()?;
    log::info!("Starting with {:?}", config);

    let mut human_mode = HumanMode::new(config)?;
    human_mode.run().await?;

    Ok(())
}
