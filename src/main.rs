use anyhow::{Context, Result};
use clap::Parser;
use snake_core::game::{Difficulty, GameConfig, GridPreset};
use snake_core::modes::HumanMode;
use snake_core::storage::{FileStore, MemoryStore, ScoreStore, app_data_dir};
use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "snake")]
#[command(version, about = "Terminal snake that speeds up as you eat")]
struct Cli {
    /// Starting speed
    #[arg(long, value_enum)]
    difficulty: Option<Difficulty>,

    /// Board size preset
    #[arg(long, value_enum, conflicts_with = "grid_size")]
    grid: Option<GridPreset>,

    /// Board side length in tiles
    #[arg(long)]
    grid_size: Option<usize>,

    /// TOML file with game settings; flags given here take precedence
    #[arg(long)]
    config: Option<PathBuf>,

    /// File holding the high score
    #[arg(long)]
    scores: Option<PathBuf>,

    /// Do not read or write the high score file
    #[arg(long, conflicts_with = "scores")]
    no_save: bool,

    /// Log file (the terminal itself is used by the game)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

impl Cli {
    fn game_config(&self) -> Result<GameConfig> {
        let mut config = match &self.config {
            Some(path) => GameConfig::from_toml_file(path)
                .with_context(|| format!("Failed to load config from {:?}", path))?,
            None => GameConfig::default(),
        };

        if let Some(difficulty) = self.difficulty {
            config.difficulty = difficulty;
        }
        if let Some(preset) = self.grid {
            config.grid_size = preset.tiles();
        }
        if let Some(size) = self.grid_size {
            config.grid_size = size;
        }

        config.validate().context("Invalid game settings")?;
        Ok(config)
    }

    fn score_store(&self) -> Box<dyn ScoreStore> {
        if self.no_save {
            return Box::new(MemoryStore::new());
        }
        let path = self.scores.clone().unwrap_or_else(FileStore::default_path);
        Box::new(FileStore::new(path))
    }
}

fn init_tracing(log_file: Option<PathBuf>) -> Result<()> {
    let path = log_file.unwrap_or_else(|| app_data_dir().join("snake.log"));
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create log directory {:?}", parent))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("Failed to open log file {:?}", path))?;

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "snake=info,snake_core=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .init();

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = cli.game_config()?;
    init_tracing(cli.log_file.clone())?;

    tracing::info!(?config, "starting snake");

    let mut human_mode = HumanMode::new(config, cli.score_store());
    human_mode.run().await?;

    Ok(())
}
