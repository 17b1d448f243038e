use std::path::PathBuf;

use anyhow::{Result, anyhow};
use clap::Parser;
use grid_snake::game::{GameConfig, GameEngine};
use grid_snake::logging;
use grid_snake::modes::PlayMode;
use grid_snake::storage::{JsonFileStore, MemoryStore, ScoreStore};
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "grid_snake")]
#[command(version, about = "Classic grid snake in the terminal")]
struct Cli {
    /// JSON file with game settings; flags below override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Grid width
    #[arg(long)]
    width: Option<usize>,

    /// Grid height
    #[arg(long)]
    height: Option<usize>,

    /// Starting speed in ticks per second
    #[arg(long)]
    speed: Option<u32>,

    /// Lowest selectable speed
    #[arg(long)]
    min_speed: Option<u32>,

    /// Highest selectable speed
    #[arg(long)]
    max_speed: Option<u32>,

    /// Points per food
    #[arg(long)]
    reward: Option<u32>,

    /// Score step that raises the speed by one
    #[arg(long)]
    milestone: Option<u32>,

    /// High score file
    #[arg(long)]
    scores: Option<PathBuf>,

    /// Log file (defaults to grid_snake.log next to the score file)
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Seed for food placement
    #[arg(long)]
    seed: Option<u64>,
}

impl Cli {
    fn game_config(&self) -> Result<GameConfig> {
        let mut config = match &self.config {
            Some(path) => GameConfig::from_json_file(path)?,
            None => GameConfig::default(),
        };

        if let Some(width) = self.width {
            config.grid_width = width;
        }
        if let Some(height) = self.height {
            config.grid_height = height;
        }
        if let Some(speed) = self.speed {
            config.initial_speed = speed;
        }
        if let Some(min_speed) = self.min_speed {
            config.min_speed = min_speed;
        }
        if let Some(max_speed) = self.max_speed {
            config.max_speed = max_speed;
        }
        if let Some(reward) = self.reward {
            config.food_reward = reward;
        }
        if let Some(milestone) = self.milestone {
            config.speed_milestone = milestone;
        }

        config
            .validate()
            .map_err(|msg| anyhow!("Invalid game configuration: {msg}"))?;
        Ok(config)
    }
}

fn open_store(path: PathBuf) -> Box<dyn ScoreStore> {
    match JsonFileStore::open(path) {
        Ok(store) => Box::new(store),
        Err(err) => {
            warn!(error = %err, "high score unavailable, playing without persistence");
            Box::new(MemoryStore::new())
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = cli.game_config()?;
    let score_path = cli.scores.clone().unwrap_or_else(JsonFileStore::default_path);
    let log_path = cli
        .log_file
        .clone()
        .unwrap_or_else(|| logging::default_log_path(&score_path));
    logging::init(&log_path)?;

    info!(?config, scores = ?score_path, "starting");

    let store = open_store(score_path);
    let engine = match cli.seed {
        Some(seed) => GameEngine::with_seed(config, store, seed)?,
        None => GameEngine::new(config, store)?,
    };

    let mut play_mode = PlayMode::new(engine);
    play_mode.run().await?;

    Ok(())
}
