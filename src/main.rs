use anyhow::{Context, Result};
use clap::Parser;
use grid_snake::game::GameConfig;
use grid_snake::modes::HumanMode;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "grid_snake")]
#[command(version, about = "Snake on a fixed grid, played in the terminal")]
struct Cli {
    /// Playing field width in pixels
    #[arg(long, default_value = "800")]
    width: u32,

    /// Playing field height in pixels
    #[arg(long, default_value = "800")]
    height: u32,

    /// Cell edge length in pixels; must divide width and height
    #[arg(long, default_value = "20")]
    cell_size: u32,

    /// Milliseconds between simulation ticks
    #[arg(long, default_value = "50")]
    tick_ms: u64,

    /// Seed for food placement
    #[arg(long)]
    seed: Option<u64>,

    /// Write logs to this file (the terminal belongs to the game)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(path) = &cli.log_file {
        init_tracing(path)?;
    }

    let config = GameConfig::new(cli.width, cli.height, cli.cell_size);
    let tick_interval = Duration::from_millis(cli.tick_ms.max(1));

    let mut human_mode = HumanMode::new(config, tick_interval, cli.seed)?;
    human_mode.run().await?;

    Ok(())
}

fn init_tracing(path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create log file {}", path.display()))?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();

    Ok(())
}
