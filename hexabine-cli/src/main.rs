//! HEXABINE CLI - Command-line interface
//!
//! Commands:
//! - play: Play interactively in the terminal
//! - autoplay: Run a batch of games with an automatic player
//! - benchmark: Measure shift/settle throughput

mod autoplay;
mod benchmark;
mod play;
mod render;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use hexabine_core::EngineConfig;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "hexabine")]
#[command(about = "HEXABINE hex tile-merging puzzle")]
struct Cli {
    /// Random seed for reproducible games
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Engine config JSON file (board size, spawn odds)
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play interactively
    Play(play::PlayArgs),
    /// Run a batch of games with an automatic player
    Autoplay(autoplay::AutoplayArgs),
    /// Measure engine throughput
    Benchmark(benchmark::BenchmarkArgs),
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Play(args) => play::run(args, config, cli.seed),
        Commands::Autoplay(args) => autoplay::run(args, config, cli.seed),
        Commands::Benchmark(args) => benchmark::run(args, config, cli.seed),
    }
}

/// Engine config from file, or the default 4x4 board
fn load_config(path: Option<&Path>) -> Result<EngineConfig> {
    match path {
        Some(path) => {
            let config = EngineConfig::load(path)
                .with_context(|| format!("Failed to load config: {}", path.display()))?;
            tracing::info!("Loaded config from {}", path.display());
            Ok(config)
        }
        None => Ok(EngineConfig::default()),
    }
}
