//! Benchmark command - engine throughput
//!
//! Drives the engine with random legal directions and measures how many
//! shift + settle cycles it completes per second. Games are restarted as
//! soon as they end.

use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Args;

use hexabine_core::{EngineConfig, HexMergeEngine, Player, RandomAI};

#[derive(Args)]
pub struct BenchmarkArgs {
    /// Number of accepted shifts to time
    #[arg(long, default_value = "100000")]
    pub shifts: u64,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

/// Benchmark measurements
#[derive(Clone, Debug, serde::Serialize)]
struct BenchmarkResult {
    shifts: u64,
    games: u64,
    #[serde(serialize_with = "serialize_secs")]
    elapsed: Duration,
    shifts_per_second: f64,
}

/// Run benchmark command
pub fn run(args: BenchmarkArgs, config: EngineConfig, seed: Option<u64>) -> Result<()> {
    let seed = seed.unwrap_or(42);
    let mut engine = HexMergeEngine::with_seed(config, seed).context("Invalid engine config")?;
    let mut player = RandomAI::with_seed(seed);

    tracing::info!("Benchmarking {} shifts", args.shifts);

    let result = measure(&mut engine, &mut player, args.shifts);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!("\n=== Benchmark Results ===");
        println!("Shifts:       {}", result.shifts);
        println!("Games:        {}", result.games);
        println!("Elapsed:      {:.3}s", result.elapsed.as_secs_f64());
        println!("Shifts/sec:   {:.0}", result.shifts_per_second);
    }
    Ok(())
}

fn measure(engine: &mut HexMergeEngine, player: &mut RandomAI, shifts: u64) -> BenchmarkResult {
    let start = Instant::now();
    let mut done = 0u64;
    let mut games = 1u64;

    while done < shifts {
        match player.choose(engine) {
            Some(dir) if engine.shift(dir) => {
                engine.settle();
                done += 1;
            }
            _ => {
                engine.reset();
                games += 1;
            }
        }
        if engine.is_game_over() {
            engine.reset();
            games += 1;
        }
    }

    let elapsed = start.elapsed();
    let secs = elapsed.as_secs_f64();
    BenchmarkResult {
        shifts: done,
        games,
        elapsed,
        shifts_per_second: if secs > 0.0 { done as f64 / secs } else { 0.0 },
    }
}

fn serialize_secs<S: serde::Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_f64(d.as_secs_f64())
}
