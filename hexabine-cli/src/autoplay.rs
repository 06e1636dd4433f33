//! Autoplay command - batch games with an automatic player
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: play_batch(), report_results()
//! - Level 3: print_json_results(), print_text_results()
//! - Level 4: configuration

use anyhow::{bail, Result};
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};

use hexabine_autoplay::{run_batch, AutoplayConfig, BatchResult, PlayerType};
use hexabine_core::{EngineConfig, Heuristics};

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct AutoplayArgs {
    /// Number of games to play
    #[arg(long, default_value = "20")]
    pub games: usize,

    /// Automatic player: random or expectimax
    #[arg(long, default_value = "expectimax")]
    pub player: PlayerType,

    /// Expectimax search depth
    #[arg(long, default_value = "2")]
    pub depth: u32,

    /// Maximum moves per game
    #[arg(long, default_value = "10000")]
    pub max_moves: u32,

    /// Play games in parallel
    #[arg(long)]
    pub parallel: bool,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run autoplay command
///
/// 1. Build the batch config
/// 2. Play the batch
/// 3. Report results
pub fn run(args: AutoplayArgs, engine: EngineConfig, seed: Option<u64>) -> Result<()> {
    if args.depth == 0 {
        bail!("--depth must be at least 1");
    }

    let config = AutoplayConfig {
        games: args.games,
        player: args.player,
        depth: args.depth,
        heuristics: Heuristics::default(),
        max_moves: args.max_moves,
        seed,
        parallel: args.parallel,
        engine,
    };

    let result = play_batch(&config, !args.json);
    report_results(&result, &config, args.json);
    Ok(())
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

/// Play the batch behind a spinner
fn play_batch(config: &AutoplayConfig, show_progress: bool) -> BatchResult {
    let progress = if show_progress {
        let bar = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template("{spinner} {msg} [{elapsed_precise}]") {
            bar.set_style(style);
        }
        bar.set_message(format!("Playing {} games ({})", config.games, config.player));
        bar.enable_steady_tick(std::time::Duration::from_millis(120));
        Some(bar)
    } else {
        None
    };

    let result = run_batch(config);

    if let Some(bar) = progress {
        bar.finish_and_clear();
    }
    result
}

fn report_results(result: &BatchResult, config: &AutoplayConfig, json: bool) {
    if json {
        print_json_results(result, config);
    } else {
        print_text_results(result, config);
    }
}

// ============================================================================
// LEVEL 3 - OUTPUT
// ============================================================================

/// Print results as JSON
fn print_json_results(result: &BatchResult, config: &AutoplayConfig) {
    #[derive(serde::Serialize)]
    struct JsonGame {
        seed: u64,
        score: u64,
        max_tile: u32,
        moves: u32,
        terminal: bool,
    }

    #[derive(serde::Serialize)]
    struct JsonOutput {
        generated_at: String,
        player: String,
        depth: u32,
        height: usize,
        width: usize,
        total_games: usize,
        mean_score: f64,
        best_score: u64,
        mean_moves: f64,
        max_tile_histogram: Vec<(u32, usize)>,
        games: Vec<JsonGame>,
    }

    let output = JsonOutput {
        generated_at: chrono::Utc::now().to_rfc3339(),
        player: config.player.to_string(),
        depth: config.depth,
        height: config.engine.height,
        width: config.engine.width,
        total_games: result.games_played(),
        mean_score: result.mean_score,
        best_score: result.best_score,
        mean_moves: result.mean_moves,
        max_tile_histogram: result.sorted_histogram(),
        games: result
            .outcomes
            .iter()
            .map(|o| JsonGame {
                seed: o.seed,
                score: o.score,
                max_tile: o.max_tile,
                moves: o.moves,
                terminal: o.terminal,
            })
            .collect(),
    };

    if let Ok(json) = serde_json::to_string_pretty(&output) {
        println!("{}", json);
    }
}

/// Print results as text
fn print_text_results(result: &BatchResult, config: &AutoplayConfig) {
    println!("\n=== Autoplay Results ===");
    println!(
        "Player:      {} (depth {}) on {}x{}",
        config.player, config.depth, config.engine.height, config.engine.width
    );
    println!("Games:       {}", result.games_played());
    println!("Mean score:  {:.1}", result.mean_score);
    println!("Best score:  {}", result.best_score);
    println!("Mean moves:  {:.1}", result.mean_moves);
    println!("\nBest tile reached:");
    for (tile, count) in result.sorted_histogram() {
        println!(
            "  {:>6}: {:>4} ({:.1}% reached)",
            tile,
            count,
            result.reach_rate(tile) * 100.0
        );
    }
}
