//! HEXABINE Autoplay - batch games with automatic players
//!
//! This crate runs complete games without a human at the keyboard:
//! - Single games driven by a random or expectimax player
//! - Batches of seeded games, serial or parallel
//! - Aggregate statistics (scores, lengths, best-tile histogram)
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run_batch (orchestration)
//! - Level 2: execute_games_serial / execute_games_parallel (phases)
//! - Level 3: GameRunner::play_game (steps)
//! - Level 4: configuration

mod batch;
mod config;
mod game_runner;

pub use batch::{run_batch, BatchResult};
pub use config::{AutoplayConfig, PlayerType};
pub use game_runner::{GameOutcome, GameRunner};
