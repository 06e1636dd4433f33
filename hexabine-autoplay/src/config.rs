//! Configuration types for automatic play
//!
//! Level 4 - Utilities and configuration

use hexabine_core::{EngineConfig, Heuristics};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Player type for games
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerType {
    /// Uniformly random legal direction
    Random,
    /// Depth-limited expectimax search
    #[default]
    Expectimax,
}

impl fmt::Display for PlayerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlayerType::Random => f.write_str("random"),
            PlayerType::Expectimax => f.write_str("expectimax"),
        }
    }
}

impl FromStr for PlayerType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "random" => Ok(PlayerType::Random),
            "expectimax" => Ok(PlayerType::Expectimax),
            other => Err(format!("unknown player '{other}' (expected random or expectimax)")),
        }
    }
}

/// Batch configuration
#[derive(Clone, Debug)]
pub struct AutoplayConfig {
    /// Number of games to play
    pub games: usize,
    /// Which automatic player drives the games
    pub player: PlayerType,
    /// Search depth for expectimax
    pub depth: u32,
    /// Heuristics for evaluation
    pub heuristics: Heuristics,
    /// Stop a game after this many accepted moves
    pub max_moves: u32,
    /// Base seed; game `i` uses `seed + i` (None = 42)
    pub seed: Option<u64>,
    /// Whether to run games in parallel
    pub parallel: bool,
    /// Board shape and spawn parameters
    pub engine: EngineConfig,
}

impl Default for AutoplayConfig {
    fn default() -> Self {
        Self {
            games: 10,
            player: PlayerType::Expectimax,
            depth: 2,
            heuristics: Heuristics::default(),
            max_moves: 10_000,
            seed: None,
            parallel: true,
            engine: EngineConfig::default(),
        }
    }
}

impl AutoplayConfig {
    /// Config for random play
    pub fn random(games: usize) -> Self {
        Self {
            games,
            player: PlayerType::Random,
            ..Default::default()
        }
    }

    /// Config for expectimax at given depth
    pub fn expectimax(games: usize, depth: u32) -> Self {
        Self {
            games,
            player: PlayerType::Expectimax,
            depth,
            ..Default::default()
        }
    }

    /// Set random seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set board configuration
    pub fn with_engine(mut self, engine: EngineConfig) -> Self {
        self.engine = engine;
        self
    }

    /// Run games one after another
    pub fn serial(mut self) -> Self {
        self.parallel = false;
        self
    }

    /// Cap moves per game
    pub fn with_max_moves(mut self, max_moves: u32) -> Self {
        self.max_moves = max_moves;
        self
    }

    pub fn base_seed(&self) -> u64 {
        self.seed.unwrap_or(42)
    }
}
