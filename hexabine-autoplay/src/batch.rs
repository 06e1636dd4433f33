//! Batch play - many seeded games and their statistics
//!
//! Level 1/2 - Orchestration and phases

use rayon::prelude::*;
use rustc_hash::FxHashMap;

use crate::config::AutoplayConfig;
use crate::game_runner::{GameOutcome, GameRunner};

/// Aggregated results of a batch
#[derive(Clone, Debug)]
pub struct BatchResult {
    /// Individual game outcomes, in seed order
    pub outcomes: Vec<GameOutcome>,
    pub mean_score: f64,
    pub best_score: u64,
    pub mean_moves: f64,
    /// Best tile reached -> number of games
    pub max_tile_histogram: FxHashMap<u32, usize>,
}

impl BatchResult {
    fn from_outcomes(outcomes: Vec<GameOutcome>) -> Self {
        let games = outcomes.len();
        let (mean_score, mean_moves) = if games == 0 {
            (0.0, 0.0)
        } else {
            let scores: u64 = outcomes.iter().map(|o| o.score).sum();
            let moves: u64 = outcomes.iter().map(|o| u64::from(o.moves)).sum();
            (scores as f64 / games as f64, moves as f64 / games as f64)
        };

        let mut max_tile_histogram = FxHashMap::default();
        for outcome in &outcomes {
            *max_tile_histogram.entry(outcome.max_tile).or_insert(0) += 1;
        }

        Self {
            best_score: outcomes.iter().map(|o| o.score).max().unwrap_or(0),
            outcomes,
            mean_score,
            mean_moves,
            max_tile_histogram,
        }
    }

    pub fn games_played(&self) -> usize {
        self.outcomes.len()
    }

    /// Share of games whose best tile reached at least `tile`
    pub fn reach_rate(&self, tile: u32) -> f64 {
        if self.outcomes.is_empty() {
            return 0.0;
        }
        let reached = self.outcomes.iter().filter(|o| o.max_tile >= tile).count();
        reached as f64 / self.outcomes.len() as f64
    }

    /// Histogram entries sorted by tile value
    pub fn sorted_histogram(&self) -> Vec<(u32, usize)> {
        let mut entries: Vec<(u32, usize)> = self.max_tile_histogram.iter().map(|(&t, &n)| (t, n)).collect();
        entries.sort_unstable();
        entries
    }
}

/// Run a batch of games
///
/// 1. Derive one seed per game from the base seed
/// 2. Play the games (serially or with rayon)
/// 3. Aggregate
pub fn run_batch(config: &AutoplayConfig) -> BatchResult {
    let seeds: Vec<u64> = (0..config.games as u64)
        .map(|i| config.base_seed().wrapping_add(i))
        .collect();

    tracing::info!(
        games = config.games,
        player = %config.player,
        depth = config.depth,
        parallel = config.parallel,
        "starting batch"
    );

    let outcomes = if config.parallel {
        execute_games_parallel(config, &seeds)
    } else {
        execute_games_serial(config, &seeds)
    };

    let result = BatchResult::from_outcomes(outcomes);
    tracing::info!(
        mean_score = result.mean_score,
        best_score = result.best_score,
        "batch complete"
    );
    result
}

/// Execute games one at a time
fn execute_games_serial(config: &AutoplayConfig, seeds: &[u64]) -> Vec<GameOutcome> {
    let runner = GameRunner::new(config.clone());
    seeds.iter().map(|&seed| runner.play_game(seed)).collect()
}

/// Execute games in parallel using rayon
fn execute_games_parallel(config: &AutoplayConfig, seeds: &[u64]) -> Vec<GameOutcome> {
    let runner = GameRunner::new(config.clone());
    seeds.par_iter().map(|&seed| runner.play_game(seed)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serial_and_parallel_agree() {
        let serial = run_batch(&AutoplayConfig::random(6).with_seed(11).serial());
        let parallel = run_batch(&AutoplayConfig::random(6).with_seed(11));

        assert_eq!(serial.outcomes, parallel.outcomes);
        assert_eq!(serial.best_score, parallel.best_score);
    }

    #[test]
    fn test_statistics() {
        let result = run_batch(&AutoplayConfig::random(5).with_seed(3).serial());

        assert_eq!(result.games_played(), 5);
        let seeds: Vec<u64> = result.outcomes.iter().map(|o| o.seed).collect();
        assert_eq!(seeds, vec![3, 4, 5, 6, 7]);
        assert_eq!(result.max_tile_histogram.values().sum::<usize>(), 5);
        assert!(result.best_score as f64 >= result.mean_score);
        assert_eq!(result.reach_rate(2), 1.0);

        let sorted = result.sorted_histogram();
        assert!(sorted.windows(2).all(|w| w[0].0 < w[1].0));
    }

    #[test]
    fn test_empty_batch() {
        let result = run_batch(&AutoplayConfig::random(0));
        assert_eq!(result.games_played(), 0);
        assert_eq!(result.mean_score, 0.0);
        assert_eq!(result.best_score, 0);
        assert_eq!(result.reach_rate(4), 0.0);
    }
}
