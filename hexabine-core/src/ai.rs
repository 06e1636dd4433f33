//! Automatic players
//!
//! `ExpectimaxAI` searches alternating max nodes (our six directions) and
//! chance nodes (every empty cell times a 2 or 4 spawn). `RandomAI` picks any
//! direction that changes the board.

use crate::board::Direction;
use crate::engine::HexMergeEngine;
use crate::eval::{evaluate, Heuristics, LOSS_VALUE};
use crate::spawn::SpawnPolicy;
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

// ============================================================================
// CONSTANTS
// ============================================================================

/// Noise added to root evaluations to break ties between equal moves
const NOISE_SCALE: f32 = 0.01;

/// Chance nodes with more empty cells than this are sampled
const MAX_CHANCE_CELLS: usize = 8;

// ============================================================================
// PLAYER TRAIT
// ============================================================================

/// Something that picks the next direction to shift
pub trait Player {
    /// Direction to play, or `None` when nothing moves
    fn choose<P: SpawnPolicy + Clone>(&mut self, engine: &HexMergeEngine<P>) -> Option<Direction>;
}

// ============================================================================
// RANDOM
// ============================================================================

/// Uniformly random legal direction
#[derive(Clone, Debug)]
pub struct RandomAI {
    rng: ChaCha8Rng,
}

impl RandomAI {
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }
}

impl Player for RandomAI {
    fn choose<P: SpawnPolicy + Clone>(&mut self, engine: &HexMergeEngine<P>) -> Option<Direction> {
        let legal: Vec<Direction> = Direction::ALL
            .into_iter()
            .filter(|&dir| engine.can_shift(dir))
            .collect();
        legal.choose(&mut self.rng).copied()
    }
}

// ============================================================================
// EXPECTIMAX
// ============================================================================

/// Depth-limited expectimax player
#[derive(Clone, Debug)]
pub struct ExpectimaxAI {
    pub depth: u32,
    pub heuristics: Heuristics,
    rng: ChaCha8Rng,
}

impl ExpectimaxAI {
    pub fn new(depth: u32, heuristics: Heuristics) -> Self {
        Self::with_seed(depth, heuristics, 42)
    }

    pub fn with_seed(depth: u32, heuristics: Heuristics, seed: u64) -> Self {
        Self {
            depth: depth.max(1),
            heuristics,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Best direction for the current position
    pub fn best_direction<P: SpawnPolicy + Clone>(
        &mut self,
        engine: &HexMergeEngine<P>,
    ) -> Option<Direction> {
        let mut best: Option<(Direction, f32)> = None;

        for dir in Direction::ALL {
            let Some(after) = apply(engine, dir) else {
                continue;
            };
            let value = self.chance_value(&after, self.depth.saturating_sub(1))
                + self.rng.gen_range(-NOISE_SCALE..NOISE_SCALE);
            if best.map_or(true, |(_, v)| value > v) {
                best = Some((dir, value));
            }
        }

        best.map(|(dir, _)| dir)
    }

    /// Best value over our moves
    fn max_value<P: SpawnPolicy + Clone>(&mut self, engine: &HexMergeEngine<P>, depth: u32) -> f32 {
        if depth == 0 {
            return evaluate(engine, &self.heuristics);
        }
        let mut best = LOSS_VALUE;
        for dir in Direction::ALL {
            if let Some(after) = apply(engine, dir) {
                best = best.max(self.chance_value(&after, depth - 1));
            }
        }
        best
    }

    /// Expected value over spawns
    fn chance_value<P: SpawnPolicy + Clone>(&mut self, engine: &HexMergeEngine<P>, depth: u32) -> f32 {
        let mut empties = engine.empty_cells();
        if empties.is_empty() {
            return self.max_value(engine, depth);
        }
        if empties.len() > MAX_CHANCE_CELLS {
            empties.shuffle(&mut self.rng);
            empties.truncate(MAX_CHANCE_CELLS);
        }

        let p_two = engine.config().two_probability as f32;
        let mut total = 0.0;
        for &cell in &empties {
            for (value, weight) in [(2, p_two), (4, 1.0 - p_two)] {
                if weight <= 0.0 {
                    continue;
                }
                let mut next = engine.clone();
                if next.place_tile(cell, value).is_ok() {
                    total += weight * self.max_value(&next, depth);
                }
            }
        }
        total / empties.len() as f32
    }
}

impl Player for ExpectimaxAI {
    fn choose<P: SpawnPolicy + Clone>(&mut self, engine: &HexMergeEngine<P>) -> Option<Direction> {
        self.best_direction(engine)
    }
}

/// Shift a copy of `engine` and commit it, or `None` if nothing moved
fn apply<P: SpawnPolicy + Clone>(engine: &HexMergeEngine<P>, dir: Direction) -> Option<HexMergeEngine<P>> {
    let mut next = engine.clone();
    if next.is_settling() {
        next.commit();
    }
    if !next.shift(dir) {
        return None;
    }
    next.commit();
    Some(next)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Cell;
    use crate::config::EngineConfig;
    use crate::spawn::ScriptedSpawn;

    fn engine(config: EngineConfig, tiles: &[(usize, usize, u32)]) -> HexMergeEngine<ScriptedSpawn> {
        let cells: Vec<_> = tiles.iter().map(|&(r, c, v)| (Cell::new(r, c), v)).collect();
        HexMergeEngine::from_layout(config, ScriptedSpawn::default(), &cells).unwrap()
    }

    #[test]
    fn test_expectimax_takes_the_merge() {
        // Only horizontal moves merge the two 64s
        let game = engine(
            EngineConfig::with_size(3, 3),
            &[(1, 0, 64), (1, 1, 64), (0, 0, 2), (2, 2, 4)],
        );
        let heuristics = Heuristics {
            smoothness_weight: 0.0,
            ..Default::default()
        };
        let mut ai = ExpectimaxAI::new(1, heuristics);
        let dir = ai.best_direction(&game);
        assert!(matches!(dir, Some(Direction::L) | Some(Direction::R)), "got {dir:?}");
    }

    #[test]
    fn test_expectimax_none_when_stuck() {
        let stuck = engine(
            EngineConfig::with_size(2, 2),
            &[(0, 0, 2), (0, 1, 4), (1, 0, 8), (1, 1, 16)],
        );
        let mut ai = ExpectimaxAI::new(2, Heuristics::default());
        assert_eq!(ai.best_direction(&stuck), None);
    }

    #[test]
    fn test_expectimax_depth_two_returns_legal_move() {
        let game = engine(EngineConfig::default(), &[(0, 0, 2), (3, 3, 2), (1, 2, 4)]);
        let mut ai = ExpectimaxAI::new(2, Heuristics::default());
        let dir = ai.best_direction(&game).unwrap();
        assert!(game.can_shift(dir));
    }

    #[test]
    fn test_random_picks_only_legal_moves() {
        // A lone tile in the top-left corner can only go R or DR
        let game = engine(EngineConfig::default(), &[(0, 0, 2)]);
        let mut ai = RandomAI::with_seed(5);
        for _ in 0..50 {
            let dir = ai.choose(&game).unwrap();
            assert!(game.can_shift(dir), "{dir} is not legal");
        }
    }

    #[test]
    fn test_search_leaves_engine_untouched() {
        let game = engine(EngineConfig::default(), &[(0, 1, 2), (0, 2, 2)]);
        let before = game.snapshot();
        let mut ai = ExpectimaxAI::new(2, Heuristics::default());
        ai.best_direction(&game);
        assert_eq!(game.snapshot(), before);
    }

    #[test]
    fn test_players_are_debug_printable() {
        let random = format!("{:?}", RandomAI::with_seed(1));
        let smart = format!("{:?}", ExpectimaxAI::new(3, Heuristics::default()));
        assert!(random.starts_with("RandomAI"));
        assert!(smart.starts_with("ExpectimaxAI"));
        assert!(smart.contains("depth: 3"));
    }
}
