//! Game runner - executes single games
//!
//! Level 3 - Step-level implementation

use hexabine_core::{Direction, ExpectimaxAI, HexMergeEngine, Player, RandomAI};
use serde::{Deserialize, Serialize};

use crate::config::{AutoplayConfig, PlayerType};

/// Mixed into the game seed for the spawn policy's stream
const SPAWN_STREAM: u64 = 0x9E37_79B9_7F4A_7C15;

/// Outcome of a single game
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameOutcome {
    /// Seed the spawn policy and player were built from
    pub seed: u64,
    /// Final score
    pub score: u64,
    /// Largest tile on the final board
    pub max_tile: u32,
    /// Accepted moves
    pub moves: u32,
    /// Game ended because no move was possible (false = move cap hit)
    pub terminal: bool,
    /// Direction history
    pub history: Vec<Direction>,
}

/// Game runner that plays games with an automatic player
pub struct GameRunner {
    config: AutoplayConfig,
}

impl GameRunner {
    pub fn new(config: AutoplayConfig) -> Self {
        Self { config }
    }

    /// Play one complete game seeded from `seed`
    pub fn play_game(&self, seed: u64) -> GameOutcome {
        match self.config.player {
            PlayerType::Random => self.play_with(RandomAI::with_seed(seed), seed),
            PlayerType::Expectimax => {
                let ai = ExpectimaxAI::with_seed(self.config.depth, self.config.heuristics.clone(), seed);
                self.play_with(ai, seed)
            }
        }
    }

    fn play_with<A: Player>(&self, mut ai: A, seed: u64) -> GameOutcome {
        let mut engine = match HexMergeEngine::with_seed(self.config.engine.clone(), seed ^ SPAWN_STREAM) {
            Ok(engine) => engine,
            Err(err) => {
                tracing::warn!(%err, "invalid engine config, game skipped");
                return GameOutcome {
                    seed,
                    score: 0,
                    max_tile: 0,
                    moves: 0,
                    terminal: false,
                    history: Vec::new(),
                };
            }
        };
        let mut history = Vec::new();

        while !engine.is_game_over() && engine.moves_made() < self.config.max_moves {
            let Some(dir) = ai.choose(&engine) else {
                break;
            };
            if !engine.shift(dir) {
                break;
            }
            history.push(dir);
            engine.settle();
        }

        let terminal = engine.is_game_over() || engine.is_terminal();
        tracing::debug!(seed, score = engine.score(), moves = engine.moves_made(), terminal, "game finished");

        GameOutcome {
            seed,
            score: engine.score(),
            max_tile: engine.max_tile(),
            moves: engine.moves_made(),
            terminal,
            history,
        }
    }

    pub fn config(&self) -> &AutoplayConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hexabine_core::EngineConfig;

    #[test]
    fn test_random_game_runs_to_the_end() {
        let runner = GameRunner::new(AutoplayConfig::random(1));
        let outcome = runner.play_game(1);

        assert!(outcome.terminal);
        assert!(outcome.moves > 0);
        assert_eq!(outcome.history.len(), outcome.moves as usize);
        assert!(outcome.max_tile >= 4);
        assert!(outcome.max_tile.is_power_of_two());
    }

    #[test]
    fn test_same_seed_same_game() {
        let runner = GameRunner::new(AutoplayConfig::random(1));
        assert_eq!(runner.play_game(9), runner.play_game(9));
    }

    #[test]
    fn test_move_cap() {
        let runner = GameRunner::new(AutoplayConfig::random(1).with_max_moves(3));
        let outcome = runner.play_game(2);
        assert!(outcome.moves <= 3);
    }

    #[test]
    fn test_expectimax_on_small_board() {
        let config = AutoplayConfig::expectimax(1, 1)
            .with_engine(EngineConfig::with_size(3, 3))
            .with_max_moves(200);
        let outcome = GameRunner::new(config).play_game(4);
        assert!(outcome.moves > 0);
        assert!(outcome.score > 0);
    }

    #[test]
    fn test_invalid_engine_config() {
        let config = AutoplayConfig::random(1).with_engine(EngineConfig::with_size(0, 0));
        let outcome = GameRunner::new(config).play_game(1);
        assert_eq!(outcome.moves, 0);
        assert!(!outcome.terminal);
    }
}
