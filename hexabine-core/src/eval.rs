//! Position evaluation

use crate::board::Cell;
use crate::engine::HexMergeEngine;
use crate::spawn::SpawnPolicy;
use serde::{Deserialize, Serialize};

/// Value of a lost position (effectively minus infinity)
pub const LOSS_VALUE: f32 = -100000.0;

/// Heuristic weights for position evaluation
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Heuristics {
    /// Per empty cell
    pub empty_weight: f32,
    /// Per adjacent pair of equal tiles (a merge waiting to happen)
    pub merge_weight: f32,
    /// Per unit of log2 difference between neighbors (applied negatively)
    pub smoothness_weight: f32,
    /// Per point of score
    pub score_weight: f32,
}

impl Default for Heuristics {
    fn default() -> Self {
        Self {
            empty_weight: 10.0,
            merge_weight: 4.0,
            smoothness_weight: 1.0,
            score_weight: 0.1,
        }
    }
}

/// Evaluate a position (higher is better)
pub fn evaluate<P: SpawnPolicy>(engine: &HexMergeEngine<P>, heuristics: &Heuristics) -> f32 {
    if engine.is_terminal() {
        return LOSS_VALUE;
    }

    let (height, width) = (engine.height(), engine.width());
    let mut empty = 0usize;
    let mut pairs = 0usize;
    let mut roughness = 0.0f32;

    for row in 0..height {
        for col in 0..width {
            let cell = Cell::new(row, col);
            let Some(value) = engine.value_at(cell) else {
                empty += 1;
                continue;
            };
            let rank = value.trailing_zeros() as f32;
            for n in cell.neighbors(height, width) {
                // Each pair is visited from both sides; count it once
                if n <= cell {
                    continue;
                }
                if let Some(other) = engine.value_at(n) {
                    if other == value {
                        pairs += 1;
                    }
                    roughness += (rank - other.trailing_zeros() as f32).abs();
                }
            }
        }
    }

    empty as f32 * heuristics.empty_weight
        + pairs as f32 * heuristics.merge_weight
        - roughness * heuristics.smoothness_weight
        + engine.score() as f32 * heuristics.score_weight
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::spawn::ScriptedSpawn;

    fn engine(tiles: &[(usize, usize, u32)]) -> HexMergeEngine<ScriptedSpawn> {
        let cells: Vec<_> = tiles.iter().map(|&(r, c, v)| (Cell::new(r, c), v)).collect();
        HexMergeEngine::from_layout(EngineConfig::with_size(2, 2), ScriptedSpawn::default(), &cells)
            .unwrap()
    }

    #[test]
    fn test_terminal_is_loss() {
        let stuck = engine(&[(0, 0, 2), (0, 1, 4), (1, 0, 8), (1, 1, 16)]);
        assert_eq!(evaluate(&stuck, &Heuristics::default()), LOSS_VALUE);
    }

    #[test]
    fn test_more_space_is_better() {
        let h = Heuristics::default();
        let sparse = engine(&[(0, 0, 2)]);
        let crowded = engine(&[(0, 0, 2), (1, 1, 8)]);
        assert!(evaluate(&sparse, &h) > evaluate(&crowded, &h));
    }

    #[test]
    fn test_equal_neighbors_score_higher() {
        let h = Heuristics::default();
        let pair = engine(&[(0, 0, 4), (0, 1, 4)]);
        let apart = engine(&[(0, 0, 4), (0, 1, 32)]);
        assert!(evaluate(&pair, &h) > evaluate(&apart, &h));
    }

    #[test]
    fn test_empty_board() {
        let h = Heuristics {
            empty_weight: 1.0,
            ..Default::default()
        };
        assert_eq!(evaluate(&engine(&[]), &h), 4.0);
    }
}
