//! Engine configuration

use crate::spawn::DEFAULT_TWO_PROBABILITY;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Largest supported board edge
pub const MAX_DIMENSION: usize = 16;

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("board must be between 1x1 and {max}x{max}, got {height}x{width}", max = MAX_DIMENSION)]
    InvalidDimensions { height: usize, width: usize },

    #[error("spawn probability must be within [0, 1], got {0}")]
    InvalidProbability(f64),

    #[error("{tiles} initial tiles do not fit on a board of {cells} cells")]
    TooManyInitialTiles { tiles: usize, cells: usize },
}

/// Board shape and spawn parameters
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Number of rows
    pub height: usize,
    /// Number of columns
    pub width: usize,
    /// Chance a spawned tile is a 2 (otherwise 4)
    pub two_probability: f64,
    /// Tiles placed by `reset`
    pub initial_tiles: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            height: 4,
            width: 4,
            two_probability: DEFAULT_TWO_PROBABILITY,
            initial_tiles: 2,
        }
    }
}

impl EngineConfig {
    /// Config for a custom board size with default spawn settings
    pub fn with_size(height: usize, width: usize) -> Self {
        Self {
            height,
            width,
            ..Default::default()
        }
    }

    pub fn cell_count(&self) -> usize {
        self.height * self.width
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let dims = 1..=MAX_DIMENSION;
        if !dims.contains(&self.height) || !dims.contains(&self.width) {
            return Err(ConfigError::InvalidDimensions {
                height: self.height,
                width: self.width,
            });
        }
        if !(0.0..=1.0).contains(&self.two_probability) {
            return Err(ConfigError::InvalidProbability(self.two_probability));
        }
        if self.initial_tiles > self.cell_count() {
            return Err(ConfigError::TooManyInitialTiles {
                tiles: self.initial_tiles,
                cells: self.cell_count(),
            });
        }
        Ok(())
    }

    /// Load and validate a JSON config file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: EngineConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save to JSON file
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = EngineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.cell_count(), 16);
    }

    #[test]
    fn test_rejects_bad_dimensions() {
        assert!(matches!(
            EngineConfig::with_size(0, 4).validate(),
            Err(ConfigError::InvalidDimensions { .. })
        ));
        assert!(matches!(
            EngineConfig::with_size(4, MAX_DIMENSION + 1).validate(),
            Err(ConfigError::InvalidDimensions { .. })
        ));
    }

    #[test]
    fn test_rejects_bad_probability() {
        let config = EngineConfig {
            two_probability: 1.5,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::InvalidProbability(_))));

        let config = EngineConfig {
            two_probability: f64::NAN,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_too_many_initial_tiles() {
        let config = EngineConfig {
            height: 1,
            width: 2,
            initial_tiles: 3,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::TooManyInitialTiles { tiles: 3, cells: 2 })
        ));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: EngineConfig = serde_json::from_str(r#"{"height": 5}"#).unwrap();
        assert_eq!(config.height, 5);
        assert_eq!(config.width, 4);
        assert_eq!(config.initial_tiles, 2);
    }

    #[test]
    fn test_save_and_load() {
        let path = std::env::temp_dir().join(format!("hexabine-config-{}.json", std::process::id()));
        let config = EngineConfig {
            height: 6,
            width: 5,
            two_probability: 0.9,
            initial_tiles: 3,
        };
        config.save(&path).unwrap();
        let loaded = EngineConfig::load(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_missing_file() {
        let result = EngineConfig::load(Path::new("/nonexistent/hexabine.json"));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }
}
