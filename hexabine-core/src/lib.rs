//! HEXABINE Core - Hex merge puzzle engine
//!
//! This crate provides the game logic for HEXABINE:
//! - Board geometry (odd-r offset hex grid, six directions)
//! - Tile arena with stable ids and tombstone compaction
//! - The shift/merge engine with its two-phase shift/settle protocol
//! - Spawn policies, configuration and input-intent resolution
//! - Position evaluation and automatic players

pub mod board;
pub mod tile;
pub mod spawn;
pub mod config;
pub mod engine;
pub mod intent;
pub mod eval;
pub mod ai;

// Re-exports for convenient access
pub use board::{Cell, Direction, ParseDirectionError};
pub use tile::{Tile, TileArena, TileId};
pub use spawn::{ScriptedSpawn, SpawnPolicy, WeightedSpawn, DEFAULT_TWO_PROBABILITY};
pub use config::{ConfigError, EngineConfig};
pub use engine::{HexMergeEngine, InvariantError, LayoutError, PlaceError, Settled, Snapshot, MAX_TILE_VALUE};
pub use intent::{Arrow, ArrowKeys};
pub use eval::{evaluate, Heuristics, LOSS_VALUE};
pub use ai::{ExpectimaxAI, Player, RandomAI};
