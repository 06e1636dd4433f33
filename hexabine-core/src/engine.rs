//! Hex merge engine: directional shift-merge over an offset hex grid

use crate::board::{Cell, Direction};
use crate::config::{ConfigError, EngineConfig};
use crate::spawn::{SpawnPolicy, WeightedSpawn};
use crate::tile::{Tile, TileArena, TileId};
use serde::{Deserialize, Serialize};

// ============================================================================
// TYPES
// ============================================================================

/// Largest tile value the board can hold
pub const MAX_TILE_VALUE: u32 = 1 << 31;

/// Outcome of a settle
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settled {
    /// Cell of the freshly spawned tile, `None` if the board was full
    pub spawned: Option<Cell>,
    /// No further move is possible
    pub game_over: bool,
}

/// Explicit placement failures
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlaceError {
    #[error("cell {0} is off the board")]
    OutOfBounds(Cell),

    #[error("cell {0} is already occupied")]
    Occupied(Cell),

    #[error("tile value {0} is not a power of two >= 2")]
    InvalidValue(u32),
}

/// Read-only board view for renderers and reports
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub height: usize,
    pub width: usize,
    pub score: u64,
    pub cells: Vec<Vec<Option<u32>>>,
    pub game_over: bool,
}

/// Counters from the last applied shift
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct ShiftStats {
    slides: usize,
    merges: usize,
}

// ============================================================================
// ENGINE
// ============================================================================

/// Owns the grid, its tiles and the score (clone to look ahead)
#[derive(Clone, Debug)]
pub struct HexMergeEngine<P: SpawnPolicy = WeightedSpawn> {
    config: EngineConfig,
    /// Row-major cell contents
    grid: Vec<Option<TileId>>,
    tiles: TileArena,
    /// Cells that absorbed a merge during the current shift
    merged: Vec<bool>,
    score: u64,
    /// A move is waiting for `settle`
    settling: bool,
    game_over: bool,
    moves_made: u32,
    policy: P,
}

impl HexMergeEngine<WeightedSpawn> {
    /// Engine with the weighted 2/4 spawn policy seeded from `seed`
    pub fn with_seed(config: EngineConfig, seed: u64) -> Result<Self, ConfigError> {
        let policy = WeightedSpawn::with_seed(config.two_probability, seed);
        Self::new(config, policy)
    }
}

impl<P: SpawnPolicy> HexMergeEngine<P> {
    // ========================================================================
    // CONSTRUCTORS
    // ========================================================================

    /// Validate `config` and start a fresh game
    pub fn new(config: EngineConfig, policy: P) -> Result<Self, ConfigError> {
        let mut engine = Self::blank(config, policy)?;
        engine.reset();
        Ok(engine)
    }

    /// Empty board with the given tiles and no random spawns at start
    pub fn from_layout(
        config: EngineConfig,
        policy: P,
        layout: &[(Cell, u32)],
    ) -> Result<Self, LayoutError> {
        let mut engine = Self::blank(config, policy)?;
        for &(cell, value) in layout {
            engine.place_tile(cell, value)?;
        }
        Ok(engine)
    }

    fn blank(config: EngineConfig, policy: P) -> Result<Self, ConfigError> {
        config.validate()?;
        let cells = config.cell_count();
        Ok(Self {
            config,
            grid: vec![None; cells],
            tiles: TileArena::new(),
            merged: vec![false; cells],
            score: 0,
            settling: false,
            game_over: false,
            moves_made: 0,
            policy,
        })
    }

    /// Clear the board and score, then spawn the opening tiles
    pub fn reset(&mut self) {
        self.clear();
        for _ in 0..self.config.initial_tiles {
            self.spawn_random_tile();
        }
        tracing::debug!(tiles = self.tiles.live_count(), "new game");
    }

    /// Clear the board and score without spawning
    pub fn clear(&mut self) {
        self.grid.fill(None);
        self.merged.fill(false);
        self.tiles.clear();
        self.score = 0;
        self.settling = false;
        self.game_over = false;
        self.moves_made = 0;
    }

    // ========================================================================
    // ACCESSORS
    // ========================================================================

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn height(&self) -> usize {
        self.config.height
    }

    pub fn width(&self) -> usize {
        self.config.width
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    /// A shifted move has not been settled yet
    pub fn is_settling(&self) -> bool {
        self.settling
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    /// Number of accepted shifts since the last reset
    pub fn moves_made(&self) -> u32 {
        self.moves_made
    }

    /// Tile occupying `cell`
    pub fn tile_at(&self, cell: Cell) -> Option<&Tile> {
        let id = (*self.grid.get(self.index_of(cell)?)?)?;
        self.tiles.get(id)
    }

    pub fn value_at(&self, cell: Cell) -> Option<u32> {
        self.tile_at(cell).map(|t| t.value)
    }

    /// Every tile, including ones fading out after a merge
    pub fn tiles(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.iter()
    }

    pub fn empty_cells(&self) -> Vec<Cell> {
        self.cells().filter(|&c| self.is_empty(c)).collect()
    }

    pub fn max_tile(&self) -> u32 {
        self.grid_values().max().unwrap_or(0)
    }

    pub fn tile_sum(&self) -> u64 {
        self.grid_values().map(u64::from).sum()
    }

    pub fn policy(&self) -> &P {
        &self.policy
    }

    pub fn policy_mut(&mut self) -> &mut P {
        &mut self.policy
    }

    pub fn snapshot(&self) -> Snapshot {
        let cells = (0..self.height())
            .map(|row| {
                (0..self.width())
                    .map(|col| self.value_at(Cell::new(row, col)))
                    .collect()
            })
            .collect();
        Snapshot {
            height: self.height(),
            width: self.width(),
            score: self.score,
            cells,
            game_over: self.game_over,
        }
    }

    // ========================================================================
    // SHIFT / MERGE
    // ========================================================================

    /// Slide every tile toward `dir`, merging equal pairs once per cell.
    ///
    /// Returns whether anything moved. While a previous move is still
    /// settling this is a no-op returning `false`.
    pub fn shift(&mut self, dir: Direction) -> bool {
        if self.settling {
            tracing::debug!(%dir, "shift rejected: previous move still settling");
            return false;
        }

        self.merged.fill(false);
        let mut stats = ShiftStats::default();

        for start in dir.scan_order(self.height(), self.width()) {
            if let Some(id) = self.id_at(start) {
                self.advance(id, start, dir, &mut stats);
            }
        }

        let moved = stats.slides > 0 || stats.merges > 0;
        tracing::trace!(%dir, slides = stats.slides, merges = stats.merges, score = self.score, "shift");
        if moved {
            self.settling = true;
            self.moves_made += 1;
        }
        moved
    }

    /// Push one tile as far as it goes toward `dir`
    fn advance(&mut self, id: TileId, start: Cell, dir: Direction, stats: &mut ShiftStats) {
        let (height, width) = (self.height(), self.width());
        let mut current = start;
        let mut slid = false;

        while let Some(next) = current.neighbor(dir, height, width) {
            match self.id_at(next) {
                None => {
                    self.set(current, None);
                    self.set(next, Some(id));
                    if let Some(tile) = self.tiles.get_mut(id) {
                        tile.slide_to(next);
                    }
                    current = next;
                    slid = true;
                }
                Some(other) => {
                    if self.try_merge(id, current, other, next) {
                        stats.merges += 1;
                    }
                    break;
                }
            }
        }

        if slid {
            stats.slides += 1;
        }
    }

    /// Merge `id` (at `from`) into `other` (at `into`) if allowed
    fn try_merge(&mut self, id: TileId, from: Cell, other: TileId, into: Cell) -> bool {
        let Some(into_idx) = self.index_of(into) else {
            return false;
        };
        if self.merged[into_idx] {
            return false;
        }
        let Some(value) = self.tiles.get(id).map(|t| t.value) else {
            return false;
        };
        let Some(target) = self.tiles.get_mut(other) else {
            return false;
        };
        if !can_merge(value, target.value) {
            return false;
        }

        target.value = value * 2;
        self.score += u64::from(target.value);
        self.merged[into_idx] = true;
        self.set(from, None);
        if let Some(tile) = self.tiles.get_mut(id) {
            tile.absorb_into(into);
        }
        true
    }

    // ========================================================================
    // SETTLE
    // ========================================================================

    /// Finish the pending move: commit positions, drop merged tiles,
    /// spawn one tile and check for game over.
    ///
    /// Returns `None` when no move is pending.
    pub fn settle(&mut self) -> Option<Settled> {
        if !self.settling {
            return None;
        }
        self.commit();

        let spawned = self.spawn_cell();
        let game_over = self.is_terminal();
        if game_over {
            self.game_over = true;
            tracing::debug!(score = self.score, max_tile = self.max_tile(), "game over");
        }
        Some(Settled { spawned, game_over })
    }

    /// Commit positions and compact tombstones without spawning
    pub fn commit(&mut self) {
        for tile in self.tiles.iter_mut() {
            tile.settle();
        }
        let dropped = self.tiles.compact();
        if dropped > 0 {
            tracing::trace!(dropped, "compacted merged tiles");
        }
        self.settling = false;
    }

    // ========================================================================
    // SPAWN / PLACEMENT
    // ========================================================================

    /// Ask the spawn policy for one new tile. `false` if the board is full.
    pub fn spawn_random_tile(&mut self) -> bool {
        self.spawn_cell().is_some()
    }

    fn spawn_cell(&mut self) -> Option<Cell> {
        let empties = self.empty_cells();
        let (cell, value) = self.policy.choose(&empties)?;
        match self.place_tile(cell, value) {
            Ok(_) => {
                tracing::debug!(%cell, value, "spawned tile");
                Some(cell)
            }
            Err(err) => {
                tracing::warn!(%err, "spawn policy chose an unusable placement");
                None
            }
        }
    }

    /// Put a tile on an empty cell
    pub fn place_tile(&mut self, cell: Cell, value: u32) -> Result<TileId, PlaceError> {
        if value < 2 || !value.is_power_of_two() {
            return Err(PlaceError::InvalidValue(value));
        }
        let idx = self.index_of(cell).ok_or(PlaceError::OutOfBounds(cell))?;
        if self.grid[idx].is_some() {
            return Err(PlaceError::Occupied(cell));
        }
        let id = self.tiles.insert(value, cell);
        self.grid[idx] = Some(id);
        Ok(id)
    }

    // ========================================================================
    // TERMINAL CHECK
    // ========================================================================

    /// True iff the board is full and no two neighbors share a value
    pub fn is_terminal(&self) -> bool {
        if self.grid.iter().any(Option::is_none) {
            return false;
        }
        let (height, width) = (self.height(), self.width());
        !self.cells().any(|cell| {
            let value = self.value_at(cell);
            value.is_some_and(|v| {
                cell.neighbors(height, width)
                    .any(|n| self.value_at(n).is_some_and(|w| can_merge(v, w)))
            })
        })
    }

    /// Whether shifting toward `dir` would change the board
    pub fn can_shift(&self, dir: Direction) -> bool {
        let (height, width) = (self.height(), self.width());
        self.cells().any(|cell| {
            let Some(value) = self.value_at(cell) else {
                return false;
            };
            match cell.neighbor(dir, height, width) {
                Some(next) => match self.value_at(next) {
                    None => true,
                    Some(v) => can_merge(value, v),
                },
                None => false,
            }
        })
    }

    // ========================================================================
    // INVARIANTS
    // ========================================================================

    /// Check grid/arena consistency, reporting the first violation found
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        let mut seen = 0;
        for cell in self.cells() {
            let Some(id) = self.id_at(cell) else {
                continue;
            };
            let tile = self.tiles.get(id).ok_or(InvariantError::MissingTile { cell, id })?;
            if tile.removing {
                return Err(InvariantError::RemovedTile { cell, id });
            }
            if tile.cell != cell {
                return Err(InvariantError::Misplaced { id, grid: cell, tile: tile.cell });
            }
            seen += 1;
        }
        let live = self.tiles.live_count();
        if seen != live {
            return Err(InvariantError::CountMismatch { grid: seen, live });
        }
        Ok(())
    }

    // ========================================================================
    // HELPERS
    // ========================================================================

    fn cells(&self) -> impl Iterator<Item = Cell> {
        let width = self.width();
        (0..self.height()).flat_map(move |row| (0..width).map(move |col| Cell::new(row, col)))
    }

    fn grid_values(&self) -> impl Iterator<Item = u32> + '_ {
        self.grid
            .iter()
            .flatten()
            .filter_map(|&id| self.tiles.get(id).map(|t| t.value))
    }

    fn index_of(&self, cell: Cell) -> Option<usize> {
        cell.in_bounds(self.height(), self.width())
            .then(|| cell.row * self.width() + cell.col)
    }

    fn is_empty(&self, cell: Cell) -> bool {
        self.id_at(cell).is_none()
    }

    fn id_at(&self, cell: Cell) -> Option<TileId> {
        self.index_of(cell).and_then(|idx| self.grid[idx])
    }

    fn set(&mut self, cell: Cell, id: Option<TileId>) {
        if let Some(idx) = self.index_of(cell) {
            self.grid[idx] = id;
        }
    }
}

/// Equal tiles merge unless the doubled value would not fit in a `u32`
fn can_merge(a: u32, b: u32) -> bool {
    a == b && a <= MAX_TILE_VALUE / 2
}

/// Grid and tile arena disagree
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvariantError {
    #[error("{cell} references missing tile {id:?}")]
    MissingTile { cell: Cell, id: TileId },

    #[error("{cell} references removed tile {id:?}")]
    RemovedTile { cell: Cell, id: TileId },

    #[error("tile {id:?} at {grid} believes it is at {tile}")]
    Misplaced { id: TileId, grid: Cell, tile: Cell },

    #[error("grid holds {grid} tiles but arena has {live} live tiles")]
    CountMismatch { grid: usize, live: usize },
}

/// Failure building an engine from an explicit layout
#[derive(Debug, thiserror::Error)]
pub enum LayoutError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Place(#[from] PlaceError),
}
