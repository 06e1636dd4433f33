//! Tiles and the arena that owns them

use crate::board::Cell;
use serde::{Deserialize, Serialize};

/// Stable tile identifier, allocated in increasing order per engine
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TileId(pub u32);

/// A numbered tile
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    pub id: TileId,
    pub value: u32,
    /// Logical position. For a tombstoned tile this is the cell it left.
    pub cell: Cell,
    /// Where the tile is headed for the pending move
    pub target: Cell,
    /// Position at the last settle (animation start point)
    pub origin: Cell,
    /// Absorbed by a merge; dropped at the next compaction
    pub removing: bool,
}

impl Tile {
    fn new(id: TileId, value: u32, cell: Cell) -> Self {
        Self {
            id,
            value,
            cell,
            target: cell,
            origin: cell,
            removing: false,
        }
    }

    /// True while the tile has an unsettled move
    pub fn is_moving(&self) -> bool {
        self.origin != self.target
    }

    /// Move to an empty cell
    pub(crate) fn slide_to(&mut self, cell: Cell) {
        self.cell = cell;
        self.target = cell;
    }

    /// Head into `target` and vanish once settled
    pub(crate) fn absorb_into(&mut self, target: Cell) {
        self.target = target;
        self.removing = true;
    }

    /// Commit the pending move
    pub(crate) fn settle(&mut self) {
        self.cell = self.target;
        self.origin = self.target;
    }
}

/// Tile store with tombstone compaction.
///
/// Ids are allocated in increasing order and tiles are only appended, so the
/// backing vector stays sorted by id and lookups are binary searches.
#[derive(Clone, Debug, Default)]
pub struct TileArena {
    tiles: Vec<Tile>,
    next_id: u32,
}

impl TileArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a tile and return its id
    pub fn insert(&mut self, value: u32, cell: Cell) -> TileId {
        let id = TileId(self.next_id);
        self.next_id += 1;
        self.tiles.push(Tile::new(id, value, cell));
        id
    }

    pub fn get(&self, id: TileId) -> Option<&Tile> {
        let idx = self.position(id)?;
        self.tiles.get(idx)
    }

    pub fn get_mut(&mut self, id: TileId) -> Option<&mut Tile> {
        let idx = self.position(id)?;
        self.tiles.get_mut(idx)
    }

    /// All tiles, including tombstones, in id order
    pub fn iter(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.iter()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut Tile> {
        self.tiles.iter_mut()
    }

    /// Number of tiles not flagged for removal
    pub fn live_count(&self) -> usize {
        self.tiles.iter().filter(|t| !t.removing).count()
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Drop tombstoned tiles, returning how many were removed
    pub fn compact(&mut self) -> usize {
        let before = self.tiles.len();
        self.tiles.retain(|t| !t.removing);
        before - self.tiles.len()
    }

    /// Remove every tile and restart id allocation
    pub fn clear(&mut self) {
        self.tiles.clear();
        self.next_id = 0;
    }

    fn position(&self, id: TileId) -> Option<usize> {
        self.tiles.binary_search_by_key(&id, |t| t.id).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_monotonic() {
        let mut arena = TileArena::new();
        let a = arena.insert(2, Cell::new(0, 0));
        let b = arena.insert(4, Cell::new(0, 1));
        assert!(a < b);
        assert_eq!(arena.get(b).map(|t| t.value), Some(4));
    }

    #[test]
    fn test_compact_drops_tombstones_only() {
        let mut arena = TileArena::new();
        let a = arena.insert(2, Cell::new(0, 0));
        let b = arena.insert(2, Cell::new(0, 1));
        if let Some(t) = arena.get_mut(b) {
            t.absorb_into(Cell::new(0, 0));
        }
        assert_eq!(arena.live_count(), 1);
        assert_eq!(arena.len(), 2);

        assert_eq!(arena.compact(), 1);
        assert!(arena.get(a).is_some());
        assert!(arena.get(b).is_none());
        assert_eq!(arena.compact(), 0);
    }

    #[test]
    fn test_slide_then_settle() {
        let mut arena = TileArena::new();
        let id = arena.insert(8, Cell::new(1, 3));
        let tile = arena.get_mut(id).unwrap();
        tile.slide_to(Cell::new(1, 0));
        assert!(tile.is_moving());
        assert_eq!(tile.origin, Cell::new(1, 3));

        tile.settle();
        assert!(!tile.is_moving());
        assert_eq!(tile.cell, Cell::new(1, 0));
        assert_eq!(tile.origin, Cell::new(1, 0));
    }

    #[test]
    fn test_iter_is_id_ordered() {
        let mut arena = TileArena::new();
        for col in 0..8 {
            arena.insert(2, Cell::new(0, col));
        }
        let ids: Vec<u32> = arena.iter().map(|t| t.id.0).collect();
        assert_eq!(ids, (0..8).collect::<Vec<_>>());
    }

    #[test]
    fn test_lookup_after_compaction() {
        let mut arena = TileArena::new();
        let ids: Vec<TileId> = (0..5).map(|col| arena.insert(2 << col, Cell::new(0, col))).collect();
        for &id in &ids[..3] {
            if let Some(t) = arena.get_mut(id) {
                t.absorb_into(Cell::new(1, 0));
            }
        }
        arena.compact();

        let later = arena.insert(64, Cell::new(1, 1));
        assert!(arena.get(ids[1]).is_none());
        assert_eq!(arena.get(ids[4]).map(|t| t.value), Some(32));
        assert_eq!(arena.get(later).map(|t| t.value), Some(64));
        let order: Vec<TileId> = arena.iter().map(|t| t.id).collect();
        assert_eq!(order, vec![ids[3], ids[4], later]);
    }

    #[test]
    fn test_clear_resets_ids() {
        let mut arena = TileArena::new();
        arena.insert(2, Cell::new(0, 0));
        arena.clear();
        assert!(arena.is_empty());
        assert_eq!(arena.insert(2, Cell::new(0, 0)), TileId(0));
    }
}
