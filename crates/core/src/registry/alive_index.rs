//! Set of alive coordinates with O(1) uniform random access
//!
//! Backed by a dense vector for ordinal access plus a position map so removal
//! can `swap_remove` without scanning.

use crate::core_types::GridCoord;
use rustc_hash::FxHashMap;

#[derive(Debug, Default)]
pub struct AliveIndex {
    coords: Vec<GridCoord>,
    positions: FxHashMap<GridCoord, usize>,
}

impl AliveIndex {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a coordinate. Returns `false` if it was already present.
    pub fn insert(&mut self, coord: GridCoord) -> bool {
        if self.positions.contains_key(&coord) {
            return false;
        }
        self.positions.insert(coord, self.coords.len());
        self.coords.push(coord);
        true
    }

    /// Remove a coordinate. Returns `false` if it was not present.
    pub fn remove(&mut self, coord: GridCoord) -> bool {
        let Some(position) = self.positions.remove(&coord) else {
            return false;
        };
        self.coords.swap_remove(position);
        if let Some(&moved) = self.coords.get(position) {
            self.positions.insert(moved, position);
        }
        true
    }

    #[must_use]
    pub fn contains(&self, coord: GridCoord) -> bool {
        self.positions.contains_key(&coord)
    }

    /// Coordinate at `ordinal`. Ordinals are unstable across removals.
    #[must_use]
    pub fn get(&self, ordinal: usize) -> Option<GridCoord> {
        self.coords.get(ordinal).copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.coords.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.coords.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = GridCoord> + '_ {
        self.coords.iter().copied()
    }

    pub fn clear(&mut self) {
        self.coords.clear();
        self.positions.clear();
    }
}
