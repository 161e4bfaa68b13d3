//! Record storage with a free-list of deactivated records
//!
//! Records live in one contiguous slab and are addressed by `RecordId`.
//! Removing an object pushes its slot onto the free-list; spawning pops one
//! back off. The slab only grows when the free-list is empty and never
//! shrinks, matching a terrain with a bounded number of objects.

use super::record::TerrainObjectRecord;

/// Slot index of a record in the pool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordId(usize);

impl RecordId {
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Default)]
pub struct ObjectPool {
    records: Vec<TerrainObjectRecord>,
    free: Vec<RecordId>,
}

impl ObjectPool {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a pool with `count` deactivated records ready for reuse
    #[must_use]
    pub fn preloaded(count: usize) -> Self {
        let mut pool = Self {
            records: Vec::with_capacity(count),
            free: Vec::with_capacity(count),
        };
        for _ in 0..count {
            let id = pool.allocate();
            pool.free.push(id);
        }
        // Pop order matches allocation order
        pool.free.reverse();
        pool
    }

    fn allocate(&mut self) -> RecordId {
        let id = RecordId(self.records.len());
        self.records.push(TerrainObjectRecord::inactive());
        id
    }

    /// Take a deactivated record, allocating only if none are free
    pub fn acquire(&mut self) -> RecordId {
        self.free.pop().unwrap_or_else(|| self.allocate())
    }

    /// Hand a record back for reuse. The caller deactivates it first.
    pub fn release(&mut self, id: RecordId) {
        debug_assert!(!self.records[id.0].active, "released an active record");
        self.free.push(id);
    }

    #[must_use]
    pub fn get(&self, id: RecordId) -> Option<&TerrainObjectRecord> {
        self.records.get(id.0)
    }

    pub fn get_mut(&mut self, id: RecordId) -> Option<&mut TerrainObjectRecord> {
        self.records.get_mut(id.0)
    }

    /// Total records ever allocated
    #[must_use]
    pub fn allocated(&self) -> usize {
        self.records.len()
    }

    /// Records waiting on the free-list
    #[must_use]
    pub fn available(&self) -> usize {
        self.free.len()
    }

    /// Iterate over records currently in the world
    pub fn active(&self) -> impl Iterator<Item = &TerrainObjectRecord> + '_ {
        self.records.iter().filter(|record| record.active)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_types::{CellId, GridCoord};

    #[test]
    fn test_preloaded_pool_does_not_grow() {
        let mut pool = ObjectPool::preloaded(4);
        assert_eq!(pool.allocated(), 4);
        assert_eq!(pool.available(), 4);

        let first = pool.acquire();
        assert_eq!(first.index(), 0);
        assert_eq!(pool.allocated(), 4);
        assert_eq!(pool.available(), 3);
    }

    #[test]
    fn test_acquire_allocates_when_exhausted() {
        let mut pool = ObjectPool::new();
        let a = pool.acquire();
        let b = pool.acquire();
        assert_ne!(a, b);
        assert_eq!(pool.allocated(), 2);
    }

    #[test]
    fn test_release_reuses_slot() {
        let mut pool = ObjectPool::new();
        let id = pool.acquire();
        pool.get_mut(id)
            .unwrap()
            .activate(GridCoord::new(1, 1), CellId::new(0, 0));
        assert_eq!(pool.active().count(), 1);

        pool.get_mut(id).unwrap().deactivate();
        pool.release(id);
        assert_eq!(pool.active().count(), 0);

        assert_eq!(pool.acquire(), id);
        assert_eq!(pool.allocated(), 1);
    }
}
