//! Object registry: ownership, lookup and bookkeeping for terrain objects
//!
//! The registry owns every record (through the pool), a position index keyed
//! by coordinate, and the alive index used for random ignition. It also owns
//! the aggregate counters; callers read them but never write them.
//!
//! The registry applies state changes but never decides them. Transition
//! policy (when to ignite, when to burn out) lives in `FireSimulation`, which
//! calls the narrow `mark_*` setters below. Each setter updates the record,
//! the indices and the counters together so the invariants
//!
//! - `alive + on_fire + burnt == total`
//! - a coordinate is in the alive index iff its record is `Alive`
//!
//! hold after every call.

pub mod alive_index;
pub mod pool;
pub mod record;

pub use alive_index::AliveIndex;
pub use pool::{ObjectPool, RecordId};
pub use record::{ObjectState, TerrainObjectRecord};

use crate::core_types::{CellId, GridCoord};
use crate::error::{SimResult, SimulationError};
use crate::grid::GridPartition;
use crate::simulation::scheduler::TaskHandle;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::trace;

/// Outcome of [`ObjectRegistry::remove`]
#[derive(Debug, Clone)]
pub struct RemovedObject {
    /// The record as it was before removal
    pub record: TerrainObjectRecord,
    /// The removal left every remaining member of the cell burnt, so the
    /// cell is now batched
    pub completes_batch: bool,
}

/// Aggregate object counts by state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ObjectCounts {
    pub total: usize,
    pub alive: usize,
    pub on_fire: usize,
    pub burnt: usize,
}

impl ObjectCounts {
    fn increment(&mut self, state: ObjectState) {
        match state {
            ObjectState::Alive => self.alive += 1,
            ObjectState::OnFire => self.on_fire += 1,
            ObjectState::Burnt => self.burnt += 1,
        }
    }

    fn decrement(&mut self, state: ObjectState) {
        match state {
            ObjectState::Alive => self.alive -= 1,
            ObjectState::OnFire => self.on_fire -= 1,
            ObjectState::Burnt => self.burnt -= 1,
        }
    }

    fn transition(&mut self, from: ObjectState, to: ObjectState) {
        self.decrement(from);
        self.increment(to);
    }

    /// Whether the per-state counts add up to the total
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        self.alive + self.on_fire + self.burnt == self.total
    }
}

/// Owner of all terrain object records
#[derive(Debug, Default)]
pub struct ObjectRegistry {
    pool: ObjectPool,
    positions: FxHashMap<GridCoord, RecordId>,
    alive: AliveIndex,
    counts: ObjectCounts,
}

impl ObjectRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry whose pool already holds `preload` records
    #[must_use]
    pub fn with_pool(preload: usize) -> Self {
        Self {
            pool: ObjectPool::preloaded(preload),
            ..Self::default()
        }
    }

    /// Place a new alive object at `coord` and register it with its cell
    ///
    /// # Errors
    /// `AlreadyOccupied` if an object is already at `coord`; nothing changes
    pub fn spawn(&mut self, coord: GridCoord, grid: &mut GridPartition) -> SimResult<CellId> {
        if self.positions.contains_key(&coord) {
            return Err(SimulationError::AlreadyOccupied(coord));
        }

        let cell = grid.cell_of(coord);
        let id = self.pool.acquire();
        if let Some(record) = self.pool.get_mut(id) {
            record.activate(coord, cell);
        }

        grid.on_member_added(cell, coord);
        self.positions.insert(coord, id);
        self.alive.insert(coord);
        self.counts.total += 1;
        self.counts.alive += 1;

        trace!("Spawned object at {coord} in {cell}");
        Ok(cell)
    }

    /// Take the object at `coord` out of the world and back into the pool.
    ///
    /// Returns a snapshot of the record as it was before removal; its
    /// `pending_task` is the handle the caller must cancel.
    ///
    /// # Errors
    /// `NotFound` if no object is at `coord`; nothing changes
    pub fn remove(
        &mut self,
        coord: GridCoord,
        grid: &mut GridPartition,
    ) -> SimResult<RemovedObject> {
        let id = self
            .positions
            .remove(&coord)
            .ok_or(SimulationError::NotFound(coord))?;

        let Some(record) = self.pool.get_mut(id) else {
            return Err(SimulationError::NotFound(coord));
        };
        let snapshot = record.clone();
        record.deactivate();
        self.pool.release(id);

        let completes_batch = grid.on_member_removed(
            snapshot.cell,
            coord,
            snapshot.state == ObjectState::Burnt,
        );
        self.alive.remove(coord);
        self.counts.decrement(snapshot.state);
        self.counts.total -= 1;

        trace!("Removed {} object at {coord}", snapshot.state);
        Ok(RemovedObject {
            record: snapshot,
            completes_batch,
        })
    }

    #[must_use]
    pub fn get(&self, coord: GridCoord) -> Option<&TerrainObjectRecord> {
        let id = self.positions.get(&coord)?;
        self.pool.get(*id)
    }

    fn get_mut(&mut self, coord: GridCoord) -> Option<&mut TerrainObjectRecord> {
        let id = self.positions.get(&coord)?;
        self.pool.get_mut(*id)
    }

    #[must_use]
    pub fn is_occupied(&self, coord: GridCoord) -> bool {
        self.positions.contains_key(&coord)
    }

    /// Alive coordinate at `ordinal`; derive the bound from `alive_count()`
    ///
    /// # Errors
    /// `InvalidOrdinal` if `ordinal >= alive_count()`
    pub fn get_alive_by_ordinal(&self, ordinal: usize) -> SimResult<GridCoord> {
        self.alive.get(ordinal).ok_or(SimulationError::InvalidOrdinal {
            index: ordinal,
            len: self.alive.len(),
        })
    }

    #[must_use]
    pub fn is_alive_indexed(&self, coord: GridCoord) -> bool {
        self.alive.contains(coord)
    }

    #[must_use]
    pub fn alive_count(&self) -> usize {
        self.alive.len()
    }

    #[must_use]
    pub fn counts(&self) -> ObjectCounts {
        self.counts
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Records currently in the world
    pub fn iter(&self) -> impl Iterator<Item = &TerrainObjectRecord> + '_ {
        self.pool.active()
    }

    /// Records ever allocated by the pool
    #[must_use]
    pub fn pool_allocated(&self) -> usize {
        self.pool.allocated()
    }

    /// Records waiting in the pool
    #[must_use]
    pub fn pool_available(&self) -> usize {
        self.pool.available()
    }

    /// Return every record to the pool and zero all indices and counters.
    ///
    /// Pending task handles are dropped here; the caller clears the scheduler.
    pub fn clear_all(&mut self, grid: &mut GridPartition) {
        for (_, id) in self.positions.drain() {
            if let Some(record) = self.pool.get_mut(id) {
                record.deactivate();
                self.pool.release(id);
            }
        }
        self.alive.clear();
        self.counts = ObjectCounts::default();
        grid.clear();
    }

    // ------------------------------------------------------------------
    // State setters used by the engine
    // ------------------------------------------------------------------

    /// `Alive` -> `OnFire` with `task` as the pending burn.
    /// Returns the owning cell, or `None` if the object is missing or not alive.
    pub(crate) fn mark_on_fire(&mut self, coord: GridCoord, task: TaskHandle) -> Option<CellId> {
        let record = self.get_mut(coord)?;
        if record.state != ObjectState::Alive || record.burning {
            return None;
        }
        record.state = ObjectState::OnFire;
        record.burning = true;
        record.pending_task = Some(task);
        let cell = record.cell;

        self.alive.remove(coord);
        self.counts.transition(ObjectState::Alive, ObjectState::OnFire);
        Some(cell)
    }

    /// Replace the pending task of an on-fire object
    pub(crate) fn set_pending_task(&mut self, coord: GridCoord, task: Option<TaskHandle>) {
        if let Some(record) = self.get_mut(coord) {
            record.pending_task = task;
        }
    }

    /// `OnFire` -> `Burnt`. Returns the owning cell, or `None` if the object
    /// is missing or no longer on fire.
    pub(crate) fn mark_burnt(&mut self, coord: GridCoord) -> Option<CellId> {
        let record = self.get_mut(coord)?;
        if record.state != ObjectState::OnFire {
            return None;
        }
        record.state = ObjectState::Burnt;
        record.burning = false;
        record.pending_task = None;
        let cell = record.cell;

        self.counts.transition(ObjectState::OnFire, ObjectState::Burnt);
        Some(cell)
    }

    /// `OnFire` -> `Alive` (extinguish). Returns the owning cell and the
    /// pending task the caller must cancel.
    pub(crate) fn mark_alive(&mut self, coord: GridCoord) -> Option<(CellId, Option<TaskHandle>)> {
        let record = self.get_mut(coord)?;
        if record.state != ObjectState::OnFire {
            return None;
        }
        record.state = ObjectState::Alive;
        record.burning = false;
        let pending = record.pending_task.take();
        let cell = record.cell;

        self.alive.insert(coord);
        self.counts.transition(ObjectState::OnFire, ObjectState::Alive);
        Some((cell, pending))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_types::Seconds;
    use crate::simulation::scheduler::{TaskKind, TaskScheduler};

    fn setup() -> (ObjectRegistry, GridPartition) {
        (ObjectRegistry::new(), GridPartition::new(20))
    }

    fn assert_invariants(registry: &ObjectRegistry) {
        let counts = registry.counts();
        assert!(counts.is_consistent(), "inconsistent counts: {counts:?}");
        assert_eq!(counts.total, registry.len());
        assert_eq!(counts.alive, registry.alive_count());
        for record in registry.iter() {
            assert_eq!(
                registry.is_alive_indexed(record.coord()),
                record.state() == ObjectState::Alive
            );
        }
    }

    #[test]
    fn test_spawn_and_lookup() {
        let (mut registry, mut grid) = setup();
        let cell = registry.spawn(GridCoord::new(3, 4), &mut grid).unwrap();

        assert_eq!(cell, CellId::new(0, 0));
        assert!(registry.is_occupied(GridCoord::new(3, 4)));
        let record = registry.get(GridCoord::new(3, 4)).unwrap();
        assert_eq!(record.state(), ObjectState::Alive);
        assert_eq!(record.cell(), cell);
        assert_eq!(grid.cell(cell).unwrap().member_count(), 1);
        assert_invariants(&registry);
    }

    #[test]
    fn test_spawn_rejects_occupied() {
        let (mut registry, mut grid) = setup();
        registry.spawn(GridCoord::new(1, 1), &mut grid).unwrap();
        let err = registry.spawn(GridCoord::new(1, 1), &mut grid).unwrap_err();
        assert_eq!(err, SimulationError::AlreadyOccupied(GridCoord::new(1, 1)));
        assert_eq!(registry.counts().total, 1);
        assert_eq!(grid.cell(CellId::new(0, 0)).unwrap().member_count(), 1);
    }

    #[test]
    fn test_remove_missing_is_not_found() {
        let (mut registry, mut grid) = setup();
        let err = registry.remove(GridCoord::new(9, 9), &mut grid).unwrap_err();
        assert_eq!(err, SimulationError::NotFound(GridCoord::new(9, 9)));
    }

    #[test]
    fn test_remove_updates_counts_by_prior_state() {
        let (mut registry, mut grid) = setup();
        let mut scheduler = TaskScheduler::new();
        for x in 0..3 {
            registry.spawn(GridCoord::new(x, 0), &mut grid).unwrap();
        }
        let task = scheduler.schedule(Seconds::new(1.0), GridCoord::new(1, 0), TaskKind::Burn);
        registry.mark_on_fire(GridCoord::new(1, 0), task).unwrap();

        let removed = registry.remove(GridCoord::new(1, 0), &mut grid).unwrap();
        assert_eq!(removed.record.state(), ObjectState::OnFire);
        assert_eq!(removed.record.pending_task(), Some(task));
        assert!(!removed.completes_batch);

        let counts = registry.counts();
        assert_eq!(counts.total, 2);
        assert_eq!(counts.alive, 2);
        assert_eq!(counts.on_fire, 0);
        assert_invariants(&registry);
    }

    #[test]
    fn test_pool_reuse_does_not_grow() {
        let (mut registry, mut grid) = setup();
        let coords: Vec<_> = (0..10).map(|x| GridCoord::new(x, x)).collect();

        for &coord in &coords {
            registry.spawn(coord, &mut grid).unwrap();
        }
        let allocated = registry.pool_allocated();
        assert_eq!(allocated, 10);

        for &coord in &coords {
            registry.remove(coord, &mut grid).unwrap();
        }
        assert_eq!(registry.pool_available(), 10);

        for &coord in &coords {
            registry.spawn(coord, &mut grid).unwrap();
        }
        assert_eq!(registry.pool_allocated(), allocated);
        assert_invariants(&registry);
    }

    #[test]
    fn test_ordinal_access() {
        let (mut registry, mut grid) = setup();
        registry.spawn(GridCoord::new(0, 0), &mut grid).unwrap();
        assert_eq!(registry.get_alive_by_ordinal(0), Ok(GridCoord::new(0, 0)));
        assert_eq!(
            registry.get_alive_by_ordinal(1),
            Err(SimulationError::InvalidOrdinal { index: 1, len: 1 })
        );
    }

    #[test]
    fn test_state_setters_keep_invariants() {
        let (mut registry, mut grid) = setup();
        let mut scheduler = TaskScheduler::new();
        let coord = GridCoord::new(2, 2);
        registry.spawn(coord, &mut grid).unwrap();

        let task = scheduler.schedule(Seconds::new(1.0), coord, TaskKind::Burn);
        assert!(registry.mark_on_fire(coord, task).is_some());
        assert!(registry.mark_on_fire(coord, task).is_none());
        assert!(!registry.is_alive_indexed(coord));
        assert_invariants(&registry);

        let (_, pending) = registry.mark_alive(coord).unwrap();
        assert_eq!(pending, Some(task));
        assert!(registry.is_alive_indexed(coord));
        assert_invariants(&registry);

        let task = scheduler.schedule(Seconds::new(2.0), coord, TaskKind::Burn);
        registry.mark_on_fire(coord, task).unwrap();
        assert!(registry.mark_burnt(coord).is_some());
        assert!(registry.mark_burnt(coord).is_none());
        assert!(registry.mark_alive(coord).is_none());
        assert_eq!(registry.get(coord).unwrap().state(), ObjectState::Burnt);
        assert_invariants(&registry);
    }

    #[test]
    fn test_clear_all() {
        let (mut registry, mut grid) = setup();
        for x in 0..5 {
            registry.spawn(GridCoord::new(x * 30, 0), &mut grid).unwrap();
        }
        assert_eq!(grid.cell_count(), 5);

        registry.clear_all(&mut grid);
        assert!(registry.is_empty());
        assert_eq!(registry.counts(), ObjectCounts::default());
        assert_eq!(registry.alive_count(), 0);
        assert_eq!(registry.pool_available(), 5);
        assert_eq!(grid.cell_count(), 0);
    }
}
