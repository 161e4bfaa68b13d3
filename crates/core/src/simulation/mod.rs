//! Fire spread engine
//!
//! `FireSimulation` owns the registry, the grid partition, the environment
//! and the task scheduler, and drives the per-object combustion state machine:
//!
//! ```text
//!            ignite                 burn task             death task
//!   Alive ──────────────▶ OnFire ───────────────▶ OnFire ───────────────▶ Burnt
//!     ▲                     │      (spread to                (cell may
//!     └──── extinguish ─────┘       neighbours)               batch)
//! ```
//!
//! - Ignition schedules a burn task after the wind-dependent ignition delay
//! - The burn task rolls against the humidity-dependent spread chance and, on
//!   success, ignites every wind-allowed occupied alive neighbour. It then
//!   schedules the death task after the fixed on-fire duration.
//! - The death task turns the object to ash and may raise a batch signal for
//!   its cell
//!
//! All randomness comes from one seedable RNG so a scenario replays exactly.

pub mod events;
pub mod scheduler;

pub use events::{CellEvent, CellEventQueue};
pub use scheduler::{ScheduledTask, TaskHandle, TaskKind, TaskScheduler};

use crate::config::SimulationConfig;
use crate::core_types::{CardinalDirection, CellId, GridCoord, Seconds, TerrainBounds};
use crate::environment::EnvironmentModel;
use crate::error::{SimResult, SimulationError};
use crate::grid::GridPartition;
use crate::placement::{NoisePlacement, PlacementStrategy};
use crate::registry::{ObjectCounts, ObjectRegistry, ObjectState, TerrainObjectRecord};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace, warn};

/// Snapshot of the aggregate simulation state for display
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimulationStats {
    pub total: usize,
    pub alive: usize,
    pub on_fire: usize,
    pub burnt: usize,
    pub cells: usize,
    pub pending_tasks: usize,
    pub elapsed: Seconds,
    pub paused: bool,
}

/// The fire spread simulation
#[derive(Debug)]
pub struct FireSimulation {
    config: SimulationConfig,
    registry: ObjectRegistry,
    grid: GridPartition,
    environment: EnvironmentModel,
    scheduler: TaskScheduler,
    events: CellEventQueue,
    rng: StdRng,
    elapsed: Seconds,
    paused: bool,
}

impl FireSimulation {
    /// Create a simulation seeded from the operating system
    ///
    /// # Errors
    /// `InvalidConfig` if the configuration fails validation
    pub fn new(config: SimulationConfig) -> SimResult<Self> {
        Self::with_rng(config, StdRng::from_os_rng())
    }

    /// Create a simulation with a fixed seed for reproducible runs
    ///
    /// # Errors
    /// `InvalidConfig` if the configuration fails validation
    pub fn with_seed(config: SimulationConfig, seed: u64) -> SimResult<Self> {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: SimulationConfig, rng: StdRng) -> SimResult<Self> {
        config.validate()?;
        info!(
            "Creating fire simulation: cell size {}, pool preload {}",
            config.cell_size, config.pool_preload
        );
        Ok(Self {
            registry: ObjectRegistry::with_pool(config.pool_preload),
            grid: GridPartition::new(config.cell_size),
            environment: EnvironmentModel::default(),
            scheduler: TaskScheduler::new(),
            events: CellEventQueue::new(),
            rng,
            elapsed: Seconds::ZERO,
            paused: false,
            config,
        })
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    #[must_use]
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    #[must_use]
    pub fn registry(&self) -> &ObjectRegistry {
        &self.registry
    }

    #[must_use]
    pub fn grid(&self) -> &GridPartition {
        &self.grid
    }

    #[must_use]
    pub fn environment(&self) -> &EnvironmentModel {
        &self.environment
    }

    /// Mutable environment for the UI layer's setters
    pub fn environment_mut(&mut self) -> &mut EnvironmentModel {
        &mut self.environment
    }

    pub fn set_environment(&mut self, environment: EnvironmentModel) {
        self.environment = environment;
    }

    #[must_use]
    pub fn get(&self, coord: GridCoord) -> Option<&TerrainObjectRecord> {
        self.registry.get(coord)
    }

    #[must_use]
    pub fn state_of(&self, coord: GridCoord) -> Option<ObjectState> {
        self.registry.get(coord).map(TerrainObjectRecord::state)
    }

    #[must_use]
    pub fn counts(&self) -> ObjectCounts {
        self.registry.counts()
    }

    /// Simulation clock (stops while paused)
    #[must_use]
    pub fn elapsed(&self) -> Seconds {
        self.elapsed
    }

    #[must_use]
    pub fn pending_task_count(&self) -> usize {
        self.scheduler.len()
    }

    /// Deadline of the next scheduled transition, if any
    #[must_use]
    pub fn next_deadline(&self) -> Option<Seconds> {
        self.scheduler.next_deadline()
    }

    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Freeze or resume the clock. Paused ticks run no transitions.
    pub fn set_paused(&mut self, paused: bool) {
        if self.paused != paused {
            debug!("Simulation {}", if paused { "paused" } else { "resumed" });
        }
        self.paused = paused;
    }

    /// Events queued since the last drain
    #[must_use]
    pub fn pending_cell_events(&self) -> &[CellEvent] {
        self.events.pending()
    }

    /// Take every queued cell event for the renderer
    pub fn drain_cell_events(&mut self) -> Vec<CellEvent> {
        self.events.take_pending()
    }

    /// Batch-ready signals raised since creation or the last clear
    #[must_use]
    pub fn batch_ready_total(&self) -> u64 {
        self.events.batch_ready_total()
    }

    #[must_use]
    pub fn stats(&self) -> SimulationStats {
        let counts = self.registry.counts();
        SimulationStats {
            total: counts.total,
            alive: counts.alive,
            on_fire: counts.on_fire,
            burnt: counts.burnt,
            cells: self.grid.cell_count(),
            pending_tasks: self.scheduler.len(),
            elapsed: self.elapsed,
            paused: self.paused,
        }
    }

    // ------------------------------------------------------------------
    // Population
    // ------------------------------------------------------------------

    /// Place a new alive object
    ///
    /// # Errors
    /// `AlreadyOccupied` if the coordinate is taken
    pub fn spawn(&mut self, coord: GridCoord) -> SimResult<()> {
        let cell = self.registry.spawn(coord, &mut self.grid)?;
        self.dirty_cell(cell);
        Ok(())
    }

    /// Remove an object in any state, cancelling its pending transition.
    ///
    /// Removing the last unburnt member of a cell whose other members all
    /// burnt completes that cell's batch.
    ///
    /// # Errors
    /// `NotFound` if no object is at the coordinate
    pub fn remove(&mut self, coord: GridCoord) -> SimResult<()> {
        let removed = self.registry.remove(coord, &mut self.grid)?;
        if let Some(task) = removed.record.pending_task() {
            self.scheduler.cancel(task);
        }
        let cell = removed.record.cell();
        if removed.completes_batch {
            debug!("Removal at {coord} left {cell} fully burnt, batch ready");
            self.events.push(CellEvent::BatchReady {
                cell,
                state: ObjectState::Burnt,
            });
        } else {
            self.dirty_cell(cell);
        }
        Ok(())
    }

    /// Reset to an empty world: every record back to the pool, every timer
    /// cancelled, counters and clock zeroed. Environment and pause state are
    /// kept since they belong to the UI.
    pub fn clear_all(&mut self) {
        let removed = self.registry.len();
        self.registry.clear_all(&mut self.grid);
        self.scheduler.clear();
        self.events.clear();
        self.events.push(CellEvent::Cleared);
        self.elapsed = Seconds::ZERO;
        info!("Cleared simulation ({removed} objects returned to pool)");
    }

    /// Clear, then populate from `strategy`. Every populated cell starts out
    /// batched as alive. Returns the number of objects spawned.
    pub fn generate(&mut self, strategy: &dyn PlacementStrategy, bounds: TerrainBounds) -> usize {
        self.clear_all();

        let mut spawned = 0;
        for coord in strategy.select(bounds) {
            match self.registry.spawn(coord, &mut self.grid) {
                Ok(_) => spawned += 1,
                Err(e) => warn!("Skipping placement: {e}"),
            }
        }

        let mut cells: Vec<CellId> = self
            .grid
            .cells()
            .filter(|(_, cell)| cell.member_count() > 0)
            .map(|(id, _)| id)
            .collect();
        cells.sort_unstable();
        for cell in cells {
            self.grid.mark_batched(cell);
            self.events.push(CellEvent::BatchReady {
                cell,
                state: ObjectState::Alive,
            });
        }

        info!(
            "Generated {spawned} objects across {} cells",
            self.grid.cell_count()
        );
        spawned
    }

    /// `generate` with noise offsets drawn from the simulation RNG
    pub fn generate_forest(&mut self, density: f32, spread: f32, bounds: TerrainBounds) -> usize {
        let placement = NoisePlacement::randomized(density, spread, &mut self.rng);
        self.generate(&placement, bounds)
    }

    // ------------------------------------------------------------------
    // Combustion
    // ------------------------------------------------------------------

    /// Set an alive object on fire. Returns whether it ignited; missing,
    /// burning and burnt objects are left alone.
    pub fn ignite(&mut self, coord: GridCoord) -> bool {
        let now = self.elapsed;
        self.ignite_at(coord, now)
    }

    fn ignite_at(&mut self, coord: GridCoord, now: Seconds) -> bool {
        match self.registry.get(coord) {
            Some(record) if record.state() == ObjectState::Alive && !record.is_burning() => {}
            _ => return false,
        }

        let delay = self.environment.ignition_delay(
            self.config.base_ignition_delay,
            self.config.min_ignition_delay,
            self.config.ignition_jitter,
            &mut self.rng,
        );
        let task = self.scheduler.schedule(now + delay, coord, TaskKind::Burn);
        match self.registry.mark_on_fire(coord, task) {
            Some(cell) => {
                self.dirty_cell(cell);
                trace!("Ignited {coord}, spreading in {delay}");
                true
            }
            None => {
                self.scheduler.cancel(task);
                false
            }
        }
    }

    /// Put out an on-fire object, returning it to alive. Returns whether it
    /// was on fire.
    pub fn extinguish(&mut self, coord: GridCoord) -> bool {
        let Some((cell, pending)) = self.registry.mark_alive(coord) else {
            return false;
        };
        if let Some(task) = pending {
            self.scheduler.cancel(task);
        }
        self.dirty_cell(cell);
        trace!("Extinguished {coord}");
        true
    }

    /// Ignite an alive object or extinguish a burning one
    ///
    /// # Errors
    /// `NotFound` if no object is at the coordinate
    pub fn toggle_fire(&mut self, coord: GridCoord) -> SimResult<ObjectState> {
        let state = self
            .state_of(coord)
            .ok_or(SimulationError::NotFound(coord))?;
        match state {
            ObjectState::Alive => {
                self.ignite(coord);
            }
            ObjectState::OnFire => {
                self.extinguish(coord);
            }
            ObjectState::Burnt => {}
        }
        Ok(self.state_of(coord).unwrap_or(state))
    }

    /// Ignite `count` uniformly chosen alive objects. Draws are independent,
    /// so fewer than `count` may ignite. Returns how many did.
    pub fn ignite_random(&mut self, count: usize) -> usize {
        let mut ignited = 0;
        for _ in 0..count {
            let alive = self.registry.alive_count();
            if alive == 0 {
                break;
            }
            let ordinal = self.rng.random_range(0..alive);
            let Ok(coord) = self.registry.get_alive_by_ordinal(ordinal) else {
                continue;
            };
            if self.ignite(coord) {
                ignited += 1;
            }
        }
        if ignited > 0 {
            debug!("Random fire ignited {ignited} objects");
        }
        ignited
    }

    /// Start a fire at a random number of places in
    /// `[1, max_random_fire_hits)`. Returns how many objects ignited.
    pub fn start_random_fire(&mut self) -> usize {
        if self.registry.alive_count() == 0 {
            return 0;
        }
        let hits = self.rng.random_range(1..self.config.max_random_fire_hits) as usize;
        self.ignite_random(hits)
    }

    // ------------------------------------------------------------------
    // Time
    // ------------------------------------------------------------------

    /// Advance the clock by `dt` and run every transition that became due.
    /// Returns the number of tasks executed.
    pub fn update(&mut self, dt: Seconds) -> usize {
        if self.paused {
            return 0;
        }
        self.elapsed += dt;

        let mut executed = 0;
        while let Some(task) = self.scheduler.pop_due(self.elapsed) {
            self.run_task(task);
            executed += 1;
        }
        executed
    }

    /// Step the clock in increments of at most `step` until `duration` has
    /// passed. Returns the number of tasks executed.
    pub fn run_for(&mut self, duration: Seconds, step: Seconds) -> usize {
        let mut executed = 0;
        let mut remaining = *duration;
        let step = step.max(Seconds::new(1e-3));
        while remaining > 0.0 {
            let dt = remaining.min(*step);
            executed += self.update(Seconds::from(dt));
            remaining -= dt;
            if self.paused {
                break;
            }
        }
        executed
    }

    fn run_task(&mut self, task: ScheduledTask) {
        // Tasks are timed from their own deadline so that a long tick
        // produces the same schedule as many short ones
        match task.kind {
            TaskKind::Burn => self.burn(task.target, task.deadline),
            TaskKind::Death => self.burn_out(task.target),
        }
    }

    /// Burn step: try to spread, then schedule death
    fn burn(&mut self, coord: GridCoord, now: Seconds) {
        if self.state_of(coord) != Some(ObjectState::OnFire) {
            return;
        }

        let roll: f32 = self.rng.random_range(0.0..100.0);
        if roll < *self.environment.spread_chance() {
            for direction in CardinalDirection::ALL {
                if !self.environment.wind_allows(direction) {
                    continue;
                }
                let neighbor = coord.neighbor(direction);
                if self.state_of(neighbor) == Some(ObjectState::Alive) {
                    self.ignite_at(neighbor, now);
                }
            }
        }

        let death = self
            .scheduler
            .schedule(now + self.config.on_fire_duration, coord, TaskKind::Death);
        self.registry.set_pending_task(coord, Some(death));
    }

    /// Death step: on-fire becomes burnt, possibly completing the cell
    fn burn_out(&mut self, coord: GridCoord) {
        let Some(cell) = self.registry.mark_burnt(coord) else {
            return;
        };
        if self.grid.on_member_burnt(cell) {
            debug!("All members of {cell} burnt, batch ready");
            self.events.push(CellEvent::BatchReady {
                cell,
                state: ObjectState::Burnt,
            });
        }
    }

    /// Invalidate a merged cell after one of its members changed
    fn dirty_cell(&mut self, cell: CellId) {
        if self.grid.invalidate(cell) {
            self.events.push(CellEvent::Dirtied { cell });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_types::{Degrees, Percent};

    fn sim() -> FireSimulation {
        FireSimulation::with_seed(SimulationConfig::default(), 42).unwrap()
    }

    fn spawn_all(sim: &mut FireSimulation, coords: &[(i32, i32)]) {
        for &(x, z) in coords {
            sim.spawn(GridCoord::new(x, z)).unwrap();
        }
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = SimulationConfig::default().with_cell_size(-4);
        assert!(FireSimulation::with_seed(config, 1).is_err());
    }

    #[test]
    fn test_ignite_is_idempotent() {
        let mut sim = sim();
        spawn_all(&mut sim, &[(0, 0)]);
        let coord = GridCoord::new(0, 0);

        assert!(sim.ignite(coord));
        let pending = sim.pending_task_count();
        let counts = sim.counts();

        assert!(!sim.ignite(coord));
        assert_eq!(sim.pending_task_count(), pending);
        assert_eq!(sim.counts(), counts);
        assert!(!sim.ignite(GridCoord::new(7, 7)));
    }

    #[test]
    fn test_humid_air_never_spreads() {
        let mut sim = sim();
        sim.environment_mut().set_humidity(Percent::new(100.0));
        spawn_all(&mut sim, &[(5, 5), (5, 6), (5, 4), (4, 5), (6, 5)]);

        sim.ignite(GridCoord::new(5, 5));
        sim.run_for(Seconds::new(5.0), Seconds::new(0.05));

        assert_eq!(sim.state_of(GridCoord::new(5, 5)), Some(ObjectState::Burnt));
        let counts = sim.counts();
        assert_eq!(counts.alive, 4);
        assert_eq!(counts.burnt, 1);
    }

    #[test]
    fn test_extinguish_cancels_burn() {
        let mut sim = sim();
        spawn_all(&mut sim, &[(0, 0), (0, 1)]);
        let coord = GridCoord::new(0, 0);

        sim.ignite(coord);
        assert!(sim.extinguish(coord));
        assert!(!sim.extinguish(coord));
        assert_eq!(sim.pending_task_count(), 0);

        sim.run_for(Seconds::new(5.0), Seconds::new(0.1));
        assert_eq!(sim.state_of(coord), Some(ObjectState::Alive));
        assert_eq!(sim.state_of(GridCoord::new(0, 1)), Some(ObjectState::Alive));
        assert!(sim.registry().is_alive_indexed(coord));
    }

    #[test]
    fn test_extinguish_during_death_window() {
        let config = SimulationConfig::default().with_on_fire_duration(Seconds::new(5.0));
        let mut sim = FireSimulation::with_seed(config, 42).unwrap();
        sim.environment_mut().set_humidity(Percent::new(100.0));
        spawn_all(&mut sim, &[(0, 0)]);
        let coord = GridCoord::new(0, 0);
        sim.ignite(coord);

        // Burn step has run, death is pending
        assert_eq!(sim.update(Seconds::new(2.0)), 1);
        assert_eq!(sim.pending_task_count(), 1);

        assert!(sim.extinguish(coord));
        assert_eq!(sim.pending_task_count(), 0);
        sim.run_for(Seconds::new(10.0), Seconds::new(0.5));
        assert_eq!(sim.state_of(coord), Some(ObjectState::Alive));
    }

    #[test]
    fn test_toggle_fire() {
        let mut sim = sim();
        spawn_all(&mut sim, &[(3, 3)]);
        let coord = GridCoord::new(3, 3);

        assert_eq!(sim.toggle_fire(coord), Ok(ObjectState::OnFire));
        assert_eq!(sim.toggle_fire(coord), Ok(ObjectState::Alive));
        assert!(sim.toggle_fire(GridCoord::new(0, 0)).is_err());
    }

    #[test]
    fn test_remove_cancels_pending_task() {
        let mut sim = sim();
        spawn_all(&mut sim, &[(0, 0), (1, 0)]);
        sim.ignite(GridCoord::new(0, 0));
        assert_eq!(sim.pending_task_count(), 1);

        sim.remove(GridCoord::new(0, 0)).unwrap();
        assert_eq!(sim.pending_task_count(), 0);
        sim.run_for(Seconds::new(3.0), Seconds::new(0.1));
        assert_eq!(sim.state_of(GridCoord::new(1, 0)), Some(ObjectState::Alive));
        assert!(sim.counts().is_consistent());
    }

    #[test]
    fn test_removing_last_unburnt_member_batches_cell() {
        let mut sim = sim();
        sim.environment_mut().set_humidity(Percent::new(100.0));
        spawn_all(&mut sim, &[(0, 0), (1, 0), (2, 0)]);
        sim.ignite(GridCoord::new(0, 0));
        sim.ignite(GridCoord::new(1, 0));
        sim.run_for(Seconds::new(3.0), Seconds::new(0.1));
        assert_eq!(sim.counts().burnt, 2);
        assert_eq!(sim.batch_ready_total(), 0);
        sim.drain_cell_events();

        sim.remove(GridCoord::new(2, 0)).unwrap();
        let cell = sim.grid().cell_of(GridCoord::new(0, 0));
        assert_eq!(sim.batch_ready_total(), 1);
        assert!(sim.grid().cell(cell).unwrap().is_batched());
        assert_eq!(
            sim.drain_cell_events(),
            vec![CellEvent::BatchReady {
                cell,
                state: ObjectState::Burnt
            }]
        );
    }

    #[test]
    fn test_pause_freezes_transitions() {
        let mut sim = sim();
        spawn_all(&mut sim, &[(0, 0)]);
        sim.ignite(GridCoord::new(0, 0));

        sim.set_paused(true);
        assert_eq!(sim.update(Seconds::new(10.0)), 0);
        assert_eq!(sim.elapsed(), Seconds::ZERO);
        assert_eq!(sim.state_of(GridCoord::new(0, 0)), Some(ObjectState::OnFire));

        sim.set_paused(false);
        sim.update(Seconds::new(10.0));
        assert_eq!(sim.state_of(GridCoord::new(0, 0)), Some(ObjectState::Burnt));
    }

    #[test]
    fn test_long_tick_catches_up() {
        let mut sim = sim();
        spawn_all(&mut sim, &[(0, 0), (1, 0), (2, 0), (3, 0)]);
        sim.ignite(GridCoord::new(0, 0));

        // One huge tick runs the whole chain
        sim.update(Seconds::new(60.0));
        assert_eq!(sim.counts().burnt, 4);
        assert_eq!(sim.pending_task_count(), 0);
    }

    #[test]
    fn test_ignite_random_with_no_alive_objects() {
        let mut sim = sim();
        assert_eq!(sim.ignite_random(3), 0);
        assert_eq!(sim.start_random_fire(), 0);
    }

    #[test]
    fn test_start_random_fire_bounds() {
        let mut sim = sim();
        let coords: Vec<_> = (0..50).map(|i| (i * 3, 0)).collect();
        spawn_all(&mut sim, &coords);

        let ignited = sim.start_random_fire();
        assert!((1..5).contains(&ignited), "ignited {ignited}");
        assert_eq!(sim.counts().on_fire, ignited);
    }

    #[test]
    fn test_generate_batches_populated_cells() {
        let mut sim = sim();
        let bounds = TerrainBounds::new(60, 40);
        let spawned = sim.generate(&NoisePlacement::new(1.5, 4.0), bounds);
        assert_eq!(spawned, bounds.area());

        let events = sim.drain_cell_events();
        assert_eq!(events.first(), Some(&CellEvent::Cleared));
        let batched = events
            .iter()
            .filter(|e| matches!(e, CellEvent::BatchReady { state: ObjectState::Alive, .. }))
            .count();
        assert_eq!(batched, 6);

        // First ignition in a batched cell dirties it exactly once
        sim.ignite(GridCoord::new(0, 0));
        sim.ignite(GridCoord::new(5, 5));
        assert_eq!(
            sim.drain_cell_events(),
            vec![CellEvent::Dirtied {
                cell: CellId::new(0, 0)
            }]
        );
    }

    #[test]
    fn test_clear_all_resets_everything() {
        let mut sim = sim();
        sim.environment_mut().set_wind_direction(Degrees::new(90.0));
        spawn_all(&mut sim, &[(0, 0), (0, 1), (40, 40)]);
        sim.ignite(GridCoord::new(0, 0));
        sim.update(Seconds::new(0.2));

        sim.clear_all();
        assert_eq!(sim.counts(), ObjectCounts::default());
        assert_eq!(sim.pending_task_count(), 0);
        assert_eq!(sim.elapsed(), Seconds::ZERO);
        assert_eq!(sim.grid().cell_count(), 0);
        assert_eq!(sim.environment().wind_direction(), Degrees::new(90.0));
        assert_eq!(sim.registry().pool_available(), 3);
    }
}
