//! Fire Spread Core Library
//!
//! A grid-based wildfire spread simulation for procedurally generated forest
//! terrain. Each tree or bush occupies one integer coordinate and moves
//! through `Alive -> OnFire -> Burnt`; fire jumps to cardinal neighbours
//! after a wind-dependent delay, gated by wind direction and humidity.
//!
//! ## Layout
//!
//! - `registry`: object pool, position index and alive index with the
//!   aggregate state counters
//! - `simulation`: the `FireSimulation` engine and its deferred task scheduler
//! - `environment`: wind and humidity model
//! - `grid`: coarse cell partition that signals when a cell can be batched
//! - `placement`: noise-based and explicit initial population
//! - `tool`: Add / Remove / Fire-Water pointer modes
//!
//! ## Example
//! ```
//! use fire_spread_core::{FireSimulation, GridCoord, ObjectState, Seconds, SimulationConfig};
//!
//! let mut sim = FireSimulation::with_seed(SimulationConfig::default(), 7).unwrap();
//! sim.spawn(GridCoord::new(0, 0)).unwrap();
//! sim.spawn(GridCoord::new(1, 0)).unwrap();
//! sim.ignite(GridCoord::new(0, 0));
//! sim.run_for(Seconds::new(10.0), Seconds::new(0.1));
//! assert_eq!(sim.state_of(GridCoord::new(1, 0)), Some(ObjectState::Burnt));
//! ```

pub mod config;
pub mod core_types;
pub mod environment;
pub mod error;
pub mod grid;
pub mod placement;
pub mod registry;
pub mod simulation;
pub mod tool;

// Re-export core types
pub use config::SimulationConfig;
pub use core_types::{
    CardinalDirection, CellId, Degrees, GridCoord, Percent, Seconds, TerrainBounds,
};
pub use error::{SimResult, SimulationError};

// Re-export simulation types
pub use environment::EnvironmentModel;
pub use grid::{GridCell, GridPartition};
pub use registry::{ObjectCounts, ObjectRegistry, ObjectState, RemovedObject, TerrainObjectRecord};
pub use simulation::{CellEvent, FireSimulation, SimulationStats, TaskHandle, TaskKind};

// Re-export population and editing types
pub use placement::{ExplicitPlacement, NoisePlacement, PlacementStrategy};
pub use tool::ToolMode;
