//! Core types and utilities

pub mod coord;
pub mod noise;
pub mod units;

pub use coord::{CardinalDirection, CellId, GridCoord, TerrainBounds};
pub use noise::value_noise_2d;
pub use units::{Degrees, Percent, Seconds};
