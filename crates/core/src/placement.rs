//! Initial population strategies
//!
//! A placement strategy only selects coordinates; `FireSimulation::generate`
//! does the spawning. `NoisePlacement` grows clustered forests: a smooth
//! noise field is sampled once per integer coordinate and every coordinate
//! whose value falls below `density` gets a tree. `spread` controls how many
//! noise features fit across the terrain (higher spread = smaller, more
//! numerous clumps).

use crate::core_types::{value_noise_2d, GridCoord, TerrainBounds};
use rand::Rng;
use rayon::prelude::*;

/// Exclusive upper bound of randomized noise offsets
const NOISE_OFFSET_RANGE: u32 = 1000;

/// Selects the coordinates that receive an object on generation
pub trait PlacementStrategy {
    /// Coordinates to spawn, all inside `bounds`, in a deterministic order
    fn select(&self, bounds: TerrainBounds) -> Vec<GridCoord>;
}

/// Density threshold over 2D value noise
#[derive(Debug, Clone, PartialEq)]
pub struct NoisePlacement {
    /// Noise threshold in [0, 1]; higher fills more of the terrain
    pub density: f32,
    /// Noise features across the terrain extent
    pub spread: f32,
    /// Noise-space offset along x
    pub offset_x: f32,
    /// Noise-space offset along z
    pub offset_z: f32,
    /// Lattice seed
    pub seed: u32,
}

impl NoisePlacement {
    /// Placement with zero offset (the same forest every time)
    #[must_use]
    pub fn new(density: f32, spread: f32) -> Self {
        Self {
            density,
            spread,
            offset_x: 0.0,
            offset_z: 0.0,
            seed: 0,
        }
    }

    /// Placement with offsets drawn from `rng` so each generation differs
    pub fn randomized<R: Rng>(density: f32, spread: f32, rng: &mut R) -> Self {
        Self {
            density,
            spread,
            offset_x: rng.random_range(0..NOISE_OFFSET_RANGE) as f32,
            offset_z: rng.random_range(0..NOISE_OFFSET_RANGE) as f32,
            seed: 0,
        }
    }

    pub fn with_offset(mut self, offset_x: f32, offset_z: f32) -> Self {
        self.offset_x = offset_x;
        self.offset_z = offset_z;
        self
    }

    pub fn with_seed(mut self, seed: u32) -> Self {
        self.seed = seed;
        self
    }

    /// Noise value at a world coordinate
    #[must_use]
    pub fn sample(&self, x: u32, z: u32, bounds: TerrainBounds) -> f32 {
        let nx = x as f32 / bounds.width.max(1) as f32 * self.spread + self.offset_x;
        let nz = z as f32 / bounds.depth.max(1) as f32 * self.spread + self.offset_z;
        value_noise_2d(nx, nz, self.seed)
    }
}

impl PlacementStrategy for NoisePlacement {
    fn select(&self, bounds: TerrainBounds) -> Vec<GridCoord> {
        // Rows are independent; rayon keeps the row-major order on collect
        (0..bounds.depth)
            .into_par_iter()
            .flat_map_iter(|z| {
                (0..bounds.width).filter_map(move |x| {
                    (self.sample(x, z, bounds) < self.density)
                        .then(|| GridCoord::new(x as i32, z as i32))
                })
            })
            .collect()
    }
}

/// A fixed list of coordinates, for scenarios and tests
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExplicitPlacement(pub Vec<GridCoord>);

impl PlacementStrategy for ExplicitPlacement {
    fn select(&self, bounds: TerrainBounds) -> Vec<GridCoord> {
        self.0
            .iter()
            .copied()
            .filter(|coord| bounds.contains(*coord))
            .collect()
    }
}
