//! Integer coordinates used to key terrain objects and grid cells

use serde::{Deserialize, Serialize};
use std::fmt;

/// Integer world coordinate of a terrain object on the ground plane.
///
/// Only one object may occupy a coordinate at a time, so this doubles as the
/// object's identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GridCoord {
    pub x: i32,
    pub z: i32,
}

impl GridCoord {
    #[inline]
    #[must_use]
    pub const fn new(x: i32, z: i32) -> Self {
        GridCoord { x, z }
    }

    /// Adjacent coordinate in the given cardinal direction
    #[inline]
    #[must_use]
    pub fn neighbor(self, direction: CardinalDirection) -> GridCoord {
        let (dx, dz) = direction.offset();
        GridCoord::new(self.x + dx, self.z + dz)
    }

    /// Truncate a world-space hit point onto the integer grid
    #[inline]
    #[must_use]
    pub fn from_world(x: f32, z: f32) -> GridCoord {
        GridCoord::new(x as i32, z as i32)
    }
}

impl From<(i32, i32)> for GridCoord {
    fn from((x, z): (i32, i32)) -> Self {
        GridCoord::new(x, z)
    }
}

impl fmt::Display for GridCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.z)
    }
}

/// Coarse coordinate of a grid cell (world coordinate floor-divided by cell size)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellId {
    pub x: i32,
    pub z: i32,
}

impl CellId {
    #[inline]
    #[must_use]
    pub const fn new(x: i32, z: i32) -> Self {
        CellId { x, z }
    }
}

impl fmt::Display for CellId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cell[{}, {}]", self.x, self.z)
    }
}

/// The four directions fire can propagate in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CardinalDirection {
    /// +z
    North,
    /// -z
    South,
    /// +x
    East,
    /// -x
    West,
}

impl CardinalDirection {
    /// Propagation order used by the burn step
    pub const ALL: [CardinalDirection; 4] = [
        CardinalDirection::North,
        CardinalDirection::South,
        CardinalDirection::West,
        CardinalDirection::East,
    ];

    /// Grid offset `(dx, dz)` for this direction
    #[inline]
    #[must_use]
    pub const fn offset(self) -> (i32, i32) {
        match self {
            CardinalDirection::North => (0, 1),
            CardinalDirection::South => (0, -1),
            CardinalDirection::East => (1, 0),
            CardinalDirection::West => (-1, 0),
        }
    }
}

/// Rectangular terrain extent in integer world units, starting at the origin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TerrainBounds {
    /// Extent along x
    pub width: u32,
    /// Extent along z
    pub depth: u32,
}

impl TerrainBounds {
    #[must_use]
    pub const fn new(width: u32, depth: u32) -> Self {
        TerrainBounds { width, depth }
    }

    /// Number of integer coordinates inside the bounds
    #[must_use]
    pub fn area(&self) -> usize {
        self.width as usize * self.depth as usize
    }

    #[must_use]
    pub fn contains(&self, coord: GridCoord) -> bool {
        coord.x >= 0
            && coord.z >= 0
            && (coord.x as u32) < self.width
            && (coord.z as u32) < self.depth
    }
}
