//! Errors returned by registry and engine operations
//!
//! Every variant is local and recoverable: the operation that produced it made
//! no change to the simulation, so callers are free to ignore it.

use crate::core_types::GridCoord;

/// Errors that can occur while mutating the simulation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimulationError {
    /// Spawn requested at a coordinate that is already occupied
    AlreadyOccupied(GridCoord),
    /// Operation targeted a coordinate with no object
    NotFound(GridCoord),
    /// Random-access index outside the alive set
    InvalidOrdinal {
        /// Requested ordinal
        index: usize,
        /// Alive count at the time of the call
        len: usize,
    },
    /// Configuration value outside its valid range
    InvalidConfig(String),
}

impl std::fmt::Display for SimulationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SimulationError::AlreadyOccupied(coord) => {
                write!(f, "Coordinate {coord} is already occupied")
            }
            SimulationError::NotFound(coord) => write!(f, "No object at {coord}"),
            SimulationError::InvalidOrdinal { index, len } => {
                write!(f, "Alive ordinal {index} out of bounds for {len} alive objects")
            }
            SimulationError::InvalidConfig(msg) => write!(f, "Invalid configuration: {msg}"),
        }
    }
}

impl std::error::Error for SimulationError {}

/// Result alias for simulation operations
pub type SimResult<T> = Result<T, SimulationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = SimulationError::AlreadyOccupied(GridCoord::new(1, 2));
        assert_eq!(err.to_string(), "Coordinate (1, 2) is already occupied");

        let err = SimulationError::InvalidOrdinal { index: 4, len: 3 };
        assert_eq!(
            err.to_string(),
            "Alive ordinal 4 out of bounds for 3 alive objects"
        );
    }
}
