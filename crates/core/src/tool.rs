//! Pointer tool modes for editing the terrain
//!
//! The UI layer cycles through the modes and applies the selected one at the
//! clicked coordinate. Input handling itself lives outside the core.

use crate::core_types::GridCoord;
use crate::error::SimResult;
use crate::simulation::FireSimulation;
use serde::{Deserialize, Serialize};
use std::fmt;

/// What a click on the terrain does
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ToolMode {
    /// Plant a new object
    #[default]
    Add,
    /// Remove the object under the pointer
    Remove,
    /// Ignite an alive object or extinguish a burning one
    FireWater,
}

impl ToolMode {
    /// Modes in cycling order
    pub const ALL: [ToolMode; 3] = [ToolMode::Add, ToolMode::Remove, ToolMode::FireWater];

    /// Label shown on the mode button
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            ToolMode::Add => "ADD",
            ToolMode::Remove => "REMOVE",
            ToolMode::FireWater => "FIRE/WATER",
        }
    }

    /// Next mode in the cycle, wrapping around
    #[must_use]
    pub fn next(self) -> Self {
        match self {
            ToolMode::Add => ToolMode::Remove,
            ToolMode::Remove => ToolMode::FireWater,
            ToolMode::FireWater => ToolMode::Add,
        }
    }

    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(ToolMode::Add),
            1 => Some(ToolMode::Remove),
            2 => Some(ToolMode::FireWater),
            _ => None,
        }
    }

    pub fn as_u8(&self) -> u8 {
        match self {
            ToolMode::Add => 0,
            ToolMode::Remove => 1,
            ToolMode::FireWater => 2,
        }
    }

    /// Apply this tool at `coord`
    ///
    /// # Errors
    /// `AlreadyOccupied` when adding onto an object, `NotFound` when removing
    /// or toggling fire on an empty coordinate
    pub fn apply(self, sim: &mut FireSimulation, coord: GridCoord) -> SimResult<()> {
        match self {
            ToolMode::Add => sim.spawn(coord),
            ToolMode::Remove => sim.remove(coord),
            ToolMode::FireWater => sim.toggle_fire(coord).map(|_| ()),
        }
    }
}

impl fmt::Display for ToolMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimulationConfig;
    use crate::error::SimulationError;
    use crate::registry::ObjectState;

    #[test]
    fn test_cycle_visits_every_mode() {
        let mut mode = ToolMode::default();
        for expected in ToolMode::ALL {
            assert_eq!(mode, expected);
            mode = mode.next();
        }
        assert_eq!(mode, ToolMode::Add);
    }

    #[test]
    fn test_u8_conversion() {
        for mode in ToolMode::ALL {
            assert_eq!(ToolMode::from_u8(mode.as_u8()), Some(mode));
        }
        assert_eq!(ToolMode::from_u8(3), None);
    }

    #[test]
    fn test_apply_dispatch() {
        let mut sim = FireSimulation::with_seed(SimulationConfig::default(), 3).unwrap();
        let coord = GridCoord::new(4, 4);

        ToolMode::Add.apply(&mut sim, coord).unwrap();
        assert_eq!(
            ToolMode::Add.apply(&mut sim, coord),
            Err(SimulationError::AlreadyOccupied(coord))
        );

        ToolMode::FireWater.apply(&mut sim, coord).unwrap();
        assert_eq!(sim.state_of(coord), Some(ObjectState::OnFire));
        ToolMode::FireWater.apply(&mut sim, coord).unwrap();
        assert_eq!(sim.state_of(coord), Some(ObjectState::Alive));

        ToolMode::Remove.apply(&mut sim, coord).unwrap();
        assert_eq!(sim.state_of(coord), None);
        assert_eq!(
            ToolMode::FireWater.apply(&mut sim, coord),
            Err(SimulationError::NotFound(coord))
        );
    }
}
