//! Terrain object records and their combustion state

use crate::core_types::{CellId, GridCoord};
use crate::simulation::scheduler::TaskHandle;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Combustion state of a terrain object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ObjectState {
    /// Unburnt; eligible for ignition and random selection
    #[default]
    Alive,
    /// Burning; will attempt to spread and then burn out
    OnFire,
    /// Ash. Terminal until the simulation is cleared.
    Burnt,
}

impl ObjectState {
    /// Convert from u8 for front-end compatibility
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(ObjectState::Alive),
            1 => Some(ObjectState::OnFire),
            2 => Some(ObjectState::Burnt),
            _ => None,
        }
    }

    pub fn as_u8(&self) -> u8 {
        match self {
            ObjectState::Alive => 0,
            ObjectState::OnFire => 1,
            ObjectState::Burnt => 2,
        }
    }
}

impl fmt::Display for ObjectState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ObjectState::Alive => "alive",
            ObjectState::OnFire => "on fire",
            ObjectState::Burnt => "burnt",
        };
        f.write_str(name)
    }
}

/// One pooled terrain object (a tree)
#[derive(Debug, Clone, PartialEq)]
pub struct TerrainObjectRecord {
    pub(crate) coord: GridCoord,
    pub(crate) state: ObjectState,
    /// Set while an on-fire object still has its burn/death timer running
    pub(crate) burning: bool,
    pub(crate) cell: CellId,
    pub(crate) pending_task: Option<TaskHandle>,
    /// False while the record sits in the pool
    pub(crate) active: bool,
}

impl TerrainObjectRecord {
    /// A deactivated record, as stored in the pool
    pub(crate) fn inactive() -> Self {
        Self {
            coord: GridCoord::new(0, 0),
            state: ObjectState::Alive,
            burning: false,
            cell: CellId::new(0, 0),
            pending_task: None,
            active: false,
        }
    }

    /// Bring a pooled record into the world at `coord`
    pub(crate) fn activate(&mut self, coord: GridCoord, cell: CellId) {
        self.coord = coord;
        self.cell = cell;
        self.state = ObjectState::Alive;
        self.burning = false;
        self.pending_task = None;
        self.active = true;
    }

    /// Return the record to its pooled state, handing back any pending task
    pub(crate) fn deactivate(&mut self) -> Option<TaskHandle> {
        self.active = false;
        self.burning = false;
        self.state = ObjectState::Alive;
        self.pending_task.take()
    }

    #[must_use]
    pub fn coord(&self) -> GridCoord {
        self.coord
    }

    #[must_use]
    pub fn state(&self) -> ObjectState {
        self.state
    }

    #[must_use]
    pub fn is_burning(&self) -> bool {
        self.burning
    }

    #[must_use]
    pub fn cell(&self) -> CellId {
        self.cell
    }

    #[must_use]
    pub fn pending_task(&self) -> Option<TaskHandle> {
        self.pending_task
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active
    }
}
