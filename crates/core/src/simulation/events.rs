//! Render signals emitted by the simulation
//!
//! The simulation never touches visual resources. Instead it queues cell
//! events that a renderer drains once per frame:
//!
//! - `BatchReady`: every member of a cell is in the same state and may be
//!   merged into one mesh
//! - `Dirtied`: a merged cell changed and must be split back into members
//! - `Cleared`: the whole world was reset

use crate::core_types::CellId;
use crate::registry::ObjectState;

/// Signal for an external renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellEvent {
    /// All members of `cell` share `state` and can be merged
    BatchReady { cell: CellId, state: ObjectState },
    /// A merged batch for `cell` is no longer valid
    Dirtied { cell: CellId },
    /// Every cell was discarded by a full reset
    Cleared,
}

/// Events queued since the renderer last drained
#[derive(Debug, Default)]
pub struct CellEventQueue {
    pending: Vec<CellEvent>,
    /// Lifetime count of `BatchReady` events, kept across drains
    batch_ready_total: u64,
}

impl CellEventQueue {
    #[must_use]
    pub fn new() -> Self {
        Self {
            pending: Vec::with_capacity(32),
            batch_ready_total: 0,
        }
    }

    pub fn push(&mut self, event: CellEvent) {
        if matches!(event, CellEvent::BatchReady { .. }) {
            self.batch_ready_total += 1;
        }
        self.pending.push(event);
    }

    /// Events not yet drained
    #[must_use]
    pub fn pending(&self) -> &[CellEvent] {
        &self.pending
    }

    /// Take all pending events
    pub fn take_pending(&mut self) -> Vec<CellEvent> {
        std::mem::take(&mut self.pending)
    }

    #[must_use]
    pub fn batch_ready_total(&self) -> u64 {
        self.batch_ready_total
    }

    /// Drop pending events and counters (for simulation reset)
    pub fn clear(&mut self) {
        self.pending.clear();
        self.batch_ready_total = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_take_pending_empties_queue() {
        let mut queue = CellEventQueue::new();
        queue.push(CellEvent::Dirtied {
            cell: CellId::new(0, 0),
        });
        assert_eq!(queue.pending().len(), 1);

        let taken = queue.take_pending();
        assert_eq!(taken.len(), 1);
        assert!(queue.pending().is_empty());
    }

    #[test]
    fn test_batch_ready_total_survives_drain() {
        let mut queue = CellEventQueue::new();
        queue.push(CellEvent::BatchReady {
            cell: CellId::new(0, 0),
            state: ObjectState::Burnt,
        });
        queue.push(CellEvent::Dirtied {
            cell: CellId::new(0, 0),
        });
        let _ = queue.take_pending();
        assert_eq!(queue.batch_ready_total(), 1);

        queue.clear();
        assert_eq!(queue.batch_ready_total(), 0);
    }
}
