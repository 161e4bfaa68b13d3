//! Deferred task scheduler for timed combustion transitions
//!
//! Objects do not block while burning. Each timed transition is queued as a
//! task with an absolute deadline on the simulation clock; `FireSimulation`
//! drains every due task once per tick.
//!
//! - Tasks due at the same instant run in scheduling order
//! - Cancelling a handle guarantees the task never runs, even if its deadline
//!   has already passed
//! - Cancellation is lazy: the heap entry stays until it surfaces and is
//!   skipped, so both `schedule` and `cancel` stay O(log n) / O(1)

use crate::core_types::{GridCoord, Seconds};
use rustc_hash::FxHashMap;
use std::cmp::Reverse;
use std::collections::BinaryHeap;

/// Cancellable reference to a scheduled task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskHandle(u64);

/// Which combustion step a task performs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskKind {
    /// Attempt to spread to neighbours, then schedule death
    Burn,
    /// Turn an on-fire object into ash
    Death,
}

/// A transition waiting for its deadline
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScheduledTask {
    pub handle: TaskHandle,
    pub deadline: Seconds,
    pub target: GridCoord,
    pub kind: TaskKind,
}

/// Deadline-ordered queue of combustion tasks
#[derive(Debug, Default)]
pub struct TaskScheduler {
    /// Min-heap on (deadline, sequence)
    queue: BinaryHeap<Reverse<(Seconds, u64)>>,
    /// Live tasks by sequence number; absent means cancelled or run
    tasks: FxHashMap<u64, ScheduledTask>,
    next_seq: u64,
}

impl TaskScheduler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a task to run once the clock reaches `deadline`
    pub fn schedule(&mut self, deadline: Seconds, target: GridCoord, kind: TaskKind) -> TaskHandle {
        let seq = self.next_seq;
        self.next_seq += 1;

        let handle = TaskHandle(seq);
        self.tasks.insert(
            seq,
            ScheduledTask {
                handle,
                deadline,
                target,
                kind,
            },
        );
        self.queue.push(Reverse((deadline, seq)));
        handle
    }

    /// Cancel a pending task. Returns `false` if it already ran or was cancelled.
    pub fn cancel(&mut self, handle: TaskHandle) -> bool {
        self.tasks.remove(&handle.0).is_some()
    }

    #[must_use]
    pub fn is_pending(&self, handle: TaskHandle) -> bool {
        self.tasks.contains_key(&handle.0)
    }

    /// Pop the earliest live task whose deadline is at or before `now`
    pub fn pop_due(&mut self, now: Seconds) -> Option<ScheduledTask> {
        while let Some(&Reverse((deadline, seq))) = self.queue.peek() {
            if deadline > now {
                return None;
            }
            self.queue.pop();
            if let Some(task) = self.tasks.remove(&seq) {
                return Some(task);
            }
        }
        None
    }

    /// Deadline of the earliest live task
    #[must_use]
    pub fn next_deadline(&self) -> Option<Seconds> {
        self.tasks.values().map(|task| task.deadline).min()
    }

    /// Number of live tasks
    #[must_use]
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Cancel everything
    pub fn clear(&mut self) {
        self.queue.clear();
        self.tasks.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(t: f32) -> Seconds {
        Seconds::new(t)
    }

    #[test]
    fn test_pops_in_deadline_order() {
        let mut scheduler = TaskScheduler::new();
        scheduler.schedule(at(0.5), GridCoord::new(0, 0), TaskKind::Death);
        scheduler.schedule(at(0.2), GridCoord::new(1, 0), TaskKind::Burn);
        scheduler.schedule(at(0.2), GridCoord::new(2, 0), TaskKind::Burn);

        assert!(scheduler.pop_due(at(0.1)).is_none());

        let first = scheduler.pop_due(at(1.0)).unwrap();
        let second = scheduler.pop_due(at(1.0)).unwrap();
        let third = scheduler.pop_due(at(1.0)).unwrap();
        assert_eq!(first.target, GridCoord::new(1, 0));
        assert_eq!(second.target, GridCoord::new(2, 0));
        assert_eq!(third.target, GridCoord::new(0, 0));
        assert!(scheduler.is_empty());
    }

    #[test]
    fn test_cancelled_task_never_runs() {
        let mut scheduler = TaskScheduler::new();
        let handle = scheduler.schedule(at(0.1), GridCoord::new(0, 0), TaskKind::Burn);
        assert!(scheduler.is_pending(handle));

        assert!(scheduler.cancel(handle));
        assert!(!scheduler.cancel(handle));
        assert!(scheduler.pop_due(at(10.0)).is_none());
    }

    #[test]
    fn test_deadline_is_inclusive() {
        let mut scheduler = TaskScheduler::new();
        scheduler.schedule(at(0.3), GridCoord::new(0, 0), TaskKind::Burn);
        assert!(scheduler.pop_due(at(0.3)).is_some());
    }

    #[test]
    fn test_next_deadline_skips_cancelled() {
        let mut scheduler = TaskScheduler::new();
        let early = scheduler.schedule(at(0.1), GridCoord::new(0, 0), TaskKind::Burn);
        scheduler.schedule(at(0.4), GridCoord::new(1, 0), TaskKind::Burn);
        scheduler.cancel(early);
        assert_eq!(scheduler.next_deadline(), Some(at(0.4)));
        assert_eq!(scheduler.len(), 1);
    }
}
