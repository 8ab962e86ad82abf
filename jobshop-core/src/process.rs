//! Cooperative processes: resumable units of control driven by the scheduler

use std::collections::HashMap;
use std::fmt;

use crate::error::SimError;
use crate::Context;

/// Unique identifier for a process registered with the simulation.
///
/// Handles are sequential and session-local, so the event order they induce
/// is reproducible across runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProcessId(pub u64);

impl fmt::Display for ProcessId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Process({})", self.0)
    }
}

/// What a resumption produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Progress {
    /// The process suspended again: it armed a timer through the scheduler,
    /// or parked itself in a resource's waiter queue.
    Suspended,
    /// The process body ran to completion; the table drops it.
    Terminated,
}

/// A suspended computation driven by the scheduler.
///
/// Implementations are state machines: each `resume` call runs the body from
/// its last suspension point up to the next one (or to completion),
/// scheduling whatever wakeup it needs through the [`Context`]. A live
/// process has at most one pending event at any time.
pub trait Process {
    fn resume(&mut self, self_id: ProcessId, cx: &mut Context<'_>) -> Result<Progress, SimError>;
}

/// Table of live processes keyed by handle.
///
/// Owned by the simulation session; processes enter when spawned and leave
/// when their body completes.
#[derive(Default)]
pub struct ProcessTable {
    slots: HashMap<ProcessId, Box<dyn Process>>,
    next_id: u64,
}

impl ProcessTable {
    /// Registers a new process and returns its handle.
    #[must_use]
    pub fn register(&mut self, process: Box<dyn Process>) -> ProcessId {
        self.next_id += 1;
        let id = ProcessId(self.next_id);
        self.slots.insert(id, process);
        id
    }

    /// Removes the process for the duration of its resumption.
    pub(crate) fn take(&mut self, id: ProcessId) -> Option<Box<dyn Process>> {
        self.slots.remove(&id)
    }

    /// Puts a suspended process back after its resumption.
    pub(crate) fn restore(&mut self, id: ProcessId, process: Box<dyn Process>) {
        self.slots.insert(id, process);
    }

    /// Whether the process is still live.
    pub fn contains(&self, id: ProcessId) -> bool {
        self.slots.contains_key(&id)
    }

    /// Number of live processes.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Idle;

    impl Process for Idle {
        fn resume(
            &mut self,
            _self_id: ProcessId,
            _cx: &mut Context<'_>,
        ) -> Result<Progress, SimError> {
            Ok(Progress::Terminated)
        }
    }

    #[test]
    fn test_register_assigns_distinct_ids() {
        let mut table = ProcessTable::default();
        let a = table.register(Box::new(Idle));
        let b = table.register(Box::new(Idle));
        assert_ne!(a, b);
        assert_eq!(table.len(), 2);
        assert!(table.contains(a));
        assert!(table.contains(b));
    }

    #[test]
    fn test_take_and_restore() {
        let mut table = ProcessTable::default();
        let id = table.register(Box::new(Idle));

        let process = table.take(id).unwrap();
        assert!(!table.contains(id));

        table.restore(id, process);
        assert!(table.contains(id));
        assert!(table.take(ProcessId(999)).is_none());
    }
}
