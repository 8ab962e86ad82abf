use std::cell::Cell;
use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::rc::Rc;

use tracing::trace;

use crate::error::SimError;
use crate::process::ProcessId;
use crate::time::SimTime;

/// A pending resumption stored in the scheduler: which process to resume and
/// the instant it is due.
///
/// Entries are ordered primarily by due time. The insertion sequence breaks
/// ties, so events landing on the same instant resume in the order they were
/// scheduled — first scheduled, first resumed.
#[derive(Debug, Clone, Copy)]
pub struct EventEntry {
    time: SimTime,
    seq: u64,
    process: ProcessId,
}

impl EventEntry {
    /// The instant this resumption is due.
    pub fn time(&self) -> SimTime {
        self.time
    }

    /// The process to resume.
    pub fn process(&self) -> ProcessId {
        self.process
    }

    /// Position in the global scheduling order.
    pub fn seq(&self) -> u64 {
        self.seq
    }
}

impl PartialEq for EventEntry {
    fn eq(&self, other: &Self) -> bool {
        self.time == other.time && self.seq == other.seq
    }
}

impl Eq for EventEntry {}

impl PartialOrd for EventEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for EventEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse the ordering for min-heap behavior in BinaryHeap.
        // Lower sequence wins among entries due at the same instant.
        other
            .time
            .cmp(&self.time)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

type Clock = Rc<Cell<SimTime>>;

/// This struct exposes only immutable access to the simulation clock.
/// The clock itself is owned by the scheduler, while others can obtain a
/// `ClockRef` to read the current simulation time.
///
/// # Example
///
/// ```
/// # use jobshop_core::Scheduler;
/// let scheduler = Scheduler::default();
/// let clock_ref = scheduler.clock();
/// assert_eq!(clock_ref.time(), scheduler.time());
/// ```
pub struct ClockRef {
    clock: Clock,
}

impl ClockRef {
    /// Return the current simulation time.
    #[must_use]
    pub fn time(&self) -> SimTime {
        self.clock.get()
    }
}

/// Scheduler is used to keep the current time and information about the
/// upcoming resumptions.
///
/// The clock is monotone: it only ever moves forward, and only to the due
/// time of the event being popped.
pub struct Scheduler {
    next_seq: u64,
    events: BinaryHeap<EventEntry>,
    clock: Clock,
}

impl Default for Scheduler {
    fn default() -> Self {
        Self {
            next_seq: 0,
            events: BinaryHeap::default(),
            clock: Rc::new(Cell::new(SimTime::default())),
        }
    }
}

impl Scheduler {
    /// Schedules `process` to resume at `self.time() + delay`.
    ///
    /// Returns the due time of the new event.
    pub fn schedule_after(&mut self, delay: SimTime, process: ProcessId) -> SimTime {
        self.next_seq += 1;
        let time = self.time() + delay;
        self.events.push(EventEntry {
            time,
            seq: self.next_seq,
            process,
        });
        trace!(%process, due = %time, "scheduled resumption");
        time
    }

    /// Schedules `process` to resume `delay_secs` seconds from now.
    ///
    /// Unlike [`Scheduler::schedule_after`], the delay arrives as raw seconds
    /// — typically fresh out of a duration sampler — and is validated here:
    /// negative or non-finite delays fail with [`SimError::InvalidDelay`].
    pub fn schedule_in(&mut self, delay_secs: f64, process: ProcessId) -> Result<SimTime, SimError> {
        let delay = SimTime::try_from_secs(delay_secs)?;
        Ok(self.schedule_after(delay, process))
    }

    /// Schedules `process` to resume at the current instant.
    pub fn schedule_now(&mut self, process: ProcessId) -> SimTime {
        self.schedule_after(SimTime::zero(), process)
    }

    /// Returns the current simulation time.
    #[must_use]
    pub fn time(&self) -> SimTime {
        self.clock.get()
    }

    /// Returns a structure with immutable access to the simulation time.
    #[must_use]
    pub fn clock(&self) -> ClockRef {
        ClockRef {
            clock: Rc::clone(&self.clock),
        }
    }

    /// Returns a reference to the next scheduled event or `None` if none are left.
    pub fn peek(&self) -> Option<&EventEntry> {
        self.events.peek()
    }

    /// Removes and returns the next scheduled event, advancing the clock to
    /// its due time, or `None` if none are left.
    pub fn pop(&mut self) -> Option<EventEntry> {
        self.events.pop().inspect(|event| {
            self.clock.replace(event.time());
        })
    }

    /// Number of pending events.
    pub fn pending(&self) -> usize {
        self.events.len()
    }
}
