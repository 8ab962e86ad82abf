//! Core discrete event simulation engine.
//!
//! This crate provides the building blocks for a cooperative, single-threaded
//! discrete event simulation: virtual time, a time-ordered event queue, and a
//! table of resumable processes.
//!
//! # Architecture Overview
//!
//! The simulation is built around three main types:
//!
//! - [`Simulation`]: the session object owning the scheduler, the process
//!   table, and the random stream. Use this to spawn processes and run.
//!
//! - [`Scheduler`]: virtual clock plus the queue of pending resumptions.
//!   Events due at the same instant resume in the order they were scheduled.
//!
//! - [`Process`]: a resumable state machine. Each resumption runs the body to
//!   its next suspension point — a timer armed through the scheduler, or a
//!   park in some resource's waiter queue — and hands control back.
//!
//! # Basic Usage
//!
//! ```rust,ignore
//! use jobshop_core::{Executor, SimTime, Simulation};
//!
//! let mut simulation = Simulation::with_seed(42);
//! simulation.spawn(Box::new(my_process));
//! simulation.execute(Executor::until(SimTime::from_secs(100)))?;
//! ```
//!
//! # Time Model
//!
//! All timing uses [`SimTime`], which represents simulation time (not
//! wall-clock time). The clock advances only to the due time of the next
//! event, which keeps runs deterministic and reproducible.

pub mod error;
pub mod execute;
pub mod logging;
pub mod process;
pub mod scheduler;
pub mod time;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info, trace, warn};

pub use error::SimError;
pub use execute::{Execute, Executor, ExecutorWithSideEffect};
pub use logging::{init_simulation_logging, init_simulation_logging_with_level};
pub use process::{Process, ProcessId, ProcessTable, Progress};
pub use scheduler::{ClockRef, EventEntry, Scheduler};
pub use time::SimTime;

/// Mutable view of the engine handed to a process while it runs.
///
/// Everything a resuming process may touch goes through here: the scheduler
/// for arming its next wakeup, the session's random stream, and spawning of
/// further processes.
pub struct Context<'a> {
    pub scheduler: &'a mut Scheduler,
    pub rng: &'a mut StdRng,
    processes: &'a mut ProcessTable,
}

impl Context<'_> {
    /// Current simulation time.
    pub fn now(&self) -> SimTime {
        self.scheduler.time()
    }

    /// Registers a new process and schedules its first resumption at the
    /// current instant.
    pub fn spawn(&mut self, process: Box<dyn Process>) -> ProcessId {
        let id = self.processes.register(process);
        self.scheduler.schedule_now(id);
        debug!(process = %id, time = %self.now(), "spawned process");
        id
    }
}

/// Simulation session: scheduler, process table, and the shared random
/// stream, driven step by step.
///
/// See the [crate-level documentation](index.html) for more information.
pub struct Simulation {
    scheduler: Scheduler,
    processes: ProcessTable,
    rng: StdRng,
}

impl Default for Simulation {
    /// A session seeded with zero: reproducible by default.
    fn default() -> Self {
        Self::with_seed(0)
    }
}

impl Simulation {
    /// Creates a session whose random stream is seeded with `seed`.
    ///
    /// Two sessions with the same seed and the same spawned processes replay
    /// identically.
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self {
            scheduler: Scheduler::default(),
            processes: ProcessTable::default(),
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Returns the current simulation time.
    #[must_use]
    pub fn time(&self) -> SimTime {
        self.scheduler.time()
    }

    /// Returns a ClockRef for reading the simulation time.
    pub fn clock(&self) -> ClockRef {
        self.scheduler.clock()
    }

    /// Registers a new process and schedules its first resumption at the
    /// current instant.
    pub fn spawn(&mut self, process: Box<dyn Process>) -> ProcessId {
        let id = self.processes.register(process);
        self.scheduler.schedule_now(id);
        debug!(process = %id, time = %self.time(), "spawned process");
        id
    }

    /// Returns the due time of the next scheduled event, or None if no events
    /// are scheduled.
    pub fn peek_next_event_time(&self) -> Option<SimTime> {
        self.scheduler.peek().map(|entry| entry.time())
    }

    /// Number of live processes.
    pub fn live_processes(&self) -> usize {
        self.processes.len()
    }

    /// Performs one step of the simulation: pop the earliest event, advance
    /// the clock to its due time, and resume the owning process until it
    /// suspends again or terminates.
    ///
    /// Returns `Ok(true)` if an event was processed and `Ok(false)` if the
    /// queue was empty, which signifies that the simulation ended.
    pub fn step(&mut self) -> Result<bool, SimError> {
        let Some(entry) = self.scheduler.pop() else {
            return Ok(false);
        };
        let id = entry.process();
        let Some(mut process) = self.processes.take(id) else {
            // A live process has at most one pending event, so an event
            // without a table entry belongs to a process that already
            // terminated.
            warn!(process = %id, "dropped event for terminated process");
            return Ok(true);
        };

        trace!(process = %id, time = %self.scheduler.time(), "resuming");
        let mut cx = Context {
            scheduler: &mut self.scheduler,
            rng: &mut self.rng,
            processes: &mut self.processes,
        };
        match process.resume(id, &mut cx)? {
            Progress::Suspended => {
                self.processes.restore(id, process);
            }
            Progress::Terminated => {
                trace!(process = %id, time = %self.scheduler.time(), "terminated");
            }
        }
        Ok(true)
    }

    /// Runs the entire simulation.
    ///
    /// The stopping condition and other execution details depend on the
    /// executor used. See [`Execute`] and [`Executor`] for more details.
    pub fn execute<E: Execute>(&mut self, executor: E) -> Result<(), SimError> {
        info!(initial_time = %self.time(), "starting simulation execution");
        executor.execute(self)?;
        info!(
            final_time = %self.time(),
            live_processes = self.live_processes(),
            "simulation execution completed"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Spawns one child on its first resumption, then terminates on the next.
    struct Parent {
        log: Rc<RefCell<Vec<&'static str>>>,
        spawned: bool,
    }

    struct Child {
        log: Rc<RefCell<Vec<&'static str>>>,
    }

    impl Process for Parent {
        fn resume(
            &mut self,
            self_id: ProcessId,
            cx: &mut Context<'_>,
        ) -> Result<Progress, SimError> {
            if !self.spawned {
                self.spawned = true;
                self.log.borrow_mut().push("parent");
                cx.spawn(Box::new(Child {
                    log: Rc::clone(&self.log),
                }));
                cx.scheduler.schedule_in(1.0, self_id)?;
                return Ok(Progress::Suspended);
            }
            self.log.borrow_mut().push("parent-again");
            Ok(Progress::Terminated)
        }
    }

    impl Process for Child {
        fn resume(
            &mut self,
            _self_id: ProcessId,
            _cx: &mut Context<'_>,
        ) -> Result<Progress, SimError> {
            self.log.borrow_mut().push("child");
            Ok(Progress::Terminated)
        }
    }

    #[test]
    fn test_spawned_child_resumes_at_spawn_instant() {
        let mut sim = Simulation::default();
        let log = Rc::new(RefCell::new(Vec::new()));
        sim.spawn(Box::new(Parent {
            log: Rc::clone(&log),
            spawned: false,
        }));

        sim.execute(Executor::unbound()).unwrap();

        assert_eq!(*log.borrow(), vec!["parent", "child", "parent-again"]);
        assert_eq!(sim.time(), SimTime::from_secs(1));
        assert_eq!(sim.live_processes(), 0);
    }

    #[test]
    fn test_step_on_empty_queue_reports_end() {
        let mut sim = Simulation::default();
        assert!(!sim.step().unwrap());
    }
}
