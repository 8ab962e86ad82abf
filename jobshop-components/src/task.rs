//! Task identity and the per-task lifecycle controller

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use jobshop_core::{Context, Process, ProcessId, Progress, SimError, SimTime};
use rand::rngs::StdRng;
use tracing::debug;

use crate::dists::DurationSampler;
use crate::metrics::{MetricsSink, Observation};
use crate::resource::{Acquire, ServerPool};

/// A unit of work passing through the shop: a name plus the service-duration
/// rule its servicing draws from. Immutable after creation.
#[derive(Clone)]
pub struct Task {
    name: String,
    duration: Rc<dyn DurationSampler>,
}

impl Task {
    pub fn new(name: impl Into<String>, duration: Rc<dyn DurationSampler>) -> Self {
        Self {
            name: name.into(),
            duration,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Draws a service duration, in seconds, from the task's rule.
    pub fn sample_duration(&self, rng: &mut StdRng) -> f64 {
        self.duration.sample(rng)
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

impl fmt::Debug for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Task").field("name", &self.name).finish()
    }
}

#[derive(Debug, Clone, Copy)]
enum Phase {
    /// Not yet enqueued; the first resumption happens at arrival time.
    Arriving,
    /// Parked in the pool's wait queue; the next resumption is the grant.
    Queued { enqueued_at: SimTime },
    /// Holding a slot; the next resumption is the service timer.
    InService {
        enqueued_at: SimTime,
        started_at: SimTime,
    },
}

/// Drives one task through `enqueue → acquire → serve → release → record`.
///
/// The controller is a three-phase state machine. It suspends twice at most:
/// once blocked on the pool (skipped when a slot is free on arrival), once
/// on the service timer. Completion releases the slot before the
/// observation is recorded, so the pool is whole on the only exit path of
/// the service step.
pub struct TaskLifecycle {
    task: Task,
    pool: Rc<RefCell<ServerPool>>,
    sink: Rc<RefCell<MetricsSink>>,
    phase: Phase,
}

impl TaskLifecycle {
    pub fn new(task: Task, pool: Rc<RefCell<ServerPool>>, sink: Rc<RefCell<MetricsSink>>) -> Self {
        Self {
            task,
            pool,
            sink,
            phase: Phase::Arriving,
        }
    }

    fn begin_service(
        &mut self,
        self_id: ProcessId,
        enqueued_at: SimTime,
        cx: &mut Context<'_>,
    ) -> Result<(), SimError> {
        let started_at = cx.now();
        let duration = self.task.sample_duration(cx.rng);
        cx.scheduler.schedule_in(duration, self_id)?;
        debug!(task = %self.task, time = %started_at, "task is being processed");
        self.phase = Phase::InService {
            enqueued_at,
            started_at,
        };
        Ok(())
    }
}

impl Process for TaskLifecycle {
    fn resume(&mut self, self_id: ProcessId, cx: &mut Context<'_>) -> Result<Progress, SimError> {
        match self.phase {
            Phase::Arriving => {
                let enqueued_at = cx.now();
                let admission = self.pool.borrow_mut().acquire(self_id);
                debug!(
                    task = %self.task,
                    time = %enqueued_at,
                    queue_length = self.pool.borrow().queue_length(),
                    "task added to server"
                );
                match admission {
                    Acquire::Granted => self.begin_service(self_id, enqueued_at, cx)?,
                    Acquire::Enqueued => self.phase = Phase::Queued { enqueued_at },
                }
                Ok(Progress::Suspended)
            }
            Phase::Queued { enqueued_at } => {
                // Woken by the pool: the released slot is already ours.
                self.begin_service(self_id, enqueued_at, cx)?;
                Ok(Progress::Suspended)
            }
            Phase::InService {
                enqueued_at,
                started_at,
            } => {
                let finished_at = cx.now();
                self.pool.borrow_mut().release(cx.scheduler);
                debug!(task = %self.task, time = %finished_at, "task completed");
                self.sink.borrow_mut().record(Observation::new(
                    started_at - enqueued_at,
                    finished_at - started_at,
                ));
                Ok(Progress::Terminated)
            }
        }
    }
}
