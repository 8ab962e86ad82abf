//! Observation collection and aggregate reporting
//!
//! The sink is the session-owned replacement for any ambient accumulator:
//! lifecycle controllers hold a shared handle to it, the reporting layer
//! reads it once the run is over, and nothing in between can remove or
//! reorder an entry.

use std::time::Duration;

use metrics::{counter, histogram};
use serde::{Deserialize, Serialize};

/// One completed task's timings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Observation {
    /// Time spent between joining the queue and starting service.
    pub wait: Duration,
    /// Time spent in service.
    pub service: Duration,
}

impl Observation {
    pub fn new(wait: Duration, service: Duration) -> Self {
        Self { wait, service }
    }
}

/// Append-only record of completed-task observations, in completion order.
#[derive(Debug, Default)]
pub struct MetricsSink {
    observations: Vec<Observation>,
}

impl MetricsSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one observation and emits it through the `metrics` facade.
    pub fn record(&mut self, observation: Observation) {
        counter!("tasks_completed").increment(1);
        histogram!("task_wait_seconds").record(observation.wait.as_secs_f64());
        histogram!("task_service_seconds").record(observation.service.as_secs_f64());
        self.observations.push(observation);
    }

    /// All observations so far, in completion order.
    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    /// Mean wait across completions, `None` when nothing completed.
    pub fn mean_wait(&self) -> Option<Duration> {
        Self::mean(self.observations.iter().map(|obs| obs.wait))
    }

    /// Mean service time across completions, `None` when nothing completed.
    pub fn mean_service(&self) -> Option<Duration> {
        Self::mean(self.observations.iter().map(|obs| obs.service))
    }

    fn mean(values: impl Iterator<Item = Duration>) -> Option<Duration> {
        let mut total = Duration::ZERO;
        let mut count = 0u32;
        for value in values {
            total += value;
            count += 1;
        }
        if count == 0 {
            None
        } else {
            Some(total / count)
        }
    }
}
