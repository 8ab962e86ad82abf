//! Arrival generation: the initial burst and the open-loop task stream

use std::cell::RefCell;
use std::rc::Rc;

use jobshop_core::{Context, Process, ProcessId, Progress, SimError};
use tracing::debug;

use crate::dists::DurationSampler;
use crate::metrics::MetricsSink;
use crate::resource::ServerPool;
use crate::task::{Task, TaskLifecycle};

/// Spawns task lifecycles: a configured burst at time zero, then one task
/// per inter-arrival draw, forever.
///
/// Task names are sequential across the burst and the stream (`task-0`,
/// `task-1`, ...). The source never terminates on its own; the execution
/// horizon is the only thing that stops it.
pub struct ArrivalSource {
    interval: Rc<dyn DurationSampler>,
    service: Rc<dyn DurationSampler>,
    pool: Rc<RefCell<ServerPool>>,
    sink: Rc<RefCell<MetricsSink>>,
    initial_tasks: usize,
    next_index: usize,
    primed: bool,
}

impl ArrivalSource {
    pub fn new(
        interval: Rc<dyn DurationSampler>,
        service: Rc<dyn DurationSampler>,
        pool: Rc<RefCell<ServerPool>>,
        sink: Rc<RefCell<MetricsSink>>,
        initial_tasks: usize,
    ) -> Self {
        Self {
            interval,
            service,
            pool,
            sink,
            initial_tasks,
            next_index: 0,
            primed: false,
        }
    }

    fn spawn_task(&mut self, cx: &mut Context<'_>) {
        let task = Task::new(
            format!("task-{}", self.next_index),
            Rc::clone(&self.service),
        );
        self.next_index += 1;
        cx.spawn(Box::new(TaskLifecycle::new(
            task,
            Rc::clone(&self.pool),
            Rc::clone(&self.sink),
        )));
    }
}

impl Process for ArrivalSource {
    fn resume(&mut self, self_id: ProcessId, cx: &mut Context<'_>) -> Result<Progress, SimError> {
        if self.primed {
            self.spawn_task(cx);
        } else {
            // First resumption, at time zero: the initial backlog.
            self.primed = true;
            debug!(burst = self.initial_tasks, "spawning initial tasks");
            for _ in 0..self.initial_tasks {
                self.spawn_task(cx);
            }
        }

        let delay = self.interval.sample(cx.rng);
        cx.scheduler.schedule_in(delay, self_id)?;
        Ok(Progress::Suspended)
    }
}
