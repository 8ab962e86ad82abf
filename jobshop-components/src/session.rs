//! Session assembly: configuration in, report out

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use jobshop_core::{Executor, SimError, SimTime, Simulation};
use tracing::info;

use crate::arrivals::ArrivalSource;
use crate::config::ShopConfig;
use crate::metrics::{MetricsSink, Observation};
use crate::resource::ServerPool;

/// Everything the reporting layer needs from a finished run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
    /// Completed-task observations, in completion order.
    pub observations: Vec<Observation>,
    /// Clock value when the run stopped.
    pub final_time: SimTime,
    /// Mean wait across completions, `None` when nothing completed.
    pub mean_wait: Option<Duration>,
    /// Mean service time across completions, `None` when nothing completed.
    pub mean_service: Option<Duration>,
    /// Requesters still blocked on the pool when the horizon hit.
    pub backlog: usize,
}

/// Runs one configured session to its horizon.
///
/// Validation happens up front, so bad rates and capacities surface before
/// the clock starts. An empty report is a normal outcome, not an error: a
/// horizon short enough that nothing completes simply yields no data.
pub fn run_session(config: &ShopConfig) -> Result<RunReport, SimError> {
    config.validate()?;

    let mut sim = Simulation::with_seed(config.seed);
    let pool = Rc::new(RefCell::new(ServerPool::new(config.n_machines)?));
    let sink = Rc::new(RefCell::new(MetricsSink::new()));
    let interval = config.arrival_interval.build()?;
    let service = config.service_duration.build()?;

    sim.spawn(Box::new(ArrivalSource::new(
        interval,
        service,
        Rc::clone(&pool),
        Rc::clone(&sink),
        config.initial_tasks,
    )));

    let horizon = SimTime::try_from_secs(config.horizon)?;
    sim.execute(Executor::until(horizon))?;

    let sink = sink.borrow();
    let report = RunReport {
        observations: sink.observations().to_vec(),
        final_time: sim.time(),
        mean_wait: sink.mean_wait(),
        mean_service: sink.mean_service(),
        backlog: pool.borrow().queue_length(),
    };
    info!(
        completed = report.observations.len(),
        final_time = %report.final_time,
        backlog = report.backlog,
        "session finished"
    );
    Ok(report)
}
