use crate::{SimError, SimTime, Simulation};

/// Simulation execution trait.
pub trait Execute {
    /// Executes the simulation until some stopping condition is reached.
    /// The condition is implementation-specific.
    fn execute(self, sim: &mut Simulation) -> Result<(), SimError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EndCondition {
    Horizon(SimTime),
    NoEvents,
    Steps(usize),
}

/// Executor is used for simple execution of an entire simulation.
///
/// The primary mode is [`Executor::until`]: run while the earliest pending
/// event is due at or before the horizon, and stop as soon as the next event
/// would land beyond it (or no events remain).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Executor {
    end_condition: EndCondition,
}

impl Executor {
    /// Simulation will end only once there are no events left in the queue.
    #[must_use]
    pub fn unbound() -> Self {
        Self {
            end_condition: EndCondition::NoEvents,
        }
    }

    /// Simulation will run no further than the given horizon.
    /// It may terminate early if no events are available.
    #[must_use]
    pub fn until(horizon: SimTime) -> Self {
        Self {
            end_condition: EndCondition::Horizon(horizon),
        }
    }

    /// Simulation will execute exactly this many steps, unless we run out of
    /// events.
    #[must_use]
    pub fn steps(steps: usize) -> Self {
        Self {
            end_condition: EndCondition::Steps(steps),
        }
    }

    /// Registers a side effect that is called _after_ each simulation step.
    ///
    /// This is the observer hook: per-step tracing, invariant checks, and
    /// progress sampling layer on here without touching the engine.
    #[must_use]
    pub fn side_effect<F>(self, func: F) -> ExecutorWithSideEffect<F>
    where
        F: Fn(&Simulation),
    {
        ExecutorWithSideEffect {
            end_condition: self.end_condition,
            side_effect: func,
        }
    }
}

impl Execute for Executor {
    fn execute(self, sim: &mut Simulation) -> Result<(), SimError> {
        run_with(sim, self.end_condition, |_| {})
    }
}

pub struct ExecutorWithSideEffect<F>
where
    F: Fn(&Simulation),
{
    end_condition: EndCondition,
    side_effect: F,
}

impl<F> Execute for ExecutorWithSideEffect<F>
where
    F: Fn(&Simulation),
{
    fn execute(self, sim: &mut Simulation) -> Result<(), SimError> {
        run_with(sim, self.end_condition, self.side_effect)
    }
}

fn run_with<F>(sim: &mut Simulation, end_condition: EndCondition, side_effect: F) -> Result<(), SimError>
where
    F: Fn(&Simulation),
{
    let step = |sim: &mut Simulation| -> Result<bool, SimError> {
        let progressed = sim.step()?;
        if progressed {
            side_effect(sim);
        }
        Ok(progressed)
    };
    match end_condition {
        EndCondition::Horizon(horizon) => {
            while sim
                .peek_next_event_time()
                .is_some_and(|time| time <= horizon)
            {
                step(sim)?;
            }
        }
        EndCondition::NoEvents => while step(sim)? {},
        EndCondition::Steps(steps) => {
            for _ in 0..steps {
                if !step(sim)? {
                    break;
                }
            }
        }
    }
    Ok(())
}
