//! Session configuration

use std::rc::Rc;

use jobshop_core::SimError;
use serde::{Deserialize, Serialize};

use crate::dists::{DurationSampler, ExponentialDuration, FixedDuration, UniformIntDuration};

/// Closed-form description of a duration policy.
///
/// This is the serializable face of the samplers in [`crate::dists`]:
/// configuration carries one of these, the session builds the sampler.
/// Any policy can fill either role — arrival spacing or service time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum DurationPolicy {
    /// Constant duration in seconds.
    Fixed { seconds: f64 },
    /// Uniform integer seconds in `[center - spread, center + spread]`.
    UniformInt { center: i64, spread: u64 },
    /// Exponentially distributed with the given rate (events per second).
    Exponential { rate: f64 },
}

impl DurationPolicy {
    /// Builds the sampler, surfacing invalid parameters before the
    /// simulation starts.
    pub fn build(&self) -> Result<Rc<dyn DurationSampler>, SimError> {
        Ok(match *self {
            DurationPolicy::Fixed { seconds } => Rc::new(FixedDuration::new(seconds)),
            DurationPolicy::UniformInt { center, spread } => {
                Rc::new(UniformIntDuration::new(center, spread))
            }
            DurationPolicy::Exponential { rate } => Rc::new(ExponentialDuration::new(rate)?),
        })
    }
}

/// Options for one simulation session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShopConfig {
    /// Server pool capacity.
    pub n_machines: usize,
    /// Burst of tasks spawned at time zero.
    pub initial_tasks: usize,
    /// Simulation stop time, in seconds.
    pub horizon: f64,
    /// Service-duration policy for every task.
    pub service_duration: DurationPolicy,
    /// Inter-arrival policy for the open-loop task stream.
    pub arrival_interval: DurationPolicy,
    /// Seed for the session's random stream.
    pub seed: u64,
}

impl ShopConfig {
    /// Checks everything that can be rejected before the clock starts.
    pub fn validate(&self) -> Result<(), SimError> {
        if self.n_machines == 0 {
            return Err(SimError::InvalidCapacity { capacity: 0 });
        }
        if !self.horizon.is_finite() || self.horizon <= 0.0 {
            return Err(SimError::Configuration(format!(
                "horizon must be positive, got {}",
                self.horizon
            )));
        }
        self.service_duration.build()?;
        self.arrival_interval.build()?;
        Ok(())
    }
}

impl Default for ShopConfig {
    /// The classic shop scenario: one machine, four tasks queued at the
    /// doors, Markovian service at rate 1.0 and arrivals at rate 0.9.
    fn default() -> Self {
        Self {
            n_machines: 1,
            initial_tasks: 4,
            horizon: 100_000.0,
            service_duration: DurationPolicy::Exponential { rate: 1.0 },
            arrival_interval: DurationPolicy::Exponential { rate: 0.9 },
            seed: 0,
        }
    }
}
