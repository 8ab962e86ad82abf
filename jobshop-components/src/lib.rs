//! Queueing-model components for the jobshop simulation engine.
//!
//! This crate assembles the single-stage queueing network on top of
//! `jobshop-core`: stochastic task arrivals compete for a bounded pool of
//! identical servers, wait in a FIFO queue when all servers are busy, are
//! served for a drawn duration, and leave an observation behind.
//!
//! The pieces:
//!
//! - [`ServerPool`]: the bounded resource with its FIFO wait queue.
//! - [`TaskLifecycle`]: one task's passage through enqueue → acquire →
//!   serve → release → record.
//! - [`ArrivalSource`]: the initial burst plus the open-loop arrival stream.
//! - [`DurationSampler`] policies: fixed, uniform-integer, exponential.
//! - [`MetricsSink`]: append-only wait/service observations.
//! - [`ShopConfig`] / [`run_session`]: closed-form options in, report out.

pub mod arrivals;
pub mod config;
pub mod dists;
pub mod metrics;
pub mod resource;
pub mod session;
pub mod task;

pub use arrivals::ArrivalSource;
pub use config::{DurationPolicy, ShopConfig};
pub use dists::{DurationSampler, ExponentialDuration, FixedDuration, UniformIntDuration};
pub use metrics::{MetricsSink, Observation};
pub use resource::{Acquire, ServerPool};
pub use session::{run_session, RunReport};
pub use task::{Task, TaskLifecycle};
