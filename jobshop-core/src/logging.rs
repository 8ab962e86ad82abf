//! Structured logging for simulation debugging
//!
//! The engine and the components above it log through `tracing` with
//! structured fields (process ids, simulation times, queue depths). These
//! helpers install a terminal subscriber; `RUST_LOG` overrides the defaults
//! as usual, e.g.
//!
//! ```bash
//! RUST_LOG=jobshop_core::scheduler=trace cargo run --example mmc_shop
//! ```

use tracing::info;
use tracing_subscriber::{filter::EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize logging for the simulation with sensible defaults.
pub fn init_simulation_logging() {
    init_simulation_logging_with_level("info")
}

/// Initialize logging with a specific level.
///
/// # Arguments
/// * `level` - Log level: "trace", "debug", "info", "warn", or "error"
pub fn init_simulation_logging_with_level(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!("jobshop_core={level},jobshop_components={level}").into()
    });

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_level(true))
        .with(filter)
        .init();

    info!("simulation logging initialized at level: {level}");
}
