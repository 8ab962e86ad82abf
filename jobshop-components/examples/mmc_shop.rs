//! The classic machine-shop scenario: one machine, Markovian service and
//! arrivals, four tasks queued at the doors when the shop opens.
//!
//! Run with: cargo run --package jobshop-components --example mmc_shop

use jobshop_components::{run_session, ShopConfig};
use jobshop_core::init_simulation_logging;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_simulation_logging();

    let config = ShopConfig::default();
    let report = run_session(&config)?;

    println!("Completed tasks: {}", report.observations.len());
    match (report.mean_wait, report.mean_service) {
        (Some(wait), Some(service)) => {
            println!("Avg wait time: {:.3}s", wait.as_secs_f64());
            println!("Avg process time: {:.3}s", service.as_secs_f64());
        }
        _ => println!("No tasks completed before the horizon"),
    }
    Ok(())
}
