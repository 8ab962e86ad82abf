//! Error types for the simulation engine

use thiserror::Error;

/// Top-level error type for simulation operations
#[derive(Debug, Error, PartialEq)]
pub enum SimError {
    #[error("invalid delay: {seconds} seconds (delays must be finite and non-negative)")]
    InvalidDelay { seconds: f64 },

    #[error("invalid rate: {rate} (rates must be finite and positive)")]
    InvalidRate { rate: f64 },

    #[error("invalid capacity: {capacity} (a server pool needs at least one slot)")]
    InvalidCapacity { capacity: usize },

    #[error("invalid configuration: {0}")]
    Configuration(String),
}
