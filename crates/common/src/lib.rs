//! Common utilities shared by the grader crates.
//!
//! This crate provides:
//! - Configuration management (`config`)
//! - Structured logging setup (`telemetry`)

pub mod config;
pub mod telemetry;

// Re-export commonly used types
pub use config::{GraderConfig, LoaderConfig, ScoringConfig, TelemetryConfig};
pub use telemetry::init_tracing;

/// Common error type used throughout the crate
pub type Result<T> = std::result::Result<T, anyhow::Error>;
