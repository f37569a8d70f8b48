//! Application layer for the grader
//!
//! This crate orchestrates the scoring pipeline on top of the domain types and
//! the infrastructure loader.
//!
//! ## Modules
//!
//! - `scoring` - record alignment, numeric sanitization, the metric registry
//!   and the metric engine
//! - `service` - [`ScoringService`], composing load, align and compute
//!
//! ## Usage
//!
//! ```rust,no_run
//! use grader_application::ScoringService;
//! use grader_common::GraderConfig;
//!
//! let service = ScoringService::from_config(&GraderConfig::default());
//! let result = service.score("submission.csv", "ground_truth.csv.gz", "f1_macro");
//! println!("{}", serde_json::to_string(&result).unwrap());
//! ```

pub mod scoring;
pub mod service;

// Re-export commonly used types
pub use scoring::{
    round_score, Alignment, IdentifierSeries, MetricEngine, MetricRegistry, NumericPairs,
    RecordAligner, Side, SCORE_DECIMALS,
};
pub use service::ScoringService;
