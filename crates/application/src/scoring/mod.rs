//! Scoring module - alignment, sanitization and metric computation
//!
//! Stages run in order: the aligner pairs values by identifier, the registry
//! resolves the metric, and the engine sanitizes (for regression), computes
//! and rounds.

pub mod aligner;
pub mod classification;
mod engine;
pub mod regression;
mod registry;
pub mod sanitizer;

pub use aligner::{Alignment, IdentifierSeries, RecordAligner, Side};
pub use engine::*;
pub use registry::MetricRegistry;
pub use sanitizer::{sanitize, NumericPairs};
