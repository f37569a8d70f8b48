//! Submission Grader Domain Types
//!
//! This crate provides the core domain model shared by every stage of the
//! scoring pipeline.
//!
//! ## Architecture
//!
//! - **table**: `Cell`, `CellKey`, `Column` and the immutable `Table`
//! - **metric**: the closed metric catalog and its descriptors
//! - **policy**: policies for unknown metric names and duplicate identifiers
//! - **result**: the `ScoreResult` wire type
//! - **errors**: the `ScoringError` taxonomy
//!
//! ## Usage
//!
//! ```rust
//! use grader_domain::{Metric, MetricClass, ScoreResult, ScoringError};
//!
//! let metric = Metric::from_name("RMSE").unwrap();
//! assert_eq!(metric.class(), MetricClass::Regression);
//!
//! let result: ScoreResult = Err(ScoringError::no_matching_ids()).into();
//! assert_eq!(result.as_error(), Some("No matching IDs found."));
//! ```

#![warn(clippy::all)]

pub mod errors;
pub mod metric;
pub mod policy;
pub mod result;
pub mod table;

pub use errors::{ErrorKind, ScoringError, ScoringResult, NO_MATCHING_IDS, NO_VALID_NUMERIC_DATA};
pub use metric::{Average, Metric, MetricClass, MetricDescriptor, CATALOG};
pub use policy::{DuplicatePolicy, UnknownMetricPolicy};
pub use result::ScoreResult;
pub use table::{Cell, CellKey, Column, Table};
