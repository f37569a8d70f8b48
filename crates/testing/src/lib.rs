//! Testing utilities for the grader
//!
//! This crate provides:
//! - Input file fixtures written to temporary directories
//! - A builder for in-memory tables
//! - Mock table sources
//!
//! # Examples
//!
//! ```
//! use grader_testing::{fixtures::*, builders::*};
//!
//! // Write a ground-truth file
//! let dir = InputDir::new();
//! let ground_truth = dir.write("gt.csv", LABELS_GROUND_TRUTH_CSV);
//! assert!(ground_truth.ends_with("gt.csv"));
//!
//! // Build a table in memory
//! let table = TableBuilder::new().numbers("id", &[1.0]).texts("label", &["yes"]).build();
//! assert_eq!(table.num_columns(), 2);
//! ```

pub mod builders;
pub mod fixtures;
pub mod mocks;

// Re-export commonly used types
pub use builders::*;
pub use fixtures::*;
pub use mocks::*;

// Re-export testing dependencies for convenience
pub use proptest;
pub use tempfile;
pub use wiremock;
