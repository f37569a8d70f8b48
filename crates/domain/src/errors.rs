//! Error types for the scoring pipeline.
//!
//! Every pipeline stage reports failure through [`ScoringError`]. The
//! `Display` output of each variant is the bare human-readable message, because
//! that text is what callers receive inside `{"error": ...}` and some messages
//! (for example "No matching IDs found.") are matched on literally.

use serde::{Deserialize, Serialize};

/// Message returned when the submission and ground truth share no identifiers.
pub const NO_MATCHING_IDS: &str = "No matching IDs found.";

/// Message returned when no numeric pairs survive sanitization.
pub const NO_VALID_NUMERIC_DATA: &str = "No valid numeric data.";

/// Failure taxonomy of a single scoring call.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ScoringError {
    /// An input could not be fetched, decompressed or parsed
    #[error("{0}")]
    Load(String),

    /// Submission and ground truth could not be aligned
    #[error("{0}")]
    Alignment(String),

    /// Nothing usable remained after numeric sanitization
    #[error("{0}")]
    InsufficientData(String),

    /// Registry lookup failed or the metric's input shape was violated
    #[error("{0}")]
    Metric(String),

    /// Uncategorized failure inside metric computation
    #[error("{0}")]
    Computation(String),

    /// A caller-imposed deadline elapsed before scoring finished
    #[error("{0}")]
    Timeout(String),
}

impl ScoringError {
    /// Get the stable error code for this error
    ///
    /// Codes are used in structured logs; the wire shape only carries the message.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Load(_) => "LOAD_ERROR",
            Self::Alignment(_) => "ALIGNMENT_ERROR",
            Self::InsufficientData(_) => "INSUFFICIENT_DATA",
            Self::Metric(_) => "METRIC_ERROR",
            Self::Computation(_) => "COMPUTATION_ERROR",
            Self::Timeout(_) => "TIMEOUT",
        }
    }

    /// Get the error kind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Load(_) => ErrorKind::Load,
            Self::Alignment(_) => ErrorKind::Alignment,
            Self::InsufficientData(_) => ErrorKind::InsufficientData,
            Self::Metric(_) => ErrorKind::Metric,
            Self::Computation(_) => ErrorKind::Computation,
            Self::Timeout(_) => ErrorKind::Timeout,
        }
    }

    /// Shorthand for the empty-intersection failure.
    pub fn no_matching_ids() -> Self {
        Self::Alignment(NO_MATCHING_IDS.to_string())
    }

    /// Shorthand for the empty-after-sanitization failure.
    pub fn no_valid_numeric_data() -> Self {
        Self::InsufficientData(NO_VALID_NUMERIC_DATA.to_string())
    }
}

/// Fieldless mirror of [`ScoringError`] for matching and logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Load,
    Alignment,
    InsufficientData,
    Metric,
    Computation,
    Timeout,
}

/// Result type used by every pipeline stage
pub type ScoringResult<T> = Result<T, ScoringError>;
