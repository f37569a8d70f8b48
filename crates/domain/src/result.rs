//! The externally observed result of a scoring call.

use crate::errors::ScoringError;
use serde::{Deserialize, Serialize};

/// Either a score or an error message, never both.
///
/// Serializes as `{"score": <number>}` or `{"error": "<message>"}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScoreResult {
    Score { score: f64 },
    Error { error: String },
}

impl ScoreResult {
    pub fn score(score: f64) -> Self {
        Self::Score { score }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            error: message.into(),
        }
    }

    pub fn is_score(&self) -> bool {
        matches!(self, Self::Score { .. })
    }

    /// The score, if this is a successful result
    pub fn as_score(&self) -> Option<f64> {
        match self {
            Self::Score { score } => Some(*score),
            Self::Error { .. } => None,
        }
    }

    /// The error message, if this is a failed result
    pub fn as_error(&self) -> Option<&str> {
        match self {
            Self::Score { .. } => None,
            Self::Error { error } => Some(error),
        }
    }
}

impl From<ScoringError> for ScoreResult {
    fn from(error: ScoringError) -> Self {
        Self::error(error.to_string())
    }
}

impl From<Result<f64, ScoringError>> for ScoreResult {
    fn from(result: Result<f64, ScoringError>) -> Self {
        match result {
            Ok(score) => Self::score(score),
            Err(error) => error.into(),
        }
    }
}
