//! Infrastructure layer for the grader
//!
//! This crate turns a file location into an in-memory [`Table`]:
//! - `source` - fetching bytes from a local path or an HTTP(S) URL
//! - `compression` - transparent gzip decompression
//! - `formats` - delimited-text and structured-record parsers
//! - `loader` - the [`TableSource`] seam and its [`FormatLoader`] implementation
//!
//! ## Usage
//!
//! ```rust,no_run
//! use grader_infrastructure::{FormatLoader, TableSource};
//!
//! let loader = FormatLoader::with_defaults();
//! let table = loader.load("predictions.csv.gz")?;
//! println!("{} rows", table.num_rows());
//! # Ok::<(), grader_domain::ScoringError>(())
//! ```
//!
//! [`Table`]: grader_domain::Table

pub mod compression;
pub mod formats;
pub mod loader;
pub mod source;

pub use compression::Compression;
pub use formats::InputFormat;
pub use loader::{FormatLoader, TableSource};
pub use source::{RawInput, SourceFetcher};

use grader_domain::ScoringError;

// Re-export result and error types
pub type Result<T> = std::result::Result<T, Error>;

/// Infrastructure-level errors
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Local file could not be read
    #[error("Failed to read '{location}': {message}")]
    Io { location: String, message: String },

    /// Remote resource could not be fetched
    #[error("Failed to fetch '{location}': {message}")]
    Fetch { location: String, message: String },

    /// Input exceeded the configured size limit
    #[error("Input '{location}' exceeds the limit of {limit} bytes")]
    TooLarge { location: String, limit: u64 },

    /// Compressed stream could not be decoded
    #[error("Failed to decompress input: {0}")]
    Decompression(String),

    /// Content could not be parsed into a table
    #[error("{0}")]
    Parse(String),
}

impl From<Error> for ScoringError {
    fn from(error: Error) -> Self {
        ScoringError::Load(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_errors_become_load_errors() {
        let err: ScoringError = Error::Parse("No columns to parse from file".to_string()).into();
        assert_eq!(err, ScoringError::Load("No columns to parse from file".to_string()));

        let err: ScoringError = Error::Io {
            location: "a.csv".to_string(),
            message: "not found".to_string(),
        }
        .into();
        assert_eq!(err.to_string(), "Failed to read 'a.csv': not found");
    }
}
