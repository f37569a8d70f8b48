//! Table loading: fetch, decompress, detect and parse.

use grader_common::LoaderConfig;
use grader_domain::{ScoringResult, Table};
use tracing::{debug, info, instrument};

use crate::compression;
use crate::formats::InputFormat;
use crate::source::SourceFetcher;
use crate::Result;

/// Anything able to turn a location string into a table.
///
/// The scoring service only depends on this trait, so tests can substitute
/// in-memory tables.
pub trait TableSource: Send + Sync {
    fn load(&self, location: &str) -> ScoringResult<Table>;
}

/// Loads CSV, TSV, JSON and JSON Lines inputs, optionally gzip-compressed,
/// from local paths or HTTP(S) URLs.
#[derive(Debug, Clone)]
pub struct FormatLoader {
    fetcher: SourceFetcher,
    /// Cap on the decoded size of a compressed input
    max_decoded_bytes: u64,
}

impl FormatLoader {
    pub fn new(config: &LoaderConfig) -> Self {
        Self {
            fetcher: SourceFetcher::new(config),
            max_decoded_bytes: config.max_body_bytes,
        }
    }

    pub fn with_defaults() -> Self {
        Self::default()
    }

    /// Parse already-fetched bytes, using `name` for format detection.
    pub fn parse(&self, name: &str, bytes: Vec<u8>) -> Result<Table> {
        let (format, declared) = InputFormat::detect(name);
        let bytes = compression::decompress(name, bytes, declared, self.max_decoded_bytes)?;
        debug!(?format, ?declared, bytes = bytes.len(), "Parsing input");
        format.parse(&bytes)
    }

    #[instrument(skip(self))]
    fn load_table(&self, location: &str) -> Result<Table> {
        let raw = self.fetcher.fetch(location)?;
        let table = self.parse(&raw.name, raw.bytes)?;
        info!(
            rows = table.num_rows(),
            columns = table.num_columns(),
            "Loaded input"
        );
        Ok(table)
    }
}

impl Default for FormatLoader {
    fn default() -> Self {
        Self::new(&LoaderConfig::default())
    }
}

impl TableSource for FormatLoader {
    fn load(&self, location: &str) -> ScoringResult<Table> {
        Ok(self.load_table(location)?)
    }
}
