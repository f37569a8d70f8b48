//! Fetching raw input bytes from local paths and HTTP(S) URLs.

use grader_common::LoaderConfig;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, instrument};
use url::Url;

use crate::{Error, Result};

/// Raw bytes of one input, plus the file name used for format detection.
#[derive(Debug, Clone)]
pub struct RawInput {
    pub name: String,
    pub bytes: Vec<u8>,
}

/// Where an input lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
    Local(PathBuf),
    Remote(Url),
}

impl Location {
    /// Classify a location string.
    ///
    /// `http`/`https` URLs are remote and `file://` URLs are local. Anything
    /// else, including Windows drive paths, is a local path.
    pub fn parse(location: &str) -> Self {
        match Url::parse(location) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => Location::Remote(url),
            Ok(url) if url.scheme() == "file" => url
                .to_file_path()
                .map(Location::Local)
                .unwrap_or_else(|_| Location::Local(PathBuf::from(location))),
            _ => Location::Local(PathBuf::from(location)),
        }
    }

    /// File name used for format detection
    pub fn file_name(&self) -> String {
        match self {
            Location::Local(path) => path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default(),
            Location::Remote(url) => url
                .path_segments()
                .and_then(|mut segments| segments.next_back())
                .unwrap_or_default()
                .to_string(),
        }
    }
}

/// Reads inputs from disk or over HTTP. Never writes anything.
#[derive(Debug, Clone)]
pub struct SourceFetcher {
    http_timeout: Duration,
    max_body_bytes: u64,
    user_agent: String,
}

impl SourceFetcher {
    pub fn new(config: &LoaderConfig) -> Self {
        Self {
            http_timeout: Duration::from_secs(config.http_timeout_seconds),
            max_body_bytes: config.max_body_bytes,
            user_agent: config.user_agent.clone(),
        }
    }

    /// Fetch the raw bytes behind a location string.
    #[instrument(skip(self))]
    pub fn fetch(&self, location: &str) -> Result<RawInput> {
        let parsed = Location::parse(location);
        let name = parsed.file_name();
        let bytes = match &parsed {
            Location::Local(path) => self.read_local(location, path)?,
            Location::Remote(url) => self.read_remote(location, url)?,
        };
        debug!(bytes = bytes.len(), name = %name, "Fetched input");
        Ok(RawInput { name, bytes })
    }

    fn read_local(&self, location: &str, path: &Path) -> Result<Vec<u8>> {
        let io_error = |e: std::io::Error| Error::Io {
            location: location.to_string(),
            message: e.to_string(),
        };

        let mut bytes = Vec::new();
        std::fs::File::open(path)
            .map_err(io_error)?
            .take(self.max_body_bytes.saturating_add(1))
            .read_to_end(&mut bytes)
            .map_err(io_error)?;

        if bytes.len() as u64 > self.max_body_bytes {
            return Err(Error::TooLarge {
                location: location.to_string(),
                limit: self.max_body_bytes,
            });
        }
        Ok(bytes)
    }

    fn read_remote(&self, location: &str, url: &Url) -> Result<Vec<u8>> {
        let fetch_error = |message: String| Error::Fetch {
            location: location.to_string(),
            message,
        };

        // Built per call: a blocking client must not outlive the thread that
        // may be running inside an async runtime.
        let client = reqwest::blocking::Client::builder()
            .timeout(self.http_timeout)
            .user_agent(self.user_agent.clone())
            .build()
            .map_err(|e| fetch_error(e.to_string()))?;

        let response = client
            .get(url.clone())
            .send()
            .map_err(|e| fetch_error(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(fetch_error(format!("HTTP status {}", status)));
        }

        if response
            .content_length()
            .is_some_and(|len| len > self.max_body_bytes)
        {
            return Err(Error::TooLarge {
                location: location.to_string(),
                limit: self.max_body_bytes,
            });
        }

        let mut bytes = Vec::new();
        response
            .take(self.max_body_bytes + 1)
            .read_to_end(&mut bytes)
            .map_err(|e| fetch_error(e.to_string()))?;

        if bytes.len() as u64 > self.max_body_bytes {
            return Err(Error::TooLarge {
                location: location.to_string(),
                limit: self.max_body_bytes,
            });
        }

        Ok(bytes)
    }
}

impl Default for SourceFetcher {
    fn default() -> Self {
        Self::new(&LoaderConfig::default())
    }
}
