//! Configuration management for the grader.
//!
//! Settings are layered with the `config` crate. Later sources override
//! earlier ones:
//!
//! 1. Built-in defaults
//! 2. `config/default.toml` (if it exists)
//! 3. An explicit file passed by the caller (e.g. `--config grader.toml`)
//! 4. Environment variables prefixed with `GRADER_`, using `__` between
//!    section and key (e.g. `GRADER_SCORING__UNKNOWN_METRIC=reject`)
//!
//! ## Example Configuration
//!
//! ```toml
//! [scoring]
//! unknown_metric = "reject"
//! duplicate_ids = "last_write_wins"
//! timeout_seconds = 120
//!
//! [loader]
//! http_timeout_seconds = 30
//! max_body_bytes = 268435456
//!
//! [telemetry]
//! json_logging = true
//! log_level = "info"
//! ```

use anyhow::{Context, Result};
use grader_domain::{DuplicatePolicy, UnknownMetricPolicy};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Main grader configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraderConfig {
    #[serde(default)]
    pub scoring: ScoringConfig,
    #[serde(default)]
    pub loader: LoaderConfig,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

/// Scoring behaviour
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// Policy for metric names missing from the catalog
    #[serde(default)]
    pub unknown_metric: UnknownMetricPolicy,

    /// Policy for identifiers repeated within one file
    #[serde(default)]
    pub duplicate_ids: DuplicatePolicy,

    /// Caller-side deadline for a whole scoring call, in seconds
    #[serde(default)]
    pub timeout_seconds: Option<u64>,
}

/// Input fetching limits
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoaderConfig {
    /// Timeout for fetching a remote input, in seconds
    #[serde(default = "default_http_timeout")]
    pub http_timeout_seconds: u64,

    /// Maximum accepted size of a remote response body
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: u64,

    /// User agent sent with remote requests
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

/// Telemetry configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetryConfig {
    /// Enable JSON logging format
    #[serde(default = "default_json_logging")]
    pub json_logging: bool,

    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

// Default value functions
fn default_http_timeout() -> u64 {
    30
}

fn default_max_body_bytes() -> u64 {
    256 * 1024 * 1024
}

fn default_user_agent() -> String {
    concat!("submission-grader/", env!("CARGO_PKG_VERSION")).to_string()
}

fn default_json_logging() -> bool {
    false
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            http_timeout_seconds: default_http_timeout(),
            max_body_bytes: default_max_body_bytes(),
            user_agent: default_user_agent(),
        }
    }
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            json_logging: default_json_logging(),
            log_level: default_log_level(),
        }
    }
}

impl GraderConfig {
    /// Load configuration from the default file, an optional explicit file,
    /// and `GRADER_` environment variables.
    pub fn load(explicit_file: Option<&Path>) -> Result<Self> {
        let mut builder = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false));

        if let Some(path) = explicit_file {
            builder = builder.add_source(
                config::File::from(path)
                    .format(config::FileFormat::Toml)
                    .required(true),
            );
        }

        let settings = builder
            .add_source(
                config::Environment::with_prefix("GRADER")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .context("Failed to build configuration")?;

        let grader_config: GraderConfig = settings
            .try_deserialize()
            .context("Failed to deserialize configuration")?;

        grader_config.validate()?;

        Ok(grader_config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.loader.http_timeout_seconds == 0 {
            anyhow::bail!("HTTP timeout must be greater than 0");
        }

        if self.loader.max_body_bytes == 0 {
            anyhow::bail!("Maximum body size must be greater than 0");
        }

        if self.scoring.timeout_seconds == Some(0) {
            anyhow::bail!("Scoring timeout must be greater than 0");
        }

        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&self.telemetry.log_level.as_str()) {
            anyhow::bail!(
                "Invalid log level '{}'. Must be one of: {}",
                self.telemetry.log_level,
                valid_log_levels.join(", ")
            );
        }

        Ok(())
    }

    /// Get the remote fetch timeout as a Duration
    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.loader.http_timeout_seconds)
    }

    /// Get the caller-side scoring deadline, if one is configured
    pub fn scoring_timeout(&self) -> Option<Duration> {
        self.scoring.timeout_seconds.map(Duration::from_secs)
    }
}
