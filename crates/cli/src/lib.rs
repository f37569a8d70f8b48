//! Grader CLI Library
//!
//! Argument parsing and the single scoring command behind the `grader`
//! binary. The binary prints exactly one JSON line on stdout; logs go to
//! stderr.

use anyhow::{Context, Result};
use clap::Parser;
use grader_application::ScoringService;
use grader_common::{init_tracing, GraderConfig};
use grader_domain::{DuplicatePolicy, ScoreResult, UnknownMetricPolicy};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Message printed when a positional argument is absent
pub const MISSING_ARGUMENTS: &str = "Missing arguments";

#[derive(Parser, Debug)]
#[command(name = "grader")]
#[command(author, version, about = "Score a submission file against a ground-truth file")]
#[command(long_about = "Score a submission file against a ground-truth file.\n\n\
    Inputs may be CSV, TSV, JSON or JSON Lines, optionally gzip-compressed, given as \
    local paths or http(s) URLs. Prints {\"score\": ...} or {\"error\": ...} as one JSON line.")]
pub struct Cli {
    /// Submission file or URL
    #[arg(value_name = "SUBMISSION")]
    pub submission: String,

    /// Ground-truth file or URL
    #[arg(value_name = "GROUND_TRUTH")]
    pub ground_truth: String,

    /// Metric name (case-insensitive, e.g. accuracy, f1_macro, rmse)
    #[arg(value_name = "METRIC")]
    pub metric: String,

    /// Further positionals are accepted and ignored
    #[arg(value_name = "IGNORED", hide = true, trailing_var_arg = true, allow_hyphen_values = true)]
    pub extra: Vec<String>,

    /// TOML configuration file
    #[arg(long, env = "GRADER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Give up after this many seconds
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout_seconds: Option<u64>,

    /// Fail on unknown metric names instead of falling back to accuracy
    #[arg(long)]
    pub strict_metric: bool,

    /// Fail when an identifier appears twice in one file
    #[arg(long)]
    pub reject_duplicate_ids: bool,

    /// Emit logs as JSON
    #[arg(long)]
    pub json_logs: bool,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Load configuration and apply command-line overrides.
    pub fn resolve_config(&self) -> Result<GraderConfig> {
        let mut config = GraderConfig::load(self.config.as_deref())?;

        if self.strict_metric {
            config.scoring.unknown_metric = UnknownMetricPolicy::Reject;
        }
        if self.reject_duplicate_ids {
            config.scoring.duplicate_ids = DuplicatePolicy::Reject;
        }
        if let Some(seconds) = self.timeout_seconds {
            config.scoring.timeout_seconds = Some(seconds);
        }
        if self.json_logs {
            config.telemetry.json_logging = true;
        }
        if self.verbose {
            config.telemetry.log_level = "debug".to_string();
        }

        Ok(config)
    }
}

/// Run one scoring call.
///
/// Scoring failures are part of the returned [`ScoreResult`]; `Err` is only
/// returned for configuration or runtime setup problems.
pub fn run(cli: &Cli) -> Result<ScoreResult> {
    let config = cli.resolve_config()?;

    // A subscriber may already be installed when embedded in tests
    let _ = init_tracing(config.telemetry.json_logging, &config.telemetry.log_level);
    debug!(?config, "Resolved configuration");
    if !cli.extra.is_empty() {
        warn!(ignored = ?cli.extra, "Ignoring extra arguments");
    }

    let service = ScoringService::from_config(&config);

    match config.scoring_timeout() {
        None => Ok(service.score(&cli.submission, &cli.ground_truth, &cli.metric)),
        Some(deadline) => score_with_deadline(service, cli, deadline),
    }
}

fn score_with_deadline(
    service: ScoringService,
    cli: &Cli,
    deadline: Duration,
) -> Result<ScoreResult> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;

    let result = runtime.block_on(Arc::new(service).score_within(
        cli.submission.clone(),
        cli.ground_truth.clone(),
        cli.metric.clone(),
        deadline,
    ));

    // Do not wait for a worker that overran the deadline
    runtime.shutdown_background();
    Ok(result)
}

/// Serialize a result as the single output line.
pub fn render(result: &ScoreResult) -> Result<String> {
    serde_json::to_string(result).context("Failed to serialize result")
}
