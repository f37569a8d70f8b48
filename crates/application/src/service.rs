//! Scoring service - the single entry point composing every stage.

use crate::scoring::{MetricEngine, MetricRegistry, RecordAligner};
use grader_common::GraderConfig;
use grader_domain::{DuplicatePolicy, ScoreResult, ScoringError, ScoringResult};
use grader_infrastructure::{FormatLoader, TableSource};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, instrument, warn};

/// Grades one submission against one ground truth per call.
///
/// Holds only shared read-only state, so one instance can serve concurrent
/// calls.
#[derive(Clone)]
pub struct ScoringService {
    engine: MetricEngine,
    aligner: RecordAligner,
    source: Arc<dyn TableSource>,
}

impl ScoringService {
    pub fn new(
        registry: Arc<MetricRegistry>,
        source: Arc<dyn TableSource>,
        duplicate_policy: DuplicatePolicy,
    ) -> Self {
        Self {
            engine: MetricEngine::new(registry),
            aligner: RecordAligner::new(duplicate_policy),
            source,
        }
    }

    /// Service reading inputs with [`FormatLoader`] and the standard catalog.
    pub fn from_config(config: &GraderConfig) -> Self {
        let registry =
            MetricRegistry::standard().with_unknown_policy(config.scoring.unknown_metric);
        Self::new(
            Arc::new(registry),
            Arc::new(FormatLoader::new(&config.loader)),
            config.scoring.duplicate_ids,
        )
    }

    /// Score a submission; failures come back as [`ScoreResult::Error`].
    pub fn score(&self, submission: &str, ground_truth: &str, metric: &str) -> ScoreResult {
        let result = self.try_score(submission, ground_truth, metric);
        if let Err(e) = &result {
            warn!(code = e.error_code(), error = %e, "Scoring failed");
        }
        result.into()
    }

    /// Score a submission, keeping the typed error.
    #[instrument(skip(self))]
    pub fn try_score(
        &self,
        submission: &str,
        ground_truth: &str,
        metric: &str,
    ) -> ScoringResult<f64> {
        let submission_table = self.source.load(submission)?;
        let ground_truth_table = self.source.load(ground_truth)?;

        let alignment = self.aligner.align(&submission_table, &ground_truth_table)?;
        let score = self.engine.score(metric, &alignment)?;

        info!(score, samples = alignment.len(), "Scored submission");
        Ok(score)
    }

    /// Score on a blocking worker, giving up after `deadline`.
    pub async fn score_within(
        self: Arc<Self>,
        submission: String,
        ground_truth: String,
        metric: String,
        deadline: Duration,
    ) -> ScoreResult {
        let worker = tokio::task::spawn_blocking(move || {
            self.try_score(&submission, &ground_truth, &metric)
        });

        let result = match tokio::time::timeout(deadline, worker).await {
            Ok(Ok(result)) => result,
            Ok(Err(join_error)) => Err(ScoringError::Computation(join_error.to_string())),
            Err(_) => Err(ScoringError::Timeout(format!(
                "Scoring timed out after {}s",
                deadline.as_secs_f64()
            ))),
        };

        if let Err(e) = &result {
            warn!(code = e.error_code(), error = %e, "Scoring failed");
        }
        result.into()
    }
}

impl std::fmt::Debug for ScoringService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScoringService")
            .field("engine", &self.engine)
            .field("aligner", &self.aligner)
            .finish_non_exhaustive()
    }
}
