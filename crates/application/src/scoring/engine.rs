//! Metric Engine - computing and rounding a resolved metric
//!
//! The engine resolves the metric name through the shared registry, routes
//! regression metrics through numeric sanitization, checks arity, and rounds
//! the finite result to six decimal places.

use crate::scoring::aligner::Alignment;
use crate::scoring::registry::MetricRegistry;
use crate::scoring::{classification, regression, sanitizer};
use grader_domain::{Metric, MetricClass, ScoringError, ScoringResult};
use std::sync::Arc;
use tracing::{debug, instrument};

/// Decimal places kept in every reported score
pub const SCORE_DECIMALS: i32 = 6;

/// Round half away from zero to [`SCORE_DECIMALS`] places.
pub fn round_score(score: f64) -> f64 {
    let scale = 10f64.powi(SCORE_DECIMALS);
    let rounded = (score * scale).round() / scale;
    // Avoid reporting -0.0
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

/// Metric engine
#[derive(Debug, Clone)]
pub struct MetricEngine {
    registry: Arc<MetricRegistry>,
}

impl MetricEngine {
    pub fn new(registry: Arc<MetricRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &MetricRegistry {
        &self.registry
    }

    /// Resolve `metric_name` and score the alignment with it.
    pub fn score(&self, metric_name: &str, alignment: &Alignment) -> ScoringResult<f64> {
        let metric = self.registry.resolve(metric_name)?;
        self.compute(metric, alignment)
    }

    /// Score the alignment with an already resolved metric.
    #[instrument(skip(self, alignment), fields(metric = %metric, samples = alignment.len()))]
    pub fn compute(&self, metric: Metric, alignment: &Alignment) -> ScoringResult<f64> {
        let descriptor = metric.descriptor();

        let raw = match descriptor.class {
            MetricClass::Regression => {
                let pairs = sanitizer::sanitize(&alignment.y_true, &alignment.y_pred)?;
                check_samples(metric, descriptor.min_samples, pairs.len())?;
                regression::compute(metric, &pairs)?
            }
            MetricClass::Classification => {
                check_samples(metric, descriptor.min_samples, alignment.len())?;
                classification::compute(metric, &alignment.y_true, &alignment.y_pred)?
            }
        };

        if !raw.is_finite() {
            return Err(ScoringError::Computation(format!(
                "Metric {} produced a non-finite score",
                metric
            )));
        }

        let score = round_score(raw);
        debug!(raw, score, "Computed metric");
        Ok(score)
    }
}

impl Default for MetricEngine {
    fn default() -> Self {
        Self::new(Arc::new(MetricRegistry::standard()))
    }
}

fn check_samples(metric: Metric, required: usize, available: usize) -> ScoringResult<()> {
    if available < required {
        return Err(ScoringError::Metric(format!(
            "Metric {} requires at least {} samples, got {}",
            metric, required, available
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use grader_domain::{Cell, CellKey, UnknownMetricPolicy};

    fn alignment(y_true: Vec<Cell>, y_pred: Vec<Cell>) -> Alignment {
        Alignment {
            ids: (0..y_true.len()).map(|i| CellKey::Number(i as f64)).collect(),
            y_true,
            y_pred,
        }
    }

    fn nums(values: &[f64]) -> Vec<Cell> {
        values.iter().copied().map(Cell::Number).collect()
    }

    #[test]
    fn test_round_score() {
        assert_eq!(round_score(1.1547005383792515), 1.154701);
        assert_eq!(round_score(0.0000004), 0.0);
        assert_eq!(round_score(-0.0000004).to_bits(), 0.0f64.to_bits());
        assert_eq!(round_score(2.5e-7), 0.0);
    }

    #[test]
    fn test_rmse_is_rounded() {
        let engine = MetricEngine::default();
        let a = alignment(nums(&[1.0, 2.0, 3.0]), nums(&[1.0, 2.0, 5.0]));
        assert_eq!(engine.score("rmse", &a).unwrap(), 1.154701);
    }

    #[test]
    fn test_regression_sanitizes_first() {
        let engine = MetricEngine::default();
        let a = alignment(vec![Cell::Missing, Cell::Number(2.0)], nums(&[1.0, 3.0]));
        assert_eq!(engine.score("mae", &a).unwrap(), 1.0);
    }

    #[test]
    fn test_r2_needs_two_samples() {
        let engine = MetricEngine::default();
        let a = alignment(nums(&[1.0]), nums(&[1.0]));
        let err = engine.score("r2", &a).unwrap_err();
        assert_eq!(
            err,
            ScoringError::Metric("Metric r2 requires at least 2 samples, got 1".to_string())
        );
    }

    #[test]
    fn test_non_finite_score_is_computation_error() {
        let engine = MetricEngine::default();
        let a = alignment(nums(&[1.0, 1.0]), nums(&[1.0, 1.0]));
        let err = engine.score("cohen_kappa", &a).unwrap_err();
        assert_eq!(
            err,
            ScoringError::Computation("Metric cohen_kappa produced a non-finite score".to_string())
        );
    }

    #[test]
    fn test_overflowing_regression_is_non_finite() {
        let engine = MetricEngine::default();
        let a = alignment(nums(&[f64::MAX, -f64::MAX]), nums(&[-f64::MAX, f64::MAX]));
        assert!(matches!(
            engine.score("mse", &a),
            Err(ScoringError::Computation(_))
        ));
    }

    #[test]
    fn test_strict_registry_rejects_unknown_names() {
        let registry = MetricRegistry::standard().with_unknown_policy(UnknownMetricPolicy::Reject);
        let engine = MetricEngine::new(Arc::new(registry));
        let a = alignment(nums(&[1.0]), nums(&[1.0]));
        assert!(matches!(engine.score("banana", &a), Err(ScoringError::Metric(_))));
    }
}
