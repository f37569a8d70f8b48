//! Regression metrics over sanitized numeric pairs.

use grader_domain::{Metric, ScoringError, ScoringResult};

use super::sanitizer::NumericPairs;

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, count) = values.fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    sum / count as f64
}

fn median(values: &[f64]) -> f64 {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

/// `1 - numerator / denominator`, with a constant target scoring 1 when
/// perfectly predicted and 0 otherwise.
fn one_minus_ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        if numerator == 0.0 {
            1.0
        } else {
            0.0
        }
    } else {
        1.0 - numerator / denominator
    }
}

fn residuals(pairs: &NumericPairs) -> impl Iterator<Item = f64> + '_ {
    pairs.y_true.iter().zip(&pairs.y_pred).map(|(t, p)| t - p)
}

pub fn mean_absolute_error(pairs: &NumericPairs) -> f64 {
    mean(residuals(pairs).map(f64::abs))
}

pub fn mean_squared_error(pairs: &NumericPairs) -> f64 {
    mean(residuals(pairs).map(|r| r * r))
}

pub fn root_mean_squared_error(pairs: &NumericPairs) -> f64 {
    mean_squared_error(pairs).sqrt()
}

pub fn r2(pairs: &NumericPairs) -> f64 {
    let y_mean = mean(pairs.y_true.iter().copied());
    let ss_res: f64 = residuals(pairs).map(|r| r * r).sum();
    let ss_tot: f64 = pairs.y_true.iter().map(|y| (y - y_mean).powi(2)).sum();
    one_minus_ratio(ss_res, ss_tot)
}

pub fn mean_absolute_percentage_error(pairs: &NumericPairs) -> f64 {
    mean(
        pairs
            .y_true
            .iter()
            .zip(&pairs.y_pred)
            .map(|(t, p)| (t - p).abs() / t.abs().max(f64::EPSILON)),
    )
}

pub fn median_absolute_error(pairs: &NumericPairs) -> f64 {
    let errors: Vec<f64> = residuals(pairs).map(f64::abs).collect();
    median(&errors)
}

pub fn explained_variance(pairs: &NumericPairs) -> f64 {
    let residual_mean = mean(residuals(pairs));
    let residual_var = mean(residuals(pairs).map(|r| (r - residual_mean).powi(2)));

    let y_mean = mean(pairs.y_true.iter().copied());
    let y_var = mean(pairs.y_true.iter().map(|y| (y - y_mean).powi(2)));

    one_minus_ratio(residual_var, y_var)
}

/// Compute a regression metric over sanitized pairs.
pub fn compute(metric: Metric, pairs: &NumericPairs) -> ScoringResult<f64> {
    let score = match metric {
        Metric::Mae => mean_absolute_error(pairs),
        Metric::Mse => mean_squared_error(pairs),
        Metric::Rmse => root_mean_squared_error(pairs),
        Metric::R2 => r2(pairs),
        Metric::Mape => mean_absolute_percentage_error(pairs),
        Metric::MedianAbsoluteError => median_absolute_error(pairs),
        Metric::ExplainedVariance => explained_variance(pairs),
        other => {
            return Err(ScoringError::Computation(format!(
                "{} is not a regression metric",
                other
            )))
        }
    };
    Ok(score)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(y_true: &[f64], y_pred: &[f64]) -> NumericPairs {
        NumericPairs {
            y_true: y_true.to_vec(),
            y_pred: y_pred.to_vec(),
        }
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-6,
            "expected {}, got {}",
            expected,
            actual
        );
    }

    #[test]
    fn test_error_means() {
        let p = pairs(&[3.0, -0.5, 2.0, 7.0], &[2.5, 0.0, 2.0, 8.0]);
        assert_close(mean_absolute_error(&p), 0.5);
        assert_close(mean_squared_error(&p), 0.375);
        assert_close(root_mean_squared_error(&p), 0.375f64.sqrt());
        assert_close(median_absolute_error(&p), 0.5);
    }

    #[test]
    fn test_r2_and_explained_variance() {
        let p = pairs(&[3.0, -0.5, 2.0, 7.0], &[2.5, 0.0, 2.0, 8.0]);
        assert_close(r2(&p), 0.948608);
        assert_close(explained_variance(&p), 0.957173);
    }

    #[test]
    fn test_constant_target() {
        assert_eq!(r2(&pairs(&[2.0, 2.0], &[2.0, 2.0])), 1.0);
        assert_eq!(r2(&pairs(&[2.0, 2.0], &[1.0, 3.0])), 0.0);
        assert_eq!(explained_variance(&pairs(&[2.0, 2.0], &[1.0, 3.0])), 0.0);
    }

    #[test]
    fn test_mape() {
        let p = pairs(&[1.0, 2.0, 4.0], &[1.5, 2.0, 3.0]);
        assert_close(mean_absolute_percentage_error(&p), (0.5 + 0.0 + 0.25) / 3.0);

        let zero_target = mean_absolute_percentage_error(&pairs(&[0.0], &[1.0]));
        assert_close(zero_target / 1e15, 1.0 / f64::EPSILON / 1e15);
    }

    #[test]
    fn test_median_of_even_count() {
        let p = pairs(&[0.0, 0.0, 0.0, 0.0], &[1.0, 2.0, 3.0, 10.0]);
        assert_close(median_absolute_error(&p), 2.5);
    }

    #[test]
    fn test_classification_metric_is_rejected() {
        let err = compute(Metric::Accuracy, &pairs(&[1.0], &[1.0])).unwrap_err();
        assert!(matches!(err, ScoringError::Computation(_)));
    }
}
