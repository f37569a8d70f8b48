//! Numeric sanitization for regression metrics.

use grader_domain::{Cell, ScoringError, ScoringResult};
use tracing::debug;

/// Paired real-valued vectors of equal length.
#[derive(Debug, Clone, PartialEq)]
pub struct NumericPairs {
    pub y_true: Vec<f64>,
    pub y_pred: Vec<f64>,
}

impl NumericPairs {
    pub fn len(&self) -> usize {
        self.y_true.len()
    }

    pub fn is_empty(&self) -> bool {
        self.y_true.is_empty()
    }
}

/// Keep only the positions where both values are numbers.
pub fn sanitize(y_true: &[Cell], y_pred: &[Cell]) -> ScoringResult<NumericPairs> {
    let (kept_true, kept_pred): (Vec<f64>, Vec<f64>) = y_true
        .iter()
        .zip(y_pred)
        .filter_map(|(t, p)| Some((t.as_f64()?, p.as_f64()?)))
        .unzip();

    let dropped = y_true.len().min(y_pred.len()) - kept_true.len();
    if dropped > 0 {
        debug!(dropped, kept = kept_true.len(), "Dropped non-numeric pairs");
    }

    if kept_true.is_empty() {
        return Err(ScoringError::no_valid_numeric_data());
    }

    Ok(NumericPairs {
        y_true: kept_true,
        y_pred: kept_pred,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drops_missing_and_text() {
        let y_true = vec![Cell::Number(1.0), Cell::Missing, Cell::from("3.5"), Cell::from("x")];
        let y_pred = vec![Cell::Number(2.0), Cell::Number(2.0), Cell::Number(3.0), Cell::Number(4.0)];

        let pairs = sanitize(&y_true, &y_pred).unwrap();
        assert_eq!(pairs.y_true, vec![1.0, 3.5]);
        assert_eq!(pairs.y_pred, vec![2.0, 3.0]);
    }

    #[test]
    fn test_booleans_are_not_numeric() {
        let err = sanitize(&[Cell::Bool(true)], &[Cell::Number(1.0)]).unwrap_err();
        assert_eq!(err, ScoringError::InsufficientData("No valid numeric data.".to_string()));
    }

    #[test]
    fn test_all_missing_is_insufficient() {
        let err = sanitize(&[Cell::Missing, Cell::Missing], &[Cell::Number(1.0), Cell::Missing])
            .unwrap_err();
        assert_eq!(err.to_string(), "No valid numeric data.");
    }
}
