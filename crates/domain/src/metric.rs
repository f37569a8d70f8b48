//! Metric catalog types.
//!
//! The set of supported metrics is closed: every metric is a [`Metric`]
//! variant, and the externally visible names live in [`CATALOG`].

use serde::{Deserialize, Serialize};
use std::fmt;

/// Metric class, deciding sanitization and which score functions apply
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricClass {
    Classification,
    Regression,
}

/// Averaging strategy for per-class metrics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Average {
    /// Unweighted mean over labels
    Macro,
    /// Pool true/false positives and negatives over all labels
    Micro,
    /// Mean over labels weighted by true-label support
    Weighted,
}

/// Every supported metric
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    Accuracy,
    BalancedAccuracy,
    F1(Average),
    Precision(Average),
    Recall(Average),
    CohenKappa,
    JaccardMacro,
    RocAuc,
    CrossEntropy,
    Mae,
    Mse,
    Rmse,
    R2,
    Mape,
    MedianAbsoluteError,
    ExplainedVariance,
}

/// Static description of a metric's requirements
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MetricDescriptor {
    /// Canonical name
    pub name: &'static str,
    pub class: MetricClass,
    /// Minimum number of aligned samples
    pub min_samples: usize,
    /// Whether missing values are passed through rather than sanitized away
    pub nan_tolerant: bool,
}

/// External metric names and the metric each one selects.
///
/// `f1` is an alias for the weighted F1 score.
pub const CATALOG: &[(&str, Metric)] = &[
    ("accuracy", Metric::Accuracy),
    ("balanced_accuracy", Metric::BalancedAccuracy),
    ("f1", Metric::F1(Average::Weighted)),
    ("f1_macro", Metric::F1(Average::Macro)),
    ("f1_micro", Metric::F1(Average::Micro)),
    ("f1_weighted", Metric::F1(Average::Weighted)),
    ("precision_macro", Metric::Precision(Average::Macro)),
    ("precision_micro", Metric::Precision(Average::Micro)),
    ("precision_weighted", Metric::Precision(Average::Weighted)),
    ("recall_macro", Metric::Recall(Average::Macro)),
    ("recall_micro", Metric::Recall(Average::Micro)),
    ("recall_weighted", Metric::Recall(Average::Weighted)),
    ("cohen_kappa", Metric::CohenKappa),
    ("jaccard_macro", Metric::JaccardMacro),
    ("roc_auc", Metric::RocAuc),
    ("cross_entropy", Metric::CrossEntropy),
    ("mae", Metric::Mae),
    ("mse", Metric::Mse),
    ("rmse", Metric::Rmse),
    ("r2", Metric::R2),
    ("mape", Metric::Mape),
    ("median_absolute_error", Metric::MedianAbsoluteError),
    ("explained_variance", Metric::ExplainedVariance),
];

impl Metric {
    /// Look up a metric by external name, ignoring case and surrounding whitespace.
    pub fn from_name(name: &str) -> Option<Self> {
        let wanted = name.trim().to_lowercase();
        CATALOG
            .iter()
            .find(|(n, _)| *n == wanted)
            .map(|(_, metric)| *metric)
    }

    /// Canonical external name
    pub fn name(&self) -> &'static str {
        match self {
            Metric::Accuracy => "accuracy",
            Metric::BalancedAccuracy => "balanced_accuracy",
            Metric::F1(Average::Macro) => "f1_macro",
            Metric::F1(Average::Micro) => "f1_micro",
            Metric::F1(Average::Weighted) => "f1_weighted",
            Metric::Precision(Average::Macro) => "precision_macro",
            Metric::Precision(Average::Micro) => "precision_micro",
            Metric::Precision(Average::Weighted) => "precision_weighted",
            Metric::Recall(Average::Macro) => "recall_macro",
            Metric::Recall(Average::Micro) => "recall_micro",
            Metric::Recall(Average::Weighted) => "recall_weighted",
            Metric::CohenKappa => "cohen_kappa",
            Metric::JaccardMacro => "jaccard_macro",
            Metric::RocAuc => "roc_auc",
            Metric::CrossEntropy => "cross_entropy",
            Metric::Mae => "mae",
            Metric::Mse => "mse",
            Metric::Rmse => "rmse",
            Metric::R2 => "r2",
            Metric::Mape => "mape",
            Metric::MedianAbsoluteError => "median_absolute_error",
            Metric::ExplainedVariance => "explained_variance",
        }
    }

    pub fn class(&self) -> MetricClass {
        match self {
            Metric::Mae
            | Metric::Mse
            | Metric::Rmse
            | Metric::R2
            | Metric::Mape
            | Metric::MedianAbsoluteError
            | Metric::ExplainedVariance => MetricClass::Regression,
            _ => MetricClass::Classification,
        }
    }

    pub fn descriptor(&self) -> MetricDescriptor {
        let class = self.class();
        MetricDescriptor {
            name: self.name(),
            class,
            min_samples: match self {
                Metric::R2 => 2,
                _ => 1,
            },
            nan_tolerant: class == MetricClass::Classification,
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
