//! Classification metrics over raw label cells.
//!
//! Labels compare exactly (no coercion between numbers and text) and a missing
//! value never matches any label. A missing prediction counts as a false
//! negative for the true class; a missing truth counts as a false positive for
//! the predicted class.

use grader_domain::{Average, Cell, CellKey, Metric, ScoringError, ScoringResult};
use std::collections::BTreeSet;

/// Per-class counts over the sorted union of labels.
///
/// Storage is linear in the number of labels, so continuous values scored as
/// labels stay cheap.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfusionStats {
    labels: Vec<CellKey>,
    /// Pairs whose prediction equals the true label `k`
    hits: Vec<u64>,
    /// Pairs whose true label is `k`, whatever the prediction
    support: Vec<u64>,
    /// Pairs predicted as `k`, whatever the true label
    predicted: Vec<u64>,
    total: u64,
}

impl ConfusionStats {
    pub fn new(y_true: &[Cell], y_pred: &[Cell]) -> ScoringResult<Self> {
        let labels: Vec<CellKey> = y_true
            .iter()
            .chain(y_pred)
            .filter_map(Cell::key)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let has_text = labels.iter().any(CellKey::is_text);
        let has_number = labels.iter().any(|label| !label.is_text());
        if has_text && has_number {
            return Err(ScoringError::Metric(
                "Mix of label input types (string and number)".to_string(),
            ));
        }

        let k = labels.len();
        let mut stats = Self {
            hits: vec![0; k],
            support: vec![0; k],
            predicted: vec![0; k],
            total: 0,
            labels,
        };

        for (t, p) in y_true.iter().zip(y_pred) {
            stats.total += 1;
            let truth = stats.index_of(t);
            let prediction = stats.index_of(p);
            if let Some(i) = truth {
                stats.support[i] += 1;
            }
            if let Some(j) = prediction {
                stats.predicted[j] += 1;
            }
            if let (Some(i), Some(j)) = (truth, prediction) {
                if i == j {
                    stats.hits[i] += 1;
                }
            }
        }

        Ok(stats)
    }

    fn index_of(&self, cell: &Cell) -> Option<usize> {
        let key = cell.key()?;
        self.labels.binary_search(&key).ok()
    }

    pub fn labels(&self) -> &[CellKey] {
        &self.labels
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    fn tp(&self, k: usize) -> u64 {
        self.hits[k]
    }

    /// Number of pairs whose true label is `k`
    pub fn support(&self, k: usize) -> u64 {
        self.support[k]
    }

    /// Number of pairs predicted as `k`
    fn predicted(&self, k: usize) -> u64 {
        self.predicted[k]
    }

    fn fp(&self, k: usize) -> u64 {
        self.predicted(k) - self.tp(k)
    }

    fn fn_(&self, k: usize) -> u64 {
        self.support(k) - self.tp(k)
    }

    fn correct(&self) -> u64 {
        self.hits.iter().sum()
    }
}

/// Per-class score from (tp, fp, fn)
type ClassScore = fn(u64, u64, u64) -> f64;

fn ratio(numerator: u64, denominator: u64) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

fn precision(tp: u64, fp: u64, _fn: u64) -> f64 {
    ratio(tp, tp + fp)
}

fn recall(tp: u64, _fp: u64, fn_: u64) -> f64 {
    ratio(tp, tp + fn_)
}

fn f1(tp: u64, fp: u64, fn_: u64) -> f64 {
    ratio(2 * tp, 2 * tp + fp + fn_)
}

fn jaccard(tp: u64, fp: u64, fn_: u64) -> f64 {
    ratio(tp, tp + fp + fn_)
}

fn averaged(stats: &ConfusionStats, average: Average, score: ClassScore) -> f64 {
    let classes = 0..stats.labels.len();
    match average {
        Average::Micro => {
            let (tp, fp, fn_) = classes.fold((0, 0, 0), |(tp, fp, fn_), k| {
                (tp + stats.tp(k), fp + stats.fp(k), fn_ + stats.fn_(k))
            });
            score(tp, fp, fn_)
        }
        Average::Macro => {
            if stats.labels.is_empty() {
                return 0.0;
            }
            let sum: f64 = classes
                .map(|k| score(stats.tp(k), stats.fp(k), stats.fn_(k)))
                .sum();
            sum / stats.labels.len() as f64
        }
        Average::Weighted => {
            let total_support: u64 = classes.clone().map(|k| stats.support(k)).sum();
            if total_support == 0 {
                return 0.0;
            }
            let sum: f64 = classes
                .map(|k| score(stats.tp(k), stats.fp(k), stats.fn_(k)) * stats.support(k) as f64)
                .sum();
            sum / total_support as f64
        }
    }
}

pub fn accuracy(stats: &ConfusionStats) -> f64 {
    ratio(stats.correct(), stats.total)
}

/// Mean recall over the classes present in the ground truth.
pub fn balanced_accuracy(stats: &ConfusionStats) -> ScoringResult<f64> {
    let recalls: Vec<f64> = (0..stats.labels.len())
        .filter(|&k| stats.support(k) > 0)
        .map(|k| recall(stats.tp(k), stats.fp(k), stats.fn_(k)))
        .collect();
    if recalls.is_empty() {
        return Err(ScoringError::Metric(
            "balanced_accuracy needs at least one labelled ground-truth value".to_string(),
        ));
    }
    Ok(recalls.iter().sum::<f64>() / recalls.len() as f64)
}

/// Cohen's kappa; NaN when chance agreement is perfect.
pub fn cohen_kappa(stats: &ConfusionStats) -> f64 {
    let n = stats.total as f64;
    if n == 0.0 {
        return f64::NAN;
    }
    let observed = stats.correct() as f64 / n;
    let expected: f64 = (0..stats.labels.len())
        .map(|k| (stats.support(k) as f64 / n) * (stats.predicted(k) as f64 / n))
        .sum();
    (observed - expected) / (1.0 - expected)
}

/// Binary ground truth and numeric scores for probability-style metrics.
struct BinaryScores {
    /// 1.0 for the positive (greater) label, 0.0 otherwise
    y_true: Vec<f64>,
    y_score: Vec<f64>,
}

fn binary_scores(metric: Metric, y_true: &[Cell], y_pred: &[Cell]) -> ScoringResult<BinaryScores> {
    let mut keys = Vec::with_capacity(y_true.len());
    for cell in y_true {
        keys.push(cell.key().ok_or_else(|| {
            ScoringError::Metric(format!("{} does not accept missing ground-truth labels", metric))
        })?);
    }

    let classes: BTreeSet<&CellKey> = keys.iter().collect();
    let positive = match classes.len() {
        2 => classes.iter().next_back().copied(),
        1 => {
            return Err(ScoringError::Metric(format!(
                "Only one class present in y_true. {} is not defined in that case.",
                metric
            )))
        }
        _ => None,
    }
    .ok_or_else(|| ScoringError::Metric(format!("{} requires a binary ground truth", metric)))?;

    let mut y_score = Vec::with_capacity(y_pred.len());
    for cell in y_pred {
        let score = match cell {
            Cell::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            other => other.as_f64(),
        };
        y_score.push(score.ok_or_else(|| {
            ScoringError::Metric(format!("{} requires numeric prediction scores", metric))
        })?);
    }

    Ok(BinaryScores {
        y_true: keys
            .iter()
            .map(|key| if key == positive { 1.0 } else { 0.0 })
            .collect(),
        y_score,
    })
}

/// 1-based ranks with ties sharing their average rank.
fn average_ranks(values: &[f64]) -> Vec<f64> {
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&a, &b| values[a].total_cmp(&values[b]));

    let mut ranks = vec![0.0; values.len()];
    let mut start = 0;
    while start < order.len() {
        let mut end = start + 1;
        while end < order.len() && values[order[end]] == values[order[start]] {
            end += 1;
        }
        let rank = (start + end + 1) as f64 / 2.0;
        for &i in &order[start..end] {
            ranks[i] = rank;
        }
        start = end;
    }
    ranks
}

/// Area under the ROC curve by the rank-sum (Mann-Whitney) formula.
pub fn roc_auc(y_true: &[Cell], y_pred: &[Cell]) -> ScoringResult<f64> {
    let scores = binary_scores(Metric::RocAuc, y_true, y_pred)?;
    let ranks = average_ranks(&scores.y_score);

    let positives = scores.y_true.iter().filter(|&&y| y == 1.0).count() as f64;
    let negatives = scores.y_true.len() as f64 - positives;
    let positive_rank_sum: f64 = ranks
        .iter()
        .zip(&scores.y_true)
        .filter(|(_, &y)| y == 1.0)
        .map(|(rank, _)| rank)
        .sum();

    Ok((positive_rank_sum - positives * (positives + 1.0) / 2.0) / (positives * negatives))
}

/// Binary log loss with probabilities clipped to `[eps, 1 - eps]`.
pub fn cross_entropy(y_true: &[Cell], y_pred: &[Cell]) -> ScoringResult<f64> {
    let scores = binary_scores(Metric::CrossEntropy, y_true, y_pred)?;
    let eps = f64::EPSILON;

    let total: f64 = scores
        .y_true
        .iter()
        .zip(&scores.y_score)
        .map(|(&y, &p)| {
            let p = p.clamp(eps, 1.0 - eps);
            -(y * p.ln() + (1.0 - y) * (1.0 - p).ln())
        })
        .sum();

    Ok(total / scores.y_true.len() as f64)
}

/// Compute a classification metric over aligned label cells.
pub fn compute(metric: Metric, y_true: &[Cell], y_pred: &[Cell]) -> ScoringResult<f64> {
    match metric {
        Metric::RocAuc => return roc_auc(y_true, y_pred),
        Metric::CrossEntropy => return cross_entropy(y_true, y_pred),
        _ => {}
    }

    let stats = ConfusionStats::new(y_true, y_pred)?;
    let score = match metric {
        Metric::Accuracy => accuracy(&stats),
        Metric::BalancedAccuracy => balanced_accuracy(&stats)?,
        Metric::F1(average) => averaged(&stats, average, f1),
        Metric::Precision(average) => averaged(&stats, average, precision),
        Metric::Recall(average) => averaged(&stats, average, recall),
        Metric::JaccardMacro => averaged(&stats, Average::Macro, jaccard),
        Metric::CohenKappa => cohen_kappa(&stats),
        other => {
            return Err(ScoringError::Computation(format!(
                "{} is not a classification metric",
                other
            )))
        }
    };
    Ok(score)
}
