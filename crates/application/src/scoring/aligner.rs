//! Record alignment - pairing submission and ground-truth values by identifier.

use grader_domain::{Cell, CellKey, DuplicatePolicy, ScoringError, ScoringResult, Table};
use indexmap::IndexMap;
use tracing::{debug, instrument, warn};

/// Which input a series was built from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Submission,
    GroundTruth,
}

impl Side {
    fn label(&self) -> &'static str {
        match self {
            Side::Submission => "submission",
            Side::GroundTruth => "ground truth",
        }
    }
}

/// Identifier to value mapping, in first-appearance order.
#[derive(Debug, Clone, Default)]
pub struct IdentifierSeries {
    values: IndexMap<CellKey, Cell>,
}

impl IdentifierSeries {
    /// Build a series keyed by column 0 with values from `target`.
    pub fn from_table(
        table: &Table,
        target: usize,
        side: Side,
        policy: DuplicatePolicy,
    ) -> ScoringResult<Self> {
        let (ids, values) = match (table.column(0), table.column(target)) {
            (Some(ids), Some(values)) => (ids, values),
            _ => return Ok(Self::default()),
        };

        let mut series = IndexMap::with_capacity(table.num_rows());
        let mut skipped = 0usize;
        let mut overwritten = 0usize;

        for (id, value) in ids.values.iter().zip(&values.values) {
            let Some(key) = id.key() else {
                skipped += 1;
                continue;
            };

            if series.contains_key(&key) {
                if policy == DuplicatePolicy::Reject {
                    return Err(ScoringError::Alignment(format!(
                        "Duplicate ID found in {}: {}",
                        side.label(),
                        key
                    )));
                }
                overwritten += 1;
            }
            series.insert(key, value.clone());
        }

        if skipped > 0 {
            warn!(side = side.label(), rows = skipped, "Skipped rows with a missing ID");
        }
        if overwritten > 0 {
            warn!(
                side = side.label(),
                rows = overwritten,
                "Duplicate IDs overwritten by later rows"
            );
        }

        Ok(Self { values: series })
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, id: &CellKey) -> Option<&Cell> {
        self.values.get(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&CellKey, &Cell)> {
        self.values.iter()
    }
}

/// Identifiers present in both inputs, in ground-truth order, with the
/// projected value vectors.
#[derive(Debug, Clone, PartialEq)]
pub struct Alignment {
    pub ids: Vec<CellKey>,
    pub y_true: Vec<Cell>,
    pub y_pred: Vec<Cell>,
}

impl Alignment {
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// Pairs a submission with its ground truth.
#[derive(Debug, Clone, Copy, Default)]
pub struct RecordAligner {
    duplicate_policy: DuplicatePolicy,
}

impl RecordAligner {
    pub fn new(duplicate_policy: DuplicatePolicy) -> Self {
        Self { duplicate_policy }
    }

    #[instrument(skip_all)]
    pub fn align(&self, submission: &Table, ground_truth: &Table) -> ScoringResult<Alignment> {
        let gt_target = default_target(ground_truth);
        let sub_target = submission_target(submission, ground_truth, gt_target);

        let truth = IdentifierSeries::from_table(
            ground_truth,
            gt_target,
            Side::GroundTruth,
            self.duplicate_policy,
        )?;
        let predictions = IdentifierSeries::from_table(
            submission,
            sub_target,
            Side::Submission,
            self.duplicate_policy,
        )?;

        let mut alignment = Alignment {
            ids: Vec::new(),
            y_true: Vec::new(),
            y_pred: Vec::new(),
        };
        for (id, expected) in truth.iter() {
            if let Some(predicted) = predictions.get(id) {
                alignment.ids.push(id.clone());
                alignment.y_true.push(expected.clone());
                alignment.y_pred.push(predicted.clone());
            }
        }

        debug!(
            ground_truth = truth.len(),
            submission = predictions.len(),
            matched = alignment.len(),
            "Aligned records"
        );

        if alignment.is_empty() {
            return Err(ScoringError::no_matching_ids());
        }
        Ok(alignment)
    }
}

/// Column 1, or column 0 for single-column tables.
fn default_target(table: &Table) -> usize {
    if table.num_columns() >= 2 {
        1
    } else {
        0
    }
}

/// Prefer the submission column named like the ground-truth target.
fn submission_target(submission: &Table, ground_truth: &Table, gt_target: usize) -> usize {
    ground_truth
        .column(gt_target)
        .and_then(|column| submission.position(&column.name))
        .filter(|&position| position != 0)
        .unwrap_or_else(|| default_target(submission))
}
