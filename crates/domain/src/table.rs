//! Tabular data model shared by the loader and the scoring stages.

use crate::errors::{ScoringError, ScoringResult};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

/// A single scalar value in a [`Table`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    /// Missing marker (empty field, `NA`, JSON `null`, ...)
    Missing,
    Bool(bool),
    Number(f64),
    Text(String),
}

impl Cell {
    /// Check whether this cell is the missing marker
    pub fn is_missing(&self) -> bool {
        matches!(self, Cell::Missing)
    }

    /// Exact label equality used by classification metrics.
    ///
    /// No coercion happens: `Number(1.0)` and `Text("1")` differ, and a
    /// missing value never matches anything, itself included.
    pub fn matches(&self, other: &Cell) -> bool {
        match (self.key(), other.key()) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    }

    /// Convert to a real number if the cell holds one.
    ///
    /// Numeric text is parsed after trimming; booleans, missing values and
    /// NaN are not numbers.
    pub fn as_f64(&self) -> Option<f64> {
        let value = match self {
            Cell::Number(n) => *n,
            Cell::Text(s) => s.trim().parse::<f64>().ok()?,
            Cell::Missing | Cell::Bool(_) => return None,
        };
        (!value.is_nan()).then_some(value)
    }

    /// Hashable key for identifiers and class labels; `None` when missing.
    pub fn key(&self) -> Option<CellKey> {
        match self {
            Cell::Missing => None,
            Cell::Number(n) if n.is_nan() => None,
            Cell::Bool(b) => Some(CellKey::Bool(*b)),
            Cell::Number(n) => Some(CellKey::Number(*n)),
            Cell::Text(s) => Some(CellKey::Text(s.clone())),
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Missing => write!(f, "<missing>"),
            Cell::Bool(b) => write!(f, "{}", b),
            Cell::Number(n) => write!(f, "{}", n),
            Cell::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Cell::Number(value)
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::Text(value.to_string())
    }
}

impl From<bool> for Cell {
    fn from(value: bool) -> Self {
        Cell::Bool(value)
    }
}

/// Totally ordered, hashable form of a non-missing [`Cell`].
///
/// Ordering is booleans, then numbers, then text. Numbers compare by value
/// with `-0.0 == 0.0`.
#[derive(Debug, Clone)]
pub enum CellKey {
    Bool(bool),
    Number(f64),
    Text(String),
}

impl CellKey {
    fn rank(&self) -> u8 {
        match self {
            CellKey::Bool(_) => 0,
            CellKey::Number(_) => 1,
            CellKey::Text(_) => 2,
        }
    }

    /// Whether this key is textual.
    pub fn is_text(&self) -> bool {
        matches!(self, CellKey::Text(_))
    }

    /// Numeric view used by probability-style metrics; booleans map to 0/1.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellKey::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            CellKey::Number(n) => Some(*n),
            CellKey::Text(_) => None,
        }
    }
}

fn normalize_zero(n: f64) -> f64 {
    if n == 0.0 {
        0.0
    } else {
        n
    }
}

impl PartialEq for CellKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for CellKey {}

impl PartialOrd for CellKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CellKey {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (CellKey::Bool(a), CellKey::Bool(b)) => a.cmp(b),
            (CellKey::Number(a), CellKey::Number(b)) => {
                normalize_zero(*a).total_cmp(&normalize_zero(*b))
            }
            (CellKey::Text(a), CellKey::Text(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl Hash for CellKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.rank().hash(state);
        match self {
            CellKey::Bool(b) => b.hash(state),
            CellKey::Number(n) => normalize_zero(*n).to_bits().hash(state),
            CellKey::Text(s) => s.hash(state),
        }
    }
}

impl fmt::Display for CellKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellKey::Bool(b) => write!(f, "{}", b),
            CellKey::Number(n) => write!(f, "{}", n),
            CellKey::Text(s) => write!(f, "{}", s),
        }
    }
}

/// A named column of cells.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    pub values: Vec<Cell>,
}

impl Column {
    pub fn new(name: impl Into<String>, values: Vec<Cell>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }
}

/// An immutable, column-oriented table.
///
/// All columns have the same length. Construct through [`Table::new`], which
/// enforces that invariant.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Table {
    columns: Vec<Column>,
}

impl Table {
    /// Build a table, rejecting columns of unequal length.
    pub fn new(columns: Vec<Column>) -> ScoringResult<Self> {
        if let Some(first) = columns.first() {
            let expected = first.values.len();
            if let Some(bad) = columns.iter().find(|c| c.values.len() != expected) {
                return Err(ScoringError::Load(format!(
                    "Column '{}' has {} rows, expected {}",
                    bad.name,
                    bad.values.len(),
                    expected
                )));
            }
        }
        Ok(Self { columns })
    }

    /// Number of columns
    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    /// Number of rows (0 for a table without columns)
    pub fn num_rows(&self) -> usize {
        self.columns.first().map(|c| c.values.len()).unwrap_or(0)
    }

    pub fn column(&self, index: usize) -> Option<&Column> {
        self.columns.get(index)
    }

    /// Position of the first column with the given name.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }
}
