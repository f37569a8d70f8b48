//! Builder for in-memory tables.

use grader_domain::{Cell, Column, Table};

/// Builds a [`Table`] column by column.
///
/// # Examples
///
/// ```
/// use grader_testing::TableBuilder;
///
/// let table = TableBuilder::new()
///     .numbers("id", &[1.0, 2.0])
///     .texts("label", &["yes", "no"])
///     .build();
/// assert_eq!(table.num_rows(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct TableBuilder {
    columns: Vec<Column>,
}

impl TableBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn column(mut self, name: &str, values: Vec<Cell>) -> Self {
        self.columns.push(Column::new(name, values));
        self
    }

    pub fn numbers(self, name: &str, values: &[f64]) -> Self {
        self.column(name, values.iter().copied().map(Cell::Number).collect())
    }

    pub fn texts(self, name: &str, values: &[&str]) -> Self {
        self.column(name, values.iter().copied().map(Cell::from).collect())
    }

    /// Numeric column where `None` is a missing value
    pub fn optional_numbers(self, name: &str, values: &[Option<f64>]) -> Self {
        self.column(
            name,
            values
                .iter()
                .map(|v| v.map(Cell::Number).unwrap_or(Cell::Missing))
                .collect(),
        )
    }

    /// Build the table.
    ///
    /// # Panics
    ///
    /// Panics if the columns have different lengths.
    pub fn build(self) -> Table {
        Table::new(self.columns).expect("table columns must have equal length")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_keeps_column_order() {
        let table = TableBuilder::new()
            .numbers("id", &[1.0])
            .optional_numbers("y", &[None])
            .build();
        assert_eq!(table.column_names(), vec!["id", "y"]);
        assert_eq!(table.column(1).unwrap().values, vec![Cell::Missing]);
    }

    #[test]
    #[should_panic(expected = "equal length")]
    fn test_builder_rejects_ragged_columns() {
        TableBuilder::new()
            .numbers("id", &[1.0, 2.0])
            .texts("label", &["a"])
            .build();
    }
}
