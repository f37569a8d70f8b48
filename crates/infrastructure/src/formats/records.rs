//! Structured-record (JSON / JSON Lines) parsers.

use grader_domain::{Cell, Column, Table};
use indexmap::{IndexMap, IndexSet};
use serde_json::{Map, Value};
use std::io::{BufRead, BufReader};

use crate::{Error, Result};

/// Parse a JSON document into a table.
///
/// Accepted layouts:
/// - an array of records: `[{"id": 1, "label": "a"}, ...]`
/// - an array of rows or scalars: `[[1, "a"], ...]` / `["a", "b"]`
/// - an object of columns: `{"id": [1, 2], "label": ["a", "b"]}`
/// - an object of indexed columns: `{"id": {"0": 1}, "label": {"0": "a"}}`
pub fn parse_json(bytes: &[u8]) -> Result<Table> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Err(Error::Parse("No columns to parse from file".to_string()));
    }

    let parsed: Value = serde_json::from_slice(bytes)
        .map_err(|e| Error::Parse(format!("Invalid JSON: {}", e)))?;

    match parsed {
        Value::Array(items) => parse_array(items),
        Value::Object(map) => parse_object(map),
        _ => Err(Error::Parse("Expected JSON object or array".to_string())),
    }
}

/// Parse JSON Lines, one record object per non-blank line.
pub fn parse_json_lines(bytes: &[u8]) -> Result<Table> {
    let reader = BufReader::new(bytes);
    let mut records = Vec::new();

    for (line_num, line) in reader.lines().enumerate() {
        let line = line.map_err(|e| {
            Error::Parse(format!("Failed to read line {}: {}", line_num + 1, e))
        })?;

        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        match serde_json::from_str(trimmed) {
            Ok(Value::Object(record)) => records.push(record),
            Ok(_) => {
                return Err(Error::Parse(format!(
                    "Line {} is not a JSON object",
                    line_num + 1
                )))
            }
            Err(e) => {
                return Err(Error::Parse(format!(
                    "Failed to parse line {}: {}",
                    line_num + 1,
                    e
                )))
            }
        }
    }

    records_to_table(records)
}

fn parse_array(items: Vec<Value>) -> Result<Table> {
    if items.iter().all(Value::is_object) {
        let records = items
            .into_iter()
            .filter_map(|item| match item {
                Value::Object(record) => Some(record),
                _ => None,
            })
            .collect();
        return records_to_table(records);
    }

    if items.iter().all(Value::is_array) {
        let width = items
            .iter()
            .filter_map(Value::as_array)
            .map(Vec::len)
            .max()
            .unwrap_or(0);
        let mut columns: Vec<Vec<Cell>> = vec![Vec::with_capacity(items.len()); width];
        for item in &items {
            let row = item.as_array().map(Vec::as_slice).unwrap_or_default();
            for (i, column) in columns.iter_mut().enumerate() {
                column.push(row.get(i).map(to_cell).unwrap_or(Cell::Missing));
            }
        }
        return build(
            columns
                .into_iter()
                .enumerate()
                .map(|(i, values)| Column::new(i.to_string(), values))
                .collect(),
        );
    }

    if items.iter().all(|v| !v.is_object() && !v.is_array()) {
        let values = items.iter().map(to_cell).collect();
        return build(vec![Column::new("0", values)]);
    }

    Err(Error::Parse(
        "JSON array mixes records, rows and scalar values".to_string(),
    ))
}

fn parse_object(map: Map<String, Value>) -> Result<Table> {
    if map.values().all(Value::is_array) {
        let columns = map
            .into_iter()
            .map(|(name, values)| {
                let values = match values {
                    Value::Array(values) => values.iter().map(to_cell).collect(),
                    _ => Vec::new(),
                };
                Column::new(name, values)
            })
            .collect();
        return build(columns);
    }

    if map.values().all(Value::is_object) {
        let mut index: IndexSet<String> = IndexSet::new();
        for column in map.values().filter_map(Value::as_object) {
            index.extend(column.keys().cloned());
        }
        let columns = map
            .iter()
            .map(|(name, column)| {
                let values = index
                    .iter()
                    .map(|row| column.get(row).map(to_cell).unwrap_or(Cell::Missing))
                    .collect();
                Column::new(name.clone(), values)
            })
            .collect();
        return build(columns);
    }

    Err(Error::Parse(
        "If using all scalar values, you must pass an index".to_string(),
    ))
}

/// Records become rows; columns appear in order of first appearance.
fn records_to_table(records: Vec<Map<String, Value>>) -> Result<Table> {
    let mut columns: IndexMap<String, Vec<Cell>> = IndexMap::new();
    for record in &records {
        for key in record.keys() {
            columns.entry(key.clone()).or_default();
        }
    }

    for record in &records {
        for (name, values) in columns.iter_mut() {
            values.push(record.get(name).map(to_cell).unwrap_or(Cell::Missing));
        }
    }

    build(
        columns
            .into_iter()
            .map(|(name, values)| Column::new(name, values))
            .collect(),
    )
}

fn build(columns: Vec<Column>) -> Result<Table> {
    if columns.is_empty() {
        return Err(Error::Parse("No columns to parse from file".to_string()));
    }
    Table::new(columns).map_err(|e| Error::Parse(e.to_string()))
}

fn to_cell(value: &Value) -> Cell {
    match value {
        Value::Null => Cell::Missing,
        Value::Bool(b) => Cell::Bool(*b),
        Value::Number(n) => n.as_f64().map(Cell::Number).unwrap_or(Cell::Missing),
        Value::String(s) => Cell::Text(s.clone()),
        nested => Cell::Text(nested.to_string()),
    }
}
