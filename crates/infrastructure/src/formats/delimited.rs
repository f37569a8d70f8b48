//! Delimited-text parser with per-column type inference.

use csv::ReaderBuilder;
use grader_domain::{Cell, Column, Table};
use std::collections::HashSet;

use crate::{Error, Result};

/// Tokens read as missing values, matching the pandas defaults.
const NA_TOKENS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Parse delimited text whose first row is the header.
pub fn parse_delimited(bytes: &[u8], delimiter: u8) -> Result<Table> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Err(Error::Parse("No columns to parse from file".to_string()));
    }

    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(false)
        .from_reader(bytes);

    let headers = reader
        .headers()
        .map_err(|e| Error::Parse(format!("Malformed header row: {}", e)))?
        .clone();
    if headers.is_empty() {
        return Err(Error::Parse("No columns to parse from file".to_string()));
    }

    let mut raw: Vec<Vec<String>> = vec![Vec::new(); headers.len()];
    for (row_num, record) in reader.records().enumerate() {
        let record = record.map_err(|e| {
            Error::Parse(format!("Failed to parse row {}: {}", row_num + 1, e))
        })?;
        for (column, field) in raw.iter_mut().zip(record.iter()) {
            column.push(field.to_string());
        }
    }

    let columns = unique_names(headers.iter())
        .into_iter()
        .zip(raw)
        .map(|(name, values)| Column::new(name, infer_column(values)))
        .collect();

    Table::new(columns).map_err(|e| Error::Parse(e.to_string()))
}

/// Name blank headers `Unnamed: <i>` and suffix repeats with `.1`, `.2`, ...
fn unique_names<'a>(headers: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen = HashSet::new();
    headers
        .enumerate()
        .map(|(i, header)| {
            let base = if header.is_empty() {
                format!("Unnamed: {}", i)
            } else {
                header.to_string()
            };
            let mut name = base.clone();
            let mut n = 1;
            while !seen.insert(name.clone()) {
                name = format!("{}.{}", base, n);
                n += 1;
            }
            name
        })
        .collect()
}

fn is_na(field: &str) -> bool {
    NA_TOKENS.contains(&field)
}

fn parse_number(field: &str) -> Option<f64> {
    field.trim().parse::<f64>().ok().filter(|n| !n.is_nan())
}

fn parse_bool(field: &str) -> Option<bool> {
    match field.trim().to_ascii_lowercase().as_str() {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

/// Infer one type for the whole column: numeric, then boolean, then text.
fn infer_column(raw: Vec<String>) -> Vec<Cell> {
    let present = || raw.iter().filter(|f| !is_na(f));

    if present().all(|f| parse_number(f).is_some()) {
        return raw
            .iter()
            .map(|f| match parse_number(f) {
                Some(n) if !is_na(f) => Cell::Number(n),
                _ => Cell::Missing,
            })
            .collect();
    }

    if present().all(|f| parse_bool(f).is_some()) {
        return raw
            .iter()
            .map(|f| match parse_bool(f) {
                Some(b) if !is_na(f) => Cell::Bool(b),
                _ => Cell::Missing,
            })
            .collect();
    }

    raw.into_iter()
        .map(|f| if is_na(&f) { Cell::Missing } else { Cell::Text(f) })
        .collect()
}
