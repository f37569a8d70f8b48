//! Input file fixtures.
//!
//! [`InputDir`] writes submission and ground-truth files into a temporary
//! directory that is removed on drop. The scenario constants hold small
//! inputs with known scores.

use flate2::{write::GzEncoder, Compression};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Ground truth for the accuracy scenario (ids 1..3)
pub const LABELS_GROUND_TRUTH_CSV: &str = "id,label\n1,yes\n2,no\n3,yes\n";

/// Submission for the accuracy scenario: ids 1 and 2 overlap, one match
pub const LABELS_SUBMISSION_CSV: &str = "id,label\n1,yes\n2,yes\n4,no\n";

/// Ground truth for the rmse scenario
pub const VALUES_GROUND_TRUTH_CSV: &str = "id,value\n1,1.0\n2,2.0\n3,3.0\n";

/// Submission for the rmse scenario; rmse is sqrt(4/3)
pub const VALUES_SUBMISSION_CSV: &str = "id,value\n1,1.0\n2,2.0\n3,5.0\n";

/// Temporary directory of input files
pub struct InputDir {
    dir: TempDir,
}

impl InputDir {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("failed to create temp dir"),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Path of `name` inside the directory, whether or not it exists
    pub fn file(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    /// Write `contents` to `name` and return the path as a location string
    pub fn write(&self, name: &str, contents: impl AsRef<[u8]>) -> String {
        let path = self.file(name);
        std::fs::write(&path, contents).expect("failed to write fixture");
        path.to_string_lossy().into_owned()
    }

    /// Gzip `contents` into `name` and return the path as a location string
    pub fn write_gz(&self, name: &str, contents: impl AsRef<[u8]>) -> String {
        self.write(name, gzip(contents.as_ref()))
    }
}

impl Default for InputDir {
    fn default() -> Self {
        Self::new()
    }
}

/// Gzip-compress bytes
pub fn gzip(data: &[u8]) -> Vec<u8> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data).expect("failed to compress fixture");
    encoder.finish().expect("failed to compress fixture")
}

/// CSV with an `id` column and one value column
pub fn id_value_csv(value_column: &str, rows: &[(i64, &str)]) -> String {
    let mut csv = format!("id,{}\n", value_column);
    for (id, value) in rows {
        csv.push_str(&format!("{},{}\n", id, value));
    }
    csv
}

/// JSON records with an `id` field and one value field
pub fn id_value_json(value_column: &str, rows: &[(i64, serde_json::Value)]) -> String {
    let records: Vec<serde_json::Value> = rows
        .iter()
        .map(|(id, value)| serde_json::json!({ "id": id, value_column: value }))
        .collect();
    serde_json::Value::Array(records).to_string()
}
