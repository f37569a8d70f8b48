//! Input format detection and parsers.

mod delimited;
mod records;

pub use delimited::parse_delimited;
pub use records::{parse_json, parse_json_lines};

use grader_domain::Table;
use serde::{Deserialize, Serialize};

use crate::compression::Compression;
use crate::Result;

/// Supported input formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputFormat {
    /// Delimited text with a header row
    Delimited { delimiter: u8 },
    /// A JSON document (records, columns of arrays or columns of objects)
    Json,
    /// One JSON record per line
    JsonLines,
}

impl InputFormat {
    pub const CSV: InputFormat = InputFormat::Delimited { delimiter: b',' };
    pub const TSV: InputFormat = InputFormat::Delimited { delimiter: b'\t' };

    /// Detect format and compression from a file name.
    ///
    /// Unrecognized extensions fall back to comma-delimited text.
    pub fn detect(file_name: &str) -> (Self, Compression) {
        let lowered = file_name.to_lowercase();
        let (stem, compression) = Compression::strip_suffix(&lowered);
        let extension = stem.rsplit_once('.').map(|(_, ext)| ext).unwrap_or("");

        let format = match extension {
            "json" => InputFormat::Json,
            "jsonl" | "ndjson" => InputFormat::JsonLines,
            "tsv" | "tab" => InputFormat::TSV,
            _ => InputFormat::CSV,
        };

        (format, compression)
    }

    /// Parse decompressed bytes in this format.
    pub fn parse(&self, bytes: &[u8]) -> Result<Table> {
        let bytes = strip_bom(bytes);
        match self {
            InputFormat::Delimited { delimiter } => parse_delimited(bytes, *delimiter),
            InputFormat::Json => parse_json(bytes),
            InputFormat::JsonLines => parse_json_lines(bytes),
        }
    }
}

fn strip_bom(bytes: &[u8]) -> &[u8] {
    bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_plain_extensions() {
        assert_eq!(InputFormat::detect("sub.csv"), (InputFormat::CSV, Compression::None));
        assert_eq!(InputFormat::detect("SUB.JSON"), (InputFormat::Json, Compression::None));
        assert_eq!(InputFormat::detect("a.tsv"), (InputFormat::TSV, Compression::None));
        assert_eq!(
            InputFormat::detect("a.ndjson"),
            (InputFormat::JsonLines, Compression::None)
        );
    }

    #[test]
    fn test_detect_compressed_extensions() {
        assert_eq!(InputFormat::detect("gt.json.gz"), (InputFormat::Json, Compression::Gzip));
        assert_eq!(InputFormat::detect("gt.CSV.GZ"), (InputFormat::CSV, Compression::Gzip));
    }

    #[test]
    fn test_detect_unknown_defaults_to_csv() {
        assert_eq!(InputFormat::detect("answers"), (InputFormat::CSV, Compression::None));
        assert_eq!(InputFormat::detect("answers.xlsx"), (InputFormat::CSV, Compression::None));
        assert_eq!(InputFormat::detect("answers.gz"), (InputFormat::CSV, Compression::Gzip));
    }

    #[test]
    fn test_parse_strips_bom() {
        let table = InputFormat::CSV.parse(b"\xEF\xBB\xBFid,label\n1,a\n").unwrap();
        assert_eq!(table.column_names(), vec!["id", "label"]);
    }
}
