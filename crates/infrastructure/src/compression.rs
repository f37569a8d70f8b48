//! Transparent decompression of inputs.

use flate2::read::MultiGzDecoder;
use std::io::Read;

use crate::{Error, Result};

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Compression wrapping an input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compression {
    None,
    Gzip,
}

impl Compression {
    /// Split a trailing compression suffix off a lower-cased file name.
    ///
    /// Returns the remaining name and the compression it implies.
    pub fn strip_suffix(file_name: &str) -> (&str, Self) {
        for suffix in [".gz", ".gzip"] {
            if let Some(stem) = file_name.strip_suffix(suffix) {
                return (stem, Compression::Gzip);
            }
        }
        (file_name, Compression::None)
    }

    /// Sniff the compression from the leading bytes.
    pub fn sniff(bytes: &[u8]) -> Self {
        if bytes.starts_with(&GZIP_MAGIC) {
            Compression::Gzip
        } else {
            Compression::None
        }
    }
}

/// Decompress `bytes` if either the declared compression or the content says so.
///
/// Decoded output larger than `limit` bytes is rejected as [`Error::TooLarge`],
/// reported against `name`.
pub fn decompress(name: &str, bytes: Vec<u8>, declared: Compression, limit: u64) -> Result<Vec<u8>> {
    let effective = match declared {
        Compression::Gzip => Compression::Gzip,
        Compression::None => Compression::sniff(&bytes),
    };

    match effective {
        Compression::None => Ok(bytes),
        Compression::Gzip => {
            let mut out = Vec::new();
            MultiGzDecoder::new(bytes.as_slice())
                .take(limit.saturating_add(1))
                .read_to_end(&mut out)
                .map_err(|e| Error::Decompression(e.to_string()))?;

            if out.len() as u64 > limit {
                return Err(Error::TooLarge {
                    location: name.to_string(),
                    limit,
                });
            }
            Ok(out)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::{write::GzEncoder, Compression as Level};
    use std::io::Write;

    fn gzip(data: &[u8]) -> Vec<u8> {
        let mut encoder = GzEncoder::new(Vec::new(), Level::default());
        encoder.write_all(data).unwrap();
        encoder.finish().unwrap()
    }

    #[test]
    fn test_strip_suffix() {
        assert_eq!(Compression::strip_suffix("a.csv.gz"), ("a.csv", Compression::Gzip));
        assert_eq!(Compression::strip_suffix("a.json.gzip"), ("a.json", Compression::Gzip));
        assert_eq!(Compression::strip_suffix("a.csv"), ("a.csv", Compression::None));
    }

    const LIMIT: u64 = 1024;

    #[test]
    fn test_decompress_declared_gzip() {
        let out = decompress("a.csv.gz", gzip(b"id,label\n1,a\n"), Compression::Gzip, LIMIT).unwrap();
        assert_eq!(out, b"id,label\n1,a\n");
    }

    #[test]
    fn test_decompress_sniffs_undeclared_gzip() {
        let out = decompress("a.csv", gzip(b"hello"), Compression::None, LIMIT).unwrap();
        assert_eq!(out, b"hello");
    }

    #[test]
    fn test_plain_bytes_pass_through() {
        let out = decompress("a.csv", b"plain".to_vec(), Compression::None, LIMIT).unwrap();
        assert_eq!(out, b"plain");
    }

    #[test]
    fn test_corrupt_gzip_is_an_error() {
        let result = decompress("a.csv.gz", b"not gzip at all".to_vec(), Compression::Gzip, LIMIT);
        assert!(matches!(result, Err(Error::Decompression(_))));
    }

    #[test]
    fn test_oversized_output_is_rejected() {
        // A few hundred bytes of gzip expanding well past the limit
        let bomb = gzip(&vec![b'0'; 64 * 1024]);
        assert!((bomb.len() as u64) < LIMIT);

        let result = decompress("bomb.csv.gz", bomb, Compression::Gzip, LIMIT);
        match result {
            Err(Error::TooLarge { location, limit }) => {
                assert_eq!(location, "bomb.csv.gz");
                assert_eq!(limit, LIMIT);
            }
            other => panic!("expected TooLarge, got {:?}", other),
        }
    }

    #[test]
    fn test_output_at_the_limit_is_accepted() {
        let data = vec![b'x'; LIMIT as usize];
        let out = decompress("a.csv.gz", gzip(&data), Compression::Gzip, LIMIT).unwrap();
        assert_eq!(out.len() as u64, LIMIT);
    }
}
