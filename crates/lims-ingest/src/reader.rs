//! Source file loading and CSV row reading.

use std::fs;
use std::path::Path;

use csv::ReaderBuilder;
use sha2::Digest;

use lims_model::SourceFile;

use crate::error::{IngestError, Result};

const UTF8_BOM: char = '\u{feff}';

pub fn sha256_hex(bytes: &[u8]) -> String {
    let digest = sha2::Sha256::digest(bytes);
    hex::encode(digest)
}

/// Build a [`SourceFile`] from in-memory content.
pub fn source_from_str(filename: impl Into<String>, content: &str) -> SourceFile {
    let content = content.trim_start_matches(UTF8_BOM).to_string();
    SourceFile {
        filename: filename.into(),
        sha256: sha256_hex(content.as_bytes()),
        content,
    }
}

/// Load an order file from disk.
///
/// Rejects files above `max_size` bytes and UTF-16 encoded files; a UTF-8
/// BOM is stripped.
pub fn load_source_file(path: &Path, max_size: u64) -> Result<SourceFile> {
    let metadata = fs::metadata(path).map_err(|e| not_found_or_read(path, e))?;
    if metadata.len() > max_size {
        return Err(IngestError::FileTooLarge {
            path: path.to_path_buf(),
            size: metadata.len(),
            max_size,
        });
    }

    let bytes = fs::read(path).map_err(|e| not_found_or_read(path, e))?;
    if bytes.starts_with(&[0xFF, 0xFE]) {
        return Err(IngestError::UnsupportedEncoding {
            path: path.to_path_buf(),
            encoding: "UTF-16 LE",
        });
    }
    if bytes.starts_with(&[0xFE, 0xFF]) {
        return Err(IngestError::UnsupportedEncoding {
            path: path.to_path_buf(),
            encoding: "UTF-16 BE",
        });
    }
    let content = String::from_utf8(bytes).map_err(|_| IngestError::UnsupportedEncoding {
        path: path.to_path_buf(),
        encoding: "non UTF-8",
    })?;

    let filename = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("unknown")
        .to_string();
    tracing::debug!(
        path = %path.display(),
        bytes = metadata.len(),
        "loaded source file"
    );
    Ok(source_from_str(filename, &content))
}

fn not_found_or_read(path: &Path, e: std::io::Error) -> IngestError {
    if e.kind() == std::io::ErrorKind::NotFound {
        IngestError::FileNotFound {
            path: path.to_path_buf(),
        }
    } else {
        IngestError::FileRead {
            path: path.to_path_buf(),
            source: e,
        }
    }
}

/// Read delimited rows with trimmed cells, dropping rows where every cell is blank.
pub fn read_rows(content: &str) -> Result<Vec<Vec<String>>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(content.as_bytes());

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let row: Vec<String> = record.iter().map(|cell| cell.trim().to_string()).collect();
        if row.iter().all(String::is_empty) {
            continue;
        }
        rows.push(row);
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_rows_quoted_cells() {
        let rows = read_rows("Header,\"Acme, Inc\",x\n").unwrap();
        assert_eq!(rows, vec![vec!["Header", "Acme, Inc", "x"]]);
    }

    #[test]
    fn test_read_rows_skips_blank_rows() {
        let rows = read_rows("a,b\n,,\n\n  ,\nc,d\n").unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1], vec!["c", "d"]);
    }

    #[test]
    fn test_read_rows_ragged() {
        let rows = read_rows("a,b,c\nd\n").unwrap();
        assert_eq!(rows[0].len(), 3);
        assert_eq!(rows[1], vec!["d"]);
    }

    #[test]
    fn test_source_from_str_strips_bom() {
        let source = source_from_str("order.csv", "\u{feff}Header,x");
        assert_eq!(source.content, "Header,x");
        assert_eq!(source.sha256, sha256_hex(b"Header,x"));
        assert_eq!(source.sha256.len(), 64);
    }
}
