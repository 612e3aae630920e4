//! Error types for order file ingestion.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while reading an order file.
#[derive(Debug, Error)]
pub enum IngestError {
    // === File System Errors ===
    /// Source file not found.
    #[error("file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Failed to read file.
    #[error("failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File exceeds the configured size limit.
    #[error("file {path} is too large ({size} bytes, limit {max_size})")]
    FileTooLarge {
        path: PathBuf,
        size: u64,
        max_size: u64,
    },

    /// UTF-16 and other non UTF-8 encodings.
    #[error("unsupported encoding {encoding} in {path}")]
    UnsupportedEncoding {
        path: PathBuf,
        encoding: &'static str,
    },

    // === CSV Parsing Errors ===
    /// The row reader rejected the content.
    #[error("failed to parse CSV at line {line}: {message}")]
    CsvParse { line: u64, message: String },

    // === Section Errors ===
    /// A names row without its data row, or the reverse.
    #[error("file is missing the {names} row or the {data} row")]
    IncompleteSection {
        names: &'static str,
        data: &'static str,
    },
}

impl From<csv::Error> for IngestError {
    fn from(err: csv::Error) -> Self {
        let line = err.position().map_or(0, csv::Position::line);
        Self::CsvParse {
            line,
            message: err.to_string(),
        }
    }
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;
