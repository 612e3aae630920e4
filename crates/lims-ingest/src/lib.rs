//! Order file ingestion.
//!
//! This crate turns an uploaded batch order file into structured sections:
//!
//! - **File loading**: size and encoding guards, BOM stripping, SHA-256
//!   fingerprint ([`load_source_file`], [`source_from_str`])
//! - **Row reading**: quote-aware CSV rows with trimmed cells ([`read_rows`])
//! - **Section parsing**: `header`/`header data`, `batch header`/`batch data`
//!   and the `samples` table ([`SectionFile`])
//!
//! # Example
//!
//! ```ignore
//! use lims_ingest::{SectionFile, load_source_file};
//!
//! let source = load_source_file(Path::new("order.csv"), 10 * 1024 * 1024)?;
//! let file = SectionFile::parse(&source.content)?;
//! let header = file.header_values()?;
//! let samples = file.sample_values()?;
//! ```

mod error;
mod fields;
mod reader;
mod sections;

// === Error Types ===
pub use error::{IngestError, Result};

// === Field Maps ===
pub use fields::FieldMap;

// === File Loading ===
pub use reader::{load_source_file, read_rows, sha256_hex, source_from_str};

// === Sections ===
pub use sections::{
    DECLARED_COUNT_COLUMN, SAMPLE_LABEL_COLUMN, SampleTable, SectionFile, SectionMarker,
};
