//! Labeled sections of a batch order file.
//!
//! Column 0 of a row may carry a section marker (matched trimmed and
//! case-insensitively). `header` and `batch header` rows name the keys of
//! the `header data` / `batch data` row that follows. `samples` names the
//! sample table columns; after the `total analyses or profiles` row every
//! remaining row is a sample.

use crate::error::{IngestError, Result};
use crate::fields::FieldMap;
use crate::reader::read_rows;

/// Key under which each sample row's label (column 0) is stored.
pub const SAMPLE_LABEL_COLUMN: &str = "Samples";

/// Column holding the declared number of analyses or profiles per row.
pub const DECLARED_COUNT_COLUMN: &str = "Total number of Analyses or Profiles";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionMarker {
    Header,
    HeaderData,
    BatchHeader,
    BatchData,
    Samples,
    TotalAnalyses,
}

impl SectionMarker {
    pub const ALL: [SectionMarker; 6] = [
        Self::Header,
        Self::HeaderData,
        Self::BatchHeader,
        Self::BatchData,
        Self::Samples,
        Self::TotalAnalyses,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Header => "header",
            Self::HeaderData => "header data",
            Self::BatchHeader => "batch header",
            Self::BatchData => "batch data",
            Self::Samples => "samples",
            Self::TotalAnalyses => "total analyses or profiles",
        }
    }

    pub fn from_cell(cell: &str) -> Option<Self> {
        let normalized = cell.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|marker| marker.label() == normalized)
    }
}

/// The sample table: column names, the totals declaration and data rows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SampleTable {
    /// Column names; column 0 is always [`SAMPLE_LABEL_COLUMN`].
    pub headers: Vec<String>,
    /// The `total analyses or profiles` row, zipped against `headers`.
    pub totals: Option<FieldMap>,
    pub rows: Vec<FieldMap>,
}

/// A parsed order file, kept as its non-blank rows.
#[derive(Debug, Clone, Default)]
pub struct SectionFile {
    rows: Vec<Vec<String>>,
}

impl SectionFile {
    pub fn parse(content: &str) -> Result<Self> {
        Ok(Self::from_rows(read_rows(content)?))
    }

    pub fn from_rows(rows: Vec<Vec<String>>) -> Self {
        let rows = rows
            .into_iter()
            .filter(|row| row.iter().any(|cell| !cell.trim().is_empty()))
            .collect();
        Self { rows }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// True when at least one row carries a section marker.
    pub fn has_sections(&self) -> bool {
        self.rows.iter().any(|row| marker_of(row).is_some())
    }

    /// `header` / `header data` values. Blank key cells are dropped.
    ///
    /// `Ok(None)` means the file has no header section at all.
    pub fn header_values(&self) -> Result<Option<FieldMap>> {
        let values = self.key_value_section(SectionMarker::Header, SectionMarker::HeaderData)?;
        Ok(values.map(|mut values| {
            values.remove_blank_keys();
            values
        }))
    }

    /// `batch header` / `batch data` values, blank keys included.
    pub fn batch_header_values(&self) -> Result<Option<FieldMap>> {
        self.key_value_section(SectionMarker::BatchHeader, SectionMarker::BatchData)
    }

    /// The sample table, or `Ok(None)` when there is no `samples` row.
    pub fn sample_values(&self) -> Result<Option<SampleTable>> {
        let mut headers: Option<Vec<String>> = None;
        let mut table = SampleTable::default();
        let mut in_samples = false;

        for row in &self.rows {
            if in_samples {
                if let Some(headers) = &headers {
                    table.rows.push(FieldMap::zip(headers, row));
                }
                continue;
            }
            match marker_of(row) {
                Some(SectionMarker::Samples) => {
                    let mut names = row.clone();
                    names[0] = SAMPLE_LABEL_COLUMN.to_string();
                    headers = Some(names);
                }
                Some(SectionMarker::TotalAnalyses) => {
                    let Some(names) = &headers else {
                        return Err(IngestError::IncompleteSection {
                            names: SectionMarker::Samples.label(),
                            data: SectionMarker::TotalAnalyses.label(),
                        });
                    };
                    table.totals = Some(FieldMap::zip(names, row));
                    in_samples = true;
                }
                _ => {}
            }
        }

        Ok(headers.map(|headers| SampleTable { headers, ..table }))
    }

    fn key_value_section(
        &self,
        names_marker: SectionMarker,
        data_marker: SectionMarker,
    ) -> Result<Option<FieldMap>> {
        let mut names: Vec<String> = Vec::new();
        let mut data: Vec<String> = Vec::new();
        for row in &self.rows {
            match marker_of(row) {
                Some(marker) if marker == names_marker => {
                    names = row[1..].to_vec();
                }
                Some(marker) if marker == data_marker => {
                    data = row[1..].to_vec();
                    break;
                }
                _ => {}
            }
        }

        if names.is_empty() && data.is_empty() {
            return Ok(None);
        }
        if names.is_empty() || data.is_empty() {
            return Err(IngestError::IncompleteSection {
                names: names_marker.label(),
                data: data_marker.label(),
            });
        }
        Ok(Some(FieldMap::zip(&names, &data)))
    }
}

fn marker_of(row: &[String]) -> Option<SectionMarker> {
    row.first().and_then(|cell| SectionMarker::from_cell(cell))
}
