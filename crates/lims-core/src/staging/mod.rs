//! Staging passes: order file to [`StagingRecord`].
//!
//! Each pass replaces what the previous run staged; nothing is merged.
//!
//! 1. **header** - scalar fields, contact and CC block
//! 2. **batch** - link to an existing batch or a batch to create on import
//! 3. **samples** - one [`SampleRow`](lims_model::SampleRow) per data row

mod batch;
mod header;
mod samples;

use lims_ingest::{IngestError, SectionFile};
use lims_model::{ImportState, IssueKind, StagingRecord, Transition};
use tracing::{info, info_span, warn};

use crate::context::ImportContext;
use crate::error::{ImportError, Result};
use crate::workflow::ensure_transition;

pub use batch::stage_batch;
pub use header::{HEADER_CONTACT, HEADER_NR_SAMPLES, stage_header};
pub use samples::stage_samples;

/// Runs the three staging passes over a record's attached file.
pub struct Stager<'a> {
    ctx: &'a ImportContext<'a>,
}

impl<'a> Stager<'a> {
    pub fn new(ctx: &'a ImportContext<'a>) -> Self {
        Self { ctx }
    }

    /// Stage the attached file. Problems with the file's content end up in
    /// `record.errors`; only a missing file or a finished import is an `Err`.
    pub fn stage(&self, record: &mut StagingRecord) -> Result<()> {
        let span = info_span!("stage", record = %record.id);
        let _guard = span.enter();

        ensure_transition(record, Transition::Edit)?;
        let content = match &record.source {
            Some(source) if !source.is_empty() => source.content.clone(),
            _ => {
                return Err(ImportError::NoFileAttached {
                    id: record.id.clone(),
                });
            }
        };

        record.reset_errors();
        record.clear_header_fields();
        record.batch = None;
        record.samples.clear();

        let file = match SectionFile::parse(&content) {
            Ok(file) if file.has_sections() => file,
            Ok(_) => {
                record.error(
                    IssueKind::ParseError,
                    "File contains no recognizable sections",
                );
                warn!("no section markers found");
                return Ok(());
            }
            Err(err) => {
                record.error(IssueKind::ParseError, format!("File could not be read: {err}"));
                warn!(error = %err, "order file is not valid CSV");
                return Ok(());
            }
        };

        match file.header_values() {
            Ok(header) => stage_header(record, header, self.ctx.client),
            Err(err) => record_section_error(record, &err),
        }
        match file.batch_header_values() {
            Ok(Some(values)) => stage_batch(record, values, self.ctx.client),
            Ok(None) => {}
            Err(err) => record_section_error(record, &err),
        }
        match file.sample_values() {
            Ok(table) => stage_samples(record, table, self.ctx),
            Err(err) => record_section_error(record, &err),
        }

        record.state = ImportState::Draft;
        info!(
            samples = record.samples.len(),
            errors = record.errors.len(),
            "staging complete"
        );
        Ok(())
    }
}

fn record_section_error(record: &mut StagingRecord, err: &IngestError) {
    warn!(error = %err, "incomplete section");
    record.error(IssueKind::ParseError, capitalize(&err.to_string()));
}

fn capitalize(message: &str) -> String {
    let mut chars = message.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
