//! Validation of staged imports.
//!
//! [`validate`] is the `validate` transition: it clears the record's
//! errors, runs [`validate_headers`] and [`validate_samples`] and moves the
//! record to `valid` or `invalid`. Both passes only append errors, so the
//! transition can be re-run as often as needed.

mod header;
mod samples;

pub use header::{is_valid_email, validate_headers};
pub use samples::validate_samples;

use lims_core::{ImportContext, Result, ensure_file_attached, ensure_transition};
use lims_model::{ImportState, StagingRecord, Transition};
use tracing::{info, info_span};

/// Run the validate transition.
///
/// `others` are the other stored records; only committed ones count for
/// duplicate detection. The caller persists the record either way.
pub fn validate(
    record: &mut StagingRecord,
    ctx: &ImportContext<'_>,
    others: &[StagingRecord],
) -> Result<ImportState> {
    let span = info_span!("validate", record = %record.id);
    let _guard = span.enter();

    ensure_transition(record, Transition::Validate)?;
    ensure_file_attached(record)?;

    record.reset_errors();
    validate_headers(record, ctx.client, others);
    validate_samples(record, ctx);

    record.state = if record.has_errors() {
        ImportState::Invalid
    } else {
        ImportState::Valid
    };
    info!(state = %record.state, errors = record.errors.len(), "validation complete");
    Ok(record.state)
}
