//! Guards for the staging record state machine.

use lims_model::{ImportState, StagingRecord, Transition};
use tracing::debug;

use crate::error::{ImportError, Result};

pub fn ensure_transition(record: &StagingRecord, transition: Transition) -> Result<()> {
    if record.state.can_transition(transition) {
        Ok(())
    } else {
        Err(ImportError::InvalidTransition {
            id: record.id.clone(),
            action: transition,
            state: record.state,
        })
    }
}

/// Validation needs a non-empty attached file.
pub fn ensure_file_attached(record: &StagingRecord) -> Result<()> {
    if record.has_file() {
        Ok(())
    } else {
        Err(ImportError::NoFileAttached {
            id: record.id.clone(),
        })
    }
}

/// Return a valid or invalid record to draft for correction.
pub fn edit(record: &mut StagingRecord) -> Result<()> {
    ensure_transition(record, Transition::Edit)?;
    debug!(record = %record.id, from = %record.state, "record returned to draft");
    record.state = ImportState::Draft;
    Ok(())
}

#[cfg(test)]
mod tests {
    use lims_ingest::source_from_str;

    use super::*;

    #[test]
    fn test_edit_from_valid_and_invalid() {
        for state in [ImportState::Valid, ImportState::Invalid, ImportState::Draft] {
            let mut record = StagingRecord::new("imp-1", "client-1");
            record.state = state;
            edit(&mut record).unwrap();
            assert_eq!(record.state, ImportState::Draft);
        }
    }

    #[test]
    fn test_imported_is_terminal() {
        let mut record = StagingRecord::new("imp-1", "client-1");
        record.state = ImportState::Imported;
        let err = edit(&mut record).unwrap_err();
        assert_eq!(
            err.to_string(),
            "cannot edit import imp-1 while it is imported"
        );
        assert!(ensure_transition(&record, Transition::Validate).is_err());
        assert!(ensure_transition(&record, Transition::Import).is_err());
    }

    #[test]
    fn test_file_guard() {
        let mut record = StagingRecord::new("imp-1", "client-1");
        assert!(matches!(
            ensure_file_attached(&record),
            Err(ImportError::NoFileAttached { .. })
        ));
        record.attach_file(source_from_str("order.csv", ""));
        assert!(ensure_file_attached(&record).is_err());
        record.attach_file(source_from_str("order.csv", "header,Client name\n"));
        assert!(ensure_file_attached(&record).is_ok());
    }
}
