use lims_ingest::FieldMap;
use lims_model::{BatchLink, Client, StagingRecord};
use tracing::debug;

const BATCH_TITLE: &str = "title";
const BATCH_ID: &str = "id";

/// Link the record to the titled batch, or stage a new one.
///
/// The new batch keeps the remaining batch columns minus `id` and blank
/// keys. It is only created by the import executor.
pub fn stage_batch(record: &mut StagingRecord, mut values: FieldMap, client: &Client) {
    record.batch = None;
    let title = values
        .take_ignore_case(BATCH_TITLE)
        .map(|(_, title)| title.trim().to_string())
        .unwrap_or_default();
    if title.is_empty() {
        debug!("batch section has no title");
        return;
    }

    if let Some(existing) = client.batch_by_title(&title) {
        debug!(batch = %existing.uid, "linked existing batch");
        record.batch = Some(BatchLink::Existing {
            uid: existing.uid.clone(),
            title,
        });
        return;
    }

    values.take_ignore_case(BATCH_ID);
    values.remove_blank_keys();
    debug!(fields = values.len(), "staged new batch");
    record.batch = Some(BatchLink::New {
        title,
        fields: values.into_iter().collect(),
    });
}
