//! Turning a valid staging record into samples.
//!
//! Every row is resolved before anything is created, so a reference that
//! disappeared after validation aborts the import with nothing written.
//! Once creation starts, the first collaborator failure aborts the rest.

use std::collections::{BTreeMap, BTreeSet};

use lims_model::{
    Batch, BatchLink, FieldValue, ImportState, SampleRow, StagingRecord, Transition,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, info_span};

use crate::context::ImportContext;
use crate::error::{CreationError, ImportError, Result};
use crate::workflow::ensure_transition;

const FIELD_CLIENT_REFERENCE: &str = "ClientReference";
const FIELD_CLIENT_ORDER_NUMBER: &str = "ClientOrderNumber";
const FIELD_CONTACT: &str = "Contact";

/// Row fields that fall back to the header value when the row leaves them out.
pub const INHERITED_FIELDS: &[&str] = &[
    FIELD_CLIENT_REFERENCE,
    FIELD_CLIENT_ORDER_NUMBER,
    FIELD_CONTACT,
];

/// One finalized sample to create.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SampleRequest {
    pub client_uid: String,
    pub source_label: String,
    pub contact: Option<String>,
    pub client_order_number: String,
    pub client_reference: String,
    pub batch: Option<String>,
    pub sample_matrix: Option<String>,
    pub container_type: Option<String>,
    /// Schema fields other than the inherited ones above.
    pub fields: BTreeMap<String, FieldValue>,
    /// Profile UIDs.
    pub profiles: Vec<String>,
    /// Service UIDs: direct analyses plus profile members, deduplicated.
    pub analyses: Vec<String>,
}

pub trait SampleCreator {
    /// Create one sample and return its UID.
    fn create_sample(
        &mut self,
        request: &SampleRequest,
    ) -> std::result::Result<String, CreationError>;
}

pub trait BatchStore {
    fn find_batch(&self, client_uid: &str, title: &str) -> Option<Batch>;

    fn create_batch(
        &mut self,
        client_uid: &str,
        title: &str,
        fields: &BTreeMap<String, String>,
    ) -> std::result::Result<Batch, CreationError>;

    /// Find-or-create. Stores shared between importers should override
    /// this with a single atomic operation.
    fn get_or_create_batch(
        &mut self,
        client_uid: &str,
        title: &str,
        fields: &BTreeMap<String, String>,
    ) -> std::result::Result<Batch, CreationError> {
        match self.find_batch(client_uid, title) {
            Some(batch) => Ok(batch),
            None => self.create_batch(client_uid, title, fields),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportOutcome {
    /// UIDs of the created samples, in row order.
    pub created: Vec<String>,
    pub batch_uid: Option<String>,
    /// Client listing to show after the import.
    pub redirect: String,
}

pub struct ImportExecutor<'a> {
    ctx: &'a ImportContext<'a>,
}

impl<'a> ImportExecutor<'a> {
    pub fn new(ctx: &'a ImportContext<'a>) -> Self {
        Self { ctx }
    }

    /// Create every staged sample. Only a `valid` record can be imported;
    /// on success it becomes `imported`.
    pub fn execute(
        &self,
        record: &mut StagingRecord,
        creator: &mut dyn SampleCreator,
        batches: &mut dyn BatchStore,
    ) -> Result<ImportOutcome> {
        let span = info_span!("import", record = %record.id);
        let _guard = span.enter();

        ensure_transition(record, Transition::Import)?;
        let mut requests = self.prepare(record)?;

        let batch_uid = match &record.batch {
            Some(BatchLink::Existing { uid, .. }) => Some(uid.clone()),
            Some(BatchLink::New { title, fields }) => {
                let batch = batches
                    .get_or_create_batch(&record.client_uid, title, fields)
                    .map_err(|source| ImportError::BatchCreation {
                        title: title.clone(),
                        source,
                    })?;
                info!(batch = %batch.uid, "batch ready");
                Some(batch.uid)
            }
            None => None,
        };

        let mut created = Vec::with_capacity(requests.len());
        for request in &mut requests {
            request.batch.clone_from(&batch_uid);
            let uid = creator
                .create_sample(request)
                .map_err(|source| ImportError::Creation {
                    row: request.source_label.clone(),
                    source,
                })?;
            debug!(sample = %uid, analyses = request.analyses.len(), "sample created");
            created.push(uid);
        }

        record.state = ImportState::Imported;
        info!(samples = created.len(), "import complete");
        Ok(ImportOutcome {
            created,
            batch_uid,
            redirect: self.ctx.options.listing_path(&record.client_uid),
        })
    }

    /// Resolve every row into a request without side effects.
    pub fn prepare(&self, record: &StagingRecord) -> Result<Vec<SampleRequest>> {
        record
            .samples
            .iter()
            .enumerate()
            .map(|(index, row)| self.prepare_row(record, row, index + 1))
            .collect()
    }

    fn prepare_row(
        &self,
        record: &StagingRecord,
        row: &SampleRow,
        position: usize,
    ) -> Result<SampleRequest> {
        let label = row.display_label(position);
        let snapshot = self.ctx.snapshot();

        let mut seen = BTreeSet::new();
        let mut analyses = Vec::new();
        for keyword in &row.analyses {
            let service = snapshot
                .service(keyword)
                .ok_or_else(|| ImportError::Unresolved {
                    row: label.clone(),
                    message: format!("Invalid analysis specified: {keyword}"),
                })?;
            if seen.insert(service.uid.clone()) {
                analyses.push(service.uid.clone());
            }
        }

        let mut profiles = Vec::new();
        for name in &row.profiles {
            let profile = snapshot
                .profile(name)
                .ok_or_else(|| ImportError::Unresolved {
                    row: label.clone(),
                    message: format!("Invalid profile specified: {name}"),
                })?;
            profiles.push(profile.uid.clone());
            for service in &profile.services {
                if seen.insert(service.clone()) {
                    analyses.push(service.clone());
                }
            }
        }

        let mut fields = row.fields.clone();
        let client_reference = take_text(&mut fields, FIELD_CLIENT_REFERENCE)
            .unwrap_or_else(|| record.client_reference.clone());
        let client_order_number = take_text(&mut fields, FIELD_CLIENT_ORDER_NUMBER)
            .unwrap_or_else(|| record.client_order_number.clone());
        let contact = fields
            .remove(FIELD_CONTACT)
            .and_then(|value| value.references().first().map(|uid| uid.to_string()))
            .or_else(|| record.contact.clone());

        Ok(SampleRequest {
            client_uid: record.client_uid.clone(),
            source_label: label,
            contact,
            client_order_number,
            client_reference,
            batch: None,
            sample_matrix: row.sample_matrix.clone(),
            container_type: row.container_type.clone(),
            fields,
            profiles,
            analyses,
        })
    }
}

/// Remove a text field, keeping it only when it has a value.
fn take_text(fields: &mut BTreeMap<String, FieldValue>, name: &str) -> Option<String> {
    fields
        .remove(name)
        .map(|value| value.as_text().trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Creator and batch store that keep everything in memory.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InMemoryStore {
    pub samples: Vec<(String, SampleRequest)>,
    pub batches: Vec<(String, Batch)>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed with batches that already exist for a client.
    pub fn with_batches(client_uid: &str, batches: impl IntoIterator<Item = Batch>) -> Self {
        Self {
            samples: Vec::new(),
            batches: batches
                .into_iter()
                .map(|batch| (client_uid.to_string(), batch))
                .collect(),
        }
    }
}

impl SampleCreator for InMemoryStore {
    fn create_sample(
        &mut self,
        request: &SampleRequest,
    ) -> std::result::Result<String, CreationError> {
        let uid = format!("sample-{}", self.samples.len() + 1);
        self.samples.push((uid.clone(), request.clone()));
        Ok(uid)
    }
}

impl BatchStore for InMemoryStore {
    fn find_batch(&self, client_uid: &str, title: &str) -> Option<Batch> {
        self.batches
            .iter()
            .find(|(owner, batch)| owner == client_uid && batch.title == title)
            .map(|(_, batch)| batch.clone())
    }

    fn create_batch(
        &mut self,
        client_uid: &str,
        title: &str,
        fields: &BTreeMap<String, String>,
    ) -> std::result::Result<Batch, CreationError> {
        let batch = Batch {
            uid: format!("batch-{}", self.batches.len() + 1),
            title: title.to_string(),
            fields: fields.clone(),
        };
        self.batches.push((client_uid.to_string(), batch.clone()));
        Ok(batch)
    }
}
