//! One command's view of the reference data and the record store.
//!
//! Every transition loads the record, runs the pass against a fresh
//! [`ImportContext`] and saves the result. Failed validations are saved too.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow, bail};
use lims_catalog::{InMemoryCatalog, ReferenceData, default_reference_path, load_reference_data};
use lims_core::{
    ImportContext, ImportExecutor, ImportOutcome, InMemoryStore, RecordRepository, SampleRequest,
    Stager, ensure_transition,
};
use lims_ingest::load_source_file;
use lims_model::{
    Batch, Client, ImportState, SchemaDescriptor, SourceFile, StagingRecord, Transition,
};
use serde::Serialize;
use tracing::{debug, info};

use crate::logging::redact_value;

pub const DEFAULT_STORE_DIR: &str = ".lims-import";

/// Everything one import created.
#[derive(Debug, Clone, Serialize)]
pub struct ImportReport {
    pub record_id: String,
    pub outcome: ImportOutcome,
    pub samples: Vec<CreatedSample>,
    /// Batches created by this import; linked existing batches are not listed.
    pub batches: Vec<Batch>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreatedSample {
    pub uid: String,
    pub request: SampleRequest,
}

pub struct ImportSession {
    reference: ReferenceData,
    schema: SchemaDescriptor,
    catalog: InMemoryCatalog,
    repository: RecordRepository,
}

impl ImportSession {
    pub fn new(reference: ReferenceData, repository: RecordRepository) -> Self {
        let schema = reference.schema_or_default();
        let catalog = reference.catalog();
        Self {
            reference,
            schema,
            catalog,
            repository,
        }
    }

    /// Load reference data and open the store. Without an explicit path the
    /// reference file comes from the environment or the working directory.
    pub fn open(reference_path: Option<&Path>, store_dir: &Path) -> Result<Self> {
        let path = reference_path.map_or_else(default_reference_path, Path::to_path_buf);
        let reference = load_reference_data(&path)
            .with_context(|| format!("load reference data from {}", path.display()))?;
        let repository = RecordRepository::new(store_dir)
            .with_context(|| format!("open record store {}", store_dir.display()))?;
        Ok(Self::new(reference, repository))
    }

    pub fn reference(&self) -> &ReferenceData {
        &self.reference
    }

    pub fn store_dir(&self) -> &Path {
        self.repository.base_dir()
    }

    pub fn load(&self, id: &str) -> Result<StagingRecord> {
        self.repository
            .load(id)
            .with_context(|| format!("load import {id}"))
    }

    pub fn records(&self) -> Result<Vec<StagingRecord>> {
        self.repository.list().context("list imports")
    }

    /// Attach a file from disk and stage it.
    pub fn stage_file(
        &self,
        path: &Path,
        client_key: &str,
        id: Option<&str>,
    ) -> Result<StagingRecord> {
        let source = load_source_file(path, self.reference.options.max_file_size)
            .with_context(|| format!("read order file {}", path.display()))?;
        self.stage_source(source, client_key, id)
    }

    /// Stage `source` into a new record, or into record `id` when it exists.
    pub fn stage_source(
        &self,
        source: SourceFile,
        client_key: &str,
        id: Option<&str>,
    ) -> Result<StagingRecord> {
        let client = self.client(client_key)?;
        let mut record = match id {
            Some(id) if self.repository.exists(id) => {
                let record = self.load(id)?;
                if record.client_uid != client.uid {
                    bail!(
                        "import {id} belongs to client {}, not {}",
                        record.client_uid,
                        client.uid
                    );
                }
                ensure_transition(&record, Transition::Edit)?;
                record
            }
            Some(id) => StagingRecord::new(id, &client.uid),
            None => {
                let id = self.repository.next_id().context("allocate import id")?;
                StagingRecord::new(id, &client.uid)
            }
        };
        debug!(
            record = %record.id,
            file = redact_value(&source.filename),
            sha256 = %source.sha256,
            "attaching order file"
        );
        record.attach_file(source);

        let ctx = self.context(client)?;
        Stager::new(&ctx)
            .stage(&mut record)
            .with_context(|| format!("stage import {}", record.id))?;
        debug!(
            record = %record.id,
            order = redact_value(&record.client_order_number),
            reference = redact_value(&record.client_reference),
            "staged header"
        );
        self.save(&record)?;
        Ok(record)
    }

    /// Validate and save, whatever the outcome.
    pub fn validate(&self, id: &str) -> Result<StagingRecord> {
        let mut record = self.load(id)?;
        let others = self
            .repository
            .list_by_states(&[ImportState::Valid, ImportState::Imported])
            .context("list committed imports")?;
        let client = self.record_client(&record)?;
        let ctx = self.context(client)?;
        lims_validate::validate(&mut record, &ctx, &others)
            .with_context(|| format!("validate import {id}"))?;
        self.save(&record)?;
        Ok(record)
    }

    pub fn edit(&self, id: &str) -> Result<StagingRecord> {
        let mut record = self.load(id)?;
        lims_core::edit(&mut record).with_context(|| format!("edit import {id}"))?;
        self.save(&record)?;
        Ok(record)
    }

    /// Import a valid record. Samples and batches go to in-memory stores
    /// seeded with the client's existing batches; the report lists them.
    pub fn import(&self, id: &str) -> Result<ImportReport> {
        let mut record = self.load(id)?;
        let client = self.record_client(&record)?;
        let ctx = self.context(client)?;

        let mut samples = InMemoryStore::new();
        let mut batches = InMemoryStore::with_batches(&client.uid, client.batches.clone());
        let existing = batches.batches.len();
        let outcome = ImportExecutor::new(&ctx)
            .execute(&mut record, &mut samples, &mut batches)
            .with_context(|| format!("import {id}"))?;
        self.save(&record)?;
        info!(record = %record.id, samples = outcome.created.len(), "import saved");

        Ok(ImportReport {
            record_id: record.id,
            outcome,
            samples: samples
                .samples
                .into_iter()
                .map(|(uid, request)| CreatedSample { uid, request })
                .collect(),
            batches: batches
                .batches
                .into_iter()
                .skip(existing)
                .map(|(_, batch)| batch)
                .collect(),
        })
    }

    fn save(&self, record: &StagingRecord) -> Result<PathBuf> {
        self.repository
            .save(record)
            .with_context(|| format!("save import {}", record.id))
    }

    fn client(&self, key: &str) -> Result<&Client> {
        self.reference
            .client(key)
            .ok_or_else(|| anyhow!("unknown client: {key}"))
    }

    fn record_client(&self, record: &StagingRecord) -> Result<&Client> {
        self.reference.client(&record.client_uid).ok_or_else(|| {
            anyhow!(
                "client {} of import {} is not in the reference data",
                record.client_uid,
                record.id
            )
        })
    }

    fn context<'a>(&'a self, client: &'a Client) -> Result<ImportContext<'a>> {
        ImportContext::new(
            client,
            &self.schema,
            &self.catalog,
            &self.reference.options,
        )
        .context("load reference snapshot")
    }
}
