//! Staging and import of batch sample order files.
//!
//! The flow for one [`StagingRecord`](lims_model::StagingRecord):
//!
//! 1. [`Stager`] parses the attached file and fills the record
//! 2. validation (in `lims-validate`) re-checks it against live reference data
//! 3. [`ImportExecutor`] creates the samples and, when needed, the batch
//!
//! All passes read reference data through an [`ImportContext`] built once
//! per pass.

pub mod coerce;
pub mod context;
pub mod datetime;
pub mod error;
pub mod import;
pub mod repository;
pub mod staging;
pub mod workflow;

pub use coerce::{FieldCoercer, is_truthy};
pub use context::{ClientCatalog, ImportContext};
pub use datetime::DateFormatter;
pub use error::{CreationError, ImportError, Result};
pub use import::{
    BatchStore, INHERITED_FIELDS, ImportExecutor, ImportOutcome, InMemoryStore, SampleCreator,
    SampleRequest,
};
pub use repository::RecordRepository;
pub use staging::Stager;
pub use workflow::{edit, ensure_file_attached, ensure_transition};
