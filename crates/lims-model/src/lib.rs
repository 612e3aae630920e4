//! Data model for staged sample imports.
//!
//! A [`StagingRecord`] is the editable intermediate form of one batch order
//! file. It is filled by the staging passes, checked by the validator and
//! finally consumed by the import executor. Reference entities (clients,
//! contacts, catalog records) are weak references into pools owned by the
//! surrounding system.

pub mod error;
pub mod issue;
pub mod options;
pub mod record;
pub mod reference;
pub mod schema;
pub mod state;
pub mod value;

pub use error::InvalidValue;
pub use issue::{ImportIssue, IssueKind};
pub use options::{DateOrder, ImportOptions};
pub use record::{BatchLink, CcContacts, SampleRow, SourceFile, StagingRecord};
pub use reference::{Batch, CatalogRecord, Client, Contact, EntityKind};
pub use schema::{FieldKind, FieldSpec, SchemaDescriptor};
pub use state::{ImportState, Transition};
pub use value::FieldValue;
