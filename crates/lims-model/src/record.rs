//! The staging record and its rows.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::issue::{ImportIssue, IssueKind};
use crate::state::ImportState;
use crate::value::FieldValue;

/// The uploaded order file, kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceFile {
    pub filename: String,
    pub content: String,
    /// Hex SHA-256 of `content`.
    pub sha256: String,
}

impl SourceFile {
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

/// Report and invoice CC recipients copied from the header section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CcContacts {
    pub names_report: Vec<String>,
    pub emails_report: Vec<String>,
    pub names_invoice: Vec<String>,
    pub emails_invoice: Vec<String>,
}

impl CcContacts {
    pub fn is_empty(&self) -> bool {
        self.names_report.is_empty()
            && self.emails_report.is_empty()
            && self.names_invoice.is_empty()
            && self.emails_invoice.is_empty()
    }

    /// `(column, name)` pairs for both name lists.
    pub fn names(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.names_report
            .iter()
            .map(|name| ("CCNamesReport", name.as_str()))
            .chain(
                self.names_invoice
                    .iter()
                    .map(|name| ("CCNamesInvoice", name.as_str())),
            )
    }

    /// `(column, email)` pairs for both email lists.
    pub fn emails(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.emails_report
            .iter()
            .map(|email| ("CCEmailsReport", email.as_str()))
            .chain(
                self.emails_invoice
                    .iter()
                    .map(|email| ("CCEmailsInvoice", email.as_str())),
            )
    }
}

/// Batch the import will be filed under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "link", rename_all = "snake_case")]
pub enum BatchLink {
    /// A batch with this title already exists in the client's pool.
    Existing { uid: String, title: String },
    /// Created at import time if still absent.
    New {
        title: String,
        fields: BTreeMap<String, String>,
    },
}

impl BatchLink {
    pub fn title(&self) -> &str {
        match self {
            Self::Existing { title, .. } | Self::New { title, .. } => title,
        }
    }
}

/// One staged sample line.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SampleRow {
    /// Value of the `Samples` column, used to point users at their sheet.
    pub source_label: String,
    /// Total analyses or profiles the file claims for this row.
    pub declared_count: usize,
    /// Recognized destination-schema fields, already coerced.
    pub fields: BTreeMap<String, FieldValue>,
    pub sample_matrix: Option<String>,
    pub container_type: Option<String>,
    /// Analysis service keywords.
    pub analyses: Vec<String>,
    /// Profile titles or keys.
    pub profiles: Vec<String>,
}

impl SampleRow {
    pub fn new(source_label: impl Into<String>) -> Self {
        Self {
            source_label: source_label.into(),
            ..Self::default()
        }
    }

    pub fn selection_count(&self) -> usize {
        self.analyses.len() + self.profiles.len()
    }

    pub fn count_matches(&self) -> bool {
        self.selection_count() == self.declared_count
    }

    /// Label for messages: the sheet label, or the 1-based position.
    pub fn display_label(&self, position: usize) -> String {
        let label = self.source_label.trim();
        if label.is_empty() {
            position.to_string()
        } else {
            label.to_string()
        }
    }
}

/// Editable intermediate form of one import attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StagingRecord {
    pub id: String,
    /// UID of the owning client.
    pub client_uid: String,
    #[serde(default)]
    pub state: ImportState,
    #[serde(default)]
    pub source: Option<SourceFile>,

    pub filename: String,
    /// Raw `No of Samples` header value.
    pub declared_sample_count: String,
    pub client_name: String,
    pub client_id: String,
    pub client_order_number: String,
    pub client_reference: String,
    /// Contact UID.
    pub contact: Option<String>,
    #[serde(default)]
    pub cc_contacts: CcContacts,
    #[serde(default)]
    pub batch: Option<BatchLink>,

    #[serde(default)]
    pub samples: Vec<SampleRow>,
    #[serde(default)]
    pub errors: Vec<ImportIssue>,
}

impl StagingRecord {
    pub fn new(id: impl Into<String>, client_uid: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            client_uid: client_uid.into(),
            state: ImportState::Draft,
            source: None,
            filename: String::new(),
            declared_sample_count: String::new(),
            client_name: String::new(),
            client_id: String::new(),
            client_order_number: String::new(),
            client_reference: String::new(),
            contact: None,
            cc_contacts: CcContacts::default(),
            batch: None,
            samples: Vec::new(),
            errors: Vec::new(),
        }
    }

    /// Attach (or replace) the source file. The record returns to draft.
    pub fn attach_file(&mut self, source: SourceFile) {
        self.source = Some(source);
        self.state = ImportState::Draft;
    }

    pub fn has_file(&self) -> bool {
        self.source.as_ref().is_some_and(|source| !source.is_empty())
    }

    /// Append one error message.
    pub fn error(&mut self, kind: IssueKind, message: impl Into<String>) {
        self.errors.push(ImportIssue::new(kind, message));
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn reset_errors(&mut self) {
        self.errors.clear();
    }

    pub fn error_messages(&self) -> Vec<String> {
        self.errors.iter().map(|issue| issue.message.clone()).collect()
    }

    pub fn errors_of(&self, kind: IssueKind) -> impl Iterator<Item = &ImportIssue> {
        self.errors.iter().filter(move |issue| issue.kind == kind)
    }

    /// Blank every value the header pass owns.
    pub fn clear_header_fields(&mut self) {
        self.filename.clear();
        self.declared_sample_count.clear();
        self.client_name.clear();
        self.client_id.clear();
        self.client_order_number.clear();
        self.client_reference.clear();
        self.contact = None;
        self.cc_contacts = CcContacts::default();
    }
}
