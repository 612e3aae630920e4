use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    /// Malformed or incomplete file sections.
    ParseError,
    /// A value that could not be coerced into its field type.
    InvalidValue,
    /// A human-entered identifier with no match in the reference pools.
    ReferenceNotFound,
    /// Order number or client reference already used by another import.
    DuplicateKey,
    /// Declared analysis count differs from the selected analyses/profiles.
    CountMismatch,
    /// A column or header key nothing consumed.
    UnexpectedField,
    /// A required value is absent.
    MissingField,
}

impl IssueKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ParseError => "parse",
            Self::InvalidValue => "invalid-value",
            Self::ReferenceNotFound => "not-found",
            Self::DuplicateKey => "duplicate",
            Self::CountMismatch => "count-mismatch",
            Self::UnexpectedField => "unexpected",
            Self::MissingField => "missing",
        }
    }
}

impl fmt::Display for IssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One human-readable error message attached to a staging record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportIssue {
    pub kind: IssueKind,
    pub message: String,
}

impl ImportIssue {
    pub fn new(kind: IssueKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for ImportIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}
