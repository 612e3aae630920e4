use thiserror::Error;

use crate::issue::IssueKind;

/// A raw cell value that cannot be converted into its destination field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidValue {
    #[error("value is too short ({field}={value})")]
    TooShort { field: String, value: String },

    #[error("value is invalid ({field}={value})")]
    NotFound { field: String, value: String },

    #[error("value is invalid ({field}={value})")]
    BadDate { field: String, value: String },

    #[error("{field} field requires a value")]
    Required { field: String },
}

impl InvalidValue {
    pub fn field(&self) -> &str {
        match self {
            Self::TooShort { field, .. }
            | Self::NotFound { field, .. }
            | Self::BadDate { field, .. }
            | Self::Required { field } => field,
        }
    }

    /// Issue category used when this failure is recorded on a staging record.
    pub fn issue_kind(&self) -> IssueKind {
        match self {
            Self::NotFound { .. } => IssueKind::ReferenceNotFound,
            Self::Required { .. } => IssueKind::MissingField,
            Self::TooShort { .. } | Self::BadDate { .. } => IssueKind::InvalidValue,
        }
    }
}
