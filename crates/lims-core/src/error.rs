use std::path::PathBuf;

use lims_catalog::CatalogError;
use lims_model::{ImportState, Transition};

/// Failure raised by a collaborator that creates samples or batches.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct CreationError(pub String);

impl CreationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("import {id} has no source file attached")]
    NoFileAttached { id: String },

    #[error("cannot {action} import {id} while it is {state}")]
    InvalidTransition {
        id: String,
        action: Transition,
        state: ImportState,
    },

    #[error("row {row}: {message}")]
    Unresolved { row: String, message: String },

    #[error("failed to create sample for row {row}: {source}")]
    Creation {
        row: String,
        #[source]
        source: CreationError,
    },

    #[error("failed to create batch {title:?}: {source}")]
    BatchCreation {
        title: String,
        #[source]
        source: CreationError,
    },

    #[error("staging record not found: {id}")]
    RecordNotFound { id: String },

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read staging record {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl ImportError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, ImportError>;
