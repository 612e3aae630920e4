//! Reference data files: clients, catalog records, schema and options.
//!
//! A reference file is TOML or JSON, chosen by extension:
//!
//! ```toml
//! [options]
//! date-order = "day-first"
//!
//! [[clients]]
//! uid = "client-1"
//! title = "Happy Hills"
//! client_id = "HH"
//! contacts = [{ uid = "contact-1", title = "Rita Mohale" }]
//!
//! [[catalog]]
//! uid = "svc-ca"
//! kind = "AnalysisService"
//! title = "Calcium"
//! keyword = "Ca"
//! ```

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use lims_model::{CatalogRecord, Client, ImportOptions, SchemaDescriptor};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::catalog::InMemoryCatalog;
use crate::error::{CatalogError, Result};

/// Environment variable naming the reference data file.
pub const REFERENCE_DATA_ENV_VAR: &str = "LIMS_REFERENCE_DATA";

const DEFAULT_REFERENCE_FILE: &str = "lims-reference.toml";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ReferenceData {
    pub options: ImportOptions,
    /// Destination schema; the built-in analysis request schema when absent.
    pub schema: Option<SchemaDescriptor>,
    pub clients: Vec<Client>,
    pub catalog: Vec<CatalogRecord>,
}

impl ReferenceData {
    pub fn catalog(&self) -> InMemoryCatalog {
        InMemoryCatalog::new(self.catalog.clone())
    }

    /// Client by UID, client ID or name.
    pub fn client(&self, key: &str) -> Option<&Client> {
        self.clients
            .iter()
            .find(|client| client.uid == key)
            .or_else(|| self.clients.iter().find(|client| client.client_id == key))
            .or_else(|| self.clients.iter().find(|client| client.title == key))
    }

    pub fn schema_or_default(&self) -> SchemaDescriptor {
        self.schema
            .clone()
            .unwrap_or_else(SchemaDescriptor::analysis_request)
    }

    /// Reject UIDs that occur more than once across all pools.
    pub fn validate(&self) -> Result<()> {
        let mut seen = BTreeSet::new();
        let uids = self
            .clients
            .iter()
            .flat_map(|client| {
                std::iter::once(client.uid.as_str())
                    .chain(client.contacts.iter().map(|contact| contact.uid.as_str()))
                    .chain(client.batches.iter().map(|batch| batch.uid.as_str()))
            })
            .chain(self.catalog.iter().map(|record| record.uid.as_str()));
        for uid in uids {
            if uid.trim().is_empty() {
                return Err(CatalogError::Invalid {
                    message: "empty uid".to_string(),
                });
            }
            if !seen.insert(uid) {
                return Err(CatalogError::Invalid {
                    message: format!("duplicate uid: {uid}"),
                });
            }
        }
        Ok(())
    }
}

/// Load and validate a reference data file.
pub fn load_reference_data(path: &Path) -> Result<ReferenceData> {
    let contents = std::fs::read_to_string(path).map_err(|e| CatalogError::io(path, e))?;
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);
    let data: ReferenceData = match extension.as_deref() {
        Some("toml") => toml::from_str(&contents).map_err(|e| CatalogError::Toml {
            path: path.to_path_buf(),
            source: e,
        })?,
        Some("json") => serde_json::from_str(&contents).map_err(|e| CatalogError::Json {
            path: path.to_path_buf(),
            source: e,
        })?,
        _ => {
            return Err(CatalogError::UnsupportedFormat {
                path: path.to_path_buf(),
            });
        }
    };
    data.validate()?;
    debug!(
        path = %path.display(),
        clients = data.clients.len(),
        records = data.catalog.len(),
        "loaded reference data"
    );
    Ok(data)
}

/// Reference file location.
///
/// Resolution order:
/// 1. `LIMS_REFERENCE_DATA` environment variable
/// 2. `lims-reference.toml` in the working directory
pub fn default_reference_path() -> PathBuf {
    if let Ok(path) = std::env::var(REFERENCE_DATA_ENV_VAR) {
        return PathBuf::from(path);
    }
    PathBuf::from(DEFAULT_REFERENCE_FILE)
}
