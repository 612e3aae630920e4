//! File-system store for staging records.
//!
//! Each record is one pretty-printed JSON file, `{id}.json`, in the store
//! directory. Records are saved after every pass, including failed
//! validations, so the stored errors are what the user sees next.

use std::fs;
use std::path::{Path, PathBuf};

use lims_model::{ImportState, StagingRecord};
use tracing::debug;

use crate::error::{ImportError, Result};

const RECORD_PREFIX: &str = "import-";

#[derive(Debug, Clone)]
pub struct RecordRepository {
    base_dir: PathBuf,
}

impl RecordRepository {
    /// Open a store, creating the directory if needed.
    pub fn new(base_dir: impl Into<PathBuf>) -> Result<Self> {
        let base_dir = base_dir.into();
        fs::create_dir_all(&base_dir).map_err(|e| ImportError::io(&base_dir, e))?;
        Ok(Self { base_dir })
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn save(&self, record: &StagingRecord) -> Result<PathBuf> {
        let path = self.record_path(&record.id);
        let json = serde_json::to_string_pretty(record).map_err(|e| ImportError::Json {
            path: path.clone(),
            source: e,
        })?;
        fs::write(&path, json).map_err(|e| ImportError::io(&path, e))?;
        debug!(record = %record.id, path = %path.display(), "saved staging record");
        Ok(path)
    }

    pub fn load(&self, id: &str) -> Result<StagingRecord> {
        let path = self.record_path(id);
        if !path.exists() {
            return Err(ImportError::RecordNotFound { id: id.to_string() });
        }
        read_record(&path)
    }

    pub fn exists(&self, id: &str) -> bool {
        self.record_path(id).exists()
    }

    /// All records, ordered by id.
    pub fn list(&self) -> Result<Vec<StagingRecord>> {
        let entries =
            fs::read_dir(&self.base_dir).map_err(|e| ImportError::io(&self.base_dir, e))?;
        let mut records = Vec::new();
        for entry in entries {
            let path = entry.map_err(|e| ImportError::io(&self.base_dir, e))?.path();
            if path.is_file() && path.extension().is_some_and(|ext| ext == "json") {
                records.push(read_record(&path)?);
            }
        }
        records.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(records)
    }

    /// Records in any of `states`, ordered by id.
    pub fn list_by_states(&self, states: &[ImportState]) -> Result<Vec<StagingRecord>> {
        Ok(self
            .list()?
            .into_iter()
            .filter(|record| states.contains(&record.state))
            .collect())
    }

    /// Next free id of the form `import-0001`.
    pub fn next_id(&self) -> Result<String> {
        let highest = self
            .list()?
            .iter()
            .filter_map(|record| record.id.strip_prefix(RECORD_PREFIX))
            .filter_map(|number| number.parse::<u32>().ok())
            .max()
            .unwrap_or(0);
        Ok(format!("{RECORD_PREFIX}{:04}", highest + 1))
    }

    fn record_path(&self, id: &str) -> PathBuf {
        self.base_dir.join(format!("{}.json", normalize_id(id)))
    }
}

fn read_record(path: &Path) -> Result<StagingRecord> {
    let contents = fs::read_to_string(path).map_err(|e| ImportError::io(path, e))?;
    serde_json::from_str(&contents).map_err(|e| ImportError::Json {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Keep ids usable as file names.
fn normalize_id(id: &str) -> String {
    id.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}
