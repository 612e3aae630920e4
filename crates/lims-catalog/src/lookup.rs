//! Resolution of human-entered identifiers against the catalog.

use lims_model::{CatalogRecord, EntityKind};
use tracing::{debug, warn};

use crate::catalog::{Catalog, QueryFilter};
use crate::error::{CatalogError, Result};

/// Looks identifiers up across an ordered list of candidate types.
///
/// The first type with a non-empty result wins; later types are not
/// searched. Within a type every match is returned in catalog order and
/// callers that need one take the first.
#[derive(Clone, Copy)]
pub struct ReferenceLookup<'a> {
    catalog: &'a dyn Catalog,
}

impl<'a> ReferenceLookup<'a> {
    pub fn new(catalog: &'a dyn Catalog) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &'a dyn Catalog {
        self.catalog
    }

    pub fn lookup(&self, kinds: &[EntityKind], filter: &QueryFilter) -> Result<Vec<CatalogRecord>> {
        for &kind in kinds {
            let records = self.query_with_retry(kind, filter)?;
            if !records.is_empty() {
                debug!(kind = %kind, matches = records.len(), "reference resolved");
                return Ok(records);
            }
        }
        Ok(Vec::new())
    }

    /// First match of [`lookup`](Self::lookup).
    pub fn first(&self, kinds: &[EntityKind], filter: &QueryFilter) -> Result<Option<CatalogRecord>> {
        Ok(self.lookup(kinds, filter)?.into_iter().next())
    }

    /// Query once; on a title syntax error, quote the parentheses and retry once.
    fn query_with_retry(&self, kind: EntityKind, filter: &QueryFilter) -> Result<Vec<CatalogRecord>> {
        match self.catalog.query(kind, filter) {
            Err(CatalogError::QuerySyntax { query, message }) => {
                let Some(escaped) = filter.escaped() else {
                    return Err(CatalogError::QuerySyntax { query, message });
                };
                warn!(kind = %kind, %message, "title query rejected, retrying escaped");
                self.catalog.query(kind, &escaped)
            }
            other => other,
        }
    }
}
