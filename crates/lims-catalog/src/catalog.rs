//! Queryable pool of reference entities.

use lims_model::{CatalogRecord, EntityKind};

use crate::error::{CatalogError, Result};

/// Exact-match filters; unset fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryFilter {
    pub title: Option<String>,
    pub uid: Option<String>,
    pub keyword: Option<String>,
    pub profile_key: Option<String>,
}

impl QueryFilter {
    pub fn title(value: impl Into<String>) -> Self {
        Self {
            title: Some(value.into()),
            ..Self::default()
        }
    }

    pub fn uid(value: impl Into<String>) -> Self {
        Self {
            uid: Some(value.into()),
            ..Self::default()
        }
    }

    pub fn keyword(value: impl Into<String>) -> Self {
        Self {
            keyword: Some(value.into()),
            ..Self::default()
        }
    }

    /// Copy with parentheses in the title quoted (`(` becomes `"("`).
    ///
    /// `None` when there is nothing to escape.
    pub fn escaped(&self) -> Option<Self> {
        let title = self.title.as_deref()?;
        if !title.contains(['(', ')']) {
            return None;
        }
        Some(Self {
            title: Some(escape_title(title)),
            ..self.clone()
        })
    }

    fn matches(&self, record: &CatalogRecord, title: Option<&str>) -> bool {
        title.is_none_or(|title| record.title == title)
            && self.uid.as_deref().is_none_or(|uid| record.uid == uid)
            && self
                .keyword
                .as_deref()
                .is_none_or(|keyword| record.keyword.as_deref() == Some(keyword))
            && self
                .profile_key
                .as_deref()
                .is_none_or(|key| record.profile_key.as_deref() == Some(key))
    }
}

pub fn escape_title(title: &str) -> String {
    title.replace('(', "\"(\"").replace(')', "\")\"")
}

/// Read access to the reference catalog.
pub trait Catalog {
    /// Records of `kind` matching `filter`, in catalog order.
    fn query(&self, kind: EntityKind, filter: &QueryFilter) -> Result<Vec<CatalogRecord>>;

    fn all(&self, kind: EntityKind) -> Result<Vec<CatalogRecord>> {
        self.query(kind, &QueryFilter::default())
    }
}

/// Catalog held in memory, enumerated in insertion order.
///
/// Title filters follow the query syntax of a text index: bare parentheses
/// are rejected with [`CatalogError::QuerySyntax`] and must be quoted as
/// `"("` / `")"`.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    records: Vec<CatalogRecord>,
}

impl InMemoryCatalog {
    pub fn new(records: Vec<CatalogRecord>) -> Self {
        Self { records }
    }

    pub fn insert(&mut self, record: CatalogRecord) {
        self.records.push(record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl Catalog for InMemoryCatalog {
    fn query(&self, kind: EntityKind, filter: &QueryFilter) -> Result<Vec<CatalogRecord>> {
        let title = filter.title.as_deref().map(parse_title_query).transpose()?;
        Ok(self
            .records
            .iter()
            .filter(|record| record.kind == kind && filter.matches(record, title.as_deref()))
            .cloned()
            .collect())
    }
}

fn parse_title_query(query: &str) -> Result<String> {
    let unquoted = query.replace("\"(\"", "").replace("\")\"", "");
    if unquoted.contains(['(', ')']) {
        return Err(CatalogError::QuerySyntax {
            query: query.to_string(),
            message: "unbalanced grouping".to_string(),
        });
    }
    Ok(query.replace("\"(\"", "(").replace("\")\"", ")"))
}
