//! Entities owned by the surrounding system and referenced by imports.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Catalog type of a referenceable entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EntityKind {
    Client,
    Contact,
    Batch,
    AnalysisService,
    AnalysisProfile,
    SampleType,
    SampleMatrix,
    ContainerType,
    SamplePoint,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Client => "Client",
            Self::Contact => "Contact",
            Self::Batch => "Batch",
            Self::AnalysisService => "AnalysisService",
            Self::AnalysisProfile => "AnalysisProfile",
            Self::SampleType => "SampleType",
            Self::SampleMatrix => "SampleMatrix",
            Self::ContainerType => "ContainerType",
            Self::SamplePoint => "SamplePoint",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of the queryable catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogRecord {
    pub uid: String,
    pub kind: EntityKind,
    pub title: String,
    /// Analysis service keyword.
    #[serde(default)]
    pub keyword: Option<String>,
    /// Analysis profile key.
    #[serde(default)]
    pub profile_key: Option<String>,
    /// Member service UIDs of an analysis profile.
    #[serde(default)]
    pub services: Vec<String>,
}

impl CatalogRecord {
    pub fn new(kind: EntityKind, uid: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            uid: uid.into(),
            kind,
            title: title.into(),
            keyword: None,
            profile_key: None,
            services: Vec::new(),
        }
    }

    pub fn service(uid: impl Into<String>, title: impl Into<String>, keyword: &str) -> Self {
        Self {
            keyword: Some(keyword.to_string()),
            ..Self::new(EntityKind::AnalysisService, uid, title)
        }
    }

    pub fn profile<I, S>(
        uid: impl Into<String>,
        title: impl Into<String>,
        key: Option<&str>,
        services: I,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            profile_key: key.map(str::to_string),
            services: services.into_iter().map(Into::into).collect(),
            ..Self::new(EntityKind::AnalysisProfile, uid, title)
        }
    }

    /// True when `value` names this profile by key, UID or title.
    pub fn matches_profile(&self, value: &str) -> bool {
        self.profile_key.as_deref() == Some(value) || self.uid == value || self.title == value
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub uid: String,
    /// Full name, as typed into order files.
    pub title: String,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Batch {
    pub uid: String,
    pub title: String,
    #[serde(default)]
    pub fields: BTreeMap<String, String>,
}

/// The client that owns an import, with its contact and batch pools.
///
/// Pools keep creation order; "first contact" means the oldest one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Client {
    pub uid: String,
    pub title: String,
    pub client_id: String,
    #[serde(default)]
    pub contacts: Vec<Contact>,
    #[serde(default)]
    pub batches: Vec<Batch>,
}

impl Client {
    pub fn contact_by_title(&self, title: &str) -> Option<&Contact> {
        self.contacts.iter().find(|contact| contact.title == title)
    }

    pub fn contact_by_uid(&self, uid: &str) -> Option<&Contact> {
        self.contacts.iter().find(|contact| contact.uid == uid)
    }

    pub fn first_contact(&self) -> Option<&Contact> {
        self.contacts.first()
    }

    pub fn batch_by_title(&self, title: &str) -> Option<&Batch> {
        self.batches.iter().find(|batch| batch.title == title)
    }
}
