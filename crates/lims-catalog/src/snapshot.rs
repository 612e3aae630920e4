//! Read-only view of services and profiles for one staging or validation pass.

use std::collections::BTreeSet;

use lims_model::{CatalogRecord, EntityKind};

use crate::catalog::Catalog;
use crate::error::Result;

#[derive(Debug, Clone, Default)]
pub struct ReferenceSnapshot {
    keywords: BTreeSet<String>,
    profile_names: BTreeSet<String>,
    services: Vec<CatalogRecord>,
    profiles: Vec<CatalogRecord>,
}

impl ReferenceSnapshot {
    pub fn load(catalog: &dyn Catalog) -> Result<Self> {
        let services = catalog.all(EntityKind::AnalysisService)?;
        let profiles = catalog.all(EntityKind::AnalysisProfile)?;
        Ok(Self::from_records(services, profiles))
    }

    pub fn from_records(services: Vec<CatalogRecord>, profiles: Vec<CatalogRecord>) -> Self {
        let keywords = services
            .iter()
            .filter_map(|service| service.keyword.clone())
            .collect();
        let mut profile_names = BTreeSet::new();
        for profile in &profiles {
            profile_names.insert(profile.title.clone());
            if let Some(key) = &profile.profile_key {
                profile_names.insert(key.clone());
            }
        }
        Self {
            keywords,
            profile_names,
            services,
            profiles,
        }
    }

    pub fn is_keyword(&self, value: &str) -> bool {
        self.keywords.contains(value)
    }

    /// Profile title or profile key.
    pub fn is_profile_name(&self, value: &str) -> bool {
        self.profile_names.contains(value)
    }

    /// First profile whose key, UID or title equals `value`.
    pub fn profile(&self, value: &str) -> Option<&CatalogRecord> {
        self.profiles
            .iter()
            .find(|profile| profile.matches_profile(value))
    }

    /// Service by keyword, then title, then UID.
    pub fn service(&self, value: &str) -> Option<&CatalogRecord> {
        self.services
            .iter()
            .find(|service| service.keyword.as_deref() == Some(value))
            .or_else(|| self.services.iter().find(|service| service.title == value))
            .or_else(|| self.services.iter().find(|service| service.uid == value))
    }
}
