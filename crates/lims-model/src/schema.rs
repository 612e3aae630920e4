//! Read-only description of the destination sample-request schema.
//!
//! Staging and validation resolve the descriptor once per pass and look
//! fields up by name; nothing re-fetches field metadata per cell.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::reference::EntityKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    Boolean,
    Reference,
    #[serde(alias = "date")]
    DateTime,
    Text,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSpec {
    pub name: String,
    pub kind: FieldKind,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub multi_valued: bool,
    /// Catalog types a reference field may point at, tried in order.
    #[serde(default)]
    pub allowed_types: Vec<EntityKind>,
}

impl FieldSpec {
    fn new(name: &str, kind: FieldKind) -> Self {
        Self {
            name: name.to_string(),
            kind,
            required: false,
            multi_valued: false,
            allowed_types: Vec::new(),
        }
    }

    pub fn text(name: &str) -> Self {
        Self::new(name, FieldKind::Text)
    }

    pub fn boolean(name: &str) -> Self {
        Self::new(name, FieldKind::Boolean)
    }

    pub fn datetime(name: &str) -> Self {
        Self::new(name, FieldKind::DateTime)
    }

    pub fn reference(name: &str, allowed_types: &[EntityKind]) -> Self {
        Self {
            allowed_types: allowed_types.to_vec(),
            ..Self::new(name, FieldKind::Reference)
        }
    }

    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    #[must_use]
    pub fn multi_valued(mut self) -> Self {
        self.multi_valued = true;
        self
    }
}

/// Field name to field metadata for one destination entity type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<FieldSpec>", into = "Vec<FieldSpec>")]
pub struct SchemaDescriptor {
    fields: BTreeMap<String, FieldSpec>,
}

impl SchemaDescriptor {
    pub fn new(fields: impl IntoIterator<Item = FieldSpec>) -> Self {
        Self {
            fields: fields
                .into_iter()
                .map(|field| (field.name.clone(), field))
                .collect(),
        }
    }

    /// Built-in descriptor for analysis requests.
    pub fn analysis_request() -> Self {
        Self::new([
            FieldSpec::reference("Contact", &[EntityKind::Contact]).required(),
            FieldSpec::reference("CCContact", &[EntityKind::Contact]).multi_valued(),
            FieldSpec::text("CCEmails"),
            FieldSpec::text("ClientOrderNumber"),
            FieldSpec::text("ClientReference"),
            FieldSpec::text("ClientSampleID"),
            FieldSpec::datetime("SamplingDate"),
            FieldSpec::datetime("DateSampled"),
            FieldSpec::reference("SamplePoint", &[EntityKind::SamplePoint]),
            FieldSpec::reference("SampleType", &[EntityKind::SampleType]).required(),
            FieldSpec::boolean("Composite"),
            FieldSpec::boolean("InvoiceExclude"),
            FieldSpec::text("EnvironmentalConditions"),
            FieldSpec::text("Priority"),
            FieldSpec::text("Remarks"),
        ])
    }

    pub fn get(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    pub fn fields(&self) -> impl Iterator<Item = &FieldSpec> {
        self.fields.values()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl From<Vec<FieldSpec>> for SchemaDescriptor {
    fn from(fields: Vec<FieldSpec>) -> Self {
        Self::new(fields)
    }
}

impl From<SchemaDescriptor> for Vec<FieldSpec> {
    fn from(schema: SchemaDescriptor) -> Self {
        schema.fields.into_values().collect()
    }
}
