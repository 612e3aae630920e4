//! Per-pass view of the reference data an import is checked against.

use lims_catalog::{Catalog, InMemoryCatalog, QueryFilter, ReferenceLookup, ReferenceSnapshot};
use lims_model::{CatalogRecord, Client, EntityKind, ImportOptions, SchemaDescriptor};

use crate::coerce::FieldCoercer;
use crate::datetime::DateFormatter;

/// Catalog scoped to one client: contacts and batches come from the
/// client's own pools, everything else from the shared catalog.
#[derive(Clone, Copy)]
pub struct ClientCatalog<'a> {
    client: &'a Client,
    shared: &'a dyn Catalog,
}

impl<'a> ClientCatalog<'a> {
    pub fn new(client: &'a Client, shared: &'a dyn Catalog) -> Self {
        Self { client, shared }
    }

    fn client_records(&self, kind: EntityKind) -> Vec<CatalogRecord> {
        match kind {
            EntityKind::Contact => self
                .client
                .contacts
                .iter()
                .map(|contact| CatalogRecord::new(kind, &contact.uid, &contact.title))
                .collect(),
            EntityKind::Batch => self
                .client
                .batches
                .iter()
                .map(|batch| CatalogRecord::new(kind, &batch.uid, &batch.title))
                .collect(),
            _ => Vec::new(),
        }
    }
}

impl Catalog for ClientCatalog<'_> {
    fn query(
        &self,
        kind: EntityKind,
        filter: &QueryFilter,
    ) -> lims_catalog::Result<Vec<CatalogRecord>> {
        match kind {
            EntityKind::Contact | EntityKind::Batch => {
                InMemoryCatalog::new(self.client_records(kind)).query(kind, filter)
            }
            _ => self.shared.query(kind, filter),
        }
    }
}

/// Everything a staging, validation or import pass reads.
///
/// Services and profiles are snapshotted once when the context is built.
pub struct ImportContext<'a> {
    pub client: &'a Client,
    pub schema: &'a SchemaDescriptor,
    pub options: &'a ImportOptions,
    catalog: ClientCatalog<'a>,
    snapshot: ReferenceSnapshot,
    dates: DateFormatter,
}

impl<'a> ImportContext<'a> {
    pub fn new(
        client: &'a Client,
        schema: &'a SchemaDescriptor,
        catalog: &'a dyn Catalog,
        options: &'a ImportOptions,
    ) -> lims_catalog::Result<Self> {
        let snapshot = ReferenceSnapshot::load(catalog)?;
        Ok(Self {
            client,
            schema,
            options,
            catalog: ClientCatalog::new(client, catalog),
            snapshot,
            dates: DateFormatter::new(options),
        })
    }

    pub fn lookup(&self) -> ReferenceLookup<'_> {
        ReferenceLookup::new(&self.catalog)
    }

    pub fn snapshot(&self) -> &ReferenceSnapshot {
        &self.snapshot
    }

    pub fn dates(&self) -> &DateFormatter {
        &self.dates
    }

    pub fn coercer(&self) -> FieldCoercer<'_> {
        FieldCoercer::new(self.lookup(), &self.dates)
    }
}
