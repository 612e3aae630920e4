#![allow(dead_code)]

use lims_catalog::InMemoryCatalog;
use lims_core::{ImportContext, Stager};
use lims_ingest::source_from_str;
use lims_model::{
    Batch, CatalogRecord, Client, Contact, EntityKind, ImportOptions, SchemaDescriptor,
    StagingRecord,
};

pub const ORDER: &str = "\
Header,File name,No of Samples,Client name,Client ID,Client Order Number,Client Reference,Contact,CC Names - Report,CC Emails - Report
Header Data,march.csv,2,Acme,AC,PO-1001,REF-77,Bob Jones,Ann Smith,lab@acme.test

Batch Header,id,title,Remarks
Batch Data,B-1,Autumn run,rush

Samples,ClientSampleID,SampleType,SamplePoint,DateSampled,ContainerType,SampleMatrix,Total number of Analyses or Profiles,Ca,Mg,Metals
Total analyses or profiles,,,,,,,,2,1,1
S1,CS-1,Water,Tap,2024-03-05 09:30,Bottle,Liquid,2,1,1,
S2,CS-2,Soil (dry),,2024-03-06,,,1,,,x
";

pub struct Fixture {
    pub client: Client,
    pub catalog: InMemoryCatalog,
    pub schema: SchemaDescriptor,
    pub options: ImportOptions,
}

impl Fixture {
    pub fn new() -> Self {
        Self {
            client: client(),
            catalog: InMemoryCatalog::new(catalog_records()),
            schema: SchemaDescriptor::analysis_request(),
            options: ImportOptions::default(),
        }
    }

    pub fn without_service(mut self, uid: &str) -> Self {
        self.catalog = InMemoryCatalog::new(
            catalog_records()
                .into_iter()
                .filter(|record| record.uid != uid)
                .collect(),
        );
        self
    }

    pub fn context(&self) -> ImportContext<'_> {
        ImportContext::new(&self.client, &self.schema, &self.catalog, &self.options)
            .expect("in-memory catalog never fails")
    }

    pub fn record(&self, id: &str, content: &str) -> StagingRecord {
        let mut record = StagingRecord::new(id, &self.client.uid);
        record.attach_file(source_from_str("upload.csv", content));
        record
    }

    pub fn stage(&self, content: &str) -> StagingRecord {
        let mut record = self.record("import-0001", content);
        let ctx = self.context();
        Stager::new(&ctx).stage(&mut record).expect("stage");
        record
    }
}

pub fn client() -> Client {
    Client {
        uid: "client-acme".to_string(),
        title: "Acme".to_string(),
        client_id: "AC".to_string(),
        contacts: vec![
            Contact {
                uid: "c-ann".to_string(),
                title: "Ann Smith".to_string(),
                email: Some("ann@acme.test".to_string()),
            },
            Contact {
                uid: "c-bob".to_string(),
                title: "Bob Jones".to_string(),
                email: None,
            },
        ],
        batches: vec![Batch {
            uid: "batch-spring".to_string(),
            title: "Spring run".to_string(),
            fields: Default::default(),
        }],
    }
}

pub fn catalog_records() -> Vec<CatalogRecord> {
    vec![
        CatalogRecord::service("svc-ca", "Calcium", "Ca"),
        CatalogRecord::service("svc-mg", "Magnesium", "Mg"),
        CatalogRecord::service("svc-water", "Water hardness", "Water"),
        CatalogRecord::profile("prof-met", "Metals", Some("MET"), ["svc-ca", "svc-mg"]),
        CatalogRecord::new(EntityKind::SampleType, "st-water", "Water"),
        CatalogRecord::new(EntityKind::SampleType, "st-soil", "Soil (dry)"),
        CatalogRecord::new(EntityKind::SampleMatrix, "mx-liquid", "Liquid"),
        CatalogRecord::new(EntityKind::ContainerType, "ct-bottle", "Bottle"),
        CatalogRecord::new(EntityKind::SamplePoint, "sp-tap", "Tap"),
    ]
}
