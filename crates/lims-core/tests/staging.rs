//! End-to-end staging of order files.

mod common;

use common::{Fixture, ORDER};
use lims_core::{ImportError, Stager};
use lims_model::{BatchLink, FieldValue, ImportState, IssueKind};

#[test]
fn stages_complete_order() {
    let fixture = Fixture::new();
    let record = fixture.stage(ORDER);

    assert!(record.errors.is_empty(), "{:?}", record.error_messages());
    assert_eq!(record.state, ImportState::Draft);
    assert_eq!(record.filename, "march.csv");
    assert_eq!(record.declared_sample_count, "2");
    assert_eq!(record.client_name, "Acme");
    assert_eq!(record.client_id, "AC");
    assert_eq!(record.client_order_number, "PO-1001");
    assert_eq!(record.client_reference, "REF-77");
    assert_eq!(record.contact.as_deref(), Some("c-bob"));
    assert_eq!(record.cc_contacts.names_report, ["Ann Smith"]);
    assert_eq!(record.cc_contacts.emails_report, ["lab@acme.test"]);

    let Some(BatchLink::New { title, fields }) = &record.batch else {
        panic!("expected a new batch, got {:?}", record.batch);
    };
    assert_eq!(title, "Autumn run");
    assert_eq!(fields.get("Remarks").map(String::as_str), Some("rush"));
    assert!(!fields.contains_key("id"));

    assert_eq!(record.samples.len(), 2);
    let first = &record.samples[0];
    assert_eq!(first.source_label, "S1");
    assert_eq!(first.declared_count, 2);
    assert_eq!(first.analyses, ["Ca", "Mg"]);
    assert!(first.profiles.is_empty());
    assert_eq!(first.container_type.as_deref(), Some("ct-bottle"));
    assert_eq!(first.sample_matrix.as_deref(), Some("mx-liquid"));
    assert_eq!(
        first.fields.get("SampleType"),
        Some(&FieldValue::Reference("st-water".to_string()))
    );
    assert_eq!(
        first.fields.get("SamplePoint"),
        Some(&FieldValue::Reference("sp-tap".to_string()))
    );
    assert_eq!(
        first.fields.get("DateSampled"),
        Some(&FieldValue::DateTime("2024-03-05 09:30 AM".to_string()))
    );
    assert_eq!(
        first.fields.get("ClientSampleID"),
        Some(&FieldValue::Text("CS-1".to_string()))
    );

    let second = &record.samples[1];
    assert!(second.analyses.is_empty());
    assert_eq!(second.profiles, ["Metals"]);
    assert_eq!(
        second.fields.get("SampleType"),
        Some(&FieldValue::Reference("st-soil".to_string()))
    );
    assert!(!second.fields.contains_key("SamplePoint"));
    assert!(second.container_type.is_none());
}

const SINGLE_KEYWORD: &str = "\
header,Client name,No of Samples
header data,Acme,1
samples,Total number of Analyses or Profiles,Water
total analyses or profiles,,
W-1,1,1
";

#[test]
fn single_keyword_row_matches_declared_count() {
    let record = Fixture::new().stage(SINGLE_KEYWORD);

    assert!(record.errors.is_empty(), "{:?}", record.error_messages());
    assert_eq!(record.samples.len(), 1);
    assert_eq!(record.samples[0].analyses, ["Water"]);
    assert!(record.samples[0].profiles.is_empty());
}

#[test]
fn count_mismatch_is_one_error_and_row_is_kept() {
    let content = SINGLE_KEYWORD.replace("W-1,1,1", "W-1,2,1");
    let record = Fixture::new().stage(&content);

    assert_eq!(record.samples.len(), 1);
    let mismatches: Vec<_> = record.errors_of(IssueKind::CountMismatch).collect();
    assert_eq!(mismatches.len(), 1);
    assert_eq!(
        mismatches[0].message,
        "Row W-1: Number of analyses does not match provided value"
    );
    assert_eq!(record.errors.len(), 1);
}

#[test]
fn unknown_contact_falls_back_to_first_contact() {
    let content = "\
header,Client name,Contact,No of Samples
header data,Acme,Nobody,1
samples,Total number of Analyses or Profiles,Water
total analyses or profiles,,
W-1,1,1
";
    let record = Fixture::new().stage(content);

    assert_eq!(record.contact.as_deref(), Some("c-ann"));
    let errors: Vec<_> = record.errors_of(IssueKind::ReferenceNotFound).collect();
    assert_eq!(errors.len(), 1);
    assert_eq!(
        errors[0].message,
        "Specified contact 'Nobody' does not exist; using 'Ann Smith'"
    );
}

#[test]
fn file_without_sections_is_a_single_parse_error() {
    let record = Fixture::new().stage("just,some,cells\nand,more,cells\n");

    assert_eq!(record.errors.len(), 1);
    assert_eq!(record.errors[0].kind, IssueKind::ParseError);
    assert!(record.samples.is_empty());
    assert!(record.batch.is_none());
    assert!(record.client_name.is_empty());
}

#[test]
fn staging_twice_is_idempotent() {
    let fixture = Fixture::new();
    let mut record = fixture.stage(ORDER);
    let first = record.clone();

    let ctx = fixture.context();
    Stager::new(&ctx).stage(&mut record).unwrap();

    assert_eq!(record, first);
    assert_eq!(record.cc_contacts.names_report.len(), 1);
}

#[test]
fn restaging_replaces_previous_values() {
    let fixture = Fixture::new();
    let mut record = fixture.stage(ORDER);
    assert_eq!(record.samples.len(), 2);

    record.attach_file(lims_ingest::source_from_str("fix.csv", SINGLE_KEYWORD));
    let ctx = fixture.context();
    Stager::new(&ctx).stage(&mut record).unwrap();

    assert_eq!(record.samples.len(), 1);
    assert!(record.batch.is_none());
    assert!(record.client_order_number.is_empty());
    assert!(record.cc_contacts.is_empty());
    assert!(record.contact.is_none());
    assert_eq!(record.filename, "fix.csv");
}

#[test]
fn declared_sample_count_must_match_rows() {
    let content = SINGLE_KEYWORD.replace("Acme,1", "Acme,3");
    let record = Fixture::new().stage(&content);

    assert!(record.samples.is_empty());
    assert_eq!(
        record.error_messages(),
        vec!["No of Samples: 3 expected but only 1 found"]
    );
}

#[test]
fn empty_declared_sample_count() {
    let content = SINGLE_KEYWORD.replace("Acme,1", "Acme,");
    let record = Fixture::new().stage(&content);

    assert!(record.samples.is_empty());
    assert_eq!(
        record.error_messages(),
        vec!["'Number of samples' field is empty"]
    );
}

#[test]
fn header_row_without_data_row() {
    let content = "\
header,Client name,No of Samples
samples,Total number of Analyses or Profiles,Water
total analyses or profiles,,
";
    let record = Fixture::new().stage(content);

    let parse_errors: Vec<_> = record.errors_of(IssueKind::ParseError).collect();
    assert_eq!(parse_errors.len(), 1);
    assert_eq!(
        parse_errors[0].message,
        "File is missing the header row or the header data row"
    );
}

#[test]
fn reports_row_errors_without_stopping() {
    let content = "\
Header,File name,No of Samples,Client name,Client ID,Contact,Colour
Header Data,messy.csv,2,Acme,AC,Nobody,blue
Samples,SampleType,DateSampled,ContainerType,Total number of Analyses or Profiles,Ca,Mg,Metals,Flavour
Total analyses or profiles,,,,,,,,
S1,Milk,2024-03-05,Bottle,1,1,,,sweet
S2,Water,not a date,Crate,2,yes,no,,
";
    let record = Fixture::new().stage(content);

    assert_eq!(record.samples.len(), 2);
    insta::assert_snapshot!(record.error_messages().join("\n"), @r"
    Specified contact 'Nobody' does not exist; using 'Ann Smith'
    Unexpected header fields: Colour
    Row S1: value is invalid (SampleType=Milk)
    Row S2: value is invalid (ContainerType=Crate)
    Row S2: value is invalid (DateSampled=not a date)
    Row S2: Number of analyses does not match provided value
    SAMPLES: Unexpected fields: Flavour
    ");
    assert_eq!(
        record.samples[0].fields.get("SampleType"),
        Some(&FieldValue::Text("Milk".to_string()))
    );
    assert_eq!(
        record.samples[1].fields.get("DateSampled"),
        Some(&FieldValue::Text("not a date".to_string()))
    );
}

#[test]
fn staging_requires_an_attached_file() {
    let fixture = Fixture::new();
    let mut record = lims_model::StagingRecord::new("import-0009", "client-acme");
    let ctx = fixture.context();
    let err = Stager::new(&ctx).stage(&mut record).unwrap_err();
    assert!(matches!(err, ImportError::NoFileAttached { .. }));
}

#[test]
fn imported_records_cannot_be_restaged() {
    let fixture = Fixture::new();
    let mut record = fixture.stage(ORDER);
    record.state = ImportState::Imported;
    let ctx = fixture.context();
    let err = Stager::new(&ctx).stage(&mut record).unwrap_err();
    assert!(matches!(err, ImportError::InvalidTransition { .. }));
}
