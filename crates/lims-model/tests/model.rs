//! Tests for lims-model types.

use lims_model::{
    BatchLink, CatalogRecord, Client, Contact, EntityKind, FieldKind, FieldSpec, FieldValue,
    ImportOptions, ImportState, IssueKind, SampleRow, SchemaDescriptor, StagingRecord, Transition,
};

fn client_with_contacts() -> Client {
    Client {
        uid: "client-1".to_string(),
        title: "Acme".to_string(),
        client_id: "ACME".to_string(),
        contacts: vec![
            Contact {
                uid: "contact-1".to_string(),
                title: "Rita Mohale".to_string(),
                email: Some("rita@example.com".to_string()),
            },
            Contact {
                uid: "contact-2".to_string(),
                title: "Neil Standard".to_string(),
                email: None,
            },
        ],
        batches: vec![],
    }
}

#[test]
fn state_machine_transitions() {
    assert!(ImportState::Draft.can_transition(Transition::Validate));
    assert!(ImportState::Invalid.can_transition(Transition::Validate));
    assert!(!ImportState::Valid.can_transition(Transition::Validate));
    assert!(!ImportState::Imported.can_transition(Transition::Validate));

    assert!(ImportState::Valid.can_transition(Transition::Import));
    assert!(!ImportState::Draft.can_transition(Transition::Import));
    assert!(!ImportState::Invalid.can_transition(Transition::Import));

    assert!(ImportState::Valid.can_transition(Transition::Edit));
    assert!(ImportState::Invalid.can_transition(Transition::Edit));
    assert!(!ImportState::Imported.can_transition(Transition::Edit));
    assert!(ImportState::Imported.is_terminal());
}

#[test]
fn committed_states_are_valid_and_imported() {
    assert!(ImportState::Valid.is_committed());
    assert!(ImportState::Imported.is_committed());
    assert!(!ImportState::Draft.is_committed());
    assert!(!ImportState::Invalid.is_committed());
}

#[test]
fn record_errors_accumulate_and_reset() {
    let mut record = StagingRecord::new("import-1", "client-1");
    assert!(!record.has_errors());
    record.error(IssueKind::CountMismatch, "Row 1: mismatch");
    record.error(IssueKind::UnexpectedField, "Unexpected header fields: Foo");
    assert_eq!(
        record.error_messages(),
        vec!["Row 1: mismatch", "Unexpected header fields: Foo"]
    );
    assert_eq!(record.errors_of(IssueKind::CountMismatch).count(), 1);
    record.reset_errors();
    assert!(!record.has_errors());
}

#[test]
fn clear_header_fields_keeps_samples() {
    let mut record = StagingRecord::new("import-1", "client-1");
    record.client_name = "Acme".to_string();
    record.contact = Some("contact-1".to_string());
    record.cc_contacts.names_report.push("Rita Mohale".to_string());
    record.samples.push(SampleRow::new("S1"));
    record.clear_header_fields();
    assert!(record.client_name.is_empty());
    assert!(record.contact.is_none());
    assert!(record.cc_contacts.is_empty());
    assert_eq!(record.samples.len(), 1);
}

#[test]
fn file_guard_requires_content() {
    let mut record = StagingRecord::new("import-1", "client-1");
    assert!(!record.has_file());
    record.attach_file(lims_model::SourceFile {
        filename: "order.csv".to_string(),
        content: String::new(),
        sha256: String::new(),
    });
    assert!(!record.has_file());
    record.attach_file(lims_model::SourceFile {
        filename: "order.csv".to_string(),
        content: "Header,Client name".to_string(),
        sha256: "abc".to_string(),
    });
    assert!(record.has_file());
    assert_eq!(record.state, ImportState::Draft);
}

#[test]
fn sample_row_count_and_label() {
    let mut row = SampleRow::new("");
    row.declared_count = 2;
    row.analyses.push("Ca".to_string());
    assert!(!row.count_matches());
    row.profiles.push("Metals".to_string());
    assert!(row.count_matches());
    assert_eq!(row.display_label(3), "3");
    assert_eq!(SampleRow::new(" S-7 ").display_label(3), "S-7");
}

#[test]
fn client_pool_lookups() {
    let client = client_with_contacts();
    assert_eq!(
        client.contact_by_title("Neil Standard").map(|c| c.uid.as_str()),
        Some("contact-2")
    );
    assert!(client.contact_by_title("neil standard").is_none());
    assert_eq!(client.first_contact().map(|c| c.uid.as_str()), Some("contact-1"));
    assert!(client.contact_by_uid("contact-9").is_none());
}

#[test]
fn entity_kind_displays_type_name() {
    assert_eq!(EntityKind::AnalysisService.to_string(), "AnalysisService");
    assert_eq!(EntityKind::SampleType.as_str(), "SampleType");
}

#[test]
fn profile_matches_key_uid_or_title() {
    let profile = CatalogRecord::profile("p-1", "Metals", Some("MET"), ["s-1", "s-2"]);
    assert!(profile.matches_profile("MET"));
    assert!(profile.matches_profile("p-1"));
    assert!(profile.matches_profile("Metals"));
    assert!(!profile.matches_profile("metals"));
}

#[test]
fn analysis_request_schema_has_reference_fields() {
    let schema = SchemaDescriptor::analysis_request();
    let sample_type = schema.get("SampleType").expect("SampleType field");
    assert_eq!(sample_type.kind, FieldKind::Reference);
    assert!(sample_type.required);
    assert_eq!(sample_type.allowed_types, vec![EntityKind::SampleType]);
    assert!(schema.get("CCContact").is_some_and(|f| f.multi_valued));
    assert!(!schema.contains("Analyses"));
}

#[test]
fn schema_deserializes_from_field_list() {
    let json = r#"[
        {"name": "SamplingDate", "kind": "date"},
        {"name": "SampleType", "kind": "reference", "required": true,
         "allowed_types": ["SampleType"]}
    ]"#;
    let schema: SchemaDescriptor = serde_json::from_str(json).expect("parse schema");
    assert_eq!(schema.len(), 2);
    assert_eq!(
        schema.get("SamplingDate"),
        Some(&FieldSpec::datetime("SamplingDate"))
    );
}

#[test]
fn record_serializes() {
    let mut record = StagingRecord::new("import-1", "client-1");
    record.batch = Some(BatchLink::Existing {
        uid: "batch-1".to_string(),
        title: "B-001".to_string(),
    });
    let mut row = SampleRow::new("1");
    row.fields
        .insert("Composite".to_string(), FieldValue::Flag(true));
    record.samples.push(row);
    let json = serde_json::to_string(&record).expect("serialize record");
    let round: StagingRecord = serde_json::from_str(&json).expect("deserialize record");
    assert_eq!(round, record);
}

#[test]
fn field_value_text_forms() {
    assert_eq!(FieldValue::Flag(true).as_text(), "1");
    assert_eq!(FieldValue::Flag(false).as_text(), "");
    assert_eq!(
        FieldValue::References(vec!["a".to_string(), "b".to_string()]).as_text(),
        "a,b"
    );
    assert_eq!(FieldValue::Reference("u".to_string()).references(), vec!["u"]);
    assert!(FieldValue::Text("  ".to_string()).is_empty());
}

#[test]
fn options_listing_path() {
    let options = ImportOptions::default();
    assert_eq!(options.listing_path("client-1"), "/clients/client-1");
    assert_eq!(options.long_date_format, "%Y-%m-%d %I:%M %p");
}
