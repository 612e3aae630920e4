use lims_ingest::FieldMap;
use lims_model::{Client, IssueKind, StagingRecord};
use tracing::{debug, warn};

pub const HEADER_FILE_NAME: &str = "File name";
pub const HEADER_NR_SAMPLES: &str = "No of Samples";
pub const HEADER_CLIENT_NAME: &str = "Client name";
pub const HEADER_CLIENT_ID: &str = "Client ID";
pub const HEADER_ORDER_NUMBER: &str = "Client Order Number";
pub const HEADER_CLIENT_REFERENCE: &str = "Client Reference";
pub const HEADER_CONTACT: &str = "Contact";

const CC_NAMES_REPORT: &str = "CC Names - Report";
const CC_EMAILS_REPORT: &str = "CC Emails - Report";
const CC_NAMES_INVOICE: &str = "CC Names - Invoice";
const CC_EMAILS_INVOICE: &str = "CC Emails - Invoice";

/// Copy the header section onto the record.
///
/// Recognized keys are consumed; anything left is reported once as
/// unexpected. `None` (no header section) leaves the header fields blank.
pub fn stage_header(record: &mut StagingRecord, header: Option<FieldMap>, client: &Client) {
    record.clear_header_fields();
    if let Some(source) = &record.source {
        record.filename = source.filename.clone();
    }
    let Some(mut header) = header else {
        debug!("file has no header section");
        return;
    };

    let scalars: [(&str, &mut String); 6] = [
        (HEADER_FILE_NAME, &mut record.filename),
        (HEADER_NR_SAMPLES, &mut record.declared_sample_count),
        (HEADER_CLIENT_NAME, &mut record.client_name),
        (HEADER_CLIENT_ID, &mut record.client_id),
        (HEADER_ORDER_NUMBER, &mut record.client_order_number),
        (HEADER_CLIENT_REFERENCE, &mut record.client_reference),
    ];
    for (key, slot) in scalars {
        if let Some(value) = header.take(key).filter(|value| !value.is_empty()) {
            *slot = value;
        }
    }

    if let Some(name) = header.take(HEADER_CONTACT) {
        stage_contact(record, &name, client);
    }

    let cc_lists = [
        (CC_NAMES_REPORT, &mut record.cc_contacts.names_report),
        (CC_EMAILS_REPORT, &mut record.cc_contacts.emails_report),
        (CC_NAMES_INVOICE, &mut record.cc_contacts.names_invoice),
        (CC_EMAILS_INVOICE, &mut record.cc_contacts.emails_invoice),
    ];
    for (key, slot) in cc_lists {
        if let Some(value) = header.take(key) {
            *slot = split_list(&value);
        }
    }

    if !header.is_empty() {
        let unexpected: Vec<&str> = header.keys().collect();
        record.error(
            IssueKind::UnexpectedField,
            format!("Unexpected header fields: {}", unexpected.join(",")),
        );
    }
}

/// Exact title match in the client's pool, else the first contact.
fn stage_contact(record: &mut StagingRecord, name: &str, client: &Client) {
    if let Some(contact) = client.contact_by_title(name) {
        record.contact = Some(contact.uid.clone());
        return;
    }
    match client.first_contact() {
        Some(fallback) => {
            warn!(contact = %fallback.uid, "named contact not found, using first contact");
            record.error(
                IssueKind::ReferenceNotFound,
                format!(
                    "Specified contact '{name}' does not exist; using '{}'",
                    fallback.title
                ),
            );
            record.contact = Some(fallback.uid.clone());
        }
        None => record.error(
            IssueKind::ReferenceNotFound,
            format!("Specified contact '{name}' does not exist; client has no contacts"),
        ),
    }
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}
