use std::sync::OnceLock;

use lims_model::{Client, IssueKind, StagingRecord};
use regex::Regex;
use tracing::debug;

const EMAIL_PATTERN: &str = r"^[A-Za-z0-9._%+'-]+@[A-Za-z0-9-]+(\.[A-Za-z0-9-]+)*\.[A-Za-z]{2,}$";

static EMAIL: OnceLock<Option<Regex>> = OnceLock::new();

/// Single address syntax check, no display names.
pub fn is_valid_email(value: &str) -> bool {
    EMAIL
        .get_or_init(|| Regex::new(EMAIL_PATTERN).ok())
        .as_ref()
        .is_some_and(|pattern| pattern.is_match(value.trim()))
}

/// Check the header fields against the owning client and other imports.
pub fn validate_headers(record: &mut StagingRecord, client: &Client, others: &[StagingRecord]) {
    if record.client_name != client.title {
        let message = format!("Client name: value is invalid ({}).", record.client_name);
        record.error(IssueKind::InvalidValue, message);
    }
    if record.client_id != client.client_id {
        let message = format!("Client ID: value is invalid ({}).", record.client_id);
        record.error(IssueKind::InvalidValue, message);
    }

    check_duplicate(record, others, "ClientOrderNumber", |other| {
        &other.client_order_number
    });
    check_duplicate(record, others, "ClientReference", |other| {
        &other.client_reference
    });

    match record.contact.clone() {
        None => record.error(IssueKind::MissingField, "Contact field requires a value"),
        Some(uid) if client.contact_by_uid(&uid).is_none() => record.error(
            IssueKind::ReferenceNotFound,
            format!("Contact: value is invalid ({uid})"),
        ),
        Some(_) => {}
    }

    let mut issues = Vec::new();
    for (column, name) in record.cc_contacts.names() {
        if client.contact_by_title(name).is_none() {
            issues.push((
                IssueKind::ReferenceNotFound,
                format!("{column}: value is invalid ({name})"),
            ));
        }
    }
    for (column, email) in record.cc_contacts.emails() {
        if !is_valid_email(email) {
            issues.push((
                IssueKind::InvalidValue,
                format!("{column}: value is invalid ({email})"),
            ));
        }
    }
    for (kind, message) in issues {
        record.error(kind, message);
    }
}

/// One error per field when a committed other import uses the same value.
fn check_duplicate(
    record: &mut StagingRecord,
    others: &[StagingRecord],
    field: &str,
    value_of: impl Fn(&StagingRecord) -> &String,
) {
    let own = value_of(record).trim();
    if own.is_empty() {
        return;
    }
    let clash = others.iter().find(|other| {
        other.id != record.id && other.state.is_committed() && value_of(other).trim() == own
    });
    if let Some(other) = clash {
        debug!(field, other = %other.id, "duplicate key");
        let message = format!("{field}: already used by existing import {}.", other.id);
        record.error(IssueKind::DuplicateKey, message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_syntax() {
        assert!(is_valid_email("lab@acme.test"));
        assert!(is_valid_email(" first.last+qa@sub.example.org "));
        assert!(!is_valid_email("lab@"));
        assert!(!is_valid_email("Lab <lab@acme.test>"));
        assert!(!is_valid_email("lab@acme"));
        assert!(!is_valid_email(""));
    }
}
