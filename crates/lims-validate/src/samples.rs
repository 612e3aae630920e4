use lims_core::{INHERITED_FIELDS, ImportContext};
use lims_model::{ImportIssue, InvalidValue, IssueKind, StagingRecord};

/// Re-check every staged row against the schema and the live catalog.
pub fn validate_samples(record: &mut StagingRecord, ctx: &ImportContext<'_>) {
    if record.samples.is_empty() {
        record.error(IssueKind::MissingField, "No samples to import");
        return;
    }

    let coercer = ctx.coercer();
    let snapshot = ctx.snapshot();
    let mut issues = Vec::new();

    for (index, row) in record.samples.iter().enumerate() {
        let label = row.display_label(index + 1);

        for (name, value) in &row.fields {
            let Some(field) = ctx.schema.get(name) else {
                continue;
            };
            if value.is_empty() {
                continue;
            }
            if let Err(err) = coercer.validate(field, value) {
                issues.push(ImportIssue::new(
                    err.issue_kind(),
                    format!("Row {label}: {err}"),
                ));
            }
        }

        let missing = ctx.schema.fields().filter(|field| {
            field.required
                && !INHERITED_FIELDS.contains(&field.name.as_str())
                && row.fields.get(&field.name).is_none_or(|value| value.is_empty())
        });
        for field in missing {
            let err = InvalidValue::Required {
                field: field.name.clone(),
            };
            issues.push(ImportIssue::new(
                err.issue_kind(),
                format!("Row {label}: {err}"),
            ));
        }

        let mut valid = 0;
        for keyword in &row.analyses {
            if snapshot.is_keyword(keyword) {
                valid += 1;
            } else {
                issues.push(ImportIssue::new(
                    IssueKind::ReferenceNotFound,
                    format!("Row {label}: value is invalid (Analysis keyword={keyword})"),
                ));
            }
        }
        for profile in &row.profiles {
            if snapshot.is_profile_name(profile) {
                valid += 1;
            } else {
                issues.push(ImportIssue::new(
                    IssueKind::ReferenceNotFound,
                    format!("Row {label}: value is invalid (Profile Title={profile})"),
                ));
            }
        }

        if !row.count_matches() {
            issues.push(ImportIssue::new(
                IssueKind::CountMismatch,
                format!("Row {label}: Number of analyses does not match provided value"),
            ));
        }
        if valid == 0 {
            issues.push(ImportIssue::new(
                IssueKind::MissingField,
                format!("Row {label}: No valid analyses or profiles"),
            ));
        }
    }

    record.errors.extend(issues);
}
