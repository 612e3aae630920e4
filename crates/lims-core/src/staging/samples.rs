use lims_catalog::QueryFilter;
use lims_ingest::{DECLARED_COUNT_COLUMN, FieldMap, SAMPLE_LABEL_COLUMN, SampleTable};
use lims_model::{EntityKind, FieldValue, IssueKind, SampleRow, StagingRecord};
use tracing::{debug, info};

use crate::coerce::{FieldCoercer, is_truthy};
use crate::context::ImportContext;

const CONTAINER_TYPE: &str = "ContainerType";
const SAMPLE_MATRIX: &str = "SampleMatrix";

/// Stage the sample table into `record.samples`.
///
/// The declared `No of Samples` must match the number of data rows before
/// any row is staged. Row problems are recorded per row and never stop the
/// remaining rows.
pub fn stage_samples(
    record: &mut StagingRecord,
    table: Option<SampleTable>,
    ctx: &ImportContext<'_>,
) {
    record.samples.clear();
    let Some(table) = table else {
        record.error(IssueKind::ParseError, "No sample data found");
        return;
    };

    let declared = record.declared_sample_count.trim().to_string();
    if declared.is_empty() {
        record.error(IssueKind::MissingField, "'Number of samples' field is empty");
        return;
    }
    let Ok(expected) = declared.parse::<usize>() else {
        record.error(
            IssueKind::InvalidValue,
            format!("No of Samples: value is invalid ({declared})"),
        );
        return;
    };
    if expected != table.rows.len() {
        record.error(
            IssueKind::CountMismatch,
            format!(
                "No of Samples: {declared} expected but only {} found",
                table.rows.len()
            ),
        );
        return;
    }

    let coercer = ctx.coercer();
    let mut unexpected: Vec<String> = Vec::new();
    for (index, values) in table.rows.into_iter().enumerate() {
        let row = stage_row(record, index + 1, values, ctx, &coercer, &mut unexpected);
        record.samples.push(row);
    }

    if !unexpected.is_empty() {
        record.error(
            IssueKind::UnexpectedField,
            format!("SAMPLES: Unexpected fields: {}", unexpected.join(",")),
        );
    }
    info!(rows = record.samples.len(), "sample rows staged");
}

fn stage_row(
    record: &mut StagingRecord,
    position: usize,
    mut values: FieldMap,
    ctx: &ImportContext<'_>,
    coercer: &FieldCoercer<'_>,
    unexpected: &mut Vec<String>,
) -> SampleRow {
    values.remove_blank_keys();
    let mut row = SampleRow::new(values.take(SAMPLE_LABEL_COLUMN).unwrap_or_default());
    let label = row.display_label(position);

    row.declared_count = values
        .take(DECLARED_COUNT_COLUMN)
        .and_then(|count| count.trim().parse().ok())
        .unwrap_or(0);

    row.container_type = take_titled(
        record,
        &label,
        &mut values,
        CONTAINER_TYPE,
        EntityKind::ContainerType,
        ctx,
    );
    row.sample_matrix = take_titled(
        record,
        &label,
        &mut values,
        SAMPLE_MATRIX,
        EntityKind::SampleMatrix,
        ctx,
    );

    for (name, raw) in values.take_where(|key| ctx.schema.contains(key)) {
        let Some(field) = ctx.schema.get(&name) else {
            continue;
        };
        if raw.trim().is_empty() {
            continue;
        }
        match coercer.coerce(field, &raw) {
            Ok(value) => {
                row.fields.insert(name, value);
            }
            Err(err) => {
                record.error(err.issue_kind(), format!("Row {label}: {err}"));
                // Kept raw so validation flags it again after the reset.
                row.fields.insert(name, FieldValue::Text(raw.trim().to_string()));
            }
        }
    }

    let snapshot = ctx.snapshot();
    row.analyses = selected(values.take_where(|key| snapshot.is_keyword(key)));
    row.profiles = selected(values.take_where(|key| snapshot.is_profile_name(key)));

    if !row.count_matches() {
        record.error(
            IssueKind::CountMismatch,
            format!("Row {label}: Number of analyses does not match provided value"),
        );
    }

    for key in values.keys() {
        if !unexpected.iter().any(|seen| seen == key) {
            unexpected.push(key.to_string());
        }
    }

    debug!(
        row = position,
        analyses = row.analyses.len(),
        profiles = row.profiles.len(),
        declared = row.declared_count,
        "staged sample row"
    );
    row
}

/// Remove `column` and resolve its value by title.
fn take_titled(
    record: &mut StagingRecord,
    label: &str,
    values: &mut FieldMap,
    column: &str,
    kind: EntityKind,
    ctx: &ImportContext<'_>,
) -> Option<String> {
    let title = values.take(column)?;
    let title = title.trim();
    if title.is_empty() {
        return None;
    }
    match ctx.lookup().first(&[kind], &QueryFilter::title(title)) {
        Ok(Some(found)) => return Some(found.uid),
        Ok(None) => {}
        Err(err) => debug!(error = %err, "title lookup failed"),
    }
    record.error(
        IssueKind::ReferenceNotFound,
        format!("Row {label}: value is invalid ({column}={title})"),
    );
    None
}

fn selected(columns: Vec<(String, String)>) -> Vec<String> {
    columns
        .into_iter()
        .filter(|(_, value)| is_truthy(value))
        .map(|(key, _)| key)
        .collect()
}
