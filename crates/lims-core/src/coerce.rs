//! Conversion of raw cell values into destination field values.

use lims_catalog::{QueryFilter, ReferenceLookup};
use lims_model::{FieldKind, FieldSpec, FieldValue, InvalidValue};
use tracing::warn;

use crate::datetime::DateFormatter;

const FALSY: &[&str] = &["", "0", "no", "false", "none"];

/// Shortest reference value worth looking up.
const MIN_REFERENCE_LEN: usize = 2;

/// Spreadsheet truthiness: anything except blank, `0`, `no`, `false` or
/// `none` (any case) counts as set.
pub fn is_truthy(value: &str) -> bool {
    let value = value.trim().to_lowercase();
    !FALSY.contains(&value.as_str())
}

#[derive(Clone, Copy)]
pub struct FieldCoercer<'a> {
    lookup: ReferenceLookup<'a>,
    dates: &'a DateFormatter,
}

impl<'a> FieldCoercer<'a> {
    pub fn new(lookup: ReferenceLookup<'a>, dates: &'a DateFormatter) -> Self {
        Self { lookup, dates }
    }

    /// Staging-time conversion of `raw` into `field`'s type.
    pub fn coerce(&self, field: &FieldSpec, raw: &str) -> Result<FieldValue, InvalidValue> {
        match field.kind {
            FieldKind::Boolean => Ok(FieldValue::Flag(is_truthy(raw))),
            FieldKind::Reference => self.coerce_reference(field, raw),
            FieldKind::DateTime => self
                .dates
                .normalize(raw)
                .map(FieldValue::DateTime)
                .ok_or_else(|| InvalidValue::BadDate {
                    field: field.name.clone(),
                    value: raw.trim().to_string(),
                }),
            FieldKind::Text => Ok(FieldValue::Text(raw.trim().to_string())),
        }
    }

    /// Validation-time check of an already staged value.
    ///
    /// References must still resolve by UID and dates must still parse.
    /// Required references are only enforced here.
    pub fn validate(&self, field: &FieldSpec, value: &FieldValue) -> Result<(), InvalidValue> {
        match field.kind {
            FieldKind::Boolean | FieldKind::Text => Ok(()),
            FieldKind::Reference => {
                let uids: Vec<String> = match value {
                    FieldValue::Reference(_) | FieldValue::References(_) => value
                        .references()
                        .into_iter()
                        .map(|uid| uid.trim().to_string())
                        .filter(|uid| !uid.is_empty())
                        .collect(),
                    other if other.is_empty() => Vec::new(),
                    other => vec![other.as_text().trim().to_string()],
                };
                if uids.is_empty() {
                    return if field.required {
                        Err(InvalidValue::Required {
                            field: field.name.clone(),
                        })
                    } else {
                        Ok(())
                    };
                }
                for uid in uids {
                    if self.resolve(field, &QueryFilter::uid(uid.as_str())).is_empty() {
                        return Err(InvalidValue::NotFound {
                            field: field.name.clone(),
                            value: uid,
                        });
                    }
                }
                Ok(())
            }
            FieldKind::DateTime => {
                let text = value.as_text();
                if text.trim().is_empty() || self.dates.parse(&text).is_some() {
                    Ok(())
                } else {
                    Err(InvalidValue::BadDate {
                        field: field.name.clone(),
                        value: text,
                    })
                }
            }
        }
    }

    fn coerce_reference(&self, field: &FieldSpec, raw: &str) -> Result<FieldValue, InvalidValue> {
        let value = raw.trim();
        if value.chars().count() < MIN_REFERENCE_LEN {
            return Err(InvalidValue::TooShort {
                field: field.name.clone(),
                value: value.to_string(),
            });
        }
        let mut uids = self.resolve(field, &QueryFilter::title(value));
        if uids.is_empty() {
            uids = self.resolve(field, &QueryFilter::uid(value));
        }
        if uids.is_empty() {
            return Err(InvalidValue::NotFound {
                field: field.name.clone(),
                value: value.to_string(),
            });
        }
        if field.multi_valued {
            Ok(FieldValue::References(uids))
        } else {
            Ok(FieldValue::Reference(uids.swap_remove(0)))
        }
    }

    /// UIDs matching `filter`; a failing catalog counts as no match.
    fn resolve(&self, field: &FieldSpec, filter: &QueryFilter) -> Vec<String> {
        match self.lookup.lookup(&field.allowed_types, filter) {
            Ok(records) => records.into_iter().map(|record| record.uid).collect(),
            Err(err) => {
                warn!(field = %field.name, error = %err, "reference lookup failed");
                Vec::new()
            }
        }
    }
}
