use serde::{Deserialize, Serialize};

/// A cell value after coercion into its destination field type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum FieldValue {
    Flag(bool),
    /// UID of a single referenced entity.
    Reference(String),
    /// UIDs for a multi-valued reference field.
    References(Vec<String>),
    /// Date already rendered in the long display format.
    DateTime(String),
    Text(String),
}

impl FieldValue {
    /// Referenced UIDs, empty for non-reference values.
    pub fn references(&self) -> Vec<&str> {
        match self {
            Self::Reference(uid) => vec![uid.as_str()],
            Self::References(uids) => uids.iter().map(String::as_str).collect(),
            _ => Vec::new(),
        }
    }

    /// Flat string form, as an edit grid would show it.
    pub fn as_text(&self) -> String {
        match self {
            Self::Flag(true) => "1".to_string(),
            Self::Flag(false) => String::new(),
            Self::Reference(value) | Self::DateTime(value) | Self::Text(value) => value.clone(),
            Self::References(values) => values.join(","),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Self::Flag(_) => false,
            Self::References(values) => values.is_empty(),
            Self::Reference(value) | Self::DateTime(value) | Self::Text(value) => {
                value.trim().is_empty()
            }
        }
    }
}
