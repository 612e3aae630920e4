use std::fmt;

use serde::{Deserialize, Serialize};

/// Workflow state of a staging record.
///
/// `draft -> validate -> {valid, invalid}`, `valid|invalid -> edit -> draft`,
/// `valid -> import -> imported`. `imported` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImportState {
    #[default]
    Draft,
    Valid,
    Invalid,
    Imported,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Validate,
    Edit,
    Import,
}

impl ImportState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Valid => "valid",
            Self::Invalid => "invalid",
            Self::Imported => "imported",
        }
    }

    /// Invalid records may be re-validated directly; editing is implied.
    pub fn can_transition(self, transition: Transition) -> bool {
        match transition {
            Transition::Validate => matches!(self, Self::Draft | Self::Invalid),
            Transition::Edit => matches!(self, Self::Draft | Self::Valid | Self::Invalid),
            Transition::Import => self == Self::Valid,
        }
    }

    pub fn is_terminal(self) -> bool {
        self == Self::Imported
    }

    /// States whose order numbers and references are considered taken.
    pub fn is_committed(self) -> bool {
        matches!(self, Self::Valid | Self::Imported)
    }
}

impl fmt::Display for ImportState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Transition {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Validate => "validate",
            Self::Edit => "edit",
            Self::Import => "import",
        }
    }
}

impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
