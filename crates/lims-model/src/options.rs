//! Configuration options for staging and importing.

use serde::{Deserialize, Serialize};

/// How ambiguous numeric dates such as `03/04/2024` are read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DateOrder {
    /// `03/04/2024` is the 3rd of April.
    DayFirst,
    /// `03/04/2024` is March 4th.
    #[default]
    MonthFirst,
}

/// Options controlling import behavior.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ImportOptions {
    /// Day/month order for slash- and dot-separated dates.
    pub date_order: DateOrder,

    /// chrono format used to render staged dates for display.
    pub long_date_format: String,

    /// Largest accepted source file, in bytes.
    pub max_file_size: u64,

    /// Redirect target after a successful import. `{client}` is replaced
    /// with the client UID.
    pub listing_path_template: String,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            date_order: DateOrder::default(),
            long_date_format: "%Y-%m-%d %I:%M %p".to_string(),
            max_file_size: 10 * 1024 * 1024,
            listing_path_template: "/clients/{client}".to_string(),
        }
    }
}

impl ImportOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_date_order(mut self, order: DateOrder) -> Self {
        self.date_order = order;
        self
    }

    pub fn with_long_date_format(mut self, format: impl Into<String>) -> Self {
        self.long_date_format = format.into();
        self
    }

    /// Listing path for the given client.
    pub fn listing_path(&self, client_uid: &str) -> String {
        self.listing_path_template.replace("{client}", client_uid)
    }
}
