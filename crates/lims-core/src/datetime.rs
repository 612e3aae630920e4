//! Date parsing for order files and rendering into the display format.
//!
//! Staged dates are stored already rendered with
//! [`ImportOptions::long_date_format`], so the parser also accepts that
//! format: a staged value must survive re-validation.

use std::fmt::Write;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use lims_model::{DateOrder, ImportOptions};
use tracing::warn;

const ISO_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%d",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
    "%Y/%m/%d",
];

const DAY_FIRST_FORMATS: &[&str] = &[
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
    "%d/%m/%Y",
    "%d.%m.%Y %H:%M",
    "%d.%m.%Y",
    "%d-%m-%Y",
];

const MONTH_FIRST_FORMATS: &[&str] = &[
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
    "%m/%d/%Y %I:%M %p",
    "%m/%d/%Y",
    "%m-%d-%Y",
];

const FALLBACK_FORMAT: &str = "%Y-%m-%d %H:%M";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateFormatter {
    order: DateOrder,
    long_format: String,
}

impl Default for DateFormatter {
    fn default() -> Self {
        Self::new(&ImportOptions::default())
    }
}

impl DateFormatter {
    /// An unusable `long_date_format` falls back to the default format.
    pub fn new(options: &ImportOptions) -> Self {
        let long_format = if is_renderable(&options.long_date_format) {
            options.long_date_format.clone()
        } else {
            warn!(
                format = %options.long_date_format,
                "long date format cannot render dates, using default"
            );
            ImportOptions::default().long_date_format
        };
        Self {
            order: options.date_order,
            long_format,
        }
    }

    pub fn long_format(&self) -> &str {
        &self.long_format
    }

    /// Parse a cell value. Date-only values are taken at midnight.
    pub fn parse(&self, value: &str) -> Option<NaiveDateTime> {
        let value = value.trim();
        if value.is_empty() {
            return None;
        }
        if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
            return Some(parsed.naive_local());
        }
        let ordered = match self.order {
            DateOrder::DayFirst => DAY_FIRST_FORMATS,
            DateOrder::MonthFirst => MONTH_FIRST_FORMATS,
        };
        std::iter::once(self.long_format.as_str())
            .chain(ISO_FORMATS.iter().copied())
            .chain(ordered.iter().copied())
            .find_map(|format| parse_with(value, format))
    }

    pub fn render(&self, value: NaiveDateTime) -> String {
        render_with(value, &self.long_format)
            .or_else(|| render_with(value, FALLBACK_FORMAT))
            .unwrap_or_default()
    }

    /// Parse then render; `None` when the value is not a date.
    pub fn normalize(&self, value: &str) -> Option<String> {
        self.parse(value).map(|parsed| self.render(parsed))
    }
}

fn parse_with(value: &str, format: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value, format)
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(value, format)
                .ok()
                .map(|date| date.and_time(NaiveTime::MIN))
        })
}

fn render_with(value: NaiveDateTime, format: &str) -> Option<String> {
    let mut out = String::new();
    write!(out, "{}", value.format(format)).ok()?;
    Some(out)
}

fn is_renderable(format: &str) -> bool {
    if format.trim().is_empty() {
        return false;
    }
    let probe = NaiveDate::from_ymd_opt(2000, 1, 2)
        .and_then(|date| date.and_hms_opt(13, 4, 5))
        .unwrap_or_default();
    render_with(probe, format).is_some()
}
