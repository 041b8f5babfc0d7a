// label.rs - Human-readable labels for state machines and enums.
//
// One contract for every labelled type: `label(locale)`. `Display` on
// those types renders the English label, so `to_string()` and
// `label(LabelLocale::English)` always agree.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Which language labels are rendered in.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum LabelLocale {
    #[default]
    #[serde(rename = "en")]
    English,
    #[serde(rename = "ja")]
    Japanese,
}

/// A type with a short, human-readable, locale-aware label.
pub trait Label {
    fn label(&self, locale: LabelLocale) -> String;
}

/// RFC 3339 with whole seconds and a `Z` suffix, e.g. `2024-03-01T09:30:00Z`.
pub fn format_timestamp(at: &DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Secs, true)
}
