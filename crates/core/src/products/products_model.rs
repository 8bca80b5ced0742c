//! Product domain models.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::revision_date::revision_date_for;

/// Calendar-date format used on the wire and in form inputs.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// A financial product record as exposed by the gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductItem {
    pub id: String,
    pub name: String,
    pub description: String,
    pub logo: String,
    #[serde(with = "calendar_date")]
    pub date_release: NaiveDate,
    #[serde(with = "calendar_date")]
    pub date_revision: NaiveDate,
}

impl ProductItem {
    /// Build a product whose revision date is derived from the release date.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
        logo: impl Into<String>,
        date_release: NaiveDate,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: description.into(),
            logo: logo.into(),
            date_release,
            date_revision: revision_date_for(date_release),
        }
    }
}

/// Envelope returned by the list endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductCollection {
    pub data: Vec<ProductItem>,
}

impl ProductCollection {
    pub fn into_items(self) -> Vec<ProductItem> {
        self.data
    }
}

/// Parse a calendar date, accepting either `YYYY-MM-DD` or an ISO-8601
/// timestamp whose date part comes first.
pub fn parse_calendar_date(raw: &str) -> Option<NaiveDate> {
    let value = raw.trim();
    let head = value.get(..10)?;
    if value.len() > 10 && !matches!(value.as_bytes()[10], b'T' | b't' | b' ') {
        return None;
    }
    NaiveDate::parse_from_str(head, DATE_FORMAT).ok()
}

/// Format a date for the wire and form inputs.
pub fn format_calendar_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

pub(crate) mod calendar_date {
    use chrono::NaiveDate;
    use serde::{de, Deserialize, Deserializer, Serializer};

    use super::{format_calendar_date, parse_calendar_date};

    pub fn serialize<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format_calendar_date(*date))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse_calendar_date(&raw)
            .ok_or_else(|| de::Error::custom(format!("invalid calendar date '{}'", raw)))
    }
}
