//! Revision date derivation.
//!
//! A product is revised exactly one calendar year after its release: same
//! month and day, next year. A Feb 29 release rolls to Feb 28.

use chrono::{Datelike, NaiveDate};

/// Revision date for a given release date.
pub fn revision_date_for(release: NaiveDate) -> NaiveDate {
    let year = release.year() + 1;
    release
        .with_year(year)
        .or_else(|| NaiveDate::from_ymd_opt(year, release.month(), 28))
        .unwrap_or(NaiveDate::MAX)
}
