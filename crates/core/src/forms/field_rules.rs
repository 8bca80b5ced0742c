//! Field names, synchronous validation rules and their error conditions.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::products::parse_calendar_date;

pub const ID_MIN_LEN: usize = 3;
pub const ID_MAX_LEN: usize = 10;
pub const NAME_MIN_LEN: usize = 5;
pub const NAME_MAX_LEN: usize = 100;
pub const DESCRIPTION_MIN_LEN: usize = 10;
pub const DESCRIPTION_MAX_LEN: usize = 200;

/// The fields shared by the create and edit forms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldName {
    Id,
    Name,
    Description,
    Logo,
    DateRelease,
    DateRevision,
}

impl FieldName {
    pub const ALL: [FieldName; 6] = [
        FieldName::Id,
        FieldName::Name,
        FieldName::Description,
        FieldName::Logo,
        FieldName::DateRelease,
        FieldName::DateRevision,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Name => "name",
            Self::Description => "description",
            Self::Logo => "logo",
            Self::DateRelease => "date_release",
            Self::DateRevision => "date_revision",
        }
    }

    pub(crate) fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for FieldName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A validation condition attached to a field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    #[error("This field is required")]
    Required,

    #[error("Must be at least {min} characters")]
    MinLength { min: usize, actual: usize },

    #[error("Must be at most {max} characters")]
    MaxLength { max: usize, actual: usize },

    #[error("Must be a valid date (YYYY-MM-DD)")]
    InvalidDate,

    #[error("Must be on or after {earliest}")]
    DateInPast { earliest: NaiveDate },

    #[error("A product with this id already exists")]
    IdExists,

    #[error("The id could not be verified")]
    IdUnverified,
}

/// Synchronous rule evaluated on every change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldRule {
    Required,
    MinLength(usize),
    MaxLength(usize),
    CalendarDate,
    NotBefore(NaiveDate),
}

impl FieldRule {
    /// Evaluate the rule. Every rule except `Required` passes on empty input.
    pub fn check(&self, value: &str) -> Option<FieldError> {
        let empty = value.trim().is_empty();
        match *self {
            Self::Required => empty.then_some(FieldError::Required),
            _ if empty => None,
            Self::MinLength(min) => {
                let actual = value.chars().count();
                (actual < min).then_some(FieldError::MinLength { min, actual })
            }
            Self::MaxLength(max) => {
                let actual = value.chars().count();
                (actual > max).then_some(FieldError::MaxLength { max, actual })
            }
            Self::CalendarDate => parse_calendar_date(value)
                .is_none()
                .then_some(FieldError::InvalidDate),
            Self::NotBefore(earliest) => match parse_calendar_date(value) {
                Some(date) if date < earliest => Some(FieldError::DateInPast { earliest }),
                _ => None,
            },
        }
    }
}

/// Run every rule and collect the failures.
pub fn check_rules(rules: &[FieldRule], value: &str) -> Vec<FieldError> {
    rules.iter().filter_map(|rule| rule.check(value)).collect()
}
