//! Core type definitions with validation.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::time_range::TimeRange;

/// Malformed text supplied for a schedule field.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FormatError {
    /// A time range did not match `HH:MM-HH:MM`.
    #[error("invalid time range {value:?}: expected HH:MM-HH:MM (24-hour, zero-padded)")]
    TimeRange { value: String },

    /// A date did not match `YYYY-MM-DD`.
    #[error("invalid date {value:?}: expected YYYY-MM-DD")]
    Date { value: String },

    /// Unknown status type string.
    #[error("unknown status type: {value}")]
    StatusType { value: String },

    /// Unknown weekday name.
    #[error("unknown weekday: {value}")]
    Weekday { value: String },

    /// Unknown recurrence pattern.
    #[error("unknown recurrence pattern: {value}")]
    Recurrence { value: String },
}

/// Schedule data that is well-formed but violates an invariant.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The provided value was empty.
    #[error("{field} cannot be empty")]
    Empty { field: &'static str },

    /// A time range does not end after it starts.
    #[error("time range {range} must end after it starts")]
    InvertedTimeRange { range: String },

    /// Two ranges on the same day overlap.
    #[error("time ranges {first} and {second} overlap")]
    OverlappingRanges { first: TimeRange, second: TimeRange },

    /// A date range ends before it starts.
    #[error("date range {start}..{end} ends before it starts")]
    InvertedDateRange { start: NaiveDate, end: NaiveDate },

    /// An exception that is not closed carries no hours.
    #[error("exception on {date} is not closed but has no time ranges")]
    MissingRanges { date: NaiveDate },

    /// A non-open override with no window and no description.
    #[error("{status} override needs a date window or a description")]
    UnboundedOverride { status: StatusType },

    /// An exception with this ID is already in the calendar.
    #[error("duplicate exception ID: {id}")]
    DuplicateException { id: ExceptionId },

    /// The requested month does not exist.
    #[error("invalid month {year}-{month:02}")]
    InvalidMonth { year: i32, month: u32 },
}

/// Either kind of schedule input error.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ScheduleError {
    #[error(transparent)]
    Format(#[from] FormatError),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// Administrative state of the facility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusType {
    /// Normal operation: the calendar decides.
    Open,
    Vacation,
    Training,
    Conference,
    Other,
}

impl StatusType {
    /// String representation for storage and display keys.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Vacation => "vacation",
            Self::Training => "training",
            Self::Conference => "conference",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for StatusType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for StatusType {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "open" => Ok(Self::Open),
            "vacation" => Ok(Self::Vacation),
            "training" => Ok(Self::Training),
            "conference" => Ok(Self::Conference),
            "other" => Ok(Self::Other),
            _ => Err(FormatError::StatusType {
                value: s.to_string(),
            }),
        }
    }
}

/// What a visitor is told about the facility for a given instant or day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Open,
    Closed,
    Vacation,
    Training,
    Conference,
    Other,
}

impl Category {
    /// Lowercase key for translation lookup.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Closed => "closed",
            Self::Vacation => "vacation",
            Self::Training => "training",
            Self::Conference => "conference",
            Self::Other => "other",
        }
    }
}

impl From<StatusType> for Category {
    fn from(status: StatusType) -> Self {
        match status {
            StatusType::Open => Self::Open,
            StatusType::Vacation => Self::Vacation,
            StatusType::Training => Self::Training,
            StatusType::Conference => Self::Conference,
            StatusType::Other => Self::Other,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A validated exception identifier.
///
/// Exception IDs are non-empty strings, generated as UUIDs when an
/// exception is created without one.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ExceptionId(String);

impl ExceptionId {
    /// Creates a new ID after validation.
    pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
        let id = id.into();
        if id.is_empty() {
            return Err(ValidationError::Empty {
                field: "exception ID",
            });
        }
        Ok(Self(id))
    }

    /// Generates a fresh random ID.
    #[must_use]
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    /// Returns the ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ExceptionId {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ExceptionId> for String {
    fn from(id: ExceptionId) -> Self {
        id.0
    }
}

impl fmt::Display for ExceptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for ExceptionId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Parses a `YYYY-MM-DD` date.
pub fn parse_date(s: &str) -> Result<NaiveDate, FormatError> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map_err(|_| FormatError::Date {
        value: s.to_string(),
    })
}

/// Parses a weekday from its English name or three-letter abbreviation.
pub fn parse_weekday(s: &str) -> Result<chrono::Weekday, FormatError> {
    s.trim().parse().map_err(|_| FormatError::Weekday {
        value: s.to_string(),
    })
}
