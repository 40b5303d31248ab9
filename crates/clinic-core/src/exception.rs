//! Date-scoped exceptions to the weekly template.
//!
//! An exception either closes the facility or replaces its hours on a single
//! date or an inclusive date range. Yearly exceptions match the same
//! month/day span in every year.
//!
//! # Precedence
//!
//! When several exceptions match one date, [`ExceptionCalendar::active_for`]
//! picks the winner by:
//! 1. literal (non-recurring) before recurring
//! 2. narrowest date span
//! 3. most recently created
//! 4. lowest ID, so the answer never depends on insertion order

use std::cmp::Reverse;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::time_range::TimeRangeSet;
use crate::types::{ExceptionId, FormatError, ValidationError};

/// How often an exception repeats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Recurrence {
    /// Same month and day every year.
    Yearly,
}

impl Recurrence {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Yearly => "yearly",
        }
    }
}

impl fmt::Display for Recurrence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Recurrence {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "yearly" => Ok(Self::Yearly),
            _ => Err(FormatError::Recurrence {
                value: s.to_string(),
            }),
        }
    }
}

/// What an exception does to the days it covers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "ranges", rename_all = "snake_case")]
pub enum ExceptionHours {
    /// Closed all day.
    Closed,
    /// Open only during these ranges (never empty).
    Special(TimeRangeSet),
}

impl ExceptionHours {
    /// Builds hours from the flat `closed` / `time_ranges` pair used in storage.
    pub fn from_fields(
        date: NaiveDate,
        closed: bool,
        time_ranges: Option<TimeRangeSet>,
    ) -> Result<Self, ValidationError> {
        if closed {
            return Ok(Self::Closed);
        }
        match time_ranges {
            Some(ranges) if !ranges.is_empty() => Ok(Self::Special(ranges)),
            _ => Err(ValidationError::MissingRanges { date }),
        }
    }

    pub const fn is_closed(&self) -> bool {
        matches!(self, Self::Closed)
    }

    /// Effective ranges: empty when closed.
    pub fn ranges(&self) -> TimeRangeSet {
        match self {
            Self::Closed => TimeRangeSet::closed(),
            Self::Special(ranges) => ranges.clone(),
        }
    }
}

/// A single exception record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exception {
    pub id: ExceptionId,
    /// First covered date.
    pub date: NaiveDate,
    /// Last covered date (inclusive); `None` covers `date` only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    pub hours: ExceptionHours,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurrence: Option<Recurrence>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Exception {
    /// Closes the facility on `date`.
    pub fn closed(date: NaiveDate) -> Self {
        Self::with_hours(date, ExceptionHours::Closed)
    }

    /// Replaces the hours on `date`.
    pub fn special_hours(date: NaiveDate, ranges: TimeRangeSet) -> Result<Self, ValidationError> {
        let hours = ExceptionHours::from_fields(date, false, Some(ranges))?;
        Ok(Self::with_hours(date, hours))
    }

    fn with_hours(date: NaiveDate, hours: ExceptionHours) -> Self {
        Self {
            id: ExceptionId::generate(),
            date,
            end_date: None,
            hours,
            recurrence: None,
            note: None,
            created_at: Utc::now(),
        }
    }

    /// Extends coverage through `end_date` (inclusive).
    pub fn through(mut self, end_date: NaiveDate) -> Result<Self, ValidationError> {
        self.end_date = Some(end_date);
        self.validate()?;
        Ok(self)
    }

    /// Makes the exception repeat every year.
    #[must_use]
    pub const fn yearly(mut self) -> Self {
        self.recurrence = Some(Recurrence::Yearly);
        self
    }

    #[must_use]
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    #[must_use]
    pub fn with_id(mut self, id: ExceptionId) -> Self {
        self.id = id;
        self
    }

    #[must_use]
    pub const fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }

    /// Checks the date order and hours invariants.
    pub fn validate(&self) -> Result<(), ValidationError> {
        match self.end_date {
            Some(end) if end < self.date => {
                return Err(ValidationError::InvertedDateRange {
                    start: self.date,
                    end,
                });
            }
            _ => {}
        }
        match &self.hours {
            ExceptionHours::Special(ranges) if ranges.is_empty() => {
                Err(ValidationError::MissingRanges { date: self.date })
            }
            _ => Ok(()),
        }
    }

    pub const fn is_recurring(&self) -> bool {
        self.recurrence.is_some()
    }

    /// Last covered date of the literal range.
    pub fn last_date(&self) -> NaiveDate {
        self.end_date.unwrap_or(self.date)
    }

    /// Number of days covered, inclusive.
    pub fn span_days(&self) -> i64 {
        (self.last_date() - self.date).num_days() + 1
    }

    /// Returns true if the exception covers `date`.
    pub fn matches(&self, date: NaiveDate) -> bool {
        match self.recurrence {
            None => self.date <= date && date <= self.last_date(),
            Some(Recurrence::Yearly) => {
                if self.span_days() >= 366 {
                    return true;
                }
                let day = month_day(date);
                let start = month_day(self.date);
                let end = month_day(self.last_date());
                if start <= end {
                    start <= day && day <= end
                } else {
                    // Span wraps the year end, e.g. 12-30..01-02.
                    day >= start || day <= end
                }
            }
        }
    }
}

fn month_day(date: NaiveDate) -> (u32, u32) {
    (date.month(), date.day())
}

/// The set of exceptions known to the resolver.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExceptionCalendar {
    exceptions: Vec<Exception>,
}

impl ExceptionCalendar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an exception after validating it.
    pub fn add(&mut self, exception: Exception) -> Result<(), ValidationError> {
        exception.validate()?;
        if self.exceptions.iter().any(|e| e.id == exception.id) {
            return Err(ValidationError::DuplicateException { id: exception.id });
        }
        self.exceptions.push(exception);
        Ok(())
    }

    /// Removes the exception with `id`, returning it if present.
    pub fn remove(&mut self, id: &ExceptionId) -> Option<Exception> {
        let index = self.exceptions.iter().position(|e| &e.id == id)?;
        Some(self.exceptions.remove(index))
    }

    /// The exception that applies to `date`, if any.
    ///
    /// See the [module documentation](self) for how ties are broken.
    pub fn active_for(&self, date: NaiveDate) -> Option<&Exception> {
        self.exceptions
            .iter()
            .filter(|e| e.matches(date))
            .min_by_key(|e| {
                (
                    e.is_recurring(),
                    e.span_days(),
                    Reverse(e.created_at),
                    e.id.clone(),
                )
            })
    }

    pub fn get(&self, id: &ExceptionId) -> Option<&Exception> {
        self.exceptions.iter().find(|e| &e.id == id)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Exception> {
        self.exceptions.iter()
    }

    pub fn len(&self) -> usize {
        self.exceptions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exceptions.is_empty()
    }

    /// Builds a calendar, validating every exception as [`Self::add`] does.
    pub fn from_exceptions(
        exceptions: impl IntoIterator<Item = Exception>,
    ) -> Result<Self, ValidationError> {
        let mut calendar = Self::new();
        for exception in exceptions {
            calendar.add(exception)?;
        }
        Ok(calendar)
    }
}
