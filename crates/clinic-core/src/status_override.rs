//! Administrative status overrides (vacation, training, conference, ...).
//!
//! An active override outranks both the weekly template and the exception
//! calendar. Overrides are never deleted: clearing one records a new `Open`
//! override that supersedes it, and [`current_override`] picks the
//! authoritative record out of that history.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{StatusType, ValidationError};

/// A facility-wide status declared by an administrator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusOverride {
    pub status_type: StatusType,
    /// First day of the override; `None` means already in effect.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_from: Option<NaiveDate>,
    /// Last day of the override (inclusive); `None` means open-ended.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_to: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Announced return date, shown to visitors as-is.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_return: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl StatusOverride {
    /// Creates an override of the given type with no window.
    pub fn new(status_type: StatusType) -> Self {
        let now = Utc::now();
        Self {
            status_type,
            date_from: None,
            date_to: None,
            description: None,
            next_return: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// An `Open` record, used to supersede an earlier override.
    pub fn open() -> Self {
        Self::new(StatusType::Open)
    }

    /// Limits the override to `from..=to`.
    pub fn between(mut self, from: NaiveDate, to: NaiveDate) -> Result<Self, ValidationError> {
        self.date_from = Some(from);
        self.date_to = Some(to);
        self.validate()?;
        Ok(self)
    }

    #[must_use]
    pub const fn starting(mut self, from: NaiveDate) -> Self {
        self.date_from = Some(from);
        self
    }

    #[must_use]
    pub const fn until(mut self, to: NaiveDate) -> Self {
        self.date_to = Some(to);
        self
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub const fn with_next_return(mut self, next_return: NaiveDate) -> Self {
        self.next_return = Some(next_return);
        self
    }

    #[must_use]
    pub const fn with_timestamps(
        mut self,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        self.created_at = created_at;
        self.updated_at = updated_at;
        self
    }

    /// Checks the window and presence invariants.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let (Some(from), Some(to)) = (self.date_from, self.date_to) {
            if to < from {
                return Err(ValidationError::InvertedDateRange {
                    start: from,
                    end: to,
                });
            }
        }
        let has_window = self.date_from.is_some() || self.date_to.is_some();
        let has_description = self
            .description
            .as_deref()
            .is_some_and(|d| !d.trim().is_empty());
        if self.status_type != StatusType::Open && !has_window && !has_description {
            return Err(ValidationError::UnboundedOverride {
                status: self.status_type,
            });
        }
        Ok(())
    }

    /// True when the override controls `date`.
    pub fn is_active_on(&self, date: NaiveDate) -> bool {
        self.status_type != StatusType::Open
            && self.date_from.is_none_or(|from| from <= date)
            && self.date_to.is_none_or(|to| to >= date)
    }

    /// True once the whole window lies before `today`.
    pub fn is_expired_on(&self, today: NaiveDate) -> bool {
        self.date_to.is_some_and(|to| to < today)
    }

    /// Administrative transition back to `Open`.
    pub fn expire(&mut self, at: DateTime<Utc>) {
        self.status_type = StatusType::Open;
        self.updated_at = at;
    }
}

/// Picks the authoritative override from stored history.
///
/// The most recently updated record supersedes every earlier one. It is
/// returned only while it is a non-`Open` status that has not expired on
/// `today`; a pending future override is still returned so the resolver can
/// see its start.
pub fn current_override(history: &[StatusOverride], today: NaiveDate) -> Option<&StatusOverride> {
    // max_by_key keeps the last maximum, so later entries win exact ties.
    let latest = history
        .iter()
        .max_by_key(|o| (o.updated_at, o.created_at))?;
    if latest.status_type == StatusType::Open || latest.is_expired_on(today) {
        return None;
    }
    Some(latest)
}
