//! Schedule resolution.
//!
//! Combines the weekly template, the exception calendar and an optional
//! status override into a single answer for an instant or a date.
//!
//! # Precedence
//!
//! For each date, highest first:
//! 1. an active [`StatusOverride`]: closed, categorised by the override type,
//!    template and exceptions are not consulted
//! 2. the matching [`Exception`]: closed, or open only during its ranges
//! 3. the weekly hours for the date's weekday
//!
//! # Next change
//!
//! [`ScheduleResolver::next_change`] scans forward day by day, evaluating the
//! precedence rules for every candidate instant (each range start and end,
//! and each midnight so override windows starting or ending count). The scan
//! stops after the lookahead window, so an always-closed configuration still
//! terminates.

use chrono::{
    DateTime, Datelike, Duration, FixedOffset, LocalResult, NaiveDate, NaiveTime, TimeZone,
};
use serde::{Deserialize, Serialize};

use crate::exception::{Exception, ExceptionCalendar, ExceptionHours};
use crate::status_override::StatusOverride;
use crate::time_range::TimeRangeSet;
use crate::types::{Category, ValidationError};
use crate::weekly::WeeklyTemplate;

/// Days scanned by default when looking for the next change.
pub const DEFAULT_LOOKAHEAD_DAYS: u32 = 366;

/// Upper bound on any configured lookahead.
pub const MAX_LOOKAHEAD_DAYS: u32 = 3660;

/// Hour of the local time used for dates resolved without a live instant.
pub const REPRESENTATIVE_HOUR: u32 = 12;

/// Local midday, at which calendar entries are evaluated.
pub fn representative_time() -> NaiveTime {
    NaiveTime::from_hms_opt(REPRESENTATIVE_HOUR, 0, 0).unwrap_or(NaiveTime::MIN)
}

/// The engine's answer for one instant or one date.
///
/// `is_open_now` and `next_change` describe the caller's actual "now" only
/// when `is_live` is true. Entries built for calendar display
/// (`is_live == false`) carry a whole-day `category`: the override type,
/// `Open` when the date has any opening range, `Closed` otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedStatus {
    /// The local date this answer is for.
    pub date: NaiveDate,
    pub category: Category,
    /// Opening ranges in effect for the date (empty when closed all day).
    #[serde(rename = "effective_ranges_today")]
    pub effective_ranges: TimeRangeSet,
    pub is_open_now: bool,
    /// Whether this was resolved at the caller's real "now".
    pub is_live: bool,
    #[serde(
        rename = "current_exception_note",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub exception_note: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub override_description: Option<String>,
    /// Next instant at which the category or open state changes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_change: Option<DateTime<FixedOffset>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_return: Option<NaiveDate>,
}

/// Which input decided a date.
#[derive(Debug, Clone, Copy)]
enum DayPlan<'a> {
    Override(&'a StatusOverride),
    Exception(&'a Exception),
    Weekly(&'a TimeRangeSet),
}

/// Observable state at an instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct State {
    category: Category,
    open: bool,
}

impl<'a> DayPlan<'a> {
    /// Ranges the facility may be open during; `None` when closed all day.
    fn open_ranges(&self) -> Option<&'a TimeRangeSet> {
        match *self {
            Self::Override(_) => None,
            Self::Exception(exception) => match &exception.hours {
                ExceptionHours::Closed => None,
                ExceptionHours::Special(ranges) => Some(ranges),
            },
            Self::Weekly(ranges) => Some(ranges),
        }
    }

    fn state_at(&self, time: NaiveTime) -> State {
        if let Self::Override(status) = self {
            return State {
                category: status.status_type.into(),
                open: false,
            };
        }
        let open = self.open_ranges().is_some_and(|ranges| ranges.contains(time));
        State {
            category: if open { Category::Open } else { Category::Closed },
            open,
        }
    }

    /// Category for the whole date: open if any range applies that day.
    fn day_category(&self) -> Category {
        match self {
            Self::Override(status) => status.status_type.into(),
            _ if self.open_ranges().is_some_and(|ranges| !ranges.is_empty()) => Category::Open,
            _ => Category::Closed,
        }
    }

    fn boundaries(&self) -> Vec<NaiveTime> {
        self.open_ranges()
            .map(|ranges| ranges.boundaries().collect())
            .unwrap_or_default()
    }

    const fn label(&self) -> &'static str {
        match self {
            Self::Override(_) => "override",
            Self::Exception(_) => "exception",
            Self::Weekly(_) => "weekly",
        }
    }
}

/// Pure resolver over borrowed schedule inputs.
///
/// Holds no state of its own; identical inputs and `now` always give
/// identical answers.
#[derive(Debug, Clone, Copy)]
pub struct ScheduleResolver<'a> {
    template: &'a WeeklyTemplate,
    exceptions: &'a ExceptionCalendar,
    status: Option<&'a StatusOverride>,
    lookahead_days: u32,
}

impl<'a> ScheduleResolver<'a> {
    /// Creates a resolver, re-checking the invariants of the inputs.
    ///
    /// Inputs are normally validated when written; an error here means stored
    /// configuration is corrupt rather than a transient failure.
    pub fn new(
        template: &'a WeeklyTemplate,
        exceptions: &'a ExceptionCalendar,
        status: Option<&'a StatusOverride>,
    ) -> Result<Self, ValidationError> {
        if let Some(status) = status {
            status.validate()?;
        }
        for exception in exceptions.iter() {
            exception.validate()?;
        }
        Ok(Self {
            template,
            exceptions,
            status,
            lookahead_days: DEFAULT_LOOKAHEAD_DAYS,
        })
    }

    /// Sets how many days ahead change queries scan, capped at
    /// [`MAX_LOOKAHEAD_DAYS`].
    #[must_use]
    pub fn with_lookahead(mut self, days: u32) -> Self {
        self.lookahead_days = days.min(MAX_LOOKAHEAD_DAYS);
        self
    }

    pub const fn lookahead_days(&self) -> u32 {
        self.lookahead_days
    }

    fn plan(&self, date: NaiveDate) -> DayPlan<'a> {
        if let Some(status) = self.status.filter(|s| s.is_active_on(date)) {
            return DayPlan::Override(status);
        }
        if let Some(exception) = self.exceptions.active_for(date) {
            return DayPlan::Exception(exception);
        }
        DayPlan::Weekly(self.template.hours_for(date.weekday()))
    }

    fn status_for(&self, date: NaiveDate, time: NaiveTime, is_live: bool) -> ResolvedStatus {
        let plan = self.plan(date);
        let state = plan.state_at(time);
        tracing::trace!(%date, source = plan.label(), category = %state.category, "resolved day");

        let (exception_note, override_description, next_return) = match plan {
            DayPlan::Override(status) => (None, status.description.clone(), status.next_return),
            DayPlan::Exception(exception) => (exception.note.clone(), None, None),
            DayPlan::Weekly(_) => (None, None, None),
        };

        let category = if is_live {
            state.category
        } else {
            plan.day_category()
        };

        ResolvedStatus {
            date,
            category,
            effective_ranges: plan.open_ranges().cloned().unwrap_or_default(),
            is_open_now: state.open,
            is_live,
            exception_note,
            override_description,
            next_change: None,
            next_return,
        }
    }

    /// Resolves the live status at `now`.
    pub fn resolve<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> ResolvedStatus {
        let mut status = self.status_for(now.date_naive(), now.time(), true);
        status.next_change = self.next_change(now).map(|at| at.fixed_offset());
        tracing::debug!(
            date = %status.date,
            category = %status.category,
            open = status.is_open_now,
            next_change = ?status.next_change,
            "resolved status"
        );
        status
    }

    /// Resolves what is scheduled on `date` as a whole, marked as not live.
    ///
    /// `is_open_now` reflects [`representative_time`].
    pub fn resolve_on(&self, date: NaiveDate) -> ResolvedStatus {
        self.status_for(date, representative_time(), false)
    }

    /// Next instant after `now` at which the category or open state changes.
    pub fn next_change<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> Option<DateTime<Tz>> {
        self.scan(now, |before, after| before != after)
    }

    /// Next instant after `now` at which the facility opens.
    pub fn next_opening<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> Option<DateTime<Tz>> {
        self.scan(now, |before, after| !before.open && after.open)
    }

    /// Next instant after `now` at which the facility closes.
    pub fn next_closing<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> Option<DateTime<Tz>> {
        self.scan(now, |before, after| before.open && !after.open)
    }

    /// Walks candidate instants in order until `is_transition` fires.
    fn scan<Tz, F>(&self, now: &DateTime<Tz>, is_transition: F) -> Option<DateTime<Tz>>
    where
        Tz: TimeZone,
        F: Fn(State, State) -> bool,
    {
        let tz = now.timezone();
        let today = now.date_naive();
        let mut previous = self.plan(today).state_at(now.time());

        for offset in 0..=i64::from(self.lookahead_days) {
            let date = today + Duration::days(offset);
            let plan = self.plan(date);

            let mut candidates = plan.boundaries();
            if offset == 0 {
                candidates.retain(|&time| time > now.time());
            } else if candidates.first() != Some(&NaiveTime::MIN) {
                candidates.insert(0, NaiveTime::MIN);
            }

            for time in candidates {
                let Some(instant) = localize(&tz, date, time) else {
                    continue;
                };
                if instant <= *now {
                    continue;
                }
                let state = plan.state_at(time);
                if is_transition(previous, state) {
                    return Some(instant);
                }
                previous = state;
            }
        }

        tracing::warn!(
            lookahead_days = self.lookahead_days,
            "no schedule transition within lookahead"
        );
        None
    }
}

/// Maps a local wall-clock time to an instant.
///
/// Ambiguous times (DST fall-back) take the earlier instant; nonexistent
/// times (DST spring-forward) move forward one hour.
fn localize<Tz: TimeZone>(tz: &Tz, date: NaiveDate, time: NaiveTime) -> Option<DateTime<Tz>> {
    let local = date.and_time(time);
    match tz.from_local_datetime(&local) {
        LocalResult::Single(dt) | LocalResult::Ambiguous(dt, _) => Some(dt),
        LocalResult::None => tz
            .from_local_datetime(&(local + Duration::hours(1)))
            .earliest(),
    }
}
