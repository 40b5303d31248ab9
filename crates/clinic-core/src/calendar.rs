//! Week and month views built on the resolver.
//!
//! Each view holds one [`ResolvedStatus`] per date. The entry for the date of
//! `now` is resolved live; every other entry is resolved at local midday with
//! `is_live == false` and a whole-day `category`, so display code should
//! rely on `category` and `effective_ranges` rather than `is_open_now`.

use chrono::{DateTime, Datelike, Duration, NaiveDate, TimeZone};

use crate::resolver::{ResolvedStatus, ScheduleResolver};
use crate::types::ValidationError;

/// The Monday-to-Sunday dates of the ISO week containing `anchor`.
#[allow(clippy::cast_possible_wrap)]
pub fn week_dates(anchor: NaiveDate) -> [NaiveDate; 7] {
    let monday = anchor - Duration::days(i64::from(anchor.weekday().num_days_from_monday()));
    std::array::from_fn(|i| monday + Duration::days(i as i64))
}

/// Every date of the given month.
pub fn month_dates(year: i32, month: u32) -> Result<Vec<NaiveDate>, ValidationError> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or(ValidationError::InvalidMonth { year, month })?;
    Ok(first
        .iter_days()
        .take_while(|date| date.month() == month)
        .collect())
}

impl ScheduleResolver<'_> {
    /// Statuses for the seven days of the ISO week containing `anchor`.
    pub fn week_view<Tz: TimeZone>(
        &self,
        anchor: NaiveDate,
        now: &DateTime<Tz>,
    ) -> Vec<ResolvedStatus> {
        self.view(week_dates(anchor), now)
    }

    /// Statuses for every day of `year`-`month`.
    pub fn month_view<Tz: TimeZone>(
        &self,
        year: i32,
        month: u32,
        now: &DateTime<Tz>,
    ) -> Result<Vec<ResolvedStatus>, ValidationError> {
        Ok(self.view(month_dates(year, month)?, now))
    }

    fn view<Tz: TimeZone>(
        &self,
        dates: impl IntoIterator<Item = NaiveDate>,
        now: &DateTime<Tz>,
    ) -> Vec<ResolvedStatus> {
        let today = now.date_naive();
        dates
            .into_iter()
            .map(|date| {
                if date == today {
                    self.resolve(now)
                } else {
                    self.resolve_on(date)
                }
            })
            .collect()
    }
}
