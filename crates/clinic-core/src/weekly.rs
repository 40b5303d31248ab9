//! The default recurring schedule, one set of ranges per weekday.

use chrono::Weekday;
use serde::{Deserialize, Serialize};

use crate::time_range::TimeRangeSet;
use crate::types::ScheduleError;

/// Weekdays in display order, Monday first.
pub const WEEKDAYS: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// Opening hours for each day of the week.
///
/// Every weekday always has an entry; an empty set means closed all day.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "WeeklyHours", into = "WeeklyHours")]
pub struct WeeklyTemplate {
    days: [TimeRangeSet; 7],
}

impl WeeklyTemplate {
    /// A template closed on every day.
    pub fn new() -> Self {
        Self::default()
    }

    /// Ranges for the given weekday.
    pub fn hours_for(&self, weekday: Weekday) -> &TimeRangeSet {
        &self.days[weekday.num_days_from_monday() as usize]
    }

    /// Replaces a weekday's hours from `HH:MM-HH:MM` strings.
    ///
    /// The template is left untouched if any string is malformed or the
    /// ranges overlap.
    pub fn set_hours_for<S: AsRef<str>>(
        &mut self,
        weekday: Weekday,
        raw: &[S],
    ) -> Result<(), ScheduleError> {
        let ranges = TimeRangeSet::parse(raw)?;
        self.set_ranges_for(weekday, ranges);
        Ok(())
    }

    /// Replaces a weekday's hours with an already validated set.
    pub fn set_ranges_for(&mut self, weekday: Weekday, ranges: TimeRangeSet) {
        self.days[weekday.num_days_from_monday() as usize] = ranges;
    }

    /// Builder form of [`Self::set_hours_for`].
    pub fn with_hours<S: AsRef<str>>(
        mut self,
        weekday: Weekday,
        raw: &[S],
    ) -> Result<Self, ScheduleError> {
        self.set_hours_for(weekday, raw)?;
        Ok(self)
    }

    /// Iterates Monday through Sunday.
    pub fn iter(&self) -> impl Iterator<Item = (Weekday, &TimeRangeSet)> {
        WEEKDAYS.iter().copied().zip(self.days.iter())
    }

    /// True when no weekday has any opening hours.
    pub fn is_always_closed(&self) -> bool {
        self.days.iter().all(TimeRangeSet::is_empty)
    }
}

/// Serialized shape: lowercase weekday keys, missing keys mean closed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
struct WeeklyHours {
    monday: TimeRangeSet,
    tuesday: TimeRangeSet,
    wednesday: TimeRangeSet,
    thursday: TimeRangeSet,
    friday: TimeRangeSet,
    saturday: TimeRangeSet,
    sunday: TimeRangeSet,
}

impl From<WeeklyHours> for WeeklyTemplate {
    fn from(hours: WeeklyHours) -> Self {
        Self {
            days: [
                hours.monday,
                hours.tuesday,
                hours.wednesday,
                hours.thursday,
                hours.friday,
                hours.saturday,
                hours.sunday,
            ],
        }
    }
}

impl From<WeeklyTemplate> for WeeklyHours {
    fn from(template: WeeklyTemplate) -> Self {
        let [monday, tuesday, wednesday, thursday, friday, saturday, sunday] = template.days;
        Self {
            monday,
            tuesday,
            wednesday,
            thursday,
            friday,
            saturday,
            sunday,
        }
    }
}
