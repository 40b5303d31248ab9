//! Opening intervals within a single day.
//!
//! A [`TimeRange`] is half-open (`[start, end)`), written `HH:MM-HH:MM` in
//! 24-hour, zero-padded form. A [`TimeRangeSet`] holds the ranges of one day,
//! sorted by start and guaranteed not to overlap. Touching ranges such as
//! `08:00-12:00` and `12:00-13:00` are allowed.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use chrono::NaiveTime;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::types::{FormatError, ScheduleError, ValidationError};

/// Pre-compiled pattern for the strict `HH:MM-HH:MM` form.
static TIME_RANGE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([01][0-9]|2[0-3]):([0-5][0-9])-([01][0-9]|2[0-3]):([0-5][0-9])$")
        .expect("time range pattern is valid")
});

/// A half-open interval of local time within one day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TimeRange {
    start: NaiveTime,
    end: NaiveTime,
}

impl TimeRange {
    /// Creates a range, rejecting empty or inverted intervals.
    pub fn new(start: NaiveTime, end: NaiveTime) -> Result<Self, ValidationError> {
        if start >= end {
            return Err(ValidationError::InvertedTimeRange {
                range: format!("{}-{}", start.format("%H:%M"), end.format("%H:%M")),
            });
        }
        Ok(Self { start, end })
    }

    /// Creates a range from hour and minute pairs.
    pub fn from_hm(start: (u32, u32), end: (u32, u32)) -> Result<Self, ScheduleError> {
        let to_time = |(h, m): (u32, u32)| {
            NaiveTime::from_hms_opt(h, m, 0).ok_or_else(|| FormatError::TimeRange {
                value: format!("{h:02}:{m:02}"),
            })
        };
        Ok(Self::new(to_time(start)?, to_time(end)?)?)
    }

    pub const fn start(&self) -> NaiveTime {
        self.start
    }

    pub const fn end(&self) -> NaiveTime {
        self.end
    }

    /// Returns true if `time` falls within `[start, end)`.
    pub fn contains(&self, time: NaiveTime) -> bool {
        self.start <= time && time < self.end
    }

    fn overlaps(&self, other: &Self) -> bool {
        self.start < other.end && other.start < self.end
    }
}

impl FromStr for TimeRange {
    type Err = ScheduleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || FormatError::TimeRange {
            value: s.to_string(),
        };
        let caps = TIME_RANGE_RE.captures(s).ok_or_else(malformed)?;

        // The pattern bounds every field, so these conversions cannot fail.
        let field = |i: usize| caps[i].parse::<u32>().map_err(|_| malformed());
        let start = NaiveTime::from_hms_opt(field(1)?, field(2)?, 0).ok_or_else(malformed)?;
        let end = NaiveTime::from_hms_opt(field(3)?, field(4)?, 0).ok_or_else(malformed)?;

        Ok(Self::new(start, end)?)
    }
}

impl TryFrom<String> for TimeRange {
    type Error = ScheduleError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TimeRange> for String {
    fn from(range: TimeRange) -> Self {
        range.to_string()
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-{}",
            self.start.format("%H:%M"),
            self.end.format("%H:%M")
        )
    }
}

/// The opening ranges of a single day.
///
/// Always sorted ascending by start with no overlaps. An empty set means
/// closed all day.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<TimeRange>", into = "Vec<TimeRange>")]
pub struct TimeRangeSet(Vec<TimeRange>);

impl TimeRangeSet {
    /// A set with no ranges (closed all day).
    pub const fn closed() -> Self {
        Self(Vec::new())
    }

    /// Builds a set from ranges in any order, rejecting overlaps.
    pub fn new(mut ranges: Vec<TimeRange>) -> Result<Self, ValidationError> {
        ranges.sort();
        for pair in ranges.windows(2) {
            if pair[0].overlaps(&pair[1]) {
                return Err(ValidationError::OverlappingRanges {
                    first: pair[0],
                    second: pair[1],
                });
            }
        }
        Ok(Self(ranges))
    }

    /// Parses a list of `HH:MM-HH:MM` strings.
    ///
    /// Malformed strings fail with [`FormatError`]; inverted or overlapping
    /// ranges fail with [`ValidationError`].
    pub fn parse<S: AsRef<str>>(raw: &[S]) -> Result<Self, ScheduleError> {
        let ranges = raw
            .iter()
            .map(|s| s.as_ref().parse::<TimeRange>())
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(ranges)?)
    }

    /// Parses the comma-separated form, e.g. `08:30-12:00, 13:00-16:00`.
    ///
    /// A blank string or the word `closed` yields the empty set.
    pub fn parse_list(raw: &str) -> Result<Self, ScheduleError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("closed") {
            return Ok(Self::closed());
        }
        let items: Vec<&str> = trimmed.split(',').map(str::trim).collect();
        Self::parse(&items)
    }

    /// Returns true if `time` falls inside any range.
    pub fn contains(&self, time: NaiveTime) -> bool {
        self.0.iter().any(|range| range.contains(time))
    }

    /// The earliest range start or end strictly after `time`.
    pub fn next_boundary_after(&self, time: NaiveTime) -> Option<NaiveTime> {
        self.boundaries().find(|&boundary| boundary > time)
    }

    /// All range starts and ends in ascending order.
    pub fn boundaries(&self) -> impl Iterator<Item = NaiveTime> + '_ {
        self.0.iter().flat_map(|range| [range.start, range.end])
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TimeRange> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[TimeRange] {
        &self.0
    }
}

impl TryFrom<Vec<TimeRange>> for TimeRangeSet {
    type Error = ValidationError;

    fn try_from(value: Vec<TimeRange>) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<TimeRangeSet> for Vec<TimeRange> {
    fn from(set: TimeRangeSet) -> Self {
        set.0
    }
}

impl<'a> IntoIterator for &'a TimeRangeSet {
    type Item = &'a TimeRange;
    type IntoIter = std::slice::Iter<'a, TimeRange>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for TimeRangeSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return write!(f, "closed");
        }
        for (i, range) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{range}")?;
        }
        Ok(())
    }
}
