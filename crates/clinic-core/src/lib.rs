//! Schedule and status engine for a clinic's opening hours.
//!
//! This crate contains the pure domain logic for:
//! - Time ranges: strict `HH:MM-HH:MM` parsing and per-day validation
//! - Weekly template: the default hours for each weekday
//! - Exceptions: closures and special hours on specific dates
//! - Status overrides: vacation, training and other administrative states
//! - Resolution: what is true now, on a date, and when it next changes
//!
//! Nothing here performs I/O; callers load the inputs and pass them in.

pub mod calendar;
pub mod exception;
pub mod resolver;
pub mod snapshot;
pub mod status_override;
pub mod time_range;
pub mod types;
pub mod weekly;

pub use calendar::{month_dates, week_dates};
pub use exception::{Exception, ExceptionCalendar, ExceptionHours, Recurrence};
pub use resolver::{DEFAULT_LOOKAHEAD_DAYS, MAX_LOOKAHEAD_DAYS, ResolvedStatus, ScheduleResolver};
pub use snapshot::ScheduleSnapshot;
pub use status_override::{StatusOverride, current_override};
pub use time_range::{TimeRange, TimeRangeSet};
pub use types::{
    Category, ExceptionId, FormatError, ScheduleError, StatusType, ValidationError, parse_date,
    parse_weekday,
};
pub use weekly::{WEEKDAYS, WeeklyTemplate};
