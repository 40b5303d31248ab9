//! Week and month calendar commands.
//!
//! Only today's row reflects the live clock; the other rows show what is
//! scheduled for the day.

use std::fmt::Write as _;
use std::io::Write;

use anyhow::{Context, Result};
use chrono::{DateTime, Datelike, NaiveDate, Utc};
use clinic_core::{Category, ResolvedStatus};
use clinic_db::Database;
use serde::Serialize;

use crate::Config;

/// Which calendar period to show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    /// The ISO week containing the date.
    Week(NaiveDate),
    Month { year: i32, month: u32 },
}

impl Period {
    fn title(self) -> String {
        match self {
            Self::Week(anchor) => {
                let dates = clinic_core::week_dates(anchor);
                format!("WEEK {} to {}", dates[0], dates[6])
            }
            Self::Month { year, month } => format!("MONTH {year}-{month:02}"),
        }
    }
}

/// JSON output structure.
#[derive(Debug, Serialize)]
pub struct JsonView<'a> {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub days: &'a [ResolvedStatus],
}

/// Resolves every day of `period`.
pub fn build_view(
    db: &Database,
    config: &Config,
    now: DateTime<Utc>,
    period: Period,
) -> Result<Vec<ResolvedStatus>> {
    let tz = config.tz()?;
    let local = now.with_timezone(&tz);

    let snapshot = db
        .load_snapshot(local.date_naive())
        .context("failed to load schedule")?;
    let resolver = snapshot
        .resolver()
        .context("stored schedule is invalid")?
        .with_lookahead(config.lookahead_days);

    match period {
        Period::Week(anchor) => Ok(resolver.week_view(anchor, &local)),
        Period::Month { year, month } => Ok(resolver.month_view(year, month, &local)?),
    }
}

/// Format a calendar view for humans.
pub fn format_view(period: Period, days: &[ResolvedStatus]) -> String {
    let mut output = String::new();

    writeln!(output, "{}", period.title()).unwrap();
    writeln!(output).unwrap();
    writeln!(
        output,
        "{:<10}  {:<3}  {:<10}  {:<26}  Notes",
        "Date", "Day", "Status", "Hours"
    )
    .unwrap();
    writeln!(
        output,
        "----------  ---  ----------  --------------------------  ------------------"
    )
    .unwrap();

    for day in days {
        let hours = if is_override(day.category) {
            "-".to_string()
        } else {
            day.effective_ranges.to_string()
        };

        let mut notes = Vec::new();
        if day.is_live {
            notes.push(if day.is_open_now {
                "now open".to_string()
            } else {
                "now closed".to_string()
            });
        }
        if let Some(note) = day
            .override_description
            .as_deref()
            .or(day.exception_note.as_deref())
        {
            notes.push(note.to_string());
        }

        let row = format!(
            "{:<10}  {:<3}  {:<10}  {:<26}  {}",
            day.date.to_string(),
            day.date.weekday().to_string(),
            day.category.as_str(),
            hours,
            notes.join("; ")
        );
        writeln!(output, "{}", row.trim_end()).unwrap();
    }

    output
}

const fn is_override(category: Category) -> bool {
    !matches!(category, Category::Open | Category::Closed)
}

/// Format a calendar view as JSON.
pub fn format_view_json(days: &[ResolvedStatus]) -> Result<String> {
    let view = JsonView {
        start: days.first().map(|d| d.date),
        end: days.last().map(|d| d.date),
        days,
    };
    Ok(serde_json::to_string_pretty(&view)?)
}

pub fn run<W: Write>(
    writer: &mut W,
    db: &Database,
    config: &Config,
    now: DateTime<Utc>,
    period: Period,
    json: bool,
) -> Result<()> {
    let days = build_view(db, config, now, period)?;

    if json {
        writeln!(writer, "{}", format_view_json(&days)?)?;
    } else {
        write!(writer, "{}", format_view(period, &days))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::{TimeZone, Weekday};
    use clinic_core::{Exception, StatusOverride, StatusType, TimeRangeSet};
    use insta::assert_snapshot;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn config() -> Config {
        Config {
            database_path: "unused.db".into(),
            timezone: "Asia/Bangkok".to_string(),
            lookahead_days: 366,
        }
    }

    fn clinic() -> Database {
        let mut db = Database::open_in_memory().unwrap();
        let weekday = TimeRangeSet::parse(&["08:30-12:00", "13:00-16:00"]).unwrap();
        for day in [Weekday::Mon, Weekday::Tue, Weekday::Wed, Weekday::Thu] {
            db.set_weekly_hours(day, &weekday).unwrap();
        }
        db.set_weekly_hours(Weekday::Fri, &TimeRangeSet::parse(&["08:30-13:00"]).unwrap())
            .unwrap();
        db
    }

    #[test]
    fn week_view_marks_today_and_exceptions() {
        let mut db = clinic();
        db.insert_exception(
            &Exception::special_hours(
                date(2025, 12, 24),
                TimeRangeSet::parse(&["09:00-12:00"]).unwrap(),
            )
            .unwrap()
            .with_note("Christmas Eve"),
        )
        .unwrap();
        db.insert_exception(&Exception::closed(date(2025, 12, 25)).with_note("Christmas"))
            .unwrap();

        // Tuesday 2025-12-23 10:00 in Bangkok.
        let now = Utc.with_ymd_and_hms(2025, 12, 23, 3, 0, 0).unwrap();
        let mut output = Vec::new();
        run(
            &mut output,
            &db,
            &config(),
            now,
            Period::Week(date(2025, 12, 23)),
            false,
        )
        .unwrap();

        assert_snapshot!(String::from_utf8(output).unwrap(), @r"
        WEEK 2025-12-22 to 2025-12-28

        Date        Day  Status      Hours                       Notes
        ----------  ---  ----------  --------------------------  ------------------
        2025-12-22  Mon  open        08:30-12:00, 13:00-16:00
        2025-12-23  Tue  open        08:30-12:00, 13:00-16:00    now open
        2025-12-24  Wed  open        09:00-12:00                 Christmas Eve
        2025-12-25  Thu  closed      closed                      Christmas
        2025-12-26  Fri  open        08:30-13:00
        2025-12-27  Sat  closed      closed
        2025-12-28  Sun  closed      closed
        ");
    }

    #[test]
    fn month_view_shows_override_window() {
        let mut db = clinic();
        db.insert_status_override(
            &StatusOverride::new(StatusType::Vacation)
                .between(date(2025, 9, 15), date(2025, 9, 22))
                .unwrap()
                .with_description("Annual leave"),
        )
        .unwrap();

        let now = Utc.with_ymd_and_hms(2025, 9, 1, 3, 0, 0).unwrap();
        let days = build_view(
            &db,
            &config(),
            now,
            Period::Month {
                year: 2025,
                month: 9,
            },
        )
        .unwrap();

        assert_eq!(days.len(), 30);
        assert!(days[0].is_live);
        assert!(days[1..].iter().all(|d| !d.is_live && d.next_change.is_none()));
        for day in &days[14..22] {
            assert_eq!(day.category, Category::Vacation, "{}", day.date);
            assert_eq!(day.override_description.as_deref(), Some("Annual leave"));
        }
        assert_eq!(days[22].override_description, None);
        assert!(!days[22].effective_ranges.is_empty());

        let output = format_view(
            Period::Month {
                year: 2025,
                month: 9,
            },
            &days,
        );
        assert!(output.starts_with("MONTH 2025-09\n"));
        assert!(output.contains("2025-09-15  Mon  vacation    -                           Annual leave\n"));
    }

    #[test]
    fn invalid_month_is_an_error() {
        let db = clinic();
        let now = Utc.with_ymd_and_hms(2025, 9, 1, 3, 0, 0).unwrap();
        let err = build_view(
            &db,
            &config(),
            now,
            Period::Month {
                year: 2025,
                month: 13,
            },
        )
        .unwrap_err();
        assert!(err.to_string().contains("13"));
    }

    #[test]
    fn json_view_includes_period_bounds() {
        let db = clinic();
        let now = Utc.with_ymd_and_hms(2025, 9, 17, 3, 0, 0).unwrap();
        let days = build_view(&db, &config(), now, Period::Week(date(2025, 9, 17))).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&format_view_json(&days).unwrap()).unwrap();
        assert_eq!(value["start"], "2025-09-15");
        assert_eq!(value["end"], "2025-09-21");
        assert_eq!(value["days"].as_array().unwrap().len(), 7);
        assert_eq!(value["days"][4]["effective_ranges_today"][0], "08:30-13:00");
        // Monday's midday falls in the lunch break; the day is still open.
        assert_eq!(value["days"][0]["is_live"], false);
        assert_eq!(value["days"][0]["category"], "open");
        assert_eq!(value["days"][5]["category"], "closed");
    }
}
