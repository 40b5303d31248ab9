//! Weekly timetable commands.

use std::fmt::Write as _;
use std::io::Write;

use anyhow::{Context, Result};
use chrono::Weekday;
use clinic_core::{TimeRangeSet, WeeklyTemplate};
use clinic_db::Database;

/// Full English weekday name.
pub const fn weekday_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// Format the weekly template for humans.
pub fn format_template(template: &WeeklyTemplate) -> String {
    let mut output = String::new();
    writeln!(output, "WEEKLY HOURS").unwrap();
    writeln!(output).unwrap();
    for (weekday, ranges) in template.iter() {
        writeln!(output, "{:<10}  {ranges}", weekday_name(weekday)).unwrap();
    }
    output
}

/// Prints the weekly template.
pub fn show<W: Write>(writer: &mut W, db: &Database, json: bool) -> Result<()> {
    let template = db
        .load_weekly_template()
        .context("failed to load weekly hours")?;

    if json {
        writeln!(writer, "{}", serde_json::to_string_pretty(&template)?)?;
    } else {
        write!(writer, "{}", format_template(&template))?;
    }
    Ok(())
}

/// Replaces one weekday's hours.
///
/// `ranges` may be separate arguments or one comma-separated list; `closed`
/// clears the day.
pub fn set<W: Write>(
    writer: &mut W,
    db: &mut Database,
    weekday: Weekday,
    ranges: &[String],
) -> Result<()> {
    let ranges = TimeRangeSet::parse_list(&ranges.join(","))
        .with_context(|| format!("invalid hours for {}", weekday_name(weekday)))?;

    db.set_weekly_hours(weekday, &ranges)
        .context("failed to save weekly hours")?;
    writeln!(writer, "{}: {ranges}", weekday_name(weekday))?;
    Ok(())
}
