//! Exception calendar commands: holidays, closures and special hours.

use std::fmt::Write as _;
use std::io::Write;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clinic_core::{Exception, ExceptionHours, ExceptionId, TimeRangeSet};
use clinic_db::Database;

use super::util::or_dash;

/// Arguments for `clinic exception add`.
#[derive(Debug, Clone)]
pub struct AddArgs {
    pub date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    /// Special hours; `None` means closed all day.
    pub hours: Option<String>,
    pub yearly: bool,
    pub note: Option<String>,
    pub id: Option<String>,
}

impl AddArgs {
    /// A single-day closure on `date`.
    pub const fn on(date: NaiveDate) -> Self {
        Self {
            date,
            end_date: None,
            hours: None,
            yearly: false,
            note: None,
            id: None,
        }
    }
}

/// Builds a validated exception from command arguments.
pub fn build_exception(args: &AddArgs) -> Result<Exception> {
    let mut exception = match &args.hours {
        None => Exception::closed(args.date),
        Some(raw) => {
            let ranges = TimeRangeSet::parse_list(raw).context("invalid --hours")?;
            Exception::special_hours(args.date, ranges)?
        }
    };
    if let Some(end_date) = args.end_date {
        exception = exception.through(end_date)?;
    }
    if args.yearly {
        exception = exception.yearly();
    }
    if let Some(note) = &args.note {
        exception = exception.with_note(note.as_str());
    }
    if let Some(id) = &args.id {
        exception = exception.with_id(ExceptionId::new(id.as_str())?);
    }
    Ok(exception)
}

/// Adds an exception and prints its ID.
pub fn add<W: Write>(writer: &mut W, db: &mut Database, args: &AddArgs) -> Result<()> {
    let exception = build_exception(args)?;
    db.insert_exception(&exception)
        .context("failed to add exception")?;
    writeln!(writer, "{}", exception.id)?;
    Ok(())
}

/// Removes an exception by ID.
pub fn remove<W: Write>(writer: &mut W, db: &mut Database, id: &str) -> Result<()> {
    let id = ExceptionId::new(id)?;
    if !db
        .delete_exception(&id)
        .context("failed to remove exception")?
    {
        anyhow::bail!("exception not found: {id}");
    }
    writeln!(writer, "Removed exception {id}")?;
    Ok(())
}

/// Format exceptions for humans.
pub fn format_exceptions(exceptions: &[Exception]) -> String {
    let mut output = String::new();

    writeln!(output, "EXCEPTIONS").unwrap();
    writeln!(output).unwrap();

    if exceptions.is_empty() {
        writeln!(output, "No exceptions recorded.").unwrap();
        return output;
    }

    for exception in exceptions {
        let dates = match exception.end_date {
            Some(end) if end != exception.date => format!("{}..{end}", exception.date),
            _ => exception.date.to_string(),
        };
        let hours = match &exception.hours {
            ExceptionHours::Closed => "closed".to_string(),
            ExceptionHours::Special(ranges) => ranges.to_string(),
        };
        let repeat = exception
            .recurrence
            .map_or_else(String::new, |r| format!(" ({r})"));

        writeln!(output, "{}", exception.id).unwrap();
        writeln!(output, "  Dates:  {dates}{repeat}").unwrap();
        writeln!(output, "  Hours:  {hours}").unwrap();
        writeln!(output, "  Note:   {}", or_dash(exception.note.as_deref())).unwrap();
    }

    output
}

/// Lists all exceptions.
pub fn list<W: Write>(writer: &mut W, db: &Database, json: bool) -> Result<()> {
    let exceptions = db
        .list_exceptions()
        .context("failed to load exceptions")?;

    if json {
        writeln!(writer, "{}", serde_json::to_string_pretty(&exceptions)?)?;
    } else {
        write!(writer, "{}", format_exceptions(&exceptions))?;
    }
    Ok(())
}
