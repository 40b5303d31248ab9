//! Command-line argument definitions.

use std::path::PathBuf;

use chrono::{NaiveDate, Weekday};
use clap::{Parser, Subcommand};
use clinic_core::{StatusType, parse_date, parse_weekday};

/// Clinic opening hours and live status.
///
/// Combines the weekly timetable, dated exceptions and the administrator's
/// status override into one answer for visitors.
#[derive(Debug, Parser)]
#[command(name = "clinic", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Show whether the clinic is open right now.
    Status {
        /// Evaluate at this instant instead of now (RFC 3339 or e.g. "in 2 hours").
        #[arg(long)]
        at: Option<String>,

        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Show the hours for one week (Monday to Sunday).
    Week {
        /// Any date inside the week (defaults to today).
        #[arg(long, value_parser = parse_date)]
        date: Option<NaiveDate>,

        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Show the hours for one month.
    Month {
        /// Year (defaults to the current year).
        #[arg(long)]
        year: Option<i32>,

        /// Month number 1-12 (defaults to the current month).
        #[arg(long)]
        month: Option<u32>,

        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Show or change the weekly timetable.
    #[command(subcommand)]
    Hours(HoursAction),

    /// Manage dated exceptions (holidays, special hours).
    #[command(subcommand)]
    Exception(ExceptionAction),

    /// Set, clear or show the facility-wide status override.
    #[command(subcommand)]
    Override(OverrideAction),
}

/// Weekly timetable actions.
#[derive(Debug, Subcommand)]
pub enum HoursAction {
    /// Print the weekly timetable.
    Show {
        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Replace the hours for one weekday.
    Set {
        /// Weekday name (e.g. monday, fri).
        #[arg(value_parser = parse_weekday)]
        weekday: Weekday,

        /// Ranges such as 08:30-12:00 13:00-16:00, or "closed".
        #[arg(required = true, num_args = 1..)]
        ranges: Vec<String>,
    },
}

/// Exception calendar actions.
#[derive(Debug, Subcommand)]
pub enum ExceptionAction {
    /// Add an exception.
    Add {
        /// First date covered.
        #[arg(long, value_parser = parse_date)]
        date: NaiveDate,

        /// Last date covered (inclusive).
        #[arg(long, value_parser = parse_date)]
        end_date: Option<NaiveDate>,

        /// Closed all day.
        #[arg(long, conflicts_with = "hours", required_unless_present = "hours")]
        closed: bool,

        /// Special opening ranges, e.g. "09:00-12:00, 13:00-15:00".
        #[arg(long)]
        hours: Option<String>,

        /// Repeat on the same dates every year.
        #[arg(long)]
        yearly: bool,

        /// Note shown to visitors.
        #[arg(long)]
        note: Option<String>,

        /// Explicit ID (a random one is generated otherwise).
        #[arg(long)]
        id: Option<String>,
    },

    /// List all exceptions.
    List {
        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Remove an exception by ID.
    Remove {
        /// The exception ID.
        id: String,
    },
}

/// Status override actions.
#[derive(Debug, Subcommand)]
pub enum OverrideAction {
    /// Declare a status (vacation, training, conference, other, open).
    Set {
        /// Status type.
        status: StatusType,

        /// First day of the override.
        #[arg(long, value_parser = parse_date)]
        from: Option<NaiveDate>,

        /// Last day of the override (inclusive).
        #[arg(long, value_parser = parse_date)]
        to: Option<NaiveDate>,

        /// Description shown to visitors.
        #[arg(long)]
        description: Option<String>,

        /// Announced return date.
        #[arg(long = "return", value_parser = parse_date)]
        next_return: Option<NaiveDate>,
    },

    /// Return to the regular schedule.
    Clear,

    /// Show the override currently in force or pending.
    Show {
        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn hours_set_collects_ranges() {
        let cli = Cli::parse_from(["clinic", "hours", "set", "fri", "08:30-12:00", "13:00-16:00"]);
        let Some(Commands::Hours(HoursAction::Set { weekday, ranges })) = cli.command else {
            panic!("expected hours set");
        };
        assert_eq!(weekday, Weekday::Fri);
        assert_eq!(ranges, vec!["08:30-12:00", "13:00-16:00"]);
    }

    #[test]
    fn override_set_parses_typed_arguments() {
        let cli = Cli::parse_from([
            "clinic",
            "override",
            "set",
            "vacation",
            "--from",
            "2025-09-15",
            "--to",
            "2025-09-22",
            "--return",
            "2025-09-23",
        ]);
        let Some(Commands::Override(OverrideAction::Set {
            status,
            from,
            next_return,
            ..
        })) = cli.command
        else {
            panic!("expected override set");
        };
        assert_eq!(status, StatusType::Vacation);
        assert_eq!(from, NaiveDate::from_ymd_opt(2025, 9, 15));
        assert_eq!(next_return, NaiveDate::from_ymd_opt(2025, 9, 23));
    }

    #[test]
    fn exception_add_requires_closed_or_hours() {
        assert!(Cli::try_parse_from(["clinic", "exception", "add", "--date", "2025-12-25"]).is_err());
        assert!(
            Cli::try_parse_from([
                "clinic",
                "exception",
                "add",
                "--date",
                "2025-12-25",
                "--closed",
                "--hours",
                "09:00-12:00",
            ])
            .is_err()
        );
        assert!(
            Cli::try_parse_from(["clinic", "exception", "add", "--date", "2025-12-25", "--closed"])
                .is_ok()
        );
    }

    #[test]
    fn malformed_date_is_rejected_by_parser() {
        assert!(Cli::try_parse_from(["clinic", "week", "--date", "2025/09/15"]).is_err());
    }
}
