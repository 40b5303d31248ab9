//! `clinic override`: declare or clear a facility-wide status.

use std::fmt::Write as _;
use std::io::Write;

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use clinic_core::{StatusOverride, StatusType};
use clinic_db::Database;

use super::util::or_dash;
use crate::Config;

/// Arguments for `clinic override set`.
#[derive(Debug, Clone)]
pub struct SetArgs {
    pub status: StatusType,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub description: Option<String>,
    pub next_return: Option<NaiveDate>,
}

impl SetArgs {
    pub const fn new(status: StatusType) -> Self {
        Self {
            status,
            from: None,
            to: None,
            description: None,
            next_return: None,
        }
    }
}

/// Builds an override stamped at `now`.
pub fn build_override(args: &SetArgs, now: DateTime<Utc>) -> Result<StatusOverride> {
    let mut status = StatusOverride::new(args.status).with_timestamps(now, now);
    if let Some(from) = args.from {
        status = status.starting(from);
    }
    if let Some(to) = args.to {
        status = status.until(to);
    }
    if let Some(description) = &args.description {
        status = status.with_description(description.as_str());
    }
    if let Some(next_return) = args.next_return {
        status = status.with_next_return(next_return);
    }
    status.validate()?;
    Ok(status)
}

pub fn set<W: Write>(
    writer: &mut W,
    db: &mut Database,
    args: &SetArgs,
    now: DateTime<Utc>,
) -> Result<()> {
    let status = build_override(args, now)?;
    db.insert_status_override(&status)
        .context("failed to save status override")?;
    writeln!(writer, "Override set: {}", describe_window(&status))?;
    Ok(())
}

pub fn clear<W: Write>(writer: &mut W, db: &mut Database, now: DateTime<Utc>) -> Result<()> {
    db.clear_status_override(now)
        .context("failed to clear status override")?;
    writeln!(writer, "Override cleared; regular hours apply.")?;
    Ok(())
}

/// Format the current override for humans.
pub fn format_override(status: Option<&StatusOverride>) -> String {
    let mut output = String::new();
    writeln!(output, "STATUS OVERRIDE").unwrap();
    writeln!(output).unwrap();

    let Some(status) = status else {
        writeln!(output, "No override in force; regular hours apply.").unwrap();
        return output;
    };

    writeln!(output, "Status:       {}", status.status_type).unwrap();
    writeln!(output, "From:         {}", or_dash(status.date_from)).unwrap();
    writeln!(output, "To:           {}", or_dash(status.date_to)).unwrap();
    writeln!(
        output,
        "Description:  {}",
        or_dash(status.description.as_deref())
    )
    .unwrap();
    writeln!(output, "Returns:      {}", or_dash(status.next_return)).unwrap();
    output
}

/// Shows the override in force (or pending) today.
pub fn show<W: Write>(
    writer: &mut W,
    db: &Database,
    config: &Config,
    now: DateTime<Utc>,
    json: bool,
) -> Result<()> {
    let today = now.with_timezone(&config.tz()?).date_naive();
    let current = db
        .current_status_override(today)
        .context("failed to load status override")?;

    if json {
        writeln!(writer, "{}", serde_json::to_string_pretty(&current)?)?;
    } else {
        write!(writer, "{}", format_override(current.as_ref()))?;
    }
    Ok(())
}

fn describe_window(status: &StatusOverride) -> String {
    match (status.date_from, status.date_to) {
        (Some(from), Some(to)) => format!("{} {from}..{to}", status.status_type),
        (Some(from), None) => format!("{} from {from}", status.status_type),
        (None, Some(to)) => format!("{} until {to}", status.status_type),
        (None, None) => status.status_type.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::TimeZone;
    use clinic_core::ValidationError;
    use insta::assert_snapshot;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn at(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 9, day, hour, 0, 0).unwrap()
    }

    fn config() -> Config {
        Config {
            database_path: "unused.db".into(),
            timezone: "Asia/Bangkok".to_string(),
            lookahead_days: 366,
        }
    }

    fn vacation() -> SetArgs {
        SetArgs {
            from: Some(date(2025, 9, 15)),
            to: Some(date(2025, 9, 22)),
            description: Some("Annual leave".to_string()),
            next_return: Some(date(2025, 9, 23)),
            ..SetArgs::new(StatusType::Vacation)
        }
    }

    fn show_text(db: &Database, now: DateTime<Utc>) -> String {
        let mut output = Vec::new();
        show(&mut output, db, &config(), now, false).unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn set_show_clear() {
        let mut db = Database::open_in_memory().unwrap();
        let mut output = Vec::new();
        set(&mut output, &mut db, &vacation(), at(1, 8)).unwrap();
        assert_eq!(
            String::from_utf8(output).unwrap(),
            "Override set: vacation 2025-09-15..2025-09-22\n"
        );

        assert_snapshot!(show_text(&db, at(16, 3)), @r"
        STATUS OVERRIDE

        Status:       vacation
        From:         2025-09-15
        To:           2025-09-22
        Description:  Annual leave
        Returns:      2025-09-23
        ");

        let mut output = Vec::new();
        clear(&mut output, &mut db, at(16, 4)).unwrap();
        assert_snapshot!(show_text(&db, at(16, 5)), @r"
        STATUS OVERRIDE

        No override in force; regular hours apply.
        ");

        // History is kept.
        assert_eq!(db.list_status_overrides().unwrap().len(), 2);
    }

    #[test]
    fn expired_override_is_not_shown() {
        let mut db = Database::open_in_memory().unwrap();
        set(&mut Vec::new(), &mut db, &vacation(), at(1, 8)).unwrap();
        assert!(show_text(&db, at(23, 3)).contains("No override in force"));
    }

    #[test]
    fn unbounded_override_is_rejected() {
        let err = build_override(&SetArgs::new(StatusType::Training), at(1, 8)).unwrap_err();
        assert_eq!(
            err.downcast_ref::<ValidationError>(),
            Some(&ValidationError::UnboundedOverride {
                status: StatusType::Training
            })
        );
    }

    #[test]
    fn inverted_window_is_rejected() {
        let args = SetArgs {
            from: Some(date(2025, 9, 22)),
            to: Some(date(2025, 9, 15)),
            ..SetArgs::new(StatusType::Conference)
        };
        assert!(build_override(&args, at(1, 8)).is_err());
    }

    #[test]
    fn open_ended_override_from_date() {
        let mut db = Database::open_in_memory().unwrap();
        let args = SetArgs {
            from: Some(date(2025, 10, 1)),
            ..SetArgs::new(StatusType::Training)
        };
        let mut output = Vec::new();
        set(&mut output, &mut db, &args, at(1, 8)).unwrap();
        assert_eq!(
            String::from_utf8(output).unwrap(),
            "Override set: training from 2025-10-01\n"
        );

        let mut output = Vec::new();
        show(&mut output, &db, &config(), at(2, 3), true).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&output).unwrap();
        assert_eq!(value["status_type"], "training");
        assert_eq!(value["date_from"], "2025-10-01");
        assert!(value.get("date_to").is_none());
    }
}
