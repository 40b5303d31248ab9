//! Status command: is the clinic open right now, and until when.

use std::fmt::Write as _;
use std::io::Write;

use anyhow::{Context, Result};
use chrono::{DateTime, FixedOffset, Utc};
use clinic_core::ResolvedStatus;
use clinic_db::Database;
use serde::Serialize;

use crate::Config;

/// Format used for instants in human-readable output.
pub const INSTANT_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Live status plus the context needed to present it.
#[derive(Debug, Clone, Serialize)]
pub struct StatusReport {
    pub as_of: DateTime<FixedOffset>,
    pub timezone: String,
    #[serde(flatten)]
    pub status: ResolvedStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_opening: Option<DateTime<FixedOffset>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_closing: Option<DateTime<FixedOffset>>,
}

/// Resolves the live status at `now` in the configured timezone.
pub fn build_report(db: &Database, config: &Config, now: DateTime<Utc>) -> Result<StatusReport> {
    let tz = config.tz()?;
    let local = now.with_timezone(&tz);

    let snapshot = db
        .load_snapshot(local.date_naive())
        .context("failed to load schedule")?;
    let resolver = snapshot
        .resolver()
        .context("stored schedule is invalid")?
        .with_lookahead(config.lookahead_days);

    Ok(StatusReport {
        as_of: local.fixed_offset(),
        timezone: config.timezone.clone(),
        status: resolver.resolve(&local),
        next_opening: resolver.next_opening(&local).map(|at| at.fixed_offset()),
        next_closing: resolver.next_closing(&local).map(|at| at.fixed_offset()),
    })
}

/// Format a status report for humans.
pub fn format_status(report: &StatusReport) -> String {
    let status = &report.status;
    let mut output = String::new();

    writeln!(output, "CLINIC STATUS").unwrap();
    field(
        &mut output,
        "As of",
        format!(
            "{} ({})",
            report.as_of.format(INSTANT_FORMAT),
            report.timezone
        ),
    );
    writeln!(output).unwrap();

    field(&mut output, "Status", status.category);
    field(&mut output, "Hours today", &status.effective_ranges);
    if let Some(note) = status
        .override_description
        .as_deref()
        .or(status.exception_note.as_deref())
    {
        field(&mut output, "Note", note);
    }
    if let Some(next_return) = status.next_return {
        field(&mut output, "Returns", next_return);
    }
    match status.next_change {
        Some(at) => field(&mut output, "Next change", at.format(INSTANT_FORMAT)),
        None => field(&mut output, "Next change", "none scheduled"),
    }
    if !status.is_open_now {
        if let Some(at) = report.next_opening {
            field(&mut output, "Next opening", at.format(INSTANT_FORMAT));
        }
    }

    output
}

/// Format a status report as JSON.
pub fn format_status_json(report: &StatusReport) -> Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}

fn field(output: &mut String, label: &str, value: impl std::fmt::Display) {
    writeln!(output, "{:<14}{value}", format!("{label}:")).unwrap();
}

pub fn run<W: Write>(
    writer: &mut W,
    db: &Database,
    config: &Config,
    now: DateTime<Utc>,
    json: bool,
) -> Result<()> {
    let report = build_report(db, config, now)?;
    tracing::debug!(category = %report.status.category, open = report.status.is_open_now, "status resolved");

    if json {
        writeln!(writer, "{}", format_status_json(&report)?)?;
    } else {
        write!(writer, "{}", format_status(&report))?;
    }
    Ok(())
}
