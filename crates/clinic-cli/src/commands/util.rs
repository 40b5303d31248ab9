//! Shared utilities for CLI commands.

use std::sync::LazyLock;

use anyhow::Context;
use chrono::{DateTime, Duration, Utc};
use regex::Regex;

/// Pre-compiled regex for relative time parsing.
static RELATIVE_TIME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<future>in\s+)?(?P<n>\d+)\s+(?P<unit>minute|hour|day|week)s?(?P<past>\s+ago)?$")
        .unwrap()
});

/// Conservative bounds for relative time parsing (~1000 years in minutes).
const MAX_RELATIVE_MINUTES: i64 = 1000 * 365 * 24 * 60;

/// Parse an instant as RFC 3339 or as a time relative to `now`.
///
/// Supports:
/// - RFC 3339: "2025-09-19T09:00:00+07:00"
/// - Past: "2 hours ago", "1 day ago"
/// - Future: "in 30 minutes", "in 1 week"
pub fn parse_instant(s: &str, now: DateTime<Utc>) -> anyhow::Result<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }

    let Some(caps) = RELATIVE_TIME_RE.captures(s) else {
        anyhow::bail!(
            "Invalid time: {s}. Use RFC 3339 (e.g., 2025-09-19T09:00:00+07:00) or relative (e.g., '2 hours ago', 'in 3 days')"
        );
    };

    let future = caps.name("future").is_some();
    let past = caps.name("past").is_some();
    if future == past {
        anyhow::bail!("Invalid time: {s}. Say either 'in N units' or 'N units ago'");
    }

    let n: i64 = caps["n"]
        .parse()
        .context("failed to parse number in relative time")?;

    let (max_for_unit, minutes_per_unit) = match &caps["unit"] {
        "minute" => (MAX_RELATIVE_MINUTES, 1),
        "hour" => (MAX_RELATIVE_MINUTES / 60, 60),
        "day" => (MAX_RELATIVE_MINUTES / (60 * 24), 60 * 24),
        "week" => (MAX_RELATIVE_MINUTES / (60 * 24 * 7), 60 * 24 * 7),
        unit => anyhow::bail!("Unknown time unit: {unit}"),
    };

    if n > max_for_unit {
        anyhow::bail!("Relative time value too large: {n} {}", &caps["unit"]);
    }

    let offset = Duration::minutes(n * minutes_per_unit);
    Ok(if future { now + offset } else { now - offset })
}

/// Renders an optional value, falling back to `-`.
pub fn or_dash<T: ToString>(value: Option<T>) -> String {
    value.map_or_else(|| "-".to_string(), |v| v.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 9, 19, 2, 0, 0).unwrap()
    }

    #[test]
    fn parses_rfc3339_with_offset() {
        let at = parse_instant("2025-09-19T09:00:00+07:00", now()).unwrap();
        assert_eq!(at, Utc.with_ymd_and_hms(2025, 9, 19, 2, 0, 0).unwrap());
    }

    #[test]
    fn parses_relative_past_and_future() {
        assert_eq!(
            parse_instant("2 hours ago", now()).unwrap(),
            now() - Duration::hours(2)
        );
        assert_eq!(
            parse_instant("in 3 days", now()).unwrap(),
            now() + Duration::days(3)
        );
        assert_eq!(
            parse_instant("in 1 week", now()).unwrap(),
            now() + Duration::weeks(1)
        );
    }

    #[test]
    fn rejects_ambiguous_or_malformed_input() {
        assert!(parse_instant("3 days", now()).is_err());
        assert!(parse_instant("in 3 days ago", now()).is_err());
        assert!(parse_instant("tomorrow", now()).is_err());
        assert!(parse_instant("2025-09-19 09:00", now()).is_err());
    }

    #[test]
    fn rejects_values_beyond_bounds() {
        assert!(parse_instant("in 99999999 weeks", now()).is_err());
    }

    #[test]
    fn or_dash_renders_missing_values() {
        assert_eq!(or_dash(None::<String>), "-");
        assert_eq!(or_dash(Some(7)), "7");
    }
}
