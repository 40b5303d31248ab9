//! Storage layer for clinic schedules.
//!
//! Persists the weekly template, the exception calendar and the status
//! override history using `rusqlite`, and hands the engine an immutable
//! [`ScheduleSnapshot`].
//!
//! # Thread Safety
//!
//! The [`Database`] type wraps a `rusqlite::Connection`, which is `Send` but not `Sync`.
//! A `Database` can be moved between threads but not shared; open one per
//! request or wrap it in a `Mutex`.
//!
//! # Schema
//!
//! ## Text Formats
//!
//! - Dates are `YYYY-MM-DD`.
//! - Timestamps are RFC 3339 UTC with milliseconds (e.g. `2025-09-15T01:30:00.000Z`),
//!   so lexicographic order matches chronological order.
//! - Time ranges use the comma-separated form accepted by
//!   [`TimeRangeSet::parse_list`] (`08:30-12:00, 13:00-16:00` or `closed`).
//!
//! ## Override History
//!
//! Status overrides are append-only. Clearing an override inserts an `open`
//! record; the current override is computed by
//! [`clinic_core::current_override`].
//!
//! Rows that fail the engine's validation are reported as
//! [`DbError::InvalidRow`], never skipped.

use std::path::Path;

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc, Weekday};
use clinic_core::{
    Exception, ExceptionCalendar, ExceptionHours, ExceptionId, Recurrence, ScheduleSnapshot,
    StatusOverride, StatusType, TimeRangeSet, ValidationError, WEEKDAYS, WeeklyTemplate,
    current_override, parse_date,
};
use rusqlite::{Connection, OptionalExtension, params};
use thiserror::Error;

/// Database errors.
#[derive(Debug, Error)]
pub enum DbError {
    /// An error from the underlying database.
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    /// A stored row does not describe valid schedule data.
    #[error("invalid {table} row {key}: {message}")]
    InvalidRow {
        table: &'static str,
        key: String,
        message: String,
    },
    /// Data rejected before it was written.
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// Database connection wrapper.
///
/// See the [module documentation](self) for thread safety considerations.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Opens a database at the given path, creating it if necessary.
    ///
    /// The database schema is automatically initialized on first open.
    pub fn open(path: &Path) -> Result<Self, DbError> {
        let conn = Connection::open(path)?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    /// Opens an in-memory database.
    ///
    /// Useful for testing. The database is destroyed when the connection closes.
    pub fn open_in_memory() -> Result<Self, DbError> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    /// Initializes the database schema.
    ///
    /// This is idempotent - safe to call on an already-initialized database.
    fn init(&self) -> Result<(), DbError> {
        self.conn.execute_batch(
            "
            -- One row per weekday, 0 = Monday .. 6 = Sunday; missing rows mean closed.
            CREATE TABLE IF NOT EXISTS weekly_hours (
                weekday INTEGER PRIMARY KEY CHECK (weekday BETWEEN 0 AND 6),
                ranges TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS exceptions (
                id TEXT PRIMARY KEY,
                date TEXT NOT NULL,
                end_date TEXT,
                closed INTEGER NOT NULL,
                time_ranges TEXT,
                recurring INTEGER NOT NULL DEFAULT 0,
                recurring_pattern TEXT,
                note TEXT,
                created_at TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_exceptions_date ON exceptions(date);

            -- Append-only history; the latest row by updated_at is authoritative.
            CREATE TABLE IF NOT EXISTS status_overrides (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                status_type TEXT NOT NULL,
                date_from TEXT,
                date_to TEXT,
                description TEXT,
                next_return TEXT,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_status_overrides_updated ON status_overrides(updated_at);
            ",
        )?;
        tracing::debug!("database schema initialized");
        Ok(())
    }

    // ========== Weekly Hours ==========

    /// Loads the weekly template; weekdays without a row are closed.
    pub fn load_weekly_template(&self) -> Result<WeeklyTemplate, DbError> {
        let mut stmt = self
            .conn
            .prepare("SELECT weekday, ranges FROM weekly_hours ORDER BY weekday ASC")?;
        let rows = stmt.query_map([], |row| {
            let weekday: i64 = row.get(0)?;
            let ranges: String = row.get(1)?;
            Ok((weekday, ranges))
        })?;

        let mut template = WeeklyTemplate::new();
        for row in rows {
            let (index, raw) = row?;
            let key = index.to_string();
            let weekday = usize::try_from(index)
                .ok()
                .and_then(|i| WEEKDAYS.get(i).copied())
                .ok_or_else(|| invalid_row("weekly_hours", &key, "weekday out of range"))?;
            let ranges = TimeRangeSet::parse_list(&raw)
                .map_err(|e| invalid_row("weekly_hours", &key, e))?;
            template.set_ranges_for(weekday, ranges);
        }
        Ok(template)
    }

    /// Replaces the hours for one weekday.
    pub fn set_weekly_hours(
        &mut self,
        weekday: Weekday,
        ranges: &TimeRangeSet,
    ) -> Result<(), DbError> {
        self.conn.execute(
            "
            INSERT INTO weekly_hours (weekday, ranges, updated_at)
            VALUES (?, ?, ?)
            ON CONFLICT(weekday) DO UPDATE SET
                ranges = excluded.ranges,
                updated_at = excluded.updated_at
            ",
            params![
                weekday_index(weekday),
                ranges.to_string(),
                format_timestamp(Utc::now())
            ],
        )?;
        tracing::debug!(%weekday, %ranges, "weekly hours updated");
        Ok(())
    }

    /// Replaces all seven weekdays in one transaction.
    pub fn set_weekly_template(&mut self, template: &WeeklyTemplate) -> Result<(), DbError> {
        let updated_at = format_timestamp(Utc::now());
        let tx = self.conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                "
                INSERT INTO weekly_hours (weekday, ranges, updated_at)
                VALUES (?, ?, ?)
                ON CONFLICT(weekday) DO UPDATE SET
                    ranges = excluded.ranges,
                    updated_at = excluded.updated_at
                ",
            )?;
            for (weekday, ranges) in template.iter() {
                stmt.execute(params![
                    weekday_index(weekday),
                    ranges.to_string(),
                    updated_at
                ])?;
            }
        }
        tx.commit()?;
        tracing::debug!("weekly template replaced");
        Ok(())
    }

    // ========== Exceptions ==========

    /// Stores a new exception after validating it.
    pub fn insert_exception(&mut self, exception: &Exception) -> Result<(), DbError> {
        exception.validate()?;

        let exists = self
            .conn
            .query_row(
                "SELECT 1 FROM exceptions WHERE id = ?",
                [exception.id.as_str()],
                |_| Ok(()),
            )
            .optional()?
            .is_some();
        if exists {
            return Err(ValidationError::DuplicateException {
                id: exception.id.clone(),
            }
            .into());
        }

        let (closed, time_ranges) = match &exception.hours {
            ExceptionHours::Closed => (true, None),
            ExceptionHours::Special(ranges) => (false, Some(ranges.to_string())),
        };
        self.conn.execute(
            "
            INSERT INTO exceptions
            (id, date, end_date, closed, time_ranges, recurring, recurring_pattern, note, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            ",
            params![
                exception.id.as_str(),
                exception.date.to_string(),
                exception.end_date.map(|d| d.to_string()),
                closed,
                time_ranges,
                exception.recurrence.is_some(),
                exception.recurrence.map(|r| r.as_str()),
                exception.note,
                format_timestamp(exception.created_at),
            ],
        )?;
        tracing::debug!(id = %exception.id, date = %exception.date, "exception stored");
        Ok(())
    }

    /// Deletes an exception, returning whether it existed.
    pub fn delete_exception(&mut self, id: &ExceptionId) -> Result<bool, DbError> {
        let deleted = self
            .conn
            .execute("DELETE FROM exceptions WHERE id = ?", [id.as_str()])?;
        Ok(deleted > 0)
    }

    /// Lists exceptions ordered by date then ID.
    pub fn list_exceptions(&self) -> Result<Vec<Exception>, DbError> {
        let mut stmt = self.conn.prepare(
            "
            SELECT id, date, end_date, closed, time_ranges, recurring, recurring_pattern, note, created_at
            FROM exceptions
            ORDER BY date ASC, id ASC
            ",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(ExceptionRow {
                id: row.get(0)?,
                date: row.get(1)?,
                end_date: row.get(2)?,
                closed: row.get(3)?,
                time_ranges: row.get(4)?,
                recurring: row.get(5)?,
                recurring_pattern: row.get(6)?,
                note: row.get(7)?,
                created_at: row.get(8)?,
            })
        })?;
        let mut exceptions = Vec::new();
        for row in rows {
            exceptions.push(row?.into_exception()?);
        }
        Ok(exceptions)
    }

    /// Loads all exceptions into a calendar.
    pub fn load_exception_calendar(&self) -> Result<ExceptionCalendar, DbError> {
        Ok(ExceptionCalendar::from_exceptions(self.list_exceptions()?)?)
    }

    // ========== Status Overrides ==========

    /// Appends an override to the history, returning its row ID.
    pub fn insert_status_override(&mut self, status: &StatusOverride) -> Result<i64, DbError> {
        status.validate()?;
        self.conn.execute(
            "
            INSERT INTO status_overrides
            (status_type, date_from, date_to, description, next_return, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            ",
            params![
                status.status_type.as_str(),
                status.date_from.map(|d| d.to_string()),
                status.date_to.map(|d| d.to_string()),
                status.description,
                status.next_return.map(|d| d.to_string()),
                format_timestamp(status.created_at),
                format_timestamp(status.updated_at),
            ],
        )?;
        let id = self.conn.last_insert_rowid();
        tracing::debug!(id, status = %status.status_type, "status override stored");
        Ok(id)
    }

    /// Supersedes the current override with an `open` record.
    pub fn clear_status_override(&mut self, at: DateTime<Utc>) -> Result<i64, DbError> {
        self.insert_status_override(&StatusOverride::open().with_timestamps(at, at))
    }

    /// Lists the full override history in insertion order.
    pub fn list_status_overrides(&self) -> Result<Vec<StatusOverride>, DbError> {
        let mut stmt = self.conn.prepare(
            "
            SELECT id, status_type, date_from, date_to, description, next_return, created_at, updated_at
            FROM status_overrides
            ORDER BY id ASC
            ",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(OverrideRow {
                id: row.get(0)?,
                status_type: row.get(1)?,
                date_from: row.get(2)?,
                date_to: row.get(3)?,
                description: row.get(4)?,
                next_return: row.get(5)?,
                created_at: row.get(6)?,
                updated_at: row.get(7)?,
            })
        })?;
        let mut history = Vec::new();
        for row in rows {
            history.push(row?.into_override()?);
        }
        Ok(history)
    }

    /// The authoritative override for `today`, if one is in force or pending.
    pub fn current_status_override(
        &self,
        today: NaiveDate,
    ) -> Result<Option<StatusOverride>, DbError> {
        let history = self.list_status_overrides()?;
        Ok(current_override(&history, today).cloned())
    }

    /// Loads every resolver input in one pass.
    pub fn load_snapshot(&self, today: NaiveDate) -> Result<ScheduleSnapshot, DbError> {
        let template = self.load_weekly_template()?;
        let exceptions = self.load_exception_calendar()?;
        let history = self.list_status_overrides()?;
        Ok(ScheduleSnapshot::from_history(
            template,
            exceptions,
            &history,
            today,
        ))
    }
}

/// Raw `exceptions` row before validation.
struct ExceptionRow {
    id: String,
    date: String,
    end_date: Option<String>,
    closed: bool,
    time_ranges: Option<String>,
    recurring: bool,
    recurring_pattern: Option<String>,
    note: Option<String>,
    created_at: String,
}

impl ExceptionRow {
    fn into_exception(self) -> Result<Exception, DbError> {
        const TABLE: &str = "exceptions";
        let key = self.id.clone();
        let bad = |message: &dyn std::fmt::Display| invalid_row(TABLE, &key, message);

        let id = ExceptionId::new(self.id).map_err(|e| bad(&e))?;
        let date = parse_date(&self.date).map_err(|e| bad(&e))?;
        let end_date = self
            .end_date
            .as_deref()
            .map(parse_date)
            .transpose()
            .map_err(|e| bad(&e))?;
        let time_ranges = self
            .time_ranges
            .as_deref()
            .map(TimeRangeSet::parse_list)
            .transpose()
            .map_err(|e| bad(&e))?;
        let hours = ExceptionHours::from_fields(date, self.closed, time_ranges).map_err(|e| bad(&e))?;
        let recurrence = match (self.recurring, self.recurring_pattern.as_deref()) {
            (false, _) => None,
            (true, None) => Some(Recurrence::Yearly),
            (true, Some(pattern)) => Some(pattern.parse::<Recurrence>().map_err(|e| bad(&e))?),
        };
        let created_at = parse_timestamp(&self.created_at).map_err(|e| bad(&e))?;

        let exception = Exception {
            id,
            date,
            end_date,
            hours,
            recurrence,
            note: self.note,
            created_at,
        };
        exception.validate().map_err(|e| bad(&e))?;
        Ok(exception)
    }
}

/// Raw `status_overrides` row before validation.
struct OverrideRow {
    id: i64,
    status_type: String,
    date_from: Option<String>,
    date_to: Option<String>,
    description: Option<String>,
    next_return: Option<String>,
    created_at: String,
    updated_at: String,
}

impl OverrideRow {
    fn into_override(self) -> Result<StatusOverride, DbError> {
        const TABLE: &str = "status_overrides";
        let key = self.id.to_string();
        let bad = |message: &dyn std::fmt::Display| invalid_row(TABLE, &key, message);
        let date = |raw: Option<String>| raw.as_deref().map(parse_date).transpose();

        let status = StatusOverride {
            status_type: self
                .status_type
                .parse::<StatusType>()
                .map_err(|e| bad(&e))?,
            date_from: date(self.date_from).map_err(|e| bad(&e))?,
            date_to: date(self.date_to).map_err(|e| bad(&e))?,
            description: self.description,
            next_return: date(self.next_return).map_err(|e| bad(&e))?,
            created_at: parse_timestamp(&self.created_at).map_err(|e| bad(&e))?,
            updated_at: parse_timestamp(&self.updated_at).map_err(|e| bad(&e))?,
        };
        status.validate().map_err(|e| bad(&e))?;
        Ok(status)
    }
}

fn invalid_row(table: &'static str, key: &str, message: impl std::fmt::Display) -> DbError {
    let message = message.to_string();
    tracing::warn!(table, key, %message, "rejecting invalid row");
    DbError::InvalidRow {
        table,
        key: key.to_string(),
        message,
    }
}

fn weekday_index(weekday: Weekday) -> i64 {
    i64::from(weekday.num_days_from_monday())
}

fn parse_timestamp(timestamp: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    DateTime::parse_from_rfc3339(timestamp).map(|parsed| parsed.with_timezone(&Utc))
}

fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    use chrono::TimeZone;
    use clinic_core::Category;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn ts(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 9, day, hour, 0, 0).unwrap()
    }

    fn id(s: &str) -> ExceptionId {
        ExceptionId::new(s).unwrap()
    }

    #[test]
    fn open_in_memory_database() {
        let db = Database::open_in_memory();
        assert!(db.is_ok());
    }

    #[test]
    fn schema_matches_data_model() {
        let db = Database::open_in_memory().expect("open in-memory db");

        assert_eq!(
            table_columns(&db.conn, "weekly_hours"),
            vec!["weekday", "ranges", "updated_at"]
        );
        assert_eq!(
            table_columns(&db.conn, "exceptions"),
            vec![
                "id",
                "date",
                "end_date",
                "closed",
                "time_ranges",
                "recurring",
                "recurring_pattern",
                "note",
                "created_at",
            ]
        );
        assert_eq!(
            table_columns(&db.conn, "status_overrides"),
            vec![
                "id",
                "status_type",
                "date_from",
                "date_to",
                "description",
                "next_return",
                "created_at",
                "updated_at",
            ]
        );

        let indexes = index_names(&db.conn, "exceptions");
        assert!(indexes.contains("idx_exceptions_date"));
    }

    #[test]
    fn init_is_idempotent() {
        let db = Database::open_in_memory().unwrap();
        db.init().unwrap();
        db.init().unwrap();
    }

    #[test]
    fn weekly_hours_roundtrip() {
        let mut db = Database::open_in_memory().unwrap();
        let friday = TimeRangeSet::parse(&["13:00-16:00", "08:30-12:00"]).unwrap();
        db.set_weekly_hours(Weekday::Fri, &friday).unwrap();

        let template = db.load_weekly_template().unwrap();
        assert_eq!(template.hours_for(Weekday::Fri), &friday);
        assert!(template.hours_for(Weekday::Mon).is_empty());

        // Replacing keeps a single row per weekday.
        db.set_weekly_hours(Weekday::Fri, &TimeRangeSet::closed())
            .unwrap();
        let template = db.load_weekly_template().unwrap();
        assert!(template.hours_for(Weekday::Fri).is_empty());
    }

    #[test]
    fn set_weekly_template_writes_every_day() {
        let mut db = Database::open_in_memory().unwrap();
        let template = WeeklyTemplate::new()
            .with_hours(Weekday::Mon, &["08:00-12:00"])
            .unwrap()
            .with_hours(Weekday::Sat, &["09:00-11:00"])
            .unwrap();
        db.set_weekly_template(&template).unwrap();

        assert_eq!(db.load_weekly_template().unwrap(), template);
        let rows: i64 = db
            .conn
            .query_row("SELECT COUNT(*) FROM weekly_hours", [], |row| row.get(0))
            .unwrap();
        assert_eq!(rows, 7);
    }

    #[test]
    fn corrupt_weekly_row_is_reported() {
        let db = Database::open_in_memory().unwrap();
        db.conn
            .execute(
                "INSERT INTO weekly_hours (weekday, ranges, updated_at) VALUES (2, '8:00-12:00', 'x')",
                [],
            )
            .unwrap();

        let err = db.load_weekly_template().unwrap_err();
        assert!(matches!(
            err,
            DbError::InvalidRow {
                table: "weekly_hours",
                ..
            }
        ));
    }

    #[test]
    fn exception_roundtrip() {
        let mut db = Database::open_in_memory().unwrap();
        let songkran = Exception::special_hours(
            date(2025, 4, 13),
            TimeRangeSet::parse(&["09:00-12:00"]).unwrap(),
        )
        .unwrap()
        .through(date(2025, 4, 15))
        .unwrap()
        .yearly()
        .with_note("Songkran")
        .with_id(id("songkran"))
        .with_created_at(ts(1, 8));
        let xmas = Exception::closed(date(2025, 12, 25))
            .with_id(id("xmas"))
            .with_created_at(ts(2, 8));

        db.insert_exception(&xmas).unwrap();
        db.insert_exception(&songkran).unwrap();

        let stored = db.list_exceptions().unwrap();
        assert_eq!(stored, vec![songkran, xmas]);
    }

    #[test]
    fn duplicate_exception_is_rejected() {
        let mut db = Database::open_in_memory().unwrap();
        let first = Exception::closed(date(2025, 1, 1)).with_id(id("ny"));
        db.insert_exception(&first).unwrap();

        let err = db
            .insert_exception(&Exception::closed(date(2025, 1, 2)).with_id(id("ny")))
            .unwrap_err();
        assert!(matches!(
            err,
            DbError::Validation(ValidationError::DuplicateException { .. })
        ));
    }

    #[test]
    fn delete_exception_reports_existence() {
        let mut db = Database::open_in_memory().unwrap();
        db.insert_exception(&Exception::closed(date(2025, 1, 1)).with_id(id("ny")))
            .unwrap();

        assert!(db.delete_exception(&id("ny")).unwrap());
        assert!(!db.delete_exception(&id("ny")).unwrap());
        assert!(db.load_exception_calendar().unwrap().is_empty());
    }

    #[test]
    fn open_exception_without_ranges_is_reported() {
        let db = Database::open_in_memory().unwrap();
        db.conn
            .execute(
                "
                INSERT INTO exceptions (id, date, closed, time_ranges, created_at)
                VALUES ('broken', '2025-05-01', 0, NULL, '2025-01-01T00:00:00.000Z')
                ",
                [],
            )
            .unwrap();

        let err = db.list_exceptions().unwrap_err();
        assert!(
            matches!(&err, DbError::InvalidRow { table: "exceptions", key, .. } if key == "broken")
        );
    }

    #[test]
    fn override_history_and_clear() {
        let mut db = Database::open_in_memory().unwrap();
        let vacation = StatusOverride::new(StatusType::Vacation)
            .between(date(2025, 9, 15), date(2025, 9, 22))
            .unwrap()
            .with_description("Annual leave")
            .with_next_return(date(2025, 9, 23))
            .with_timestamps(ts(1, 8), ts(1, 8));
        db.insert_status_override(&vacation).unwrap();

        assert_eq!(
            db.current_status_override(date(2025, 9, 16)).unwrap(),
            Some(vacation.clone())
        );

        db.clear_status_override(ts(16, 9)).unwrap();
        assert_eq!(db.current_status_override(date(2025, 9, 16)).unwrap(), None);

        let history = db.list_status_overrides().unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0], vacation);
        assert_eq!(history[1].status_type, StatusType::Open);
    }

    #[test]
    fn invalid_override_is_not_written() {
        let mut db = Database::open_in_memory().unwrap();
        let err = db
            .insert_status_override(&StatusOverride::new(StatusType::Other))
            .unwrap_err();
        assert!(matches!(
            err,
            DbError::Validation(ValidationError::UnboundedOverride { .. })
        ));
        assert!(db.list_status_overrides().unwrap().is_empty());
    }

    #[test]
    fn snapshot_combines_all_inputs() {
        let mut db = Database::open_in_memory().unwrap();
        db.set_weekly_hours(
            Weekday::Mon,
            &TimeRangeSet::parse(&["08:00-16:00"]).unwrap(),
        )
        .unwrap();
        db.insert_exception(&Exception::closed(date(2025, 9, 1)).with_id(id("closed")))
            .unwrap();
        db.insert_status_override(
            &StatusOverride::new(StatusType::Training)
                .starting(date(2025, 10, 1))
                .with_timestamps(ts(1, 0), ts(1, 0)),
        )
        .unwrap();

        let snapshot = db.load_snapshot(date(2025, 9, 8)).unwrap();
        assert!(!snapshot.template.hours_for(Weekday::Mon).is_empty());
        assert_eq!(snapshot.exceptions.len(), 1);
        assert_eq!(
            snapshot.status.as_ref().map(|s| s.status_type),
            Some(StatusType::Training)
        );

        let resolver = snapshot.resolver().unwrap();
        assert_eq!(resolver.resolve_on(date(2025, 9, 8)).category, Category::Open);
        assert_eq!(resolver.resolve_on(date(2025, 9, 1)).category, Category::Closed);
        assert_eq!(
            resolver.resolve_on(date(2025, 10, 6)).category,
            Category::Training
        );
    }

    #[test]
    fn data_persists_across_connections() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("clinic.db");
        {
            let mut db = Database::open(&path).unwrap();
            db.set_weekly_hours(Weekday::Tue, &TimeRangeSet::parse(&["09:00-10:00"]).unwrap())
                .unwrap();
        }

        let db = Database::open(&path).unwrap();
        let template = db.load_weekly_template().unwrap();
        assert_eq!(template.hours_for(Weekday::Tue).to_string(), "09:00-10:00");
    }

    fn table_columns(conn: &Connection, table: &str) -> Vec<String> {
        let mut stmt = conn
            .prepare(&format!("PRAGMA table_info({table})"))
            .expect("prepare table_info");
        let rows = stmt
            .query_map([], |row| row.get::<_, String>(1))
            .expect("query table_info");
        rows.map(|row| row.expect("table_info row")).collect()
    }

    fn index_names(conn: &Connection, table: &str) -> HashSet<String> {
        let mut stmt = conn
            .prepare(&format!("PRAGMA index_list({table})"))
            .expect("prepare index_list");
        let rows = stmt
            .query_map([], |row| row.get::<_, String>(1))
            .expect("query index_list");
        rows.map(|row| row.expect("index_list row")).collect()
    }
}
