//! End-to-end tests driving the `clinic` binary.
//!
//! Covers the administrative flow (hours → exception → override) and the
//! visitor queries against a database in a temporary HOME.

use std::path::Path;
use std::process::{Command, Output};

use tempfile::TempDir;

fn clinic_binary() -> String {
    env!("CARGO_BIN_EXE_clinic").to_string()
}

/// Runs the binary with an isolated HOME and database.
fn clinic(home: &Path, args: &[&str]) -> Output {
    Command::new(clinic_binary())
        .env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join(".config"))
        .env("XDG_DATA_HOME", home.join(".local/share"))
        .env("CLINIC_DATABASE_PATH", home.join("clinic.db"))
        .env("CLINIC_TIMEZONE", "Asia/Bangkok")
        .env_remove("RUST_LOG")
        .args(args)
        .output()
        .expect("failed to run clinic")
}

fn stdout_of(home: &Path, args: &[&str]) -> String {
    let output = clinic(home, args);
    assert!(
        output.status.success(),
        "clinic {args:?} should succeed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8(output.stdout).unwrap()
}

#[test]
fn test_admin_flow_then_status() {
    let temp = TempDir::new().unwrap();
    let home = temp.path();

    stdout_of(home, &["hours", "set", "friday", "08:30-13:00"]);
    stdout_of(
        home,
        &["hours", "set", "monday", "08:30-12:00, 13:00-16:00"],
    );

    // Friday 2025-09-19 09:00 in Bangkok
    let status = stdout_of(home, &["status", "--at", "2025-09-19T09:00:00+07:00"]);
    assert!(status.contains("Status:       open\n"), "{status}");
    assert!(status.contains("Next change:  2025-09-19 13:00\n"), "{status}");

    // Friday 14:00
    let status = stdout_of(home, &["status", "--at", "2025-09-19T14:00:00+07:00"]);
    assert!(status.contains("Status:       closed\n"), "{status}");
    assert!(status.contains("Next opening: 2025-09-22 08:30\n"), "{status}");

    let id = stdout_of(
        home,
        &[
            "exception",
            "add",
            "--date",
            "2025-09-19",
            "--closed",
            "--note",
            "Staff retreat",
        ],
    );
    let status = stdout_of(home, &["status", "--at", "2025-09-19T09:00:00+07:00"]);
    assert!(status.contains("Status:       closed\n"), "{status}");
    assert!(status.contains("Note:         Staff retreat\n"), "{status}");

    stdout_of(home, &["exception", "remove", id.trim()]);
    let status = stdout_of(home, &["status", "--at", "2025-09-19T09:00:00+07:00"]);
    assert!(status.contains("Status:       open\n"), "{status}");
}

#[test]
fn test_override_outranks_schedule() {
    let temp = TempDir::new().unwrap();
    let home = temp.path();

    stdout_of(home, &["hours", "set", "fri", "08:30-13:00"]);
    stdout_of(
        home,
        &[
            "override",
            "set",
            "vacation",
            "--from",
            "2025-09-15",
            "--to",
            "2025-09-22",
            "--return",
            "2025-09-23",
        ],
    );

    let json = stdout_of(
        home,
        &["status", "--at", "2025-09-19T09:00:00+07:00", "--json"],
    );
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["category"], "vacation");
    assert_eq!(value["is_open_now"], false);
    assert_eq!(value["next_return"], "2025-09-23");
    assert_eq!(value["next_change"], "2025-09-23T00:00:00+07:00");

    stdout_of(home, &["override", "clear"]);
    let status = stdout_of(home, &["status", "--at", "2025-09-19T09:00:00+07:00"]);
    assert!(status.contains("Status:       open\n"), "{status}");
}

#[test]
fn test_month_json_has_every_day() {
    let temp = TempDir::new().unwrap();
    let json = stdout_of(
        temp.path(),
        &["month", "--year", "2025", "--month", "9", "--json"],
    );
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["days"].as_array().unwrap().len(), 30);
    assert_eq!(value["start"], "2025-09-01");
    assert_eq!(value["end"], "2025-09-30");
}

#[test]
fn test_invalid_input_fails_cleanly() {
    let temp = TempDir::new().unwrap();
    let home = temp.path();

    let output = clinic(home, &["hours", "set", "monday", "8:30-12:00"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("8:30-12:00"));

    let output = clinic(home, &["month", "--year", "2025", "--month", "13"]);
    assert!(!output.status.success());

    let output = clinic(home, &["override", "set", "holiday"]);
    assert!(!output.status.success());

    let output = clinic(home, &["exception", "remove", "missing"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("exception not found"));
}
