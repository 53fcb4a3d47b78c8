use std::fs;

use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use tasktime::error::TrackerError;
use tasktime::models::{LogRecord, LOG_HEADER};
use tasktime::storage::LogStore;
use tempfile::TempDir;

const HEADER_LINE: &str = "Task Name,Probable Time (minutes),Start Time,End Time,Time Spent (minutes),Time Difference (minutes)\r\n";

fn record(name: &str, estimate: i64, spent: f64) -> LogRecord {
    let day = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
    LogRecord {
        task_name: name.to_string(),
        estimated_minutes: estimate,
        start_time: day.and_hms_opt(9, 0, 0).unwrap(),
        end_time: day.and_hms_opt(9, 1, 30).unwrap(),
        spent_minutes: spent,
        variance_minutes: spent - estimate as f64,
    }
}

#[test]
fn test_initialize_writes_header_once() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("time_log.csv");
    let store = LogStore::new(&path);

    store.ensure_initialized().unwrap();
    store.ensure_initialized().unwrap();

    assert_eq!(fs::read_to_string(&path).unwrap(), HEADER_LINE);
}

#[test]
fn test_initialize_keeps_existing_rows() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("time_log.csv");
    let store = LogStore::new(&path);
    store.ensure_initialized().unwrap();
    store.append(&record("Keep me", 60, 1.5)).unwrap();
    let before = fs::read_to_string(&path).unwrap();

    store.ensure_initialized().unwrap();

    assert_eq!(fs::read_to_string(&path).unwrap(), before);
}

#[test]
fn test_initialize_writes_header_into_empty_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("time_log.csv");
    fs::write(&path, "").unwrap();

    LogStore::new(&path).ensure_initialized().unwrap();

    assert_eq!(fs::read_to_string(&path).unwrap(), HEADER_LINE);
}

#[test]
fn test_append_row_format() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("time_log.csv");
    let store = LogStore::new(&path);
    store.ensure_initialized().unwrap();

    store.append(&record("Write report", 60, 1.5)).unwrap();

    let content = fs::read_to_string(&path).unwrap();
    assert_eq!(
        content,
        format!("{HEADER_LINE}Write report,60,2024-03-01 09:00:00,2024-03-01 09:01:30,1.5,-58.5\r\n")
    );
}

#[test]
fn test_names_with_commas_are_quoted() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("time_log.csv");
    let store = LogStore::new(&path);
    store.ensure_initialized().unwrap();

    store.append(&record("Emails, calls and \"stuff\"", 10, 10.0)).unwrap();

    let content = fs::read_to_string(&path).unwrap();
    assert!(content.contains("\"Emails, calls and \"\"stuff\"\"\",10,"));
    let records = store.read_records().unwrap();
    assert_eq!(records[0].task_name, "Emails, calls and \"stuff\"");
}

#[test]
fn test_round_trip_preserves_order_and_fields() {
    let dir = TempDir::new().unwrap();
    let store = LogStore::new(dir.path().join("time_log.csv"));
    store.ensure_initialized().unwrap();

    let written = vec![
        record("First", 60, 1.5),
        record("Second", 30, 0.0),
        record("Third", 5, 12.34),
    ];
    for r in &written {
        store.append(r).unwrap();
    }

    let rows = store.read_all().unwrap();
    assert_eq!(rows.len(), written.len() + 1);
    assert_eq!(rows[0], LOG_HEADER.map(String::from).to_vec());
    for (row, r) in rows[1..].iter().zip(&written) {
        assert_eq!(row.as_slice(), r.to_row().as_slice());
    }

    assert_eq!(store.read_records().unwrap(), written);
}

#[test]
fn test_read_missing_file() {
    let dir = TempDir::new().unwrap();
    let store = LogStore::new(dir.path().join("nope.csv"));

    let err = store.read_all().unwrap_err();

    assert!(matches!(err, TrackerError::LogNotFound(_)));
    assert!(err.is_not_found());
}

#[test]
fn test_reads_existing_lf_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("time_log.csv");
    fs::write(
        &path,
        "Task Name,Probable Time (minutes),Start Time,End Time,Time Spent (minutes),Time Difference (minutes)\n\
         Standup,15,2024-02-01 10:00:00,2024-02-01 10:20:00,20.0,5.0\n",
    )
    .unwrap();

    let records = LogStore::new(&path).read_records().unwrap();

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].task_name, "Standup");
    assert_eq!(records[0].variance_minutes, 5.0);
    assert!(!records[0].is_within_estimate());
}

#[test]
fn test_negative_estimates_from_older_logs_load() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("time_log.csv");
    fs::write(
        &path,
        format!("{HEADER_LINE}Overtime,-15,2024-02-01 10:00:00,2024-02-01 10:10:00,10.0,25.0\r\n"),
    )
    .unwrap();

    let records = LogStore::new(&path).read_records().unwrap();

    assert_eq!(records[0].estimated_minutes, -15);
    assert_eq!(records[0].variance_minutes, 25.0);
}

#[test]
fn test_malformed_row_is_reported() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("time_log.csv");
    fs::write(&path, format!("{HEADER_LINE}Broken,abc\r\n")).unwrap();

    let err = LogStore::new(&path).read_records().unwrap_err();

    assert!(matches!(err, TrackerError::MalformedRow { line: 2, .. }));
}

#[test]
fn test_append_to_unwritable_path_fails() {
    let dir = TempDir::new().unwrap();
    let store = LogStore::new(dir.path().join("missing-dir").join("time_log.csv"));

    let err = store.append(&record("Lost", 10, 1.0)).unwrap_err();

    assert!(matches!(err, TrackerError::Io { .. }));
}
