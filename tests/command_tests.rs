use std::io::Cursor;
use std::path::PathBuf;
use std::sync::Mutex;

use chrono::{Local, TimeZone};
use pretty_assertions::assert_eq;
use tasktime::clock::ManualClock;
use tasktime::commands::{cmd_init, cmd_logs, cmd_track, logs_table};
use tasktime::config::{log_file_path, DEFAULT_LOG_FILE, LOG_FILE_ENV};
use tasktime::error::TrackerError;
use tasktime::storage::LogStore;
use tasktime::timer::TaskTimer;
use tempfile::TempDir;

// Tests touching the environment variable must not run concurrently
static ENV_MUTEX: Mutex<()> = Mutex::new(());

fn with_store<F>(f: F)
where
    F: FnOnce(&LogStore),
{
    let dir = TempDir::new().unwrap();
    let store = LogStore::new(dir.path().join("time_log.csv"));
    f(&store);
}

#[test]
fn test_init_creates_log() {
    with_store(|store| {
        cmd_init(store, true).unwrap();
        let rows = store.read_all().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0][0], "Task Name");
    });
}

#[test]
fn test_track_appends_record() {
    with_store(|store| {
        cmd_init(store, true).unwrap();
        let clock = ManualClock::new(Local.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap());
        let mut timer = TaskTimer::with_clock(clock);

        let record = cmd_track(&mut timer, store, "Write report", 60, Cursor::new("\n"), true)
            .unwrap()
            .unwrap();

        assert_eq!(record.spent_minutes, 0.0);
        assert_eq!(record.variance_minutes, -60.0);
        assert!(!timer.is_running());
        let records = store.read_records().unwrap();
        assert_eq!(records, vec![record]);
    });
}

#[test]
fn test_track_rejects_empty_name() {
    with_store(|store| {
        cmd_init(store, true).unwrap();
        let mut timer = TaskTimer::with_clock(ManualClock::new(Local::now()));

        let err = cmd_track(&mut timer, store, "", 30, Cursor::new("\n"), true).unwrap_err();

        assert!(matches!(err, TrackerError::EmptyTaskName));
        assert_eq!(store.read_all().unwrap().len(), 1);
    });
}

#[test]
fn test_logs_missing_file() {
    with_store(|store| {
        let err = cmd_logs(store, false).unwrap_err();
        assert!(err.is_not_found());
    });
}

#[test]
fn test_logs_table_has_one_row_per_record() {
    with_store(|store| {
        cmd_init(store, true).unwrap();
        let clock = ManualClock::new(Local.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap());
        let mut timer = TaskTimer::with_clock(clock);
        for name in ["one", "two", "three"] {
            cmd_track(&mut timer, store, name, 10, Cursor::new("\n"), true).unwrap();
        }

        let records = store.read_records().unwrap();
        let table = logs_table(&records);

        assert_eq!(table.row_iter().count(), 3);
        assert!(table.to_string().contains("three"));
        assert!(cmd_logs(store, true).is_ok());
    });
}

#[test]
fn test_log_file_path_resolution() {
    let _guard = ENV_MUTEX.lock().unwrap();

    std::env::remove_var(LOG_FILE_ENV);
    assert_eq!(log_file_path(None), PathBuf::from(DEFAULT_LOG_FILE));

    std::env::set_var(LOG_FILE_ENV, "/tmp/from-env.csv");
    assert_eq!(log_file_path(None), PathBuf::from("/tmp/from-env.csv"));
    assert_eq!(
        log_file_path(Some(PathBuf::from("flag.csv"))),
        PathBuf::from("flag.csv")
    );

    std::env::remove_var(LOG_FILE_ENV);
}
