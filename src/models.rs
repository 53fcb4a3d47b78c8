use chrono::{DateTime, Local, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::error::{Result, TrackerError};
use crate::format::format_minutes;

/// Estimate used when the user does not enter one.
pub const DEFAULT_ESTIMATE_MINUTES: i64 = 60;

/// Timestamp layout used in the log file.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Column names of the log file, in column order.
pub const LOG_HEADER: [&str; 6] = [
    "Task Name",
    "Probable Time (minutes)",
    "Start Time",
    "End Time",
    "Time Spent (minutes)",
    "Time Difference (minutes)",
];

/// The task currently being timed. Lives only in memory.
#[derive(Debug, Clone, PartialEq)]
pub struct Task {
    /// Name as entered by the user.
    pub name: String,
    /// How long the user expects the task to take.
    pub estimated_minutes: i64,
    /// Instant the timer was started.
    pub started_at: DateTime<Local>,
}

/// One completed task, as written to the log file.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct LogRecord {
    pub task_name: String,
    pub estimated_minutes: i64,
    #[serde(with = "timestamp")]
    pub start_time: NaiveDateTime,
    #[serde(with = "timestamp")]
    pub end_time: NaiveDateTime,
    /// Minutes between start and end, rounded to two places.
    pub spent_minutes: f64,
    /// `spent_minutes - estimated_minutes`; zero or negative means on budget.
    pub variance_minutes: f64,
}

impl LogRecord {
    /// Whether the task finished within its estimate.
    pub fn is_within_estimate(&self) -> bool {
        self.variance_minutes <= 0.0
    }

    /// The six CSV fields in column order.
    pub fn to_row(&self) -> [String; 6] {
        [
            self.task_name.clone(),
            self.estimated_minutes.to_string(),
            self.start_time.format(TIMESTAMP_FORMAT).to_string(),
            self.end_time.format(TIMESTAMP_FORMAT).to_string(),
            format_minutes(self.spent_minutes),
            format_minutes(self.variance_minutes),
        ]
    }

    /// Parses a data row read back from the log file.
    ///
    /// `line` is the 1-based row number, used only for error messages.
    pub fn from_row(line: usize, row: &[String]) -> Result<LogRecord> {
        let malformed = |reason: String| TrackerError::MalformedRow { line, reason };

        if row.len() != LOG_HEADER.len() {
            return Err(malformed(format!(
                "expected {} fields, found {}",
                LOG_HEADER.len(),
                row.len()
            )));
        }

        let estimated_minutes = row[1]
            .trim()
            .parse::<i64>()
            .map_err(|e| malformed(format!("bad estimate '{}': {}", row[1], e)))?;
        let start_time = NaiveDateTime::parse_from_str(row[2].trim(), TIMESTAMP_FORMAT)
            .map_err(|e| malformed(format!("bad start time '{}': {}", row[2], e)))?;
        let end_time = NaiveDateTime::parse_from_str(row[3].trim(), TIMESTAMP_FORMAT)
            .map_err(|e| malformed(format!("bad end time '{}': {}", row[3], e)))?;
        let spent_minutes = row[4]
            .trim()
            .parse::<f64>()
            .map_err(|e| malformed(format!("bad time spent '{}': {}", row[4], e)))?;
        let variance_minutes = row[5]
            .trim()
            .parse::<f64>()
            .map_err(|e| malformed(format!("bad time difference '{}': {}", row[5], e)))?;

        Ok(LogRecord {
            task_name: row[0].clone(),
            estimated_minutes,
            start_time,
            end_time,
            spent_minutes,
            variance_minutes,
        })
    }
}

mod timestamp {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    use super::TIMESTAMP_FORMAT;

    pub fn serialize<S: Serializer>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&value.format(TIMESTAMP_FORMAT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDateTime, D::Error> {
        let s = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(&s, TIMESTAMP_FORMAT).map_err(serde::de::Error::custom)
    }
}
