use std::path::PathBuf;
use thiserror::Error;

/// Everything that can go wrong while timing a task or touching the log file.
#[derive(Error, Debug)]
pub enum TrackerError {
    #[error("Please enter a task name.")]
    EmptyTaskName,

    #[error("Invalid estimate '{0}': expected a whole number of minutes")]
    InvalidEstimate(String),

    #[error("A task is already running. Stop or reset it first.")]
    AlreadyRunning,

    #[error("No log file found at {}. Start a task first.", .0.display())]
    LogNotFound(PathBuf),

    #[error("Failed to access log file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to process log file {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Malformed log row {line}: {reason}")]
    MalformedRow { line: usize, reason: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl TrackerError {
    /// Errors caused by user input rather than the environment.
    ///
    /// The UI shows these as warnings and leaves all state untouched.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            TrackerError::EmptyTaskName
                | TrackerError::InvalidEstimate(_)
                | TrackerError::AlreadyRunning
        )
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, TrackerError::LogNotFound(_))
    }
}

pub type Result<T> = std::result::Result<T, TrackerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_failures_convert() {
        let source = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: TrackerError = source.into();
        assert!(matches!(err, TrackerError::Json(_)));
        assert!(err.to_string().starts_with("JSON error:"));
        assert!(!err.is_validation());
    }
}
