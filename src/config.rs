use std::fs;
use std::path::PathBuf;

/// Environment variable that overrides the log file location.
pub const LOG_FILE_ENV: &str = "TIME_LOG";

/// Log file name used when nothing else is configured.
pub const DEFAULT_LOG_FILE: &str = "time_log.csv";

/// Returns the path of the CSV task log.
///
/// The path is determined in the following order:
/// 1. The `--log-file` argument, if given.
/// 2. `TIME_LOG` environment variable.
/// 3. `./time_log.csv`.
pub fn log_file_path(cli_override: Option<PathBuf>) -> PathBuf {
    cli_override
        .or_else(|| std::env::var_os(LOG_FILE_ENV).map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_FILE))
}

/// Returns the directory for the application's own files (diagnostic logs).
///
/// `~/.local/share/tasktime` on Linux, falling back to `./.tasktime`.
pub fn data_dir() -> std::io::Result<PathBuf> {
    let p = dirs::data_local_dir()
        .map(|p| p.join("tasktime"))
        .unwrap_or_else(|| PathBuf::from(".tasktime"));
    fs::create_dir_all(&p)?;
    Ok(p)
}
