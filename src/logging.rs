use std::path::Path;

use anyhow::Result;
use tracing::level_filters::LevelFilter;
use tracing_appender::rolling::Rotation;
use tracing_subscriber::fmt::writer::MakeWriterExt;
use tracing_subscriber::EnvFilter;

/// Maps the `-v` count to a level. `None` leaves it to `RUST_LOG`.
pub fn level_from_verbosity(verbose: u8) -> Option<LevelFilter> {
    match verbose {
        0 => None,
        1 => Some(LevelFilter::DEBUG),
        _ => Some(LevelFilter::TRACE),
    }
}

/// Installs the global subscriber.
///
/// Events always go to a daily file under `<data_dir>/logs`. With
/// `show_stderr` they are echoed to stderr too, which the terminal UI must
/// not do.
pub fn enable_logging(data_dir: &Path, level: Option<LevelFilter>, show_stderr: bool) -> Result<()> {
    let appender = tracing_appender::rolling::Builder::new()
        .rotation(Rotation::DAILY)
        .max_log_files(5)
        .filename_prefix("tasktime")
        .filename_suffix("log")
        .build(data_dir.join("logs"))?;

    let stderr = std::io::stderr.with_filter(move |_| show_stderr);

    let crate_name = env!("CARGO_PKG_NAME").replace('-', "_");
    let filter = match level {
        Some(level) => EnvFilter::new(format!("{crate_name}={level}")),
        None => EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(format!("{crate_name}=info"))),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(stderr.and(appender))
        .init();
    Ok(())
}
