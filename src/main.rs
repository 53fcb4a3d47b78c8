//! # Tasktime
//!
//! Time a task against your own estimate and keep a running CSV log of how
//! long things really took.
//!
//! ## Usage
//!
//! ### Interactive Mode (TUI)
//!
//! Run without arguments to open the timer:
//!
//! ```bash
//! tasktime
//! # or explicitly
//! tasktime ui
//! ```
//!
//! #### TUI Key Bindings
//!
//! **Timer View**
//! *   `n`: Edit task name
//! *   `e`: Edit estimate (minutes)
//! *   `s`: Start the task
//! *   `x`: Stop the task and log it
//! *   `r`: Reset (discards a running task)
//! *   `l`: View logged tasks
//! *   `q`: Quit
//!
//! **Log View**
//! *   `j`/`k`: Scroll
//! *   `l`/`Esc`: Back to the timer
//!
//! ### Command Line Interface (CLI)
//!
//! ```bash
//! # Time a task, press Enter when done
//! tasktime track "Write report" --estimate 45
//!
//! # Show the log
//! tasktime logs
//! tasktime logs --json
//! ```
//!
//! ## Data Storage
//!
//! Tasks are appended to `time_log.csv` in the working directory. Override it
//! with `--log-file` or the `TIME_LOG` environment variable. Diagnostic logs
//! go to the local data directory (`~/.local/share/tasktime/logs` on Linux).

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use tasktime::commands::{cmd_init, cmd_logs, cmd_track};
use tasktime::error::TrackerError;
use tasktime::models::DEFAULT_ESTIMATE_MINUTES;
use tasktime::storage::LogStore;
use tasktime::timer::TaskTimer;
use tasktime::tui::run_tui;
use tasktime::{config, logging};

#[derive(Parser)]
#[command(name = "tasktime")]
#[command(about = "Time tasks against an estimate", long_about = None)]
struct Cli {
    /// CSV file that completed tasks are appended to
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,
    /// Increase diagnostic logging (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Time a task; press Enter to stop and log it
    Track {
        /// Task name (quoted if it has spaces)
        name: String,
        /// Probable time in minutes
        #[arg(short, long, default_value_t = DEFAULT_ESTIMATE_MINUTES, value_parser = clap::value_parser!(i64).range(0..))]
        estimate: i64,
    },
    /// Show logged tasks
    Logs {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Create the log file if it does not exist
    Init,
    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
    /// Open interactive TUI
    Ui,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Some(Commands::Completions { shell }) = cli.command {
        let mut cmd = Cli::command();
        generate(shell, &mut cmd, "tasktime", &mut io::stdout());
        return ExitCode::SUCCESS;
    }

    let interactive = matches!(cli.command, None | Some(Commands::Ui));
    match config::data_dir() {
        Ok(dir) => {
            let level = logging::level_from_verbosity(cli.verbose);
            let show_stderr = cli.verbose > 0 && !interactive;
            if let Err(e) = logging::enable_logging(&dir, level, show_stderr) {
                eprintln!("Failed to set up logging: {}", e);
            }
        }
        Err(e) => eprintln!("Failed to create data directory: {}", e),
    }

    let store = LogStore::new(config::log_file_path(cli.log_file));

    let result = match cli.command {
        Some(Commands::Logs { json }) => cmd_logs(&store, json).map_err(anyhow::Error::from),
        Some(Commands::Init) => cmd_init(&store, false).map_err(anyhow::Error::from),
        Some(Commands::Track { name, estimate }) => store
            .ensure_initialized()
            .and_then(|()| {
                let mut timer = TaskTimer::new();
                cmd_track(&mut timer, &store, &name, estimate, io::stdin().lock(), false)
            })
            .map(|_| ())
            .map_err(anyhow::Error::from),
        Some(Commands::Ui) | None => match store.ensure_initialized() {
            Ok(()) => run_tui(store),
            Err(e) => Err(e.into()),
        },
        Some(Commands::Completions { .. }) => Ok(()),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            match e.downcast_ref::<TrackerError>() {
                Some(TrackerError::LogNotFound(_)) => eprintln!("No log file found. Start a task first."),
                _ => eprintln!("Error: {:#}", e),
            }
            ExitCode::FAILURE
        }
    }
}
