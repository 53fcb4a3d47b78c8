use std::io::BufRead;

use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, Color, ContentArrangement, Table};
use tracing::warn;

use crate::clock::Clock;
use crate::error::Result;
use crate::format::format_minutes;
use crate::models::{LogRecord, TIMESTAMP_FORMAT};
use crate::storage::LogStore;
use crate::timer::TaskTimer;

/// Creates the log file and its header if they are missing.
pub fn cmd_init(store: &LogStore, silent: bool) -> Result<()> {
    store.ensure_initialized()?;
    if !silent {
        println!("Logging tasks to {}", store.path().display());
    }
    Ok(())
}

/// Times a task from the command line.
///
/// Starts the timer, waits for a line on `input` (Enter on a terminal), stops
/// and appends the record. An input error or EOF also stops the task.
/// Returns `None` if the timer was already idle when input arrived, in which
/// case nothing is logged.
pub fn cmd_track<C: Clock, R: BufRead>(
    timer: &mut TaskTimer<C>,
    store: &LogStore,
    name: &str,
    estimated_minutes: i64,
    mut input: R,
    silent: bool,
) -> Result<Option<LogRecord>> {
    timer.start(name, estimated_minutes)?;
    if let Some(task) = timer.task() {
        if !silent {
            println!(
                "Started '{}' at {} ({} min estimated). Press Enter to stop.",
                task.name,
                task.started_at.format(TIMESTAMP_FORMAT),
                task.estimated_minutes
            );
        }
    }

    let mut line = String::new();
    if let Err(e) = input.read_line(&mut line) {
        warn!(error = %e, "failed to read from input, stopping task");
    }

    let Some(record) = timer.stop() else {
        return Ok(None);
    };
    store.append(&record)?;

    if !silent {
        println!(
            "Task '{}' logged successfully! Spent {} min ({} min {}).",
            record.task_name,
            format_minutes(record.spent_minutes),
            format_minutes(record.variance_minutes.abs()),
            if record.is_within_estimate() { "under estimate" } else { "over estimate" }
        );
    }
    Ok(Some(record))
}

/// Prints every logged task, as a table or as JSON.
pub fn cmd_logs(store: &LogStore, json: bool) -> Result<()> {
    let records = store.read_records()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&records)?);
        return Ok(());
    }

    if records.is_empty() {
        println!("No task logs found.");
        return Ok(());
    }

    println!("{}", logs_table(&records));
    Ok(())
}

/// Builds the table shown by `logs`. Rows finished within the estimate are
/// green, the rest red.
pub fn logs_table(records: &[LogRecord]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("Task").add_attribute(Attribute::Bold),
            Cell::new("Estimate").add_attribute(Attribute::Bold),
            Cell::new("Start").add_attribute(Attribute::Bold),
            Cell::new("End").add_attribute(Attribute::Bold),
            Cell::new("Spent").add_attribute(Attribute::Bold),
            Cell::new("Difference").add_attribute(Attribute::Bold),
        ]);

    for r in records {
        let color = if r.is_within_estimate() { Color::Green } else { Color::Red };
        table.add_row(vec![
            Cell::new(&r.task_name),
            Cell::new(format!("{} min", r.estimated_minutes)),
            Cell::new(r.start_time.format(TIMESTAMP_FORMAT)),
            Cell::new(r.end_time.format(TIMESTAMP_FORMAT)),
            Cell::new(format!("{} min", format_minutes(r.spent_minutes))),
            Cell::new(format!("{} min", format_minutes(r.variance_minutes))).fg(color),
        ]);
    }
    table
}
