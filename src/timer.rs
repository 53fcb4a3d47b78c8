use chrono::{Duration, SubsecRound};
use tracing::{debug, info};

use crate::clock::{Clock, SystemClock};
use crate::error::{Result, TrackerError};
use crate::format::{duration_to_minutes, format_elapsed, round_minutes};
use crate::models::{LogRecord, Task, DEFAULT_ESTIMATE_MINUTES};

/// Times one task at a time: `Idle -> Running -> Idle`.
///
/// The task stays attached after `stop` so the final elapsed time can still
/// be shown; `reset` drops it.
pub struct TaskTimer<C: Clock = SystemClock> {
    clock: C,
    task: Option<Task>,
    running: bool,
    final_elapsed: Option<Duration>,
}

impl TaskTimer<SystemClock> {
    pub fn new() -> Self {
        TaskTimer::with_clock(SystemClock)
    }
}

impl Default for TaskTimer<SystemClock> {
    fn default() -> Self {
        TaskTimer::new()
    }
}

impl<C: Clock> TaskTimer<C> {
    pub fn with_clock(clock: C) -> Self {
        TaskTimer {
            clock,
            task: None,
            running: false,
            final_elapsed: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// The running or just stopped task, if any.
    pub fn task(&self) -> Option<&Task> {
        self.task.as_ref()
    }

    /// Starts timing `name`.
    ///
    /// Fails without touching any state if the name is blank or a task is
    /// already running.
    pub fn start(&mut self, name: &str, estimated_minutes: i64) -> Result<()> {
        if name.trim().is_empty() {
            return Err(TrackerError::EmptyTaskName);
        }
        if self.running {
            return Err(TrackerError::AlreadyRunning);
        }

        let started_at = self.clock.now();
        info!(task = name, estimated_minutes, %started_at, "task started");
        self.task = Some(Task {
            name: name.to_string(),
            estimated_minutes,
            started_at,
        });
        self.running = true;
        self.final_elapsed = None;
        Ok(())
    }

    /// Time since start. `None` unless running.
    pub fn elapsed(&self) -> Option<Duration> {
        if !self.running {
            return None;
        }
        self.task
            .as_ref()
            .map(|task| self.clock.now() - task.started_at)
    }

    /// Stops the running task and returns its log record.
    ///
    /// Does nothing and returns `None` when idle. Persisting the record is
    /// up to the caller.
    pub fn stop(&mut self) -> Option<LogRecord> {
        if !self.running {
            debug!("stop ignored, no task running");
            return None;
        }
        let task = self.task.as_ref()?;

        let ended_at = self.clock.now();
        self.running = false;

        let elapsed = ended_at - task.started_at;
        self.final_elapsed = Some(elapsed);

        let spent_minutes = duration_to_minutes(elapsed);
        let variance_minutes = round_minutes(spent_minutes - task.estimated_minutes as f64);

        let record = LogRecord {
            task_name: task.name.clone(),
            estimated_minutes: task.estimated_minutes,
            start_time: task.started_at.naive_local().trunc_subsecs(0),
            end_time: ended_at.naive_local().trunc_subsecs(0),
            spent_minutes,
            variance_minutes,
        };
        info!(
            task = %record.task_name,
            spent_minutes,
            variance_minutes,
            "task stopped"
        );
        Some(record)
    }

    /// Returns to idle, discarding any running task without logging it.
    pub fn reset(&mut self) {
        if self.running {
            if let Some(task) = &self.task {
                info!(task = %task.name, "running task discarded");
            }
        }
        self.task = None;
        self.running = false;
        self.final_elapsed = None;
    }

    /// The `HH:MM:SS` timer text: live while running, frozen after stop,
    /// zero when idle.
    pub fn display(&self) -> String {
        let elapsed = self
            .elapsed()
            .or(self.final_elapsed)
            .unwrap_or_else(Duration::zero);
        format_elapsed(elapsed)
    }
}

/// Parses the estimate field: whole, non-negative minutes. Blank input means
/// the default estimate.
pub fn parse_estimate(text: &str) -> Result<i64> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Ok(DEFAULT_ESTIMATE_MINUTES);
    }
    match trimmed.parse::<i64>() {
        Ok(minutes) if minutes >= 0 => Ok(minutes),
        _ => Err(TrackerError::InvalidEstimate(text.to_string())),
    }
}
