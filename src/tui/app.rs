use std::time::Duration;

use ratatui::widgets::TableState;
use tracing::error;

use crate::clock::{Clock, SystemClock};
use crate::error::TrackerError;
use crate::models::{LogRecord, DEFAULT_ESTIMATE_MINUTES};
use crate::storage::LogStore;
use crate::timer::{parse_estimate, TaskTimer};

#[derive(Debug, PartialEq)]
pub enum InputMode {
    Normal,
    Editing,
}

#[derive(Debug, PartialEq)]
pub enum ViewMode {
    Timer,
    Logs,
}

#[derive(Debug, PartialEq)]
pub enum InputField {
    None,
    Name,
    Estimate,
}

#[derive(Debug, PartialEq)]
pub enum MessageKind {
    Info,
    Warning,
    Error,
}

/// A dismissable popup.
#[derive(Debug, PartialEq)]
pub struct Message {
    pub kind: MessageKind,
    pub title: String,
    pub body: String,
}

impl Message {
    fn new(kind: MessageKind, title: &str, body: impl Into<String>) -> Self {
        Message {
            kind,
            title: title.to_string(),
            body: body.into(),
        }
    }
}

pub struct App<C: Clock = SystemClock> {
    pub timer: TaskTimer<C>,
    pub store: LogStore,
    pub name_input: String,
    pub estimate_input: String,
    pub view_mode: ViewMode,
    pub input_mode: InputMode,
    pub input_field: InputField,
    pub input_buffer: String,
    pub logs: Vec<LogRecord>,
    pub log_state: TableState,
    pub message: Option<Message>,
}

impl<C: Clock> App<C> {
    pub fn new(timer: TaskTimer<C>, store: LogStore) -> App<C> {
        App {
            timer,
            store,
            name_input: String::new(),
            estimate_input: DEFAULT_ESTIMATE_MINUTES.to_string(),
            view_mode: ViewMode::Timer,
            input_mode: InputMode::Normal,
            input_field: InputField::None,
            input_buffer: String::new(),
            logs: Vec::new(),
            log_state: TableState::default(),
            message: None,
        }
    }

    /// Begins editing a task field. Fields are locked while a task runs.
    pub fn start_edit(&mut self, field: InputField) {
        if self.timer.is_running() {
            return;
        }
        self.input_buffer = match field {
            InputField::Name => self.name_input.clone(),
            InputField::Estimate => self.estimate_input.clone(),
            InputField::None => return,
        };
        self.input_field = field;
        self.input_mode = InputMode::Editing;
    }

    /// Commits the edit buffer into the field being edited.
    pub fn handle_input(&mut self) {
        match self.input_field {
            InputField::Name => self.name_input = self.input_buffer.clone(),
            InputField::Estimate => self.estimate_input = self.input_buffer.clone(),
            InputField::None => {}
        }
        self.cancel_edit();
    }

    pub fn cancel_edit(&mut self) {
        self.input_mode = InputMode::Normal;
        self.input_field = InputField::None;
        self.input_buffer.clear();
    }

    /// Starts timing the entered task.
    pub fn start_task(&mut self) {
        let result = parse_estimate(&self.estimate_input)
            .and_then(|estimate| self.timer.start(&self.name_input, estimate));
        if let Err(e) = result {
            self.show_error(e);
        }
    }

    /// Stops the running task and writes it to the log.
    pub fn stop_task(&mut self) {
        let Some(record) = self.timer.stop() else {
            return;
        };
        match self.store.append(&record) {
            Ok(()) => {
                self.message = Some(Message::new(
                    MessageKind::Info,
                    "Task Stopped",
                    format!("Task '{}' logged successfully!", record.task_name),
                ));
            }
            Err(e) => {
                error!(error = %e, "failed to log task");
                self.show_error(e);
            }
        }
    }

    /// Abandons any running task and clears the form.
    pub fn reset(&mut self) {
        self.timer.reset();
        self.name_input.clear();
        self.estimate_input = DEFAULT_ESTIMATE_MINUTES.to_string();
        self.cancel_edit();
    }

    /// Loads the log file and switches to the log view.
    pub fn view_logs(&mut self) {
        match self.store.read_records() {
            Ok(records) if records.is_empty() => {
                self.message = Some(Message::new(MessageKind::Info, "No Logs", "No task logs found."));
            }
            Ok(records) => {
                self.logs = records;
                self.log_state.select(Some(0));
                self.view_mode = ViewMode::Logs;
            }
            Err(e) => self.show_error(e),
        }
    }

    pub fn close_logs(&mut self) {
        self.view_mode = ViewMode::Timer;
    }

    /// Selects the next log row.
    pub fn next(&mut self) {
        if self.logs.is_empty() { return; }
        let i = match self.log_state.selected() {
            Some(i) => {
                if i >= self.logs.len() - 1 {
                    0
                } else {
                    i + 1
                }
            }
            None => 0,
        };
        self.log_state.select(Some(i));
    }

    /// Selects the previous log row.
    pub fn previous(&mut self) {
        if self.logs.is_empty() { return; }
        let i = match self.log_state.selected() {
            Some(i) => {
                if i == 0 {
                    self.logs.len() - 1
                } else {
                    i - 1
                }
            }
            None => 0,
        };
        self.log_state.select(Some(i));
    }

    /// How long the event loop may wait for input before the next display
    /// refresh. `None` when idle: no ticks are scheduled and the loop blocks
    /// until a key arrives.
    pub fn tick_timeout(&self, tick_rate: Duration, since_last_tick: Duration) -> Option<Duration> {
        if self.timer.is_running() {
            Some(tick_rate.saturating_sub(since_last_tick))
        } else {
            None
        }
    }

    pub fn dismiss_message(&mut self) {
        self.message = None;
    }

    fn show_error(&mut self, e: TrackerError) {
        self.message = Some(if e.is_validation() {
            Message::new(MessageKind::Warning, "Warning", e.to_string())
        } else if e.is_not_found() {
            Message::new(MessageKind::Error, "Error", "No log file found. Start a task first.")
        } else {
            Message::new(MessageKind::Error, "Error", e.to_string())
        });
    }
}
