pub mod app;
pub mod ui;

use std::io;
use std::time::{Duration, Instant};
use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use tracing::{error, info};
use crate::clock::Clock;
use crate::storage::LogStore;
use crate::timer::TaskTimer;
use app::{App, InputField, InputMode, ViewMode};
use ui::ui;

/// How often the elapsed display refreshes while a task runs.
const TICK_RATE: Duration = Duration::from_millis(1000);

pub fn run_tui(store: LogStore) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    info!(path = %store.path().display(), "starting terminal ui");
    let mut app = App::new(TaskTimer::new(), store);

    let res = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = &res {
        error!(error = %err, "terminal ui failed");
    }
    res.map_err(Into::into)
}

fn run_app<B: Backend, C: Clock>(terminal: &mut Terminal<B>, app: &mut App<C>) -> io::Result<()> {
    let mut last_tick = Instant::now();
    loop {
        terminal.draw(|f| ui(f, app))?;

        if let Some(timeout) = app.tick_timeout(TICK_RATE, last_tick.elapsed()) {
            if !event::poll(timeout)? {
                last_tick = Instant::now();
                continue;
            }
        }

        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            if app.message.is_some() {
                app.dismiss_message();
                continue;
            }
            match app.input_mode {
                InputMode::Normal => match app.view_mode {
                    ViewMode::Timer => match key.code {
                        KeyCode::Char('q') => return Ok(()),
                        KeyCode::Char('n') => app.start_edit(InputField::Name),
                        KeyCode::Char('e') => app.start_edit(InputField::Estimate),
                        KeyCode::Char('s') => {
                            app.start_task();
                            last_tick = Instant::now();
                        }
                        KeyCode::Char('x') => app.stop_task(),
                        KeyCode::Char('r') => app.reset(),
                        KeyCode::Char('l') => app.view_logs(),
                        _ => {}
                    },
                    ViewMode::Logs => match key.code {
                        KeyCode::Char('q') => return Ok(()),
                        KeyCode::Down | KeyCode::Char('j') => app.next(),
                        KeyCode::Up | KeyCode::Char('k') => app.previous(),
                        KeyCode::Char('l') | KeyCode::Esc => app.close_logs(),
                        _ => {}
                    },
                },
                InputMode::Editing => match key.code {
                    KeyCode::Enter => app.handle_input(),
                    KeyCode::Esc => app.cancel_edit(),
                    KeyCode::Char(c) => {
                        app.input_buffer.push(c);
                    }
                    KeyCode::Backspace => {
                        app.input_buffer.pop();
                    }
                    _ => {}
                }
            }
        }
    }
}
