use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, Wrap},
    Frame,
};
use crate::clock::Clock;
use crate::format::format_minutes;
use crate::models::TIMESTAMP_FORMAT;
use super::app::{App, InputField, InputMode, MessageKind, ViewMode};

pub fn ui<C: Clock>(f: &mut Frame, app: &mut App<C>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),    // Body
            Constraint::Length(3)  // Help
        ].as_ref())
        .split(f.area());

    match app.view_mode {
        ViewMode::Timer => render_timer(f, app, chunks[0]),
        ViewMode::Logs => render_logs(f, app, chunks[0]),
    }

    let help_text = match app.input_mode {
        InputMode::Normal => match app.view_mode {
            ViewMode::Timer => "q: Quit | n: Name | e: Estimate | s: Start | x: Stop | r: Reset | l: View Logs",
            ViewMode::Logs => "q: Quit | j/k: Scroll | l/Esc: Back",
        },
        InputMode::Editing => "Enter: Save | Esc: Cancel",
    };

    let help = Paragraph::new(help_text)
        .style(Style::default().fg(Color::Gray))
        .block(Block::default().borders(Borders::ALL));

    f.render_widget(help, chunks[1]);

    if app.input_mode == InputMode::Editing {
        let area = centered_rect(60, 3, f.area());
        f.render_widget(Clear, area);

        let title = match app.input_field {
            InputField::Name => "Task Name",
            InputField::Estimate => "Probable Time (minutes)",
            InputField::None => "Edit",
        };

        let input = Paragraph::new(app.input_buffer.as_str())
            .style(Style::default().fg(Color::Yellow))
            .block(Block::default().borders(Borders::ALL).title(title));

        f.render_widget(input, area);
    }

    if let Some(message) = &app.message {
        let area = centered_rect(60, 5, f.area());
        f.render_widget(Clear, area);

        let color = match message.kind {
            MessageKind::Info => Color::Cyan,
            MessageKind::Warning => Color::Yellow,
            MessageKind::Error => Color::Red,
        };
        let popup = Paragraph::new(message.body.as_str())
            .wrap(Wrap { trim: true })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(color))
                    .title(message.title.as_str()),
            );
        f.render_widget(popup, area);
    }
}

fn render_timer<C: Clock>(f: &mut Frame, app: &App<C>, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title("Task and Time Tracking");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // Name
            Constraint::Length(2), // Estimate
            Constraint::Length(3), // Timer
            Constraint::Length(1), // Status
            Constraint::Min(0),
        ].as_ref())
        .split(inner);

    let label = Style::default().fg(Color::Blue);
    let (name, estimate) = match app.timer.task() {
        Some(task) if app.timer.is_running() => (task.name.clone(), task.estimated_minutes.to_string()),
        _ => (app.name_input.clone(), app.estimate_input.clone()),
    };

    f.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled("Task Name: ", label),
            Span::raw(name),
        ])),
        rows[0],
    );
    f.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled("Probable Time (minutes): ", label),
            Span::raw(estimate),
        ])),
        rows[1],
    );

    let clock = Paragraph::new(app.timer.display())
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::Green).add_modifier(Modifier::BOLD))
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(clock, centered_rect(30, 3, rows[2]));

    let status = if app.timer.is_running() {
        "Running"
    } else if app.timer.task().is_some() {
        "Stopped"
    } else {
        "Idle"
    };
    f.render_widget(
        Paragraph::new(status)
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::Gray)),
        rows[3],
    );
}

fn render_logs<C: Clock>(f: &mut Frame, app: &mut App<C>, area: Rect) {
    let rows: Vec<Row> = app
        .logs
        .iter()
        .map(|r| {
            let style = if r.is_within_estimate() {
                Style::default().fg(Color::Green)
            } else {
                Style::default().fg(Color::Red)
            };

            Row::new(vec![
                Cell::from(r.task_name.clone()),
                Cell::from(format!("{} min", r.estimated_minutes)),
                Cell::from(r.start_time.format(TIMESTAMP_FORMAT).to_string()),
                Cell::from(r.end_time.format(TIMESTAMP_FORMAT).to_string()),
                Cell::from(format!("{} min", format_minutes(r.spent_minutes))),
                Cell::from(format!("{} min", format_minutes(r.variance_minutes))),
            ]).style(style)
        })
        .collect();

    let widths = [
        Constraint::Min(20),
        Constraint::Length(10),
        Constraint::Length(20),
        Constraint::Length(20),
        Constraint::Length(12),
        Constraint::Length(12),
    ];

    let table = Table::new(rows, widths)
        .header(Row::new(vec!["Task", "Probable", "Start Time", "End Time", "Spent", "Difference"])
            .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
            .bottom_margin(1))
        .block(Block::default().borders(Borders::ALL).title("Time Logs"))
        .row_highlight_style(Style::default().add_modifier(Modifier::BOLD).bg(Color::DarkGray))
        .highlight_symbol(">> ");

    f.render_stateful_widget(table, area, &mut app.log_state);
}

fn centered_rect(percent_x: u16, height: u16, r: Rect) -> Rect {
    let margin = r.height.saturating_sub(height) / 2;
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(margin),
            Constraint::Length(height),
            Constraint::Length(margin),
        ].as_ref())
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ].as_ref())
        .split(popup_layout[1])[1]
}
