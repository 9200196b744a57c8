use std::io;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::*;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Bar, BarChart, BarGroup, Block, Borders, Clear, Paragraph};

use match_result_terminal::chart::{BAR_GAP, BAR_WIDTH, ProbabilityChart, VALUE_SCALE};
use match_result_terminal::logging;
use match_result_terminal::session::{Session, SessionConfig};
use match_result_terminal::state::{AppState, Focus, TeamPicker};

struct App<'s> {
    session: &'s Session,
    state: AppState,
    should_quit: bool,
}

impl<'s> App<'s> {
    fn new(session: &'s Session) -> Self {
        let mut state = AppState::new(session.teams());
        state.push_log(format!(
            "[INFO] Loaded {} rows, {} teams, {} features",
            session.table().len(),
            session.teams().len(),
            session.schema().len()
        ));
        Self {
            session,
            state,
            should_quit: false,
        }
    }

    fn on_key(&mut self, key: KeyEvent) {
        if self.state.help_overlay {
            if matches!(key.code, KeyCode::Char('?') | KeyCode::Esc | KeyCode::Char('q')) {
                self.state.help_overlay = false;
            }
            return;
        }
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Tab | KeyCode::BackTab | KeyCode::Left | KeyCode::Right => {
                self.state.toggle_focus()
            }
            KeyCode::Char('h') => self.state.focus = Focus::Home,
            KeyCode::Char('l') => self.state.focus = Focus::Away,
            KeyCode::Char('j') | KeyCode::Down => self.state.select_next(),
            KeyCode::Char('k') | KeyCode::Up => self.state.select_prev(),
            KeyCode::Char('g') | KeyCode::Home => self.state.select_first(),
            KeyCode::Char('G') | KeyCode::End => self.state.select_last(),
            KeyCode::Enter | KeyCode::Char('p') => self.state.predict(self.session),
            KeyCode::Char('?') => self.state.help_overlay = true,
            _ => {}
        }
    }
}

fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");

    let log_dir = logging::init_file_logging();

    // Load before touching the terminal so startup failures print plainly.
    let config = SessionConfig::from_env();
    let session = Session::load(&config).context("startup failed")?;

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = ratatui::Terminal::new(backend)?;

    let mut app = App::new(&session);
    match &log_dir {
        Some(dir) => app
            .state
            .push_log(format!("[INFO] Logging to {}", dir.display())),
        None => app.state.push_log("[WARN] File logging disabled"),
    }
    let res = run_app(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("error: {err}");
    }
    Ok(())
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App<'_>) -> io::Result<()> {
    let tick_rate = Duration::from_millis(250);
    let mut last_tick = Instant::now();

    loop {
        terminal.draw(|f| ui(f, &app.state))?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.on_key(key);
                }
            }
        }

        if last_tick.elapsed() >= tick_rate {
            last_tick = Instant::now();
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn ui(frame: &mut Frame, state: &AppState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(frame.size());

    let header = Paragraph::new(header_text())
        .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, chunks[0]);

    render_body(frame, chunks[1], state);

    let footer = Paragraph::new(
        "Tab Switch side | j/k/↑/↓ Move | g/G Top/Bottom | Enter/p Predict | ? Help | q Quit",
    )
    .block(Block::default().borders(Borders::TOP));
    frame.render_widget(footer, chunks[2]);

    if state.help_overlay {
        render_help_overlay(frame, frame.size());
    }
}

fn header_text() -> String {
    let line1 = "  .-.  Football Match Result Predictor".to_string();
    let line2 = " /___\\".to_string();
    let line3 = "  |_|".to_string();
    format!("{line1}\n{line2}\n{line3}")
}

fn render_body(frame: &mut Frame, area: Rect, state: &AppState) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(10),
            Constraint::Length(3),
            Constraint::Min(8),
            Constraint::Length(5),
        ])
        .split(area);

    let pickers = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(rows[0]);
    render_picker(
        frame,
        pickers[0],
        "Select the Home Team",
        &state.home,
        state.focus == Focus::Home,
    );
    render_picker(
        frame,
        pickers[1],
        "Select the Away Team",
        &state.away,
        state.focus == Focus::Away,
    );

    let (text, style) = match state.selection_warning() {
        Some(warning) if state.outcome.is_none() && state.failure.is_none() => {
            (warning, Style::default().fg(Color::Red))
        }
        _ => {
            let text = state.result_text();
            let style = if state.failure.is_some() || text.starts_with('❌') {
                Style::default().fg(Color::Red)
            } else if state.chart().is_some() {
                Style::default().add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::DarkGray)
            };
            (text, style)
        }
    };
    let result = Paragraph::new(text)
        .style(style)
        .block(Block::default().title("Result").borders(Borders::ALL));
    frame.render_widget(result, rows[1]);

    match state.chart() {
        Some(chart) => render_chart(frame, rows[2], &chart),
        None => {
            let empty = Paragraph::new("No prediction yet")
                .style(Style::default().fg(Color::DarkGray))
                .block(Block::default().title("Result Probabilities").borders(Borders::ALL));
            frame.render_widget(empty, rows[2]);
        }
    }

    let console = Paragraph::new(console_text(state))
        .block(Block::default().title("Console").borders(Borders::ALL));
    frame.render_widget(console, rows[3]);
}

fn render_picker(frame: &mut Frame, area: Rect, title: &str, picker: &TeamPicker, focused: bool) {
    let border_style = if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };
    let block = Block::default()
        .title(title.to_string())
        .borders(Borders::ALL)
        .border_style(border_style);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if inner.height == 0 || inner.width == 0 {
        return;
    }

    let options = picker.options();
    let (start, end) = visible_range(picker.selected(), options.len(), inner.height as usize);
    for (i, idx) in (start..end).enumerate() {
        let row_area = Rect {
            x: inner.x,
            y: inner.y + i as u16,
            width: inner.width,
            height: 1,
        };
        let selected = idx == picker.selected();
        let prefix = if selected { "> " } else { "  " };
        let style = match (selected, focused) {
            (true, true) => Style::default().fg(Color::White).bg(Color::DarkGray),
            (true, false) => Style::default().add_modifier(Modifier::BOLD),
            _ if idx == 0 => Style::default().fg(Color::DarkGray),
            _ => Style::default(),
        };
        let line = Paragraph::new(format!("{prefix}{}", options[idx])).style(style);
        frame.render_widget(line, row_area);
    }
}

fn render_chart(frame: &mut Frame, area: Rect, chart: &ProbabilityChart) {
    let block = Block::default()
        .title(chart.title.clone())
        .borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let parts = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(inner);

    let colors = [Color::Green, Color::Yellow, Color::Red];
    let bars = chart
        .bars
        .iter()
        .zip(colors)
        .map(|(bar, color)| {
            Bar::default()
                .value(bar.value)
                .label(bar.label.into())
                .text_value(String::new())
                .style(Style::default().fg(color))
        })
        .collect::<Vec<_>>();

    let widget = BarChart::default()
        .data(BarGroup::default().bars(&bars))
        .bar_width(BAR_WIDTH)
        .bar_gap(BAR_GAP)
        .max(chart.max);
    frame.render_widget(widget, parts[0]);

    let values =
        Paragraph::new(chart.value_row()).style(Style::default().add_modifier(Modifier::BOLD));
    frame.render_widget(values, parts[1]);

    let axis = Paragraph::new(format!(
        "{}: 0 to {:.1}   |   {}",
        chart.y_label,
        chart.max as f64 / VALUE_SCALE,
        chart.x_label
    ))
    .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(axis, parts[2]);
}

fn visible_range(selected: usize, total: usize, visible: usize) -> (usize, usize) {
    if total == 0 {
        return (0, 0);
    }
    if total <= visible {
        return (0, total);
    }

    let mut start = selected.saturating_sub(visible / 2);
    if start + visible > total {
        start = total - visible;
    }
    (start, start + visible)
}

fn console_text(state: &AppState) -> String {
    if state.logs.is_empty() {
        return "No alerts yet".to_string();
    }
    let skip = state.logs.len().saturating_sub(3);
    state
        .logs
        .iter()
        .skip(skip)
        .cloned()
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 60, area);
    frame.render_widget(Clear, popup_area);

    let text = [
        "Match Result Predictor - Help",
        "",
        "Teams:",
        "  Tab / ←/→    Switch home/away",
        "  h / l        Focus home / away",
        "  j/k or ↑/↓   Move selection",
        "  g / G        First / last entry",
        "",
        "Prediction:",
        "  Enter / p    Predict",
        "",
        "  ?            Toggle help",
        "  q            Quit",
    ]
    .join("\n");

    let help = Paragraph::new(text)
        .block(Block::default().title("Help").borders(Borders::ALL))
        .style(Style::default());
    frame.render_widget(help, popup_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);

    horizontal[1]
}
