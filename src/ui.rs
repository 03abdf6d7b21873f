pub mod code;
pub mod question;
pub mod results;
pub mod screen;
pub mod settings_form;

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Gauge, Paragraph, Wrap},
    Frame,
};

use cloudquiz::{scoring::format_clock, session::Interview};

use crate::App;

pub const HORIZONTAL_MARGIN: u16 = 2;
pub const VERTICAL_MARGIN: u16 = 1;

pub fn bold() -> Style {
    Style::default().add_modifier(Modifier::BOLD)
}

pub fn dim() -> Style {
    Style::default().add_modifier(Modifier::DIM)
}

pub fn highlight() -> Style {
    Style::default()
        .fg(Color::Black)
        .bg(Color::Cyan)
        .add_modifier(Modifier::BOLD)
}

pub fn draw(app: &App, f: &mut Frame) {
    screen::current_screen(app.interview.phase()).render(app, f);
}

/// Header, body and footer rows inside the standard margins
pub fn frame_layout(area: Rect, header: u16, footer: u16) -> [Rect; 3] {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints([
            Constraint::Length(header),
            Constraint::Min(1),
            Constraint::Length(footer),
        ])
        .split(area);
    [chunks[0], chunks[1], chunks[2]]
}

/// Candidate, cloud and countdown on one line; the clock turns red near the end
pub fn status_line(interview: &Interview) -> Line<'static> {
    let settings = interview.settings();
    let timer_style = if interview.is_time_running_out() {
        bold().fg(Color::Red)
    } else {
        bold()
    };

    Line::from(vec![
        Span::styled(settings.candidate_name.clone(), bold()),
        Span::styled(
            format!(
                "  {} {} · {}  ",
                settings.seniority, settings.role, settings.cloud
            ),
            dim(),
        ),
        Span::styled(format!("⏱ {}", format_clock(interview.time_remaining())), timer_style),
    ])
}

pub fn progress_gauge(interview: &Interview) -> Gauge<'static> {
    let (ratio, label) = match interview.progress() {
        Some(p) => (p.fraction(), format!("{}/{}", p.current, p.total)),
        None => (1.0, String::new()),
    };
    Gauge::default()
        .gauge_style(Style::default().fg(Color::Magenta))
        .ratio(ratio.clamp(0.0, 1.0))
        .label(label)
}

/// Selection notices shown above the first screen of an interview
pub fn warnings_paragraph(interview: &Interview) -> Option<Paragraph<'static>> {
    if interview.warnings().is_empty() {
        return None;
    }
    let lines: Vec<Line> = interview
        .warnings()
        .iter()
        .map(|w| Line::from(Span::styled(w.to_string(), Style::default().fg(Color::Yellow))))
        .collect();
    Some(Paragraph::new(lines).wrap(Wrap { trim: true }))
}

pub fn footer(keys: &str) -> Paragraph<'static> {
    Paragraph::new(Span::styled(
        keys.to_string(),
        Style::default().add_modifier(Modifier::ITALIC),
    ))
    .alignment(Alignment::Center)
}
