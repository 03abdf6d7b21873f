use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, Wrap},
    Frame,
};

use cloudquiz::scoring::{format_duration, Grade, ItemScore};

use crate::{
    ui::{bold, dim, footer, frame_layout},
    App,
};

fn grade_color(grade: Grade) -> Color {
    match grade {
        Grade::Excellent | Grade::VeryGood => Color::Green,
        Grade::Good | Grade::Acceptable => Color::Yellow,
        Grade::Fair | Grade::NeedsImprovement => Color::Red,
    }
}

/// One breakdown row: kind, item id, score out of best possible
pub fn present_row(kind: &'static str, item: &ItemScore) -> Row<'static> {
    let style = if item.score >= item.max {
        Style::default().fg(Color::Green)
    } else if item.score > 0 {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::Red)
    };
    Row::new(vec![
        Cell::from(kind),
        Cell::from(item.id.clone()),
        Cell::from(format!("{} / {}", item.score, item.max)).style(style),
    ])
}

pub fn render_results(app: &App, f: &mut Frame) {
    let interview = &app.interview;
    let results = interview.results();
    let settings = interview.settings();
    let grade = results.grade();

    let [header, body, footer_area] = frame_layout(f.area(), 1, 1);
    f.render_widget(
        Paragraph::new(Span::styled(
            format!("Results for {}", settings.candidate_name),
            bold(),
        ))
        .alignment(Alignment::Center),
        header,
    );

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(6), Constraint::Min(1)])
        .split(body);

    let summary = Paragraph::new(vec![
        Line::from(vec![
            Span::styled(
                format!("{} / {} points", results.total_score, results.max_score),
                bold(),
            ),
            Span::raw("   "),
            Span::styled(
                format!("{}%  {}", results.percentage(), grade),
                bold().fg(grade_color(grade)),
            ),
        ]),
        Line::from(Span::styled(
            grade.feedback(),
            Style::default().add_modifier(Modifier::ITALIC),
        )),
        Line::from(""),
        Line::from(format!(
            "Time used: {}",
            format_duration(results.time_spent_secs)
        )),
        Line::from(Span::styled(
            format!(
                "{} {} · {} · {} minute limit",
                settings.seniority, settings.role, settings.cloud, settings.time_limit
            ),
            dim(),
        )),
    ])
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true });
    f.render_widget(summary, chunks[0]);

    let rows: Vec<Row> = results
        .question_scores
        .iter()
        .map(|item| present_row("question", item))
        .chain(
            results
                .code_scores
                .iter()
                .map(|item| present_row("code", item)),
        )
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(10),
            Constraint::Min(12),
            Constraint::Length(12),
        ],
    )
    .header(Row::new(vec!["Type", "Item", "Score"]).style(bold()))
    .block(Block::default().borders(Borders::ALL).title("breakdown"));
    f.render_widget(table, chunks[1]);

    f.render_widget(footer("(r)estart / (esc)ape"), footer_area);
}
