use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::{
    ui::{bold, dim, footer, frame_layout, highlight, progress_gauge, status_line, warnings_paragraph},
    App,
};

pub fn render_question(app: &App, f: &mut Frame) {
    let interview = &app.interview;
    let Some(question) = interview.current_question() else {
        return;
    };

    let [header, body, footer_area] = frame_layout(f.area(), 2, 1);
    let header_rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(1)])
        .split(header);
    f.render_widget(Paragraph::new(status_line(interview)), header_rows[0]);
    f.render_widget(progress_gauge(interview), header_rows[1]);

    let warnings = warnings_paragraph(interview);
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(if warnings.is_some() {
                interview.warnings().len() as u16
            } else {
                0
            }),
            Constraint::Min(1),
        ])
        .split(body);
    if let Some(warnings) = warnings {
        f.render_widget(warnings, chunks[0]);
    }

    let index = interview.question_index().unwrap_or(0);
    let recorded = interview.answer_for(&question.id);

    let mut lines = vec![
        Line::from(vec![
            Span::styled(
                format!("Question {} of {}", index + 1, interview.questions().len()),
                bold(),
            ),
            Span::styled(
                format!("   {} · {}", question.category, question.difficulty),
                dim(),
            ),
        ]),
        Line::from(""),
        Line::from(question.text.clone()),
        Line::from(""),
    ];

    lines.extend(question.possible_answers.iter().enumerate().map(|(i, choice)| {
        let marker = if recorded == Some(i) { "(•)" } else { "( )" };
        let text = format!("{marker} {}. {}", i + 1, choice.text);
        if i == app.cursor.answer {
            Line::from(Span::styled(text, highlight()))
        } else if recorded == Some(i) {
            Line::from(Span::styled(text, Style::default().fg(Color::Green)))
        } else {
            Line::from(text)
        }
    }));

    let panel = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL))
        .wrap(Wrap { trim: false });
    f.render_widget(panel, chunks[1]);

    f.render_widget(
        footer("↑/↓ move  (enter) choose  (n)ext  (c)ode  (f)inish  (esc)ape"),
        footer_area,
    );
}
