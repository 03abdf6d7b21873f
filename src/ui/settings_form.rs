use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use cloudquiz::{content::Difficulty, settings::Role};

use crate::{
    ui::{bold, dim, footer, frame_layout, highlight},
    App, FormField,
};

fn field_value(app: &App, field: FormField) -> String {
    let settings = app.interview.settings();
    match field {
        FormField::Name => {
            if app.form.focus == FormField::Name {
                format!("{}_", settings.candidate_name)
            } else {
                settings.candidate_name.clone()
            }
        }
        FormField::Role => settings.role.to_string(),
        FormField::Seniority => settings.seniority.to_string(),
        FormField::Cloud => settings.cloud.to_string(),
        FormField::Questions => settings.question_count.to_string(),
        FormField::Snippets => match settings.role {
            Role::Developer => settings.code_snippet_count.to_string(),
            Role::Consultant => "none for consultants".to_string(),
        },
        FormField::TimeLimit => format!("{} minutes", settings.time_limit),
    }
}

pub fn render_settings_form(app: &App, f: &mut Frame) {
    let [header, body, footer_area] = frame_layout(f.area(), 2, 1);

    let title = Paragraph::new(Span::styled("Technical interview setup", bold()))
        .alignment(Alignment::Center);
    f.render_widget(title, header);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(FormField::ALL.len() as u16 + 2),
            Constraint::Length(4),
            Constraint::Min(1),
        ])
        .split(body);

    let rows: Vec<Line> = FormField::ALL
        .iter()
        .map(|&field| {
            let label = format!("{:>14}  ", field.to_string());
            let value = field_value(app, field);
            if field == app.form.focus {
                Line::from(vec![
                    Span::styled(label, bold()),
                    Span::styled(format!(" ‹ {value} › "), highlight()),
                ])
            } else {
                Line::from(vec![Span::styled(label, dim()), Span::raw(value)])
            }
        })
        .collect();
    let form = Paragraph::new(rows).block(Block::default().borders(Borders::ALL));
    f.render_widget(form, chunks[0]);

    let avail = app.availability();
    let settings = app.interview.settings();
    let categories = app
        .interview
        .store()
        .categories(settings.cloud)
        .join(", ");
    let summary = vec![
        Line::from(format!(
            "{}: {} questions ({} easy, {} medium, {} hard, {} expert), {} code snippets",
            avail.cloud,
            avail.total_questions,
            avail.questions_at(Difficulty::Easy),
            avail.questions_at(Difficulty::Medium),
            avail.questions_at(Difficulty::Hard),
            avail.questions_at(Difficulty::Expert),
            avail.code_snippets
        )),
        Line::from(Span::styled(format!("Categories: {categories}"), dim())),
    ];
    f.render_widget(Paragraph::new(summary).wrap(Wrap { trim: true }), chunks[1]);

    if let Some(error) = &app.form.error {
        let error = Paragraph::new(Span::styled(
            error.clone(),
            Style::default().fg(Color::Red),
        ))
        .alignment(Alignment::Center);
        f.render_widget(error, chunks[2]);
    }

    f.render_widget(
        footer("↑/↓ field  ←/→ change  (enter) start  (esc)ape"),
        footer_area,
    );
}
