use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use cloudquiz::content::CodeSnippet;

use crate::{
    ui::{bold, dim, footer, frame_layout, highlight, progress_gauge, status_line, warnings_paragraph},
    App,
};

/// Cut `line` to at most `width` display columns
pub fn clip(line: &str, width: usize) -> &str {
    if line.width() <= width {
        return line;
    }
    let mut used = 0;
    for (idx, c) in line.char_indices() {
        let w = c.width().unwrap_or(0);
        if used + w > width {
            return &line[..idx];
        }
        used += w;
    }
    line
}

fn code_lines(snippet: &CodeSnippet, current_issue: usize, width: usize) -> Vec<Line<'static>> {
    let gutter = snippet.line_count().to_string().len();
    let current_line = snippet.issues.get(current_issue).map(|i| i.line);

    snippet
        .code
        .lines()
        .enumerate()
        .map(|(i, text)| {
            let number = i + 1;
            let flagged = snippet.issue_at_line(number).is_some();
            let marker = if flagged { "▶" } else { " " };
            let number_style = if Some(number) == current_line {
                bold().fg(Color::Yellow)
            } else if flagged {
                Style::default().fg(Color::Yellow)
            } else {
                dim()
            };
            let available = width.saturating_sub(gutter + 3);
            Line::from(vec![
                Span::styled(format!("{marker}{number:>gutter$} "), number_style),
                Span::raw(clip(text, available).to_string()),
            ])
        })
        .collect()
}

pub fn render_code(app: &App, f: &mut Frame) {
    let interview = &app.interview;
    let Some(snippet) = interview.current_snippet() else {
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
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(if warnings.is_some() {
                interview.warnings().len() as u16
            } else {
                0
            }),
            Constraint::Length(3),
            Constraint::Min(1),
        ])
        .split(body);
    if let Some(warnings) = warnings {
        f.render_widget(warnings, rows[0]);
    }

    let index = interview.code_snippet_index().unwrap_or(0);
    let intro = Paragraph::new(vec![
        Line::from(vec![
            Span::styled(
                format!(
                    "Code snippet {} of {}: {}",
                    index + 1,
                    interview.snippets().len(),
                    snippet.title
                ),
                bold(),
            ),
            Span::styled(format!("   {}", snippet.language), dim()),
        ]),
        Line::from(snippet.description.clone()),
    ])
    .wrap(Wrap { trim: true });
    f.render_widget(intro, rows[1]);

    let panes = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(rows[2]);

    let code_width = panes[0].width.saturating_sub(2) as usize;
    let code = Paragraph::new(code_lines(snippet, app.cursor.issue, code_width))
        .block(Block::default().borders(Borders::ALL).title("code"));
    f.render_widget(code, panes[0]);

    let mut lines = Vec::new();
    if let Some(issue) = snippet.issues.get(app.cursor.issue) {
        let recorded = interview.fix_for(&snippet.id, app.cursor.issue);
        lines.push(Line::from(Span::styled(
            format!(
                "Issue {} of {} (line {})",
                app.cursor.issue + 1,
                snippet.issues.len(),
                issue.line
            ),
            bold(),
        )));
        lines.push(Line::from(issue.description.clone()));
        lines.push(Line::from(""));
        lines.extend(issue.possible_fixes.iter().enumerate().map(|(i, fix)| {
            let marker = if recorded == Some(i) { "(•)" } else { "( )" };
            let text = format!("{marker} {}. {}", i + 1, fix.text);
            if i == app.cursor.fix {
                Line::from(Span::styled(text, highlight()))
            } else if recorded == Some(i) {
                Line::from(Span::styled(text, Style::default().fg(Color::Green)))
            } else {
                Line::from(text)
            }
        }));
    }
    let answered = (0..snippet.issues.len())
        .filter(|&i| interview.fix_for(&snippet.id, i).is_some())
        .count();
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        format!("{answered}/{} issues answered", snippet.issues.len()),
        dim(),
    )));

    let issues = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title("issues"))
        .wrap(Wrap { trim: false });
    f.render_widget(issues, panes[1]);

    f.render_widget(
        footer("←/→ issue  ↑/↓ fix  (enter) choose  (n)ext  (f)inish  (esc)ape"),
        footer_area,
    );
}
