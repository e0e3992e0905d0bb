use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Padding, Paragraph},
};

use crate::app::App;
use crate::models::{EntryStatus, MAX_SCORE, QuestionHistoryEntry, UserStats};

use super::theme::Theme;
use super::{format_score, question, truncate};

const QUESTION_PREVIEW_LENGTH: usize = 70;
const ANSWER_PREVIEW_LENGTH: usize = 100;
const LINES_PER_ENTRY: usize = 4;

pub fn render(frame: &mut Frame, area: Rect, app: &App, theme: &Theme) {
    let chunks = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(4),
        Constraint::Fill(1),
    ])
    .margin(1)
    .split(area);

    let title = Paragraph::new(Span::styled(
        "Your Learning Journey",
        Style::default().fg(theme.accent).bold(),
    ));
    frame.render_widget(title, chunks[0]);

    render_stats(frame, chunks[1], &app.session().app_state().stats, theme);
    render_entries(frame, chunks[2], app, theme);
}

fn render_stats(frame: &mut Frame, area: Rect, stats: &UserStats, theme: &Theme) {
    let columns = Layout::horizontal([Constraint::Ratio(1, 4); 4]).split(area);
    let cells = [
        (stats.total_questions.to_string(), "Total Questions", theme.accent),
        (stats.completed_questions.to_string(), "Completed", theme.good),
        (stats.skipped_questions.to_string(), "Skipped", theme.fair),
        (format!("{:.1}", stats.average_score), "Avg Score", theme.text),
    ];

    for (column, (value, label, color)) in columns.iter().zip(cells) {
        let content = vec![
            Line::from(Span::styled(value, Style::default().fg(color).bold())),
            Line::from(label.fg(theme.muted)),
        ];
        let widget = Paragraph::new(content).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::BOTTOM)
                .border_style(theme.border),
        );
        frame.render_widget(widget, *column);
    }
}

fn render_entries(frame: &mut Frame, area: Rect, app: &App, theme: &Theme) {
    let history = &app.session().app_state().history;
    if history.is_empty() {
        let widget = Paragraph::new(vec![
            Line::from(""),
            Line::from("No questions yet".fg(theme.text)),
            Line::from("Answered and skipped questions show up here".fg(theme.muted)),
        ])
        .alignment(Alignment::Center);
        frame.render_widget(widget, area);
        return;
    }

    let cursor = app.history_cursor();
    let lines: Vec<Line> = history
        .iter()
        .enumerate()
        .flat_map(|(index, entry)| entry_lines(entry, index == cursor, theme))
        .collect();

    // Keep the selected entry on screen.
    let visible = area.height as usize;
    let selected_bottom = (cursor + 1) * LINES_PER_ENTRY;
    let scroll = selected_bottom.saturating_sub(visible);

    let widget = Paragraph::new(lines)
        .block(Block::default().padding(Padding::horizontal(1)))
        .scroll((scroll as u16, 0));
    frame.render_widget(widget, area);
}

fn status_marker(entry: &QuestionHistoryEntry, theme: &Theme) -> (&'static str, Color) {
    match entry.status {
        EntryStatus::Completed => {
            let score = entry.score();
            (if score >= 7.0 { "+" } else { "-" }, theme.outcome(score))
        }
        EntryStatus::Skipped => ("~", theme.muted),
        EntryStatus::Retry => ("↺", theme.fair),
    }
}

fn entry_lines<'a>(entry: &'a QuestionHistoryEntry, selected: bool, theme: &Theme) -> Vec<Line<'a>> {
    let (symbol, color) = status_marker(entry, theme);
    let cursor = if selected { ">" } else { " " };
    let label_style = if selected {
        Style::default().fg(color).bold()
    } else {
        Style::default().fg(color)
    };

    let mut header = vec![
        Span::styled(format!("{} {} ", cursor, symbol), label_style),
        Span::styled(entry.status.to_string(), label_style),
    ];
    if let Some(evaluation) = &entry.evaluation {
        header.push(Span::styled(
            format!("  {}/{}", format_score(evaluation.score), MAX_SCORE),
            Style::default().fg(theme.text),
        ));
    }
    header.push(Span::styled(
        format!("  {}  ", entry.timestamp.format("%Y-%m-%d")),
        Style::default().fg(theme.muted),
    ));
    header.extend(question::tags(&entry.difficulty, &entry.topic, theme).spans);
    if selected && entry.is_retry_candidate() {
        header.push(Span::styled("  [r] retry", Style::default().fg(theme.accent)));
    }

    let question_style = if selected {
        Style::default().fg(theme.text).bold()
    } else {
        Style::default().fg(theme.text)
    };

    let mut lines = vec![
        Line::from(header),
        Line::from(Span::styled(
            format!("    {}", truncate(&entry.question, QUESTION_PREVIEW_LENGTH)),
            question_style,
        )),
    ];
    if entry.answer.is_empty() {
        lines.push(Line::from(""));
    } else {
        lines.push(Line::from(Span::styled(
            format!("    {}", truncate(&entry.answer, ANSWER_PREVIEW_LENGTH)),
            Style::default().fg(theme.muted),
        )));
    }
    lines.push(Line::from(""));
    lines
}
