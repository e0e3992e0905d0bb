use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Padding, Paragraph, Wrap},
};

use crate::app::App;
use crate::models::{Difficulty, QuizState};

use super::theme::Theme;

pub fn render(frame: &mut Frame, area: Rect, app: &App, theme: &Theme) {
    let quiz = app.session().quiz();
    let chunks = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(6),
        Constraint::Fill(1),
        Constraint::Length(1),
    ])
    .margin(1)
    .split(area);

    render_tags(frame, chunks[0], quiz, theme);
    render_question_text(frame, chunks[1], &quiz.current_question, theme);
    render_answer(frame, chunks[2], quiz, theme);
    render_status(frame, chunks[3], quiz, theme);
}

pub(super) fn tags<'a>(difficulty: &'a str, topic: &'a str, theme: &Theme) -> Line<'a> {
    let difficulty_color = Difficulty::from_label(difficulty)
        .map_or(theme.muted, |d| theme.difficulty(d));
    Line::from(vec![
        Span::styled(format!("[{}]", difficulty), Style::default().fg(difficulty_color)),
        Span::raw(" "),
        Span::styled(format!("[{}]", topic), Style::default().fg(theme.accent)),
    ])
}

fn render_tags(frame: &mut Frame, area: Rect, quiz: &QuizState, theme: &Theme) {
    frame.render_widget(Paragraph::new(tags(&quiz.difficulty, &quiz.topic, theme)), area);
}

fn render_question_text(frame: &mut Frame, area: Rect, text: &str, theme: &Theme) {
    let widget = Paragraph::new(text)
        .wrap(Wrap { trim: true })
        .fg(theme.text)
        .bold();
    frame.render_widget(widget, area);
}

fn render_answer(frame: &mut Frame, area: Rect, quiz: &QuizState, theme: &Theme) {
    let border = if quiz.is_loading { theme.muted } else { theme.accent };
    let mut spans = vec![Span::styled(
        quiz.user_answer.as_str(),
        Style::default().fg(theme.text),
    )];
    if !quiz.is_loading {
        spans.push(Span::styled("_", Style::default().fg(theme.accent)));
    }

    // Keep the cursor line visible once the answer outgrows the box.
    let inner_width = area.width.saturating_sub(4).max(1) as usize;
    let inner_height = area.height.saturating_sub(2) as usize;
    let wrapped_lines = (quiz.user_answer.chars().count() + 1).div_ceil(inner_width);
    let scroll = wrapped_lines.saturating_sub(inner_height);

    let widget = Paragraph::new(Line::from(spans))
        .wrap(Wrap { trim: false })
        .scroll((scroll as u16, 0))
        .block(
            Block::default()
                .title(" Your answer ")
                .borders(Borders::ALL)
                .border_style(border)
                .padding(Padding::horizontal(1)),
        );
    frame.render_widget(widget, area);
}

fn render_status(frame: &mut Frame, area: Rect, quiz: &QuizState, theme: &Theme) {
    let line = if quiz.is_loading {
        Line::from(Span::styled(
            "Evaluating your answer...",
            Style::default().fg(theme.fair),
        ))
    } else {
        let count = quiz.user_answer.chars().count();
        Line::from(Span::styled(
            format!("{} characters", count),
            Style::default().fg(theme.muted),
        ))
    };
    frame.render_widget(Paragraph::new(line).alignment(Alignment::Right), area);
}
