use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Padding, Paragraph, Wrap},
};

use crate::app::App;
use crate::models::MAX_SCORE;

use super::theme::Theme;
use super::{format_score, question};

pub fn render(frame: &mut Frame, area: Rect, app: &App, theme: &Theme) {
    let quiz = app.session().quiz();
    let Some(evaluation) = &quiz.evaluation else {
        return;
    };

    let chunks = Layout::vertical([
        Constraint::Length(4),
        Constraint::Length(1),
        Constraint::Length(4),
        Constraint::Length(5),
        Constraint::Fill(1),
    ])
    .margin(1)
    .split(area);

    render_score(frame, chunks[0], evaluation.score, theme);
    frame.render_widget(
        Paragraph::new(question::tags(&quiz.difficulty, &quiz.topic, theme)),
        chunks[1],
    );
    render_section(frame, chunks[2], "Question", &quiz.current_question, theme);
    render_section(frame, chunks[3], "Your answer", &quiz.user_answer, theme);
    render_section(frame, chunks[4], "Feedback", &evaluation.feedback, theme);
}

/// Encouragement shown under the score.
pub fn score_message(score: f64) -> &'static str {
    if score >= 9.0 {
        "Excellent work!"
    } else if score >= 7.0 {
        "Great job!"
    } else if score >= 5.0 {
        "Good effort!"
    } else {
        "Keep practicing!"
    }
}

fn render_score(frame: &mut Frame, area: Rect, score: f64, theme: &Theme) {
    let content = vec![
        Line::from(vec![
            Span::styled("Your Score: ", Style::default().fg(theme.text).bold()),
            Span::styled(
                format!("{}/{}", format_score(score), MAX_SCORE),
                Style::default().fg(theme.score(score)).bold(),
            ),
        ]),
        Line::from(""),
        Line::from(score_message(score).fg(theme.muted)),
    ];

    let widget = Paragraph::new(content).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(theme.border),
    );
    frame.render_widget(widget, area);
}

fn render_section(frame: &mut Frame, area: Rect, title: &str, body: &str, theme: &Theme) {
    let widget = Paragraph::new(body)
        .wrap(Wrap { trim: true })
        .fg(theme.text)
        .block(
            Block::default()
                .title(format!(" {} ", title))
                .title_style(Style::default().fg(theme.accent).bold())
                .borders(Borders::LEFT)
                .border_style(theme.accent)
                .padding(Padding::horizontal(1)),
        );
    frame.render_widget(widget, area);
}
