use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Padding, Paragraph},
};

use crate::app::App;
use crate::models::Difficulty;

use super::theme::Theme;

pub fn render(frame: &mut Frame, area: Rect, app: &App, theme: &Theme) {
    let chunks = Layout::vertical([
        Constraint::Length(3),
        Constraint::Length(3),
        Constraint::Fill(1),
        Constraint::Length(1),
    ])
    .margin(1)
    .split(area);

    render_title(frame, chunks[0], theme);
    render_difficulties(frame, chunks[1], app, theme);
    render_topics(frame, chunks[2], app, theme);
    render_status(frame, chunks[3], app, theme);
}

fn render_title(frame: &mut Frame, area: Rect, theme: &Theme) {
    let content = vec![
        Line::from(Span::styled(
            "Ready to practice?",
            Style::default().fg(theme.accent).bold(),
        )),
        Line::from("AI-generated interview questions at your level".fg(theme.muted)),
    ];
    frame.render_widget(Paragraph::new(content).alignment(Alignment::Center), area);
}

fn render_difficulties(frame: &mut Frame, area: Rect, app: &App, theme: &Theme) {
    let selected = app.selected_difficulty();
    let mut spans = vec![Span::styled("Difficulty  ", Style::default().fg(theme.text))];

    for (index, difficulty) in Difficulty::ALL.into_iter().enumerate() {
        let style = if selected == Some(difficulty) {
            Style::default().fg(theme.difficulty(difficulty)).bold().reversed()
        } else {
            Style::default().fg(theme.muted)
        };
        spans.push(Span::styled(format!(" {} {} ", index + 1, difficulty), style));
        spans.push(Span::raw("  "));
    }

    let widget = Paragraph::new(Line::from(spans)).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(theme.border),
    );
    frame.render_widget(widget, area);
}

fn render_topics(frame: &mut Frame, area: Rect, app: &App, theme: &Theme) {
    let chosen = app.session().quiz().topic.as_str();
    let lines: Vec<Line> = app
        .topics()
        .iter()
        .enumerate()
        .map(|(index, topic)| {
            let under_cursor = index == app.topic_cursor();
            let style = if under_cursor {
                Style::default().fg(theme.accent).bold()
            } else {
                Style::default().fg(theme.text)
            };
            let cursor = if under_cursor { ">" } else { " " };
            let mark = if topic == chosen { "●" } else { "○" };

            Line::from(vec![
                Span::styled(format!(" {} ", cursor), style),
                Span::styled(format!("{} ", mark), style),
                Span::styled(topic.as_str(), style),
            ])
        })
        .collect();

    let scroll = app
        .topic_cursor()
        .saturating_sub(area.height.saturating_sub(3) as usize);
    let widget = Paragraph::new(lines)
        .block(
            Block::default()
                .title(" Topic ")
                .borders(Borders::ALL)
                .border_style(theme.border)
                .padding(Padding::horizontal(1)),
        )
        .scroll((scroll as u16, 0));
    frame.render_widget(widget, area);
}

fn render_status(frame: &mut Frame, area: Rect, app: &App, theme: &Theme) {
    let quiz = app.session().quiz();
    let line = if quiz.is_loading {
        Line::from(Span::styled(
            "Generating question...",
            Style::default().fg(theme.fair),
        ))
    } else if quiz.can_generate() {
        Line::from(Span::styled(
            format!("{} · {} · press enter", quiz.difficulty, quiz.topic),
            Style::default().fg(theme.good),
        ))
    } else {
        Line::from(Span::styled(
            "Pick a difficulty and a topic",
            Style::default().fg(theme.muted),
        ))
    };
    frame.render_widget(Paragraph::new(line).alignment(Alignment::Center), area);
}
