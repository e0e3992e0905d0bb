mod feedback;
mod history;
mod question;
mod setup;
mod theme;

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

use crate::app::App;
use crate::models::Step;

pub use feedback::score_message;
pub use theme::Theme;

pub fn render(frame: &mut Frame, app: &App) {
    let theme = Theme::for_mode(app.dark_mode());
    let area = frame.area();
    frame.render_widget(Block::default().bg(theme.background), area);

    let chunks = Layout::vertical([
        Constraint::Length(2),
        Constraint::Fill(1),
        Constraint::Length(1),
    ])
    .split(area);

    render_header(frame, chunks[0], app, &theme);

    match app.session().quiz().step {
        Step::Setup => setup::render(frame, chunks[1], app, &theme),
        Step::Question => question::render(frame, chunks[1], app, &theme),
        Step::Feedback => feedback::render(frame, chunks[1], app, &theme),
        Step::History => history::render(frame, chunks[1], app, &theme),
    }

    render_footer(frame, chunks[2], app, &theme);

    if let Some(message) = &app.session().quiz().error {
        render_error(frame, area, message, &theme);
    }
}

fn render_header(frame: &mut Frame, area: Rect, app: &App, theme: &Theme) {
    let columns = Layout::horizontal([Constraint::Fill(1), Constraint::Fill(1)]).split(area);
    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(theme.border);

    let title = Paragraph::new(Span::styled(
        " INTERVIEW COACH",
        Style::default().fg(theme.accent).bold(),
    ))
    .block(block.clone());

    let mode = if app.dark_mode() { "dark" } else { "light" };
    let summary = format!(
        "{} questions · {} mode ",
        app.session().app_state().stats.total_questions,
        mode
    );
    let summary = Paragraph::new(summary)
        .alignment(Alignment::Right)
        .fg(theme.muted)
        .block(block);

    frame.render_widget(title, columns[0]);
    frame.render_widget(summary, columns[1]);
}

fn controls(app: &App) -> &'static str {
    let quiz = app.session().quiz();
    if quiz.error.is_some() {
        return "enter try again  ·  q quit";
    }
    match quiz.step {
        Step::Setup if quiz.is_loading => "esc cancel  ·  tab history  ·  q quit",
        Step::Setup => {
            "1-3/h/l difficulty  ·  j/k move  ·  space pick topic  ·  enter generate  ·  tab history  ·  d theme  ·  q quit"
        }
        Step::Question if quiz.is_loading => "esc back",
        Step::Question => "type your answer  ·  enter submit  ·  tab skip  ·  esc back",
        Step::Feedback => "n new question  ·  s start over  ·  q quit",
        Step::History => "j/k move  ·  r retry  ·  esc back  ·  q quit",
    }
}

fn render_footer(frame: &mut Frame, area: Rect, app: &App, theme: &Theme) {
    let widget = match app.notice() {
        Some(notice) => Paragraph::new(notice.to_string()).fg(theme.poor),
        None => Paragraph::new(controls(app)).fg(theme.muted),
    };
    frame.render_widget(widget.alignment(Alignment::Center), area);
}

fn render_error(frame: &mut Frame, area: Rect, message: &str, theme: &Theme) {
    let popup = centered(area, 60, 9);
    let content = vec![
        Line::from(""),
        Line::from(Span::styled(
            "Oops! Something went wrong",
            Style::default().fg(theme.poor).bold(),
        )),
        Line::from(""),
        Line::from(Span::styled(message, Style::default().fg(theme.text))),
        Line::from(""),
        Line::from(Span::styled(
            "[Enter] Try again",
            Style::default().fg(theme.accent),
        )),
    ];

    let widget = Paragraph::new(content)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.poor)
                .bg(theme.background),
        );
    frame.render_widget(Clear, popup);
    frame.render_widget(widget, popup);
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

/// Renders a score without a trailing `.0` for whole numbers.
pub(crate) fn format_score(score: f64) -> String {
    if score.fract() == 0.0 {
        format!("{:.0}", score)
    } else {
        format!("{:.1}", score)
    }
}

pub(crate) fn truncate(text: &str, max_chars: usize) -> String {
    let char_count = text.chars().count();
    if char_count > max_chars {
        let truncated: String = text.chars().take(max_chars).collect();
        format!("{}...", truncated)
    } else {
        text.to_string()
    }
}
