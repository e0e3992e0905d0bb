use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use interview_coach::data::STATE_KEY;
use interview_coach::error::BackendError;
use interview_coach::models::Evaluation;
use interview_coach::{App, BackendEvent, Command, HistoryManager, MemoryStore, QuizSession, render};
use ratatui::Terminal;
use ratatui::backend::TestBackend;

fn app() -> App {
    let history = HistoryManager::load(Box::new(MemoryStore::new()), STATE_KEY);
    App::new(
        QuizSession::new(history),
        vec!["Statistics".to_string(), "Programming".to_string()],
    )
}

fn press(app: &mut App, code: KeyCode) -> Option<Command> {
    app.handle_key(KeyEvent::new(code, KeyModifiers::NONE))
}

fn screen(app: &App) -> String {
    let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
    terminal.draw(|frame| render(frame, app)).unwrap();

    let buffer = terminal.backend().buffer();
    let width = buffer.area.width as usize;
    buffer
        .content()
        .chunks(width)
        .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Drives the app from setup to the question step.
fn to_question(app: &mut App, question: &str) {
    press(app, KeyCode::Char('1'));
    press(app, KeyCode::Char(' '));
    let Some(Command::Generate(request)) = press(app, KeyCode::Enter) else {
        panic!("expected a generate command");
    };
    app.apply(BackendEvent::Question {
        ticket: request.ticket,
        result: Ok(question.to_string()),
    });
}

fn to_feedback(app: &mut App, answer: &str, score: f64) {
    for c in answer.chars() {
        press(app, KeyCode::Char(c));
    }
    let Some(Command::Evaluate(request)) = press(app, KeyCode::Enter) else {
        panic!("expected an evaluate command");
    };
    app.apply(BackendEvent::Evaluation {
        ticket: request.ticket,
        result: Ok(Evaluation {
            feedback: "Clear and correct.".to_string(),
            score,
        }),
    });
}

#[test]
fn setup_screen_lists_difficulties_and_topics() {
    let app = app();
    let text = screen(&app);

    assert!(text.contains("INTERVIEW COACH"));
    assert!(text.contains("0 questions · light mode"));
    assert!(text.contains("Ready to practice?"));
    assert!(text.contains("Easy"));
    assert!(text.contains("Medium"));
    assert!(text.contains("Hard"));
    assert!(text.contains("Statistics"));
    assert!(text.contains("Programming"));
}

#[test]
fn dark_mode_shows_in_header() {
    let mut app = app();
    press(&mut app, KeyCode::Char('d'));
    assert!(screen(&app).contains("dark mode"));
}

#[test]
fn question_screen_shows_tags_and_draft() {
    let mut app = app();
    to_question(&mut app, "What is variance?");
    press(&mut app, KeyCode::Char('h'));
    press(&mut app, KeyCode::Char('i'));

    let text = screen(&app);
    assert!(text.contains("[Easy]"));
    assert!(text.contains("[Statistics]"));
    assert!(text.contains("What is variance?"));
    assert!(text.contains("hi_"));
}

#[test]
fn feedback_screen_shows_score_and_message() {
    let mut app = app();
    to_question(&mut app, "What is variance?");
    to_feedback(&mut app, "spread of the data", 8.0);

    let text = screen(&app);
    assert!(text.contains("Your Score: 8/10"));
    assert!(text.contains("Great job!"));
    assert!(text.contains("Clear and correct."));
    assert!(text.contains("spread of the data"));
}

#[test]
fn history_screen_shows_stats_and_entries() {
    let mut app = app();
    let text = {
        press(&mut app, KeyCode::Tab);
        screen(&app)
    };
    assert!(text.contains("Your Learning Journey"));
    assert!(text.contains("No questions yet"));

    press(&mut app, KeyCode::Esc);
    to_question(&mut app, "What is variance?");
    to_feedback(&mut app, "spread of the data", 8.0);
    press(&mut app, KeyCode::Char('n'));
    press(&mut app, KeyCode::Tab);

    let text = screen(&app);
    assert!(text.contains("Total Questions"));
    assert!(text.contains("Avg Score"));
    assert!(text.contains("8.0"));
    assert!(text.contains("What is variance?"));
    assert!(text.contains("1 questions · light mode"));
}

#[test]
fn failed_request_shows_error_overlay() {
    let mut app = app();
    press(&mut app, KeyCode::Char('2'));
    press(&mut app, KeyCode::Char(' '));
    let Some(Command::Generate(request)) = press(&mut app, KeyCode::Enter) else {
        panic!("expected a generate command");
    };
    app.apply(BackendEvent::Question {
        ticket: request.ticket,
        result: Err(BackendError::Unavailable("connection refused".to_string())),
    });

    let text = screen(&app);
    assert!(text.contains("Oops! Something went wrong"));
    assert!(text.contains("[Enter] Try again"));

    press(&mut app, KeyCode::Enter);
    assert!(!screen(&app).contains("Oops! Something went wrong"));
}
