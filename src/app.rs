use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::error::BackendError;
use crate::models::{Difficulty, Evaluation, QuestionHistoryEntry, Step};
use crate::session::{EvaluateRequest, GenerateRequest, QuizSession, RequestTicket};

/// Backend work the event loop should start on the app's behalf.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Generate(GenerateRequest),
    Evaluate(EvaluateRequest),
}

/// A finished backend call, routed back into the app.
#[derive(Debug)]
pub enum BackendEvent {
    Question {
        ticket: RequestTicket,
        result: Result<String, BackendError>,
    },
    Evaluation {
        ticket: RequestTicket,
        result: Result<Evaluation, BackendError>,
    },
}

pub struct App {
    session: QuizSession,
    topics: Vec<String>,
    topic_cursor: usize,
    history_cursor: usize,
    notice: Option<String>,
    pub should_quit: bool,
}

impl App {
    pub fn new(session: QuizSession, topics: Vec<String>) -> Self {
        Self {
            session,
            topics,
            topic_cursor: 0,
            history_cursor: 0,
            notice: None,
            should_quit: false,
        }
    }

    pub fn session(&self) -> &QuizSession {
        &self.session
    }

    pub fn topics(&self) -> &[String] {
        &self.topics
    }

    pub fn topic_cursor(&self) -> usize {
        self.topic_cursor
    }

    pub fn history_cursor(&self) -> usize {
        self.history_cursor
    }

    /// Short hint from the last rejected action, if any.
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn dark_mode(&self) -> bool {
        self.session.app_state().dark_mode_enabled
    }

    pub fn selected_difficulty(&self) -> Option<Difficulty> {
        Difficulty::from_label(&self.session.quiz().difficulty)
    }

    pub fn selected_history_entry(&self) -> Option<&QuestionHistoryEntry> {
        self.session.app_state().history.get(self.history_cursor)
    }

    /// Routes a finished backend call into the session.
    pub fn apply(&mut self, event: BackendEvent) {
        let outcome = match event {
            BackendEvent::Question { ticket, result } => self.session.finish_generate(ticket, result),
            BackendEvent::Evaluation { ticket, result } => self.session.finish_submit(ticket, result),
        };
        // Failures are already recorded on the quiz state for display.
        match outcome {
            Ok(resolution) => tracing::trace!(?resolution, "backend event applied"),
            Err(err) => tracing::debug!(error = %err, "backend failure shown to the user"),
        }
    }

    /// Handles a key press. Returns backend work to start, if any.
    pub fn handle_key(&mut self, key: KeyEvent) -> Option<Command> {
        self.notice = None;

        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return None;
        }

        if self.session.quiz().error.is_some() {
            self.handle_error_key(key.code);
            return None;
        }

        match self.session.quiz().step {
            Step::Setup => self.handle_setup_key(key.code),
            Step::Question => self.handle_question_key(key.code),
            Step::Feedback => {
                self.handle_feedback_key(key.code);
                None
            }
            Step::History => {
                self.handle_history_key(key.code);
                None
            }
        }
    }

    fn handle_error_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Enter | KeyCode::Char('r') | KeyCode::Char('R') => self.session.dismiss_error(),
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => self.should_quit = true,
            _ => {}
        }
    }

    fn handle_setup_key(&mut self, key: KeyCode) -> Option<Command> {
        if self.session.quiz().is_loading {
            // Only Esc (abandon the request), Tab and q act while generating.
            match key {
                KeyCode::Esc => self.session.back_to_setup(),
                KeyCode::Tab => self.open_history(),
                KeyCode::Char('q') | KeyCode::Char('Q') => self.should_quit = true,
                _ => {}
            }
            return None;
        }

        match key {
            KeyCode::Char('1') => self.choose_difficulty(Difficulty::Easy),
            KeyCode::Char('2') => self.choose_difficulty(Difficulty::Medium),
            KeyCode::Char('3') => self.choose_difficulty(Difficulty::Hard),
            KeyCode::Left | KeyCode::Char('h') => {
                let difficulty = self
                    .selected_difficulty()
                    .map_or(Difficulty::Hard, Difficulty::previous);
                self.choose_difficulty(difficulty);
            }
            KeyCode::Right | KeyCode::Char('l') => {
                let difficulty = self
                    .selected_difficulty()
                    .map_or(Difficulty::Easy, Difficulty::next);
                self.choose_difficulty(difficulty);
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.topic_cursor = self.topic_cursor.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                let last = self.topics.len().saturating_sub(1);
                self.topic_cursor = (self.topic_cursor + 1).min(last);
            }
            KeyCode::Char(' ') => {
                if let Some(topic) = self.topics.get(self.topic_cursor) {
                    self.session.set_topic(topic);
                }
            }
            KeyCode::Enter => match self.session.begin_generate() {
                Ok(request) => return Some(Command::Generate(request)),
                Err(err) => self.notice = Some(err.to_string()),
            },
            KeyCode::Tab => self.open_history(),
            KeyCode::Char('d') | KeyCode::Char('D') => {
                self.session.toggle_dark_mode();
            }
            KeyCode::Char('q') | KeyCode::Char('Q') => self.should_quit = true,
            _ => {}
        }
        None
    }

    fn handle_question_key(&mut self, key: KeyCode) -> Option<Command> {
        if self.session.quiz().is_loading {
            // Input is frozen until the evaluation lands; Esc still backs out.
            if key == KeyCode::Esc {
                self.session.back_to_setup();
            }
            return None;
        }

        match key {
            KeyCode::Enter => match self.session.begin_submit() {
                Ok(request) => return Some(Command::Evaluate(request)),
                Err(err) => self.notice = Some(err.to_string()),
            },
            KeyCode::Tab => {
                if let Err(err) = self.session.skip() {
                    self.notice = Some(err.to_string());
                }
            }
            KeyCode::Esc => self.session.back_to_setup(),
            KeyCode::Backspace => self.session.pop_answer_char(),
            KeyCode::Char(c) => self.session.push_answer_char(c),
            _ => {}
        }
        None
    }

    fn handle_feedback_key(&mut self, key: KeyCode) {
        let result = match key {
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Enter => self.session.new_question(),
            KeyCode::Char('s') | KeyCode::Char('S') => self.session.start_over(),
            KeyCode::Char('q') | KeyCode::Char('Q') => {
                self.should_quit = true;
                Ok(())
            }
            _ => Ok(()),
        };
        if let Err(err) = result {
            self.notice = Some(err.to_string());
        }
    }

    fn handle_history_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Up | KeyCode::Char('k') => {
                self.history_cursor = self.history_cursor.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                let last = self.session.app_state().history.len().saturating_sub(1);
                self.history_cursor = (self.history_cursor + 1).min(last);
            }
            KeyCode::Char('r') | KeyCode::Char('R') => self.retry_selected(),
            KeyCode::Esc | KeyCode::Char('b') | KeyCode::Tab => self.session.back_to_setup(),
            KeyCode::Char('q') | KeyCode::Char('Q') => self.should_quit = true,
            _ => {}
        }
    }

    fn choose_difficulty(&mut self, difficulty: Difficulty) {
        self.session.set_difficulty(difficulty.as_str());
    }

    fn open_history(&mut self) {
        self.history_cursor = 0;
        if let Err(err) = self.session.show_history() {
            self.notice = Some(err.to_string());
        }
    }

    fn retry_selected(&mut self) {
        let Some(entry) = self.selected_history_entry() else {
            return;
        };
        if !entry.is_retry_candidate() {
            self.notice = Some("Only skipped or low-scoring questions can be retried".to_string());
            return;
        }
        let id = entry.id.clone();
        self.session.retry(&id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{MemoryStore, STATE_KEY};
    use crate::history::HistoryManager;
    use crate::models::EntryStatus;

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

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    fn reach_question(app: &mut App) {
        press(app, KeyCode::Char('1'));
        press(app, KeyCode::Char(' '));
        let Some(Command::Generate(request)) = press(app, KeyCode::Enter) else {
            panic!("expected a generate command");
        };
        app.apply(BackendEvent::Question {
            ticket: request.ticket,
            result: Ok("What is a z-score?".to_string()),
        });
    }

    #[test]
    fn test_setup_selection_and_generate() {
        let mut app = app();
        assert_eq!(press(&mut app, KeyCode::Enter), None);
        assert_eq!(app.notice(), Some("choose a difficulty first"));

        press(&mut app, KeyCode::Right);
        assert_eq!(app.selected_difficulty(), Some(Difficulty::Easy));
        press(&mut app, KeyCode::Right);
        assert_eq!(app.selected_difficulty(), Some(Difficulty::Medium));

        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Down);
        assert_eq!(app.topic_cursor(), 1);
        press(&mut app, KeyCode::Char(' '));

        let command = press(&mut app, KeyCode::Enter);
        let Some(Command::Generate(request)) = command else {
            panic!("expected a generate command");
        };
        assert_eq!(request.difficulty, "Medium");
        assert_eq!(request.topic, "Programming");
        assert!(app.session().quiz().is_loading);
        assert_eq!(press(&mut app, KeyCode::Enter), None);
    }

    #[test]
    fn test_typing_and_submitting_an_answer() {
        let mut app = app();
        reach_question(&mut app);
        assert_eq!(app.session().quiz().step, Step::Question);

        assert_eq!(press(&mut app, KeyCode::Enter), None);
        assert_eq!(app.notice(), Some("answer must not be empty"));

        type_text(&mut app, "std devs qx");
        press(&mut app, KeyCode::Backspace);
        press(&mut app, KeyCode::Backspace);
        type_text(&mut app, "from the mean");
        assert_eq!(app.session().quiz().user_answer, "std devs from the mean");

        let Some(Command::Evaluate(request)) = press(&mut app, KeyCode::Enter) else {
            panic!("expected an evaluate command");
        };
        type_text(&mut app, "ignored");
        app.apply(BackendEvent::Evaluation {
            ticket: request.ticket,
            result: Ok(Evaluation {
                feedback: "Good".to_string(),
                score: 8.0,
            }),
        });
        assert_eq!(app.session().quiz().step, Step::Feedback);
        assert_eq!(app.session().quiz().user_answer, "std devs from the mean");

        press(&mut app, KeyCode::Char('n'));
        assert_eq!(app.session().app_state().stats.completed_questions, 1);
        assert_eq!(app.session().quiz().step, Step::Setup);
    }

    #[test]
    fn test_error_overlay_swallows_keys_until_dismissed() {
        let mut app = app();
        press(&mut app, KeyCode::Char('2'));
        press(&mut app, KeyCode::Char(' '));
        let Some(Command::Generate(request)) = press(&mut app, KeyCode::Enter) else {
            panic!("expected a generate command");
        };
        app.apply(BackendEvent::Question {
            ticket: request.ticket,
            result: Err(BackendError::Unavailable("down".to_string())),
        });
        assert!(app.session().quiz().error.is_some());

        assert_eq!(press(&mut app, KeyCode::Char('3')), None);
        assert_eq!(app.selected_difficulty(), Some(Difficulty::Medium));

        press(&mut app, KeyCode::Enter);
        assert!(app.session().quiz().error.is_none());
        assert_eq!(app.session().quiz().step, Step::Setup);
    }

    #[test]
    fn test_skip_then_retry_from_history() {
        let mut app = app();
        reach_question(&mut app);
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.session().app_state().history[0].status, EntryStatus::Skipped);

        press(&mut app, KeyCode::Tab);
        assert_eq!(app.session().quiz().step, Step::History);
        press(&mut app, KeyCode::Char('r'));
        assert_eq!(app.session().quiz().step, Step::Question);
        assert_eq!(app.session().quiz().current_question, "What is a z-score?");
    }

    #[test]
    fn test_esc_while_evaluating_discards_the_result() {
        let mut app = app();
        reach_question(&mut app);
        type_text(&mut app, "answer");
        let Some(Command::Evaluate(request)) = press(&mut app, KeyCode::Enter) else {
            panic!("expected an evaluate command");
        };
        press(&mut app, KeyCode::Esc);
        app.apply(BackendEvent::Evaluation {
            ticket: request.ticket,
            result: Ok(Evaluation {
                feedback: "late".to_string(),
                score: 3.0,
            }),
        });
        assert_eq!(app.session().quiz().step, Step::Setup);
        assert!(!app.session().quiz().is_loading);
    }

    #[test]
    fn test_ctrl_c_quits_from_question() {
        let mut app = app();
        reach_question(&mut app);
        app.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(app.should_quit);
        assert_eq!(app.session().quiz().user_answer, "");
    }

    #[test]
    fn test_esc_while_generating_abandons_the_request() {
        let mut app = app();
        press(&mut app, KeyCode::Char('1'));
        press(&mut app, KeyCode::Char(' '));
        let Some(Command::Generate(request)) = press(&mut app, KeyCode::Enter) else {
            panic!("expected a generate command");
        };

        press(&mut app, KeyCode::Char('3'));
        assert_eq!(app.selected_difficulty(), Some(Difficulty::Easy));

        press(&mut app, KeyCode::Esc);
        assert!(!app.session().quiz().is_loading);

        app.apply(BackendEvent::Question {
            ticket: request.ticket,
            result: Ok("late question".to_string()),
        });
        assert_eq!(app.session().quiz().step, Step::Setup);
        assert_eq!(app.session().quiz().current_question, "");
        assert!(press(&mut app, KeyCode::Enter).is_some());
    }

    #[test]
    fn test_feedback_keeps_the_graded_answer_until_recorded() {
        let mut app = app();
        reach_question(&mut app);
        type_text(&mut app, "distance from the mean");
        let Some(Command::Evaluate(request)) = press(&mut app, KeyCode::Enter) else {
            panic!("expected an evaluate command");
        };
        app.apply(BackendEvent::Evaluation {
            ticket: request.ticket,
            result: Ok(Evaluation {
                feedback: "Good".to_string(),
                score: 8.0,
            }),
        });

        press(&mut app, KeyCode::Tab);
        assert_eq!(app.session().quiz().step, Step::Feedback);

        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.session().quiz().step, Step::History);
        press(&mut app, KeyCode::Esc);
        assert!(press(&mut app, KeyCode::Enter).is_some());

        let stats = &app.session().app_state().stats;
        assert_eq!(stats.completed_questions, 1);
        assert_eq!(stats.average_score, 8.0);
    }
}
