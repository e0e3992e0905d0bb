//! # interview-coach
//!
//! A terminal client for practising interview questions. Questions are
//! written and graded by a remote service; every answered or skipped question
//! is kept in a local history with running statistics.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use clap::Parser;
//! use interview_coach::{Cli, Coach, CoachError};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), CoachError> {
//!     let config = Cli::parse().into_config()?;
//!     Coach::from_config(&config).run().await
//! }
//! ```

mod app;
pub mod client;
pub mod config;
pub mod data;
pub mod error;
pub mod history;
pub mod logging;
pub mod models;
pub mod protocol;
pub mod session;
pub mod terminal;
pub mod time;
pub mod ui;

use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{self, Event, KeyEventKind};
use tokio::sync::mpsc;

pub use app::{App, BackendEvent, Command};
pub use client::{HttpBackend, QuizBackend};
pub use config::{Cli, Config};
pub use data::{FileStore, MemoryStore, StateStore};
pub use error::{BackendError, CoachError, ConfigError, PersistenceError, QuizError, ValidationError};
pub use history::HistoryManager;
pub use models::{AppState, QuestionHistoryEntry, QuizState, Step, UserStats, compute_stats};
pub use session::{QuizSession, Resolution};
pub use ui::render;

const INPUT_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// A coach session bound to a terminal and a backend.
pub struct Coach {
    app: App,
    backend: Arc<dyn QuizBackend>,
}

impl Coach {
    pub fn new(app: App, backend: Arc<dyn QuizBackend>) -> Self {
        Self { app, backend }
    }

    /// Wires the file store and HTTP backend described by `config`.
    pub fn from_config(config: &Config) -> Self {
        let store = FileStore::new(&config.state_dir);
        let history = HistoryManager::load(Box::new(store), config.state_key.clone());
        let session = QuizSession::new(history);
        let backend = HttpBackend::new(config.backend_url.as_str());
        Self::new(App::new(session, config.topics.clone()), Arc::new(backend))
    }

    pub fn app(&self) -> &App {
        &self.app
    }

    pub fn app_mut(&mut self) -> &mut App {
        &mut self.app
    }

    /// Takes over the terminal until the user quits.
    pub async fn run(mut self) -> Result<(), CoachError> {
        let mut term = terminal::init()?;
        let result = run_event_loop(&mut term, &mut self.app, &self.backend).await;
        term.close()?;
        result
    }
}

async fn run_event_loop(
    terminal: &mut terminal::CoachTerminal,
    app: &mut App,
    backend: &Arc<dyn QuizBackend>,
) -> Result<(), CoachError> {
    let (tx, mut rx) = mpsc::unbounded_channel::<BackendEvent>();

    loop {
        while let Ok(event) = rx.try_recv() {
            app.apply(event);
        }

        terminal.draw(|frame| ui::render(frame, app))?;
        if app.should_quit {
            break;
        }

        if event::poll(INPUT_POLL_INTERVAL)? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if let Some(command) = app.handle_key(key) {
                    dispatch(command, Arc::clone(backend), tx.clone());
                }
            }
        }

        // Let spawned requests make progress between frames.
        tokio::task::yield_now().await;
    }

    tracing::info!("quitting");
    Ok(())
}

/// Runs a backend call in the background and reports back on `tx`.
fn dispatch(
    command: Command,
    backend: Arc<dyn QuizBackend>,
    tx: mpsc::UnboundedSender<BackendEvent>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let event = match command {
            Command::Generate(request) => BackendEvent::Question {
                ticket: request.ticket,
                result: backend
                    .generate_question(&request.difficulty, &request.topic)
                    .await,
            },
            Command::Evaluate(request) => BackendEvent::Evaluation {
                ticket: request.ticket,
                result: backend.evaluate_answer(&request.answer).await,
            },
        };
        if tx.send(event).is_err() {
            tracing::debug!("event loop gone, dropping backend result");
        }
    })
}

/// Plain-text summary of the saved statistics.
pub fn stats_report(state: &AppState) -> String {
    let stats = &state.stats;
    let mut report = format!(
        "Total questions: {}\nCompleted:       {}\nSkipped:         {}\nAverage score:   {:.1}\n",
        stats.total_questions, stats.completed_questions, stats.skipped_questions, stats.average_score
    );
    if let Some(latest) = state.history.first() {
        report.push_str(&format!(
            "Last practiced:  {} ({} · {})\n",
            latest.timestamp.format("%Y-%m-%d %H:%M"),
            latest.difficulty,
            latest.topic
        ));
    }
    report
}
