//! The quiz flow: setup, question, feedback and the history side view.
//!
//! Backend calls are split into a `begin_*` half that validates and hands out
//! a [`RequestTicket`], and a `finish_*` half that applies the result. Every
//! transition advances the session generation, so a result whose ticket was
//! issued before the latest transition is discarded instead of clobbering the
//! newer state.

use crate::client::QuizBackend;
use crate::error::{BackendError, QuizError, ValidationError};
use crate::history::{EntryDraft, HistoryManager, new_question_id};
use crate::models::{AppState, Evaluation, QuizState, Step};

pub const GENERATE_FAILED_MESSAGE: &str =
    "Failed to generate question. Please check your backend connection and try again.";
pub const EVALUATE_FAILED_MESSAGE: &str =
    "Failed to evaluate answer. Please check your backend connection and try again.";

/// Tags an in-flight request with the generation that issued it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestTicket {
    generation: u64,
}

impl RequestTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// A validated question request, ready to be sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateRequest {
    pub ticket: RequestTicket,
    pub difficulty: String,
    pub topic: String,
}

/// A validated evaluation request, ready to be sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvaluateRequest {
    pub ticket: RequestTicket,
    pub answer: String,
}

/// What happened to a backend result handed back to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Applied,
    /// The session moved on after the request was issued.
    Discarded,
}

/// Owns the transient quiz state and the persisted history.
pub struct QuizSession {
    quiz: QuizState,
    history: HistoryManager,
    generation: u64,
}

impl QuizSession {
    pub fn new(history: HistoryManager) -> Self {
        Self {
            quiz: QuizState::default(),
            history,
            generation: 0,
        }
    }

    pub fn quiz(&self) -> &QuizState {
        &self.quiz
    }

    pub fn app_state(&self) -> &AppState {
        self.history.state()
    }

    pub fn history(&self) -> &HistoryManager {
        &self.history
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Starts a new generation. Anything still in flight becomes stale.
    fn advance(&mut self) -> RequestTicket {
        self.generation += 1;
        self.quiz.is_loading = false;
        RequestTicket {
            generation: self.generation,
        }
    }

    fn is_current(&self, ticket: RequestTicket) -> bool {
        ticket.generation == self.generation
    }

    fn require_step(&self, action: &'static str, allowed: &[Step]) -> Result<(), ValidationError> {
        if allowed.contains(&self.quiz.step) {
            Ok(())
        } else {
            Err(ValidationError::InvalidStep {
                action,
                step: self.quiz.step,
            })
        }
    }

    pub fn set_difficulty(&mut self, difficulty: &str) {
        if !self.quiz.is_loading {
            self.quiz.difficulty = difficulty.to_string();
        }
    }

    pub fn set_topic(&mut self, topic: &str) {
        if !self.quiz.is_loading {
            self.quiz.topic = topic.to_string();
        }
    }

    /// Replaces the draft answer. Ignored outside the question step or while loading.
    pub fn set_answer(&mut self, answer: impl Into<String>) {
        if self.quiz.step == Step::Question && !self.quiz.is_loading {
            self.quiz.user_answer = answer.into();
        }
    }

    pub fn push_answer_char(&mut self, c: char) {
        if self.quiz.step == Step::Question && !self.quiz.is_loading {
            self.quiz.user_answer.push(c);
        }
    }

    pub fn pop_answer_char(&mut self) {
        if self.quiz.step == Step::Question && !self.quiz.is_loading {
            self.quiz.user_answer.pop();
        }
    }

    /// Validates the setup and marks the session loading.
    pub fn begin_generate(&mut self) -> Result<GenerateRequest, ValidationError> {
        if self.quiz.is_loading {
            return Err(ValidationError::Busy);
        }
        self.require_step("generate", &[Step::Setup])?;
        if self.quiz.difficulty.is_empty() {
            return Err(ValidationError::MissingDifficulty);
        }
        if self.quiz.topic.is_empty() {
            return Err(ValidationError::MissingTopic);
        }

        let ticket = self.advance();
        self.quiz.is_loading = true;
        self.quiz.error = None;
        tracing::debug!(
            generation = ticket.generation,
            difficulty = %self.quiz.difficulty,
            topic = %self.quiz.topic,
            "requesting question"
        );

        Ok(GenerateRequest {
            ticket,
            difficulty: self.quiz.difficulty.clone(),
            topic: self.quiz.topic.clone(),
        })
    }

    /// Applies a question result. Failures are recorded and handed back.
    pub fn finish_generate(
        &mut self,
        ticket: RequestTicket,
        result: Result<String, BackendError>,
    ) -> Result<Resolution, BackendError> {
        if !self.is_current(ticket) {
            tracing::debug!(generation = ticket.generation, "discarding stale question");
            return Ok(Resolution::Discarded);
        }
        self.quiz.is_loading = false;

        match result {
            Ok(question) => {
                self.advance();
                self.quiz.current_question_id = new_question_id();
                self.quiz.current_question = question;
                self.quiz.user_answer.clear();
                self.quiz.evaluation = None;
                self.quiz.step = Step::Question;
                tracing::info!(id = %self.quiz.current_question_id, "question received");
                Ok(Resolution::Applied)
            }
            Err(err) => {
                tracing::warn!(error = %err, "question generation failed");
                self.quiz.error = Some(GENERATE_FAILED_MESSAGE.to_string());
                Err(err)
            }
        }
    }

    /// Validates the draft answer and marks the session loading.
    pub fn begin_submit(&mut self) -> Result<EvaluateRequest, ValidationError> {
        if self.quiz.is_loading {
            return Err(ValidationError::Busy);
        }
        self.require_step("submit", &[Step::Question])?;
        if self.quiz.user_answer.trim().is_empty() {
            return Err(ValidationError::EmptyAnswer);
        }

        let ticket = self.advance();
        self.quiz.is_loading = true;
        self.quiz.error = None;
        tracing::debug!(generation = ticket.generation, "submitting answer");

        Ok(EvaluateRequest {
            ticket,
            answer: self.quiz.user_answer.clone(),
        })
    }

    /// Applies an evaluation result. Failures are recorded and handed back.
    pub fn finish_submit(
        &mut self,
        ticket: RequestTicket,
        result: Result<Evaluation, BackendError>,
    ) -> Result<Resolution, BackendError> {
        if !self.is_current(ticket) {
            tracing::debug!(generation = ticket.generation, "discarding stale evaluation");
            return Ok(Resolution::Discarded);
        }
        self.quiz.is_loading = false;

        match result {
            Ok(evaluation) => {
                self.advance();
                tracing::info!(score = evaluation.score, "answer evaluated");
                self.quiz.evaluation = Some(evaluation);
                self.quiz.step = Step::Feedback;
                Ok(Resolution::Applied)
            }
            Err(err) => {
                tracing::warn!(error = %err, "answer evaluation failed");
                self.quiz.error = Some(EVALUATE_FAILED_MESSAGE.to_string());
                Err(err)
            }
        }
    }

    /// Requests a question and waits for it.
    pub async fn generate<B>(&mut self, backend: &B) -> Result<Resolution, QuizError>
    where
        B: QuizBackend + ?Sized,
    {
        let request = self.begin_generate()?;
        let result = backend
            .generate_question(&request.difficulty, &request.topic)
            .await;
        Ok(self.finish_generate(request.ticket, result)?)
    }

    /// Replaces the draft answer with `answer`, submits it and waits.
    pub async fn submit<B>(&mut self, answer: &str, backend: &B) -> Result<Resolution, QuizError>
    where
        B: QuizBackend + ?Sized,
    {
        if self.quiz.is_loading {
            return Err(ValidationError::Busy.into());
        }
        self.require_step("submit", &[Step::Question])?;
        if answer.trim().is_empty() {
            return Err(ValidationError::EmptyAnswer.into());
        }
        self.quiz.user_answer = answer.to_string();

        let request = self.begin_submit()?;
        let result = backend.evaluate_answer(&request.answer).await;
        Ok(self.finish_submit(request.ticket, result)?)
    }

    /// Records the current question as skipped and returns to setup.
    pub fn skip(&mut self) -> Result<(), ValidationError> {
        self.require_step("skip", &[Step::Question])?;
        self.advance();
        self.history
            .append(EntryDraft::from_quiz(&self.quiz).skipped());
        self.quiz.clear_question();
        self.quiz.step = Step::Setup;
        Ok(())
    }

    /// Records the evaluated question and returns to setup.
    pub fn new_question(&mut self) -> Result<(), ValidationError> {
        self.require_step("new question", &[Step::Feedback])?;
        self.advance();
        self.record_completed();
        self.quiz.clear_question();
        self.quiz.step = Step::Setup;
        Ok(())
    }

    /// Records the evaluated question and resets the whole quiz state.
    pub fn start_over(&mut self) -> Result<(), ValidationError> {
        self.require_step("start over", &[Step::Feedback])?;
        self.advance();
        self.record_completed();
        self.quiz = QuizState::default();
        Ok(())
    }

    fn record_completed(&mut self) {
        if self.quiz.evaluation.is_some() {
            self.history.append(EntryDraft::from_quiz(&self.quiz));
        } else {
            tracing::debug!("no evaluation present, nothing recorded");
        }
    }

    /// Returns to setup without touching history.
    pub fn back_to_setup(&mut self) {
        self.advance();
        self.quiz.step = Step::Setup;
    }

    /// Opens the history side view. Only reachable from setup, so a graded
    /// answer is always recorded before its feedback is left.
    pub fn show_history(&mut self) -> Result<(), ValidationError> {
        self.require_step("show history", &[Step::Setup, Step::History])?;
        self.advance();
        self.quiz.step = Step::History;
        Ok(())
    }

    /// Reopens a question from history. Unknown ids leave the session untouched.
    pub fn retry(&mut self, question_id: &str) -> bool {
        let Some(entry) = self.history.find(question_id) else {
            tracing::debug!(id = question_id, "retry requested for unknown entry");
            return false;
        };
        let quiz = QuizState {
            difficulty: entry.difficulty.clone(),
            topic: entry.topic.clone(),
            current_question: entry.question.clone(),
            user_answer: String::new(),
            evaluation: None,
            is_loading: false,
            step: Step::Question,
            current_question_id: entry.id.clone(),
            error: None,
        };

        self.advance();
        self.quiz = quiz;
        tracing::info!(id = question_id, "retrying question");
        true
    }

    /// Clears a surfaced backend error so the user can try again.
    pub fn dismiss_error(&mut self) {
        self.quiz.error = None;
        self.quiz.is_loading = false;
    }

    pub fn toggle_dark_mode(&mut self) -> bool {
        self.history.toggle_dark_mode()
    }
}
