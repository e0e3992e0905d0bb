use std::fmt;

use serde::{Deserialize, Serialize};

use super::entry::{Evaluation, QuestionHistoryEntry};
use super::stats::UserStats;

/// Current phase of the quiz flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Step {
    #[default]
    Setup,
    Question,
    Feedback,
    History,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Step::Setup => "setup",
            Step::Question => "question",
            Step::Feedback => "feedback",
            Step::History => "history",
        };
        f.write_str(label)
    }
}

/// Persisted application state. History is ordered newest first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppState {
    #[serde(alias = "isDarkMode")]
    pub dark_mode_enabled: bool,
    pub history: Vec<QuestionHistoryEntry>,
    pub stats: UserStats,
}

/// Transient per-session quiz state. Never persisted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QuizState {
    pub difficulty: String,
    pub topic: String,
    pub current_question: String,
    pub user_answer: String,
    pub evaluation: Option<Evaluation>,
    pub is_loading: bool,
    pub step: Step,
    pub current_question_id: String,
    /// Retryable message from the last failed backend call.
    pub error: Option<String>,
}

impl QuizState {
    /// Clears the question-scoped fields, keeping difficulty and topic.
    pub(crate) fn clear_question(&mut self) {
        self.current_question.clear();
        self.user_answer.clear();
        self.evaluation = None;
    }

    pub fn can_generate(&self) -> bool {
        !self.is_loading && !self.difficulty.is_empty() && !self.topic.is_empty()
    }

    pub fn can_submit(&self) -> bool {
        !self.is_loading && !self.user_answer.trim().is_empty()
    }
}
