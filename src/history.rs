//! Append-only history log and the persisted application state around it.

use uuid::Uuid;

use crate::data::{StateStore, load_state, save_state};
use crate::models::{
    AppState, EntryStatus, Evaluation, QuestionHistoryEntry, QuizState, UserStats, compute_stats,
};
use crate::time::Clock;

/// A history entry before it is stamped and appended.
#[derive(Debug, Clone, PartialEq)]
pub struct EntryDraft {
    pub id: String,
    pub question: String,
    pub answer: String,
    pub evaluation: Option<Evaluation>,
    pub difficulty: String,
    pub topic: String,
    pub status: EntryStatus,
}

impl EntryDraft {
    /// Captures the current question as a completed entry.
    pub fn from_quiz(quiz: &QuizState) -> Self {
        Self {
            id: quiz.current_question_id.clone(),
            question: quiz.current_question.clone(),
            answer: quiz.user_answer.clone(),
            evaluation: quiz.evaluation.clone(),
            difficulty: quiz.difficulty.clone(),
            topic: quiz.topic.clone(),
            status: EntryStatus::Completed,
        }
    }

    /// Marks the draft skipped, dropping any answer and evaluation.
    pub fn skipped(mut self) -> Self {
        self.status = EntryStatus::Skipped;
        self.answer.clear();
        self.evaluation = None;
        self
    }
}

/// Fresh, time-ordered id for a question.
pub fn new_question_id() -> String {
    Uuid::now_v7().to_string()
}

/// Owns the persisted `AppState` and writes it back after every change.
pub struct HistoryManager {
    store: Box<dyn StateStore>,
    key: String,
    state: AppState,
    clock: Clock,
}

impl HistoryManager {
    /// Loads state from `store`, falling back to defaults.
    pub fn load(store: Box<dyn StateStore>, key: impl Into<String>) -> Self {
        let key = key.into();
        let state = load_state(store.as_ref(), &key);
        Self {
            store,
            key,
            state,
            clock: Clock::default(),
        }
    }

    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn history(&self) -> &[QuestionHistoryEntry] {
        &self.state.history
    }

    pub fn stats(&self) -> &UserStats {
        &self.state.stats
    }

    pub fn dark_mode_enabled(&self) -> bool {
        self.state.dark_mode_enabled
    }

    pub fn find(&self, id: &str) -> Option<&QuestionHistoryEntry> {
        self.state.history.iter().find(|entry| entry.id == id)
    }

    /// Stamps `draft`, prepends it and recomputes the stats.
    ///
    /// History and stats are replaced together before the state is saved.
    pub fn append(&mut self, draft: EntryDraft) -> &QuestionHistoryEntry {
        let id = if draft.id.is_empty() || self.find(&draft.id).is_some() {
            // Retried questions reuse their id; the log keeps ids unique.
            new_question_id()
        } else {
            draft.id
        };

        let entry = QuestionHistoryEntry {
            id,
            question: draft.question,
            answer: draft.answer,
            evaluation: draft.evaluation,
            difficulty: draft.difficulty,
            topic: draft.topic,
            timestamp: self.clock.now(),
            status: draft.status,
        };
        tracing::info!(id = %entry.id, status = %entry.status, "history entry appended");

        let mut history = Vec::with_capacity(self.state.history.len() + 1);
        history.push(entry);
        history.extend(self.state.history.iter().cloned());
        let stats = compute_stats(&history);

        self.state = AppState {
            dark_mode_enabled: self.state.dark_mode_enabled,
            history,
            stats,
        };
        self.persist();

        &self.state.history[0]
    }

    pub fn toggle_dark_mode(&mut self) -> bool {
        self.state.dark_mode_enabled = !self.state.dark_mode_enabled;
        self.persist();
        self.state.dark_mode_enabled
    }

    fn persist(&self) {
        if let Err(err) = save_state(self.store.as_ref(), &self.key, &self.state) {
            tracing::warn!(key = %self.key, error = %err, "failed to persist state");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{MemoryStore, STATE_KEY};
    use crate::models::Step;
    use crate::time::fixed_now;
    use chrono::Duration;

    fn quiz_with_answer() -> QuizState {
        QuizState {
            difficulty: "Easy".to_string(),
            topic: "Statistics".to_string(),
            current_question: "What is variance?".to_string(),
            user_answer: "Spread around the mean".to_string(),
            evaluation: Some(Evaluation {
                feedback: "Good".to_string(),
                score: 7.0,
            }),
            is_loading: false,
            step: Step::Feedback,
            current_question_id: "q-1".to_string(),
            error: None,
        }
    }

    fn manager(store: &MemoryStore) -> HistoryManager {
        HistoryManager::load(Box::new(store.clone()), STATE_KEY).with_clock(Clock::fixed(fixed_now()))
    }

    #[test]
    fn test_append_prepends_stamps_and_persists() {
        let store = MemoryStore::new();
        let mut history = manager(&store);

        history.append(EntryDraft::from_quiz(&quiz_with_answer()));
        let mut second = quiz_with_answer();
        second.current_question_id = "q-2".to_string();
        history.clock.advance(Duration::seconds(30));
        history.append(EntryDraft::from_quiz(&second).skipped());

        let entries = history.history();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].id, "q-2");
        assert_eq!(entries[0].status, EntryStatus::Skipped);
        assert_eq!(entries[0].answer, "");
        assert_eq!(entries[0].evaluation, None);
        assert_eq!(entries[0].timestamp, fixed_now() + Duration::seconds(30));
        assert_eq!(entries[1].id, "q-1");
        assert_eq!(entries[1].status, EntryStatus::Completed);

        assert_eq!(history.stats().total_questions, 2);
        assert_eq!(history.stats().skipped_questions, 1);
        assert_eq!(history.stats().average_score, 7.0);

        let reloaded = manager(&store);
        assert_eq!(reloaded.state(), history.state());
    }

    #[test]
    fn test_duplicate_or_missing_id_gets_a_fresh_one() {
        let store = MemoryStore::new();
        let mut history = manager(&store);

        history.append(EntryDraft::from_quiz(&quiz_with_answer()));
        let retried_id = history.append(EntryDraft::from_quiz(&quiz_with_answer())).id.clone();
        assert_ne!(retried_id, "q-1");
        assert!(!retried_id.is_empty());

        let mut anonymous = quiz_with_answer();
        anonymous.current_question_id.clear();
        let id = history.append(EntryDraft::from_quiz(&anonymous)).id.clone();
        assert!(!id.is_empty());
        assert_eq!(history.history().len(), 3);
    }

    #[test]
    fn test_toggle_dark_mode_persists() {
        let store = MemoryStore::new();
        let mut history = manager(&store);
        assert!(history.toggle_dark_mode());
        assert!(manager(&store).dark_mode_enabled());
        assert!(!history.toggle_dark_mode());
        assert!(!manager(&store).dark_mode_enabled());
    }

    #[test]
    fn test_find_by_id() {
        let store = MemoryStore::new();
        let mut history = manager(&store);
        history.append(EntryDraft::from_quiz(&quiz_with_answer()));
        assert!(history.find("q-1").is_some());
        assert!(history.find("missing").is_none());
    }
}
