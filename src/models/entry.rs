use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Score below which a completed entry is offered for retry.
pub const RETRY_SCORE_THRESHOLD: f64 = 5.0;

/// Highest score the evaluator hands out.
pub const MAX_SCORE: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }

    /// Parses the label stored in history. Unknown labels yield `None`.
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|d| d.as_str() == label)
    }

    pub fn next(self) -> Self {
        match self {
            Difficulty::Easy => Difficulty::Medium,
            Difficulty::Medium => Difficulty::Hard,
            Difficulty::Hard => Difficulty::Easy,
        }
    }

    pub fn previous(self) -> Self {
        match self {
            Difficulty::Easy => Difficulty::Hard,
            Difficulty::Medium => Difficulty::Easy,
            Difficulty::Hard => Difficulty::Medium,
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Feedback and score returned by the evaluator for one answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    pub feedback: String,
    pub score: f64,
}

/// How a history entry was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryStatus {
    Completed,
    Skipped,
    Retry,
}

impl fmt::Display for EntryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            EntryStatus::Completed => "completed",
            EntryStatus::Skipped => "skipped",
            EntryStatus::Retry => "retry",
        };
        f.write_str(label)
    }
}

/// One resolved (or skipped) question in the history log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionHistoryEntry {
    pub id: String,
    pub question: String,
    pub answer: String,
    pub evaluation: Option<Evaluation>,
    pub difficulty: String,
    pub topic: String,
    pub timestamp: DateTime<Utc>,
    pub status: EntryStatus,
}

impl QuestionHistoryEntry {
    /// Score of the entry, treating a missing evaluation as zero.
    pub fn score(&self) -> f64 {
        self.evaluation.as_ref().map_or(0.0, |e| e.score)
    }

    /// Skipped entries and weak answers are worth another attempt.
    pub fn is_retry_candidate(&self) -> bool {
        match self.status {
            EntryStatus::Skipped => true,
            _ => self
                .evaluation
                .as_ref()
                .is_some_and(|e| e.score < RETRY_SCORE_THRESHOLD),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::fixed_now;

    fn entry(status: EntryStatus, score: Option<f64>) -> QuestionHistoryEntry {
        QuestionHistoryEntry {
            id: "1".to_string(),
            question: "What is overfitting?".to_string(),
            answer: String::new(),
            evaluation: score.map(|score| Evaluation {
                feedback: "ok".to_string(),
                score,
            }),
            difficulty: "Easy".to_string(),
            topic: "Machine Learning".to_string(),
            timestamp: fixed_now(),
            status,
        }
    }

    #[test]
    fn test_difficulty_cycles_and_parses() {
        assert_eq!(Difficulty::Hard.next(), Difficulty::Easy);
        assert_eq!(Difficulty::Easy.previous(), Difficulty::Hard);
        assert_eq!(Difficulty::from_label("Medium"), Some(Difficulty::Medium));
        assert_eq!(Difficulty::from_label("medium"), None);
    }

    #[test]
    fn test_retry_candidates() {
        assert!(entry(EntryStatus::Skipped, None).is_retry_candidate());
        assert!(entry(EntryStatus::Completed, Some(4.0)).is_retry_candidate());
        assert!(!entry(EntryStatus::Completed, Some(5.0)).is_retry_candidate());
        assert!(!entry(EntryStatus::Completed, None).is_retry_candidate());
    }

    #[test]
    fn test_entry_serialization_uses_stored_shape() {
        let json = serde_json::to_string(&entry(EntryStatus::Skipped, None)).unwrap();
        assert!(json.contains("\"status\":\"skipped\""));
        assert!(json.contains("\"evaluation\":null"));
        assert!(json.contains("\"timestamp\":\"2023-11-14T22:13:20Z\""));
    }
}
