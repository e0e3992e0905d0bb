use serde::{Deserialize, Serialize};

use super::entry::{EntryStatus, QuestionHistoryEntry};

/// Aggregate counters derived from the history log.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserStats {
    pub total_questions: usize,
    pub completed_questions: usize,
    pub skipped_questions: usize,
    pub average_score: f64,
    pub total_score: f64,
}

/// Running totals that can absorb entries one at a time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatsAccumulator {
    total: usize,
    completed: usize,
    skipped: usize,
    total_score: f64,
}

impl StatsAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, entry: &QuestionHistoryEntry) {
        self.total += 1;
        match entry.status {
            EntryStatus::Completed => {
                self.completed += 1;
                self.total_score += entry.score();
            }
            EntryStatus::Skipped => self.skipped += 1,
            EntryStatus::Retry => {}
        }
    }

    pub fn stats(&self) -> UserStats {
        let average_score = if self.completed > 0 {
            self.total_score / self.completed as f64
        } else {
            0.0
        };

        UserStats {
            total_questions: self.total,
            completed_questions: self.completed,
            skipped_questions: self.skipped,
            average_score,
            total_score: self.total_score,
        }
    }
}

impl<'a> Extend<&'a QuestionHistoryEntry> for StatsAccumulator {
    fn extend<I: IntoIterator<Item = &'a QuestionHistoryEntry>>(&mut self, iter: I) {
        for entry in iter {
            self.record(entry);
        }
    }
}

/// Derives the aggregate stats for a history log.
pub fn compute_stats(history: &[QuestionHistoryEntry]) -> UserStats {
    let mut acc = StatsAccumulator::new();
    acc.extend(history);
    acc.stats()
}
