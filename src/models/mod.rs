mod entry;
mod state;
mod stats;

pub use entry::{
    Difficulty, EntryStatus, Evaluation, MAX_SCORE, QuestionHistoryEntry, RETRY_SCORE_THRESHOLD,
};
pub use state::{AppState, QuizState, Step};
pub use stats::{StatsAccumulator, UserStats, compute_stats};
