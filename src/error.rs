//! Error types shared across the crate.

use std::io;

use thiserror::Error;

use crate::models::Step;

/// An action was attempted without the inputs or step it needs.
///
/// These are caught before any request leaves the process.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ValidationError {
    #[error("choose a difficulty first")]
    MissingDifficulty,
    #[error("choose a topic first")]
    MissingTopic,
    #[error("answer must not be empty")]
    EmptyAnswer,
    #[error("a request is already in flight")]
    Busy,
    #[error("{action} is not available from the {step} step")]
    InvalidStep { action: &'static str, step: Step },
}

/// Failures talking to the question/evaluation service.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum BackendError {
    #[error("backend request failed with status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error("backend unavailable: {0}")]
    Unavailable(String),
}

/// Stored state could not be read or written.
///
/// Read failures are recovered by falling back to the default state.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PersistenceError {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("stored state is malformed: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Errors returned by quiz transitions that talk to the backend.
#[derive(Debug, Error)]
pub enum QuizError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Backend(#[from] BackendError),
}

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("invalid backend url {url}: {reason}")]
    InvalidBackendUrl { url: String, reason: String },
    #[error("no usable state directory; pass --state-dir")]
    NoStateDir,
}

/// Top-level error for running the coach.
#[derive(Debug, Error)]
pub enum CoachError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}
