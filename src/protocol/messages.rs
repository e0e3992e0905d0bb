//! Request and response bodies for the question service.
//!
//! All bodies are JSON over HTTP POST.

use serde::{Deserialize, Serialize};

use crate::models::Evaluation;

pub const GENERATE_QUESTION_PATH: &str = "/generate-question";
pub const EVALUATE_ANSWER_PATH: &str = "/evaluate-answer";

/// Default service address.
pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8000";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateQuestionRequest {
    pub difficulty: String,
    pub topic: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateQuestionResponse {
    pub question: String,
}

/// Body of an evaluation request.
///
/// Carries only the answer: the service evaluates it against the question it
/// generated last, so callers must not interleave sessions on one backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluateAnswerRequest {
    pub answer: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluateAnswerResponse {
    pub feedback: String,
    pub score: f64,
}

impl From<EvaluateAnswerResponse> for Evaluation {
    fn from(response: EvaluateAnswerResponse) -> Self {
        Evaluation {
            feedback: response.feedback,
            score: response.score,
        }
    }
}
