//! HTTP client for the question generation and evaluation service.

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::BackendError;
use crate::models::Evaluation;
use crate::protocol::{
    EVALUATE_ANSWER_PATH, EvaluateAnswerRequest, EvaluateAnswerResponse, GENERATE_QUESTION_PATH,
    GenerateQuestionRequest, GenerateQuestionResponse,
};

/// The remote service that writes questions and grades answers.
///
/// `evaluate_answer` is not bound to a question id: the service grades the
/// answer against the last question it generated for this client.
#[async_trait]
pub trait QuizBackend: Send + Sync {
    async fn generate_question(&self, difficulty: &str, topic: &str)
    -> Result<String, BackendError>;

    async fn evaluate_answer(&self, answer: &str) -> Result<Evaluation, BackendError>;
}

/// `QuizBackend` over HTTP+JSON. No retries and no timeouts.
#[derive(Clone, Debug)]
pub struct HttpBackend {
    client: Client,
    base_url: String,
}

impl HttpBackend {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }

    async fn post<B, R>(&self, path: &str, body: &B) -> Result<R, BackendError>
    where
        B: Serialize + ?Sized + Sync,
        R: DeserializeOwned,
    {
        let url = self.endpoint(path);
        tracing::debug!(%url, "backend request");

        let response = self.client.post(&url).json(body).send().await?;
        let status = response.status();
        if !status.is_success() {
            tracing::warn!(%url, %status, "backend returned an error status");
            return Err(BackendError::HttpStatus(status));
        }

        Ok(response.json().await?)
    }
}

#[async_trait]
impl QuizBackend for HttpBackend {
    async fn generate_question(
        &self,
        difficulty: &str,
        topic: &str,
    ) -> Result<String, BackendError> {
        let body = GenerateQuestionRequest {
            difficulty: difficulty.to_string(),
            topic: topic.to_string(),
        };
        let response: GenerateQuestionResponse = self.post(GENERATE_QUESTION_PATH, &body).await?;
        Ok(response.question)
    }

    async fn evaluate_answer(&self, answer: &str) -> Result<Evaluation, BackendError> {
        let body = EvaluateAnswerRequest {
            answer: answer.to_string(),
        };
        let response: EvaluateAnswerResponse = self.post(EVALUATE_ANSWER_PATH, &body).await?;
        Ok(response.into())
    }
}
