use std::sync::{Arc, Mutex};

use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use interview_coach::{BackendError, HttpBackend, QuizBackend};
use serde_json::{Value, json};

type Seen = Arc<Mutex<Vec<Value>>>;

async fn serve(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

fn recording_router(seen: Seen) -> Router {
    let generate_seen = Arc::clone(&seen);
    let evaluate_seen = seen;
    Router::new()
        .route(
            "/generate-question",
            post(move |Json(body): Json<Value>| {
                let seen = Arc::clone(&generate_seen);
                async move {
                    seen.lock().unwrap().push(body);
                    Json(json!({ "question": "What does ReLU do?" }))
                }
            }),
        )
        .route(
            "/evaluate-answer",
            post(move |Json(body): Json<Value>| {
                let seen = Arc::clone(&evaluate_seen);
                async move {
                    seen.lock().unwrap().push(body);
                    Json(json!({ "feedback": "Good", "score": 8 }))
                }
            }),
        )
}

#[tokio::test]
async fn generate_and_evaluate_send_the_documented_bodies() {
    let seen: Seen = Arc::default();
    let base_url = serve(recording_router(Arc::clone(&seen))).await;
    let backend = HttpBackend::new(format!("{base_url}/"));

    let question = backend.generate_question("Easy", "Statistics").await.unwrap();
    assert_eq!(question, "What does ReLU do?");

    let evaluation = backend
        .evaluate_answer("relu introduces non-linearity")
        .await
        .unwrap();
    assert_eq!(evaluation.feedback, "Good");
    assert_eq!(evaluation.score, 8.0);

    let seen = seen.lock().unwrap();
    assert_eq!(seen[0], json!({ "difficulty": "Easy", "topic": "Statistics" }));
    assert_eq!(seen[1], json!({ "answer": "relu introduces non-linearity" }));
}

#[tokio::test]
async fn non_success_status_is_a_backend_error() {
    let router = Router::new()
        .route(
            "/generate-question",
            post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "model offline") }),
        )
        .route(
            "/evaluate-answer",
            post(|| async { (StatusCode::BAD_REQUEST, "Answer too short or unclear.") }),
        );
    let backend = HttpBackend::new(serve(router).await);

    let err = backend.generate_question("Hard", "Programming").await.unwrap_err();
    assert!(matches!(
        err,
        BackendError::HttpStatus(status) if status == StatusCode::INTERNAL_SERVER_ERROR
    ));

    let err = backend.evaluate_answer("short").await.unwrap_err();
    assert!(matches!(
        err,
        BackendError::HttpStatus(status) if status == StatusCode::BAD_REQUEST
    ));
}

#[tokio::test]
async fn malformed_body_is_a_backend_error() {
    let router = Router::new().route(
        "/generate-question",
        post(|| async { Json(json!({ "unexpected": true })) }),
    );
    let backend = HttpBackend::new(serve(router).await);

    let err = backend.generate_question("Medium", "Statistics").await.unwrap_err();
    assert!(matches!(err, BackendError::Http(_)));
}
