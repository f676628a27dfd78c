//! Integration tests for the generation service client
//!
//! Runs the client against a mock HTTP server for both API formats.

use ability_tracker::core::error::TrackerError;
use ability_tracker::llm::{ApiFormat, LlmClient, TaskClassifier, TextGenerator, FALLBACK_WELCOME};
use ability_tracker::tasks::Resolution;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn gemini_client(server: &MockServer) -> LlmClient {
    LlmClient::with_format(
        server.uri(),
        "gemini-2.0-flash-lite".into(),
        Duration::from_secs(5),
        ApiFormat::Gemini,
    )
    .unwrap()
}

fn openai_client(server: &MockServer) -> LlmClient {
    LlmClient::new(
        format!("{}/chat/completions", server.uri()),
        "test-model".into(),
        Duration::from_secs(5),
    )
    .unwrap()
}

#[tokio::test]
async fn test_gemini_returns_candidate_text() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/models/gemini-2.0-flash-lite:generateContent"))
        .and(header("x-goog-api-key", "test-key"))
        .and(body_string_contains("hello"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{
                "content": { "role": "model", "parts": [{ "text": "{\"耐力\": " }, { "text": "3.0}" }] }
            }]
        })))
        .mount(&server)
        .await;

    let text = gemini_client(&server).generate("test-key", "hello").await.unwrap();
    assert_eq!(text, "{\"耐力\": 3.0}");
}

#[tokio::test]
async fn test_gemini_error_status_is_unavailable() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(403).set_body_string("API key not valid"))
        .mount(&server)
        .await;

    let err = gemini_client(&server).generate("bad", "hello").await.unwrap_err();
    match err {
        TrackerError::ClassifierUnavailable(message) => {
            assert!(message.contains("403"));
            assert!(message.contains("API key not valid"));
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_gemini_without_candidates_is_unavailable() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "candidates": [] })))
        .mount(&server)
        .await;

    let err = gemini_client(&server).generate("k", "hello").await.unwrap_err();
    assert!(matches!(err, TrackerError::ClassifierUnavailable(_)));
}

#[tokio::test]
async fn test_openai_format_uses_bearer_auth() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("authorization", "Bearer sk-test"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{ "message": { "role": "assistant", "content": "hi there" } }]
        })))
        .mount(&server)
        .await;

    let client = openai_client(&server);
    assert_eq!(client.api_format(), ApiFormat::OpenAI);
    assert_eq!(client.generate("sk-test", "hi").await.unwrap(), "hi there");
}

#[tokio::test]
async fn test_timeout_is_unavailable() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "choices": [] }))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let client = LlmClient::new(
        format!("{}/chat/completions", server.uri()),
        "test-model".into(),
        Duration::from_millis(200),
    )
    .unwrap();
    let err = client.generate("k", "hi").await.unwrap_err();
    assert!(matches!(err, TrackerError::ClassifierUnavailable(_)));
}

#[tokio::test]
async fn test_unreachable_service_is_unavailable() {
    let server = MockServer::start().await;
    let uri = server.uri();
    drop(server);

    let client = LlmClient::with_format(uri, "m".into(), Duration::from_secs(1), ApiFormat::Gemini)
        .unwrap();
    let err = client.generate("k", "hi").await.unwrap_err();
    assert!(matches!(err, TrackerError::ClassifierUnavailable(_)));
}

#[tokio::test]
async fn test_classifier_sends_task_in_prompt() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(body_string_contains("practice piano"))
        .and(body_string_contains("abandoned"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{ "content": { "parts": [{ "text": "{\"專注力\": 2.5}" }] } }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let classifier = TaskClassifier::new(Arc::new(gemini_client(&server)));
    let raw = classifier
        .classify("k", "practice piano", Resolution::Abandoned)
        .await
        .unwrap();
    assert_eq!(raw, "{\"專注力\": 2.5}");
}

#[tokio::test]
async fn test_welcome_falls_back_on_service_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let classifier = TaskClassifier::new(Arc::new(gemini_client(&server)));
    assert_eq!(classifier.welcome_message(Some("k")).await, FALLBACK_WELCOME);
}
