//! Wire-level tests for the OpenAI backend against a local mock server.

#![allow(clippy::unwrap_used, clippy::panic)]

use pizza_compare::prelude::*;
use serde_json::{Value, json};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> OpenAI {
    OpenAI::new(
        OpenAIConfig::new("sk-test")
            .with_base_url(server.uri())
            .with_timeout(5),
    )
    .unwrap()
}

fn sample_request() -> ComparisonRequest {
    let mut criteria = Criteria::new();
    criteria.insert("Crust", ["visible", "golden"]);

    let reference = EncodedImage::from_bytes("ref.jpg", &[0xFF, 0xD8, 0xFF, 0xE0]);
    let candidate = EncodedImage::from_bytes("test.png", &[0x89, 0x50, 0x4E, 0x47]);
    let prompt = build_comparison_prompt(reference.label(), candidate.label(), &criteria);

    ComparisonRequest::new(prompt, reference, candidate)
}

fn completion(text: &str) -> Value {
    json!({
        "id": "chatcmpl-pizza",
        "object": "chat.completion",
        "created": 1_700_000_000,
        "model": "gpt-4o-mini",
        "choices": [{
            "index": 0,
            "message": { "role": "assistant", "content": text },
            "finish_reason": "stop"
        }],
        "usage": { "prompt_tokens": 1500, "completion_tokens": 120, "total_tokens": 1620 }
    })
}

#[tokio::test]
async fn sends_single_multimodal_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("authorization", "Bearer sk-test"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("Conclusion: Valid Pizza")))
        .expect(1)
        .mount(&server)
        .await;

    let comparator = Comparator::new(client_for(&server));
    let result = comparator.compare(&sample_request()).await;
    assert_eq!(result.text(), Some("Conclusion: Valid Pizza"));

    let received = server.received_requests().await.unwrap();
    assert_eq!(received.len(), 1);
    let body: Value = received[0].body_json().unwrap();

    assert_eq!(body["model"], "gpt-4o-mini");
    assert_eq!(body["max_tokens"], 400);
    assert!((body["temperature"].as_f64().unwrap() - 0.7).abs() < 1e-6);

    let messages = body["messages"].as_array().unwrap();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0]["role"], "user");

    let parts = messages[0]["content"].as_array().unwrap();
    assert_eq!(parts.len(), 3);
    assert_eq!(parts[0]["type"], "text");
    assert!(
        parts[0]["text"]
            .as_str()
            .unwrap()
            .contains("1. Crust\n   - visible\n   - golden\n")
    );
    assert_eq!(parts[1]["type"], "image_url");
    assert_eq!(parts[1]["image_url"]["url"], "data:image/jpeg;base64,/9j/4A==");
    assert_eq!(parts[2]["type"], "image_url");
    assert_eq!(parts[2]["image_url"]["url"], "data:image/png;base64,iVBORw==");
}

#[tokio::test]
async fn rejected_key_becomes_failed_result() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": {
                "message": "Incorrect API key provided: sk-test.",
                "type": "invalid_request_error",
                "code": "invalid_api_key"
            }
        })))
        .mount(&server)
        .await;

    let result = Comparator::new(client_for(&server))
        .compare(&sample_request())
        .await;

    assert!(!result.is_success());
    assert!(matches!(result.error(), Some(LlmError::Auth { .. })));
    assert!(result.to_string().starts_with("Error: [openai] Incorrect API key"));
}

#[tokio::test]
async fn server_error_without_json_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503).set_body_string("upstream unavailable"))
        .mount(&server)
        .await;

    let result = Comparator::new(client_for(&server))
        .compare(&sample_request())
        .await;

    assert!(matches!(
        result.error(),
        Some(LlmError::HttpStatus { status: 503, .. })
    ));
}

#[tokio::test]
async fn unreachable_endpoint_is_network_failure() {
    // Reserve a free port, then release it so nothing is listening there.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let client = OpenAI::new(
        OpenAIConfig::new("sk-test")
            .with_base_url(format!("http://127.0.0.1:{port}"))
            .with_timeout(5),
    )
    .unwrap();
    let result = Comparator::new(client).compare(&sample_request()).await;

    assert!(matches!(result.error(), Some(LlmError::Network(_))));
    assert!(result.to_string().starts_with("Error:"));
}

#[tokio::test]
async fn malformed_success_body_is_format_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let result = Comparator::new(client_for(&server))
        .compare(&sample_request())
        .await;

    assert!(matches!(
        result.error(),
        Some(LlmError::ResponseFormat { .. })
    ));
}
