use meetkit_core::{Content, GenerateContentConfig, Llm, LlmRequest};
use meetkit_model::retry::RetryConfig;
use meetkit_model::{GeminiConfig, GeminiModel};
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

fn request(text: &str) -> LlmRequest {
    LlmRequest {
        model: "gemini-2.5-flash".to_string(),
        contents: vec![Content::user_text(text)],
        tools: vec![],
        config: GenerateContentConfig::default(),
    }
}

fn candidate_body(text: &str) -> serde_json::Value {
    json!({
        "candidates": [{
            "content": {"role": "model", "parts": [{"text": text}]},
            "finishReason": "STOP"
        }],
        "usageMetadata": {"promptTokenCount": 4, "candidatesTokenCount": 3, "totalTokenCount": 7}
    })
}

#[tokio::test]
async fn generate_maps_first_candidate() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/models/gemini-2.5-flash:generateContent"))
        .and(header("x-goog-api-key", "test-key"))
        .and(body_partial_json(json!({
            "contents": [{"role": "user", "parts": [{"text": "hello"}]}]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(candidate_body("Hi there")))
        .expect(1)
        .mount(&server)
        .await;

    let model = GeminiModel::new(
        GeminiConfig::new("test-key", "gemini-2.5-flash").with_base_url(server.uri()),
    )
    .unwrap();

    let response = model.generate(request("hello")).await.unwrap();
    assert_eq!(response.text().as_deref(), Some("Hi there"));
    assert_eq!(response.usage_metadata.unwrap().total_token_count, 7);
}

#[tokio::test]
async fn generate_surfaces_function_calls() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/models/gemini-2.5-flash:generateContent"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{
                "content": {
                    "role": "model",
                    "parts": [{"functionCall": {
                        "name": "schedule_meeting",
                        "args": {"topic": "Standup", "duration": 15}
                    }}]
                },
                "finishReason": "STOP"
            }]
        })))
        .mount(&server)
        .await;

    let model = GeminiModel::new(
        GeminiConfig::new("test-key", "gemini-2.5-flash").with_base_url(server.uri()),
    )
    .unwrap();

    let response = model.generate(request("book a standup")).await.unwrap();
    assert!(response.has_function_calls());
    let content = response.content.unwrap();
    assert_eq!(content.function_calls()[0].name, "schedule_meeting");
}

struct FlakyResponder {
    calls: std::sync::atomic::AtomicU32,
}

impl Respond for FlakyResponder {
    fn respond(&self, _request: &Request) -> ResponseTemplate {
        if self.calls.fetch_add(1, std::sync::atomic::Ordering::SeqCst) == 0 {
            ResponseTemplate::new(503).set_body_string("model overloaded")
        } else {
            ResponseTemplate::new(200).set_body_json(candidate_body("recovered"))
        }
    }
}

#[tokio::test]
async fn generate_retries_on_503() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/models/gemini-2.5-flash:generateContent"))
        .respond_with(FlakyResponder { calls: std::sync::atomic::AtomicU32::new(0) })
        .expect(2)
        .mount(&server)
        .await;

    let model = GeminiModel::new(
        GeminiConfig::new("test-key", "gemini-2.5-flash").with_base_url(server.uri()),
    )
    .unwrap()
    .with_retry_config(
        RetryConfig::default().with_max_retries(2).with_initial_delay(Duration::from_millis(1)),
    );

    let response = model.generate(request("hello")).await.unwrap();
    assert_eq!(response.text().as_deref(), Some("recovered"));
}

#[tokio::test]
async fn generate_reports_api_errors() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/models/gemini-2.5-flash:generateContent"))
        .respond_with(
            ResponseTemplate::new(400).set_body_string("API key not valid. Please pass a valid API key."),
        )
        .mount(&server)
        .await;

    let model = GeminiModel::new(
        GeminiConfig::new("bad-key", "gemini-2.5-flash").with_base_url(server.uri()),
    )
    .unwrap();

    let err = model.generate(request("hello")).await.unwrap_err();
    let message = err.to_string();
    assert!(message.contains("400"), "unexpected error: {message}");
    assert!(message.contains("API key not valid"), "unexpected error: {message}");
}
