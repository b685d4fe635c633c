//! Gemini client over the `generateContent` REST API.

use crate::retry::{RetryConfig, execute_with_retry, is_retryable_model_error};
use async_trait::async_trait;
use meetkit_core::{
    Content, FinishReason, Llm, LlmRequest, LlmResponse, MeetkitError, Part, Result,
    UsageMetadata,
};
use reqwest::Client;
use serde::{Deserialize, Serialize};

/// Default Gemini API base URL.
pub const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Model used when the caller does not pick one.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Configuration for the Gemini API.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    /// Gemini API key.
    pub api_key: String,
    /// Model name, e.g. `gemini-2.5-flash`.
    pub model: String,
    /// Optional custom base URL (used by tests to point at a stub server).
    pub base_url: Option<String>,
}

impl GeminiConfig {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self { api_key: api_key.into(), model: model.into(), base_url: None }
    }

    /// Config for the default `gemini-2.5-flash` model.
    pub fn flash(api_key: impl Into<String>) -> Self {
        Self::new(api_key, DEFAULT_MODEL)
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }
}

/// Gemini model client.
///
/// # Example
///
/// ```rust,ignore
/// use meetkit_model::{GeminiConfig, GeminiModel};
///
/// let model = GeminiModel::new(GeminiConfig::flash(
///     std::env::var("GOOGLE_API_KEY").unwrap(),
/// ))?;
/// ```
pub struct GeminiModel {
    client: Client,
    config: GeminiConfig,
    retry_config: RetryConfig,
}

impl GeminiModel {
    pub fn new(config: GeminiConfig) -> Result<Self> {
        let client = Client::builder()
            .build()
            .map_err(|e| MeetkitError::Model(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, config, retry_config: RetryConfig::default() })
    }

    #[must_use]
    pub fn with_retry_config(mut self, retry_config: RetryConfig) -> Self {
        self.retry_config = retry_config;
        self
    }

    /// Build the API URL for the configured model.
    fn api_url(&self) -> String {
        let base = self.config.base_url.as_deref().unwrap_or(GEMINI_API_BASE);
        format!("{}/models/{}:generateContent", base.trim_end_matches('/'), self.config.model)
    }

    fn build_request(&self, request: &LlmRequest) -> GenerateContentRequest {
        let system_instruction = request
            .config
            .system_instruction
            .as_ref()
            .map(|text| SystemInstruction { parts: vec![Part::text_part(text.clone())] });

        let tools = if request.tools.is_empty() {
            None
        } else {
            Some(vec![ToolDeclarations { function_declarations: request.tools.clone() }])
        };

        let generation_config =
            if request.config.temperature.is_none() && request.config.max_output_tokens.is_none() {
                None
            } else {
                Some(GenerationConfig {
                    temperature: request.config.temperature,
                    max_output_tokens: request.config.max_output_tokens,
                })
            };

        GenerateContentRequest {
            system_instruction,
            contents: request.contents.clone(),
            tools,
            generation_config,
        }
    }
}

#[async_trait]
impl Llm for GeminiModel {
    fn model_name(&self) -> &str {
        &self.config.model
    }

    async fn generate(&self, request: LlmRequest) -> Result<LlmResponse> {
        let api_url = self.api_url();
        let body = self.build_request(&request);

        let response = execute_with_retry(&self.retry_config, is_retryable_model_error, || {
            let client = self.client.clone();
            let api_url = api_url.clone();
            let api_key = self.config.api_key.clone();
            let body = body.clone();
            async move {
                let response = client
                    .post(&api_url)
                    .header("x-goog-api-key", api_key)
                    .header("Content-Type", "application/json")
                    .json(&body)
                    .send()
                    .await
                    .map_err(|e| MeetkitError::Model(format!("Request failed: {}", e)))?;

                let status = response.status();
                if !status.is_success() {
                    let text = response.text().await.unwrap_or_default();
                    return Err(MeetkitError::Model(format!(
                        "Gemini API error {}: {}",
                        status.as_u16(),
                        text
                    )));
                }

                response
                    .json::<GenerateContentResponse>()
                    .await
                    .map_err(|e| MeetkitError::Model(format!("Invalid response body: {}", e)))
            }
        })
        .await?;

        let candidate = response
            .candidates
            .into_iter()
            .flatten()
            .next()
            .ok_or_else(|| MeetkitError::Model("No candidates in response".to_string()))?;

        Ok(LlmResponse {
            content: candidate.content,
            finish_reason: candidate.finish_reason,
            usage_metadata: response.usage_metadata,
        })
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<SystemInstruction>,
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<Vec<ToolDeclarations>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Clone, Serialize)]
struct SystemInstruction {
    parts: Vec<Part>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct ToolDeclarations {
    function_declarations: Vec<serde_json::Value>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<i32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    candidates: Option<Vec<Candidate>>,
    usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<Content>,
    finish_reason: Option<FinishReason>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use meetkit_core::GenerateContentConfig;
    use serde_json::json;

    fn model() -> GeminiModel {
        GeminiModel::new(GeminiConfig::flash("test-key")).unwrap()
    }

    #[test]
    fn test_api_url() {
        let url = model().api_url();
        assert_eq!(
            url,
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.5-flash:generateContent"
        );

        let custom = GeminiModel::new(
            GeminiConfig::new("k", "gemini-2.0-flash").with_base_url("http://localhost:9999/"),
        )
        .unwrap();
        assert_eq!(
            custom.api_url(),
            "http://localhost:9999/models/gemini-2.0-flash:generateContent"
        );
    }

    #[test]
    fn test_build_request_shape() {
        let request = LlmRequest {
            model: DEFAULT_MODEL.to_string(),
            contents: vec![Content::user_text("Schedule a standup tomorrow at 10am")],
            tools: vec![json!({"name": "schedule_meeting", "description": "d", "parameters": {}})],
            config: GenerateContentConfig {
                system_instruction: Some("You are a scheduler.".to_string()),
                temperature: Some(0.2),
                max_output_tokens: None,
            },
        };

        let body = serde_json::to_value(model().build_request(&request)).unwrap();
        assert_eq!(body["systemInstruction"]["parts"][0]["text"], "You are a scheduler.");
        assert_eq!(body["contents"][0]["role"], "user");
        assert_eq!(
            body["tools"][0]["functionDeclarations"][0]["name"],
            "schedule_meeting"
        );
        assert_eq!(body["generationConfig"]["temperature"], 0.2);
        assert!(body["generationConfig"].get("maxOutputTokens").is_none());
    }

    #[test]
    fn test_build_request_omits_empty_sections() {
        let request = LlmRequest {
            model: DEFAULT_MODEL.to_string(),
            contents: vec![Content::user_text("hi")],
            tools: vec![],
            config: GenerateContentConfig::default(),
        };

        let body = serde_json::to_value(model().build_request(&request)).unwrap();
        assert!(body.get("tools").is_none());
        assert!(body.get("generationConfig").is_none());
        assert!(body.get("systemInstruction").is_none());
    }

    #[test]
    fn test_response_parsing() {
        let raw = json!({
            "candidates": [{
                "content": {
                    "role": "model",
                    "parts": [{"functionCall": {"name": "convert_to_iso", "args": {"datetime_string": "tomorrow 10am", "timezone_iana": "Asia/Kolkata"}}}]
                },
                "finishReason": "STOP"
            }],
            "usageMetadata": {"promptTokenCount": 10, "candidatesTokenCount": 5, "totalTokenCount": 15}
        });

        let parsed: GenerateContentResponse = serde_json::from_value(raw).unwrap();
        let candidate = parsed.candidates.unwrap().remove(0);
        let content = candidate.content.unwrap();
        assert_eq!(content.function_calls()[0].name, "convert_to_iso");
        assert_eq!(candidate.finish_reason, Some(FinishReason::Stop));
        assert_eq!(parsed.usage_metadata.unwrap().total_token_count, 15);
    }
}
