use crate::error::Result;
use crate::types::Content;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Request sent to a language model.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LlmRequest {
    pub model: String,
    pub contents: Vec<Content>,
    /// Gemini function declarations, one JSON object per tool.
    #[serde(default)]
    pub tools: Vec<serde_json::Value>,
    #[serde(default)]
    pub config: GenerateContentConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenerateContentConfig {
    pub system_instruction: Option<String>,
    pub temperature: Option<f32>,
    pub max_output_tokens: Option<i32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FinishReason {
    Stop,
    MaxTokens,
    Safety,
    Recitation,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageMetadata {
    #[serde(default)]
    pub prompt_token_count: i32,
    #[serde(default)]
    pub candidates_token_count: i32,
    #[serde(default)]
    pub total_token_count: i32,
}

/// A model's reply to one [`LlmRequest`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LlmResponse {
    pub content: Option<Content>,
    pub finish_reason: Option<FinishReason>,
    pub usage_metadata: Option<UsageMetadata>,
}

impl LlmResponse {
    pub fn text(&self) -> Option<String> {
        self.content.as_ref().and_then(|c| c.text())
    }

    pub fn has_function_calls(&self) -> bool {
        self.content.as_ref().is_some_and(|c| !c.function_calls().is_empty())
    }
}

/// A language model that can answer content-generation requests.
#[async_trait]
pub trait Llm: Send + Sync {
    fn model_name(&self) -> &str;

    async fn generate(&self, request: LlmRequest) -> Result<LlmResponse>;
}
