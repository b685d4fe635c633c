use async_trait::async_trait;
use meetkit_core::{Llm, LlmRequest, LlmResponse, MeetkitError, Result};
use std::collections::VecDeque;
use std::sync::Mutex;

/// Scripted model for tests: each `generate` call pops the next queued
/// response, so multi-turn tool loops can be driven deterministically.
pub struct MockLlm {
    name: String,
    responses: Mutex<VecDeque<LlmResponse>>,
    requests: Mutex<Vec<LlmRequest>>,
}

impl MockLlm {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            responses: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn with_response(self, response: LlmResponse) -> Self {
        self.responses.lock().unwrap().push_back(response);
        self
    }

    pub fn with_text_response(self, text: impl Into<String>) -> Self {
        self.with_response(LlmResponse {
            content: Some(meetkit_core::Content::model_text(text)),
            ..Default::default()
        })
    }

    /// Requests seen so far, for assertions on what the agent sent.
    pub fn recorded_requests(&self) -> Vec<LlmRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Llm for MockLlm {
    fn model_name(&self) -> &str {
        &self.name
    }

    async fn generate(&self, request: LlmRequest) -> Result<LlmResponse> {
        self.requests.lock().unwrap().push(request);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| MeetkitError::Model("MockLlm has no more responses".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use meetkit_core::Content;

    #[tokio::test]
    async fn test_mock_pops_in_order() {
        let mock = MockLlm::new("test")
            .with_text_response("first")
            .with_text_response("second");

        let r1 = mock.generate(LlmRequest::default()).await.unwrap();
        let r2 = mock.generate(LlmRequest::default()).await.unwrap();
        assert_eq!(r1.text().as_deref(), Some("first"));
        assert_eq!(r2.text().as_deref(), Some("second"));

        let exhausted = mock.generate(LlmRequest::default()).await;
        assert!(exhausted.is_err());
    }

    #[tokio::test]
    async fn test_mock_records_requests() {
        let mock = MockLlm::new("test").with_text_response("ok");
        let request = LlmRequest {
            contents: vec![Content::user_text("hello")],
            ..Default::default()
        };
        mock.generate(request).await.unwrap();

        let seen = mock.recorded_requests();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].contents[0].text().as_deref(), Some("hello"));
    }
}
