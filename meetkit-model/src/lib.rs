//! # meetkit-model
//!
//! Gemini model client for meetkit agents, plus the retry policy shared by
//! outbound API calls and a scripted [`MockLlm`] for tests.

pub mod gemini;
pub mod mock;
pub mod retry;

pub use gemini::{DEFAULT_MODEL, GEMINI_API_BASE, GeminiConfig, GeminiModel};
pub use mock::MockLlm;
pub use retry::{RetryConfig, execute_with_retry, is_retryable_status_code};
