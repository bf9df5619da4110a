//! docqa LLM Provider Layer
//!
//! Pluggable LLM provider implementations of the `LlmProvider` trait from
//! `docqa-domain`. A provider takes a system prompt, a user prompt and a JSON
//! schema, and returns the model's raw text plus token usage.
//!
//! # Providers
//!
//! - `MockProvider`: Deterministic mock for testing
//! - `OpenAiProvider`: OpenAI-compatible chat completions API with structured outputs
//!
//! # Examples
//!
//! ```
//! use docqa_llm::MockProvider;
//! use docqa_domain::traits::LlmProvider;
//! use serde_json::json;
//!
//! let provider = MockProvider::new(r#"{"author": []}"#);
//! let response = provider.get_response("system", "document", &json!({})).unwrap();
//! assert_eq!(response.text, r#"{"author": []}"#);
//! ```

#![warn(missing_docs)]

pub mod config;
pub mod openai;

use docqa_domain::traits::{LlmProvider as LlmProviderTrait, LlmResponse, LlmUsage};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

pub use config::ProviderConfig;
pub use openai::OpenAiProvider;

/// Errors that can occur during LLM operations
#[derive(Error, Debug)]
pub enum LlmError {
    /// Network or API communication error
    #[error("Communication error: {0}")]
    Communication(String),

    /// Invalid response from LLM
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// Model not available
    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    /// Provider misconfigured (missing key, bad endpoint, ...)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic error
    #[error("LLM error: {0}")]
    Other(String),
}

/// A request as seen by [`MockProvider`]
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    /// System prompt sent
    pub system_prompt: String,
    /// User prompt sent
    pub user_prompt: String,
    /// Schema sent
    pub schema: Value,
}

#[derive(Debug, Clone)]
enum MockReply {
    Text(String),
    Error,
}

#[derive(Debug, Default)]
struct MockState {
    replies: HashMap<String, MockReply>,
    requests: Vec<RecordedRequest>,
}

/// Mock LLM provider for deterministic testing
///
/// This provider returns pre-configured responses, keyed by user prompt (the
/// document text), without making any network calls. Every request is
/// recorded so tests can inspect the prompts and schema that were sent.
///
/// # Examples
///
/// ```
/// use docqa_llm::MockProvider;
/// use docqa_domain::traits::LlmProvider;
/// use serde_json::json;
///
/// let mut provider = MockProvider::default();
/// provider.add_response("doc one", r#"{"q": []}"#);
/// provider.add_error("doc two");
///
/// assert_eq!(provider.get_response("sys", "doc one", &json!({})).unwrap().text, r#"{"q": []}"#);
/// assert!(provider.get_response("sys", "doc two", &json!({})).is_err());
/// assert_eq!(provider.call_count(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct MockProvider {
    default_response: String,
    usage: LlmUsage,
    state: Arc<Mutex<MockState>>,
}

impl MockProvider {
    /// Create a new MockProvider with a fixed response for all prompts
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            default_response: response.into(),
            usage: LlmUsage::default(),
            state: Arc::new(Mutex::new(MockState::default())),
        }
    }

    /// Report the given usage with every response
    pub fn with_usage(mut self, usage: LlmUsage) -> Self {
        self.usage = usage;
        self
    }

    /// Add a specific response for a given user prompt
    pub fn add_response(&mut self, user_prompt: impl Into<String>, response: impl Into<String>) {
        if let Ok(mut state) = self.state.lock() {
            state.replies.insert(user_prompt.into(), MockReply::Text(response.into()));
        }
    }

    /// Configure to return an error for a specific user prompt
    pub fn add_error(&mut self, user_prompt: impl Into<String>) {
        if let Ok(mut state) = self.state.lock() {
            state.replies.insert(user_prompt.into(), MockReply::Error);
        }
    }

    /// Get the number of times the provider was called
    pub fn call_count(&self) -> usize {
        self.state.lock().map(|s| s.requests.len()).unwrap_or(0)
    }

    /// Every request received so far, oldest first
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.lock().map(|s| s.requests.clone()).unwrap_or_default()
    }

    /// The most recent request, if any
    pub fn last_request(&self) -> Option<RecordedRequest> {
        self.state.lock().ok().and_then(|s| s.requests.last().cloned())
    }

    /// Forget all recorded requests
    pub fn reset(&self) {
        if let Ok(mut state) = self.state.lock() {
            state.requests.clear();
        }
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new("{}")
    }
}

impl LlmProviderTrait for MockProvider {
    type Error = LlmError;

    fn get_response(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        schema: &Value,
    ) -> Result<LlmResponse, Self::Error> {
        let mut state = self
            .state
            .lock()
            .map_err(|e| LlmError::Other(format!("Mock state poisoned: {}", e)))?;

        state.requests.push(RecordedRequest {
            system_prompt: system_prompt.to_string(),
            user_prompt: user_prompt.to_string(),
            schema: schema.clone(),
        });

        let text = match state.replies.get(user_prompt) {
            Some(MockReply::Error) => return Err(LlmError::Other("Mock error".to_string())),
            Some(MockReply::Text(text)) => text.clone(),
            None => self.default_response.clone(),
        };

        Ok(LlmResponse {
            text,
            usage: self.usage,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_mock_provider_default() {
        let provider = MockProvider::new("Test response");
        let result = provider.get_response("sys", "any prompt", &json!({}));
        assert!(result.is_ok());
        assert_eq!(result.unwrap().text, "Test response");
    }

    #[test]
    fn test_mock_provider_specific_responses() {
        let mut provider = MockProvider::default();
        provider.add_response("hello", "world");
        provider.add_response("foo", "bar");

        assert_eq!(provider.get_response("", "hello", &json!({})).unwrap().text, "world");
        assert_eq!(provider.get_response("", "foo", &json!({})).unwrap().text, "bar");
        assert_eq!(provider.get_response("", "unknown", &json!({})).unwrap().text, "{}");
    }

    #[test]
    fn test_mock_provider_call_count() {
        let provider = MockProvider::new("test");

        assert_eq!(provider.call_count(), 0);

        provider.get_response("", "prompt1", &json!({})).unwrap();
        assert_eq!(provider.call_count(), 1);

        provider.get_response("", "prompt2", &json!({})).unwrap();
        assert_eq!(provider.call_count(), 2);

        provider.reset();
        assert_eq!(provider.call_count(), 0);
    }

    #[test]
    fn test_mock_provider_error() {
        let mut provider = MockProvider::default();
        provider.add_error("bad prompt");

        let result = provider.get_response("", "bad prompt", &json!({}));
        assert!(matches!(result.unwrap_err(), LlmError::Other(_)));
        // Failed calls are still recorded
        assert_eq!(provider.call_count(), 1);
    }

    #[test]
    fn test_mock_provider_records_request() {
        let provider = MockProvider::new("{}");
        let schema = json!({"type": "object"});
        provider.get_response("system text", "document text", &schema).unwrap();

        let request = provider.last_request().unwrap();
        assert_eq!(request.system_prompt, "system text");
        assert_eq!(request.user_prompt, "document text");
        assert_eq!(request.schema, schema);
    }

    #[test]
    fn test_mock_provider_usage() {
        let usage = LlmUsage {
            prompt_tokens: 10,
            completion_tokens: 5,
            total_tokens: 15,
        };
        let provider = MockProvider::new("{}").with_usage(usage);
        assert_eq!(provider.get_response("", "", &json!({})).unwrap().usage, usage);
    }

    #[test]
    fn test_mock_provider_clone() {
        let provider1 = MockProvider::new("test");
        let provider2 = provider1.clone();

        provider1.get_response("", "test", &json!({})).unwrap();

        // Both should share the same recorded requests due to Arc
        assert_eq!(provider1.call_count(), 1);
        assert_eq!(provider2.call_count(), 1);
    }
}
