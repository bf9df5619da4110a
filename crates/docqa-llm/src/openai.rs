//! OpenAI Provider Implementation
//!
//! Provides integration with OpenAI-compatible chat completion APIs using
//! structured outputs (`response_format: json_schema`).
//!
//! # Features
//!
//! - Async HTTP communication with the chat completions endpoint
//! - Configurable endpoint, model and temperature
//! - Retry logic with exponential backoff
//! - Timeout handling
//!
//! # Examples
//!
//! ```no_run
//! use docqa_llm::OpenAiProvider;
//! use docqa_domain::traits::LlmProvider;
//! use serde_json::json;
//!
//! let provider = OpenAiProvider::new("sk-...", "gpt-4o-mini").unwrap();
//! let response = provider.get_response("system prompt", "document text", &json!({})).unwrap();
//! println!("{} ({} tokens)", response.text, response.usage.total_tokens);
//! ```

use crate::{LlmError, ProviderConfig};
use docqa_domain::traits::{LlmProvider as LlmProviderTrait, LlmResponse, LlmUsage};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, warn};

/// Default OpenAI API base URL
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Default timeout for LLM requests (60 seconds)
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Default number of attempts per call
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Default sampling temperature
pub const DEFAULT_TEMPERATURE: f32 = 0.1;

/// Name given to the schema in structured output requests
const SCHEMA_NAME: &str = "qa-schema";

/// OpenAI-compatible provider for hosted LLM inference
pub struct OpenAiProvider {
    base_url: String,
    api_key: String,
    model: String,
    temperature: f32,
    client: reqwest::Client,
    max_retries: u32,
}

/// Request body for the chat completions API
#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    temperature: f32,
    response_format: Value,
    messages: [ChatMessage<'a>; 2],
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

/// Response from the chat completions API
#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
    #[serde(default)]
    usage: LlmUsage,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Wrap a plain JSON schema into an OpenAI `response_format` object
pub fn wrap_schema(schema: &Value) -> Value {
    json!({
        "type": "json_schema",
        "json_schema": {
            "name": SCHEMA_NAME,
            "strict": true,
            "schema": schema,
        }
    })
}

/// Extract the message text and usage from a chat completions response body
pub fn parse_completion(body: &str) -> Result<LlmResponse, LlmError> {
    let response: ChatResponse = serde_json::from_str(body)
        .map_err(|e| LlmError::InvalidResponse(format!("Failed to parse response ({}): {}", e, body)))?;

    let text = response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .filter(|content| !content.is_empty())
        .ok_or_else(|| LlmError::InvalidResponse(format!("Response had no content: {}", body)))?;

    Ok(LlmResponse {
        text,
        usage: response.usage,
    })
}

impl OpenAiProvider {
    /// Create a new provider against the default OpenAI endpoint
    ///
    /// # Parameters
    ///
    /// - `api_key`: Bearer token for the API
    /// - `model`: Model to use (e.g., "gpt-4o-mini")
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Result<Self, LlmError> {
        let client = build_client(Duration::from_secs(DEFAULT_TIMEOUT_SECS))?;

        Ok(Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: api_key.into(),
            model: model.into(),
            temperature: DEFAULT_TEMPERATURE,
            client,
            max_retries: DEFAULT_MAX_RETRIES,
        })
    }

    /// Create a provider from configuration and an API key
    pub fn from_config(config: &ProviderConfig, api_key: impl Into<String>) -> Result<Self, LlmError> {
        config.validate().map_err(LlmError::Config)?;
        let client = build_client(config.timeout())?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            model: config.model.clone(),
            temperature: config.temperature,
            client,
            max_retries: config.max_retries,
        })
    }

    /// Use a different API base URL (e.g., a local OpenAI-compatible server)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set the sampling temperature
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Set the maximum number of attempts
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Model this provider sends requests to
    pub fn model(&self) -> &str {
        &self.model
    }

    fn request_body<'a>(&'a self, system_prompt: &'a str, user_prompt: &'a str, schema: &Value) -> ChatRequest<'a> {
        ChatRequest {
            model: &self.model,
            temperature: self.temperature,
            response_format: wrap_schema(schema),
            messages: [
                ChatMessage {
                    role: "system",
                    content: system_prompt,
                },
                ChatMessage {
                    role: "user",
                    content: user_prompt,
                },
            ],
        }
    }

    /// Prompt the model and get its text response
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - The endpoint is unreachable after all retries
    /// - The model is not available
    /// - The response has no message content
    pub async fn complete(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        schema: &Value,
    ) -> Result<LlmResponse, LlmError> {
        let url = format!("{}/chat/completions", self.base_url);
        let request_body = self.request_body(system_prompt, user_prompt, schema);

        debug!(
            "Sending completion request to {} (model {}, {} chars of document)",
            url,
            self.model,
            user_prompt.len()
        );

        // Retry logic with exponential backoff
        let mut attempts = 0;
        let mut last_error = None;

        while attempts < self.max_retries {
            match self
                .client
                .post(&url)
                .bearer_auth(&self.api_key)
                .json(&request_body)
                .send()
                .await
            {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        let body = response
                            .text()
                            .await
                            .map_err(|e| LlmError::Communication(format!("Failed to read response: {}", e)))?;
                        return parse_completion(&body);
                    } else if status == reqwest::StatusCode::NOT_FOUND {
                        return Err(LlmError::ModelNotAvailable(self.model.clone()));
                    } else if status == reqwest::StatusCode::UNAUTHORIZED {
                        return Err(LlmError::Config("API key was rejected".to_string()));
                    } else if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                        last_error = Some(LlmError::RateLimitExceeded);
                    } else {
                        let error_text = response
                            .text()
                            .await
                            .unwrap_or_else(|_| "Unknown error".to_string());
                        last_error = Some(LlmError::Communication(format!("HTTP {}: {}", status, error_text)));
                    }
                }
                Err(e) => {
                    last_error = Some(LlmError::Communication(format!("Request failed: {}", e)));
                }
            }

            attempts += 1;
            if attempts < self.max_retries {
                // Exponential backoff: 1s, 2s, 4s, etc.
                let delay = Duration::from_secs(2u64.pow(attempts - 1));
                warn!("Completion attempt {} failed, retrying in {:?}", attempts, delay);
                tokio::time::sleep(delay).await;
            }
        }

        Err(last_error.unwrap_or_else(|| LlmError::Communication("Max retries exceeded".to_string())))
    }
}

fn build_client(timeout: Duration) -> Result<reqwest::Client, LlmError> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| LlmError::Config(format!("Failed to build HTTP client: {}", e)))
}

impl LlmProviderTrait for OpenAiProvider {
    type Error = LlmError;

    /// Blocking wrapper around [`OpenAiProvider::complete`]
    ///
    /// Must not be called from inside an async runtime; use `complete` there.
    fn get_response(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        schema: &Value,
    ) -> Result<LlmResponse, Self::Error> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| LlmError::Other(format!("Failed to start runtime: {}", e)))?;

        runtime.block_on(self.complete(system_prompt, user_prompt, schema))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openai_provider_creation() {
        let provider = OpenAiProvider::new("key", "gpt-4o-mini").unwrap();
        assert_eq!(provider.base_url, DEFAULT_BASE_URL);
        assert_eq!(provider.model(), "gpt-4o-mini");
        assert_eq!(provider.max_retries, DEFAULT_MAX_RETRIES);
        assert_eq!(provider.temperature, DEFAULT_TEMPERATURE);
    }

    #[test]
    fn test_openai_provider_builders() {
        let provider = OpenAiProvider::new("key", "m")
            .unwrap()
            .with_base_url("http://localhost:8000/v1/")
            .with_temperature(0.0)
            .with_max_retries(5);
        assert_eq!(provider.base_url, "http://localhost:8000/v1");
        assert_eq!(provider.temperature, 0.0);
        assert_eq!(provider.max_retries, 5);
    }

    #[test]
    fn test_from_config_rejects_invalid() {
        let mut config = ProviderConfig::for_model("m");
        config.timeout_secs = 0;
        assert!(matches!(
            OpenAiProvider::from_config(&config, "key"),
            Err(LlmError::Config(_))
        ));
    }

    #[test]
    fn test_wrap_schema() {
        let schema = json!({"type": "object"});
        assert_eq!(
            wrap_schema(&schema),
            json!({
                "type": "json_schema",
                "json_schema": {"name": "qa-schema", "strict": true, "schema": {"type": "object"}}
            })
        );
    }

    #[test]
    fn test_request_body() {
        let provider = OpenAiProvider::new("key", "gpt-4o-mini").unwrap();
        let schema = json!({"type": "object"});
        let body = serde_json::to_value(provider.request_body("sys", "doc", &schema)).unwrap();

        assert_eq!(body["model"], "gpt-4o-mini");
        assert_eq!(body["response_format"]["type"], "json_schema");
        assert_eq!(body["messages"][0], json!({"role": "system", "content": "sys"}));
        assert_eq!(body["messages"][1], json!({"role": "user", "content": "doc"}));
    }

    #[test]
    fn test_parse_completion() {
        let body = r#"{
            "choices": [{"message": {"role": "assistant", "content": "{\"q\": []}"}}],
            "usage": {"prompt_tokens": 100, "completion_tokens": 7, "total_tokens": 107}
        }"#;
        let response = parse_completion(body).unwrap();
        assert_eq!(response.text, r#"{"q": []}"#);
        assert_eq!(response.usage.total_tokens, 107);
    }

    #[test]
    fn test_parse_completion_without_usage() {
        let body = r#"{"choices": [{"message": {"content": "{}"}}]}"#;
        let response = parse_completion(body).unwrap();
        assert_eq!(response.usage, LlmUsage::default());
    }

    #[test]
    fn test_parse_completion_empty_content() {
        for body in [
            r#"{"choices": []}"#,
            r#"{"choices": [{"message": {"content": ""}}]}"#,
            r#"{"choices": [{"message": {"content": null, "refusal": "no"}}]}"#,
            "not json",
        ] {
            assert!(matches!(parse_completion(body), Err(LlmError::InvalidResponse(_))));
        }
    }

    // Integration tests (requires a reachable API and OPENAI_API_KEY)
    #[tokio::test]
    #[ignore] // Only run when an API key is available
    async fn test_openai_complete_integration() {
        let key = std::env::var("OPENAI_API_KEY").unwrap_or_default();
        let provider = OpenAiProvider::new(key, "gpt-4o-mini").unwrap();
        let schema = json!({
            "type": "object",
            "properties": {"greeting": {"type": "string"}},
            "required": ["greeting"],
            "additionalProperties": false
        });
        let result = provider.complete("Greet the user", "hello", &schema).await;

        if let Ok(response) = result {
            assert!(!response.text.is_empty());
        }
    }

    #[tokio::test]
    async fn test_openai_error_handling() {
        // Use invalid endpoint to trigger error
        let provider = OpenAiProvider::new("key", "m")
            .unwrap()
            .with_base_url("http://localhost:99999")
            .with_max_retries(1);

        let result = provider.complete("sys", "test", &json!({})).await;

        match result {
            Err(LlmError::Communication(_)) => {} // Expected
            _ => panic!("Expected Communication error"),
        }
    }

    #[test]
    fn test_blocking_wrapper_surfaces_errors() {
        let provider = OpenAiProvider::new("key", "m")
            .unwrap()
            .with_base_url("http://localhost:99999")
            .with_max_retries(1);

        let result = provider.get_response("sys", "test", &json!({}));
        assert!(matches!(result, Err(LlmError::Communication(_))));
    }
}
