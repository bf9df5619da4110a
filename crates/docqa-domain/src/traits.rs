//! Trait definitions for external interactions
//!
//! These traits define the boundaries between the extraction protocol and
//! infrastructure. Infrastructure implementations live in other crates.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Token accounting reported by an LLM provider
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LlmUsage {
    /// Tokens consumed by the system and user prompts
    #[serde(default)]
    pub prompt_tokens: u64,

    /// Tokens generated by the model
    #[serde(default)]
    pub completion_tokens: u64,

    /// Total tokens billed for the call
    #[serde(default)]
    pub total_tokens: u64,
}

/// Raw text answer from an LLM provider plus its usage
#[derive(Debug, Clone, PartialEq)]
pub struct LlmResponse {
    /// The model's raw response text
    pub text: String,

    /// Token usage for the call
    pub usage: LlmUsage,
}

/// Trait for LLM provider operations
///
/// Implemented by the infrastructure layer (docqa-llm)
pub trait LlmProvider {
    /// Error type for LLM operations
    type Error;

    /// Prompt the model and get its text response
    ///
    /// The response should (but is not guaranteed to) follow `schema`; callers
    /// must validate it.
    fn get_response(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        schema: &Value,
    ) -> Result<LlmResponse, Self::Error>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_usage_deserialize_partial() {
        let usage: LlmUsage = serde_json::from_str(r#"{"prompt_tokens": 12}"#).unwrap();
        assert_eq!(usage.prompt_tokens, 12);
        assert_eq!(usage.completion_tokens, 0);
        assert_eq!(usage.total_tokens, 0);
    }
}
