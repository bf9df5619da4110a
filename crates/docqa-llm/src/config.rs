//! Configuration for HTTP LLM providers

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Connection settings for an OpenAI-compatible provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// API base URL, without the `/chat/completions` suffix
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Model name
    pub model: String,

    /// Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Request timeout (seconds)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Attempts per call before giving up
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Environment variable holding the API key
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
}

impl ProviderConfig {
    /// Default settings for the given model
    pub fn for_model(model: impl Into<String>) -> Self {
        Self {
            base_url: default_base_url(),
            model: model.into(),
            temperature: default_temperature(),
            timeout_secs: default_timeout_secs(),
            max_retries: default_max_retries(),
            api_key_env: default_api_key_env(),
        }
    }

    /// Get the request timeout as a Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.model.trim().is_empty() {
            return Err("model must not be empty".to_string());
        }
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(format!("base_url '{}' is not an http(s) URL", self.base_url));
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(format!("temperature {} out of range [0.0, 2.0]", self.temperature));
        }
        if self.timeout_secs == 0 {
            return Err("timeout_secs must be greater than 0".to_string());
        }
        if self.max_retries == 0 {
            return Err("max_retries must be greater than 0".to_string());
        }
        Ok(())
    }
}

fn default_base_url() -> String {
    crate::openai::DEFAULT_BASE_URL.to_string()
}

fn default_temperature() -> f32 {
    crate::openai::DEFAULT_TEMPERATURE
}

fn default_timeout_secs() -> u64 {
    crate::openai::DEFAULT_TIMEOUT_SECS
}

fn default_max_retries() -> u32 {
    crate::openai::DEFAULT_MAX_RETRIES
}

fn default_api_key_env() -> String {
    "OPENAI_API_KEY".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_for_model_is_valid() {
        let config = ProviderConfig::for_model("gpt-4o-mini");
        assert!(config.validate().is_ok());
        assert_eq!(config.api_key_env, "OPENAI_API_KEY");
    }

    #[test]
    fn test_invalid_configs() {
        let mut config = ProviderConfig::for_model("");
        assert!(config.validate().is_err());

        config = ProviderConfig::for_model("m");
        config.base_url = "ftp://example.com".to_string();
        assert!(config.validate().is_err());

        config = ProviderConfig::for_model("m");
        config.temperature = 3.5;
        assert!(config.validate().is_err());

        config = ProviderConfig::for_model("m");
        config.max_retries = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let config: ProviderConfig = serde_json::from_str(r#"{"model": "gpt-4o"}"#).unwrap();
        assert_eq!(config, ProviderConfig::for_model("gpt-4o"));
    }
}
