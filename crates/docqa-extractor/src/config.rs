//! Configuration for the Extractor

use docqa_domain::RoleAndTask;
use serde::{Deserialize, Serialize};

/// Configuration for the Extractor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Maximum input text length (characters)
    pub max_text_length: usize,

    /// Reject answers to unknown questions or with types a question does not allow
    pub enforce_allowed_types: bool,

    /// Persona and task placed at the top of the system prompt
    pub role_and_task: RoleAndTask,
}

impl ExtractorConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.max_text_length == 0 {
            return Err("max_text_length must be greater than 0".to_string());
        }
        if self.role_and_task.role.trim().is_empty() {
            return Err("role must not be empty".to_string());
        }
        if self.role_and_task.task.trim().is_empty() {
            return Err("task must not be empty".to_string());
        }
        Ok(())
    }
}

impl Default for ExtractorConfig {
    /// Default configuration with balanced settings
    fn default() -> Self {
        Self {
            max_text_length: 50_000,
            enforce_allowed_types: true,
            role_and_task: RoleAndTask::default(),
        }
    }
}

impl ExtractorConfig {
    /// Strict preset: shorter documents, allow-lists enforced
    pub fn strict() -> Self {
        Self {
            max_text_length: 20_000,
            enforce_allowed_types: true,
            ..Self::default()
        }
    }

    /// Lenient preset: long documents, any registered type accepted
    pub fn lenient() -> Self {
        Self {
            max_text_length: 200_000,
            enforce_allowed_types: false,
            ..Self::default()
        }
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str)
            .map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self)
            .map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = ExtractorConfig::default();
        assert!(config.validate().is_ok());
        assert!(config.enforce_allowed_types);
    }

    #[test]
    fn test_strict_config_is_valid() {
        assert!(ExtractorConfig::strict().validate().is_ok());
    }

    #[test]
    fn test_lenient_config_is_valid() {
        let config = ExtractorConfig::lenient();
        assert!(config.validate().is_ok());
        assert!(!config.enforce_allowed_types);
    }

    #[test]
    fn test_invalid_max_text_length() {
        let mut config = ExtractorConfig::default();
        config.max_text_length = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_empty_role() {
        let mut config = ExtractorConfig::default();
        config.role_and_task.role = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_toml_round_trip() {
        let config = ExtractorConfig::lenient();
        let toml_str = config.to_toml().unwrap();
        let parsed = ExtractorConfig::from_toml(&toml_str).unwrap();

        assert_eq!(config, parsed);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let parsed = ExtractorConfig::from_toml("max_text_length = 100").unwrap();
        assert_eq!(parsed.max_text_length, 100);
        assert_eq!(parsed.role_and_task, RoleAndTask::default());
        assert!(parsed.enforce_allowed_types);
    }

    #[test]
    fn test_toml_role_and_task() {
        let toml_str = r#"
            [role_and_task]
            role = "You are a contracts clerk"
            task = "Answer questions about the contract"
        "#;
        let parsed = ExtractorConfig::from_toml(toml_str).unwrap();
        assert_eq!(parsed.role_and_task.role, "You are a contracts clerk");
    }
}
