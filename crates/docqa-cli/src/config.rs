//! Configuration file for the CLI.
//!
//! ```toml
//! [provider]
//! model = "gpt-4o-mini"
//!
//! [extractor]
//! max_text_length = 20000
//!
//! [questions.author]
//! question = "Who is the author of this document?"
//! details = ["Give every author if there are several"]
//! allowed_type_keys = ["name"]
//! ```

use crate::error::{CliError, Result};
use docqa_domain::Questions;
use docqa_extractor::ExtractorConfig;
use docqa_llm::ProviderConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// CLI configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// LLM provider settings
    pub provider: ProviderConfig,

    /// Extractor settings
    #[serde(default)]
    pub extractor: ExtractorConfig,

    /// Questions to ask, by question key
    #[serde(default)]
    pub questions: Questions,
}

impl Config {
    /// Load and validate configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    /// Parse and validate configuration from a TOML string.
    pub fn from_toml(contents: &str) -> Result<Self> {
        let config: Config = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate every section.
    pub fn validate(&self) -> Result<()> {
        self.provider
            .validate()
            .map_err(|e| CliError::Config(format!("[provider] {}", e)))?;
        self.extractor
            .validate()
            .map_err(|e| CliError::Config(format!("[extractor] {}", e)))?;

        if self.questions.is_empty() {
            return Err(CliError::Config("no [questions.<key>] tables".to_string()));
        }
        for (key, question) in &self.questions {
            if question.question.trim().is_empty() {
                return Err(CliError::Config(format!("[questions.{}] question is empty", key)));
            }
            if question.allowed_type_keys.is_empty() {
                return Err(CliError::Config(format!(
                    "[questions.{}] allowed_type_keys is empty",
                    key
                )));
            }
        }
        Ok(())
    }

    /// Pick the API key: an explicit one wins over the configured environment variable.
    pub fn api_key(&self, explicit: Option<&str>) -> Result<String> {
        if let Some(key) = explicit.filter(|k| !k.is_empty()) {
            return Ok(key.to_string());
        }
        std::env::var(&self.provider.api_key_env)
            .ok()
            .filter(|k| !k.is_empty())
            .ok_or_else(|| CliError::MissingApiKey(self.provider.api_key_env.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const SAMPLE: &str = r#"
        [provider]
        model = "gpt-4o-mini"
        api_key_env = "DOCQA_TEST_KEY_UNSET"

        [extractor]
        max_text_length = 1000

        [questions.author]
        question = "Who is the author?"
        allowed_type_keys = ["name"]

        [questions.written]
        question = "When was it written?"
        details = ["Use the date on the first page"]
        allowed_type_keys = ["date"]
    "#;

    #[test]
    fn test_from_toml() {
        let config = Config::from_toml(SAMPLE).unwrap();
        assert_eq!(config.provider.model, "gpt-4o-mini");
        assert_eq!(config.extractor.max_text_length, 1000);
        assert!(config.extractor.enforce_allowed_types);
        assert_eq!(config.questions.len(), 2);
        assert_eq!(config.questions["written"].details, vec!["Use the date on the first page"]);
    }

    #[test]
    fn test_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        let config = Config::from_file(file.path()).unwrap();
        assert!(config.questions["author"].allows("name"));
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = Config::from_file(dir.path().join("absent.toml"));
        assert!(matches!(
            result,
            Err(CliError::Io(ref e)) if e.kind() == std::io::ErrorKind::NotFound
        ));
    }

    #[test]
    fn test_requires_questions() {
        let result = Config::from_toml("[provider]\nmodel = \"m\"\n");
        assert!(matches!(result, Err(CliError::Config(_))));
    }

    #[test]
    fn test_rejects_question_without_types() {
        let contents = r#"
            [provider]
            model = "m"

            [questions.q]
            question = "?"
            allowed_type_keys = []
        "#;
        assert!(matches!(Config::from_toml(contents), Err(CliError::Config(_))));
    }

    #[test]
    fn test_invalid_toml() {
        assert!(matches!(Config::from_toml("provider = ["), Err(CliError::Toml(_))));
    }

    #[test]
    fn test_api_key_resolution() {
        let config = Config::from_toml(SAMPLE).unwrap();
        assert_eq!(config.api_key(Some("sk-explicit")).unwrap(), "sk-explicit");
        assert!(matches!(config.api_key(None), Err(CliError::MissingApiKey(_))));
        assert!(matches!(config.api_key(Some("")), Err(CliError::MissingApiKey(_))));
    }
}
