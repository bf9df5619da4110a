//! Error types for the CLI application.

use thiserror::Error;

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// No API key on the command line or in the environment
    #[error("No API key: pass --api-key or set {0}")]
    MissingApiKey(String),

    /// LLM provider could not be set up
    #[error("Provider error: {0}")]
    Provider(#[from] docqa_llm::LlmError),

    /// Extraction failed
    #[error("Extraction failed: {0}")]
    Extraction(#[from] docqa_extractor::ExtractionFailure),

    /// Answers could not be encoded
    #[error("Encoding error: {0}")]
    Encoding(#[from] docqa_domain::EntityError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),
}
