//! Error types for the Extractor

use docqa_domain::{EntityError, LlmUsage};
use thiserror::Error;

/// Errors that can occur during extraction
#[derive(Error, Debug)]
pub enum ExtractorError {
    /// The LLM provider call did not complete
    #[error("Transport failure: {0}")]
    TransportFailure(String),

    /// The response is not a JSON object of question key to array of answer objects
    #[error("Invalid response shape: {0}")]
    InvalidResponseShape(String),

    /// An answer object has no `answer_type`
    #[error("Answer {index} to '{question}' has no answer_type")]
    MissingDiscriminant {
        /// Question key
        question: String,
        /// Position of the answer in the question's array
        index: usize,
    },

    /// An answer object's `answer_type` is not a string
    #[error("Answer {index} to '{question}' has a non-string answer_type: {found}")]
    InvalidDiscriminant {
        /// Question key
        question: String,
        /// Position of the answer in the question's array
        index: usize,
        /// The offending value
        found: String,
    },

    /// An `answer_type` names no registered answer type
    #[error("Unknown answer type '{answer_type}' for '{question}'")]
    UnknownAnswerType {
        /// Question key
        question: String,
        /// The unregistered key
        answer_type: String,
    },

    /// An `answer_type` is registered but not allowed for the question
    #[error("Answer type '{answer_type}' is not allowed for '{question}'")]
    DisallowedAnswerType {
        /// Question key
        question: String,
        /// The disallowed key
        answer_type: String,
    },

    /// An answer type rejected the answer object
    #[error("Answer {index} to '{question}' is invalid: {source}")]
    InvalidAnswer {
        /// Question key
        question: String,
        /// Position of the answer in the question's array
        index: usize,
        /// The answer type's error
        #[source]
        source: EntityError,
    },

    /// Text exceeds maximum length
    #[error("Text too long: {0} chars (max: {1})")]
    TextTooLong(usize, usize),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<serde_json::Error> for ExtractorError {
    fn from(e: serde_json::Error) -> Self {
        ExtractorError::InvalidResponseShape(format!("response is not JSON: {}", e))
    }
}

/// A failed extraction, with the usage of the LLM call if it was made
#[derive(Error, Debug)]
#[error("{source}")]
pub struct ExtractionFailure {
    /// Why the extraction failed
    pub source: ExtractorError,
    /// Token usage, when the provider returned a response
    pub usage: Option<LlmUsage>,
}

impl ExtractionFailure {
    /// Attach the usage of a completed LLM call
    pub fn with_usage(source: ExtractorError, usage: LlmUsage) -> Self {
        Self {
            source,
            usage: Some(usage),
        }
    }
}

impl From<ExtractorError> for ExtractionFailure {
    fn from(source: ExtractorError) -> Self {
        Self {
            source,
            usage: None,
        }
    }
}
