//! Error types for entities, answer types and the entity codec

use thiserror::Error;

/// Errors raised while building, parsing or (de)serializing entities
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EntityError {
    /// A type-specific field is absent, has the wrong JSON type, or holds an invalid value
    #[error("Invalid field '{field}': {reason}")]
    InvalidField {
        /// Name of the offending field
        field: String,
        /// What was wrong with it
        reason: String,
    },

    /// The entity's concrete type has no registered key
    #[error("Unrecognised entity type: {0}")]
    UnrecognisedType(String),

    /// The envelope names a key with no registered factory
    #[error("Unknown entity type key: {0}")]
    UnknownType(String),

    /// The envelope is not a `{type, attributes, content}` mapping
    #[error("Malformed entity envelope: {0}")]
    MalformedEnvelope(String),
}

impl EntityError {
    /// A required field was not present
    pub fn missing(field: &str) -> Self {
        EntityError::InvalidField {
            field: field.to_string(),
            reason: "missing".to_string(),
        }
    }

    /// A field was present but held the wrong JSON type
    pub fn wrong_type(field: &str, expected: &str) -> Self {
        EntityError::InvalidField {
            field: field.to_string(),
            reason: format!("expected {}", expected),
        }
    }

    /// A field was well-typed but its value was rejected
    pub fn invalid(field: &str, reason: impl Into<String>) -> Self {
        EntityError::InvalidField {
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}
