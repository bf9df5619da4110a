//! docqa Domain Layer
//!
//! This crate contains the data model and the plugin contracts of the typed
//! extraction protocol. It defines the fundamental concepts, value objects, and
//! trait interfaces that all other layers depend upon.
//!
//! ## Key Concepts
//!
//! - **Entity**: One extracted, typed answer to a question
//! - **Entity Attributes**: Evidence and localisation ranges shared by every entity
//! - **Answer Type**: Schema, instructions and parser for one kind of entity
//! - **Question**: A question the model must answer, restricted to a set of answer types
//! - **Entity Codec**: Registry-backed `{type, attributes, content}` envelopes
//!
//! ## Architecture
//!
//! - Only `serde`/`serde_json` cross the crate boundary; JSON values are
//!   downcast to concrete types inside each entity and answer type
//! - Trait definitions for all external interactions (`LlmProvider`)
//! - Concrete answer types live in `docqa-types`, transports in `docqa-llm`

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod answer_type;
pub mod codec;
pub mod entity;
pub mod error;
pub mod fields;
pub mod question;
pub mod range;
pub mod traits;

// Re-exports for convenience
pub use answer_type::{AnswerType, TypeInstructions, TypeRegistry};
pub use codec::{EntityCodec, EntityEnvelope};
pub use entity::{Answers, Entity, EntityAttributes};
pub use error::EntityError;
pub use question::{Question, Questions, RoleAndTask};
pub use range::Range;
pub use traits::{LlmProvider, LlmResponse, LlmUsage};

/// Name of the discriminant field every answer object carries
pub const ANSWER_TYPE_FIELD: &str = "answer_type";
