//! docqa Extractor
//!
//! Answers typed questions about documents using an LLM.
//!
//! # Overview
//!
//! The Extractor turns a set of questions and a registry of answer types into
//! a JSON schema and a markdown system prompt, sends the document text to the
//! model under that contract, and parses the model's raw response back into
//! typed entities.
//!
//! # Architecture
//!
//! ```text
//! Questions + Types → Protocol → (schema, system prompt) → LLM → raw text → Protocol → Answers
//! ```
//!
//! # Key Features
//!
//! - **Schema Generation**: One `definitions` entry per answer type, one array per question
//! - **Prompt Generation**: Deterministic markdown, sorted by key
//! - **Response Parsing**: Discriminant dispatch on `answer_type`, with typed errors
//! - **Allow-list Enforcement**: Optionally reject answer types a question does not allow
//!
//! # Example Usage
//!
//! ```
//! use docqa_domain::{Question, Questions};
//! use docqa_extractor::{Extractor, ExtractorConfig};
//! use docqa_llm::MockProvider;
//! use docqa_types::{default_types, NameEntity};
//!
//! let llm = MockProvider::new(
//!     r#"{"author": [{"answer_type": "name", "first_name": "Ada", "last_name": "Lovelace"}]}"#,
//! );
//! let extractor = Extractor::new(llm, default_types(), ExtractorConfig::default());
//!
//! let mut questions = Questions::new();
//! questions.insert("author".to_string(), Question::new("Who is the author?", ["name"]));
//!
//! let extraction = extractor.extract(&questions, "Notes by Ada Lovelace").unwrap();
//! let author = extraction.answers["author"][0].downcast_ref::<NameEntity>().unwrap();
//! assert_eq!(author.last_name, "Lovelace");
//! ```

#![warn(missing_docs)]

mod config;
mod error;
mod extractor;
pub mod md;
pub mod protocol;


pub use config::ExtractorConfig;
pub use error::{ExtractionFailure, ExtractorError};
pub use extractor::{extract_answers, Extraction, Extractor};
pub use md::MarkdownBuilder;
pub use protocol::{BasicProtocol, Protocol};
