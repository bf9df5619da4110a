//! Questions and the role/task framing sent to the model

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Questions keyed by question key
pub type Questions = BTreeMap<String, Question>;

/// A question to ask the model about a document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    /// The one-liner, for example `Who is the author of this document?`
    pub question: String,

    /// Extra details, examples, and instructions, as bullet points
    #[serde(default)]
    pub details: Vec<String>,

    /// Keys of the answer types the model may respond with
    pub allowed_type_keys: Vec<String>,
}

impl Question {
    /// Create a question with no details
    pub fn new<I, S>(question: impl Into<String>, allowed_type_keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            question: question.into(),
            details: Vec::new(),
            allowed_type_keys: allowed_type_keys.into_iter().map(Into::into).collect(),
        }
    }

    /// Add a detail bullet
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.details.push(detail.into());
        self
    }

    /// Check whether the model may answer this question with `type_key`
    pub fn allows(&self, type_key: &str) -> bool {
        self.allowed_type_keys.iter().any(|k| k == type_key)
    }
}

/// A role and a task for the model, both short (about one sentence)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleAndTask {
    /// Who the model is
    pub role: String,
    /// What the model must do
    pub task: String,
}

impl RoleAndTask {
    /// Create a role and task
    pub fn new(role: impl Into<String>, task: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            task: task.into(),
        }
    }
}

impl Default for RoleAndTask {
    /// Generic document information extraction
    fn default() -> Self {
        Self::new(
            "You are a state-of-the-art data extraction AI",
            "Your task is to answer the provided questions completely accurately, based on the user-provided document",
        )
    }
}
