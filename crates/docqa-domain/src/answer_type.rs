//! Answer types - the pluggable contract behind every kind of entity

use crate::{Entity, EntityError};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Describes how the model should answer with one kind of [`Entity`], and how
/// to turn such an answer back into that entity
///
/// Implementations are stateless and registered in a [`TypeRegistry`] under
/// the key the model uses as its `answer_type` discriminant.
pub trait AnswerType: Send + Sync {
    /// Parse a JSON object conforming to [`AnswerType::schema_properties`] into an entity
    fn parse(&self, value: &Map<String, Value>) -> Result<Box<dyn Entity>, EntityError>;

    /// Instructions shown to the model for this type
    fn instructions(&self) -> TypeInstructions;

    /// The `properties` field of a JSON-schema object describing this type
    fn schema_properties(&self) -> Map<String, Value>;
}

/// How to respond with an [`AnswerType`], as told to the model
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TypeInstructions {
    /// One-line description of the type
    pub one_liner: String,
    /// Additional bullet points
    pub details: Vec<String>,
}

impl TypeInstructions {
    /// Create instructions from a one-liner and detail bullets
    pub fn new<I, S>(one_liner: impl Into<String>, details: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            one_liner: one_liner.into(),
            details: details.into_iter().map(Into::into).collect(),
        }
    }
}

/// Answer types keyed by their discriminant
///
/// Iteration is ordered by key so generated prompts and schemas are
/// deterministic. The registry is populated at start-up and read-only after.
#[derive(Default)]
pub struct TypeRegistry {
    types: BTreeMap<String, Box<dyn AnswerType>>,
}

impl TypeRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an answer type, replacing any type already under `key`
    pub fn register(&mut self, key: impl Into<String>, answer_type: impl AnswerType + 'static) -> &mut Self {
        self.types.insert(key.into(), Box::new(answer_type));
        self
    }

    /// Builder-style [`TypeRegistry::register`]
    pub fn with(mut self, key: impl Into<String>, answer_type: impl AnswerType + 'static) -> Self {
        self.register(key, answer_type);
        self
    }

    /// Look up an answer type by key
    pub fn get(&self, key: &str) -> Option<&dyn AnswerType> {
        self.types.get(key).map(|t| t.as_ref())
    }

    /// Check whether a key is registered
    pub fn contains(&self, key: &str) -> bool {
        self.types.contains_key(key)
    }

    /// Registered keys in sorted order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.types.keys().map(String::as_str)
    }

    /// Registered `(key, type)` pairs in key order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &dyn AnswerType)> {
        self.types.iter().map(|(k, t)| (k.as_str(), t.as_ref()))
    }

    /// Number of registered types
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Check whether no types are registered
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl std::fmt::Debug for TypeRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypeRegistry")
            .field("keys", &self.types.keys().collect::<Vec<_>>())
            .finish()
    }
}
