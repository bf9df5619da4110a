//! Entity module - one typed answer extracted from a document

use crate::{EntityError, Range};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::any::{Any, TypeId};
use std::collections::BTreeMap;
use std::fmt;

/// Extracted answers, keyed by question key, in the order the model gave them
pub type Answers = BTreeMap<String, Vec<Box<dyn Entity>>>;

/// Attributes that every [`Entity`] carries, independent of its content
///
/// These are populated by the extraction pipeline (or a later enrichment
/// pass), never by an answer type's own parser.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EntityAttributes {
    /// Ranges of the document that support this answer
    #[serde(rename = "evidence_positions")]
    pub evidence_ranges: Vec<Range>,

    /// The single range this answer was localised to, if any
    #[serde(rename = "localised_range")]
    pub localised_range: Range,
}

impl EntityAttributes {
    /// Reset to "nothing known": no evidence and an indefinite localisation
    pub fn reset(&mut self) {
        self.evidence_ranges = Vec::new();
        self.localised_range = Range::indefinite();
    }
}

impl Default for EntityAttributes {
    fn default() -> Self {
        Self {
            evidence_ranges: Vec::new(),
            localised_range: Range::indefinite(),
        }
    }
}

/// A single typed piece of information about a document
///
/// Implementations hold their own typed content plus an owned
/// [`EntityAttributes`]. Content is converted to and from a generic JSON
/// mapping by the entity itself; attributes are handled structurally by the
/// [`EntityCodec`](crate::EntityCodec).
pub trait Entity: Any + fmt::Debug + Send + Sync {
    /// Convert the content (not the attributes) into a JSON mapping
    fn make_content(&self) -> Result<Map<String, Value>, EntityError>;

    /// Load content previously produced by [`Entity::make_content`]
    fn load_content(&mut self, content: &Map<String, Value>) -> Result<(), EntityError>;

    /// Shared attributes of this entity
    fn attributes(&self) -> &EntityAttributes;

    /// Mutable access to the shared attributes of this entity
    fn attributes_mut(&mut self) -> &mut EntityAttributes;
}

impl dyn Entity {
    /// Identifier of the concrete entity type behind this trait object
    pub fn kind_id(&self) -> TypeId {
        let any: &dyn Any = self;
        any.type_id()
    }

    /// Downcast to a concrete entity type
    pub fn downcast_ref<E: Entity>(&self) -> Option<&E> {
        let any: &dyn Any = self;
        any.downcast_ref::<E>()
    }

    /// Check whether the concrete entity type is `E`
    pub fn is<E: Entity>(&self) -> bool {
        self.kind_id() == TypeId::of::<E>()
    }
}
