//! Entity codec - polymorphic `{type, attributes, content}` envelopes
//!
//! Entities are trait objects, so serializing them needs a registry that maps
//! each concrete entity type to a stable string key and back. Keys and
//! factories are registered together through [`EntityCodec::register`]; the
//! two lookup tables can never disagree.

use crate::{Answers, Entity, EntityAttributes, EntityError};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::any::TypeId;
use std::collections::{BTreeMap, HashMap};

type EntityFactory = fn() -> Box<dyn Entity>;

fn new_entity<E: Entity + Default>() -> Box<dyn Entity> {
    Box::new(E::default())
}

/// Serialized form of an entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityEnvelope {
    /// Registered key of the entity type
    #[serde(rename = "type")]
    pub kind: String,
    /// Shared attributes
    pub attributes: EntityAttributes,
    /// Type-specific content
    pub content: Map<String, Value>,
}

/// Converts entities to and from JSON envelopes
///
/// # Examples
///
/// ```
/// use docqa_domain::{fields, Entity, EntityAttributes, EntityCodec, EntityError};
/// use serde_json::{Map, Value};
///
/// #[derive(Debug, Default)]
/// struct Code {
///     attributes: EntityAttributes,
///     code: String,
/// }
///
/// impl Entity for Code {
///     fn make_content(&self) -> Result<Map<String, Value>, EntityError> {
///         let mut content = Map::new();
///         content.insert("code".into(), self.code.clone().into());
///         Ok(content)
///     }
///     fn load_content(&mut self, content: &Map<String, Value>) -> Result<(), EntityError> {
///         self.code = fields::require_str(content, "code")?.to_string();
///         Ok(())
///     }
///     fn attributes(&self) -> &EntityAttributes { &self.attributes }
///     fn attributes_mut(&mut self) -> &mut EntityAttributes { &mut self.attributes }
/// }
///
/// let codec = EntityCodec::new().with::<Code>("code");
/// let entity = Code { code: "X-12".into(), ..Default::default() };
///
/// let json = codec.encode_value(&entity).unwrap();
/// assert_eq!(json["type"], "code");
///
/// let decoded = codec.decode(&json).unwrap();
/// assert_eq!(decoded.downcast_ref::<Code>().unwrap().code, "X-12");
/// ```
#[derive(Debug, Default, Clone)]
pub struct EntityCodec {
    factories: HashMap<String, (TypeId, EntityFactory)>,
    keys: HashMap<TypeId, String>,
}

impl EntityCodec {
    /// Create a codec with no registered entity types
    pub fn new() -> Self {
        Self::default()
    }

    /// Register entity type `E` under `key`
    ///
    /// Re-registering a key, or registering `E` again under a new key,
    /// replaces the previous pairing in both directions.
    pub fn register<E: Entity + Default>(&mut self, key: impl Into<String>) -> &mut Self {
        let key = key.into();
        let type_id = TypeId::of::<E>();

        if let Some((old_type, _)) = self.factories.remove(&key) {
            self.keys.remove(&old_type);
        }
        if let Some(old_key) = self.keys.remove(&type_id) {
            self.factories.remove(&old_key);
        }

        self.factories.insert(key.clone(), (type_id, new_entity::<E>));
        self.keys.insert(type_id, key);
        self
    }

    /// Builder-style [`EntityCodec::register`]
    pub fn with<E: Entity + Default>(mut self, key: impl Into<String>) -> Self {
        self.register::<E>(key);
        self
    }

    /// Check whether a key is registered
    pub fn contains(&self, key: &str) -> bool {
        self.factories.contains_key(key)
    }

    /// Registered keys in sorted order
    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }

    /// Key registered for the concrete type of `entity`
    pub fn key_of(&self, entity: &dyn Entity) -> Option<&str> {
        self.keys.get(&entity.kind_id()).map(String::as_str)
    }

    /// Convert an entity into an envelope
    pub fn encode(&self, entity: &dyn Entity) -> Result<EntityEnvelope, EntityError> {
        let kind = self
            .key_of(entity)
            .ok_or_else(|| EntityError::UnrecognisedType(format!("{:?}", entity)))?
            .to_string();

        Ok(EntityEnvelope {
            kind,
            attributes: entity.attributes().clone(),
            content: entity.make_content()?,
        })
    }

    /// Convert an entity into an envelope as a JSON value
    pub fn encode_value(&self, entity: &dyn Entity) -> Result<Value, EntityError> {
        let envelope = self.encode(entity)?;
        serde_json::to_value(envelope).map_err(|e| EntityError::MalformedEnvelope(e.to_string()))
    }

    /// Convert a JSON envelope produced by [`EntityCodec::encode_value`] back into an entity
    pub fn decode(&self, value: &Value) -> Result<Box<dyn Entity>, EntityError> {
        let envelope = value
            .as_object()
            .ok_or_else(|| EntityError::MalformedEnvelope("envelope is not an object".to_string()))?;

        let kind = match envelope.get("type") {
            Some(Value::String(kind)) => kind,
            Some(_) => return Err(EntityError::MalformedEnvelope("'type' is not a string".to_string())),
            None => return Err(EntityError::MalformedEnvelope("missing 'type'".to_string())),
        };
        let attributes = match envelope.get("attributes") {
            Some(attributes @ Value::Object(_)) => attributes,
            Some(_) => return Err(EntityError::MalformedEnvelope("'attributes' is not an object".to_string())),
            None => return Err(EntityError::MalformedEnvelope("missing 'attributes'".to_string())),
        };
        let content = match envelope.get("content") {
            Some(Value::Object(content)) => content,
            Some(_) => return Err(EntityError::MalformedEnvelope("'content' is not an object".to_string())),
            None => return Err(EntityError::MalformedEnvelope("missing 'content'".to_string())),
        };

        let (_, factory) = self
            .factories
            .get(kind)
            .ok_or_else(|| EntityError::UnknownType(kind.clone()))?;

        let mut entity = factory();
        *entity.attributes_mut() = EntityAttributes::deserialize(attributes)
            .map_err(|e| EntityError::MalformedEnvelope(format!("attributes: {}", e)))?;
        entity.load_content(content)?;
        Ok(entity)
    }

    /// Encode a whole answer map as `{question: [envelope, ...]}`
    pub fn encode_answers(&self, answers: &Answers) -> Result<Value, EntityError> {
        let mut out = Map::new();
        for (question, entities) in answers {
            let encoded = entities
                .iter()
                .map(|e| self.encode_value(e.as_ref()))
                .collect::<Result<Vec<_>, _>>()?;
            out.insert(question.clone(), Value::Array(encoded));
        }
        Ok(Value::Object(out))
    }

    /// Decode an answer map produced by [`EntityCodec::encode_answers`]
    pub fn decode_answers(&self, value: &Value) -> Result<Answers, EntityError> {
        let questions = value
            .as_object()
            .ok_or_else(|| EntityError::MalformedEnvelope("answers are not an object".to_string()))?;

        let mut answers = BTreeMap::new();
        for (question, entities) in questions {
            let entities = entities.as_array().ok_or_else(|| {
                EntityError::MalformedEnvelope(format!("answers for '{}' are not an array", question))
            })?;
            let decoded = entities
                .iter()
                .map(|e| self.decode(e))
                .collect::<Result<Vec<_>, _>>()?;
            answers.insert(question.clone(), decoded);
        }
        Ok(answers)
    }
}
