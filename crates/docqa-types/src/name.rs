//! The `name` answer type

use crate::clean;
use docqa_domain::{fields, AnswerType, Entity, EntityAttributes, EntityError, TypeInstructions};
use serde_json::{json, Map, Value};

/// A person's name, split into first and last name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameEntity {
    /// Shared entity attributes
    pub attributes: EntityAttributes,
    /// First name, including any middle names
    pub first_name: String,
    /// Last name
    pub last_name: String,
}

impl NameEntity {
    /// Create a name with default attributes
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            attributes: EntityAttributes::default(),
            first_name: first_name.into(),
            last_name: last_name.into(),
        }
    }
}

impl Entity for NameEntity {
    fn make_content(&self) -> Result<Map<String, Value>, EntityError> {
        let mut content = Map::new();
        content.insert("first_name".to_string(), Value::from(self.first_name.clone()));
        content.insert("last_name".to_string(), Value::from(self.last_name.clone()));
        Ok(content)
    }

    fn load_content(&mut self, content: &Map<String, Value>) -> Result<(), EntityError> {
        let first_name = fields::require_str(content, "first_name")?;
        let last_name = fields::require_str(content, "last_name")?;
        self.first_name = first_name.to_string();
        self.last_name = last_name.to_string();
        Ok(())
    }

    fn attributes(&self) -> &EntityAttributes {
        &self.attributes
    }

    fn attributes_mut(&mut self) -> &mut EntityAttributes {
        &mut self.attributes
    }
}

/// Answer type producing [`NameEntity`]
#[derive(Debug, Clone, Copy, Default)]
pub struct NameType;

impl NameType {
    /// Create a name type
    pub fn new() -> Self {
        Self
    }
}

impl AnswerType for NameType {
    fn parse(&self, value: &Map<String, Value>) -> Result<Box<dyn Entity>, EntityError> {
        let first_name = fields::require_str(value, "first_name")?;
        let last_name = fields::require_str(value, "last_name")?;
        Ok(Box::new(NameEntity::new(clean(first_name), clean(last_name))))
    }

    fn instructions(&self) -> TypeInstructions {
        TypeInstructions::new(
            "A name of a person, split into first and last name",
            [
                "If the person has middle names, include them as further names in the first_name field",
                "If you cannot determine either the first or last name of the person, return an empty string for that property",
            ],
        )
    }

    fn schema_properties(&self) -> Map<String, Value> {
        let mut props = Map::new();
        props.insert("first_name".to_string(), json!({"type": "string"}));
        props.insert("last_name".to_string(), json!({"type": "string"}));
        props
    }
}
