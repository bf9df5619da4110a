//! The `text` answer type

use docqa_domain::{fields, AnswerType, Entity, EntityAttributes, EntityError, TypeInstructions};
use serde_json::{json, Map, Value};

/// A plain text answer
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextEntity {
    /// Shared entity attributes
    pub attributes: EntityAttributes,
    /// The answer text, exactly as given
    pub text: String,
}

impl TextEntity {
    /// Create a text answer with default attributes
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            attributes: EntityAttributes::default(),
            text: text.into(),
        }
    }
}

impl Entity for TextEntity {
    fn make_content(&self) -> Result<Map<String, Value>, EntityError> {
        let mut content = Map::new();
        content.insert("text".to_string(), Value::from(self.text.clone()));
        Ok(content)
    }

    fn load_content(&mut self, content: &Map<String, Value>) -> Result<(), EntityError> {
        self.text = fields::require_str(content, "text")?.to_string();
        Ok(())
    }

    fn attributes(&self) -> &EntityAttributes {
        &self.attributes
    }

    fn attributes_mut(&mut self) -> &mut EntityAttributes {
        &mut self.attributes
    }
}

/// Answer type producing [`TextEntity`]
#[derive(Debug, Clone, Copy, Default)]
pub struct TextType;

impl TextType {
    /// Create a text type
    pub fn new() -> Self {
        Self
    }
}

impl AnswerType for TextType {
    fn parse(&self, value: &Map<String, Value>) -> Result<Box<dyn Entity>, EntityError> {
        let text = fields::require_str(value, "text")?;
        Ok(Box::new(TextEntity::new(text)))
    }

    fn instructions(&self) -> TypeInstructions {
        TypeInstructions::new(
            "A plaintext field",
            ["Remember that this is json so you will need to json escape the text"],
        )
    }

    fn schema_properties(&self) -> Map<String, Value> {
        let mut props = Map::new();
        props.insert("text".to_string(), json!({"type": "string"}));
        props
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_keeps_text_verbatim() {
        let value = json!({"text": "  line one\nline \"two\"  "});
        let entity = TextType::new().parse(value.as_object().unwrap()).unwrap();
        let text = entity.downcast_ref::<TextEntity>().unwrap();
        assert_eq!(text.text, "  line one\nline \"two\"  ");
    }

    #[test]
    fn test_parse_missing_text() {
        let value = json!({"body": "wrong key"});
        let result = TextType::new().parse(value.as_object().unwrap());
        assert_eq!(result.unwrap_err(), EntityError::missing("text"));
    }

    #[test]
    fn test_load_content_rejects_non_string() {
        let content = json!({"text": ["a", "b"]});
        let mut entity = TextEntity::default();
        assert!(entity.load_content(content.as_object().unwrap()).is_err());
    }
}
