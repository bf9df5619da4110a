//! Schema generation, system prompt generation and response parsing
//!
//! A [`Protocol`] decides how questions are presented to the model and how the
//! model's raw text is turned back into typed entities. [`BasicProtocol`] is
//! the general-purpose implementation backed by a [`TypeRegistry`].

use crate::error::ExtractorError;
use crate::md::MarkdownBuilder;
use docqa_domain::{
    Answers, Question, Questions, RoleAndTask, TypeRegistry, ANSWER_TYPE_FIELD,
};
use serde_json::{json, Map, Value};
use tracing::{debug, warn};

/// How questions are asked and answers are read back
pub trait Protocol {
    /// JSON schema the model's response must follow
    fn schema(&self, questions: &Questions) -> Value;

    /// Instructions for the model, in markdown
    fn system_prompt(&self, questions: &Questions) -> String;

    /// Parse the model's raw response into answers, keyed by question key
    fn parse_response(&self, response: &str) -> Result<Answers, ExtractorError>;

    /// Parse a response, checking it only answers `questions` with allowed types
    ///
    /// The default performs no extra checks.
    fn parse_response_for(
        &self,
        _questions: &Questions,
        response: &str,
    ) -> Result<Answers, ExtractorError> {
        self.parse_response(response)
    }

    /// Check that `questions` can be asked under this protocol
    fn validate_questions(&self, _questions: &Questions) -> Result<(), ExtractorError> {
        Ok(())
    }
}

/// General-purpose information extraction protocol
///
/// # Examples
///
/// ```
/// use docqa_domain::{RoleAndTask, TypeRegistry};
/// use docqa_extractor::{BasicProtocol, Protocol};
///
/// let protocol = BasicProtocol::new(RoleAndTask::default(), TypeRegistry::new());
/// let answers = protocol.parse_response(r#"{"author": []}"#).unwrap();
/// assert!(answers["author"].is_empty());
/// ```
#[derive(Debug)]
pub struct BasicProtocol {
    role_and_task: RoleAndTask,
    types: TypeRegistry,
}

impl BasicProtocol {
    /// Create a protocol over the given answer types
    pub fn new(role_and_task: RoleAndTask, types: TypeRegistry) -> Self {
        Self { role_and_task, types }
    }

    /// Registered answer types
    pub fn types(&self) -> &TypeRegistry {
        &self.types
    }

    /// Role and task used in the system prompt
    pub fn role_and_task(&self) -> &RoleAndTask {
        &self.role_and_task
    }

    fn type_schema(&self) -> Map<String, Value> {
        let mut definitions = Map::new();
        for (key, answer_type) in self.types.iter() {
            let mut properties = answer_type.schema_properties();
            properties.insert(
                ANSWER_TYPE_FIELD.to_string(),
                json!({"type": "string", "const": key}),
            );
            let required: Vec<Value> = properties.keys().cloned().map(Value::from).collect();
            definitions.insert(
                key.to_string(),
                json!({
                    "type": "object",
                    "properties": properties,
                    "required": required,
                    "additionalProperties": false,
                }),
            );
        }
        definitions
    }

    /// Allowed keys of `question` that name a registered type, in question order
    fn registered_keys<'q>(&self, question: &'q Question) -> Vec<&'q str> {
        question
            .allowed_type_keys
            .iter()
            .map(String::as_str)
            .filter(|type_key| self.types.contains(type_key))
            .collect()
    }

    fn question_schema(&self, key: &str, question: &Question) -> Value {
        let allowed = self.registered_keys(question);
        for type_key in &question.allowed_type_keys {
            if !allowed.contains(&type_key.as_str()) {
                warn!(
                    "Question '{}' allows unregistered answer type '{}', skipping it",
                    key, type_key
                );
            }
        }

        // An empty anyOf is not valid JSON schema; nothing can be answered instead
        if allowed.is_empty() {
            return json!({"type": "array", "maxItems": 0});
        }

        let options: Vec<Value> = allowed
            .iter()
            .map(|type_key| json!({"$ref": format!("#/definitions/{}", type_key)}))
            .collect();

        json!({
            "type": "array",
            "items": {"anyOf": options},
        })
    }

    fn parse(
        &self,
        response: &str,
        questions: Option<&Questions>,
    ) -> Result<Answers, ExtractorError> {
        let value: Value = serde_json::from_str(response)?;
        let object = match value {
            Value::Object(object) => object,
            other => {
                return Err(ExtractorError::InvalidResponseShape(format!(
                    "expected a JSON object, got {}",
                    json_kind(&other)
                )))
            }
        };

        let mut answers = Answers::new();
        for (question_key, raw_answers) in object {
            let question = match questions {
                Some(questions) => Some(questions.get(&question_key).ok_or_else(|| {
                    ExtractorError::InvalidResponseShape(format!(
                        "'{}' is not one of the questions",
                        question_key
                    ))
                })?),
                None => None,
            };

            let items = match raw_answers {
                Value::Array(items) => items,
                other => {
                    return Err(ExtractorError::InvalidResponseShape(format!(
                        "answers to '{}' must be an array, got {}",
                        question_key,
                        json_kind(&other)
                    )))
                }
            };

            let mut entities = Vec::with_capacity(items.len());
            for (index, item) in items.iter().enumerate() {
                let fields = item.as_object().ok_or_else(|| {
                    ExtractorError::InvalidResponseShape(format!(
                        "answer {} to '{}' must be an object, got {}",
                        index,
                        question_key,
                        json_kind(item)
                    ))
                })?;

                let answer_type = match fields.get(ANSWER_TYPE_FIELD) {
                    Some(Value::String(answer_type)) => answer_type.as_str(),
                    Some(other) => {
                        return Err(ExtractorError::InvalidDiscriminant {
                            question: question_key.clone(),
                            index,
                            found: other.to_string(),
                        })
                    }
                    None => {
                        return Err(ExtractorError::MissingDiscriminant {
                            question: question_key.clone(),
                            index,
                        })
                    }
                };

                let parser = self.types.get(answer_type).ok_or_else(|| {
                    ExtractorError::UnknownAnswerType {
                        question: question_key.clone(),
                        answer_type: answer_type.to_string(),
                    }
                })?;

                if let Some(question) = question {
                    if !question.allows(answer_type) {
                        return Err(ExtractorError::DisallowedAnswerType {
                            question: question_key.clone(),
                            answer_type: answer_type.to_string(),
                        });
                    }
                }

                let mut entity = parser.parse(fields).map_err(|source| {
                    ExtractorError::InvalidAnswer {
                        question: question_key.clone(),
                        index,
                        source,
                    }
                })?;
                // Evidence and localisation are never the model's to decide
                entity.attributes_mut().reset();
                entities.push(entity);
            }

            debug!("Parsed {} answers for '{}'", entities.len(), question_key);
            answers.insert(question_key, entities);
        }

        Ok(answers)
    }
}

impl Protocol for BasicProtocol {
    fn schema(&self, questions: &Questions) -> Value {
        let properties: Map<String, Value> = questions
            .iter()
            .map(|(key, question)| (key.clone(), self.question_schema(key, question)))
            .collect();
        let required: Vec<Value> = questions.keys().cloned().map(Value::from).collect();

        json!({
            "type": "object",
            "properties": properties,
            "definitions": self.type_schema(),
            "required": required,
            "additionalProperties": false,
        })
    }

    fn system_prompt(&self, questions: &Questions) -> String {
        let mut md = MarkdownBuilder::new();

        md.header(1, "Role & Task")
            .bullet(0, &self.role_and_task.role)
            .bullet(0, &self.role_and_task.task)
            .bullet(
                0,
                "The user will provide you with the raw text from the document in question",
            )
            .blank(2);

        md.header(1, "Answer Types")
            .bullet(0, "You can answer each question with some amount of answer objects")
            .bullet(
                0,
                "Each type of answer object has a different purpose, with different properties",
            )
            .bullet(0, "Below are the allowed answer types");
        for (key, answer_type) in self.types.iter() {
            let instructions = answer_type.instructions();
            md.blank(1)
                .header(2, &format!("`{}`", key))
                .bullet(0, &format!("**{}**", instructions.one_liner));
            for detail in &instructions.details {
                md.bullet(0, detail);
            }
        }
        md.blank(2);

        md.header(1, "Questions")
            .bullet(0, "You should answer all questions")
            .bullet(
                0,
                "If you cannot determine the answer to a question, \
                 return an empty list for that question",
            );
        for (key, question) in questions {
            md.blank(1)
                .header(2, &format!("`{}`", key))
                .bullet(0, &format!("**{}**", question.question));
            for detail in &question.details {
                md.bullet(0, detail);
            }
            let allowed = self.registered_keys(question);
            if allowed.is_empty() {
                md.bullet(0, "No response types are allowed, always return an empty list");
            } else {
                md.bullet(0, &format!("Allowed response types: {}", allowed.join(", ")));
            }
        }

        md.build()
    }

    fn parse_response(&self, response: &str) -> Result<Answers, ExtractorError> {
        self.parse(response, None)
    }

    fn parse_response_for(
        &self,
        questions: &Questions,
        response: &str,
    ) -> Result<Answers, ExtractorError> {
        self.parse(response, Some(questions))
    }

    fn validate_questions(&self, questions: &Questions) -> Result<(), ExtractorError> {
        for (key, question) in questions {
            if question.allowed_type_keys.is_empty() {
                return Err(ExtractorError::Config(format!(
                    "question '{}' allows no answer types",
                    key
                )));
            }
            if let Some(unknown) = question
                .allowed_type_keys
                .iter()
                .find(|type_key| !self.types.contains(type_key))
            {
                return Err(ExtractorError::UnknownAnswerType {
                    question: key.clone(),
                    answer_type: unknown.clone(),
                });
            }
        }
        Ok(())
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
