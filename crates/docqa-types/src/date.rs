//! The `date` answer type

use chrono::NaiveDate;
use docqa_domain::{fields, AnswerType, Entity, EntityAttributes, EntityError, TypeInstructions};
use serde_json::{json, Map, Value};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// A calendar date
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateEntity {
    /// Shared entity attributes
    pub attributes: EntityAttributes,
    /// The date
    pub date: NaiveDate,
}

impl DateEntity {
    /// Create a date with default attributes
    pub fn new(date: NaiveDate) -> Self {
        Self {
            attributes: EntityAttributes::default(),
            date,
        }
    }
}

impl Default for DateEntity {
    fn default() -> Self {
        Self::new(NaiveDate::default())
    }
}

impl Entity for DateEntity {
    fn make_content(&self) -> Result<Map<String, Value>, EntityError> {
        let mut content = Map::new();
        content.insert(
            "date".to_string(),
            Value::from(self.date.format(DATE_FORMAT).to_string()),
        );
        Ok(content)
    }

    fn load_content(&mut self, content: &Map<String, Value>) -> Result<(), EntityError> {
        let raw = fields::require_str(content, "date")?;
        self.date = NaiveDate::parse_from_str(raw, DATE_FORMAT)
            .map_err(|e| EntityError::invalid("date", format!("'{}' is not YYYY-MM-DD: {}", raw, e)))?;
        Ok(())
    }

    fn attributes(&self) -> &EntityAttributes {
        &self.attributes
    }

    fn attributes_mut(&mut self) -> &mut EntityAttributes {
        &mut self.attributes
    }
}

/// Answer type producing [`DateEntity`]
///
/// All of `year`, `month` and `day` are required; there is no defaulting here.
#[derive(Debug, Clone, Copy, Default)]
pub struct DateType;

impl DateType {
    /// Create a date type
    pub fn new() -> Self {
        Self
    }
}

fn component<T: TryFrom<i64>>(value: &Map<String, Value>, field: &str) -> Result<T, EntityError> {
    let n = fields::require_integer(value, field)?;
    T::try_from(n).map_err(|_| EntityError::invalid(field, format!("{} is out of range", n)))
}

impl AnswerType for DateType {
    fn parse(&self, value: &Map<String, Value>) -> Result<Box<dyn Entity>, EntityError> {
        let year: i32 = component(value, "year")?;
        let month: u32 = component(value, "month")?;
        let day: u32 = component(value, "day")?;

        if !(0..=9999).contains(&year) {
            return Err(EntityError::invalid("year", format!("{} is out of range", year)));
        }
        let date = NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| {
            EntityError::invalid("day", format!("{}-{}-{} is not a calendar date", year, month, day))
        })?;

        Ok(Box::new(DateEntity::new(date)))
    }

    fn instructions(&self) -> TypeInstructions {
        TypeInstructions::new(
            "A date, split into year, month, and day",
            ["If you cannot determine either day or month, assume the 1st / January"],
        )
    }

    fn schema_properties(&self) -> Map<String, Value> {
        let mut props = Map::new();
        props.insert("year".to_string(), json!({"type": "integer"}));
        props.insert("month".to_string(), json!({"type": "integer"}));
        props.insert("day".to_string(), json!({"type": "integer"}));
        props
    }
}
