//! Typed field access on generic JSON mappings
//!
//! Answer types and entities use these helpers to downcast raw model output,
//! turning absent keys and wrongly-typed values into [`EntityError::InvalidField`].

use crate::EntityError;
use serde_json::{Map, Value};

fn require<'a>(map: &'a Map<String, Value>, field: &str) -> Result<&'a Value, EntityError> {
    map.get(field).ok_or_else(|| EntityError::missing(field))
}

/// Get a required string field
pub fn require_str<'a>(map: &'a Map<String, Value>, field: &str) -> Result<&'a str, EntityError> {
    require(map, field)?
        .as_str()
        .ok_or_else(|| EntityError::wrong_type(field, "string"))
}

/// Get a required integer field
///
/// Floats with no fractional part (`1990.0`) are accepted, since models do
/// not always distinguish the two.
pub fn require_integer(map: &Map<String, Value>, field: &str) -> Result<i64, EntityError> {
    let value = require(map, field)?;
    if let Some(n) = value.as_i64() {
        return Ok(n);
    }
    match value.as_f64() {
        Some(f) if f.fract() == 0.0 && f >= i64::MIN as f64 && f <= i64::MAX as f64 => Ok(f as i64),
        _ => Err(EntityError::wrong_type(field, "integer")),
    }
}

/// Get a required boolean field
pub fn require_bool(map: &Map<String, Value>, field: &str) -> Result<bool, EntityError> {
    require(map, field)?
        .as_bool()
        .ok_or_else(|| EntityError::wrong_type(field, "boolean"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn map(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_require_str() {
        let m = map(json!({"name": "Ada", "age": 36}));
        assert_eq!(require_str(&m, "name").unwrap(), "Ada");
        assert_eq!(require_str(&m, "missing"), Err(EntityError::missing("missing")));
        assert_eq!(
            require_str(&m, "age"),
            Err(EntityError::wrong_type("age", "string"))
        );
    }

    #[test]
    fn test_require_integer() {
        let m = map(json!({"a": 1990, "b": 12.0, "c": 1.5, "d": "7"}));
        assert_eq!(require_integer(&m, "a").unwrap(), 1990);
        assert_eq!(require_integer(&m, "b").unwrap(), 12);
        assert!(require_integer(&m, "c").is_err());
        assert!(require_integer(&m, "d").is_err());
        assert_eq!(require_integer(&m, "e"), Err(EntityError::missing("e")));
    }

    #[test]
    fn test_require_bool() {
        let m = map(json!({"flag": true, "other": "yes"}));
        assert!(require_bool(&m, "flag").unwrap());
        assert!(require_bool(&m, "other").is_err());
    }
}
