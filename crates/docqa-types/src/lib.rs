//! docqa Answer Types
//!
//! The default answer types the model can respond with, each paired with the
//! entity it produces:
//!
//! | Key    | Answer type | Entity       |
//! |--------|-------------|--------------|
//! | `name` | [`NameType`] | [`NameEntity`] |
//! | `date` | [`DateType`] | [`DateEntity`] |
//! | `text` | [`TextType`] | [`TextEntity`] |
//!
//! # Examples
//!
//! ```
//! use docqa_types::{default_codec, default_types};
//!
//! let types = default_types();
//! let codec = default_codec();
//!
//! assert_eq!(types.keys().collect::<Vec<_>>(), vec!["date", "name", "text"]);
//! assert_eq!(codec.keys(), vec!["date", "name", "text"]);
//! ```

#![warn(missing_docs)]

mod date;
mod name;
mod text;

pub use date::{DateEntity, DateType};
pub use name::{NameEntity, NameType};
pub use text::{TextEntity, TextType};

use docqa_domain::{EntityCodec, TypeRegistry};

/// Key of the `name` answer type
pub const NAME_KEY: &str = "name";
/// Key of the `date` answer type
pub const DATE_KEY: &str = "date";
/// Key of the `text` answer type
pub const TEXT_KEY: &str = "text";

/// Register every default answer type and its entity under the same key
pub fn register_defaults(types: &mut TypeRegistry, codec: &mut EntityCodec) {
    types.register(NAME_KEY, NameType::new());
    codec.register::<NameEntity>(NAME_KEY);

    types.register(DATE_KEY, DateType::new());
    codec.register::<DateEntity>(DATE_KEY);

    types.register(TEXT_KEY, TextType::new());
    codec.register::<TextEntity>(TEXT_KEY);
}

/// All default answer types, keyed by type key
pub fn default_types() -> TypeRegistry {
    let mut types = TypeRegistry::new();
    register_defaults(&mut types, &mut EntityCodec::new());
    types
}

/// A codec that can encode and decode every default entity
pub fn default_codec() -> EntityCodec {
    let mut codec = EntityCodec::new();
    register_defaults(&mut TypeRegistry::new(), &mut codec);
    codec
}

/// Trim surrounding whitespace the model tends to leave in names
pub(crate) fn clean(value: &str) -> String {
    value.trim_matches(|c| matches!(c, ' ' | '\n' | '\r' | '\t')).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_registries_agree_on_keys() {
        let types = default_types();
        let codec = default_codec();
        let type_keys: Vec<_> = types.keys().collect();
        assert_eq!(type_keys, codec.keys());
    }

    #[test]
    fn test_every_parsed_entity_is_encodable() {
        let types = default_types();
        let codec = default_codec();
        let samples = [
            (NAME_KEY, json!({"first_name": "Ada", "last_name": "Lovelace"})),
            (DATE_KEY, json!({"year": 1843, "month": 7, "day": 10})),
            (TEXT_KEY, json!({"text": "Notes on the Analytical Engine"})),
        ];

        for (key, raw) in samples {
            let entity = types.get(key).unwrap().parse(raw.as_object().unwrap()).unwrap();
            let envelope = codec.encode(entity.as_ref()).unwrap();
            assert_eq!(envelope.kind, key);
        }
    }

    #[test]
    fn test_clean() {
        assert_eq!(clean(" Ada\n\t"), "Ada");
        assert_eq!(clean("Ada King"), "Ada King");
    }
}
