//! Lenient JSON decoding.

use serde_json::{Map, Value};

/// Decode text into a JSON object without ever failing
///
/// Malformed text, and well-formed JSON that is not an object, both yield
/// an empty object so callers can always proceed to field validation.
pub fn parse_json_to_object(text: &str) -> Map<String, Value> {
    match serde_json::from_str::<Value>(text) {
        Ok(Value::Object(map)) => map,
        _ => Map::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_objects() {
        let map = parse_json_to_object(r#"{"phone": "1234567890", "tosAgreement": true}"#);
        assert_eq!(map["phone"], "1234567890");
        assert_eq!(map["tosAgreement"], true);
    }

    #[test]
    fn test_malformed_yields_empty() {
        assert!(parse_json_to_object("{not json").is_empty());
        assert!(parse_json_to_object("").is_empty());
    }

    #[test]
    fn test_non_objects_yield_empty() {
        assert!(parse_json_to_object("[1, 2]").is_empty());
        assert!(parse_json_to_object("\"text\"").is_empty());
        assert!(parse_json_to_object("null").is_empty());
    }
}
