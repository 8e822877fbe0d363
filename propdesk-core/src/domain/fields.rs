//! Field access over opaque backend records
//!
//! Every entity the admin API returns (users, purchases, KYC records, ...)
//! is treated as untyped JSON. These helpers read fields defensively:
//! a missing or oddly-typed field yields a neutral value instead of an error.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde_json::Value as JsonValue;

/// Look up a dotted path (`"user._id"`) inside a record.
///
/// Array segments may be addressed by index (`"items.0.name"`).
pub fn get_path<'a>(value: &'a JsonValue, path: &str) -> Option<&'a JsonValue> {
    if path.is_empty() {
        return Some(value);
    }
    path.split('.').try_fold(value, |current, segment| match current {
        JsonValue::Object(map) => map.get(segment),
        JsonValue::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    })
}

/// Render a field as display text. Null and missing become `None`.
pub fn as_text(value: &JsonValue, path: &str) -> Option<String> {
    match get_path(value, path)? {
        JsonValue::Null => None,
        JsonValue::String(s) => Some(s.clone()),
        JsonValue::Bool(b) => Some(b.to_string()),
        JsonValue::Number(n) => Some(n.to_string()),
        other => Some(other.to_string()),
    }
}

/// Display text with a fallback for missing fields
pub fn text_or(value: &JsonValue, path: &str, fallback: &str) -> String {
    as_text(value, path).unwrap_or_else(|| fallback.to_string())
}

/// Numeric-or-zero coercion.
///
/// Numbers and numeric strings parse; everything else (null, missing,
/// objects, garbage strings) counts as zero.
pub fn as_decimal(value: &JsonValue, path: &str) -> Decimal {
    match get_path(value, path) {
        Some(JsonValue::Number(n)) => Decimal::from_str(&n.to_string())
            .or_else(|_| Decimal::from_scientific(&n.to_string()))
            .unwrap_or(Decimal::ZERO),
        Some(JsonValue::String(s)) => Decimal::from_str(s.trim()).unwrap_or(Decimal::ZERO),
        _ => Decimal::ZERO,
    }
}

/// Decimal as a JSON number (the backend expects numbers, not strings)
pub fn decimal_to_json(value: Decimal) -> JsonValue {
    serde_json::from_str(&value.normalize().to_string()).unwrap_or(JsonValue::Null)
}

/// Identifier of a record as a string, skipping falsy ids
/// (null, empty string, `false`, `0`).
pub fn id_of(value: &JsonValue, path: &str) -> Option<String> {
    match get_path(value, path)? {
        JsonValue::String(s) if !s.is_empty() => Some(s.clone()),
        JsonValue::Number(n) if n.as_f64() != Some(0.0) => Some(n.to_string()),
        JsonValue::Bool(true) => Some("true".to_string()),
        // Populated references (`user: { _id }`) count by their own id
        JsonValue::Object(map) => map
            .get("_id")
            .or_else(|| map.get("id"))
            .and_then(|inner| match inner {
                JsonValue::String(s) if !s.is_empty() => Some(s.clone()),
                JsonValue::Number(n) => Some(n.to_string()),
                _ => None,
            }),
        _ => None,
    }
}

/// Record id: `_id`, falling back to `id`
pub fn record_id(value: &JsonValue) -> Option<String> {
    id_of(value, "_id").or_else(|| id_of(value, "id"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_get_path_nested() {
        let v = json!({"user": {"_id": "u1", "tags": ["a", "b"]}});
        assert_eq!(get_path(&v, "user._id"), Some(&json!("u1")));
        assert_eq!(get_path(&v, "user.tags.1"), Some(&json!("b")));
        assert_eq!(get_path(&v, "user.missing"), None);
        assert_eq!(get_path(&v, "user._id.deeper"), None);
    }

    #[test]
    fn test_as_decimal_coercion() {
        let v = json!({"a": 500, "b": "12.50", "c": null, "d": {"x": 1}, "e": "abc", "f": 1.5});
        assert_eq!(as_decimal(&v, "a"), Decimal::new(500, 0));
        assert_eq!(as_decimal(&v, "b"), Decimal::new(1250, 2));
        assert_eq!(as_decimal(&v, "c"), Decimal::ZERO);
        assert_eq!(as_decimal(&v, "d"), Decimal::ZERO);
        assert_eq!(as_decimal(&v, "e"), Decimal::ZERO);
        assert_eq!(as_decimal(&v, "f"), Decimal::new(15, 1));
        assert_eq!(as_decimal(&v, "missing"), Decimal::ZERO);
    }

    #[test]
    fn test_id_of_skips_falsy() {
        let v = json!({"a": "", "b": null, "c": 0, "d": "x1", "e": {"_id": "u9"}, "f": false});
        assert_eq!(id_of(&v, "a"), None);
        assert_eq!(id_of(&v, "b"), None);
        assert_eq!(id_of(&v, "c"), None);
        assert_eq!(id_of(&v, "d"), Some("x1".to_string()));
        assert_eq!(id_of(&v, "e"), Some("u9".to_string()));
        assert_eq!(id_of(&v, "f"), None);
    }

    #[test]
    fn test_decimal_to_json() {
        assert_eq!(decimal_to_json(Decimal::new(19900, 2)), json!(199));
        assert_eq!(decimal_to_json(Decimal::new(1250, 2)), json!(12.5));
    }

    #[test]
    fn test_text_or() {
        let v = json!({"name": "Ada", "age": 36, "nick": null});
        assert_eq!(text_or(&v, "name", "-"), "Ada");
        assert_eq!(text_or(&v, "age", "-"), "36");
        assert_eq!(text_or(&v, "nick", "-"), "-");
    }
}
