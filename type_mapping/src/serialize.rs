//! Serialization utilities
//!
//! This module bridges serde data and column values, which is how typed models are
//! turned into records and back.

use crate::types::Value;
use serde_json::{Map, Number};

impl From<&serde_json::Value> for Value {
    fn from(value: &serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Boolean(*b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::Integer(i)
                } else if let Some(f) = n.as_f64() {
                    Value::Float(f)
                } else {
                    Value::Text(n.to_string())
                }
            }
            serde_json::Value::String(s) => Value::Text(s.clone()),
            // Nested data is stored as its JSON text
            other => Value::Text(other.to_string()),
        }
    }
}

impl Value {
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Null => serde_json::Value::Null,
            Value::Boolean(b) => serde_json::Value::Bool(*b),
            Value::Integer(i) => serde_json::Value::Number((*i).into()),
            Value::Float(f) => Number::from_f64(*f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Value::Text(s) => serde_json::Value::String(s.clone()),
        }
    }
}

/// Flatten a serialized object into `(key, value)` pairs; `None` if it is not an object
pub fn json_object_to_values(json: &serde_json::Value) -> Option<Vec<(String, Value)>> {
    json.as_object().map(|map| {
        map.iter()
            .map(|(key, value)| (key.clone(), Value::from(value)))
            .collect()
    })
}

/// Build a JSON object from `(key, value)` pairs, ready for `serde_json::from_value`
pub fn values_to_json_object<'a, I>(values: I) -> serde_json::Value
where
    I: IntoIterator<Item = (&'a str, &'a Value)>,
{
    let map: Map<String, serde_json::Value> = values
        .into_iter()
        .map(|(key, value)| (key.to_string(), value.to_json()))
        .collect();
    serde_json::Value::Object(map)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_object_flattening() {
        let values = json_object_to_values(&json!({"id": 7, "name": "ann", "score": 1.5, "admin": false, "bio": null}))
            .expect("object");
        let lookup = |key: &str| values.iter().find(|(k, _)| k == key).map(|(_, v)| v.clone());
        assert_eq!(lookup("id"), Some(Value::Integer(7)));
        assert_eq!(lookup("name"), Some(Value::Text("ann".into())));
        assert_eq!(lookup("score"), Some(Value::Float(1.5)));
        assert_eq!(lookup("admin"), Some(Value::Boolean(false)));
        assert_eq!(lookup("bio"), Some(Value::Null));
    }

    #[test]
    fn test_non_object_is_rejected() {
        assert!(json_object_to_values(&json!([1, 2])).is_none());
    }

    #[test]
    fn test_nested_data_is_kept_as_json_text() {
        assert_eq!(Value::from(&json!({"a": 1})), Value::Text("{\"a\":1}".into()));
    }

    #[test]
    fn test_non_finite_float_becomes_null() {
        assert_eq!(Value::Float(f64::NAN).to_json(), serde_json::Value::Null);
    }
}
