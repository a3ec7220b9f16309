//! Firestore typed-value codec
//!
//! The REST API wraps every value in a single-key object naming its type,
//! e.g. `{"stringValue": "Beach"}` or `{"integerValue": "3"}`. These helpers
//! convert between that form and plain JSON. Timestamps, references and
//! bytes decode to their string form.

use crate::error::{AppError, Result};
use crate::remote::Fields;
use serde_json::{json, Map, Number, Value};

/// Encode a plain JSON value as a Firestore value
pub fn encode(value: &Value) -> Value {
    match value {
        Value::Null => json!({ "nullValue": null }),
        Value::Bool(b) => json!({ "booleanValue": b }),
        Value::Number(n) => match n.as_i64() {
            Some(i) => json!({ "integerValue": i.to_string() }),
            None => json!({ "doubleValue": n.as_f64().unwrap_or_default() }),
        },
        Value::String(s) => json!({ "stringValue": s }),
        Value::Array(items) => json!({
            "arrayValue": { "values": items.iter().map(encode).collect::<Vec<_>>() }
        }),
        Value::Object(map) => json!({ "mapValue": { "fields": encode_fields(map) } }),
    }
}

pub fn encode_fields(fields: &Fields) -> Map<String, Value> {
    fields
        .iter()
        .map(|(name, value)| (name.clone(), encode(value)))
        .collect()
}

/// Decode a Firestore value into plain JSON
pub fn decode(value: &Value) -> Result<Value> {
    let (kind, inner) = value
        .as_object()
        .and_then(|obj| obj.iter().next())
        .ok_or_else(|| AppError::Remote(format!("Malformed Firestore value: {}", value)))?;

    match kind.as_str() {
        "nullValue" => Ok(Value::Null),
        "booleanValue" => Ok(Value::Bool(inner.as_bool().unwrap_or_default())),
        "integerValue" => {
            let parsed = match inner {
                Value::String(s) => s.parse::<i64>().ok(),
                other => other.as_i64(),
            };
            parsed
                .map(|i| Value::Number(i.into()))
                .ok_or_else(|| AppError::Remote(format!("Invalid integerValue: {}", inner)))
        }
        "doubleValue" => Ok(inner
            .as_f64()
            .and_then(Number::from_f64)
            .map(Value::Number)
            .unwrap_or(Value::Null)),
        "stringValue" | "timestampValue" | "referenceValue" | "bytesValue" => {
            Ok(Value::String(inner.as_str().unwrap_or_default().to_string()))
        }
        "geoPointValue" => Ok(inner.clone()),
        "arrayValue" => {
            let values = inner
                .get("values")
                .and_then(Value::as_array)
                .map(|items| items.iter().map(decode).collect::<Result<Vec<_>>>())
                .transpose()?
                .unwrap_or_default();
            Ok(Value::Array(values))
        }
        "mapValue" => {
            let fields = inner
                .get("fields")
                .and_then(Value::as_object)
                .map(decode_fields)
                .transpose()?
                .unwrap_or_default();
            Ok(Value::Object(fields))
        }
        other => Err(AppError::Remote(format!(
            "Unsupported Firestore value type: {}",
            other
        ))),
    }
}

pub fn decode_fields(fields: &Map<String, Value>) -> Result<Fields> {
    fields
        .iter()
        .map(|(name, value)| Ok((name.clone(), decode(value)?)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_scalars() {
        assert_eq!(encode(&json!("Beach")), json!({"stringValue": "Beach"}));
        assert_eq!(encode(&json!(3)), json!({"integerValue": "3"}));
        assert_eq!(encode(&json!(2.5)), json!({"doubleValue": 2.5}));
        assert_eq!(encode(&json!(true)), json!({"booleanValue": true}));
        assert_eq!(encode(&Value::Null), json!({"nullValue": null}));
    }

    #[test]
    fn test_decode_document_fields() {
        let raw = json!({
            "place_name": {"stringValue": "Beach"},
            "score": {"integerValue": "3"},
            "updated_at": {"timestampValue": "2024-11-02T08:15:00.123456Z"},
            "tags": {"arrayValue": {"values": [{"stringValue": "sea"}]}},
            "empty": {"arrayValue": {}},
            "meta": {"mapValue": {"fields": {"isActive": {"booleanValue": false}}}}
        });

        let decoded = decode_fields(raw.as_object().unwrap()).unwrap();

        assert_eq!(decoded["place_name"], json!("Beach"));
        assert_eq!(decoded["score"], json!(3));
        assert_eq!(decoded["updated_at"], json!("2024-11-02T08:15:00.123456Z"));
        assert_eq!(decoded["tags"], json!(["sea"]));
        assert_eq!(decoded["empty"], json!([]));
        assert_eq!(decoded["meta"], json!({"isActive": false}));
    }

    #[test]
    fn test_nested_object_encodes_as_map() {
        let encoded = encode(&json!({"a": [1, "b"]}));
        assert_eq!(
            encoded,
            json!({"mapValue": {"fields": {"a": {"arrayValue": {"values": [
                {"integerValue": "1"},
                {"stringValue": "b"}
            ]}}}}})
        );
        assert_eq!(decode(&encoded).unwrap(), json!({"a": [1, "b"]}));
    }

    #[test]
    fn test_decode_rejects_unknown_type() {
        assert!(decode(&json!({"mysteryValue": 1})).is_err());
        assert!(decode(&json!("bare")).is_err());
    }
}
