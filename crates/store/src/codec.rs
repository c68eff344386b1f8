//! Conversion between plain JSON documents and the REST API's typed values
//!
//! The REST API wraps every field in a single-key object naming its type,
//! e.g. `{"stringValue": "x"}` or `{"integerValue": "42"}` (integers travel
//! as strings).

use crate::document::Document;
use crate::error::{StoreError, StoreResult};
use serde_json::{json, Map, Value};

/// Encode a document into the `fields` object of a REST document
#[must_use]
pub fn encode_fields(document: &Document) -> Value {
    Value::Object(
        document
            .iter()
            .map(|(k, v)| (k.clone(), encode_value(v)))
            .collect(),
    )
}

/// Encode a single JSON value
#[must_use]
pub fn encode_value(value: &Value) -> Value {
    match value {
        Value::Null => json!({ "nullValue": null }),
        Value::Bool(b) => json!({ "booleanValue": b }),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                json!({ "integerValue": i.to_string() })
            } else {
                // u64 above i64::MAX and floats
                json!({ "doubleValue": n.as_f64() })
            }
        }
        Value::String(s) => json!({ "stringValue": s }),
        Value::Array(items) => {
            let values: Vec<Value> = items.iter().map(encode_value).collect();
            json!({ "arrayValue": { "values": values } })
        }
        Value::Object(map) => {
            let fields: Map<String, Value> = map
                .iter()
                .map(|(k, v)| (k.clone(), encode_value(v)))
                .collect();
            json!({ "mapValue": { "fields": fields } })
        }
    }
}

/// Decode the `fields` object of a REST document
///
/// A document without fields decodes to an empty map.
pub fn decode_fields(fields: Option<&Value>) -> StoreResult<Document> {
    match fields {
        None | Some(Value::Null) => Ok(Document::new()),
        Some(Value::Object(map)) => map
            .iter()
            .map(|(k, v)| decode_value(v).map(|decoded| (k.clone(), decoded)))
            .collect(),
        Some(other) => Err(StoreError::codec(format!(
            "expected fields object, got {other}"
        ))),
    }
}

/// Decode a single typed value
pub fn decode_value(value: &Value) -> StoreResult<Value> {
    let Some(obj) = value.as_object() else {
        return Err(StoreError::codec(format!("expected typed value object, got {value}")));
    };
    let Some((kind, inner)) = obj.iter().next() else {
        return Err(StoreError::codec("empty typed value"));
    };

    match kind.as_str() {
        "nullValue" => Ok(Value::Null),
        "booleanValue" => inner
            .as_bool()
            .map(Value::Bool)
            .ok_or_else(|| StoreError::codec("booleanValue is not a bool")),
        "integerValue" => {
            // Usually a string, occasionally a bare number from emulators
            let parsed = match inner {
                Value::String(s) => s.parse::<i64>().ok(),
                Value::Number(n) => n.as_i64(),
                _ => None,
            };
            parsed
                .map(Value::from)
                .ok_or_else(|| StoreError::codec(format!("invalid integerValue {inner}")))
        }
        "doubleValue" => match inner {
            Value::Number(_) => Ok(inner.clone()),
            // NaN and infinities arrive as strings and have no JSON form
            Value::String(s) => Ok(Value::String(s.clone())),
            _ => Err(StoreError::codec(format!("invalid doubleValue {inner}"))),
        },
        "stringValue" | "timestampValue" | "referenceValue" | "bytesValue" => inner
            .as_str()
            .map(|s| Value::String(s.to_string()))
            .ok_or_else(|| StoreError::codec(format!("{kind} is not a string"))),
        "geoPointValue" => Ok(json!({
            "latitude": inner.get("latitude").cloned().unwrap_or(json!(0.0)),
            "longitude": inner.get("longitude").cloned().unwrap_or(json!(0.0)),
        })),
        "arrayValue" => match inner.get("values") {
            None => Ok(Value::Array(Vec::new())),
            Some(Value::Array(items)) => items
                .iter()
                .map(decode_value)
                .collect::<StoreResult<Vec<_>>>()
                .map(Value::Array),
            Some(other) => Err(StoreError::codec(format!("invalid arrayValue {other}"))),
        },
        "mapValue" => decode_fields(inner.get("fields")).map(Value::Object),
        other => Err(StoreError::codec(format!("unsupported value type '{other}'"))),
    }
}
