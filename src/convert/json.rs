//! Helpers for treating plain payloads as JSON.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;

use crate::message::Value;
use crate::types::RawType;

/// Heuristic used before attempting a JSON decode of a plain payload:
/// text starting with an object, array, or quoted string literal.
pub fn looks_like_json(value: &Value) -> bool {
    let text = match value {
        Value::Text(text) => text.as_str(),
        Value::Bytes(bytes) => match std::str::from_utf8(bytes) {
            Ok(text) => text,
            Err(_) => return false,
        },
        _ => return false,
    };
    let trimmed = text.trim_start();
    trimmed.starts_with('{') || trimmed.starts_with('[') || trimmed.starts_with('"')
}

/// Decode a JSON-literal payload toward a declared raw type. A payload
/// that parses but does not fit the declared type is kept as structured
/// JSON rather than discarded.
pub fn decode_literal(value: &Value, target: &RawType) -> Result<Value, serde_json::Error> {
    let parsed: serde_json::Value = match value {
        Value::Text(text) => serde_json::from_str(text)?,
        Value::Bytes(bytes) => serde_json::from_slice(bytes)?,
        other => return Ok(other.clone()),
    };
    Ok(shape_json(parsed.clone(), target).unwrap_or(Value::Json(parsed)))
}

/// Fit a parsed JSON document to a declared raw type.
pub fn shape_json(json: serde_json::Value, target: &RawType) -> Option<Value> {
    match target {
        RawType::Json | RawType::Named(_) | RawType::Any => Some(Value::Json(json)),
        RawType::Text => json.as_str().map(|text| Value::Text(text.to_string())),
        RawType::Integer => json.as_i64().map(Value::Integer),
        RawType::Float => json.as_f64().map(Value::Float),
        RawType::Bool => json.as_bool().map(Value::Bool),
        RawType::Bytes => json
            .as_str()
            .and_then(|text| BASE64.decode(text).ok())
            .map(Value::Bytes),
        RawType::Unit => None,
    }
}

/// Render a runtime value as a JSON document. Binary payloads are
/// base64-encoded; envelopes and holders contribute their payloads.
pub fn value_to_json(value: &Value) -> serde_json::Value {
    match value {
        Value::Text(text) => serde_json::Value::String(text.clone()),
        Value::Bytes(bytes) => serde_json::Value::String(BASE64.encode(bytes)),
        Value::Bool(flag) => serde_json::Value::Bool(*flag),
        Value::Integer(number) => serde_json::Value::Number((*number).into()),
        Value::Float(number) => serde_json::Number::from_f64(*number)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null),
        Value::Json(json) => json.clone(),
        Value::Tuple(items) | Value::List(items) | Value::SortedSet(items) => {
            serde_json::Value::Array(items.iter().map(value_to_json).collect())
        }
        Value::Envelope(envelope) => value_to_json(envelope.payload()),
        Value::Held(holder) => value_to_json(&holder.value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_literal_detection() {
        assert!(looks_like_json(&Value::Text("{\"a\":1}".into())));
        assert!(looks_like_json(&Value::Text("  [1,2]".into())));
        assert!(looks_like_json(&Value::Text("\"quoted\"".into())));
        assert!(looks_like_json(&Value::Bytes(b"{\"a\":1}".to_vec())));
        assert!(!looks_like_json(&Value::Text("plain words".into())));
        assert!(!looks_like_json(&Value::Integer(3)));
    }

    #[test]
    fn decode_literal_fits_declared_type() {
        let decoded = decode_literal(&Value::Text("\"hello\"".into()), &RawType::Text).unwrap();
        assert_eq!(decoded, Value::Text("hello".into()));

        let decoded = decode_literal(&Value::Text("42".into()), &RawType::Integer).unwrap();
        assert_eq!(decoded, Value::Integer(42));
    }

    #[test]
    fn decode_literal_keeps_structured_json_on_shape_mismatch() {
        let decoded = decode_literal(&Value::Text("{\"a\":1}".into()), &RawType::Text).unwrap();
        assert_eq!(decoded, Value::Json(serde_json::json!({"a": 1})));
    }

    #[test]
    fn decode_literal_rejects_malformed_json() {
        let result = decode_literal(&Value::Text("{broken".into()), &RawType::Json);
        assert!(result.is_err());
    }

    #[test]
    fn bytes_round_trip_through_base64() {
        let json = value_to_json(&Value::Bytes(vec![1, 2, 3]));
        let back = shape_json(json, &RawType::Bytes).unwrap();
        assert_eq!(back, Value::Bytes(vec![1, 2, 3]));
    }
}
