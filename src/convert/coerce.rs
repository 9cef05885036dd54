//! Generic type coercion between scalar payload kinds.

use crate::convert::json::value_to_json;
use crate::message::Value;
use crate::types::RawType;

/// Capability seam for coercing a runtime value toward a declared raw
/// type. Consulted by input conversion only when the value's own kind
/// differs from the declared one.
pub trait Coercer: Send + Sync {
    fn can_convert(&self, from: &RawType, to: &RawType) -> bool;

    /// Attempt the coercion. `None` means the value stays as it was.
    fn convert(&self, value: &Value, to: &RawType) -> Option<Value>;
}

/// Coercions between the scalar payload kinds: parse/display for text,
/// UTF-8 for bytes, widening for numbers, and lifting into JSON.
#[derive(Debug, Default)]
pub struct ScalarCoercer;

impl Coercer for ScalarCoercer {
    fn can_convert(&self, from: &RawType, to: &RawType) -> bool {
        use RawType::*;
        if from == to {
            return false;
        }
        matches!(
            (from, to),
            (Text, Integer)
                | (Text, Float)
                | (Text, Bool)
                | (Text, Bytes)
                | (Text, Json)
                | (Bytes, Text)
                | (Integer, Text)
                | (Integer, Float)
                | (Integer, Json)
                | (Float, Text)
                | (Float, Json)
                | (Bool, Text)
                | (Bool, Json)
                | (Json, Text)
                | (Json, Integer)
                | (Json, Float)
                | (Json, Bool)
        )
    }

    fn convert(&self, value: &Value, to: &RawType) -> Option<Value> {
        match (value, to) {
            (Value::Text(text), RawType::Integer) => {
                text.trim().parse::<i64>().ok().map(Value::Integer)
            }
            (Value::Text(text), RawType::Float) => {
                text.trim().parse::<f64>().ok().map(Value::Float)
            }
            (Value::Text(text), RawType::Bool) => text.trim().parse::<bool>().ok().map(Value::Bool),
            (Value::Text(text), RawType::Bytes) => Some(Value::Bytes(text.clone().into_bytes())),
            (Value::Bytes(bytes), RawType::Text) => {
                String::from_utf8(bytes.clone()).ok().map(Value::Text)
            }
            (Value::Integer(number), RawType::Text) => Some(Value::Text(number.to_string())),
            (Value::Integer(number), RawType::Float) => Some(Value::Float(*number as f64)),
            (Value::Float(number), RawType::Text) => Some(Value::Text(number.to_string())),
            (Value::Bool(flag), RawType::Text) => Some(Value::Text(flag.to_string())),
            (Value::Json(json), RawType::Text) => match json {
                serde_json::Value::String(text) => Some(Value::Text(text.clone())),
                other => serde_json::to_string(other).ok().map(Value::Text),
            },
            (Value::Json(json), RawType::Integer) => json.as_i64().map(Value::Integer),
            (Value::Json(json), RawType::Float) => json.as_f64().map(Value::Float),
            (Value::Json(json), RawType::Bool) => json.as_bool().map(Value::Bool),
            (other, RawType::Json) => Some(Value::Json(value_to_json(other))),
            _ => None,
        }
    }
}
