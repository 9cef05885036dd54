// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::codec::{essence, PayloadCodec};
use crate::convert::json::{shape_json, value_to_json};
use crate::message::{Envelope, Value};
use crate::types::RawType;

/// JSON codec: parses textual payloads into structured JSON on decode and
/// serializes values to JSON text on encode.
#[derive(Debug, Default)]
pub struct JsonCodec;

impl PayloadCodec for JsonCodec {
    fn supports(&self, content_type: &str) -> bool {
        let essence = essence(content_type);
        essence == "application/json" || essence.ends_with("+json")
    }

    fn decode(&self, envelope: &Envelope, target: &RawType) -> Option<Value> {
        let json = match envelope.payload() {
            Value::Text(text) => serde_json::from_str(text).ok()?,
            Value::Bytes(bytes) => serde_json::from_slice(bytes).ok()?,
            Value::Json(json) => json.clone(),
            scalar @ (Value::Bool(_) | Value::Integer(_) | Value::Float(_)) => {
                value_to_json(scalar)
            }
            _ => return None,
        };
        shape_json(json, target)
    }

    fn encode(&self, payload: &Value, _content_type: &str) -> Option<Value> {
        serde_json::to_string(&value_to_json(payload))
            .ok()
            .map(Value::Text)
    }
}
