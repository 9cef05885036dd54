// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::codec::{essence, PayloadCodec};
use crate::message::{Envelope, Value};
use crate::types::RawType;

/// Plain-text codec for the `text/*` media types.
#[derive(Debug, Default)]
pub struct TextCodec;

impl PayloadCodec for TextCodec {
    fn supports(&self, content_type: &str) -> bool {
        essence(content_type).starts_with("text/")
    }

    fn decode(&self, envelope: &Envelope, target: &RawType) -> Option<Value> {
        if !matches!(target, RawType::Text) {
            return None;
        }
        match envelope.payload() {
            Value::Text(text) => Some(Value::Text(text.clone())),
            Value::Bytes(bytes) => String::from_utf8(bytes.clone()).ok().map(Value::Text),
            Value::Json(serde_json::Value::String(text)) => Some(Value::Text(text.clone())),
            Value::Integer(number) => Some(Value::Text(number.to_string())),
            Value::Float(number) => Some(Value::Text(number.to_string())),
            Value::Bool(flag) => Some(Value::Text(flag.to_string())),
            _ => None,
        }
    }

    fn encode(&self, payload: &Value, _content_type: &str) -> Option<Value> {
        match payload {
            Value::Text(text) => Some(Value::Text(text.clone())),
            Value::Integer(number) => Some(Value::Text(number.to_string())),
            Value::Float(number) => Some(Value::Text(number.to_string())),
            Value::Bool(flag) => Some(Value::Text(flag.to_string())),
            Value::Json(serde_json::Value::String(text)) => Some(Value::Text(text.clone())),
            _ => None,
        }
    }
}
