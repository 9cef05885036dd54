// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::codec::{essence, PayloadCodec};
use crate::message::{Envelope, Value};
use crate::types::RawType;

/// Pass-through codec for raw binary payloads.
#[derive(Debug, Default)]
pub struct ByteCodec;

impl PayloadCodec for ByteCodec {
    fn supports(&self, content_type: &str) -> bool {
        essence(content_type) == "application/octet-stream"
    }

    fn decode(&self, envelope: &Envelope, target: &RawType) -> Option<Value> {
        if !matches!(target, RawType::Bytes) {
            return None;
        }
        match envelope.payload() {
            Value::Bytes(bytes) => Some(Value::Bytes(bytes.clone())),
            Value::Text(text) => Some(Value::Bytes(text.clone().into_bytes())),
            _ => None,
        }
    }

    fn encode(&self, payload: &Value, _content_type: &str) -> Option<Value> {
        match payload {
            Value::Bytes(bytes) => Some(Value::Bytes(bytes.clone())),
            Value::Text(text) => Some(Value::Bytes(text.clone().into_bytes())),
            _ => None,
        }
    }
}
