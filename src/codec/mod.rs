// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Content-type-keyed payload codecs.
//!
//! The registry is the seam invocation conversion talks to: decode turns
//! an envelope payload into a value of a declared raw type, encode turns
//! a value into a wire payload for a requested content type. Codecs are
//! tried in registration order; the first one that produces something
//! wins, and no match is never an error at this layer.

mod bytes;
mod json;
mod text;

use std::sync::Arc;

use crate::message::{Envelope, Value};
use crate::types::RawType;

pub use bytes::ByteCodec;
pub use json::JsonCodec;
pub use text::TextCodec;

/// One payload codec, keyed by the content types it understands.
pub trait PayloadCodec: Send + Sync {
    /// Whether this codec handles the given content type.
    fn supports(&self, content_type: &str) -> bool;

    /// Decode an envelope payload toward a declared raw type. `None`
    /// means this codec produced nothing; the caller falls back.
    fn decode(&self, envelope: &Envelope, target: &RawType) -> Option<Value>;

    /// Encode a value as the payload for the given content type.
    fn encode(&self, payload: &Value, content_type: &str) -> Option<Value>;
}

/// Ordered collection of codecs behind one decode/encode surface.
#[derive(Clone)]
pub struct CodecRegistry {
    codecs: Vec<Arc<dyn PayloadCodec>>,
}

impl CodecRegistry {
    pub fn new(codecs: Vec<Arc<dyn PayloadCodec>>) -> Self {
        Self { codecs }
    }

    /// JSON, text, and byte codecs, in that order.
    pub fn standard() -> Self {
        Self::new(vec![
            Arc::new(JsonCodec),
            Arc::new(TextCodec),
            Arc::new(ByteCodec),
        ])
    }

    pub fn push(&mut self, codec: Arc<dyn PayloadCodec>) {
        self.codecs.push(codec);
    }

    /// Decode an envelope payload toward a declared raw type. An envelope
    /// with a content-type header only consults codecs claiming that
    /// type; without one, every codec gets a chance.
    pub fn decode(&self, envelope: &Envelope, target: &RawType) -> Option<Value> {
        match target {
            // Nothing to aim for: hand the payload over untouched.
            RawType::Any => return Some(envelope.payload().clone()),
            RawType::Unit => return None,
            _ => {}
        }
        for codec in &self.codecs {
            if let Some(content_type) = envelope.content_type() {
                if !codec.supports(content_type) {
                    continue;
                }
            }
            if let Some(decoded) = codec.decode(envelope, target) {
                return Some(decoded);
            }
        }
        None
    }

    /// Encode a value as the payload for a requested content type.
    pub fn encode(&self, payload: &Value, content_type: &str) -> Option<Value> {
        self.codecs
            .iter()
            .filter(|codec| codec.supports(content_type))
            .find_map(|codec| codec.encode(payload, content_type))
    }
}

impl std::fmt::Debug for CodecRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CodecRegistry")
            .field("codec_count", &self.codecs.len())
            .finish()
    }
}

/// The media type without its parameters: `text/plain; charset=utf-8`
/// becomes `text/plain`.
pub(crate) fn essence(content_type: &str) -> &str {
    content_type
        .split(';')
        .next()
        .unwrap_or(content_type)
        .trim()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::consts::HEADER_CONTENT_TYPE;
    use crate::message::Headers;

    fn envelope_with(content_type: Option<&str>, payload: Value) -> Envelope {
        let mut headers = Headers::new();
        if let Some(content_type) = content_type {
            headers.insert(HEADER_CONTENT_TYPE, content_type);
        }
        Envelope::with_headers(payload, headers)
    }

    #[test]
    fn decode_honors_content_type_header() {
        let registry = CodecRegistry::standard();

        // Declared text/plain never reaches the JSON codec.
        let envelope = envelope_with(Some("text/plain"), Value::Text("42".into()));
        assert_eq!(
            registry.decode(&envelope, &RawType::Text),
            Some(Value::Text("42".into()))
        );
        assert_eq!(registry.decode(&envelope, &RawType::Integer), None);

        // The same payload marked JSON decodes to the declared number.
        let envelope = envelope_with(Some("application/json"), Value::Text("42".into()));
        assert_eq!(
            registry.decode(&envelope, &RawType::Integer),
            Some(Value::Integer(42))
        );
    }

    #[test]
    fn decode_without_content_type_tries_codecs_in_order() {
        let registry = CodecRegistry::standard();
        let envelope = envelope_with(None, Value::Text("hello".into()));
        assert_eq!(
            registry.decode(&envelope, &RawType::Text),
            Some(Value::Text("hello".into()))
        );
    }

    #[test]
    fn decode_to_any_is_identity() {
        let registry = CodecRegistry::standard();
        let envelope = envelope_with(Some("application/json"), Value::Text("{\"a\":1}".into()));
        assert_eq!(
            registry.decode(&envelope, &RawType::Any),
            Some(Value::Text("{\"a\":1}".into()))
        );
    }

    #[test]
    fn encode_unknown_content_type_produces_nothing() {
        let registry = CodecRegistry::standard();
        assert_eq!(
            registry.encode(&Value::Text("x".into()), "application/xml"),
            None
        );
    }

    #[test]
    fn essence_strips_parameters() {
        assert_eq!(essence("text/plain; charset=utf-8"), "text/plain");
        assert_eq!(essence("application/json"), "application/json");
    }
}
