// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Type-directed output conversion and content negotiation.
//!
//! Runs once per invocation, at the outer boundary, against the declared
//! output shape and the content types the lookup asked for. Stream
//! outputs convert element by element as they are consumed.

use std::sync::Arc;

use crate::config::consts::{
    DEFAULT_CONTENT_TYPE, HEADER_CONTENT_TYPE, HEADER_EXPECTED_CONTENT_TYPE,
};
use crate::errors::InvocationError;
use crate::invocation::wrapper::{ConversionServices, ResultEnhancer};
use crate::message::{Envelope, Flow, Headers, Value};
use crate::observability::messages::conversion::ContentTypeNegotiationFailed;
use crate::types::TypeShape;

/// Everything output conversion needs to know about the invocation it
/// runs for. Cloned into lazy stream stages, so it owns its data.
#[derive(Clone)]
pub(crate) struct OutputContext {
    pub definition: String,
    pub declared: TypeShape,
    pub envelope_output: bool,
    pub expected: Vec<String>,
    pub enhancer: Option<ResultEnhancer>,
    pub services: Arc<ConversionServices>,
}

/// Convert a non-null result against the declared output shape.
pub(crate) fn convert_output(ctx: &OutputContext, output: Flow) -> Result<Flow, InvocationError> {
    match output {
        Flow::Stream(stream) => {
            let mut element_ctx = ctx.clone();
            element_ctx.declared = ctx.declared.element().clone();
            let element = element_ctx.declared.clone();
            Ok(Flow::Stream(stream.map_values(move |value| {
                convert_output_value(&element_ctx, value, &element)
            })))
        }
        Flow::Value(value) => {
            convert_output_value(ctx, value, &ctx.declared).map(Flow::Value)
        }
    }
}

fn convert_output_value(
    ctx: &OutputContext,
    value: Value,
    declared: &TypeShape,
) -> Result<Value, InvocationError> {
    let value = match &ctx.enhancer {
        Some(enhancer) => enhancer(value),
        None => value,
    };

    if let TypeShape::Tuple(members) = declared {
        return convert_tuple_output(ctx, value, members);
    }

    match value {
        Value::Envelope(envelope) => Ok(negotiate_envelope(ctx, *envelope)),
        // Collection results under an envelope-shaped output convert
        // element by element; an element encoding to nothing is fatal.
        Value::List(items) if ctx.envelope_output => {
            Ok(Value::List(convert_container(ctx, items)?))
        }
        Value::SortedSet(items) if ctx.envelope_output => {
            Ok(Value::sorted_set(convert_container(ctx, items)?))
        }
        other if !ctx.expected.is_empty() => Ok(encode_fresh(ctx, other)),
        other => Ok(other),
    }
}

/// Resolve the content type for an envelope result: an explicit override
/// header wins over the caller-supplied types; candidates are tried in
/// order and the first codec success wins; no match keeps the envelope
/// unchanged.
fn negotiate_envelope(ctx: &OutputContext, envelope: Envelope) -> Value {
    let candidates: Vec<String> = match envelope.headers().get(HEADER_EXPECTED_CONTENT_TYPE) {
        Some(header) => header
            .split(',')
            .map(|candidate| candidate.trim().to_string())
            .filter(|candidate| !candidate.is_empty())
            .collect(),
        None => ctx.expected.clone(),
    };
    if candidates.is_empty() {
        return Value::envelope(envelope);
    }
    for candidate in &candidates {
        if let Some(encoded) = ctx.services.codecs.encode(envelope.payload(), candidate) {
            let mut headers = envelope.headers().clone();
            headers.insert(HEADER_CONTENT_TYPE, candidate.clone());
            return Value::envelope(Envelope::with_headers(encoded, headers));
        }
    }
    tracing::debug!(
        "{}",
        ContentTypeNegotiationFailed {
            definition: &ctx.definition,
            candidates: &candidates,
        }
    );
    Value::envelope(envelope)
}

/// Encode a raw value into a fresh envelope for the first requested
/// content type. No codec match keeps the value unconverted.
fn encode_fresh(ctx: &OutputContext, value: Value) -> Value {
    match try_encode_fresh(ctx, &value) {
        Some(envelope) => Value::envelope(envelope),
        None => {
            tracing::debug!(
                "{}",
                ContentTypeNegotiationFailed {
                    definition: &ctx.definition,
                    candidates: &ctx.expected,
                }
            );
            value
        }
    }
}

fn try_encode_fresh(ctx: &OutputContext, value: &Value) -> Option<Envelope> {
    let requested = ctx.expected.first()?;
    let encoded = ctx.services.codecs.encode(value, requested)?;
    let mut headers = Headers::new();
    headers.insert(HEADER_CONTENT_TYPE, requested.clone());
    Some(Envelope::with_headers(encoded, headers))
}

fn convert_container(
    ctx: &OutputContext,
    items: Vec<Value>,
) -> Result<Vec<Value>, InvocationError> {
    items
        .into_iter()
        .map(|item| match item {
            Value::Envelope(envelope) => Ok(negotiate_envelope(ctx, *envelope)),
            other if !ctx.expected.is_empty() => match try_encode_fresh(ctx, &other) {
                Some(envelope) => Ok(Value::envelope(envelope)),
                None => Err(InvocationError::ContainerElementConversion {
                    definition: ctx.definition.clone(),
                }),
            },
            other => Ok(other),
        })
        .collect()
}

/// Tuple results convert per slot, one content type per component,
/// defaulting to JSON when the lookup supplied fewer types than slots.
fn convert_tuple_output(
    ctx: &OutputContext,
    value: Value,
    members: &[TypeShape],
) -> Result<Value, InvocationError> {
    let Value::Tuple(values) = value else {
        return Err(InvocationError::TupleOutputRequired {
            definition: ctx.definition.clone(),
        });
    };
    if values.len() != members.len() {
        return Err(InvocationError::TupleArityMismatch {
            definition: ctx.definition.clone(),
            expected: members.len(),
            actual: values.len(),
        });
    }
    let converted = values
        .into_iter()
        .zip(members)
        .enumerate()
        .map(|(index, (value, member))| {
            let content_type = ctx
                .expected
                .get(index)
                .cloned()
                .unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_string());
            let member_ctx = OutputContext {
                definition: ctx.definition.clone(),
                declared: member.clone(),
                envelope_output: member.is_envelope(),
                expected: vec![content_type],
                enhancer: None,
                services: ctx.services.clone(),
            };
            convert_output_value(&member_ctx, value, member)
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Value::Tuple(converted))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Cardinality, RawType};

    fn context(declared: TypeShape, expected: &[&str]) -> OutputContext {
        OutputContext {
            definition: "probe".into(),
            envelope_output: declared.is_envelope(),
            declared,
            expected: expected.iter().map(|s| s.to_string()).collect(),
            enhancer: None,
            services: ConversionServices::standard(),
        }
    }

    #[test]
    fn negotiation_takes_first_supported_candidate() {
        let ctx = context(
            TypeShape::Envelope(RawType::Text),
            &["application/xml", "application/json"],
        );
        let envelope = Envelope::new(Value::Text("hi".into()));
        let converted = convert_output(&ctx, Flow::Value(Value::envelope(envelope)))
            .unwrap()
            .into_value()
            .unwrap();
        let Value::Envelope(converted) = converted else {
            panic!("expected an envelope");
        };
        assert_eq!(converted.content_type(), Some("application/json"));
        assert_eq!(converted.payload(), &Value::Text("\"hi\"".into()));
    }

    #[test]
    fn expected_content_type_header_overrides_lookup_types() {
        let ctx = context(TypeShape::Envelope(RawType::Text), &["text/plain"]);
        let mut headers = Headers::new();
        headers.insert(HEADER_EXPECTED_CONTENT_TYPE, "application/json");
        let envelope = Envelope::with_headers(Value::Text("hi".into()), headers);

        let converted = convert_output(&ctx, Flow::Value(Value::envelope(envelope)))
            .unwrap()
            .into_value()
            .unwrap();
        let Value::Envelope(converted) = converted else {
            panic!("expected an envelope");
        };
        assert_eq!(converted.content_type(), Some("application/json"));
    }

    #[test]
    fn no_codec_match_keeps_envelope_unchanged() {
        let ctx = context(TypeShape::Envelope(RawType::Text), &["application/xml"]);
        let envelope = Envelope::new(Value::Text("hi".into()));
        let converted = convert_output(&ctx, Flow::Value(Value::envelope(envelope.clone())))
            .unwrap()
            .into_value()
            .unwrap();
        assert_eq!(converted, Value::envelope(envelope));
    }

    #[test]
    fn raw_value_with_expected_types_gets_a_fresh_envelope() {
        let ctx = context(TypeShape::Value(RawType::Text), &["application/json"]);
        let converted = convert_output(&ctx, Flow::Value(Value::Text("raw".into())))
            .unwrap()
            .into_value()
            .unwrap();
        let Value::Envelope(converted) = converted else {
            panic!("expected an envelope");
        };
        assert_eq!(converted.content_type(), Some("application/json"));
        assert_eq!(converted.payload(), &Value::Text("\"raw\"".into()));
    }

    #[test]
    fn raw_value_without_expected_types_passes_through() {
        let ctx = context(TypeShape::Value(RawType::Text), &[]);
        let converted = convert_output(&ctx, Flow::Value(Value::Text("raw".into())))
            .unwrap()
            .into_value()
            .unwrap();
        assert_eq!(converted, Value::Text("raw".into()));
    }

    #[test]
    fn container_under_envelope_output_converts_each_element() {
        let ctx = context(TypeShape::Envelope(RawType::Text), &["application/json"]);
        let converted = convert_output(
            &ctx,
            Flow::Value(Value::List(vec![
                Value::Text("a".into()),
                Value::Text("b".into()),
            ])),
        )
        .unwrap()
        .into_value()
        .unwrap();
        let Value::List(items) = converted else {
            panic!("expected a list");
        };
        assert_eq!(items.len(), 2);
        for item in items {
            let Value::Envelope(envelope) = item else {
                panic!("expected every element enveloped");
            };
            assert_eq!(envelope.content_type(), Some("application/json"));
        }
    }

    #[test]
    fn container_element_failing_to_encode_is_fatal() {
        let ctx = context(TypeShape::Envelope(RawType::Json), &["application/xml"]);
        let result = convert_output(
            &ctx,
            Flow::Value(Value::List(vec![Value::Text("a".into())])),
        );
        assert!(matches!(
            result,
            Err(InvocationError::ContainerElementConversion { .. })
        ));
    }

    #[test]
    fn sorted_set_nature_survives_conversion() {
        let ctx = context(TypeShape::Envelope(RawType::Text), &[]);
        let converted = convert_output(
            &ctx,
            Flow::Value(Value::SortedSet(vec![
                Value::Text("b".into()),
                Value::Text("a".into()),
            ])),
        )
        .unwrap()
        .into_value()
        .unwrap();
        assert!(matches!(converted, Value::SortedSet(_)));
    }

    #[tokio::test]
    async fn stream_output_converts_lazily_per_element() {
        let ctx = context(
            TypeShape::multi_stream(TypeShape::Value(RawType::Text)),
            &["application/json"],
        );
        let stream = crate::message::ValueStream::from_values(
            Cardinality::Multi,
            vec![Value::Text("x".into())],
        );
        let converted = convert_output(&ctx, Flow::Stream(stream)).unwrap();
        let Flow::Stream(stream) = converted else {
            panic!("expected a stream");
        };
        let values = stream.try_collect().await.unwrap();
        assert_eq!(values.len(), 1);
        assert!(matches!(values[0], Value::Envelope(_)));
    }

    #[test]
    fn tuple_output_uses_one_content_type_per_slot() {
        let ctx = context(
            TypeShape::Tuple(vec![
                TypeShape::Value(RawType::Text),
                TypeShape::Value(RawType::Integer),
            ]),
            &["text/plain"],
        );
        let converted = convert_output(
            &ctx,
            Flow::Value(Value::Tuple(vec![
                Value::Text("left".into()),
                Value::Integer(2),
            ])),
        )
        .unwrap()
        .into_value()
        .unwrap();
        let Value::Tuple(slots) = converted else {
            panic!("expected a tuple");
        };
        let Value::Envelope(left) = &slots[0] else {
            panic!("expected the first slot enveloped");
        };
        assert_eq!(left.content_type(), Some("text/plain"));
        let Value::Envelope(right) = &slots[1] else {
            panic!("expected the second slot enveloped");
        };
        // Slots past the supplied types default to JSON.
        assert_eq!(right.content_type(), Some("application/json"));
    }

    #[test]
    fn enhancer_runs_before_conversion() {
        let mut ctx = context(TypeShape::Value(RawType::Text), &[]);
        ctx.enhancer = Some(Arc::new(|value| match value {
            Value::Text(text) => Value::Text(format!("enhanced:{text}")),
            other => other,
        }));
        let converted = convert_output(&ctx, Flow::Value(Value::Text("x".into())))
            .unwrap()
            .into_value()
            .unwrap();
        assert_eq!(converted, Value::Text("enhanced:x".into()));
    }
}
