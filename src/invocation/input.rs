// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Type-directed input conversion.
//!
//! Runs between input lifting and dispatch. Conversion is synchronous;
//! for stream inputs it is mapped lazily over the elements and executes
//! as the stream is consumed.

use std::sync::Arc;

use crate::convert::json;
use crate::errors::InvocationError;
use crate::invocation::wrapper::ConversionServices;
use crate::message::{Envelope, Flow, OriginalValueHolder, Value};
use crate::observability::messages::conversion::{
    InputDiscardedForUnitType, JsonShapeKeptStructured, PayloadDecodeFallback,
};
use crate::types::{FunctionKind, RawType, TypeShape};

/// Everything input conversion needs to know about the wrapper it runs
/// for. Cloned into lazy stream stages, so it owns its data.
#[derive(Clone)]
pub(crate) struct InputContext {
    pub definition: String,
    pub kind: FunctionKind,
    pub composed: bool,
    pub router: bool,
    pub envelope_input: bool,
    pub input_is_stream: bool,
    pub declared: Option<TypeShape>,
    pub services: Arc<ConversionServices>,
}

impl InputContext {
    /// Header propagation applies to plain-value inputs of a genuine,
    /// non-composed transformer.
    fn propagates_headers(&self) -> bool {
        !self.input_is_stream
            && !self.composed
            && !self.router
            && self.kind == FunctionKind::Transformer
    }
}

/// Convert an input against the declared input shape.
pub(crate) fn convert_input(
    ctx: &InputContext,
    input: Option<Flow>,
) -> Result<Option<Flow>, InvocationError> {
    let Some(declared) = ctx.declared.clone() else {
        return Ok(input);
    };

    // Multi-argument functions take a tuple and convert per slot.
    if let TypeShape::Tuple(members) = &declared {
        return convert_tuple_input(ctx, members, input).map(|value| value.map(Flow::Value));
    }

    // A no-value input type: whatever the caller sent is irrelevant.
    if declared.raw().is_unit()
        && !matches!(
            input,
            Some(Flow::Stream(_)) | Some(Flow::Value(Value::Envelope(_)))
        )
    {
        if input.is_some() {
            tracing::info!(
                "{}",
                InputDiscardedForUnitType {
                    definition: &ctx.definition
                }
            );
        }
        return Ok(None);
    }

    // Null inputs, the router, and composed pipelines pass through: the
    // stages of a composed pipeline convert for themselves.
    if input.is_none() || ctx.router || ctx.composed {
        return Ok(input);
    }

    match input {
        Some(Flow::Stream(stream)) => {
            let element = declared.element().clone();
            let ctx = ctx.clone();
            Ok(Some(Flow::Stream(stream.map_values(move |value| {
                convert_input_value(&ctx, value, &element)
            }))))
        }
        Some(Flow::Value(value)) => convert_input_value(ctx, value, &declared)
            .map(|converted| Some(Flow::Value(converted))),
        None => Ok(None),
    }
}

/// Convert one value against one declared shape. Shared by the plain
/// path, the per-element stream path, and tuple members.
fn convert_input_value(
    ctx: &InputContext,
    value: Value,
    declared: &TypeShape,
) -> Result<Value, InvocationError> {
    let converted = match value {
        Value::Envelope(envelope) => convert_input_envelope(ctx, *envelope, declared),
        other => convert_plain_input(ctx, other, declared)?,
    };
    // A bare value bound for an envelope-shaped parameter gets a fresh,
    // headerless envelope.
    if ctx.envelope_input && !matches!(converted, Value::Envelope(_) | Value::Held(_)) {
        return Ok(Value::envelope(Envelope::new(converted)));
    }
    Ok(converted)
}

fn convert_input_envelope(ctx: &InputContext, envelope: Envelope, declared: &TypeShape) -> Value {
    let target = declared.raw();
    match ctx.services.codecs.decode(&envelope, &target) {
        // An envelope-shaped parameter keeps its envelope: fresh payload,
        // original headers.
        Some(payload) if ctx.envelope_input => Value::envelope(Envelope::with_headers(
            payload,
            envelope.headers().clone(),
        )),
        Some(payload) if ctx.propagates_headers() => Value::Held(Box::new(OriginalValueHolder {
            value: payload,
            origin: envelope,
        })),
        Some(payload) => payload,
        // Decoding to nothing is not an error: the original envelope
        // goes in as-is.
        None => {
            tracing::info!(
                "{}",
                PayloadDecodeFallback {
                    definition: &ctx.definition,
                    content_type: envelope.content_type().unwrap_or("unset"),
                }
            );
            Value::envelope(envelope)
        }
    }
}

fn convert_plain_input(
    ctx: &InputContext,
    value: Value,
    declared: &TypeShape,
) -> Result<Value, InvocationError> {
    let raw = declared.raw();

    if json::looks_like_json(&value) && !declared.is_envelope() && !raw.is_any() {
        let decoded =
            json::decode_literal(&value, &raw).map_err(|source| InvocationError::JsonDecode {
                definition: ctx.definition.clone(),
                reason: source.to_string(),
            })?;
        if matches!(decoded, Value::Json(_)) && !matches!(raw, RawType::Json | RawType::Named(_)) {
            tracing::debug!(
                "{}",
                JsonShapeKeptStructured {
                    definition: &ctx.definition
                }
            );
        }
        return Ok(decoded);
    }

    let from = RawType::of(&value);
    if from != raw && ctx.services.coercer.can_convert(&from, &raw) {
        if let Some(coerced) = ctx.services.coercer.convert(&value, &raw) {
            return Ok(coerced);
        }
    }
    Ok(value)
}

fn convert_tuple_input(
    ctx: &InputContext,
    members: &[TypeShape],
    input: Option<Flow>,
) -> Result<Option<Value>, InvocationError> {
    let Some(Flow::Value(Value::Tuple(values))) = input else {
        return Err(InvocationError::TupleInputRequired {
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
        .map(|(value, member)| convert_input_value(ctx, value, member))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Some(Value::Tuple(converted)))
}
