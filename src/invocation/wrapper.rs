// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! The canonical runtime representation of one callable (or one composed
//! pipeline): classification, dispatch, and the calls into the
//! conversion pipeline at both boundaries.

use std::fmt;
use std::sync::Arc;

use crate::codec::CodecRegistry;
use crate::config::consts::HEADER_PROPAGATE;
use crate::convert::{Coercer, ScalarCoercer};
use crate::errors::InvocationError;
use crate::invocation::input::{convert_input, InputContext};
use crate::invocation::output::{convert_output, OutputContext};
use crate::message::{Envelope, Flow, OriginalValueHolder, Value, ValueStream};
use crate::traits::{Consumer, FunctionTarget, Transformer};
use crate::types::{FunctionKind, FunctionShape, RawType, TypeShape};

/// Hook applied to a non-stream result before output conversion.
pub type ResultEnhancer = Arc<dyn Fn(Value) -> Value + Send + Sync>;

/// The conversion collaborators an invocation wrapper calls into.
pub struct ConversionServices {
    pub codecs: CodecRegistry,
    pub coercer: Arc<dyn Coercer>,
}

impl ConversionServices {
    /// The standard codecs plus the scalar coercer.
    pub fn standard() -> Arc<Self> {
        Arc::new(Self {
            codecs: CodecRegistry::standard(),
            coercer: Arc::new(ScalarCoercer),
        })
    }
}

impl fmt::Debug for ConversionServices {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConversionServices")
            .field("codecs", &self.codecs)
            .finish_non_exhaustive()
    }
}

pub(crate) struct WrapperInner {
    pub(crate) definition: String,
    pub(crate) target: FunctionTarget,
    pub(crate) input_type: Option<TypeShape>,
    pub(crate) output_type: Option<TypeShape>,
    pub(crate) kind: FunctionKind,
    pub(crate) composed: bool,
    pub(crate) envelope_input: bool,
    pub(crate) services: Arc<ConversionServices>,
}

/// One looked-up callable, identified by its definition string.
///
/// Cloning is cheap: the target, shapes, and conversion services are
/// shared. The expected output content types and the result enhancer are
/// handle-local, so every lookup hands out its own copy and concurrent
/// lookups of the same cached definition can never trample each other's
/// negotiated content types.
#[derive(Clone)]
pub struct FunctionInvocationWrapper {
    inner: Arc<WrapperInner>,
    expected_content_types: Vec<String>,
    enhancer: Option<ResultEnhancer>,
}

impl FunctionInvocationWrapper {
    pub(crate) fn new(
        definition: impl Into<String>,
        target: FunctionTarget,
        shape: FunctionShape,
        services: Arc<ConversionServices>,
    ) -> Self {
        Self::build(definition, target, shape, services, false)
    }

    pub(crate) fn composed_instance(
        definition: impl Into<String>,
        target: FunctionTarget,
        shape: FunctionShape,
        services: Arc<ConversionServices>,
    ) -> Self {
        Self::build(definition, target, shape, services, true)
    }

    fn build(
        definition: impl Into<String>,
        target: FunctionTarget,
        shape: FunctionShape,
        services: Arc<ConversionServices>,
        composed: bool,
    ) -> Self {
        let FunctionShape { input, output } = shape;
        let kind = FunctionKind::classify(input.as_ref(), output.as_ref());
        let envelope_input = input.as_ref().map(TypeShape::is_envelope).unwrap_or(false);
        Self {
            inner: Arc::new(WrapperInner {
                definition: definition.into(),
                target,
                input_type: input,
                output_type: output,
                kind,
                composed,
                envelope_input,
                services,
            }),
            expected_content_types: Vec::new(),
            enhancer: None,
        }
    }

    /// The definition string this wrapper resolves.
    pub fn definition(&self) -> &str {
        &self.inner.definition
    }

    pub fn kind(&self) -> FunctionKind {
        self.inner.kind
    }

    pub fn is_producer(&self) -> bool {
        self.inner.kind == FunctionKind::Producer
    }

    pub fn is_consumer(&self) -> bool {
        self.inner.kind == FunctionKind::Consumer
    }

    pub fn is_transformer(&self) -> bool {
        self.inner.kind == FunctionKind::Transformer
    }

    pub fn composed(&self) -> bool {
        self.inner.composed
    }

    pub fn is_router(&self) -> bool {
        self.inner.target.is_router()
    }

    pub fn input_type(&self) -> Option<&TypeShape> {
        self.inner.input_type.as_ref()
    }

    pub fn output_type(&self) -> Option<&TypeShape> {
        self.inner.output_type.as_ref()
    }

    pub fn is_input_stream(&self) -> bool {
        self.input_type().map(TypeShape::is_stream).unwrap_or(false)
    }

    pub fn is_output_stream(&self) -> bool {
        self.output_type().map(TypeShape::is_stream).unwrap_or(false)
    }

    /// True for an envelope-shaped input; the router always counts since
    /// it inspects headers to make its dispatch decision.
    pub fn is_input_envelope(&self) -> bool {
        self.inner.envelope_input || self.is_router()
    }

    pub fn is_output_envelope(&self) -> bool {
        self.output_type()
            .map(TypeShape::is_envelope)
            .unwrap_or(false)
    }

    /// The raw type the input shape bottoms out in; unresolved
    /// placeholders resolve to [`RawType::Any`].
    pub fn raw_input_type(&self) -> Option<RawType> {
        self.input_type().map(TypeShape::raw)
    }

    pub fn raw_output_type(&self) -> Option<RawType> {
        self.output_type().map(TypeShape::raw)
    }

    /// The expected output content types attached by the lookup that
    /// produced this handle.
    pub fn expected_content_types(&self) -> &[String] {
        &self.expected_content_types
    }

    pub fn with_expected_content_types<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.expected_content_types = types.into_iter().map(Into::into).collect();
        self
    }

    /// Install a hook that sees every non-stream result (and every stream
    /// element) before output conversion. Handle-local.
    pub fn set_result_enhancer(&mut self, enhancer: ResultEnhancer) {
        self.enhancer = Some(enhancer);
    }

    pub(crate) fn services(&self) -> &Arc<ConversionServices> {
        &self.inner.services
    }

    /// A copy of this handle without any per-lookup state.
    pub(crate) fn clone_base(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            expected_content_types: Vec::new(),
            enhancer: None,
        }
    }

    /// Invoke this function. All call shapes route through here: a
    /// producer ignores its input (pass `None`), a consumer yields no
    /// result, a transformer does both.
    pub async fn invoke(&self, input: Option<Flow>) -> Result<Option<Flow>, InvocationError> {
        let result = self.dispatch(input).await?;
        let Some(result) = result else {
            return Ok(None);
        };
        let Some(output_type) = self.inner.output_type.clone() else {
            return Ok(Some(result));
        };
        let ctx = OutputContext {
            definition: self.inner.definition.clone(),
            declared: output_type,
            envelope_output: self.is_output_envelope(),
            expected: self.expected_content_types.clone(),
            enhancer: self.enhancer.clone(),
            services: self.inner.services.clone(),
        };
        convert_output(&ctx, result).map(Some)
    }

    /// Input lifting, input conversion, and dispatch, without the output
    /// conversion boundary. Composed pipelines chain this stage so that
    /// output conversion runs exactly once, at the outer boundary.
    pub(crate) async fn dispatch(
        &self,
        input: Option<Flow>,
    ) -> Result<Option<Flow>, InvocationError> {
        let input = self.lift_input(input);
        let converted = convert_input(&self.input_context(), input)?;

        match (&self.inner.target, self.inner.kind) {
            // Composed pipelines and the router manage their own
            // conversion and branching; call them on the input as-is.
            (FunctionTarget::Composed(chain), _) => chain(converted).await,
            (FunctionTarget::Router(router), _) => Ok(router.transform(converted).await),
            (FunctionTarget::Producer(producer), FunctionKind::Producer) => {
                Ok(producer.produce().await)
            }
            (FunctionTarget::Consumer(consumer), FunctionKind::Consumer) => {
                Ok(self.dispatch_consumer(consumer, converted).await)
            }
            (FunctionTarget::Transformer(transformer), FunctionKind::Transformer) => {
                self.dispatch_transformer(transformer, converted).await
            }
            _ => Err(InvocationError::TargetShapeMismatch {
                definition: self.inner.definition.clone(),
            }),
        }
    }

    /// Lift a non-stream input into the declared stream cardinality:
    /// nothing becomes an empty stream, a value becomes a singleton.
    fn lift_input(&self, input: Option<Flow>) -> Option<Flow> {
        let Some(TypeShape::Stream(cardinality, _)) = &self.inner.input_type else {
            return input;
        };
        match input {
            Some(Flow::Stream(_)) => input,
            Some(Flow::Value(value)) => Some(Flow::Stream(ValueStream::once(*cardinality, value))),
            None => Some(Flow::Stream(ValueStream::empty(*cardinality))),
        }
    }

    fn input_context(&self) -> InputContext {
        InputContext {
            definition: self.inner.definition.clone(),
            kind: self.inner.kind,
            composed: self.inner.composed,
            router: self.is_router(),
            envelope_input: self.inner.envelope_input,
            input_is_stream: self.is_input_stream(),
            declared: self.inner.input_type.clone(),
            services: self.inner.services.clone(),
        }
    }

    async fn dispatch_consumer(
        &self,
        consumer: &Arc<dyn Consumer>,
        converted: Option<Flow>,
    ) -> Option<Flow> {
        match converted {
            // Declared or unexpected stream: feed each element through
            // the consumer as the stream is pulled, completing with an
            // empty stream of the same cardinality.
            Some(Flow::Stream(stream)) => {
                let consumer = consumer.clone();
                let drained = stream.drain_through(move |value| {
                    let consumer = consumer.clone();
                    async move { consumer.consume(Some(Flow::Value(value))).await }
                });
                Some(Flow::Stream(drained))
            }
            other => {
                consumer.consume(other).await;
                None
            }
        }
    }

    async fn dispatch_transformer(
        &self,
        transformer: &Arc<dyn Transformer>,
        converted: Option<Flow>,
    ) -> Result<Option<Flow>, InvocationError> {
        match converted {
            // A stream arrived for a plain-value function: apply the
            // function per element, lazily, as the stream is consumed.
            Some(Flow::Stream(stream)) if !self.is_input_stream() => {
                let transformer = transformer.clone();
                let definition = self.inner.definition.clone();
                let mapped = stream.filter_map_values(move |value| {
                    let transformer = transformer.clone();
                    let definition = definition.clone();
                    async move {
                        match transform_value(&transformer, Some(Flow::Value(value))).await {
                            Some(Flow::Value(result)) => Some(Ok(result)),
                            Some(Flow::Stream(_)) => {
                                Some(Err(InvocationError::NestedStream { definition }))
                            }
                            None => None,
                        }
                    }
                });
                Ok(Some(Flow::Stream(mapped)))
            }
            other => Ok(transform_value(transformer, other).await),
        }
    }
}

impl fmt::Debug for FunctionInvocationWrapper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunctionInvocationWrapper")
            .field("definition", &self.inner.definition)
            .field("kind", &self.inner.kind)
            .field("composed", &self.inner.composed)
            .field("input_type", &self.inner.input_type)
            .field("output_type", &self.inner.output_type)
            .finish_non_exhaustive()
    }
}

impl fmt::Display for FunctionInvocationWrapper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.inner.composed {
            write!(f, "{}", self.inner.definition)
        } else {
            write!(
                f,
                "{}<{:?}, {:?}>",
                self.inner.definition, self.inner.input_type, self.inner.output_type
            )
        }
    }
}

/// Invoke a transformer on one converted input: unwrap a holder if input
/// conversion produced one, call the target on the bare value, and enrich
/// the result from the originating envelope.
async fn transform_value(
    transformer: &Arc<dyn Transformer>,
    input: Option<Flow>,
) -> Option<Flow> {
    let (bare, origin) = match input {
        Some(Flow::Value(Value::Held(holder))) => {
            let OriginalValueHolder { value, origin } = *holder;
            (Some(Flow::Value(value)), Some(origin))
        }
        other => (other, None),
    };
    let result = transformer.transform(bare).await;
    let Some(origin) = origin else {
        return result;
    };
    match result {
        Some(Flow::Value(value)) => Some(Flow::Value(enrich_result(value, &origin))),
        other => other,
    }
}

/// When the triggering envelope carries the propagation marker, copy its
/// headers onto the result: an envelope result keeps its own headers for
/// non-overlapping keys with the trigger winning collisions, a plain
/// result is wrapped in a fresh envelope carrying the trigger's headers.
fn enrich_result(result: Value, origin: &Envelope) -> Value {
    if !origin.headers().contains_key(HEADER_PROPAGATE) {
        return result;
    }
    match result {
        Value::Envelope(mut envelope) => {
            envelope.headers_mut().merge_from(origin.headers());
            Value::Envelope(envelope)
        }
        other => Value::Envelope(Box::new(Envelope::with_headers(
            other,
            origin.headers().clone(),
        ))),
    }
}
