// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Type descriptor model for registered functions.
//!
//! Every registered function carries a [`FunctionShape`] describing its
//! input and output. Shapes are tagged variants computed once, at
//! registration or composition time; nothing in the runtime re-derives a
//! shape by inspecting payloads. Classification of a function as producer,
//! consumer, or transformer is a pure function of the two shape options.

use std::fmt;

use crate::message::Value;

/// How many items a stream is allowed to emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cardinality {
    /// At most one item, then completion.
    Single,
    /// An ordered sequence of items.
    Multi,
}

/// The concrete payload type a shape bottoms out in.
///
/// `Any` stands in for an unresolved generic placeholder; `Unit` marks a
/// parameter whose value is irrelevant (the "no value" type).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RawType {
    Any,
    Unit,
    Text,
    Bytes,
    Bool,
    Integer,
    Float,
    Json,
    /// A nominal structured type, decoded and carried as JSON.
    Named(String),
}

impl RawType {
    /// The raw type a runtime value presents as.
    pub fn of(value: &Value) -> RawType {
        match value {
            Value::Text(_) => RawType::Text,
            Value::Bytes(_) => RawType::Bytes,
            Value::Bool(_) => RawType::Bool,
            Value::Integer(_) => RawType::Integer,
            Value::Float(_) => RawType::Float,
            Value::Json(_) => RawType::Json,
            // Aggregates and carriers have no scalar raw type to coerce from.
            Value::Tuple(_)
            | Value::List(_)
            | Value::SortedSet(_)
            | Value::Envelope(_)
            | Value::Held(_) => RawType::Any,
        }
    }

    pub fn is_any(&self) -> bool {
        matches!(self, RawType::Any)
    }

    pub fn is_unit(&self) -> bool {
        matches!(self, RawType::Unit)
    }
}

/// The declared shape of one side of a function.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeShape {
    /// The "no value" shape; a caller-supplied payload is discarded.
    Unit,
    /// A plain value of the given raw type.
    Value(RawType),
    /// An envelope whose payload has the given raw type.
    Envelope(RawType),
    /// A stream of the given element shape.
    Stream(Cardinality, Box<TypeShape>),
    /// A fixed-arity aggregate of heterogeneous member shapes. Always
    /// arity >= 2; a single argument is just its own shape.
    Tuple(Vec<TypeShape>),
}

impl TypeShape {
    pub fn single_stream(element: TypeShape) -> TypeShape {
        TypeShape::Stream(Cardinality::Single, Box::new(element))
    }

    pub fn multi_stream(element: TypeShape) -> TypeShape {
        TypeShape::Stream(Cardinality::Multi, Box::new(element))
    }

    pub fn is_stream(&self) -> bool {
        matches!(self, TypeShape::Stream(_, _))
    }

    /// True for an envelope shape, directly or as a stream element.
    pub fn is_envelope(&self) -> bool {
        match self {
            TypeShape::Envelope(_) => true,
            TypeShape::Stream(_, element) => element.is_envelope(),
            _ => false,
        }
    }

    /// True for a multi-argument (arity >= 2) tuple shape.
    pub fn is_tuple(&self) -> bool {
        matches!(self, TypeShape::Tuple(_))
    }

    pub fn cardinality(&self) -> Option<Cardinality> {
        match self {
            TypeShape::Stream(cardinality, _) => Some(*cardinality),
            _ => None,
        }
    }

    /// The element shape of a stream, or the shape itself otherwise.
    pub fn element(&self) -> &TypeShape {
        match self {
            TypeShape::Stream(_, element) => element,
            other => other,
        }
    }

    /// Resolve the shape to the raw type its payload bottoms out in.
    /// Unresolved placeholders and aggregates resolve to [`RawType::Any`].
    pub fn raw(&self) -> RawType {
        match self {
            TypeShape::Unit => RawType::Unit,
            TypeShape::Value(raw) | TypeShape::Envelope(raw) => raw.clone(),
            TypeShape::Stream(_, element) => element.raw(),
            TypeShape::Tuple(_) => RawType::Any,
        }
    }
}

/// Input and output shapes of a registered function. An absent input makes
/// the function a producer; an absent output makes it a consumer.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FunctionShape {
    pub input: Option<TypeShape>,
    pub output: Option<TypeShape>,
}

impl FunctionShape {
    pub fn producer(output: TypeShape) -> Self {
        Self {
            input: None,
            output: Some(output),
        }
    }

    pub fn consumer(input: TypeShape) -> Self {
        Self {
            input: Some(input),
            output: None,
        }
    }

    pub fn transformer(input: TypeShape, output: TypeShape) -> Self {
        Self {
            input: Some(input),
            output: Some(output),
        }
    }

    pub fn kind(&self) -> FunctionKind {
        FunctionKind::classify(self.input.as_ref(), self.output.as_ref())
    }
}

/// Classification of a callable, fixed at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FunctionKind {
    Producer,
    Consumer,
    Transformer,
}

impl FunctionKind {
    /// Classification is a pure function of the declared shapes: no input
    /// means producer, no output means consumer, both means transformer.
    pub fn classify(input: Option<&TypeShape>, output: Option<&TypeShape>) -> FunctionKind {
        match (input, output) {
            (None, _) => FunctionKind::Producer,
            (_, None) => FunctionKind::Consumer,
            _ => FunctionKind::Transformer,
        }
    }
}

impl fmt::Display for FunctionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FunctionKind::Producer => write!(f, "producer"),
            FunctionKind::Consumer => write!(f, "consumer"),
            FunctionKind::Transformer => write!(f, "transformer"),
        }
    }
}
