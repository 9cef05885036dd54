// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Runtime value model: the dynamic payloads functions exchange, and the
//! lazy streams that carry them.

use std::fmt;

use futures::future::{self, Either, FutureExt};
use futures::stream::{self, BoxStream, Stream, StreamExt, TryStreamExt};
use std::future::Future;

use crate::errors::InvocationError;
use crate::message::Envelope;
use crate::types::Cardinality;

/// A dynamically typed payload.
///
/// `Tuple` carries the arguments of a multi-argument function with
/// positional access. `List` and `SortedSet` distinguish ordered-sequence
/// from sorted-set collection results so output conversion can preserve
/// the container nature. `Held` is produced internally by input
/// conversion and never reaches a target callable.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Text(String),
    Bytes(Vec<u8>),
    Bool(bool),
    Integer(i64),
    Float(f64),
    Json(serde_json::Value),
    Tuple(Vec<Value>),
    List(Vec<Value>),
    SortedSet(Vec<Value>),
    Envelope(Box<Envelope>),
    Held(Box<OriginalValueHolder>),
}

impl Value {
    /// Build a sorted-set value: canonical order, duplicates removed.
    pub fn sorted_set(mut items: Vec<Value>) -> Value {
        items.sort_by_key(Value::canonical_key);
        items.dedup_by_key(|item| item.canonical_key());
        Value::SortedSet(items)
    }

    /// A stable ordering key; only the relative order matters.
    pub(crate) fn canonical_key(&self) -> String {
        format!("{self:?}")
    }

    pub fn envelope(envelope: Envelope) -> Value {
        Value::Envelope(Box::new(envelope))
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_envelope(&self) -> Option<&Envelope> {
        match self {
            Value::Envelope(envelope) => Some(envelope),
            _ => None,
        }
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Integer(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        Value::Json(value)
    }
}

impl From<Vec<u8>> for Value {
    fn from(value: Vec<u8>) -> Self {
        Value::Bytes(value)
    }
}

impl From<Envelope> for Value {
    fn from(value: Envelope) -> Self {
        Value::envelope(value)
    }
}

/// Pairs a decoded payload with the envelope it was decoded from, so that
/// header propagation intent survives the call boundary without handing
/// the envelope itself to the target callable.
#[derive(Debug, Clone, PartialEq)]
pub struct OriginalValueHolder {
    pub value: Value,
    pub origin: Envelope,
}

/// A lazy stream of values with a declared cardinality. Element
/// conversion failures travel as `Err` items; they surface when the
/// stream is consumed, never as synchronous returns.
pub struct ValueStream {
    cardinality: Cardinality,
    inner: BoxStream<'static, Result<Value, InvocationError>>,
}

impl ValueStream {
    pub fn new(
        cardinality: Cardinality,
        inner: impl Stream<Item = Result<Value, InvocationError>> + Send + 'static,
    ) -> Self {
        Self {
            cardinality,
            inner: inner.boxed(),
        }
    }

    pub fn empty(cardinality: Cardinality) -> Self {
        Self::new(cardinality, stream::empty())
    }

    pub fn once(cardinality: Cardinality, value: Value) -> Self {
        Self::new(cardinality, stream::once(future::ready(Ok(value))))
    }

    pub fn from_values(cardinality: Cardinality, values: Vec<Value>) -> Self {
        Self::new(cardinality, stream::iter(values.into_iter().map(Ok)))
    }

    pub fn cardinality(&self) -> Cardinality {
        self.cardinality
    }

    pub fn into_inner(self) -> BoxStream<'static, Result<Value, InvocationError>> {
        self.inner
    }

    /// Lazily convert each value; errors already in the stream pass
    /// through, and conversion failures become error items.
    pub fn map_values<F>(self, mut convert: F) -> Self
    where
        F: FnMut(Value) -> Result<Value, InvocationError> + Send + 'static,
    {
        let cardinality = self.cardinality;
        Self::new(
            cardinality,
            self.inner.map(move |item| item.and_then(&mut convert)),
        )
    }

    /// Lazily apply an async stage to each value. The stage may drop an
    /// element (`None`) or replace it with a value or an error item.
    pub(crate) fn filter_map_values<F, Fut>(self, mut apply: F) -> Self
    where
        F: FnMut(Value) -> Fut + Send + 'static,
        Fut: Future<Output = Option<Result<Value, InvocationError>>> + Send + 'static,
    {
        let cardinality = self.cardinality;
        Self::new(
            cardinality,
            self.inner.filter_map(move |item| match item {
                Ok(value) => Either::Left(apply(value)),
                Err(err) => Either::Right(future::ready(Some(Err(err)))),
            }),
        )
    }

    /// Feed each value through `consume` as the stream is pulled,
    /// yielding nothing but the completion (and any error items).
    pub(crate) fn drain_through<F, Fut>(self, consume: F) -> Self
    where
        F: Fn(Value) -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let cardinality = self.cardinality;
        Self::new(
            cardinality,
            self.inner.filter_map(move |item| match item {
                Ok(value) => Either::Left(consume(value).map(|_| None)),
                Err(err) => Either::Right(future::ready(Some(Err(err)))),
            }),
        )
    }

    /// Drive the stream to completion, collecting every value. Mostly a
    /// test and demo convenience; real callers keep the stream lazy.
    pub async fn try_collect(self) -> Result<Vec<Value>, InvocationError> {
        self.inner.try_collect().await
    }
}

impl fmt::Debug for ValueStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValueStream")
            .field("cardinality", &self.cardinality)
            .finish_non_exhaustive()
    }
}

/// What an invocation accepts and returns: a plain value or a lazy stream.
#[derive(Debug)]
pub enum Flow {
    Value(Value),
    Stream(ValueStream),
}

impl Flow {
    pub fn is_stream(&self) -> bool {
        matches!(self, Flow::Stream(_))
    }

    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Flow::Value(value) => Some(value),
            Flow::Stream(_) => None,
        }
    }

    pub fn into_value(self) -> Option<Value> {
        match self {
            Flow::Value(value) => Some(value),
            Flow::Stream(_) => None,
        }
    }

    /// Flatten to the carried values, consuming a stream if present.
    pub async fn into_values(self) -> Result<Vec<Value>, InvocationError> {
        match self {
            Flow::Value(value) => Ok(vec![value]),
            Flow::Stream(stream) => stream.try_collect().await,
        }
    }
}

impl From<Value> for Flow {
    fn from(value: Value) -> Self {
        Flow::Value(value)
    }
}

impl From<ValueStream> for Flow {
    fn from(stream: ValueStream) -> Self {
        Flow::Stream(stream)
    }
}
