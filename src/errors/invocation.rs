// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Errors raised while invoking a wrapped function.

use thiserror::Error;

/// Errors that can occur while converting payloads or dispatching a call.
///
/// Failures that happen inside a lazily converted stream are carried as
/// `Err` items of that stream rather than returned synchronously; the
/// caller decides whether to retry, cancel, or abandon the subscription.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum InvocationError {
    /// A multi-argument function was handed something that is not a tuple.
    #[error("function '{definition}' takes multiple arguments and requires a tuple-shaped input")]
    TupleInputRequired { definition: String },

    /// A multi-argument function produced or received a tuple of the wrong arity.
    #[error("function '{definition}' expects a {expected}-element tuple, got {actual}")]
    TupleArityMismatch {
        definition: String,
        expected: usize,
        actual: usize,
    },

    /// A tuple-returning function produced something that is not a tuple.
    #[error("function '{definition}' declares a tuple output but returned a different shape")]
    TupleOutputRequired { definition: String },

    /// A payload that looked like a JSON literal failed to parse.
    #[error("failed to decode JSON input for function '{definition}': {reason}")]
    JsonDecode { definition: String, reason: String },

    /// The registered target does not agree with the declared function shape.
    #[error("target registered for '{definition}' does not match its declared shape")]
    TargetShapeMismatch { definition: String },

    /// An element of a collection output could not be converted at all.
    #[error("failed to convert a collection element produced by '{definition}'")]
    ContainerElementConversion { definition: String },

    /// A per-element invocation over a stream produced another stream.
    #[error("function '{definition}' returned a nested stream while mapped over stream elements")]
    NestedStream { definition: String },
}
