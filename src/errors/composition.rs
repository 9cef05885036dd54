// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Errors raised while composing pipeline definitions.

use thiserror::Error;

/// Errors that make a composition impossible.
///
/// These are terminal for the lookup that triggered them; an unresolvable
/// pipeline segment is *not* an error and surfaces as an absent result
/// instead.
#[derive(Debug, Error, PartialEq)]
pub enum CompositionError {
    /// One of the two sides declares a multi-argument tuple type.
    #[error("cannot compose '{first}' with '{second}': multi-argument functions do not support composition")]
    TupleFunction { first: String, second: String },

    /// Nothing can run after a function that produces no output.
    #[error("cannot compose anything after consumer '{definition}'")]
    AfterConsumer { definition: String },
}
