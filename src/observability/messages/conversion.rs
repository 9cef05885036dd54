// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for payload conversion events.

use std::fmt::{Display, Formatter};

/// A caller-supplied input was discarded because the function declares a
/// no-value input type.
///
/// # Log Level
/// `info!` - Intentional behavior worth surfacing during development
pub struct InputDiscardedForUnitType<'a> {
    pub definition: &'a str,
}

impl Display for InputDiscardedForUnitType<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Input for function '{}' is ignored: its input type carries no value, so it is treated as a producer",
            self.definition
        )
    }
}

/// Decoding an envelope payload produced nothing; the original envelope
/// is used instead.
///
/// # Log Level
/// `info!` - Fallback behavior, not an error
pub struct PayloadDecodeFallback<'a> {
    pub definition: &'a str,
    pub content_type: &'a str,
}

impl Display for PayloadDecodeFallback<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Payload decode for function '{}' (content type '{}') produced nothing; using the original envelope as input",
            self.definition, self.content_type
        )
    }
}

/// None of the negotiated content types could be encoded; the output is
/// returned unconverted.
///
/// # Log Level
/// `debug!` - Negotiation miss, resolved by the documented fallback
pub struct ContentTypeNegotiationFailed<'a> {
    pub definition: &'a str,
    pub candidates: &'a [String],
}

impl Display for ContentTypeNegotiationFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "No codec could satisfy [{}] for output of function '{}'; returning the output unconverted",
            self.candidates.join(", "),
            self.definition
        )
    }
}

/// A JSON shape produced by a literal decode did not fit the declared
/// type and is carried as structured JSON instead.
///
/// # Log Level
/// `debug!` - Detail useful when chasing conversion surprises
pub struct JsonShapeKeptStructured<'a> {
    pub definition: &'a str,
}

impl Display for JsonShapeKeptStructured<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "JSON literal input for function '{}' did not fit the declared type; keeping it as structured JSON",
            self.definition
        )
    }
}
