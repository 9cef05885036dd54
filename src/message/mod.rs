// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

mod envelope;
mod value;

pub use envelope::{Envelope, Headers};
pub use value::{Flow, OriginalValueHolder, Value, ValueStream};
