// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

mod coerce;

pub mod json;

pub use coerce::{Coercer, ScalarCoercer};
