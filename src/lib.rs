// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod catalog;    // registration store, lookup, composition
pub mod codec;      // content-type-keyed payload codecs
pub mod config;     // settings + reserved names
pub mod convert;    // coercion + JSON literal handling
pub mod errors;     // error handling
pub mod functions;  // built-in callables
pub mod invocation; // invocation wrapper + conversion pipeline
pub mod message;    // envelope + value model
pub mod observability;
pub mod traits;     // callable abstractions
pub mod types;      // type descriptor model
