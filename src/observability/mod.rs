// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Observability module for structured logging.
//!
//! Centralized message types for diagnostic and operational logging.
//! Message types follow a struct-based pattern with a `Display`
//! implementation to keep log text out of the control-flow code and
//! consistent across call sites.
//!
//! # Usage
//!
//! ```rust
//! use conveyor::observability::messages::catalog::FunctionLookupFailed;
//!
//! let msg = FunctionLookupFailed { definition: "missing" };
//! tracing::info!("{}", msg);
//! ```

pub mod messages;
