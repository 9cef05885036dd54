// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types organized by subsystem:
//! * `catalog` - Lookup, registration, and composition events
//! * `conversion` - Payload conversion and content negotiation events

pub mod catalog;
pub mod conversion;
