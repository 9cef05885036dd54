// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Reserved names and headers used across the catalog.

/// Environment variable holding the process-wide default pipeline
/// definition; wins over the settings file.
pub const DEFAULT_DEFINITION_ENV: &str = "CONVEYOR_FUNCTION_DEFINITION";

/// Name the dynamic router registers under. Excluded from the
/// single-function auto-selection shortcut.
pub const ROUTER_FUNCTION_NAME: &str = "router";

/// Content type of an envelope payload.
pub const HEADER_CONTENT_TYPE: &str = "content-type";

/// On an output envelope, overrides caller-supplied content negotiation
/// types. May carry a comma-separated candidate list.
pub const HEADER_EXPECTED_CONTENT_TYPE: &str = "expected-content-type";

/// Marker header: when present on a triggering envelope, its headers are
/// merged onto the result.
pub const HEADER_PROPAGATE: &str = "propagate-headers";

/// Content type assumed when negotiation has nothing else to go on.
pub const DEFAULT_CONTENT_TYPE: &str = "application/json";
