// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for catalog lookup and composition events.

use std::fmt::{Display, Formatter};

/// A lookup resolved a function definition to an invocation wrapper.
///
/// # Log Level
/// `info!` - Important operational event
pub struct FunctionLocated<'a> {
    pub definition: &'a str,
    pub kind: &'a str,
    pub composed: bool,
}

impl Display for FunctionLocated<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Located function '{}': kind={}, composed={}",
            self.definition, self.kind, self.composed
        )
    }
}

/// A lookup could not resolve a function definition.
///
/// # Log Level
/// `info!` - A negative lookup is a normal outcome, not a failure
pub struct FunctionLookupFailed<'a> {
    pub definition: &'a str,
}

impl Display for FunctionLookupFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Failed to locate function: {}", self.definition)
    }
}

/// A pipeline segment did not match any registered name.
///
/// # Log Level
/// `debug!` - Detail behind a failed lookup
pub struct PipelineSegmentUnresolved<'a> {
    pub definition: &'a str,
    pub segment: &'a str,
}

impl Display for PipelineSegmentUnresolved<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Pipeline '{}' references unregistered function '{}'",
            self.definition, self.segment
        )
    }
}

/// A registration was accepted into the catalog.
///
/// # Log Level
/// `debug!` - Routine bookkeeping
pub struct FunctionRegistered<'a> {
    pub names: &'a [String],
}

impl Display for FunctionRegistered<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Registered function under [{}]", self.names.join(", "))
    }
}
