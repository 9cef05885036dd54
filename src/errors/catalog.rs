// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use thiserror::Error;

/// Errors surfaced by the catalog itself, outside of composition.
#[derive(Debug, Error, PartialEq)]
pub enum CatalogError {
    /// Looking a registration up by its target instance has been retired.
    /// The looked-up invocation wrapper exposes everything the
    /// registration used to, so there is nothing left for this to answer.
    #[error("registration lookup by target instance is not supported; interrogate the invocation wrapper instead")]
    RegistrationByInstance,
}
