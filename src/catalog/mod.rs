// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

mod composition;
mod function_catalog;
mod registration;

#[cfg(test)]
mod integration_tests;

pub use function_catalog::FunctionCatalog;
pub use registration::{FunctionRegistration, RegistrationStore};
