// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

mod catalog;
mod composition;
mod config;
mod invocation;

pub use catalog::CatalogError;
pub use composition::CompositionError;
pub use config::ConfigError;
pub use invocation::InvocationError;
