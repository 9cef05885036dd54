// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

mod input;
mod output;
mod wrapper;

pub use wrapper::{ConversionServices, FunctionInvocationWrapper, ResultEnhancer};
