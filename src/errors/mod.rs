// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

mod config;
mod loader;

pub use config::ConfigError;
pub use loader::LoadError;

/// Convenience alias for registry and parameter operations.
pub type Result<T> = std::result::Result<T, ConfigError>;
