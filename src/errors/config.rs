// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use thiserror::Error;

/// Errors raised by the parameter bag, the registry and the sequence builder.
///
/// Every variant carries the name of the offending parameter, instance or
/// sequence so a failing definition can be located in its source document.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// A parameter was set on a bag that has been frozen by publication
    #[error("Parameter '{parameter}' cannot be redefined: its parameter set is frozen")]
    DuplicateDefinition { parameter: String },

    /// An instance or sequence name is already registered
    #[error("Instance name '{name}' is already registered")]
    DuplicateInstanceName { name: String },

    /// A parameter lookup missed
    #[error("Unknown parameter '{parameter}'")]
    UnknownParameter { parameter: String },

    /// A sequence embeds itself, directly or transitively
    #[error("Cyclic reference detected: {}", cycle.join(" -> "))]
    CyclicReference {
        /// The embedding path, closed by repeating its first element
        cycle: Vec<String>,
    },

    /// A module consumes an output whose producer does not run before it
    #[error(
        "Module '{module}' parameter '{parameter}' consumes '{producer}' which does not run before it in sequence '{sequence}'"
    )]
    UnresolvedDependency {
        sequence: String,
        module: String,
        parameter: String,
        producer: String,
    },

    /// A clone source or sequence step names nothing registered
    #[error("Reference to unknown module or sequence '{name}'")]
    UnknownReference { name: String },

    /// A mutation targeted an entity that has been published
    #[error("'{name}' is published and can no longer be modified")]
    AlreadyPublished { name: String },

    /// A tag reference with an empty component
    #[error("Invalid tag reference '{tag}': {reason}")]
    InvalidTagReference { tag: String, reason: String },

    /// A typed accessor found a different value type
    #[error("Parameter '{parameter}' holds a {found} value, expected {expected}")]
    TypeMismatch {
        parameter: String,
        expected: &'static str,
        found: &'static str,
    },
}

impl ConfigError {
    /// The instance, sequence or parameter name the error points at.
    pub fn subject(&self) -> String {
        match self {
            ConfigError::DuplicateDefinition { parameter }
            | ConfigError::UnknownParameter { parameter }
            | ConfigError::TypeMismatch { parameter, .. } => parameter.clone(),
            ConfigError::DuplicateInstanceName { name }
            | ConfigError::UnknownReference { name }
            | ConfigError::AlreadyPublished { name } => name.clone(),
            ConfigError::CyclicReference { cycle } => cycle.first().cloned().unwrap_or_default(),
            ConfigError::UnresolvedDependency { module, .. } => module.clone(),
            ConfigError::InvalidTagReference { tag, .. } => tag.clone(),
        }
    }
}
