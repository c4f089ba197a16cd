// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Errors for loading declarative configuration documents.

use crate::errors::ConfigError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while reading a document and replaying its definitions
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Failed to read '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse YAML document '{}': {source}", path.display())]
    Yaml {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    #[error("Failed to parse JSON document '{}': {source}", path.display())]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Failed to parse TOML document '{}': {source}", path.display())]
    Toml {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// The file extension maps to no supported format
    #[error("Unsupported document format for '{}' (expected .yaml, .yml, .toml or .json)", path.display())]
    UnsupportedFormat { path: PathBuf },

    /// A document imports itself, directly or transitively
    #[error("Import cycle detected: {}", chain.iter().map(|p| p.display().to_string()).collect::<Vec<_>>().join(" -> "))]
    ImportCycle { chain: Vec<PathBuf> },

    /// A definition in the document was rejected by the registry
    #[error("{} (definition #{index}): {source}", path.display())]
    Config {
        path: PathBuf,
        index: usize,
        source: ConfigError,
    },

    /// An external producer name clashes with a module or sequence
    #[error("{}: {source}", path.display())]
    External { path: PathBuf, source: ConfigError },

    /// Publishing the loaded registry failed
    #[error("Failed to finalize '{}': {source}", path.display())]
    Finalize { path: PathBuf, source: ConfigError },

    /// One or more sequences schedule a consumer before its producer
    #[error(
        "Dependency validation of '{}' failed:\n{}",
        path.display(),
        errors.iter().map(|e| e.to_string()).collect::<Vec<_>>().join("\n")
    )]
    Dependencies {
        path: PathBuf,
        errors: Vec<ConfigError>,
    },
}
