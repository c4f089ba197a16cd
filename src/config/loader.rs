// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Declarative configuration documents.
//!
//! A document lists the documents it imports, the producers it expects from
//! outside the configuration, and an ordered list of definitions that are
//! replayed against a [`Registry`]. Imports are loaded first, in order, so a
//! document can clone or sequence anything its imports define.
//!
//! # Example
//! ```yaml
//! imports:
//!   - tracklet.yaml
//! external:
//!   - mix
//! definitions:
//!   - define: offlineBeamSpot
//!     kind: BeamSpotProducer
//!   - clone: TTTracksFromExtendedTrackletEmulation
//!     from: TTTracksFromTrackletEmulation
//!     overrides:
//!       Extended: { type: bool, value: true }
//!       Hnpar: { type: uint32, value: 5 }
//!   - sequence: L1THybridTracks
//!     steps: [offlineBeamSpot, TTTracksFromTrackletEmulation]
//! ```
//!
//! The format follows the file extension: `.yaml`/`.yml`, `.toml` or `.json`.

use crate::config::published::PublishedConfig;
use crate::config::registry::Registry;
use crate::errors::{ConfigError, LoadError};
use crate::observability::messages::loader::{DocumentLoaded, ImportAlreadyLoaded};
use crate::observability::messages::StructuredLog;
use crate::params::ParameterBag;
use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// One parsed document, before its definitions are applied.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Document {
    /// Paths relative to the importing document
    #[serde(default)]
    pub imports: Vec<PathBuf>,
    #[serde(default, rename = "external")]
    pub externals: Vec<String>,
    #[serde(default)]
    pub definitions: Vec<Definition>,
}

/// A single registry operation.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "RawDefinition")]
pub enum Definition {
    Define {
        name: String,
        kind: String,
        parameters: ParameterBag,
    },
    Clone {
        name: String,
        from: String,
        overrides: ParameterBag,
    },
    Modify {
        name: String,
        overrides: ParameterBag,
    },
    Sequence {
        name: String,
        steps: Vec<String>,
    },
    Extend {
        name: String,
        steps: Vec<String>,
    },
}

impl Definition {
    /// Replay this definition against `registry`.
    pub fn apply_to(&self, registry: &mut Registry) -> Result<(), ConfigError> {
        match self {
            Definition::Define {
                name,
                kind,
                parameters,
            } => registry.define(kind.clone(), name.clone(), parameters.clone()).map(|_| ()),
            Definition::Clone {
                name,
                from,
                overrides,
            } => registry.clone_module(from, name.clone(), overrides).map(|_| ()),
            Definition::Modify { name, overrides } => registry.modify(name, overrides).map(|_| ()),
            Definition::Sequence { name, steps } => registry.sequence(name.clone(), steps.clone()).map(|_| ()),
            Definition::Extend { name, steps } => registry.extend_sequence(name, steps.clone()).map(|_| ()),
        }
    }
}

/// Wire shape of a definition: the operation is the key naming the target.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawDefinition {
    define: Option<String>,
    clone: Option<String>,
    modify: Option<String>,
    sequence: Option<String>,
    extend: Option<String>,
    kind: Option<String>,
    from: Option<String>,
    parameters: Option<ParameterBag>,
    overrides: Option<ParameterBag>,
    steps: Option<Vec<String>>,
}

impl TryFrom<RawDefinition> for Definition {
    type Error = String;

    fn try_from(raw: RawDefinition) -> Result<Self, Self::Error> {
        let present = [
            ("kind", raw.kind.is_some()),
            ("from", raw.from.is_some()),
            ("parameters", raw.parameters.is_some()),
            ("overrides", raw.overrides.is_some()),
            ("steps", raw.steps.is_some()),
        ];

        match (raw.define, raw.clone, raw.modify, raw.sequence, raw.extend) {
            (Some(name), None, None, None, None) => {
                only(&name, &present, &["kind", "parameters"])?;
                Ok(Definition::Define {
                    kind: required(&name, "kind", raw.kind)?,
                    parameters: raw.parameters.unwrap_or_default(),
                    name,
                })
            }
            (None, Some(name), None, None, None) => {
                only(&name, &present, &["from", "overrides"])?;
                Ok(Definition::Clone {
                    from: required(&name, "from", raw.from)?,
                    overrides: raw.overrides.unwrap_or_default(),
                    name,
                })
            }
            (None, None, Some(name), None, None) => {
                only(&name, &present, &["overrides"])?;
                Ok(Definition::Modify {
                    overrides: required(&name, "overrides", raw.overrides)?,
                    name,
                })
            }
            (None, None, None, Some(name), None) => {
                only(&name, &present, &["steps"])?;
                Ok(Definition::Sequence {
                    steps: required(&name, "steps", raw.steps)?,
                    name,
                })
            }
            (None, None, None, None, Some(name)) => {
                only(&name, &present, &["steps"])?;
                Ok(Definition::Extend {
                    steps: required(&name, "steps", raw.steps)?,
                    name,
                })
            }
            _ => Err("a definition needs exactly one of define, clone, modify, sequence or extend".to_string()),
        }
    }
}

fn only(name: &str, present: &[(&str, bool)], allowed: &[&str]) -> Result<(), String> {
    match present
        .iter()
        .find(|(field, is_set)| *is_set && !allowed.contains(field))
    {
        Some((field, _)) => Err(format!("'{}' does not apply to definition '{}'", field, name)),
        None => Ok(()),
    }
}

fn required<T>(name: &str, field: &str, value: Option<T>) -> Result<T, String> {
    value.ok_or_else(|| format!("definition '{}' is missing '{}'", name, field))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Yaml,
    Toml,
    Json,
}

impl Format {
    fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()? {
            "yaml" | "yml" => Some(Format::Yaml),
            "toml" => Some(Format::Toml),
            "json" => Some(Format::Json),
            _ => None,
        }
    }
}

/// Read and parse a single document without following its imports.
pub fn load_document<P: AsRef<Path>>(path: P) -> Result<Document, LoadError> {
    let path = path.as_ref();
    let format = Format::from_path(path).ok_or_else(|| LoadError::UnsupportedFormat {
        path: path.to_path_buf(),
    })?;
    let content = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    match format {
        Format::Yaml => serde_yaml::from_str(&content).map_err(|source| LoadError::Yaml {
            path: path.to_path_buf(),
            source,
        }),
        Format::Toml => toml::from_str(&content).map_err(|source| LoadError::Toml {
            path: path.to_path_buf(),
            source,
        }),
        Format::Json => serde_json::from_str(&content).map_err(|source| LoadError::Json {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Load a document and its imports into an existing registry.
///
/// Each file is loaded at most once; a file importing itself, directly or
/// transitively, fails with [`LoadError::ImportCycle`].
pub fn load_into<P: AsRef<Path>>(registry: &mut Registry, path: P) -> Result<(), LoadError> {
    let mut loader = Loader {
        registry,
        loaded: HashSet::new(),
        stack: Vec::new(),
    };
    loader.load(path.as_ref(), None)
}

/// Build a draft registry from a document and its imports.
pub fn load_registry<P: AsRef<Path>>(path: P) -> Result<Registry, LoadError> {
    let mut registry = Registry::new();
    load_into(&mut registry, path)?;
    Ok(registry)
}

/// Build and publish the configuration described by a document.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<PublishedConfig, LoadError> {
    let path = path.as_ref();
    load_registry(path)?
        .finalize()
        .map_err(|source| LoadError::Finalize {
            path: path.to_path_buf(),
            source,
        })
}

/// [`load_config`], then check the dependency order of every sequence.
pub fn load_and_validate_config<P: AsRef<Path>>(path: P) -> Result<PublishedConfig, LoadError> {
    let path = path.as_ref();
    let config = load_config(path)?;
    config.validate_all().map_err(|errors| LoadError::Dependencies {
        path: path.to_path_buf(),
        errors,
    })?;
    Ok(config)
}

struct Loader<'r> {
    registry: &'r mut Registry,
    loaded: HashSet<PathBuf>,
    /// Documents whose imports are being resolved
    stack: Vec<PathBuf>,
}

impl Loader<'_> {
    fn load(&mut self, path: &Path, imported_by: Option<&Path>) -> Result<(), LoadError> {
        let canonical = fs::canonicalize(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        if let Some(start) = self.stack.iter().position(|entry| entry == &canonical) {
            let mut chain = self.stack[start..].to_vec();
            chain.push(canonical);
            return Err(LoadError::ImportCycle { chain });
        }

        if self.loaded.contains(&canonical) {
            if let Some(imported_by) = imported_by {
                ImportAlreadyLoaded {
                    path: &canonical,
                    imported_by,
                }
                .log();
            }
            return Ok(());
        }

        let document = load_document(&canonical)?;
        let base = canonical.parent().map(Path::to_path_buf).unwrap_or_default();

        self.stack.push(canonical.clone());
        for import in &document.imports {
            self.load(&base.join(import), Some(&canonical))?;
        }
        self.stack.pop();

        for name in &document.externals {
            // Sibling documents may expect the same producer.
            if self.registry.is_external(name) {
                continue;
            }
            self.registry
                .declare_external(name.clone())
                .map_err(|source| LoadError::External {
                    path: canonical.clone(),
                    source,
                })?;
        }

        for (index, definition) in document.definitions.iter().enumerate() {
            definition
                .apply_to(self.registry)
                .map_err(|source| LoadError::Config {
                    path: canonical.clone(),
                    index,
                    source,
                })?;
        }

        DocumentLoaded {
            path: &canonical,
            import_count: document.imports.len(),
            definition_count: document.definitions.len(),
        }
        .log();

        self.loaded.insert(canonical);
        Ok(())
    }
}
