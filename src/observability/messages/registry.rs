// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for registry lifecycle events.
//!
//! This module contains message types for logging events related to:
//! * Module definition, cloning and in-place modification
//! * Sequence definition and extension
//! * Publication of single entities and finalization of a registry

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use tracing::Span;

/// A module descriptor was registered.
///
/// # Log Level
/// `debug!` - Definition detail
///
/// # Example
/// ```
/// use pset_compose::observability::messages::registry::ModuleDefined;
///
/// let msg = ModuleDefined {
///     kind: "L1FPGATrackProducer",
///     instance_name: "TTTracksFromTrackletEmulation",
///     parameter_count: 16,
/// };
///
/// tracing::debug!("{}", msg);
/// ```
pub struct ModuleDefined<'a> {
    pub kind: &'a str,
    pub instance_name: &'a str,
    pub parameter_count: usize,
}

impl Display for ModuleDefined<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Defined module '{}' of kind '{}' with {} parameters",
            self.instance_name, self.kind, self.parameter_count
        )
    }
}

impl StructuredLog for ModuleDefined<'_> {
    fn log(&self) {
        tracing::debug!(
            kind = self.kind,
            instance_name = self.instance_name,
            parameter_count = self.parameter_count,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::span!(
            tracing::Level::DEBUG,
            "span_name",
            name = name,
            kind = self.kind,
            instance_name = self.instance_name,
        )
    }
}

/// A module descriptor was cloned with overrides.
///
/// # Log Level
/// `debug!` - Definition detail
pub struct ModuleCloned<'a> {
    pub source: &'a str,
    pub instance_name: &'a str,
    pub overridden: &'a [&'a str],
}

impl Display for ModuleCloned<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Cloned module '{}' into '{}' overriding [{}]",
            self.source,
            self.instance_name,
            self.overridden.join(", ")
        )
    }
}

impl StructuredLog for ModuleCloned<'_> {
    fn log(&self) {
        tracing::debug!(
            source = self.source,
            instance_name = self.instance_name,
            overridden = self.overridden.join(","),
            override_count = self.overridden.len(),
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::span!(
            tracing::Level::DEBUG,
            "span_name",
            name = name,
            source = self.source,
            instance_name = self.instance_name,
        )
    }
}

/// A draft module was modified in place.
///
/// # Log Level
/// `debug!` - Definition detail
pub struct ModuleModified<'a> {
    pub instance_name: &'a str,
    pub overridden: &'a [&'a str],
}

impl Display for ModuleModified<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Modified module '{}' overriding [{}]",
            self.instance_name,
            self.overridden.join(", ")
        )
    }
}

impl StructuredLog for ModuleModified<'_> {
    fn log(&self) {
        tracing::debug!(
            instance_name = self.instance_name,
            overridden = self.overridden.join(","),
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::span!(
            tracing::Level::DEBUG,
            "span_name",
            name = name,
            instance_name = self.instance_name,
        )
    }
}

/// A sequence was registered or extended.
///
/// # Log Level
/// `debug!` - Definition detail
pub struct SequenceDefined<'a> {
    pub name: &'a str,
    pub step_count: usize,
}

impl Display for SequenceDefined<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Defined sequence '{}' with {} steps", self.name, self.step_count)
    }
}

impl StructuredLog for SequenceDefined<'_> {
    fn log(&self) {
        tracing::debug!(sequence = self.name, step_count = self.step_count, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::span!(
            tracing::Level::DEBUG,
            "span_name",
            name = name,
            sequence = self.name,
        )
    }
}

/// A module or sequence moved from draft to published.
///
/// # Log Level
/// `debug!` - Lifecycle detail
pub struct EntityPublished<'a> {
    pub entity: &'static str,
    pub name: &'a str,
}

impl Display for EntityPublished<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Published {} '{}'", self.entity, self.name)
    }
}

impl StructuredLog for EntityPublished<'_> {
    fn log(&self) {
        tracing::debug!(entity = self.entity, name = self.name, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::span!(
            tracing::Level::DEBUG,
            "span_name",
            name = name,
            entity = self.entity,
        )
    }
}

/// A registry was finalized into a published configuration.
///
/// # Log Level
/// `info!` - Important operational event
pub struct ConfigurationFinalized {
    pub module_count: usize,
    pub sequence_count: usize,
    pub external_count: usize,
}

impl Display for ConfigurationFinalized {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Published configuration: {} modules, {} sequences, {} external producers",
            self.module_count, self.sequence_count, self.external_count
        )
    }
}

impl StructuredLog for ConfigurationFinalized {
    fn log(&self) {
        tracing::info!(
            module_count = self.module_count,
            sequence_count = self.sequence_count,
            external_count = self.external_count,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "finalize",
            span_name = name,
            module_count = self.module_count,
            sequence_count = self.sequence_count,
        )
    }
}
