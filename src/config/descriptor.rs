// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::errors::Result;
use crate::params::{ParameterBag, ParameterDiff, Value};
use serde::Serialize;

/// Lifecycle of a module descriptor or sequence.
///
/// `Draft` entities can be modified through the registry; `Published` ones
/// are immutable and can be handed to consumers. There is no way back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Lifecycle {
    #[default]
    Draft,
    Published,
}

/// One instantiated processing step: a producer kind, a unique instance name
/// and the parameters it is configured with.
///
/// The kind is opaque here; binding it to an executable unit is the job of the
/// framework consuming the published configuration.
///
/// # Example
/// ```
/// use pset_compose::config::Registry;
/// use pset_compose::params::{ParameterBag, Value};
///
/// let mut registry = Registry::new();
/// registry
///     .define(
///         "L1FPGATrackProducer",
///         "TTTracksFromTrackletEmulation",
///         ParameterBag::new()
///             .with("Extended", false)
///             .with("Hnpar", 4u32),
///     )
///     .unwrap();
///
/// let module = registry.get_module("TTTracksFromTrackletEmulation").unwrap();
/// assert_eq!(module.kind(), "L1FPGATrackProducer");
/// assert_eq!(module.get("Hnpar").unwrap(), &Value::Uint32(4));
/// ```
#[derive(Debug, Serialize)]
pub struct ModuleDescriptor {
    #[serde(skip)]
    instance_name: String,
    kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    cloned_from: Option<String>,
    parameters: ParameterBag,
    #[serde(skip)]
    lifecycle: Lifecycle,
}

impl ModuleDescriptor {
    pub(crate) fn new(kind: String, instance_name: String, parameters: ParameterBag) -> Self {
        Self {
            instance_name,
            kind,
            cloned_from: None,
            parameters,
            lifecycle: Lifecycle::Draft,
        }
    }

    /// A new draft descriptor with this one's kind and merged parameters.
    pub(crate) fn derive(&self, instance_name: String, overrides: &ParameterBag) -> Self {
        Self {
            instance_name,
            kind: self.kind.clone(),
            cloned_from: Some(self.instance_name.clone()),
            parameters: self.parameters.merge(overrides),
            lifecycle: Lifecycle::Draft,
        }
    }

    pub(crate) fn apply_overrides(&mut self, overrides: &ParameterBag) {
        self.parameters = self.parameters.merge(overrides);
    }

    pub(crate) fn publish(&mut self) {
        self.parameters.freeze();
        self.lifecycle = Lifecycle::Published;
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn instance_name(&self) -> &str {
        &self.instance_name
    }

    /// Instance name of the descriptor this one was cloned from, if any
    pub fn cloned_from(&self) -> Option<&str> {
        self.cloned_from.as_deref()
    }

    pub fn parameters(&self) -> &ParameterBag {
        &self.parameters
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    pub fn is_published(&self) -> bool {
        self.lifecycle == Lifecycle::Published
    }

    pub fn get(&self, name: &str) -> Result<&Value> {
        self.parameters.get(name)
    }

    /// Parameter differences going from `self` to `other`.
    pub fn diff<'a>(&'a self, other: &'a ModuleDescriptor) -> Vec<ParameterDiff<'a>> {
        self.parameters.diff(&other.parameters)
    }
}
