// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! The immutable result of finalizing a registry.
//!
//! A [`PublishedConfig`] has no mutators. It is `Send + Sync` and meant to be
//! shared through `Arc` by any number of concurrent readers, which query
//! modules and sequences by name to build their execution plan.

use crate::config::descriptor::ModuleDescriptor;
use crate::config::sequence::Sequence;
use crate::config::validation::validate_order;
use crate::errors::ConfigError;
use indexmap::{IndexMap, IndexSet};
use serde::Serialize;

/// A published sequence: its steps as written and its flattened schedule
#[derive(Debug, Serialize)]
pub struct PublishedSequence {
    #[serde(skip)]
    name: String,
    steps: Vec<String>,
    modules: Vec<String>,
}

impl PublishedSequence {
    pub(crate) fn new(sequence: Sequence, modules: Vec<String>) -> Self {
        Self {
            name: sequence.name().to_string(),
            steps: sequence.steps().to_vec(),
            modules,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn steps(&self) -> &[String] {
        &self.steps
    }

    /// Module instance names in execution order
    pub fn modules(&self) -> &[String] {
        &self.modules
    }
}

/// The published configuration surface.
///
/// Serializes to a document with `external`, `modules` and `sequences`
/// sections, in definition order.
#[derive(Debug, Serialize)]
pub struct PublishedConfig {
    #[serde(rename = "external", skip_serializing_if = "IndexSet::is_empty")]
    externals: IndexSet<String>,
    modules: IndexMap<String, ModuleDescriptor>,
    sequences: IndexMap<String, PublishedSequence>,
}

impl PublishedConfig {
    pub(crate) fn new(
        modules: IndexMap<String, ModuleDescriptor>,
        sequences: IndexMap<String, PublishedSequence>,
        externals: IndexSet<String>,
    ) -> Self {
        Self {
            externals,
            modules,
            sequences,
        }
    }

    pub fn module(&self, instance_name: &str) -> Option<&ModuleDescriptor> {
        self.modules.get(instance_name)
    }

    pub fn sequence(&self, name: &str) -> Option<&PublishedSequence> {
        self.sequences.get(name)
    }

    pub fn modules(&self) -> impl Iterator<Item = &ModuleDescriptor> {
        self.modules.values()
    }

    pub fn sequences(&self) -> impl Iterator<Item = &PublishedSequence> {
        self.sequences.values()
    }

    pub fn externals(&self) -> impl Iterator<Item = &str> {
        self.externals.iter().map(String::as_str)
    }

    pub fn is_external(&self, name: &str) -> bool {
        self.externals.contains(name)
    }

    /// Descriptors scheduled by `sequence`, in execution order.
    pub fn scheduled_modules(&self, sequence: &str) -> Option<Vec<&ModuleDescriptor>> {
        let sequence = self.sequences.get(sequence)?;
        Some(
            sequence
                .modules
                .iter()
                .filter_map(|name| self.modules.get(name))
                .collect(),
        )
    }

    /// Dependency-order check of one published sequence.
    pub fn validate_dependencies(&self, sequence: &str) -> Result<(), Vec<ConfigError>> {
        let published = self.sequences.get(sequence).ok_or_else(|| {
            vec![ConfigError::UnknownReference {
                name: sequence.to_string(),
            }]
        })?;
        validate_order(sequence, &published.modules, &self.modules, &self.externals)
    }

    /// Dependency-order check of every published sequence.
    pub fn validate_all(&self) -> Result<(), Vec<ConfigError>> {
        let errors: Vec<ConfigError> = self
            .sequences
            .keys()
            .filter_map(|name| self.validate_dependencies(name).err())
            .flatten()
            .collect();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// A document holding only `sequence`, the modules it schedules and the
    /// externals they consume.
    pub fn subset(&self, sequence: &str) -> Option<SequenceView<'_>> {
        let published = self.sequences.get(sequence)?;
        let modules: IndexMap<&str, &ModuleDescriptor> = published
            .modules
            .iter()
            .filter_map(|name| self.modules.get_key_value(name))
            .map(|(name, module)| (name.as_str(), module))
            .collect();
        let externals: IndexSet<&str> = modules
            .values()
            .flat_map(|module| module.parameters().tag_references())
            .map(|(_, tag)| tag.producer())
            .filter(|producer| self.externals.contains(*producer))
            .collect();

        Some(SequenceView {
            externals,
            modules,
            sequences: IndexMap::from([(published.name.as_str(), published)]),
        })
    }

    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(self)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Borrowed, serializable slice of a published configuration
#[derive(Debug, Serialize)]
pub struct SequenceView<'a> {
    #[serde(rename = "external", skip_serializing_if = "IndexSet::is_empty")]
    externals: IndexSet<&'a str>,
    modules: IndexMap<&'a str, &'a ModuleDescriptor>,
    sequences: IndexMap<&'a str, &'a PublishedSequence>,
}

impl SequenceView<'_> {
    pub fn module_names(&self) -> impl Iterator<Item = &str> {
        self.modules.keys().copied()
    }

    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(self)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use crate::config::Registry;
    use crate::params::{ParameterBag, TagReference};
    use std::sync::Arc;
    use std::thread;

    fn published() -> super::PublishedConfig {
        let mut registry = Registry::new();
        registry.declare_external("mix").unwrap();
        registry.declare_external("unused").unwrap();
        registry.define("BeamSpotProducer", "offlineBeamSpot", ParameterBag::new()).unwrap();
        registry
            .define(
                "L1FPGATrackProducer",
                "tracks",
                ParameterBag::new()
                    .with("BeamSpotSource", TagReference::new("offlineBeamSpot"))
                    .with("TrackingParticleInputTag", TagReference::new("mix").with_label("MergedTrackTruth")),
            )
            .unwrap();
        registry
            .define(
                "TTTrackAssociator",
                "associator",
                ParameterBag::new().with("TTTracks", vec![TagReference::new("tracks").with_label("Level1TTTracks")]),
            )
            .unwrap();
        registry.sequence("associators", ["associator"]).unwrap();
        registry.sequence("full", ["offlineBeamSpot", "tracks", "associators"]).unwrap();
        registry.sequence("tracksOnly", ["offlineBeamSpot", "tracks"]).unwrap();
        registry.finalize().unwrap()
    }

    #[test]
    fn scheduled_modules_follow_flattened_order() {
        let config = published();
        let names: Vec<&str> = config
            .scheduled_modules("full")
            .unwrap()
            .iter()
            .map(|m| m.instance_name())
            .collect();
        assert_eq!(names, vec!["offlineBeamSpot", "tracks", "associator"]);
        assert!(config.scheduled_modules("missing").is_none());
    }

    #[test]
    fn published_sequences_validate() {
        let config = published();
        assert!(config.validate_all().is_ok());
        assert!(config.validate_dependencies("nope").is_err());
    }

    #[test]
    fn subset_keeps_only_what_the_sequence_needs() {
        let config = published();
        let view = config.subset("tracksOnly").unwrap();
        let names: Vec<&str> = view.module_names().collect();
        assert_eq!(names, vec!["offlineBeamSpot", "tracks"]);

        let yaml = view.to_yaml().unwrap();
        assert!(yaml.contains("mix"));
        assert!(!yaml.contains("unused"));
        assert!(!yaml.contains("associator"));
    }

    #[test]
    fn json_dump_has_all_sections() {
        let config = published();
        let json: serde_json::Value = serde_json::from_str(&config.to_json().unwrap()).unwrap();
        assert_eq!(json["external"], serde_json::json!(["mix", "unused"]));
        assert_eq!(json["modules"]["tracks"]["kind"], "L1FPGATrackProducer");
        assert_eq!(
            json["modules"]["associator"]["parameters"]["TTTracks"]["value"][0],
            "tracks:Level1TTTracks"
        );
        assert_eq!(
            json["sequences"]["full"]["modules"],
            serde_json::json!(["offlineBeamSpot", "tracks", "associator"])
        );
        assert_eq!(
            json["sequences"]["full"]["steps"],
            serde_json::json!(["offlineBeamSpot", "tracks", "associators"])
        );
    }

    #[test]
    fn concurrent_readers_share_one_configuration() {
        let config = Arc::new(published());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let config = Arc::clone(&config);
                thread::spawn(move || {
                    let tracks = config.module("tracks").unwrap();
                    assert!(tracks.is_published());
                    config.sequence("full").unwrap().modules().len()
                })
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.join().unwrap(), 3);
        }
    }
}
