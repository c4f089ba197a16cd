// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! The builder context in which modules and sequences are defined.
//!
//! A [`Registry`] owns every descriptor and sequence of one configuration and
//! enforces that instance names are unique across all of them. It is an
//! explicit value handed to whoever builds the configuration; there is no
//! ambient global registry. Mutation takes `&mut self`, so a registry has a
//! single writer by construction.
//!
//! # Examples
//!
//! ```rust
//! use pset_compose::config::Registry;
//! use pset_compose::params::{ParameterBag, TagReference, Value};
//!
//! let mut registry = Registry::new();
//! registry.declare_external("TTStubsFromPhase2TrackerDigis").unwrap();
//! registry.define("BeamSpotProducer", "offlineBeamSpot", ParameterBag::new()).unwrap();
//! registry
//!     .define(
//!         "L1FPGATrackProducer",
//!         "TTTracksFromTrackletEmulation",
//!         ParameterBag::new()
//!             .with("TTStubSource", TagReference::new("TTStubsFromPhase2TrackerDigis").with_label("StubAccepted"))
//!             .with("BeamSpotSource", TagReference::new("offlineBeamSpot"))
//!             .with("Extended", false)
//!             .with("Hnpar", 4u32),
//!     )
//!     .unwrap();
//! registry
//!     .clone_module(
//!         "TTTracksFromTrackletEmulation",
//!         "TTTracksFromExtendedTrackletEmulation",
//!         &ParameterBag::new().with("Extended", true).with("Hnpar", 5u32),
//!     )
//!     .unwrap();
//! registry
//!     .sequence("L1ExtendedHybridTracks", ["offlineBeamSpot", "TTTracksFromExtendedTrackletEmulation"])
//!     .unwrap();
//!
//! assert!(registry.validate_dependencies("L1ExtendedHybridTracks").is_ok());
//!
//! let published = registry.finalize().unwrap();
//! let extended = published.module("TTTracksFromExtendedTrackletEmulation").unwrap();
//! assert_eq!(extended.get("Hnpar").unwrap(), &Value::Uint32(5));
//! ```

use crate::config::descriptor::ModuleDescriptor;
use crate::config::published::{PublishedConfig, PublishedSequence};
use crate::config::sequence::{Flattener, Resolution, Sequence};
use crate::config::validation::validate_order;
use crate::errors::{ConfigError, Result};
use crate::observability::messages::registry::{
    ConfigurationFinalized, EntityPublished, ModuleCloned, ModuleDefined, ModuleModified,
    SequenceDefined,
};
use crate::observability::messages::validation::{CyclicReferenceDetected, DuplicateInstanceName};
use crate::observability::messages::StructuredLog;
use crate::params::ParameterBag;
use indexmap::{IndexMap, IndexSet};

/// Builder context for one configuration
#[derive(Debug, Default)]
pub struct Registry {
    modules: IndexMap<String, ModuleDescriptor>,
    sequences: IndexMap<String, Sequence>,
    externals: IndexSet<String>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a draft module descriptor.
    ///
    /// Fails with `DuplicateInstanceName` when the name is already used by a
    /// module, a sequence or an external producer, and with
    /// `InvalidTagReference` when a tag parameter has an empty component.
    pub fn define(
        &mut self,
        kind: impl Into<String>,
        instance_name: impl Into<String>,
        parameters: ParameterBag,
    ) -> Result<&ModuleDescriptor> {
        let instance_name = instance_name.into();
        self.ensure_available(&instance_name)?;
        parameters.validate_tags()?;

        let descriptor = ModuleDescriptor::new(kind.into(), instance_name.clone(), parameters);
        ModuleDefined {
            kind: descriptor.kind(),
            instance_name: &instance_name,
            parameter_count: descriptor.parameters().len(),
        }
        .log();

        Ok(&*self.modules.entry(instance_name).or_insert(descriptor))
    }

    /// Register a new draft descriptor copied from `source` with `overrides`
    /// merged over its parameters.
    ///
    /// The new descriptor keeps the source's kind; parameters not named in
    /// `overrides` are identical to the source's. The source is left as it is,
    /// whether draft or published.
    pub fn clone_module(
        &mut self,
        source: &str,
        new_instance_name: impl Into<String>,
        overrides: &ParameterBag,
    ) -> Result<&ModuleDescriptor> {
        let new_instance_name = new_instance_name.into();
        self.ensure_available(&new_instance_name)?;
        overrides.validate_tags()?;

        let descriptor = self.get_module(source)?.derive(new_instance_name.clone(), overrides);
        let overridden: Vec<&str> = overrides.names().collect();
        ModuleCloned {
            source,
            instance_name: &new_instance_name,
            overridden: &overridden,
        }
        .log();

        Ok(&*self.modules.entry(new_instance_name).or_insert(descriptor))
    }

    /// Merge `overrides` into a draft descriptor in place.
    pub fn modify(&mut self, instance_name: &str, overrides: &ParameterBag) -> Result<&ModuleDescriptor> {
        overrides.validate_tags()?;
        let descriptor = self
            .modules
            .get_mut(instance_name)
            .ok_or_else(|| ConfigError::UnknownReference {
                name: instance_name.to_string(),
            })?;
        if descriptor.is_published() {
            return Err(ConfigError::AlreadyPublished {
                name: instance_name.to_string(),
            });
        }

        descriptor.apply_overrides(overrides);
        let overridden: Vec<&str> = overrides.names().collect();
        ModuleModified {
            instance_name,
            overridden: &overridden,
        }
        .log();

        Ok(&*descriptor)
    }

    /// Declare a producer supplied outside this configuration.
    ///
    /// Its name is reserved and tag references to it satisfy dependency
    /// validation. It cannot be scheduled as a sequence step.
    pub fn declare_external(&mut self, name: impl Into<String>) -> Result<()> {
        let name = name.into();
        self.ensure_available(&name)?;
        self.externals.insert(name);
        Ok(())
    }

    /// Register a draft sequence.
    ///
    /// Steps may name sequences defined later. Every step reachable through
    /// sequences already known is expanded right away, so a definition that
    /// embeds itself, directly or transitively, fails with `CyclicReference`
    /// and is not stored.
    pub fn sequence<I, S>(&mut self, name: impl Into<String>, steps: I) -> Result<&Sequence>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let name = name.into();
        let steps: Vec<String> = steps.into_iter().map(Into::into).collect();
        self.ensure_available(&name)?;
        self.check_steps(&name, &steps)?;

        SequenceDefined {
            name: &name,
            step_count: steps.len(),
        }
        .log();

        let sequence = Sequence::new(name.clone(), steps);
        Ok(&*self.sequences.entry(name).or_insert(sequence))
    }

    /// Append steps to a draft sequence, with the same cycle check as
    /// [`sequence`](Registry::sequence).
    pub fn extend_sequence<I, S>(&mut self, name: &str, steps: I) -> Result<&Sequence>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let added: Vec<String> = steps.into_iter().map(Into::into).collect();
        let existing = self.get_sequence(name)?;
        if existing.is_published() {
            return Err(ConfigError::AlreadyPublished {
                name: name.to_string(),
            });
        }

        let mut combined = existing.steps().to_vec();
        combined.extend(added.iter().cloned());
        self.check_steps(name, &combined)?;

        SequenceDefined {
            name,
            step_count: combined.len(),
        }
        .log();

        let sequence = self
            .sequences
            .get_mut(name)
            .ok_or_else(|| ConfigError::UnknownReference {
                name: name.to_string(),
            })?;
        sequence.extend(added);
        Ok(&*sequence)
    }

    /// Ordered module instance names scheduled by the sequence `name`.
    ///
    /// Fails with `UnknownReference` when a step names nothing registered and
    /// with `CyclicReference` when sequences embed each other in a loop.
    pub fn flatten(&self, name: &str) -> Result<Vec<String>> {
        self.get_sequence(name)?;
        self.flattener(Resolution::Strict).flatten(name).inspect_err(log_cycle)
    }

    /// Check that every producer consumed by a module of the sequence runs
    /// before it, or is external. Runs on demand only.
    pub fn validate_dependencies(&self, name: &str) -> std::result::Result<(), Vec<ConfigError>> {
        let order = self.flatten(name).map_err(|e| vec![e])?;
        validate_order(name, &order, &self.modules, &self.externals)
    }

    /// [`validate_dependencies`](Registry::validate_dependencies) over every
    /// sequence, accumulating all failures.
    pub fn validate_all(&self) -> std::result::Result<(), Vec<ConfigError>> {
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

    /// Move a module or sequence from draft to published.
    ///
    /// A published module's parameters are frozen. Publishing a sequence
    /// requires it to flatten and also publishes every sequence it embeds, so
    /// its schedule can no longer change. Publishing twice is a no-op.
    pub fn publish(&mut self, name: &str) -> Result<()> {
        if let Some(module) = self.modules.get_mut(name) {
            if !module.is_published() {
                module.publish();
                EntityPublished { entity: "module", name }.log();
            }
            return Ok(());
        }

        self.flatten(name)?;
        let nested = self.flattener(Resolution::Strict).reachable_sequences(name)?;
        for sequence_name in nested {
            if let Some(sequence) = self.sequences.get_mut(&sequence_name) {
                if !sequence.is_published() {
                    sequence.publish();
                    EntityPublished {
                        entity: "sequence",
                        name: &sequence_name,
                    }
                    .log();
                }
            }
        }
        Ok(())
    }

    /// Publish everything and hand over the immutable configuration.
    ///
    /// Every sequence must flatten; dependency order is not checked here.
    pub fn finalize(mut self) -> Result<PublishedConfig> {
        let summary = ConfigurationFinalized {
            module_count: self.modules.len(),
            sequence_count: self.sequences.len(),
            external_count: self.externals.len(),
        };
        let _span = summary.span("finalize").entered();

        let mut flattened = IndexMap::new();
        for name in self.sequences.keys() {
            let order = self.flatten(name)?;
            flattened.insert(name.clone(), order);
        }

        for module in self.modules.values_mut() {
            module.publish();
        }

        let mut sequences = IndexMap::new();
        for (name, mut sequence) in self.sequences {
            sequence.publish();
            let modules = flattened.swap_remove(&name).unwrap_or_default();
            sequences.insert(name, PublishedSequence::new(sequence, modules));
        }

        summary.log();

        Ok(PublishedConfig::new(self.modules, sequences, self.externals))
    }

    pub fn module(&self, instance_name: &str) -> Option<&ModuleDescriptor> {
        self.modules.get(instance_name)
    }

    /// Like [`module`](Registry::module) but failing with `UnknownReference`.
    pub fn get_module(&self, instance_name: &str) -> Result<&ModuleDescriptor> {
        self.modules
            .get(instance_name)
            .ok_or_else(|| ConfigError::UnknownReference {
                name: instance_name.to_string(),
            })
    }

    pub fn get_sequence(&self, name: &str) -> Result<&Sequence> {
        self.sequences
            .get(name)
            .ok_or_else(|| ConfigError::UnknownReference {
                name: name.to_string(),
            })
    }

    pub fn modules(&self) -> impl Iterator<Item = &ModuleDescriptor> {
        self.modules.values()
    }

    pub fn sequences(&self) -> impl Iterator<Item = &Sequence> {
        self.sequences.values()
    }

    pub fn externals(&self) -> impl Iterator<Item = &str> {
        self.externals.iter().map(String::as_str)
    }

    pub fn is_external(&self, name: &str) -> bool {
        self.externals.contains(name)
    }

    /// Whether `name` is taken by a module, sequence or external producer.
    pub fn contains(&self, name: &str) -> bool {
        self.modules.contains_key(name) || self.sequences.contains_key(name) || self.externals.contains(name)
    }

    fn ensure_available(&self, name: &str) -> Result<()> {
        if self.contains(name) {
            DuplicateInstanceName { name }.log();
            return Err(ConfigError::DuplicateInstanceName {
                name: name.to_string(),
            });
        }
        Ok(())
    }

    fn check_steps(&self, name: &str, steps: &[String]) -> Result<()> {
        if let Some(external) = steps.iter().find(|step| self.externals.contains(step.as_str())) {
            return Err(ConfigError::UnknownReference {
                name: external.clone(),
            });
        }
        self.flattener(Resolution::Lenient)
            .with_pending(name, steps)
            .flatten(name)
            .map(|_| ())
            .inspect_err(log_cycle)
    }

    fn flattener(&self, resolution: Resolution) -> Flattener<'_> {
        Flattener::new(&self.modules, &self.sequences, resolution)
    }
}

fn log_cycle(error: &ConfigError) {
    if let ConfigError::CyclicReference { cycle } = error {
        CyclicReferenceDetected { cycle }.log();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::descriptor::Lifecycle;
    use crate::params::{TagReference, Value};
    use pretty_assertions::assert_eq;

    const TRACKLET: &str = "TTTracksFromTrackletEmulation";
    const EXTENDED: &str = "TTTracksFromExtendedTrackletEmulation";

    fn tracklet_parameters() -> ParameterBag {
        ParameterBag::new()
            .with(
                "TTStubSource",
                TagReference::new("TTStubsFromPhase2TrackerDigis").with_label("StubAccepted"),
            )
            .with("BeamSpotSource", TagReference::new("offlineBeamSpot"))
            .with_untracked("asciiFileName", "")
            .with("Extended", false)
            .with("Hnpar", 4u32)
            .with("wiresFile", Value::file("wires_hourglass.dat"))
            .with("Quality", false)
    }

    fn registry_with_tracklet() -> Registry {
        let mut registry = Registry::new();
        registry.declare_external("TTStubsFromPhase2TrackerDigis").unwrap();
        registry.define("BeamSpotProducer", "offlineBeamSpot", ParameterBag::new()).unwrap();
        registry
            .define("L1FPGATrackProducer", TRACKLET, tracklet_parameters())
            .unwrap();
        registry
    }

    fn extended_overrides() -> ParameterBag {
        ParameterBag::new()
            .with("Extended", true)
            .with("Hnpar", 5u32)
            .with("wiresFile", Value::file("wires_hourglassExtended.dat"))
    }

    #[test]
    fn extended_clone_shares_untouched_parameters() {
        let mut registry = registry_with_tracklet();
        registry
            .clone_module(TRACKLET, EXTENDED, &extended_overrides())
            .unwrap();

        let base = registry.get_module(TRACKLET).unwrap();
        let extended = registry.get_module(EXTENDED).unwrap();

        assert_eq!(extended.kind(), base.kind());
        assert_eq!(extended.get("Hnpar").unwrap(), &Value::Uint32(5));
        assert_eq!(extended.get("Extended").unwrap(), &Value::Bool(true));
        assert_eq!(
            extended.get("wiresFile").unwrap(),
            &Value::file("wires_hourglassExtended.dat")
        );
        for untouched in ["TTStubSource", "BeamSpotSource", "asciiFileName", "Quality"] {
            assert_eq!(
                extended.parameters().parameter(untouched),
                base.parameters().parameter(untouched),
                "{} should be shared",
                untouched
            );
        }
        let changed: Vec<&str> = base.diff(extended).iter().map(|d| d.name()).collect();
        assert_eq!(changed, vec!["Extended", "Hnpar", "wiresFile"]);
    }

    #[test]
    fn clone_leaves_source_untouched() {
        let mut registry = registry_with_tracklet();
        let before = registry.get_module(TRACKLET).unwrap().parameters().clone();
        let order_before: Vec<String> = before.names().map(String::from).collect();

        registry
            .clone_module(TRACKLET, EXTENDED, &extended_overrides().with("tableTEDFile", Value::file("t.txt")))
            .unwrap();

        let after = registry.get_module(TRACKLET).unwrap().parameters();
        assert_eq!(after, &before);
        let order_after: Vec<String> = after.names().map(String::from).collect();
        assert_eq!(order_after, order_before);
        assert!(!after.contains("tableTEDFile"));
    }

    #[test]
    fn chained_clones_equal_one_combined_clone() {
        let mut registry = registry_with_tracklet();
        let first = ParameterBag::new().with("Quality_Algorithm", "Cut");
        let second = ParameterBag::new()
            .with("maxZ0", 15.0)
            .with("nStubsmin", 4i32);

        registry.clone_module(TRACKLET, "step1", &first).unwrap();
        registry.clone_module("step1", "step2", &second).unwrap();
        registry
            .clone_module(TRACKLET, "combined", &first.merge(&second))
            .unwrap();

        let stepwise = registry.get_module("step2").unwrap();
        let combined = registry.get_module("combined").unwrap();
        assert_eq!(stepwise.parameters(), combined.parameters());
        assert_eq!(stepwise.kind(), combined.kind());
        assert_eq!(stepwise.cloned_from(), Some("step1"));
    }

    #[test]
    fn duplicate_instance_names_are_rejected() {
        let mut registry = registry_with_tracklet();
        let duplicate = registry.define("Other", TRACKLET, ParameterBag::new());
        assert!(matches!(
            duplicate,
            Err(ConfigError::DuplicateInstanceName { ref name }) if name == TRACKLET
        ));

        let clone = registry.clone_module(TRACKLET, "offlineBeamSpot", &ParameterBag::new());
        assert!(matches!(clone, Err(ConfigError::DuplicateInstanceName { .. })));

        let external = registry.define("Other", "TTStubsFromPhase2TrackerDigis", ParameterBag::new());
        assert!(matches!(external, Err(ConfigError::DuplicateInstanceName { .. })));

        registry.sequence("seq", [TRACKLET]).unwrap();
        assert!(matches!(
            registry.define("Other", "seq", ParameterBag::new()),
            Err(ConfigError::DuplicateInstanceName { .. })
        ));
        assert!(matches!(
            registry.sequence(TRACKLET, ["offlineBeamSpot"]),
            Err(ConfigError::DuplicateInstanceName { .. })
        ));

        assert!(registry.define("Other", "distinctName", ParameterBag::new()).is_ok());
    }

    #[test]
    fn clone_of_unknown_source_fails() {
        let mut registry = Registry::new();
        assert_eq!(
            registry
                .clone_module("missing", "copy", &ParameterBag::new())
                .map(|_| ()),
            Err(ConfigError::UnknownReference {
                name: "missing".to_string()
            })
        );
        assert!(!registry.contains("copy"));
    }

    #[test]
    fn invalid_tag_reference_rejects_definition() {
        let mut registry = Registry::new();
        let result = registry.define(
            "TTTrackAssociator",
            "associator",
            ParameterBag::new().with("TTTracks", vec![TagReference::new("")]),
        );
        assert!(matches!(result, Err(ConfigError::InvalidTagReference { .. })));
        assert!(!registry.contains("associator"));
    }

    #[test]
    fn producer_before_consumer_validates() {
        let mut registry = registry_with_tracklet();
        registry
            .sequence("L1HybridTracks", ["offlineBeamSpot", TRACKLET])
            .unwrap();
        registry
            .sequence("misordered", [TRACKLET, "offlineBeamSpot"])
            .unwrap();

        assert!(registry.validate_dependencies("L1HybridTracks").is_ok());

        let errors = registry.validate_dependencies("misordered").unwrap_err();
        assert_eq!(
            errors,
            vec![ConfigError::UnresolvedDependency {
                sequence: "misordered".to_string(),
                module: TRACKLET.to_string(),
                parameter: "BeamSpotSource".to_string(),
                producer: "offlineBeamSpot".to_string(),
            }]
        );
        assert_eq!(registry.validate_all().unwrap_err().len(), 1);
    }

    #[test]
    fn validation_is_not_forced_by_composition() {
        let mut registry = registry_with_tracklet();
        registry.sequence("misordered", [TRACKLET, "offlineBeamSpot"]).unwrap();
        let published = registry.finalize().unwrap();
        assert!(published.validate_dependencies("misordered").is_err());
    }

    #[test]
    fn embedded_fragment_validates_alongside_its_parent() {
        let mut registry = registry_with_tracklet();
        registry
            .define(
                "TTTrackAssociator",
                "associator",
                ParameterBag::new().with("TTTracks", vec![TagReference::new(TRACKLET).with_label("Level1TTTracks")]),
            )
            .unwrap();
        registry.sequence("associators", ["associator"]).unwrap();
        registry
            .sequence("withAssociators", ["offlineBeamSpot", TRACKLET, "associators"])
            .unwrap();

        assert!(registry.validate_dependencies("associators").is_ok());
        assert!(registry.validate_dependencies("withAssociators").is_ok());
        assert!(registry.validate_all().is_ok());

        registry
            .sequence("associatorFirst", ["associators", TRACKLET])
            .unwrap();
        assert_eq!(registry.validate_all().unwrap_err().len(), 1);
    }

    #[test]
    fn consumer_of_unregistered_producer_fails() {
        let mut registry = registry_with_tracklet();
        registry
            .define(
                "TTTrackAssociator",
                "associator",
                ParameterBag::new().with("TTTracks", vec![TagReference::new("neverDefined").with_label("Level1TTTracks")]),
            )
            .unwrap();
        registry.sequence("associators", ["associator"]).unwrap();
        assert!(matches!(
            registry.validate_dependencies("associators").unwrap_err().as_slice(),
            [ConfigError::UnresolvedDependency { producer, .. }] if producer == "neverDefined"
        ));
    }

    #[test]
    fn self_embedding_sequence_is_rejected() {
        let mut registry = registry_with_tracklet();
        let result = registry.sequence("loop", ["offlineBeamSpot", "loop"]);
        assert_eq!(
            result.map(|_| ()),
            Err(ConfigError::CyclicReference {
                cycle: vec!["loop".to_string(), "loop".to_string()]
            })
        );
        assert!(registry.get_sequence("loop").is_err());
    }

    #[test]
    fn transitive_self_embedding_is_rejected() {
        let mut registry = registry_with_tracklet();
        // forward reference to a sequence defined next
        registry.sequence("outer", ["offlineBeamSpot", "inner"]).unwrap();
        let result = registry.sequence("inner", [TRACKLET, "outer"]);
        assert_eq!(
            result.map(|_| ()),
            Err(ConfigError::CyclicReference {
                cycle: vec!["inner".to_string(), "outer".to_string(), "inner".to_string()]
            })
        );
    }

    #[test]
    fn extension_closing_a_loop_is_rejected() {
        let mut registry = registry_with_tracklet();
        registry.sequence("a", ["b"]).unwrap();
        registry.sequence("b", ["offlineBeamSpot"]).unwrap();
        let result = registry.extend_sequence("b", ["a"]);
        assert!(matches!(result, Err(ConfigError::CyclicReference { .. })));
        assert_eq!(registry.get_sequence("b").unwrap().steps(), ["offlineBeamSpot"]);

        registry.extend_sequence("b", [TRACKLET]).unwrap();
        assert_eq!(registry.flatten("a").unwrap(), vec!["offlineBeamSpot", TRACKLET]);
    }

    #[test]
    fn forward_reference_must_resolve_before_flattening() {
        let mut registry = registry_with_tracklet();
        registry.sequence("outer", ["offlineBeamSpot", "later"]).unwrap();
        assert_eq!(
            registry.flatten("outer"),
            Err(ConfigError::UnknownReference {
                name: "later".to_string()
            })
        );
        registry.sequence("later", [TRACKLET]).unwrap();
        assert_eq!(registry.flatten("outer").unwrap(), vec!["offlineBeamSpot", TRACKLET]);
    }

    #[test]
    fn external_producer_cannot_be_scheduled() {
        let mut registry = registry_with_tracklet();
        let result = registry.sequence("seq", ["TTStubsFromPhase2TrackerDigis"]);
        assert!(matches!(result, Err(ConfigError::UnknownReference { .. })));
    }

    #[test]
    fn modify_applies_to_drafts_only() {
        let mut registry = registry_with_tracklet();
        registry
            .modify(TRACKLET, &ParameterBag::new().with("Hnpar", 6u32))
            .unwrap();
        assert_eq!(registry.get_module(TRACKLET).unwrap().parameters().get_u32("Hnpar").unwrap(), 6);

        registry.publish(TRACKLET).unwrap();
        let module = registry.get_module(TRACKLET).unwrap();
        assert_eq!(module.lifecycle(), Lifecycle::Published);
        assert!(module.parameters().is_frozen());

        assert_eq!(
            registry
                .modify(TRACKLET, &ParameterBag::new().with("Hnpar", 7u32))
                .map(|_| ()),
            Err(ConfigError::AlreadyPublished {
                name: TRACKLET.to_string()
            })
        );
    }

    #[test]
    fn published_module_can_still_be_cloned() {
        let mut registry = registry_with_tracklet();
        registry.publish(TRACKLET).unwrap();
        let extended = registry
            .clone_module(TRACKLET, EXTENDED, &extended_overrides())
            .unwrap();
        assert_eq!(extended.lifecycle(), Lifecycle::Draft);
        assert!(!extended.parameters().is_frozen());
    }

    #[test]
    fn publishing_a_sequence_publishes_nested_sequences() {
        let mut registry = registry_with_tracklet();
        registry.sequence("inner", [TRACKLET]).unwrap();
        registry.sequence("outer", ["offlineBeamSpot", "inner"]).unwrap();
        registry.sequence("unrelated", ["offlineBeamSpot"]).unwrap();

        registry.publish("outer").unwrap();

        assert!(registry.get_sequence("outer").unwrap().is_published());
        assert!(registry.get_sequence("inner").unwrap().is_published());
        assert!(!registry.get_sequence("unrelated").unwrap().is_published());
        assert!(matches!(
            registry.extend_sequence("inner", ["offlineBeamSpot"]),
            Err(ConfigError::AlreadyPublished { .. })
        ));
        // modules are published individually
        assert!(!registry.get_module(TRACKLET).unwrap().is_published());
    }

    #[test]
    fn publishing_unknown_name_fails() {
        let mut registry = Registry::new();
        assert_eq!(
            registry.publish("nothing"),
            Err(ConfigError::UnknownReference {
                name: "nothing".to_string()
            })
        );
    }

    #[test]
    fn finalize_requires_resolvable_sequences() {
        let mut registry = registry_with_tracklet();
        registry.sequence("outer", ["offlineBeamSpot", "neverDefined"]).unwrap();
        assert!(matches!(
            registry.finalize(),
            Err(ConfigError::UnknownReference { ref name }) if name == "neverDefined"
        ));
    }

    #[test]
    fn finalize_publishes_everything() {
        let mut registry = registry_with_tracklet();
        registry.clone_module(TRACKLET, EXTENDED, &extended_overrides()).unwrap();
        registry.sequence("inner", [TRACKLET]).unwrap();
        registry.sequence("outer", ["offlineBeamSpot", "inner", EXTENDED]).unwrap();

        let published = registry.finalize().unwrap();
        assert!(published.modules().all(|m| m.is_published() && m.parameters().is_frozen()));
        assert_eq!(
            published.sequence("outer").unwrap().modules(),
            ["offlineBeamSpot", TRACKLET, EXTENDED]
        );
        assert_eq!(published.sequence("outer").unwrap().steps(), ["offlineBeamSpot", "inner", EXTENDED]);
        assert!(published.is_external("TTStubsFromPhase2TrackerDigis"));
    }
}
