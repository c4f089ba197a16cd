// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Dependency-order validation for flattened sequences.
//!
//! A module consumes another module's output through a tag reference. In any
//! sequence scheduling both, the producer must run before the consumer. A
//! producer the sequence does not schedule is left alone when it is a
//! registered module or declared external: the sequence is then a fragment
//! embedded after its producers elsewhere. A producer that is neither is
//! dangling everywhere.
//!
//! # Algorithm
//!
//! Index the flattened order by position, then check each tag reference:
//! - **Time Complexity**: O(M + T) where M = modules, T = tag references
//! - **Space Complexity**: O(M) for the position index
//!
//! All violations are accumulated so a user sees every misordered module at
//! once rather than fixing them one by one.
//!
//! The check is advisory and runs only on demand; composition and
//! publication never force it.

use crate::config::descriptor::ModuleDescriptor;
use crate::errors::ConfigError;
use crate::observability::messages::validation::{DependenciesValidated, UnresolvedDependency};
use crate::observability::messages::StructuredLog;
use indexmap::{IndexMap, IndexSet};
use std::collections::HashMap;

/// Validates that no module in `order` consumes an output of a module
/// scheduled at or after its own position, or of a producer that is neither
/// registered nor external.
///
/// # Arguments
///
/// * `sequence` - Name of the sequence, for error reporting
/// * `order` - The sequence's flattened module instance names
/// * `modules` - All module descriptors by instance name
/// * `externals` - Producers supplied outside the configuration
///
/// # Returns
///
/// * `Ok(())` - Every consumed producer scheduled here runs first
/// * `Err(Vec<ConfigError>)` - One `UnresolvedDependency` per offending tag reference
pub(crate) fn validate_order(
    sequence: &str,
    order: &[String],
    modules: &IndexMap<String, ModuleDescriptor>,
    externals: &IndexSet<String>,
) -> Result<(), Vec<ConfigError>> {
    let positions: HashMap<&str, usize> = order
        .iter()
        .enumerate()
        .map(|(position, name)| (name.as_str(), position))
        .collect();
    let mut errors = Vec::new();

    for (position, name) in order.iter().enumerate() {
        if let Some(module) = modules.get(name) {
            for (parameter, tag) in module.parameters().tag_references() {
                let producer = tag.producer();
                let satisfied = match positions.get(producer) {
                    Some(&scheduled_at) => scheduled_at < position,
                    None => externals.contains(producer) || modules.contains_key(producer),
                };
                if satisfied {
                    continue;
                }

                UnresolvedDependency {
                    sequence,
                    module: name,
                    producer,
                }
                .log();

                errors.push(ConfigError::UnresolvedDependency {
                    sequence: sequence.to_string(),
                    module: name.clone(),
                    parameter: parameter.to_string(),
                    producer: producer.to_string(),
                });
            }
        }
    }

    DependenciesValidated {
        sequence,
        module_count: order.len(),
        violation_count: errors.len(),
    }
    .log();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
