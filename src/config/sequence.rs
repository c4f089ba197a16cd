// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Sequences and their flattening.
//!
//! A sequence is an ordered list of steps; each step names either a module
//! instance or another sequence. Flattening expands nested sequences in place
//! and yields the ordered module instance names the sequence schedules.
//!
//! # Cycle Detection
//!
//! Flattening is a depth-first expansion that keeps the current embedding path
//! as a recursion stack:
//! - a sequence found on the stack closes a cycle, reported with its path
//! - a sequence fully expanded once is not expanded again, since a module is
//!   only scheduled at its first position
//!
//! **Time Complexity**: O(S + E) where S = sequences, E = steps

use crate::config::descriptor::{Lifecycle, ModuleDescriptor};
use crate::errors::{ConfigError, Result};
use indexmap::{IndexMap, IndexSet};
use serde::Serialize;
use std::collections::HashSet;

/// A named, ordered composition of module and sequence references
#[derive(Debug, Clone, Serialize)]
pub struct Sequence {
    #[serde(skip)]
    name: String,
    steps: Vec<String>,
    #[serde(skip)]
    lifecycle: Lifecycle,
}

impl Sequence {
    pub(crate) fn new(name: String, steps: Vec<String>) -> Self {
        Self {
            name,
            steps,
            lifecycle: Lifecycle::Draft,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Steps as written, before flattening
    pub fn steps(&self) -> &[String] {
        &self.steps
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    pub fn is_published(&self) -> bool {
        self.lifecycle == Lifecycle::Published
    }

    pub(crate) fn extend(&mut self, steps: Vec<String>) {
        self.steps.extend(steps);
    }

    pub(crate) fn publish(&mut self) {
        self.lifecycle = Lifecycle::Published;
    }
}

/// How flattening treats a step naming nothing registered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Resolution {
    /// Fail with `UnknownReference`
    Strict,
    /// Skip it; the step may be defined later
    Lenient,
}

/// Expands sequences over a snapshot of the registry's modules and sequences.
///
/// `pending` stands in for a sequence whose definition is being checked before
/// it is stored, so a rejected definition never touches the registry.
pub(crate) struct Flattener<'a> {
    modules: &'a IndexMap<String, ModuleDescriptor>,
    sequences: &'a IndexMap<String, Sequence>,
    pending: Option<(&'a str, &'a [String])>,
    resolution: Resolution,
}

impl<'a> Flattener<'a> {
    pub(crate) fn new(
        modules: &'a IndexMap<String, ModuleDescriptor>,
        sequences: &'a IndexMap<String, Sequence>,
        resolution: Resolution,
    ) -> Self {
        Self {
            modules,
            sequences,
            pending: None,
            resolution,
        }
    }

    pub(crate) fn with_pending(mut self, name: &'a str, steps: &'a [String]) -> Self {
        self.pending = Some((name, steps));
        self
    }

    /// Ordered, de-duplicated module instance names scheduled by `name`.
    pub(crate) fn flatten(&self, name: &str) -> Result<Vec<String>> {
        let mut path = Vec::new();
        let mut expanded = HashSet::new();
        let mut order = IndexSet::new();
        self.visit(name, &mut path, &mut expanded, &mut order)?;
        Ok(order.into_iter().collect())
    }

    /// Every sequence reachable from `name`, itself included.
    pub(crate) fn reachable_sequences(&self, name: &str) -> Result<Vec<String>> {
        let mut seen = IndexSet::new();
        let mut stack = vec![name.to_string()];
        while let Some(current) = stack.pop() {
            let Some(steps) = self.steps_of(&current)? else {
                continue;
            };
            if !seen.insert(current) {
                continue;
            }
            for step in steps.iter().rev() {
                if !self.modules.contains_key(step) {
                    stack.push(step.clone());
                }
            }
        }
        Ok(seen.into_iter().collect())
    }

    fn steps_of(&self, name: &str) -> Result<Option<&'a [String]>> {
        if let Some((pending_name, steps)) = self.pending {
            if pending_name == name {
                return Ok(Some(steps));
            }
        }
        match self.sequences.get(name) {
            Some(sequence) => Ok(Some(sequence.steps.as_slice())),
            None => match self.resolution {
                Resolution::Strict => Err(ConfigError::UnknownReference {
                    name: name.to_string(),
                }),
                Resolution::Lenient => Ok(None),
            },
        }
    }

    fn visit(
        &self,
        name: &str,
        path: &mut Vec<String>,
        expanded: &mut HashSet<String>,
        order: &mut IndexSet<String>,
    ) -> Result<()> {
        if self.modules.contains_key(name) {
            order.insert(name.to_string());
            return Ok(());
        }

        if let Some(start) = path.iter().position(|entry| entry == name) {
            let mut cycle = path[start..].to_vec();
            cycle.push(name.to_string()); // close the cycle
            return Err(ConfigError::CyclicReference { cycle });
        }

        if expanded.contains(name) {
            return Ok(());
        }

        let Some(steps) = self.steps_of(name)? else {
            return Ok(());
        };

        path.push(name.to_string());
        for step in steps {
            self.visit(step, path, expanded, order)?;
        }
        path.pop();
        expanded.insert(name.to_string());
        Ok(())
    }
}
