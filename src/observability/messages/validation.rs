// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for configuration validation warnings and errors.
//!
//! This module contains message types for logging events related to:
//! * Cyclic sequence reference detection
//! * Dependency-order validation of sequences
//! * Duplicate instance name detection

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use tracing::Span;

/// Cyclic sequence reference detected.
///
/// # Log Level
/// `error!` - Failure requiring attention
///
/// # Example
/// ```
/// use pset_compose::observability::messages::validation::CyclicReferenceDetected;
///
/// let cycle = vec!["A".to_string(), "B".to_string(), "A".to_string()];
/// let msg = CyclicReferenceDetected {
///     cycle: &cycle,
/// };
///
/// tracing::error!("{}", msg);
/// ```
pub struct CyclicReferenceDetected<'a> {
    pub cycle: &'a [String],
}

impl Display for CyclicReferenceDetected<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Cyclic sequence reference detected: {}", self.cycle.join(" -> "))
    }
}

impl StructuredLog for CyclicReferenceDetected<'_> {
    fn log(&self) {
        tracing::error!(
            cycle = self.cycle.join(" -> "),
            cycle_length = self.cycle.len(),
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::span!(
            tracing::Level::ERROR,
            "span_name",
            name = name,
            cycle = self.cycle.join(" -> "),
            cycle_length = self.cycle.len(),
        )
    }
}

/// A module consumes an output whose producer does not run before it.
///
/// # Log Level
/// `error!` - Failure requiring attention
///
/// # Example
/// ```
/// use pset_compose::observability::messages::validation::UnresolvedDependency;
///
/// let msg = UnresolvedDependency {
///     sequence: "L1HybridTracksWithAssociators",
///     module: "TrackTriggerAssociatorTracks",
///     producer: "TTTracksFromTrackletEmulation",
/// };
///
/// tracing::error!("{}", msg);
/// ```
pub struct UnresolvedDependency<'a> {
    pub sequence: &'a str,
    pub module: &'a str,
    pub producer: &'a str,
}

impl Display for UnresolvedDependency<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Module '{}' in sequence '{}' consumes '{}' which does not run before it",
            self.module, self.sequence, self.producer
        )
    }
}

impl StructuredLog for UnresolvedDependency<'_> {
    fn log(&self) {
        tracing::error!(
            sequence = self.sequence,
            module = self.module,
            producer = self.producer,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::span!(
            tracing::Level::ERROR,
            "span_name",
            name = name,
            sequence = self.sequence,
            module = self.module,
            producer = self.producer,
        )
    }
}

/// An instance name was registered twice.
///
/// # Log Level
/// `error!` - Failure requiring attention
pub struct DuplicateInstanceName<'a> {
    pub name: &'a str,
}

impl Display for DuplicateInstanceName<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Instance name '{}' is already registered", self.name)
    }
}

impl StructuredLog for DuplicateInstanceName<'_> {
    fn log(&self) {
        tracing::error!(instance_name = self.name, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::span!(
            tracing::Level::ERROR,
            "span_name",
            name = name,
            instance_name = self.name,
        )
    }
}

/// Dependency-order validation of one sequence finished.
///
/// # Log Level
/// `info!` when clean, `warn!` when violations were found
pub struct DependenciesValidated<'a> {
    pub sequence: &'a str,
    pub module_count: usize,
    pub violation_count: usize,
}

impl Display for DependenciesValidated<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        if self.violation_count == 0 {
            write!(
                f,
                "Sequence '{}' dependency order is valid ({} modules)",
                self.sequence, self.module_count
            )
        } else {
            write!(
                f,
                "Sequence '{}' has {} dependency-order violations ({} modules)",
                self.sequence, self.violation_count, self.module_count
            )
        }
    }
}

impl StructuredLog for DependenciesValidated<'_> {
    fn log(&self) {
        if self.violation_count == 0 {
            tracing::info!(
                sequence = self.sequence,
                module_count = self.module_count,
                "{}", self
            );
        } else {
            tracing::warn!(
                sequence = self.sequence,
                module_count = self.module_count,
                violation_count = self.violation_count,
                "{}", self
            );
        }
    }

    fn span(&self, name: &str) -> Span {
        tracing::span!(
            tracing::Level::INFO,
            "span_name",
            name = name,
            sequence = self.sequence,
            module_count = self.module_count,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dependency_summary_wording_follows_violations() {
        let clean = DependenciesValidated {
            sequence: "L1HybridTracks",
            module_count: 2,
            violation_count: 0,
        };
        assert!(clean.to_string().contains("is valid"));

        let broken = DependenciesValidated {
            violation_count: 1,
            ..clean
        };
        assert!(broken.to_string().contains("1 dependency-order violations"));
    }
}
