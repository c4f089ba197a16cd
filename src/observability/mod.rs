// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Observability module for structured logging and tracing.
//!
//! This module provides centralized message types for all diagnostic and operational
//! logging in the composition engine. Message types follow a struct-based pattern
//! with `Display` trait implementation to:
//!
//! * Eliminate magic strings scattered throughout the codebase
//! * Keep field names consistent between the text and the structured output
//! * Provide consistent, structured logging output
//!
//! # Architecture
//!
//! Messages are organized by subsystem:
//! * `messages::registry` - module and sequence definition and publication events
//! * `messages::validation` - cycle and dependency-order validation events
//! * `messages::loader` - declarative document loading events
//!
//! # Usage
//!
//! ```rust
//! use pset_compose::observability::messages::registry::ModuleCloned;
//! use pset_compose::observability::messages::StructuredLog;
//!
//! let overridden = vec!["Extended", "Hnpar"];
//! let msg = ModuleCloned {
//!     source: "TTTracksFromTrackletEmulation",
//!     instance_name: "TTTracksFromExtendedTrackletEmulation",
//!     overridden: &overridden,
//! };
//!
//! msg.log();
//! ```

pub mod messages;

use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_LEVEL: &str = "info";

/// Install a formatting subscriber on stderr.
///
/// An explicit `level` wins; otherwise `RUST_LOG` is used, falling back to
/// `info` when it is unset or unparsable. Later calls leave the first
/// subscriber in place.
pub fn init_tracing(level: Option<&str>) {
    let filter = match level {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_LEVEL)),
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
