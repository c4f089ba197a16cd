// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Centralized message types for structured logging.
//!
//! Each message type implements `Display` for the human-readable line and
//! [`StructuredLog`] for emitting the same event with structured fields.
//!
//! # Organization
//!
//! * `registry` - module and sequence lifecycle events
//! * `validation` - cycle and dependency-order failures
//! * `loader` - document loading and import resolution
//!
//! # Usage Pattern
//!
//! ```rust
//! use pset_compose::observability::messages::registry::SequenceDefined;
//!
//! let msg = SequenceDefined {
//!     name: "L1HybridTracks",
//!     step_count: 2,
//! };
//!
//! tracing::info!("{}", msg);
//! ```

use std::fmt::Display;
use tracing::Span;

pub mod loader;
pub mod registry;
pub mod validation;

/// A log event that knows its own level and structured fields.
pub trait StructuredLog: Display {
    /// Emit the event at its level with structured fields.
    fn log(&self);

    /// Open a span carrying the event's fields.
    fn span(&self, name: &str) -> Span;
}
