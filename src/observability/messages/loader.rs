// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for declarative document loading.

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use std::path::Path;
use tracing::Span;

/// A document was parsed and its definitions replayed.
///
/// # Log Level
/// `info!` - Important operational event
pub struct DocumentLoaded<'a> {
    pub path: &'a Path,
    pub import_count: usize,
    pub definition_count: usize,
}

impl Display for DocumentLoaded<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Loaded '{}': {} imports, {} definitions",
            self.path.display(),
            self.import_count,
            self.definition_count
        )
    }
}

impl StructuredLog for DocumentLoaded<'_> {
    fn log(&self) {
        tracing::info!(
            path = %self.path.display(),
            import_count = self.import_count,
            definition_count = self.definition_count,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "load_document",
            span_name = name,
            path = %self.path.display(),
        )
    }
}

/// An import named a document that was already loaded.
///
/// # Log Level
/// `debug!` - Import resolution detail
pub struct ImportAlreadyLoaded<'a> {
    pub path: &'a Path,
    pub imported_by: &'a Path,
}

impl Display for ImportAlreadyLoaded<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Skipping import of '{}' from '{}': already loaded",
            self.path.display(),
            self.imported_by.display()
        )
    }
}

impl StructuredLog for ImportAlreadyLoaded<'_> {
    fn log(&self) {
        tracing::debug!(
            path = %self.path.display(),
            imported_by = %self.imported_by.display(),
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::span!(
            tracing::Level::DEBUG,
            "span_name",
            name = name,
            path = %self.path.display(),
        )
    }
}
