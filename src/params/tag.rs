// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::errors::{ConfigError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Names an output produced by a module instance.
///
/// The textual form is `producer[:label[:process]]`, e.g.
/// `TTStubsFromPhase2TrackerDigis:StubAccepted`. A tag without a label
/// (`offlineBeamSpot`) refers to the producer's unlabeled output. Resolution
/// happens in the external framework; this type only carries and checks the
/// shape.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TagReference {
    producer: String,
    label: Option<String>,
    process: Option<String>,
}

impl TagReference {
    /// Reference the unlabeled output of `producer`
    pub fn new(producer: impl Into<String>) -> Self {
        Self {
            producer: producer.into(),
            label: None,
            process: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_process(mut self, process: impl Into<String>) -> Self {
        self.process = Some(process.into());
        self
    }

    pub fn producer(&self) -> &str {
        &self.producer
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn process(&self) -> Option<&str> {
        self.process.as_deref()
    }

    /// Checks that the producer is non-empty and that any label or process
    /// given is non-empty too.
    pub fn validate(&self) -> Result<()> {
        if self.producer.trim().is_empty() {
            return Err(self.invalid("producer name is empty"));
        }
        if matches!(self.label.as_deref(), Some(label) if label.trim().is_empty()) {
            return Err(self.invalid("output label is empty"));
        }
        if matches!(self.process.as_deref(), Some(process) if process.trim().is_empty()) {
            return Err(self.invalid("process name is empty"));
        }
        Ok(())
    }

    fn invalid(&self, reason: &str) -> ConfigError {
        ConfigError::InvalidTagReference {
            tag: self.to_string(),
            reason: reason.to_string(),
        }
    }
}

impl fmt::Display for TagReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.producer)?;
        match (&self.label, &self.process) {
            (Some(label), Some(process)) => write!(f, ":{}:{}", label, process),
            (Some(label), None) => write!(f, ":{}", label),
            // a process without a label keeps the empty label slot
            (None, Some(process)) => write!(f, "::{}", process),
            (None, None) => Ok(()),
        }
    }
}

impl FromStr for TagReference {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self> {
        let parts: Vec<&str> = s.split(':').collect();
        let tag = match parts.as_slice() {
            [producer] => TagReference::new(*producer),
            [producer, label] => TagReference::new(*producer).with_label(*label),
            [producer, "", process] => TagReference::new(*producer).with_process(*process),
            [producer, label, process] => TagReference::new(*producer)
                .with_label(*label)
                .with_process(*process),
            _ => {
                return Err(ConfigError::InvalidTagReference {
                    tag: s.to_string(),
                    reason: "expected producer[:label[:process]]".to_string(),
                })
            }
        };
        tag.validate()?;
        Ok(tag)
    }
}

impl TryFrom<String> for TagReference {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<TagReference> for String {
    fn from(tag: TagReference) -> Self {
        tag.to_string()
    }
}
