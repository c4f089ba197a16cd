// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Ordered, copy-on-override parameter sets.

use crate::errors::{ConfigError, Result};
use crate::params::{TagReference, Value};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A value plus its tracking flag.
///
/// Untracked parameters (e.g. debug dump file names) do not take part in the
/// provenance of a configuration. They are carried and dumped like any other
/// parameter but flagged so external tooling can leave them out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    #[serde(flatten)]
    pub value: Value,
    #[serde(default, skip_serializing_if = "is_false")]
    pub untracked: bool,
}

fn is_false(flag: &bool) -> bool {
    !*flag
}

impl Parameter {
    pub fn tracked(value: impl Into<Value>) -> Self {
        Self {
            value: value.into(),
            untracked: false,
        }
    }

    pub fn untracked(value: impl Into<Value>) -> Self {
        Self {
            value: value.into(),
            untracked: true,
        }
    }
}

/// A difference between two bags, as reported by [`ParameterBag::diff`]
#[derive(Debug, Clone, PartialEq)]
pub enum ParameterDiff<'a> {
    Added {
        name: &'a str,
        value: &'a Value,
    },
    Removed {
        name: &'a str,
        value: &'a Value,
    },
    Changed {
        name: &'a str,
        before: &'a Value,
        after: &'a Value,
    },
    /// Same name, tracked in one bag and untracked in the other
    TrackingChanged { name: &'a str, untracked: bool },
}

impl<'a> ParameterDiff<'a> {
    pub fn name(&self) -> &'a str {
        match self {
            ParameterDiff::Added { name, .. }
            | ParameterDiff::Removed { name, .. }
            | ParameterDiff::Changed { name, .. }
            | ParameterDiff::TrackingChanged { name, .. } => name,
        }
    }
}

/// Ordered mapping from parameter name to typed value.
///
/// Names are unique and insertion order is preserved, so dumps of the same
/// definitions are reproducible. Overriding an existing name keeps its
/// position; new names are appended.
///
/// A bag is frozen once the module owning it is published, or explicitly
/// through [`into_frozen`](ParameterBag::into_frozen); `set` on a frozen bag
/// fails with [`ConfigError::DuplicateDefinition`]. Copies made with
/// `clone` or [`merge`](ParameterBag::merge) start out unfrozen.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParameterBag {
    entries: IndexMap<String, Parameter>,
    #[serde(skip)]
    frozen: bool,
}

impl Clone for ParameterBag {
    fn clone(&self) -> Self {
        Self {
            entries: self.entries.clone(),
            frozen: false,
        }
    }
}

/// Content equality; order and the frozen flag are not compared.
impl PartialEq for ParameterBag {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl ParameterBag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite a tracked parameter.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) -> Result<()> {
        self.insert(name, Parameter::tracked(value))
    }

    /// Insert or overwrite an untracked parameter.
    pub fn set_untracked(&mut self, name: impl Into<String>, value: impl Into<Value>) -> Result<()> {
        self.insert(name, Parameter::untracked(value))
    }

    pub fn insert(&mut self, name: impl Into<String>, parameter: Parameter) -> Result<()> {
        let name = name.into();
        if self.frozen {
            return Err(ConfigError::DuplicateDefinition { parameter: name });
        }
        self.entries.insert(name, parameter);
        Ok(())
    }

    /// Builder-style insert for bags under construction.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.entries.insert(name.into(), Parameter::tracked(value));
        self
    }

    /// Builder-style insert of an untracked parameter.
    pub fn with_untracked(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.entries.insert(name.into(), Parameter::untracked(value));
        self
    }

    pub fn get(&self, name: &str) -> Result<&Value> {
        self.entries
            .get(name)
            .map(|parameter| &parameter.value)
            .ok_or_else(|| ConfigError::UnknownParameter {
                parameter: name.to_string(),
            })
    }

    pub fn parameter(&self, name: &str) -> Option<&Parameter> {
        self.entries.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Parameter)> {
        self.entries.iter().map(|(name, parameter)| (name.as_str(), parameter))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    pub(crate) fn freeze(&mut self) {
        self.frozen = true;
    }

    /// This bag, frozen: every later `set` fails.
    ///
    /// ```
    /// use pset_compose::errors::ConfigError;
    /// use pset_compose::params::ParameterBag;
    ///
    /// let mut bag = ParameterBag::new().with("Hnpar", 4u32).into_frozen();
    /// assert_eq!(
    ///     bag.set("Hnpar", 5u32),
    ///     Err(ConfigError::DuplicateDefinition { parameter: "Hnpar".to_string() })
    /// );
    /// ```
    pub fn into_frozen(mut self) -> Self {
        self.freeze();
        self
    }

    /// A new bag equal to `self` with every entry of `overrides` replacing the
    /// same name in place or appended after the existing names. `self` is
    /// never touched.
    pub fn merge(&self, overrides: &ParameterBag) -> ParameterBag {
        let mut merged = self.clone();
        for (name, parameter) in &overrides.entries {
            merged.entries.insert(name.clone(), parameter.clone());
        }
        merged
    }

    /// Every tag reference in the bag with the name of the parameter holding it.
    pub fn tag_references(&self) -> Vec<(&str, &TagReference)> {
        self.iter()
            .flat_map(|(name, parameter)| {
                parameter
                    .value
                    .tag_references()
                    .iter()
                    .map(move |tag| (name, tag))
            })
            .collect()
    }

    /// Shape-check every tag reference in the bag.
    pub fn validate_tags(&self) -> Result<()> {
        for (_, tag) in self.tag_references() {
            tag.validate()?;
        }
        Ok(())
    }

    /// Parameters added, removed or changed going from `self` to `other`.
    ///
    /// Changes and removals are listed in `self`'s order, additions follow in
    /// `other`'s order. A parameter whose value and tracking flag both differ
    /// yields a `Changed` followed by a `TrackingChanged`.
    pub fn diff<'a>(&'a self, other: &'a ParameterBag) -> Vec<ParameterDiff<'a>> {
        let mut diffs = Vec::new();
        for (name, parameter) in &self.entries {
            match other.entries.get(name) {
                Some(theirs) => {
                    if theirs.value != parameter.value {
                        diffs.push(ParameterDiff::Changed {
                            name,
                            before: &parameter.value,
                            after: &theirs.value,
                        });
                    }
                    if theirs.untracked != parameter.untracked {
                        diffs.push(ParameterDiff::TrackingChanged {
                            name,
                            untracked: theirs.untracked,
                        });
                    }
                }
                None => diffs.push(ParameterDiff::Removed {
                    name,
                    value: &parameter.value,
                }),
            }
        }
        for (name, parameter) in &other.entries {
            if !self.entries.contains_key(name) {
                diffs.push(ParameterDiff::Added {
                    name,
                    value: &parameter.value,
                });
            }
        }
        diffs
    }

    pub fn get_bool(&self, name: &str) -> Result<bool> {
        match self.get(name)? {
            Value::Bool(v) => Ok(*v),
            other => Err(mismatch(name, "bool", other)),
        }
    }

    pub fn get_i32(&self, name: &str) -> Result<i32> {
        match self.get(name)? {
            Value::Int32(v) => Ok(*v),
            other => Err(mismatch(name, "int32", other)),
        }
    }

    pub fn get_u32(&self, name: &str) -> Result<u32> {
        match self.get(name)? {
            Value::Uint32(v) => Ok(*v),
            other => Err(mismatch(name, "uint32", other)),
        }
    }

    pub fn get_f64(&self, name: &str) -> Result<f64> {
        match self.get(name)? {
            Value::Double(v) => Ok(*v),
            other => Err(mismatch(name, "double", other)),
        }
    }

    /// String-like values: `string` and `file_in_path`.
    pub fn get_str(&self, name: &str) -> Result<&str> {
        match self.get(name)? {
            Value::String(v) | Value::FileInPath(v) => Ok(v),
            other => Err(mismatch(name, "string", other)),
        }
    }

    pub fn get_strings(&self, name: &str) -> Result<&[String]> {
        match self.get(name)? {
            Value::VString(v) => Ok(v),
            other => Err(mismatch(name, "vstring", other)),
        }
    }

    pub fn get_tag(&self, name: &str) -> Result<&TagReference> {
        match self.get(name)? {
            Value::InputTag(tag) => Ok(tag),
            other => Err(mismatch(name, "input_tag", other)),
        }
    }
}

fn mismatch(name: &str, expected: &'static str, found: &Value) -> ConfigError {
    ConfigError::TypeMismatch {
        parameter: name.to_string(),
        expected,
        found: found.type_name(),
    }
}

impl<K, V> FromIterator<(K, V)> for ParameterBag
where
    K: Into<String>,
    V: Into<Value>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        iter.into_iter()
            .fold(ParameterBag::new(), |bag, (name, value)| bag.with(name, value))
    }
}

impl<K, V, const N: usize> From<[(K, V); N]> for ParameterBag
where
    K: Into<String>,
    V: Into<Value>,
{
    fn from(entries: [(K, V); N]) -> Self {
        entries.into_iter().collect()
    }
}
