// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::params::TagReference;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A typed parameter value.
///
/// Serialized adjacently tagged so documents spell the type next to the value:
///
/// ```yaml
/// Hnpar: { type: uint32, value: 4 }
/// wiresFile: { type: file_in_path, value: "L1Trigger/TrackFindingTracklet/data/wires_hourglass.dat" }
/// BeamSpotSource: { type: input_tag, value: "offlineBeamSpot" }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Value {
    Bool(bool),
    Int32(i32),
    Uint32(u32),
    Int64(i64),
    Uint64(u64),
    Double(f64),
    String(String),
    #[serde(rename = "vstring")]
    VString(Vec<String>),
    #[serde(rename = "vint32")]
    VInt32(Vec<i32>),
    #[serde(rename = "vdouble")]
    VDouble(Vec<f64>),
    /// Path relative to the framework's search path, passed through verbatim
    FileInPath(String),
    InputTag(TagReference),
    #[serde(rename = "vinput_tag")]
    VInputTag(Vec<TagReference>),
}

impl Value {
    /// Build a `FileInPath` value.
    pub fn file(path: impl Into<String>) -> Self {
        Value::FileInPath(path.into())
    }

    /// Build an `InputTag` value from its textual form without validating it;
    /// the registry validates tags when the owning module is defined.
    pub fn input_tag(producer: impl Into<String>, label: impl Into<String>) -> Self {
        Value::InputTag(TagReference::new(producer).with_label(label))
    }

    pub fn strings<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Value::VString(items.into_iter().map(Into::into).collect())
    }

    /// Type name as written in documents
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Bool(_) => "bool",
            Value::Int32(_) => "int32",
            Value::Uint32(_) => "uint32",
            Value::Int64(_) => "int64",
            Value::Uint64(_) => "uint64",
            Value::Double(_) => "double",
            Value::String(_) => "string",
            Value::VString(_) => "vstring",
            Value::VInt32(_) => "vint32",
            Value::VDouble(_) => "vdouble",
            Value::FileInPath(_) => "file_in_path",
            Value::InputTag(_) => "input_tag",
            Value::VInputTag(_) => "vinput_tag",
        }
    }

    /// Tag references held by this value, in order.
    pub fn tag_references(&self) -> &[TagReference] {
        match self {
            Value::InputTag(tag) => std::slice::from_ref(tag),
            Value::VInputTag(tags) => tags,
            _ => &[],
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn list<T: fmt::Display>(f: &mut fmt::Formatter<'_>, items: &[T]) -> fmt::Result {
            write!(f, "[")?;
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{}", item)?;
            }
            write!(f, "]")
        }

        match self {
            Value::Bool(v) => write!(f, "{}", v),
            Value::Int32(v) => write!(f, "{}", v),
            Value::Uint32(v) => write!(f, "{}", v),
            Value::Int64(v) => write!(f, "{}", v),
            Value::Uint64(v) => write!(f, "{}", v),
            Value::Double(v) => write!(f, "{}", v),
            Value::String(v) | Value::FileInPath(v) => write!(f, "{:?}", v),
            Value::VString(v) => {
                let quoted: Vec<String> = v.iter().map(|s| format!("{:?}", s)).collect();
                list(f, &quoted)
            }
            Value::VInt32(v) => list(f, v),
            Value::VDouble(v) => list(f, v),
            Value::InputTag(tag) => write!(f, "{}", tag),
            Value::VInputTag(tags) => list(f, tags),
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int32(v)
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Value::Uint32(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int64(v)
    }
}

impl From<u64> for Value {
    fn from(v: u64) -> Self {
        Value::Uint64(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Double(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<Vec<String>> for Value {
    fn from(v: Vec<String>) -> Self {
        Value::VString(v)
    }
}

impl From<TagReference> for Value {
    fn from(tag: TagReference) -> Self {
        Value::InputTag(tag)
    }
}

impl From<Vec<TagReference>> for Value {
    fn from(tags: Vec<TagReference>) -> Self {
        Value::VInputTag(tags)
    }
}
