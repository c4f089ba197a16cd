// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Typed parameter values and the ordered bags that hold them.

mod bag;
mod tag;
mod value;

pub use bag::{Parameter, ParameterBag, ParameterDiff};
pub use tag::TagReference;
pub use value::Value;
