// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

mod descriptor;
mod loader;
mod published;
mod registry;
mod sequence;
mod validation;


pub use descriptor::{Lifecycle, ModuleDescriptor};
pub use loader::{
    load_and_validate_config, load_config, load_document, load_into, load_registry, Definition,
    Document,
};
pub use published::{PublishedConfig, PublishedSequence, SequenceView};
pub use registry::Registry;
pub use sequence::Sequence;
