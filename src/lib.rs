// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod config;     // descriptors, sequences, registry + loader
pub mod errors;     // error handling
pub mod observability;
pub mod params;     // typed parameter bags
