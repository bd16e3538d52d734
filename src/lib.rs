// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod config;        // YAML config + runtime assembly
pub mod engine;        // pipeline executor, conduits, fan-in
pub mod errors;        // error handling
pub mod item;
pub mod observability;
pub mod signer;        // digest providers and the shared lock
pub mod stages;        // hashing and utility stages
pub mod traits;        // Stage and Digester abstractions

pub use engine::{Pipeline, PipelineReport, RunState};
pub use errors::PipelineError;
pub use item::WorkItem;
