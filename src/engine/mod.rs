// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod conduit;
pub mod fan_in;
pub mod pipeline;
#[cfg(test)]
mod integration_tests;

pub use conduit::{closed_inbound, conduit, ConduitCloser, Inbound, Outbound};
pub use fan_in::{FanIn, HashBranch};
pub use pipeline::{Pipeline, PipelineBuilder, PipelineReport, RunState, StageReport};
