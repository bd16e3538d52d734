// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

mod config;
mod digest;
mod pipeline;

pub use config::{ConfigError, ValidationError};
pub use digest::DigestError;
pub use pipeline::PipelineError;
