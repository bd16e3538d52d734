// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Observability module for structured logging and tracing.
//!
//! This module provides centralized message types for all diagnostic and
//! operational logging throughout the pipeline. Message types follow a
//! struct-based pattern with `Display` implementations to:
//!
//! * Eliminate magic strings scattered throughout the codebase
//! * Keep field names consistent between human-readable and structured output
//! * Provide consistent logging output from every stage
//!
//! # Usage
//!
//! ```rust
//! use hash_pipeline::observability::messages::engine::PipelineFailed;
//! use hash_pipeline::observability::messages::StructuredLog;
//!
//! let error = std::io::Error::new(std::io::ErrorKind::Other, "test error");
//! let msg = PipelineFailed { error: &error };
//!
//! msg.log();
//! ```
//!
//! The binary installs a `tracing-subscriber` formatter filtered by `RUST_LOG`
//! (see [`init_tracing`]).

pub mod messages;

use tracing_subscriber::EnvFilter;

/// Install the global `tracing` subscriber.
///
/// Honors `RUST_LOG`, falling back to `default_filter` when it is unset or invalid.
/// Calling this more than once is harmless; later calls are ignored.
pub fn init_tracing(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
