// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Centralized message types for structured logging.
//!
//! This module contains all message types used throughout the pipeline for
//! diagnostic and operational logging. Each message type implements the
//! `Display` trait for human-readable output and [`StructuredLog`] to emit
//! the same event with typed fields.
//!
//! # Organization
//!
//! * `engine` - Pipeline executor lifecycle and stage completion events
//! * `stage` - Per-item and fan-in events inside the hashing stages
//! * `signer` - Digest provider events
//! * `validation` - Configuration validation failures
//!
//! # Usage Pattern
//!
//! ```rust
//! use hash_pipeline::observability::messages::engine::PipelineStarted;
//! use hash_pipeline::observability::messages::StructuredLog;
//!
//! let msg = PipelineStarted {
//!     stage_count: 5,
//!     conduit_capacity: 1,
//! };
//!
//! msg.log();
//! ```

use tracing::Span;

pub mod engine;
pub mod signer;
pub mod stage;
pub mod validation;

/// A log message that knows its own level and structured fields.
pub trait StructuredLog {
    /// Emit the message as a tracing event at its level.
    fn log(&self);

    /// Create a span carrying the message's fields.
    fn span(&self, name: &str) -> Span;
}
