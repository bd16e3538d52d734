// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for events inside the hashing stages.
//!
//! This module contains message types for logging events related to:
//! * Per-item task start and hash completion
//! * Fan-in bookkeeping
//! * Aggregation output

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use tracing::Span;

/// An item was taken off the inbound conduit and handed to its own task.
///
/// # Log Level
/// `trace!` - Very detailed diagnostic information
pub struct ItemAccepted<'a> {
    pub stage: &'a str,
    pub input: &'a str,
}

impl Display for ItemAccepted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "{} accepted {}", self.stage, self.input)
    }
}

impl StructuredLog for ItemAccepted<'_> {
    fn log(&self) {
        tracing::trace!(stage = self.stage, input = self.input, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "item",
            span_name = name,
            stage = self.stage,
            input = self.input,
        )
    }
}

/// One item finished its fan-out and was joined.
///
/// # Log Level
/// `debug!` - Detailed diagnostic information
///
/// # Example
/// ```
/// use hash_pipeline::observability::messages::stage::ItemHashed;
///
/// let msg = ItemHashed {
///     stage: "single_hash",
///     input: "0",
///     output: "4108050209~502633748",
/// };
///
/// tracing::debug!("{}", msg);
/// ```
pub struct ItemHashed<'a> {
    pub stage: &'a str,
    pub input: &'a str,
    pub output: &'a str,
}

impl Display for ItemHashed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "{} {} -> {}", self.stage, self.input, self.output)
    }
}

impl StructuredLog for ItemHashed<'_> {
    fn log(&self) {
        tracing::debug!(
            stage = self.stage,
            input = self.input,
            output = self.output,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "item_hashed",
            span_name = name,
            stage = self.stage,
            input = self.input,
        )
    }
}

/// A branch result arrived for an index that was out of range or already filled.
///
/// # Log Level
/// `warn!` - The join will report a count mismatch
pub struct BranchDiscarded {
    pub index: usize,
    pub expected: usize,
}

impl Display for BranchDiscarded {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Discarding branch result with index {} (join expects indices 0..{})",
            self.index, self.expected
        )
    }
}

impl StructuredLog for BranchDiscarded {
    fn log(&self) {
        tracing::warn!(index = self.index, expected = self.expected, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::warn_span!(
            "branch_discarded",
            span_name = name,
            index = self.index,
            expected = self.expected,
        )
    }
}

/// CombineResults emitted its single aggregate.
///
/// # Log Level
/// `info!` - Important operational event
pub struct AggregateEmitted {
    pub item_count: usize,
    pub output_len: usize,
}

impl Display for AggregateEmitted {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Combined {} results into one {}-byte string",
            self.item_count, self.output_len
        )
    }
}

impl StructuredLog for AggregateEmitted {
    fn log(&self) {
        tracing::info!(
            item_count = self.item_count,
            output_len = self.output_len,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "aggregate_emitted",
            span_name = name,
            item_count = self.item_count,
        )
    }
}
