// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for digest provider events.

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use tracing::Span;

/// A digest primitive returned.
///
/// # Log Level
/// `trace!` - Emitted for every digest call
pub struct DigestComputed<'a> {
    pub primitive: &'static str,
    pub input: &'a str,
    pub digest: &'a str,
}

impl Display for DigestComputed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "{}({}) = {}", self.primitive, self.input, self.digest)
    }
}

impl StructuredLog for DigestComputed<'_> {
    fn log(&self) {
        tracing::trace!(
            primitive = self.primitive,
            input = self.input,
            digest = self.digest,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::trace_span!(
            "digest",
            span_name = name,
            primitive = self.primitive,
            input = self.input,
        )
    }
}

/// digest128 was entered while another call was still in progress.
///
/// # Log Level
/// `error!` - The exclusive lock was bypassed or missing
pub struct DigestOverheated<'a> {
    pub input: &'a str,
}

impl Display for DigestOverheated<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "digest128 overheated on input '{}': concurrent invocation detected",
            self.input
        )
    }
}

impl StructuredLog for DigestOverheated<'_> {
    fn log(&self) {
        tracing::error!(input = self.input, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::error_span!("digest_overheated", span_name = name, input = self.input)
    }
}
