// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use thiserror::Error;

use crate::errors::DigestError;

/// Errors that can terminate a pipeline run.
///
/// End-of-stream is not represented here: a closed inbound conduit is the
/// normal completion signal and surfaces as `Ok(None)` from
/// [`Inbound::recv`](crate::engine::Inbound::recv).
#[derive(Debug, Error)]
pub enum PipelineError {
    /// A pipeline needs at least one stage
    #[error("Pipeline has no stages")]
    EmptyPipeline,

    /// An external digest primitive failed
    #[error("Hash primitive '{primitive}' failed: {source}")]
    HashPrimitiveFailure {
        primitive: &'static str,
        #[source]
        source: DigestError,
    },

    /// A fan-in point finished with fewer distinct results than it expected
    #[error("Join expected {expected} results but received {received}")]
    JoinCountMismatch { expected: usize, received: usize },

    /// The run was cancelled, either by a failing sibling stage or from outside
    #[error("Pipeline run was cancelled")]
    Cancelled,

    /// The downstream stage dropped its inbound conduit while this stage was still producing
    #[error("Stage '{stage}' could not send: downstream conduit is closed")]
    DownstreamClosed { stage: String },

    /// A stage panicked; the panic was contained at the task boundary
    #[error("Stage '{stage}' panicked")]
    StagePanicked { stage: String },

    /// A per-item or per-branch sub-task panicked
    #[error("Sub-task panicked: {message}")]
    TaskPanicked { message: String },

    /// A custom stage reported a failure
    #[error("Stage '{stage}' failed: {message}")]
    StageFailed { stage: String, message: String },
}

impl PipelineError {
    /// Wrap a digest32 failure
    pub fn digest32(source: DigestError) -> Self {
        PipelineError::HashPrimitiveFailure {
            primitive: "digest32",
            source,
        }
    }

    /// Wrap a digest128 failure
    pub fn digest128(source: DigestError) -> Self {
        PipelineError::HashPrimitiveFailure {
            primitive: "digest128",
            source,
        }
    }

    /// Whether this error is a consequence of another failure rather than a root cause.
    pub fn is_cancellation(&self) -> bool {
        matches!(self, PipelineError::Cancelled)
    }
}

impl From<tokio::task::JoinError> for PipelineError {
    fn from(err: tokio::task::JoinError) -> Self {
        if err.is_cancelled() {
            PipelineError::Cancelled
        } else {
            PipelineError::TaskPanicked {
                message: err.to_string(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_primitive_failure_names_the_primitive() {
        let err = PipelineError::digest128(DigestError::Overheated);
        let msg = err.to_string();
        assert!(msg.contains("digest128"));
        assert!(msg.contains("overheat"));
    }

    #[test]
    fn join_count_mismatch_display() {
        let err = PipelineError::JoinCountMismatch {
            expected: 6,
            received: 5,
        };
        assert_eq!(err.to_string(), "Join expected 6 results but received 5");
    }

    #[test]
    fn only_cancelled_is_cancellation() {
        assert!(PipelineError::Cancelled.is_cancellation());
        assert!(!PipelineError::EmptyPipeline.is_cancellation());
    }
}
