// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for pipeline executor lifecycle events.
//!
//! This module contains message types for logging events related to:
//! * Pipeline start, completion and failure
//! * Stage worker start, completion and failure
//! * Run state transitions

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use tracing::Span;

/// Pipeline run started.
///
/// # Log Level
/// `info!` - Important operational event
///
/// # Example
/// ```
/// use hash_pipeline::observability::messages::engine::PipelineStarted;
///
/// let msg = PipelineStarted {
///     stage_count: 5,
///     conduit_capacity: 1,
/// };
///
/// tracing::info!("{}", msg);
/// ```
pub struct PipelineStarted {
    pub stage_count: usize,
    pub conduit_capacity: usize,
}

impl Display for PipelineStarted {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Starting pipeline: {} stages, conduit_capacity={}",
            self.stage_count, self.conduit_capacity
        )
    }
}

impl StructuredLog for PipelineStarted {
    fn log(&self) {
        tracing::info!(
            stage_count = self.stage_count,
            conduit_capacity = self.conduit_capacity,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "pipeline",
            span_name = name,
            stage_count = self.stage_count,
            conduit_capacity = self.conduit_capacity,
        )
    }
}

/// Pipeline run completed successfully.
///
/// # Log Level
/// `info!` - Important operational event
pub struct PipelineCompleted {
    pub stage_count: usize,
    pub output_count: usize,
    pub duration: std::time::Duration,
}

impl Display for PipelineCompleted {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Pipeline completed: {} stages joined, {} output items in {:?}",
            self.stage_count, self.output_count, self.duration
        )
    }
}

impl StructuredLog for PipelineCompleted {
    fn log(&self) {
        tracing::info!(
            stage_count = self.stage_count,
            output_count = self.output_count,
            duration_ms = self.duration.as_millis() as u64,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "pipeline_completed",
            span_name = name,
            stage_count = self.stage_count,
            output_count = self.output_count,
            duration = ?self.duration,
        )
    }
}

/// Pipeline run failed.
///
/// # Log Level
/// `error!` - Failure requiring attention
///
/// # Example
/// ```
/// use hash_pipeline::observability::messages::engine::PipelineFailed;
///
/// let error = std::io::Error::new(std::io::ErrorKind::Other, "test error");
/// let msg = PipelineFailed { error: &error };
///
/// tracing::error!("{}", msg);
/// ```
pub struct PipelineFailed<'a> {
    pub error: &'a dyn std::error::Error,
}

impl Display for PipelineFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Pipeline failed: {}", self.error)
    }
}

impl StructuredLog for PipelineFailed<'_> {
    fn log(&self) {
        tracing::error!(error = %self.error, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::error_span!("pipeline_failed", span_name = name, error = %self.error)
    }
}

/// A stage worker returned successfully and its outbound conduit was closed.
///
/// # Log Level
/// `debug!` - Detailed diagnostic information
pub struct StageCompleted<'a> {
    pub stage: &'a str,
    pub index: usize,
    pub duration: std::time::Duration,
}

impl Display for StageCompleted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Stage #{} '{}' completed in {:?}; outbound conduit closed",
            self.index, self.stage, self.duration
        )
    }
}

impl StructuredLog for StageCompleted<'_> {
    fn log(&self) {
        tracing::debug!(
            stage = self.stage,
            index = self.index,
            duration_ms = self.duration.as_millis() as u64,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "stage_completed",
            span_name = name,
            stage = self.stage,
            index = self.index,
        )
    }
}

/// A stage worker was spawned.
///
/// # Log Level
/// `debug!` - Detailed diagnostic information
///
/// # Example
/// ```
/// use hash_pipeline::observability::messages::engine::StageStarted;
/// use hash_pipeline::observability::messages::StructuredLog;
///
/// let msg = StageStarted {
///     stage: "multi_hash",
///     index: 2,
/// };
///
/// let span = msg.span("stage_run");
/// let _guard = span.enter();
/// msg.log();
/// ```
pub struct StageStarted<'a> {
    pub stage: &'a str,
    pub index: usize,
}

impl Display for StageStarted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Stage #{} '{}' started", self.index, self.stage)
    }
}

impl StructuredLog for StageStarted<'_> {
    fn log(&self) {
        tracing::debug!(stage = self.stage, index = self.index, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "stage",
            span_name = name,
            stage = self.stage,
            index = self.index,
        )
    }
}

/// A stage worker failed; sibling stages are being cancelled.
///
/// # Log Level
/// `error!` for root causes, `debug!` for cancellations caused by another stage
pub struct StageFailed<'a> {
    pub stage: &'a str,
    pub index: usize,
    pub error: &'a crate::errors::PipelineError,
}

impl Display for StageFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Stage #{} '{}' failed: {}",
            self.index, self.stage, self.error
        )
    }
}

impl StructuredLog for StageFailed<'_> {
    fn log(&self) {
        if self.error.is_cancellation() {
            tracing::debug!(stage = self.stage, index = self.index, "{}", self);
        } else {
            tracing::error!(
                stage = self.stage,
                index = self.index,
                error = %self.error,
                "{}", self
            );
        }
    }

    fn span(&self, name: &str) -> Span {
        tracing::error_span!(
            "stage_failed",
            span_name = name,
            stage = self.stage,
            index = self.index,
            error = %self.error,
        )
    }
}

/// Run state transition.
///
/// # Log Level
/// `debug!` - Detailed diagnostic information
pub struct RunStateChanged {
    pub from: crate::engine::RunState,
    pub to: crate::engine::RunState,
}

impl Display for RunStateChanged {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Pipeline state {:?} -> {:?}", self.from, self.to)
    }
}

impl StructuredLog for RunStateChanged {
    fn log(&self) {
        tracing::debug!(from = ?self.from, to = ?self.to, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!("run_state", span_name = name, from = ?self.from, to = ?self.to)
    }
}
