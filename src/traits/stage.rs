// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::future::Future;

use async_trait::async_trait;

use crate::engine::{Inbound, Outbound};
use crate::errors::PipelineError;

/// A concurrently running processing unit between two conduits.
///
/// A stage consumes from `input` until it yields `Ok(None)` (closed and
/// drained) and produces into `output`. The stage owns its outbound side for
/// the duration of `run`; the executor closes the conduit exactly once after
/// `run` returns. Any sub-tasks the stage spawns must have finished producing
/// before `run` returns.
///
/// Returning an error aborts the whole pipeline run: the executor cancels
/// every sibling stage and the run reports the first root-cause failure.
#[async_trait]
pub trait Stage: Send + Sync {
    async fn run(&self, input: Inbound, output: Outbound) -> Result<(), PipelineError>;

    fn name(&self) -> &str;
}

/// Stage backed by an async closure.
pub struct FnStage<F> {
    name: String,
    func: F,
}

/// Build a stage from an async closure taking the stage's two conduit ends.
///
/// # Example
/// ```
/// use hash_pipeline::traits::stage_fn;
///
/// let doubler = stage_fn("doubler", |mut input, output| async move {
///     while let Some(item) = input.recv().await? {
///         output.send(format!("{item}{item}")).await?;
///     }
///     Ok(())
/// });
/// # let _ = doubler;
/// ```
pub fn stage_fn<F, Fut>(name: impl Into<String>, func: F) -> FnStage<F>
where
    F: Fn(Inbound, Outbound) -> Fut + Send + Sync,
    Fut: Future<Output = Result<(), PipelineError>> + Send,
{
    FnStage {
        name: name.into(),
        func,
    }
}

#[async_trait]
impl<F, Fut> Stage for FnStage<F>
where
    F: Fn(Inbound, Outbound) -> Fut + Send + Sync,
    Fut: Future<Output = Result<(), PipelineError>> + Send,
{
    async fn run(&self, input: Inbound, output: Outbound) -> Result<(), PipelineError> {
        (self.func)(input, output).await
    }

    fn name(&self) -> &str {
        &self.name
    }
}
