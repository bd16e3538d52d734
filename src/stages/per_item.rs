// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Per-item worker explosion shared by the fan-out stages.

use std::future::Future;
use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::Instrument;

use crate::engine::{Inbound, Outbound};
use crate::errors::PipelineError;
use crate::observability::messages::{
    stage::{ItemAccepted, ItemHashed},
    StructuredLog,
};

/// Read `input` to exhaustion, running `work` for every item on its own task
/// and sending each result to `output` as soon as that item finishes.
///
/// Results leave in completion order, not arrival order. The function returns
/// only after every item task has sent its result, so the caller's outbound
/// conduit can be closed safely afterwards. The first failing item aborts all
/// other in-flight items and is returned.
///
/// `max_in_flight` bounds the number of concurrently running item tasks;
/// `None` spawns a task per item without limit.
pub(crate) async fn for_each_item<F, Fut>(
    stage: &str,
    mut input: Inbound,
    output: Outbound,
    max_in_flight: Option<usize>,
    work: F,
) -> Result<(), PipelineError>
where
    F: Fn(String, CancellationToken) -> Fut,
    Fut: Future<Output = Result<String, PipelineError>> + Send + 'static,
{
    let token = input.cancellation().clone();
    let limiter = max_in_flight.map(|limit| Arc::new(Semaphore::new(limit)));
    let stage: Arc<str> = Arc::from(stage);
    let mut items: JoinSet<Result<(), PipelineError>> = JoinSet::new();
    let mut input_open = true;

    while input_open || !items.is_empty() {
        tokio::select! {
            Some(joined) = items.join_next(), if !items.is_empty() => {
                joined??;
            }
            next = input.recv(), if input_open => {
                let Some(item) = next? else {
                    input_open = false;
                    continue;
                };

                let permit = match &limiter {
                    Some(limiter) => Some(tokio::select! {
                        biased;
                        _ = token.cancelled() => return Err(PipelineError::Cancelled),
                        permit = Arc::clone(limiter).acquire_owned() => {
                            permit.map_err(|_| PipelineError::Cancelled)?
                        }
                    }),
                    None => None,
                };

                let text = item.into_text();
                let accepted = ItemAccepted {
                    stage: &stage,
                    input: &text,
                };
                let span = accepted.span("item_task");
                accepted.log();

                let hashed = work(text.clone(), token.clone());
                let output = output.clone();
                let stage = Arc::clone(&stage);
                items.spawn(async move {
                    let _permit = permit;
                    let result = hashed.await?;
                    ItemHashed {
                        stage: &stage,
                        input: &text,
                        output: &result,
                    }
                    .log();
                    output.send(result).await
                }.instrument(span));
            }
        }
    }

    Ok(())
}
