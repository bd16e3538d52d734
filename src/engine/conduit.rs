// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Bounded handoff queues between adjacent stages.
//!
//! A conduit is a bounded `tokio::sync::mpsc` channel split into three handles:
//!
//! * [`Outbound`] - the send side given to the producing stage. It can be cloned
//!   so the stage's own per-item tasks can emit results directly.
//! * [`Inbound`] - the receive side given to the consuming stage.
//! * [`ConduitCloser`] - the executor's own handle on the send side. The conduit
//!   only closes once the closer *and* every `Outbound` clone are dropped, so the
//!   executor decides when end-of-stream is signalled.
//!
//! Every blocking operation is raced against the run's [`CancellationToken`].
//! Once the token fires, `send` and `recv` return [`PipelineError::Cancelled`]
//! instead of waiting, and a closed conduit observed after cancellation is
//! reported as cancellation rather than a clean end-of-stream.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::errors::PipelineError;
use crate::item::WorkItem;

/// Create a conduit of the given capacity owned by the stage named `owner`.
///
/// # Panics
/// Panics if `capacity` is zero, as `tokio::sync::mpsc::channel` does.
/// Configuration validation rejects a zero capacity before a pipeline is built.
pub fn conduit(
    owner: &str,
    capacity: usize,
    token: CancellationToken,
) -> (ConduitCloser, Outbound, Inbound) {
    let (sender, receiver) = mpsc::channel(capacity);
    let closer = ConduitCloser {
        sender: Some(sender.clone()),
    };
    let outbound = Outbound {
        sender,
        token: token.clone(),
        owner: Arc::from(owner),
    };
    let inbound = Inbound { receiver, token };
    (closer, outbound, inbound)
}

/// An inbound conduit that is already closed and empty.
pub fn closed_inbound(token: CancellationToken) -> Inbound {
    let (_, receiver) = mpsc::channel(1);
    Inbound { receiver, token }
}

/// Send side of a conduit, held by the producing stage.
#[derive(Clone)]
pub struct Outbound {
    sender: mpsc::Sender<WorkItem>,
    token: CancellationToken,
    owner: Arc<str>,
}

impl Outbound {
    /// Hand one item downstream, waiting while the conduit is full.
    pub async fn send(&self, item: impl Into<WorkItem>) -> Result<(), PipelineError> {
        let item = item.into();
        tokio::select! {
            biased;
            _ = self.token.cancelled() => Err(PipelineError::Cancelled),
            sent = self.sender.send(item) => sent.map_err(|_| PipelineError::DownstreamClosed {
                stage: self.owner.to_string(),
            }),
        }
    }

    /// Cancellation token shared by the whole run
    pub fn cancellation(&self) -> &CancellationToken {
        &self.token
    }
}

/// Receive side of a conduit, held by the consuming stage.
pub struct Inbound {
    receiver: mpsc::Receiver<WorkItem>,
    token: CancellationToken,
}

impl Inbound {
    pub(crate) fn from_receiver(receiver: mpsc::Receiver<WorkItem>, token: CancellationToken) -> Self {
        Self { receiver, token }
    }

    /// Receive the next item.
    ///
    /// Returns `Ok(None)` once the producer has closed the conduit and every
    /// buffered item has been received.
    pub async fn recv(&mut self) -> Result<Option<WorkItem>, PipelineError> {
        tokio::select! {
            biased;
            _ = self.token.cancelled() => Err(PipelineError::Cancelled),
            item = self.receiver.recv() => match item {
                Some(item) => Ok(Some(item)),
                None if self.token.is_cancelled() => Err(PipelineError::Cancelled),
                None => Ok(None),
            },
        }
    }

    /// Cancellation token shared by the whole run
    pub fn cancellation(&self) -> &CancellationToken {
        &self.token
    }

    /// Drain every item until the producer closes the conduit, ignoring cancellation.
    ///
    /// Used for the pipeline's exit conduit, which must never block the last stage.
    pub(crate) async fn drain(mut self) -> Vec<WorkItem> {
        let mut items = Vec::new();
        while let Some(item) = self.receiver.recv().await {
            items.push(item);
        }
        items
    }
}

/// The executor's handle on a conduit's send side.
pub struct ConduitCloser {
    sender: Option<mpsc::Sender<WorkItem>>,
}

impl ConduitCloser {
    /// Release the executor's hold on the conduit. Consuming `self` makes a second close impossible.
    pub fn close(mut self) {
        self.sender.take();
    }
}
