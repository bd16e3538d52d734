// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::config::consts::{SINGLE_HASH_FAN_OUT, SINGLE_HASH_SEPARATOR};
use crate::engine::{FanIn, Inbound, Outbound};
use crate::errors::PipelineError;
use crate::item::WorkItem;
use crate::signer::Signer;
use crate::stages::per_item::for_each_item;
use crate::traits::Stage;

/// Two-way fan-out per item: `digest32(text) ~ digest32(digest128(text))`.
///
/// Every inbound item gets its own task, and within it branch 0 and branch 1
/// run concurrently. Only the digest128 call in branch 1 goes through the
/// signer's exclusive lock. Items leave in completion order.
pub struct SingleHash {
    signer: Signer,
    max_in_flight: Option<usize>,
}

impl SingleHash {
    pub fn new(signer: Signer) -> Self {
        Self {
            signer,
            max_in_flight: None,
        }
    }

    pub fn with_max_in_flight(mut self, max_in_flight: Option<usize>) -> Self {
        self.max_in_flight = max_in_flight;
        self
    }

    /// Hash a single item outside of a pipeline.
    pub async fn hash_one(&self, item: &WorkItem) -> Result<String, PipelineError> {
        single_hash(self.signer.clone(), item.text(), CancellationToken::new()).await
    }
}

async fn single_hash(
    signer: Signer,
    text: String,
    token: CancellationToken,
) -> Result<String, PipelineError> {
    let mut fan_in = FanIn::new(SINGLE_HASH_FAN_OUT, token.clone());

    {
        let signer = signer.clone();
        let text = text.clone();
        fan_in.spawn(0, async move { signer.digest32(text).await });
    }
    fan_in.spawn(1, async move {
        let long = signer.digest128(text, &token).await?;
        signer.digest32(long).await
    });

    let branches = fan_in.join().await?;
    Ok(branches.join(SINGLE_HASH_SEPARATOR))
}

#[async_trait]
impl Stage for SingleHash {
    async fn run(&self, input: Inbound, output: Outbound) -> Result<(), PipelineError> {
        for_each_item(self.name(), input, output, self.max_in_flight, |text, token| {
            single_hash(self.signer.clone(), text, token)
        })
        .await
    }

    fn name(&self) -> &str {
        "single_hash"
    }
}
