// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::config::consts::MULTI_HASH_FAN_OUT;
use crate::engine::{FanIn, Inbound, Outbound};
use crate::errors::PipelineError;
use crate::item::WorkItem;
use crate::signer::Signer;
use crate::stages::per_item::for_each_item;
use crate::traits::Stage;

/// Six-way fan-out per item: concatenation of `digest32(i + text)` for i in 0..6.
///
/// Segment order is fixed by the branch index; completion order of the six
/// concurrent digests never affects the output. No lock is involved.
pub struct MultiHash {
    signer: Signer,
    max_in_flight: Option<usize>,
}

impl MultiHash {
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
        multi_hash(self.signer.clone(), item.text(), CancellationToken::new()).await
    }
}

async fn multi_hash(
    signer: Signer,
    text: String,
    token: CancellationToken,
) -> Result<String, PipelineError> {
    let mut fan_in = FanIn::new(MULTI_HASH_FAN_OUT, token);
    for index in 0..MULTI_HASH_FAN_OUT {
        let signer = signer.clone();
        let data = format!("{}{}", index, text);
        fan_in.spawn(index, async move { signer.digest32(data).await });
    }

    Ok(fan_in.join().await?.concat())
}

#[async_trait]
impl Stage for MultiHash {
    async fn run(&self, input: Inbound, output: Outbound) -> Result<(), PipelineError> {
        for_each_item(self.name(), input, output, self.max_in_flight, |text, token| {
            multi_hash(self.signer.clone(), text, token)
        })
        .await
    }

    fn name(&self) -> &str {
        "multi_hash"
    }
}
