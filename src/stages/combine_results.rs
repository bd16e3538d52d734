// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;

use crate::config::consts::COMBINE_SEPARATOR;
use crate::engine::{Inbound, Outbound};
use crate::errors::PipelineError;
use crate::observability::messages::{stage::AggregateEmitted, StructuredLog};
use crate::traits::Stage;

/// Terminal aggregator: buffers every inbound string, then emits one item with
/// all of them sorted byte-wise and joined by `_`.
///
/// Nothing is emitted until the inbound conduit closes. A cancelled run
/// returns [`PipelineError::Cancelled`] without emitting, so a partial
/// aggregate never reaches downstream.
pub struct CombineResults;

impl CombineResults {
    pub fn new() -> Self {
        Self
    }
}

impl Default for CombineResults {
    fn default() -> Self {
        Self::new()
    }
}

/// Sort `results` byte-wise and join them with the combine separator.
pub fn combine(mut results: Vec<String>) -> String {
    results.sort_unstable();
    results.join(COMBINE_SEPARATOR)
}

#[async_trait]
impl Stage for CombineResults {
    async fn run(&self, mut input: Inbound, output: Outbound) -> Result<(), PipelineError> {
        let mut results = Vec::new();
        while let Some(item) = input.recv().await? {
            results.push(item.into_text());
        }

        let item_count = results.len();
        let combined = combine(results);
        AggregateEmitted {
            item_count,
            output_len: combined.len(),
        }
        .log();

        output.send(combined).await
    }

    fn name(&self) -> &str {
        "combine_results"
    }
}
