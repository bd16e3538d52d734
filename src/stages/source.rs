// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;

use crate::engine::{Inbound, Outbound};
use crate::errors::PipelineError;
use crate::item::WorkItem;
use crate::traits::Stage;

/// Emits a fixed sequence of items in order, ignoring its inbound conduit.
pub struct Source {
    items: Vec<WorkItem>,
}

impl Source {
    pub fn new<I, T>(items: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<WorkItem>,
    {
        Self {
            items: items.into_iter().map(Into::into).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[async_trait]
impl Stage for Source {
    async fn run(&self, _input: Inbound, output: Outbound) -> Result<(), PipelineError> {
        for item in &self.items {
            output.send(item.clone()).await?;
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "source"
    }
}
