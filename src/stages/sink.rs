// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::engine::{Inbound, Outbound};
use crate::errors::PipelineError;
use crate::item::WorkItem;
use crate::traits::Stage;

/// Terminal stage that stores every item it receives.
pub struct CollectSink {
    collected: Collected,
}

/// Shared view of the items a [`CollectSink`] has received.
#[derive(Clone, Default)]
pub struct Collected(Arc<Mutex<Vec<WorkItem>>>);

impl Collected {
    pub fn items(&self) -> Vec<WorkItem> {
        self.0.lock().unwrap_or_else(|poisoned| poisoned.into_inner()).clone()
    }

    fn push(&self, item: WorkItem) {
        self.0
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(item);
    }
}

impl CollectSink {
    /// Create the sink and a handle for reading what it collected.
    pub fn new() -> (Self, Collected) {
        let collected = Collected::default();
        (
            Self {
                collected: collected.clone(),
            },
            collected,
        )
    }
}

#[async_trait]
impl Stage for CollectSink {
    async fn run(&self, mut input: Inbound, _output: Outbound) -> Result<(), PipelineError> {
        while let Some(item) = input.recv().await? {
            self.collected.push(item);
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "collect_sink"
    }
}

/// Terminal stage that prints `collected <item>` for every item it receives.
pub struct LogSink;

#[async_trait]
impl Stage for LogSink {
    async fn run(&self, mut input: Inbound, _output: Outbound) -> Result<(), PipelineError> {
        while let Some(item) = input.recv().await? {
            println!("collected {}", item);
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "log_sink"
    }
}
