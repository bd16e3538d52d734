// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Indexed counting join for fixed-width fan-out.
//!
//! A [`FanIn`] owns the sub-tasks of one fan-out point. Each sub-task is tagged
//! with its branch index when spawned, and [`FanIn::join`] places every result
//! in the slot for that index, so the joined order is a function of the index
//! and never of completion order.
//!
//! The join releases once the task set is exhausted and then checks that exactly
//! `expected` distinct indices arrived. A branch that panicked, was never spawned,
//! or reported an out-of-range or duplicate index therefore surfaces as
//! [`PipelineError::JoinCountMismatch`] instead of an unbounded wait.
//!
//! Dropping a `FanIn` aborts whatever branches are still running.

use std::future::Future;

use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use crate::errors::PipelineError;
use crate::observability::messages::{stage::BranchDiscarded, StructuredLog};

/// Result of one fan-out sub-task
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HashBranch {
    pub index: usize,
    pub digest: String,
}

pub struct FanIn {
    expected: usize,
    branches: JoinSet<Result<HashBranch, PipelineError>>,
    token: CancellationToken,
}

impl FanIn {
    pub fn new(expected: usize, token: CancellationToken) -> Self {
        Self {
            expected,
            branches: JoinSet::new(),
            token,
        }
    }

    /// Spawn the sub-task for branch `index`.
    pub fn spawn<F>(&mut self, index: usize, branch: F)
    where
        F: Future<Output = Result<String, PipelineError>> + Send + 'static,
    {
        self.branches
            .spawn(async move { branch.await.map(|digest| HashBranch { index, digest }) });
    }

    /// Wait for every branch and return the digests ordered by branch index.
    ///
    /// The first branch failure is returned immediately and the remaining
    /// branches are aborted.
    pub async fn join(mut self) -> Result<Vec<String>, PipelineError> {
        let mut slots: Vec<Option<String>> = vec![None; self.expected];

        loop {
            let next = tokio::select! {
                biased;
                _ = self.token.cancelled() => return Err(PipelineError::Cancelled),
                next = self.branches.join_next() => next,
            };
            let Some(joined) = next else { break };
            let branch = joined??;

            match slots.get_mut(branch.index) {
                Some(slot) if slot.is_none() => *slot = Some(branch.digest),
                _ => BranchDiscarded {
                    index: branch.index,
                    expected: self.expected,
                }
                .log(),
            }
        }

        let received = slots.iter().filter(|slot| slot.is_some()).count();
        if received != self.expected {
            return Err(PipelineError::JoinCountMismatch {
                expected: self.expected,
                received,
            });
        }

        Ok(slots.into_iter().flatten().collect())
    }
}
