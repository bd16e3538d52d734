// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Pipeline executor: a linear chain of stages joined by bounded conduits.
//!
//! # Execution Model
//!
//! ```text
//!  entry ──▶ [stage 0] ──c0──▶ [stage 1] ──c1──▶ ... ──▶ [stage N-1] ──cN-1──▶ exit
//! ```
//!
//! * One conduit is created per stage for its outbound side; stage *i* reads
//!   from conduit *i-1*. The entry conduit is either supplied by the caller
//!   ([`Pipeline::execute_with_input`]) or already closed ([`Pipeline::execute`]).
//! * Every stage runs on its own tokio task.
//! * When stage *i*'s `run` returns, the executor closes conduit *i* exactly
//!   once. If the stage failed, the shared cancellation token is cancelled
//!   *before* the close, so downstream stages see cancellation rather than a
//!   clean end-of-stream and never emit partial aggregates.
//! * The exit conduit is drained into [`PipelineReport::output`].
//! * `execute` returns only after every stage task has been joined.
//!
//! # Run State
//!
//! `Idle → Running → Draining → Done`. `Draining` starts when the first stage
//! finishes; `Done` is reached once every stage has been joined, whether the
//! run succeeded or not. A pipeline is consumed by `execute`, so it can never
//! re-enter `Running`.
//!
//! # Example
//! ```rust
//! use hash_pipeline::engine::Pipeline;
//! use hash_pipeline::signer::Signer;
//! use hash_pipeline::stages::{CombineResults, MultiHash, SingleHash, Source};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let signer = Signer::reference();
//! let report = Pipeline::builder()
//!     .stage(Source::new([0, 1, 1, 2, 3, 5, 8]))
//!     .stage(SingleHash::new(signer.clone()))
//!     .stage(MultiHash::new(signer))
//!     .stage(CombineResults::new())
//!     .build()?
//!     .execute()
//!     .await?;
//!
//! assert_eq!(report.output.len(), 1);
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::{mpsc, watch};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::Instrument;

use crate::config::consts::DEFAULT_CONDUIT_CAPACITY;
use crate::engine::conduit::{closed_inbound, conduit, ConduitCloser, Inbound, Outbound};
use crate::errors::PipelineError;
use crate::item::WorkItem;
use crate::observability::messages::{engine::*, StructuredLog};
use crate::traits::Stage;

/// Lifecycle of a single pipeline run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Idle,
    Running,
    Draining,
    Done,
}

/// Timing for one successfully completed stage.
#[derive(Debug, Clone)]
pub struct StageReport {
    pub index: usize,
    pub name: String,
    pub duration: Duration,
}

/// Outcome of a successful run.
#[derive(Debug, Clone)]
pub struct PipelineReport {
    /// One entry per stage, in pipeline order
    pub stages: Vec<StageReport>,
    /// Items the last stage produced
    pub output: Vec<WorkItem>,
    pub duration: Duration,
}

/// An ordered chain of stages, executed once.
pub struct Pipeline {
    stages: Vec<Arc<dyn Stage>>,
    conduit_capacity: usize,
    token: CancellationToken,
    state: watch::Sender<RunState>,
}

impl Pipeline {
    pub fn new(stages: Vec<Arc<dyn Stage>>) -> Result<Self, PipelineError> {
        if stages.is_empty() {
            return Err(PipelineError::EmptyPipeline);
        }
        let (state, _) = watch::channel(RunState::Idle);
        Ok(Self {
            stages,
            conduit_capacity: DEFAULT_CONDUIT_CAPACITY,
            token: CancellationToken::new(),
            state,
        })
    }

    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::new()
    }

    /// Set the capacity of every conduit (at least 1).
    pub fn with_conduit_capacity(mut self, capacity: usize) -> Self {
        self.conduit_capacity = capacity.max(1);
        self
    }

    /// Tie the run to an outside cancellation token.
    ///
    /// Cancelling `parent` cancels the run; a failing stage cancels only this run.
    pub fn with_cancellation(mut self, parent: &CancellationToken) -> Self {
        self.token = parent.child_token();
        self
    }

    /// Watch the run state.
    pub fn subscribe(&self) -> watch::Receiver<RunState> {
        self.state.subscribe()
    }

    pub fn stage_names(&self) -> Vec<&str> {
        self.stages.iter().map(|stage| stage.name()).collect()
    }

    pub fn conduit_capacity(&self) -> usize {
        self.conduit_capacity
    }

    /// Run with an already-closed entry conduit.
    pub async fn execute(self) -> Result<PipelineReport, PipelineError> {
        let entry = closed_inbound(self.token.clone());
        self.run(entry).await
    }

    /// Run with the first stage reading from `input`.
    pub async fn execute_with_input(
        self,
        input: mpsc::Receiver<WorkItem>,
    ) -> Result<PipelineReport, PipelineError> {
        let entry = Inbound::from_receiver(input, self.token.clone());
        self.run(entry).await
    }

    fn transition(&self, to: RunState) {
        let from = self.state.send_replace(to);
        if from != to {
            RunStateChanged { from, to }.log();
        }
    }

    async fn run(self, entry: Inbound) -> Result<PipelineReport, PipelineError> {
        let start_msg = PipelineStarted {
            stage_count: self.stages.len(),
            conduit_capacity: self.conduit_capacity,
        };
        let span = start_msg.span("pipeline_run");
        start_msg.log();
        self.supervise(entry).instrument(span).await
    }

    async fn supervise(self, entry: Inbound) -> Result<PipelineReport, PipelineError> {
        let started = Instant::now();
        let stage_count = self.stages.len();

        let mut workers = JoinSet::new();
        let mut inbound = entry;
        for (index, stage) in self.stages.iter().enumerate() {
            let (closer, outbound, next) =
                conduit(stage.name(), self.conduit_capacity, self.token.clone());
            let input = std::mem::replace(&mut inbound, next);
            workers.spawn(run_stage(
                index,
                Arc::clone(stage),
                input,
                outbound,
                closer,
                self.token.clone(),
            ));
        }
        let exit = tokio::spawn(inbound.drain());
        self.transition(RunState::Running);

        let mut reports = Vec::with_capacity(stage_count);
        let mut first_error: Option<PipelineError> = None;
        while let Some(joined) = workers.join_next().await {
            self.transition(RunState::Draining);
            let outcome = match joined {
                Ok(outcome) => outcome.result.map(|()| outcome.report),
                Err(join_error) => {
                    self.token.cancel();
                    Err(PipelineError::from(join_error))
                }
            };
            match outcome {
                Ok(report) => reports.push(report),
                Err(error) => {
                    let replace = match &first_error {
                        None => true,
                        Some(current) => precedence(&error) > precedence(current),
                    };
                    if replace {
                        first_error = Some(error);
                    }
                }
            }
        }

        let output = exit.await?;
        self.transition(RunState::Done);

        if let Some(error) = first_error {
            PipelineFailed { error: &error }.log();
            return Err(error);
        }

        reports.sort_by_key(|report| report.index);
        let duration = started.elapsed();
        PipelineCompleted {
            stage_count,
            output_count: output.len(),
            duration,
        }
        .log();

        Ok(PipelineReport {
            stages: reports,
            output,
            duration,
        })
    }
}

/// Root causes outrank the errors they provoke in sibling stages.
fn precedence(error: &PipelineError) -> u8 {
    match error {
        PipelineError::Cancelled => 0,
        PipelineError::DownstreamClosed { .. } => 1,
        _ => 2,
    }
}

struct StageOutcome {
    report: StageReport,
    result: Result<(), PipelineError>,
}

async fn run_stage(
    index: usize,
    stage: Arc<dyn Stage>,
    input: Inbound,
    output: Outbound,
    closer: ConduitCloser,
    token: CancellationToken,
) -> StageOutcome {
    let name = stage.name().to_string();
    let started = Instant::now();

    let start_msg = StageStarted {
        stage: &name,
        index,
    };
    let span = start_msg.span("stage_run");
    start_msg.log();

    let worker = tokio::spawn(async move { stage.run(input, output).await }.instrument(span));
    let result = match worker.await {
        Ok(result) => result,
        Err(join_error) if join_error.is_panic() => Err(PipelineError::StagePanicked {
            stage: name.clone(),
        }),
        Err(join_error) => Err(PipelineError::from(join_error)),
    };

    let duration = started.elapsed();
    match &result {
        Ok(()) => StageCompleted {
            stage: &name,
            index,
            duration,
        }
        .log(),
        Err(error) => {
            token.cancel();
            StageFailed {
                stage: &name,
                index,
                error,
            }
            .log();
        }
    }
    closer.close();

    StageOutcome {
        report: StageReport {
            index,
            name,
            duration,
        },
        result,
    }
}

/// Fluent construction of a [`Pipeline`].
pub struct PipelineBuilder {
    stages: Vec<Arc<dyn Stage>>,
    conduit_capacity: usize,
    parent: Option<CancellationToken>,
}

impl PipelineBuilder {
    pub fn new() -> Self {
        Self {
            stages: Vec::new(),
            conduit_capacity: DEFAULT_CONDUIT_CAPACITY,
            parent: None,
        }
    }

    pub fn stage(mut self, stage: impl Stage + 'static) -> Self {
        self.stages.push(Arc::new(stage));
        self
    }

    pub fn conduit_capacity(mut self, capacity: usize) -> Self {
        self.conduit_capacity = capacity;
        self
    }

    pub fn cancellation(mut self, parent: CancellationToken) -> Self {
        self.parent = Some(parent);
        self
    }

    pub fn build(self) -> Result<Pipeline, PipelineError> {
        let mut pipeline =
            Pipeline::new(self.stages)?.with_conduit_capacity(self.conduit_capacity);
        if let Some(parent) = &self.parent {
            pipeline = pipeline.with_cancellation(parent);
        }
        Ok(pipeline)
    }
}

impl Default for PipelineBuilder {
    fn default() -> Self {
        Self::new()
    }
}
