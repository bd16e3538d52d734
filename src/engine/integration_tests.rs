// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! End-to-end runs of the executor with the hashing stages.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::sync::{mpsc, Notify};
use tokio_util::sync::CancellationToken;

use crate::engine::{Inbound, Outbound, Pipeline, RunState};
use crate::errors::{DigestError, PipelineError};
use crate::item::WorkItem;
use crate::signer::{DataSigner, Signer};
use crate::stages::{CollectSink, CombineResults, MultiHash, SingleHash, Source};
use crate::traits::{stage_fn, Digester, Stage};

const FIBONACCI: [i64; 7] = [0, 1, 1, 2, 3, 5, 8];

const FIBONACCI_COMBINED: &str = "1173136728138862632818075107442090076184424490584241521304_\
1696913515191343735512658979631549563179965036907783101867_\
27225454331033649287118297354036464389062965355426795162684_\
29568666068035183841425683795340791879727309630931025356555_\
3994492081516972096677631278379039212655368881548151736_\
4958044192186797981418233587017209679042592862002427381542_\
4958044192186797981418233587017209679042592862002427381542";

/// Fails digest32 for one exact input, delegating everything else.
struct FailOn {
    data: &'static str,
    inner: DataSigner,
}

impl Digester for FailOn {
    fn digest32(&self, data: &str) -> Result<String, DigestError> {
        if data == self.data {
            return Err(DigestError::Provider(format!("refused {}", data)));
        }
        self.inner.digest32(data)
    }

    fn digest128(&self, data: &str) -> Result<String, DigestError> {
        self.inner.digest128(data)
    }
}

/// Tracks how many digest32 calls run at the same time.
#[derive(Default)]
struct Overlap {
    active: AtomicUsize,
    peak: AtomicUsize,
    inner: DataSigner,
}

impl Digester for Overlap {
    fn digest32(&self, data: &str) -> Result<String, DigestError> {
        let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        std::thread::sleep(Duration::from_millis(50));
        self.active.fetch_sub(1, Ordering::SeqCst);
        self.inner.digest32(data)
    }

    fn digest128(&self, data: &str) -> Result<String, DigestError> {
        self.inner.digest128(data)
    }
}

struct Panicking;

#[async_trait]
impl Stage for Panicking {
    async fn run(&self, mut input: Inbound, _output: Outbound) -> Result<(), PipelineError> {
        if input.recv().await?.is_some() {
            panic!("stage exploded");
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "panicking"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn fibonacci_end_to_end() {
        let signer = Signer::new(Arc::new(DataSigner::new()));
        let (sink, collected) = CollectSink::new();

        let report = Pipeline::builder()
            .stage(Source::new(FIBONACCI))
            .stage(SingleHash::new(signer.clone()))
            .stage(MultiHash::new(signer))
            .stage(CombineResults::new())
            .stage(sink)
            .build()
            .unwrap()
            .execute()
            .await
            .unwrap();

        let items = collected.items();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].as_str(), Some(FIBONACCI_COMBINED));
        assert!(report.output.is_empty());

        let names: Vec<&str> = report.stages.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(
            names,
            ["source", "single_hash", "multi_hash", "combine_results", "collect_sink"]
        );
    }

    #[tokio::test]
    async fn last_stage_output_lands_in_report() {
        let signer = Signer::reference();
        let report = Pipeline::builder()
            .stage(Source::new(FIBONACCI))
            .stage(SingleHash::new(signer.clone()))
            .stage(MultiHash::new(signer))
            .stage(CombineResults::new())
            .build()
            .unwrap()
            .execute()
            .await
            .unwrap();

        assert_eq!(report.output, vec![WorkItem::from(FIBONACCI_COMBINED)]);
    }

    #[tokio::test]
    async fn same_result_with_latency_and_bounded_workers() {
        let signer = Signer::new(Arc::new(DataSigner::with_delays(
            Duration::from_millis(3),
            Duration::from_millis(2),
        )));
        let report = Pipeline::builder()
            .stage(Source::new(FIBONACCI))
            .stage(SingleHash::new(signer.clone()).with_max_in_flight(Some(2)))
            .stage(MultiHash::new(signer).with_max_in_flight(Some(3)))
            .stage(CombineResults::new())
            .conduit_capacity(4)
            .build()
            .unwrap()
            .execute()
            .await
            .unwrap();

        assert_eq!(report.output, vec![WorkItem::from(FIBONACCI_COMBINED)]);
    }

    #[tokio::test]
    async fn hundred_concurrent_copies_match_sequential_reference() {
        let reference = DataSigner::new();
        let expected = format!(
            "{}~{}",
            reference.digest32("7").unwrap(),
            reference
                .digest32(&reference.digest128("7").unwrap())
                .unwrap()
        );

        let digester = Arc::new(DataSigner::with_delays(
            Duration::ZERO,
            Duration::from_millis(1),
        ));
        let (sink, collected) = CollectSink::new();

        Pipeline::builder()
            .stage(Source::new(vec![7; 100]))
            .stage(SingleHash::new(Signer::new(digester.clone())))
            .stage(sink)
            .build()
            .unwrap()
            .execute()
            .await
            .unwrap();

        let items = collected.items();
        assert_eq!(items.len(), 100);
        assert!(items.iter().all(|item| item.as_str() == Some(expected.as_str())));
        assert_eq!(digester.stats().digest128_calls, 100);
        assert_eq!(digester.stats().digest32_calls, 200);
    }

    #[tokio::test]
    async fn digest128_lock_does_not_serialize_items() {
        let digest32_delay = Duration::from_millis(100);
        let signer = Signer::new(Arc::new(DataSigner::with_delays(
            digest32_delay,
            Duration::ZERO,
        )));
        let (sink, collected) = CollectSink::new();

        let started = Instant::now();
        Pipeline::builder()
            .stage(Source::new(0..8))
            .stage(SingleHash::new(signer))
            .stage(sink)
            .build()
            .unwrap()
            .execute()
            .await
            .unwrap();
        let elapsed = started.elapsed();

        // Each item needs one digest32 delay; items held end to end would need eight
        assert_eq!(collected.items().len(), 8);
        assert!(
            elapsed < 2 * digest32_delay + Duration::from_millis(100),
            "items were serialized: {:?}",
            elapsed
        );
    }

    #[tokio::test]
    async fn digest32_calls_of_different_items_overlap() {
        let digester = Arc::new(Overlap::default());
        let (sink, collected) = CollectSink::new();

        Pipeline::builder()
            .stage(Source::new(0..8))
            .stage(SingleHash::new(Signer::new(digester.clone())))
            .stage(sink)
            .build()
            .unwrap()
            .execute()
            .await
            .unwrap();

        assert_eq!(collected.items().len(), 8);
        // One item alone never runs more than its two digest32 branches at once
        assert!(digester.peak.load(Ordering::SeqCst) > 2);
        assert_eq!(digester.inner.stats().digest128_calls, 8);
    }

    #[tokio::test]
    async fn items_overlap_within_a_stage() {
        let signer = Signer::new(Arc::new(DataSigner::with_delays(
            Duration::from_millis(20),
            Duration::from_millis(5),
        )));

        let started = Instant::now();
        let report = Pipeline::builder()
            .stage(Source::new(FIBONACCI))
            .stage(SingleHash::new(signer.clone()))
            .stage(MultiHash::new(signer))
            .stage(CombineResults::new())
            .build()
            .unwrap()
            .execute()
            .await
            .unwrap();

        // Serial execution needs 7 * (2*20 + 5 + 6*20) ms
        assert!(started.elapsed() < Duration::from_millis(800));
        assert_eq!(report.output, vec![WorkItem::from(FIBONACCI_COMBINED)]);
    }

    #[tokio::test]
    async fn returns_only_after_every_stage_finished() {
        let finished = Arc::new(AtomicBool::new(false));
        let flag = finished.clone();
        let slow_sink = stage_fn("slow_sink", move |mut input, _output| {
            let flag = flag.clone();
            async move {
                while input.recv().await?.is_some() {}
                tokio::time::sleep(Duration::from_millis(50)).await;
                flag.store(true, Ordering::SeqCst);
                Ok::<(), PipelineError>(())
            }
        });

        let report = Pipeline::builder()
            .stage(Source::new([1, 2, 3]))
            .stage(slow_sink)
            .build()
            .unwrap()
            .execute()
            .await
            .unwrap();

        assert!(finished.load(Ordering::SeqCst));
        assert_eq!(report.stages.len(), 2);
    }

    #[tokio::test]
    async fn full_conduit_blocks_upstream() {
        let sent = Arc::new(AtomicUsize::new(0));
        let gate = Arc::new(Notify::new());

        let counter = sent.clone();
        let producer = stage_fn("producer", move |_input, output| {
            let counter = counter.clone();
            async move {
                for i in 0..10 {
                    output.send(i).await?;
                    counter.fetch_add(1, Ordering::SeqCst);
                }
                Ok::<(), PipelineError>(())
            }
        });

        let opened = gate.clone();
        let gated_sink = stage_fn("gated_sink", move |mut input, _output| {
            let opened = opened.clone();
            async move {
                opened.notified().await;
                while input.recv().await?.is_some() {}
                Ok::<(), PipelineError>(())
            }
        });

        let pipeline = Pipeline::builder()
            .stage(producer)
            .stage(gated_sink)
            .conduit_capacity(1)
            .build()
            .unwrap();
        let run = tokio::spawn(pipeline.execute());

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(sent.load(Ordering::SeqCst), 1);

        gate.notify_one();
        run.await.unwrap().unwrap();
        assert_eq!(sent.load(Ordering::SeqCst), 10);
    }

    #[tokio::test]
    async fn hash_failure_aborts_without_partial_aggregate() {
        let signer = Signer::new(Arc::new(FailOn {
            data: "3",
            inner: DataSigner::new(),
        }));
        let (sink, collected) = CollectSink::new();

        let err = Pipeline::builder()
            .stage(Source::new(FIBONACCI))
            .stage(SingleHash::new(signer.clone()))
            .stage(MultiHash::new(signer))
            .stage(CombineResults::new())
            .stage(sink)
            .build()
            .unwrap()
            .execute()
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            PipelineError::HashPrimitiveFailure {
                primitive: "digest32",
                ..
            }
        ));
        assert!(collected.items().is_empty());
    }

    #[tokio::test]
    async fn overheat_surfaces_as_digest128_failure() {
        struct Unlocked(Arc<DataSigner>);

        #[async_trait]
        impl Stage for Unlocked {
            async fn run(&self, mut input: Inbound, output: Outbound) -> Result<(), PipelineError> {
                let mut calls = tokio::task::JoinSet::new();
                while let Some(item) = input.recv().await? {
                    let signer = self.0.clone();
                    calls.spawn_blocking(move || signer.digest128(&item.into_text()));
                }
                while let Some(joined) = calls.join_next().await {
                    let digest = joined?.map_err(PipelineError::digest128)?;
                    output.send(digest).await?;
                }
                Ok(())
            }

            fn name(&self) -> &str {
                "unlocked"
            }
        }

        let digester = Arc::new(DataSigner::with_delays(
            Duration::ZERO,
            Duration::from_millis(20),
        ));
        let err = Pipeline::builder()
            .stage(Source::new(0..16))
            .stage(Unlocked(digester))
            .build()
            .unwrap()
            .execute()
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            PipelineError::HashPrimitiveFailure {
                primitive: "digest128",
                source: DigestError::Overheated,
            }
        ));
    }

    #[tokio::test]
    async fn stage_panic_is_contained() {
        let (sink, collected) = CollectSink::new();
        let err = Pipeline::builder()
            .stage(Source::new(FIBONACCI))
            .stage(Panicking)
            .stage(CombineResults::new())
            .stage(sink)
            .build()
            .unwrap()
            .execute()
            .await
            .unwrap_err();

        assert!(matches!(err, PipelineError::StagePanicked { ref stage } if stage == "panicking"));
        assert!(collected.items().is_empty());
    }

    #[tokio::test]
    async fn external_cancellation_stops_the_run() {
        let parent = CancellationToken::new();
        let (feed, input) = mpsc::channel::<WorkItem>(1);
        let signer = Signer::reference();

        let pipeline = Pipeline::builder()
            .stage(SingleHash::new(signer))
            .stage(CombineResults::new())
            .cancellation(parent.clone())
            .build()
            .unwrap();
        let mut state = pipeline.subscribe();
        let run = tokio::spawn(pipeline.execute_with_input(input));

        feed.send(WorkItem::from(1)).await.unwrap();
        tokio::time::sleep(Duration::from_millis(20)).await;
        parent.cancel();

        let err = run.await.unwrap().unwrap_err();
        assert!(err.is_cancellation());
        assert_eq!(*state.borrow_and_update(), RunState::Done);
        drop(feed);
    }

    #[tokio::test]
    async fn external_input_feeds_first_stage() {
        let (feed, input) = mpsc::channel::<WorkItem>(4);
        let signer = Signer::reference();
        let pipeline = Pipeline::builder()
            .stage(SingleHash::new(signer.clone()))
            .stage(MultiHash::new(signer))
            .stage(CombineResults::new())
            .build()
            .unwrap();
        let run = tokio::spawn(pipeline.execute_with_input(input));

        for value in FIBONACCI {
            feed.send(WorkItem::from(value)).await.unwrap();
        }
        drop(feed);

        let report = run.await.unwrap().unwrap();
        assert_eq!(report.output, vec![WorkItem::from(FIBONACCI_COMBINED)]);
    }

    #[tokio::test]
    async fn run_state_ends_done() {
        let pipeline = Pipeline::builder()
            .stage(Source::new(FIBONACCI))
            .stage(CombineResults::new())
            .build()
            .unwrap();
        let state = pipeline.subscribe();
        assert_eq!(*state.borrow(), RunState::Idle);

        pipeline.execute().await.unwrap();
        assert_eq!(*state.borrow(), RunState::Done);
    }

    #[tokio::test]
    async fn empty_pipeline_is_rejected() {
        let err = Pipeline::builder().build().err().unwrap();
        assert!(matches!(err, PipelineError::EmptyPipeline));
    }

    #[tokio::test]
    async fn empty_source_still_combines_once() {
        let report = Pipeline::builder()
            .stage(Source::new(Vec::<i64>::new()))
            .stage(CombineResults::new())
            .build()
            .unwrap()
            .execute()
            .await
            .unwrap();

        assert_eq!(report.output, vec![WorkItem::from("")]);
    }
}
