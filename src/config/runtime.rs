// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::sync::Arc;

use crate::config::{validate_config, PipelineConfig};
use crate::engine::Pipeline;
use crate::errors::ConfigError;
use crate::signer::{DataSigner, Signer};
use crate::stages::{CombineResults, LogSink, MultiHash, SingleHash, Source};

/// Assembles the reference hashing pipeline from configuration.
///
/// The pipeline is `Source → SingleHash → MultiHash → CombineResults → LogSink`.
/// Both hashing stages share one [`Signer`], so a single digest128 lock covers
/// the whole run.
///
/// # Example
/// ```
/// use hash_pipeline::config::{PipelineConfig, RuntimeBuilder};
///
/// let pipeline = RuntimeBuilder::from_config(&PipelineConfig::default()).unwrap();
/// assert_eq!(
///     pipeline.stage_names(),
///     ["source", "single_hash", "multi_hash", "combine_results", "log_sink"]
/// );
/// ```
pub struct RuntimeBuilder;

impl RuntimeBuilder {
    /// Build the reference pipeline with a [`DataSigner`] configured from `cfg.signer`.
    pub fn from_config(cfg: &PipelineConfig) -> Result<Pipeline, ConfigError> {
        let signer = Signer::new(Arc::new(DataSigner::from_config(&cfg.signer)));
        Self::with_signer(cfg, signer)
    }

    /// Build the reference pipeline around an existing signer.
    pub fn with_signer(cfg: &PipelineConfig, signer: Signer) -> Result<Pipeline, ConfigError> {
        validate_config(cfg).map_err(ConfigError::Invalid)?;

        let pipeline = Pipeline::builder()
            .stage(Source::new(cfg.items.iter().copied()))
            .stage(SingleHash::new(signer.clone()).with_max_in_flight(cfg.max_in_flight))
            .stage(MultiHash::new(signer).with_max_in_flight(cfg.max_in_flight))
            .stage(CombineResults::new())
            .stage(LogSink)
            .conduit_capacity(cfg.conduit_capacity)
            .build()?;

        Ok(pipeline)
    }
}
