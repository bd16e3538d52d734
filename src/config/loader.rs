// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::config::consts::{DEFAULT_CONDUIT_CAPACITY, DEFAULT_ITEMS};
use crate::errors::ConfigError;
use crate::observability::messages::{validation::ConfigRejected, StructuredLog};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Configuration for a reference hashing pipeline run.
///
/// Every field is optional; an empty document yields the reference run over
/// `[0, 1, 1, 2, 3, 5, 8]` with capacity-1 conduits and no artificial latency.
///
/// # Fields
/// * `conduit_capacity` - Items buffered between adjacent stages (defaults to 1)
/// * `max_in_flight` - Bound on concurrently hashed items per stage (unbounded when absent)
/// * `signer` - Digest provider behaviour
/// * `expected_duration_ms` - Runs slower than this are reported with a warning
/// * `items` - Values emitted by the source stage
///
/// # Example
/// ```yaml
/// conduit_capacity: 1
/// max_in_flight: 16
/// expected_duration_ms: 3000
/// signer:
///   digest32_delay_ms: 1000
///   digest128_delay_ms: 10
///   detect_overheat: true
/// items: [0, 1, 1, 2, 3, 5, 8]
/// ```
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct PipelineConfig {
    #[serde(default = "default_conduit_capacity")]
    pub conduit_capacity: usize,
    #[serde(default)]
    pub max_in_flight: Option<usize>,
    #[serde(default)]
    pub signer: SignerConfig,
    #[serde(default)]
    pub expected_duration_ms: Option<u64>,
    #[serde(default = "default_items")]
    pub items: Vec<i64>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            conduit_capacity: default_conduit_capacity(),
            max_in_flight: None,
            signer: SignerConfig::default(),
            expected_duration_ms: None,
            items: default_items(),
        }
    }
}

/// Behaviour of the reference digest provider.
///
/// The delays model a slow external service; each call to the matching
/// primitive sleeps for that long before returning.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct SignerConfig {
    #[serde(default)]
    pub digest32_delay_ms: u64,
    #[serde(default)]
    pub digest128_delay_ms: u64,
    #[serde(default = "default_detect_overheat")]
    pub detect_overheat: bool,
}

impl Default for SignerConfig {
    fn default() -> Self {
        Self {
            digest32_delay_ms: 0,
            digest128_delay_ms: 0,
            detect_overheat: default_detect_overheat(),
        }
    }
}

fn default_conduit_capacity() -> usize {
    DEFAULT_CONDUIT_CAPACITY
}

fn default_items() -> Vec<i64> {
    DEFAULT_ITEMS.to_vec()
}

fn default_detect_overheat() -> bool {
    true
}

/// Load a config from a YAML file
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<PipelineConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let cfg: PipelineConfig = serde_yaml::from_str(&content)?;
    Ok(cfg)
}

/// Load a config from a YAML file and reject values the pipeline cannot run with.
pub fn load_and_validate_config<P: AsRef<Path>>(path: P) -> Result<PipelineConfig, ConfigError> {
    let cfg = load_config(path)?;

    if let Err(errors) = crate::config::validate_config(&cfg) {
        ConfigRejected { errors: &errors }.log();
        return Err(ConfigError::Invalid(errors));
    }

    Ok(cfg)
}
