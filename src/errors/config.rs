// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use thiserror::Error;

use crate::errors::PipelineError;

/// Errors that can occur while loading or validating a pipeline configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),

    /// The config file is not valid YAML for this schema
    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),

    /// The config parsed but contains invalid values
    #[error("Configuration validation failed:\n{}", .0.iter().map(|e| e.to_string()).collect::<Vec<_>>().join("\n"))]
    Invalid(Vec<ValidationError>),

    /// A valid config still could not be turned into a pipeline
    #[error("Failed to assemble pipeline: {0}")]
    Assembly(#[from] PipelineError),
}

/// A single invalid value in a pipeline configuration
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// Conduits need room for at least one item
    #[error("conduit_capacity must be at least 1, got {value}")]
    ZeroConduitCapacity { value: usize },

    /// A bound on in-flight items of zero would never admit an item
    #[error("max_in_flight must be at least 1 when set, got {value}")]
    ZeroMaxInFlight { value: usize },

    /// The source has nothing to emit
    #[error("items must not be empty")]
    NoItems,
}
