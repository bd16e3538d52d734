// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Value checks for pipeline configurations.
//!
//! Every check runs and every failure is collected, so a single pass reports
//! all invalid values at once.

use crate::config::PipelineConfig;
use crate::errors::ValidationError;

/// Validate a configuration before a pipeline is built from it.
///
/// # Errors
/// Returns every [`ValidationError`] found, in field order.
pub fn validate_config(config: &PipelineConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.conduit_capacity == 0 {
        errors.push(ValidationError::ZeroConduitCapacity {
            value: config.conduit_capacity,
        });
    }

    if let Some(0) = config.max_in_flight {
        errors.push(ValidationError::ZeroMaxInFlight { value: 0 });
    }

    if config.items.is_empty() {
        errors.push(ValidationError::NoItems);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(validate_config(&PipelineConfig::default()).is_ok());
    }

    #[test]
    fn zero_capacity_is_rejected() {
        let config = PipelineConfig {
            conduit_capacity: 0,
            ..PipelineConfig::default()
        };
        assert_eq!(
            validate_config(&config),
            Err(vec![ValidationError::ZeroConduitCapacity { value: 0 }])
        );
    }

    #[test]
    fn bounded_in_flight_must_admit_an_item() {
        let mut config = PipelineConfig {
            max_in_flight: Some(0),
            ..PipelineConfig::default()
        };
        assert_eq!(
            validate_config(&config),
            Err(vec![ValidationError::ZeroMaxInFlight { value: 0 }])
        );

        config.max_in_flight = Some(1);
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn empty_items_are_rejected() {
        let config = PipelineConfig {
            items: Vec::new(),
            ..PipelineConfig::default()
        };
        assert_eq!(validate_config(&config), Err(vec![ValidationError::NoItems]));
    }
}
