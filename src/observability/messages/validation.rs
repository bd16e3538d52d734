// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for configuration validation failures.

use crate::errors::ValidationError;
use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use tracing::Span;

/// Configuration was rejected.
///
/// # Log Level
/// `error!` - Failure requiring attention
///
/// # Example
/// ```
/// use hash_pipeline::errors::ValidationError;
/// use hash_pipeline::observability::messages::validation::ConfigRejected;
///
/// let errors = vec![ValidationError::NoItems];
/// let msg = ConfigRejected { errors: &errors };
///
/// tracing::error!("{}", msg);
/// ```
pub struct ConfigRejected<'a> {
    pub errors: &'a [ValidationError],
}

impl Display for ConfigRejected<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Configuration rejected with {} error(s)", self.errors.len())?;
        for error in self.errors {
            write!(f, "; {}", error)?;
        }
        Ok(())
    }
}

impl StructuredLog for ConfigRejected<'_> {
    fn log(&self) {
        tracing::error!(error_count = self.errors.len(), "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::error_span!(
            "config_rejected",
            span_name = name,
            error_count = self.errors.len(),
        )
    }
}
