// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Errors reported by digest providers.

use thiserror::Error;

/// Failure of a single digest call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DigestError {
    /// digest128 was entered while another call was still running
    #[error("digest128 overheat: concurrent invocation detected")]
    Overheated,

    /// The provider could not compute a digest
    #[error("digest provider failure: {0}")]
    Provider(String),
}
