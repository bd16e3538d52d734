// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::errors::DigestError;

/// Provider of the two digest primitives the hashing stages are built on.
///
/// Both calls are deterministic and may block (the reference provider sleeps to
/// model a slow external service), so callers run them on the blocking pool.
///
/// `digest32` must be safe to call from any number of threads at once.
/// `digest128` is **not** required to be reentrant: callers must serialize it,
/// which [`Signer`](crate::signer::Signer) does with a single exclusive lock.
pub trait Digester: Send + Sync {
    /// Short digest rendered as unsigned decimal text.
    fn digest32(&self, data: &str) -> Result<String, DigestError>;

    /// Long digest rendered as text. Not safe for concurrent invocation.
    fn digest128(&self, data: &str) -> Result<String, DigestError>;
}
