// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::sync::Arc;

use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;

use crate::errors::PipelineError;
use crate::signer::DataSigner;
use crate::traits::Digester;

/// Hashing resource handle shared by the hashing stages.
///
/// Cloning is cheap; every clone shares the same digester and the same
/// digest128 lock, so one `Signer` built at startup and handed to each stage
/// serializes digest128 across the whole pipeline. The lock covers only the
/// digest128 call itself: digest32 calls, text formatting and unrelated items
/// proceed in parallel.
#[derive(Clone)]
pub struct Signer {
    digester: Arc<dyn Digester>,
    digest128_lock: Arc<Mutex<()>>,
}

impl Signer {
    pub fn new(digester: Arc<dyn Digester>) -> Self {
        Self {
            digester,
            digest128_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Signer backed by a [`DataSigner`] without artificial latency.
    pub fn reference() -> Self {
        Self::new(Arc::new(DataSigner::new()))
    }

    /// Compute digest32 on the blocking pool. Unrestricted concurrency.
    pub async fn digest32(&self, data: String) -> Result<String, PipelineError> {
        let digester = Arc::clone(&self.digester);
        tokio::task::spawn_blocking(move || digester.digest32(&data))
            .await?
            .map_err(PipelineError::digest32)
    }

    /// Compute digest128 on the blocking pool while holding the exclusive lock.
    ///
    /// Waiting for the lock is abandoned when `token` is cancelled. Once the
    /// call has started the lock is held until it returns, even if the caller
    /// stops waiting for the result.
    pub async fn digest128(
        &self,
        data: String,
        token: &CancellationToken,
    ) -> Result<String, PipelineError> {
        let guard = tokio::select! {
            biased;
            _ = token.cancelled() => return Err(PipelineError::Cancelled),
            guard = Arc::clone(&self.digest128_lock).lock_owned() => guard,
        };

        let digester = Arc::clone(&self.digester);
        tokio::task::spawn_blocking(move || {
            let _guard = guard;
            digester.digest128(&data)
        })
        .await?
        .map_err(PipelineError::digest128)
    }
}
