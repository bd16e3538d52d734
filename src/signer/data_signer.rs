// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use md5::{Digest, Md5};

use crate::config::SignerConfig;
use crate::errors::DigestError;
use crate::observability::messages::{
    signer::{DigestComputed, DigestOverheated},
    StructuredLog,
};
use crate::traits::Digester;

/// Reference digest provider.
///
/// * `digest32` - CRC-32 (IEEE) of the UTF-8 bytes, rendered as unsigned decimal.
/// * `digest128` - MD5 of the UTF-8 bytes, rendered as 32 lowercase hex digits.
///
/// Each call can be slowed down by a fixed delay to model a slow external
/// service. With overheat detection enabled, entering `digest128` while another
/// `digest128` call is in progress fails with [`DigestError::Overheated`], which
/// makes a missing or misplaced exclusive lock observable.
pub struct DataSigner {
    digest32_delay: Duration,
    digest128_delay: Duration,
    detect_overheat: bool,
    digest128_busy: AtomicBool,
    digest32_calls: AtomicUsize,
    digest128_calls: AtomicUsize,
}

/// Number of digest calls a [`DataSigner`] has served.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SignerStats {
    pub digest32_calls: usize,
    pub digest128_calls: usize,
}

impl DataSigner {
    /// Signer without artificial latency, with overheat detection enabled.
    pub fn new() -> Self {
        Self::with_delays(Duration::ZERO, Duration::ZERO)
    }

    pub fn with_delays(digest32_delay: Duration, digest128_delay: Duration) -> Self {
        Self {
            digest32_delay,
            digest128_delay,
            detect_overheat: true,
            digest128_busy: AtomicBool::new(false),
            digest32_calls: AtomicUsize::new(0),
            digest128_calls: AtomicUsize::new(0),
        }
    }

    pub fn from_config(config: &SignerConfig) -> Self {
        Self::with_delays(
            Duration::from_millis(config.digest32_delay_ms),
            Duration::from_millis(config.digest128_delay_ms),
        )
        .detect_overheat(config.detect_overheat)
    }

    pub fn detect_overheat(mut self, enabled: bool) -> Self {
        self.detect_overheat = enabled;
        self
    }

    pub fn stats(&self) -> SignerStats {
        SignerStats {
            digest32_calls: self.digest32_calls.load(Ordering::SeqCst),
            digest128_calls: self.digest128_calls.load(Ordering::SeqCst),
        }
    }

    fn compute_digest128(&self, data: &str) -> String {
        if !self.digest128_delay.is_zero() {
            std::thread::sleep(self.digest128_delay);
        }
        format!("{:x}", Md5::digest(data.as_bytes()))
    }
}

impl Default for DataSigner {
    fn default() -> Self {
        Self::new()
    }
}

impl Digester for DataSigner {
    fn digest32(&self, data: &str) -> Result<String, DigestError> {
        self.digest32_calls.fetch_add(1, Ordering::SeqCst);
        if !self.digest32_delay.is_zero() {
            std::thread::sleep(self.digest32_delay);
        }
        let digest = crc32fast::hash(data.as_bytes()).to_string();
        DigestComputed {
            primitive: "digest32",
            input: data,
            digest: &digest,
        }
        .log();
        Ok(digest)
    }

    fn digest128(&self, data: &str) -> Result<String, DigestError> {
        self.digest128_calls.fetch_add(1, Ordering::SeqCst);

        if !self.detect_overheat {
            return Ok(self.compute_digest128(data));
        }

        if self.digest128_busy.swap(true, Ordering::SeqCst) {
            DigestOverheated { input: data }.log();
            return Err(DigestError::Overheated);
        }
        let digest = self.compute_digest128(data);
        self.digest128_busy.store(false, Ordering::SeqCst);

        DigestComputed {
            primitive: "digest128",
            input: data,
            digest: &digest,
        }
        .log();
        Ok(digest)
    }
}
