// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Shared hashing resource.
//!
//! * [`DataSigner`] - reference [`Digester`](crate::traits::Digester): CRC-32
//!   as decimal text and MD5 as lowercase hex, with optional simulated latency
//!   and detection of concurrent digest128 calls.
//! * [`Signer`] - the handle injected into every hashing stage. It pairs a
//!   digester with the single exclusive lock that serializes digest128.

mod data_signer;
mod handle;

pub use data_signer::{DataSigner, SignerStats};
pub use handle::Signer;
