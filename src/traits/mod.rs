// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod digest;
pub mod stage;

pub use digest::Digester;
pub use stage::{stage_fn, FnStage, Stage};
