// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

mod per_item;

pub mod combine_results;
pub mod multi_hash;
pub mod single_hash;
pub mod sink;
pub mod source;

pub use combine_results::{combine, CombineResults};
pub use multi_hash::MultiHash;
pub use single_hash::SingleHash;
pub use sink::{CollectSink, Collected, LogSink};
pub use source::Source;
