// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

/// Items held by a conduit before its producer blocks
pub const DEFAULT_CONDUIT_CAPACITY: usize = 1;
/// Branches per item in SingleHash: `digest32(x)` and `digest32(digest128(x))`
pub const SINGLE_HASH_FAN_OUT: usize = 2;
/// Branches per item in MultiHash: `digest32(i + x)` for i in 0..6
pub const MULTI_HASH_FAN_OUT: usize = 6;
/// Joins the two SingleHash segments
pub const SINGLE_HASH_SEPARATOR: &str = "~";
/// Joins the sorted CombineResults inputs
pub const COMBINE_SEPARATOR: &str = "_";
/// Items emitted by the reference source when none are configured
pub const DEFAULT_ITEMS: [i64; 7] = [0, 1, 1, 2, 3, 5, 8];
