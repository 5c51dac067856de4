// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::ops::RangeInclusive;

use rust_decimal::Decimal;

/// Failures raised by the rule engines and the id allocator.
///
/// Store and command code wraps these in `anyhow::Error`; the engines
/// themselves log and degrade instead of returning most of them.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum EngineError {
    /// A running total no longer fits in a `Decimal`.
    #[error("amount overflow while summing {0}")]
    Overflow(String),

    /// Every id in the allocator's range is in use.
    #[error("no free transaction id left in {}..={}", .0.start(), .0.end())]
    IdSpaceExhausted(RangeInclusive<i64>),

    /// A limit must be positive and its threshold a percentage.
    #[error("invalid limit for '{category}': amount {amount}, threshold {threshold}%")]
    InvalidLimit {
        category: String,
        amount: Decimal,
        threshold: i64,
    },

    #[error("invalid date '{0}', expected MM/DD/YYYY")]
    InvalidDate(String),

    /// An alert key that is not `<category>_<threshold>_<level>`.
    #[error("invalid alert key '{0}'")]
    InvalidDedupKey(String),
}
