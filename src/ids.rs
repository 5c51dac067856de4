// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::collections::HashSet;
use std::ops::RangeInclusive;

use uuid::Uuid;

use crate::error::EngineError;

pub const DEFAULT_ID_RANGE: RangeInclusive<i64> = 1000..=9999;

const RANDOM_ATTEMPTS: usize = 64;

/// Hands out transaction ids that are unique among the ids it was seeded
/// with and every id it has handed out since.
#[derive(Debug, Clone)]
pub struct IdAllocator {
    used: HashSet<i64>,
    range: RangeInclusive<i64>,
}

impl IdAllocator {
    pub fn new(existing: impl IntoIterator<Item = i64>) -> Self {
        Self::with_range(existing, DEFAULT_ID_RANGE)
    }

    pub fn with_range(existing: impl IntoIterator<Item = i64>, range: RangeInclusive<i64>) -> Self {
        Self {
            used: existing.into_iter().collect(),
            range,
        }
    }

    pub fn is_used(&self, id: i64) -> bool {
        self.used.contains(&id)
    }

    /// Picks a random free id, falling back to the lowest free id once
    /// random draws keep colliding.
    pub fn allocate(&mut self) -> Result<i64, EngineError> {
        let (lo, hi) = (*self.range.start(), *self.range.end());
        if lo > hi {
            return Err(EngineError::IdSpaceExhausted(self.range.clone()));
        }
        let span = (hi as i128 - lo as i128 + 1) as u128;
        let drawn = (0..RANDOM_ATTEMPTS)
            .map(|_| (lo as i128 + (Uuid::new_v4().as_u128() % span) as i128) as i64)
            .find(|id| !self.used.contains(id));
        let id = match drawn {
            Some(id) => id,
            None => self
                .range
                .clone()
                .find(|id| !self.used.contains(id))
                .ok_or_else(|| EngineError::IdSpaceExhausted(self.range.clone()))?,
        };
        self.used.insert(id);
        Ok(id)
    }
}
