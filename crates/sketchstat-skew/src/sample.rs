// sketchstat - Statistical post-processing for sketch evaluations
//
// Copyright (c) 2025 Dweve IP B.V. and individual contributors.
//
// SPDX-License-Identifier: Apache-2.0
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE file at the
// root of this repository or at: http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Sampled top-k counts.

use sketchstat_core::{Result, StatError};

/// Occurrence counts of the k most frequent items, by rank, plus the total
/// number of observations.
///
/// `counts()[0]` is the count of rank 1.
///
/// # Example
///
/// ```
/// use sketchstat_skew::TopKSample;
///
/// let sample = TopKSample::from_unordered(vec![120, 900, 410], 10_000).unwrap();
/// assert_eq!(sample.counts(), [900, 410, 120]);
/// assert_eq!(sample.k(), 3);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopKSample {
    counts: Vec<u64>,
    total: u64,
}

impl TopKSample {
    /// Sample whose counts are already ordered by rank.
    ///
    /// # Errors
    ///
    /// - [`StatError::EmptyInput`] when `counts` is empty
    /// - [`StatError::InvalidConfig`] when `total` is zero
    pub fn new(counts: Vec<u64>, total: u64) -> Result<Self> {
        if counts.is_empty() {
            return Err(StatError::EmptyInput("top-k sample".to_string()));
        }
        if total == 0 {
            return Err(StatError::InvalidConfig(
                "top-k sample needs a positive observation count".to_string(),
            ));
        }
        Ok(Self { counts, total })
    }

    /// Sample from counts in any order; they are ranked largest first.
    pub fn from_unordered(mut counts: Vec<u64>, total: u64) -> Result<Self> {
        counts.sort_unstable_by(|a, b| b.cmp(a));
        Self::new(counts, total)
    }

    /// Number of ranks.
    pub fn k(&self) -> usize {
        self.counts.len()
    }

    /// Counts by rank.
    pub fn counts(&self) -> &[u64] {
        &self.counts
    }

    /// Total number of observations.
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Observed relative frequencies `c_i / n`.
    pub fn frequencies(&self) -> Vec<f64> {
        let n = self.total as f64;
        self.counts.iter().map(|&c| c as f64 / n).collect()
    }

    /// `(rank, count)` pairs, rank starting at 1.
    pub fn ranked(&self) -> impl Iterator<Item = (usize, u64)> + '_ {
        self.counts.iter().enumerate().map(|(i, &c)| (i + 1, c))
    }
}
