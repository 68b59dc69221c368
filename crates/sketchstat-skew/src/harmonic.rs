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

//! Generalized harmonic numbers and Zipf rank frequencies.

use crate::estimator::SkewGrid;
use tracing::debug;

/// Generalized harmonic number `H(D, a) = Σ_{j=1}^{D} j^-a`.
///
/// This is the normalizing constant of a Zipf law with skew `a` over a
/// domain of `D` items.
///
/// # Example
///
/// ```
/// use sketchstat_skew::harmonic_number;
///
/// assert!((harmonic_number(4, 1.0) - (1.0 + 0.5 + 1.0 / 3.0 + 0.25)).abs() < 1e-12);
/// assert_eq!(harmonic_number(10, 0.0), 10.0);
/// ```
pub fn harmonic_number(domain: u64, skew: f64) -> f64 {
    // Smallest terms first keeps the sum accurate for large domains.
    (1..=domain).rev().map(|j| (j as f64).powf(-skew)).sum()
}

/// Expected relative frequencies of ranks `1..=k` under Zipf(`skew`) over
/// `domain` items: `f_i = i^-a / H(D, a)`.
///
/// # Example
///
/// ```
/// use sketchstat_skew::zipf_frequencies;
///
/// let f = zipf_frequencies(3, 3, 1.0);
/// let total: f64 = f.iter().sum();
/// assert!((total - 1.0).abs() < 1e-12);
/// assert!(f[0] > f[1] && f[1] > f[2]);
/// ```
pub fn zipf_frequencies(k: usize, domain: u64, skew: f64) -> Vec<f64> {
    let harmonic = harmonic_number(domain, skew);
    (1..=k)
        .map(|i| (i as f64).powf(-skew) / harmonic)
        .collect()
}

/// Noiseless top-k counts for `total` observations of Zipf(`skew`) over
/// `domain` items, rounded to the nearest integer.
///
/// Useful as a reference sample: the estimators recover `skew` from it.
pub fn zipf_expected_counts(k: usize, domain: u64, skew: f64, total: u64) -> Vec<u64> {
    zipf_frequencies(k, domain, skew)
        .into_iter()
        .map(|f| (f * total as f64).round() as u64)
        .collect()
}

/// Harmonic numbers precomputed for every skew of a grid over one domain.
///
/// Summing a domain of `2^26` terms is slow; the table pays that once per
/// grid point.
///
/// # Example
///
/// ```
/// use sketchstat_skew::{HarmonicTable, SkewGrid};
///
/// let grid = SkewGrid::new(0.6, 1.3, 0.1).unwrap();
/// let table = HarmonicTable::build(1 << 10, &grid);
/// assert_eq!(table.len(), 8);
/// assert!(table.get(0.9).is_some());
/// assert!(table.get(0.95).is_none());
/// assert!(table.get_or_compute(0.95) > table.get(1.0).unwrap());
/// ```
#[derive(Debug, Clone)]
pub struct HarmonicTable {
    domain: u64,
    entries: Vec<(f64, f64)>,
}

/// Two skews closer than this share a table entry.
const SKEW_TOLERANCE: f64 = 1e-9;

impl HarmonicTable {
    /// Compute `H(domain, a)` for every grid point.
    pub fn build(domain: u64, grid: &SkewGrid) -> Self {
        let entries: Vec<(f64, f64)> = grid
            .points()
            .into_iter()
            .map(|skew| (skew, harmonic_number(domain, skew)))
            .collect();
        debug!(domain, entries = entries.len(), "built harmonic number table");
        Self { domain, entries }
    }

    /// Domain size the table was built for.
    pub fn domain(&self) -> u64 {
        self.domain
    }

    /// Number of cached skews.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `(skew, harmonic number)` pairs in grid order.
    pub fn entries(&self) -> &[(f64, f64)] {
        &self.entries
    }

    /// Cached harmonic number for `skew`, if it is a grid point.
    pub fn get(&self, skew: f64) -> Option<f64> {
        self.entries
            .iter()
            .find(|(s, _)| (s - skew).abs() < SKEW_TOLERANCE)
            .map(|&(_, h)| h)
    }

    /// Cached harmonic number, or compute it when `skew` is off the grid.
    pub fn get_or_compute(&self, skew: f64) -> f64 {
        self.get(skew)
            .unwrap_or_else(|| harmonic_number(self.domain, skew))
    }
}
