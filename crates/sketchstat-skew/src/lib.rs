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

//! Zipf skew estimation from sampled top-k counts.
//!
//! Given the counts of the k most frequent items out of n observations, the
//! estimators here recover the skew `a` of the Zipf law that produced them.
//!
//! # Estimators
//!
//! - **Grid search** ([`estimate_grid`], [`estimate_skew`]): evaluate the
//!   dispersion of the per-rank harmonic-number estimates on a [`SkewGrid`]
//!   and take the least dispersed candidate
//! - **Bisection** ([`bisect_skew`]): follow the slope of the same dispersion
//! - **Frequency fit** ([`best_frequency_fit`]): compare observed frequencies
//!   with Zipf frequencies from a [`HarmonicTable`] for a known domain size
//!
//! # Example
//!
//! ```
//! use sketchstat_skew::{estimate_grid, best_candidate, SkewGrid, TopKSample};
//!
//! // Counts of the top 10 items out of 10^9 observations.
//! let counts = vec![
//!     17_549_828, 10_068_646, 7_292_554, 5_785_812, 4_835_542,
//!     4_186_799, 3_699_199, 3_322_079, 3_027_581, 2_777_846,
//! ];
//! let sample = TopKSample::new(counts, 1_000_000_000).unwrap();
//!
//! let estimates = estimate_grid(&sample, &SkewGrid::default());
//! let best = best_candidate(&estimates).unwrap();
//! assert!((best.skew - 0.8).abs() < 1e-9);
//! ```

mod estimator;
mod harmonic;
mod moments;
mod sample;

pub use estimator::{
    best_candidate, best_frequency_fit, bisect_skew, estimate_at, estimate_grid, estimate_skew,
    frequency_fit_cost, harmonic_estimates, median_harmonic_estimate, write_estimates,
    BisectConfig, SkewEstimate, SkewGrid, MAX_GRID_POINTS,
};
pub use harmonic::{harmonic_number, zipf_expected_counts, zipf_frequencies, HarmonicTable};
pub use moments::Moments;
pub use sample::TopKSample;
