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

//! Skew estimation by harmonic-number inversion.
//!
//! Under Zipf(`a`) over `D` items, rank `i` has frequency `i^-a / H(D, a)`.
//! Inverting an observed frequency `c_i / n` gives one estimate of the
//! normalizer per rank:
//!
//! ```text
//! Ĥ_i(a) = n / ((c_i + 1) · i^a)
//! ```
//!
//! (`c_i + 1` keeps a zero count finite). At the true skew every rank
//! estimates the same constant, so the candidate whose estimates disperse
//! least is the skew estimate.

use crate::harmonic::HarmonicTable;
use crate::moments::Moments;
use crate::sample::TopKSample;
use sketchstat_core::{format_number, write_rows, Result, StatError};
use std::cmp::Ordering;
use std::path::Path;
use tracing::{debug, info};

/// Grid points are rounded to this many decimals so `0.3 + 10 * 0.05`
/// prints as `0.8`.
const GRID_DECIMALS: i32 = 10;

/// Upper bound on the number of candidates in a [`SkewGrid`].
pub const MAX_GRID_POINTS: usize = 1_000_000;

/// Candidate skews `start, start + step, ..., end` (end inclusive).
///
/// # Example
///
/// ```
/// use sketchstat_skew::SkewGrid;
///
/// let grid = SkewGrid::default();
/// let points = grid.points();
/// assert_eq!(points.first(), Some(&0.3));
/// assert_eq!(points.last(), Some(&1.4));
/// assert_eq!(points.len(), 23);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SkewGrid {
    start: f64,
    end: f64,
    step: f64,
}

impl Default for SkewGrid {
    fn default() -> Self {
        Self {
            start: 0.30,
            end: 1.40,
            step: 0.05,
        }
    }
}

impl SkewGrid {
    /// Grid from `start` to `end` inclusive.
    ///
    /// # Errors
    ///
    /// [`StatError::InvalidConfig`] unless all values are finite,
    /// `step > 0`, `start <= end` and the grid holds at most
    /// [`MAX_GRID_POINTS`] candidates.
    pub fn new(start: f64, end: f64, step: f64) -> Result<Self> {
        if !(start.is_finite() && end.is_finite() && step.is_finite()) {
            return Err(StatError::InvalidConfig(
                "skew grid bounds must be finite".to_string(),
            ));
        }
        if step <= 0.0 {
            return Err(StatError::InvalidConfig(
                "skew grid step must be positive".to_string(),
            ));
        }
        if start > end {
            return Err(StatError::InvalidConfig(format!(
                "skew grid start {} is above end {}",
                start, end
            )));
        }
        let grid = Self { start, end, step };
        if grid.step_count() >= MAX_GRID_POINTS as f64 {
            return Err(StatError::InvalidConfig(format!(
                "skew grid from {} to {} by {} exceeds {} candidates",
                start, end, step, MAX_GRID_POINTS
            )));
        }
        Ok(grid)
    }

    /// First candidate.
    pub fn start(&self) -> f64 {
        self.start
    }

    /// Last candidate.
    pub fn end(&self) -> f64 {
        self.end
    }

    /// Distance between candidates.
    pub fn step(&self) -> f64 {
        self.step
    }

    /// Candidate skews in increasing order.
    pub fn points(&self) -> Vec<f64> {
        let steps = self.step_count() as usize;
        let scale = 10f64.powi(GRID_DECIMALS);
        (0..=steps)
            .map(|i| ((self.start + self.step * i as f64) * scale).round() / scale)
            .collect()
    }

    fn step_count(&self) -> f64 {
        ((self.end - self.start) / self.step + 1e-9).floor()
    }
}

/// Harmonic-number statistics for one candidate skew.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SkewEstimate {
    /// Candidate skew `a`.
    pub skew: f64,
    /// Mean of the per-rank harmonic estimates.
    pub mean: f64,
    /// Population standard deviation of the per-rank harmonic estimates.
    pub std_dev: f64,
}

/// Per-rank harmonic-number estimates `Ĥ_1(a) .. Ĥ_k(a)`.
///
/// # Example
///
/// ```
/// use sketchstat_skew::{harmonic_estimates, TopKSample};
///
/// let sample = TopKSample::new(vec![99, 0], 1000).unwrap();
/// let estimates = harmonic_estimates(&sample, 1.0);
/// assert_eq!(estimates[0], 10.0);
/// assert_eq!(estimates[1], 500.0);
/// ```
pub fn harmonic_estimates(sample: &TopKSample, skew: f64) -> Vec<f64> {
    let n = sample.total() as f64;
    sample
        .ranked()
        .map(|(rank, count)| n / ((count as f64 + 1.0) * (rank as f64).powf(skew)))
        .collect()
}

/// Mean and dispersion of the harmonic estimates for one candidate.
pub fn estimate_at(sample: &TopKSample, skew: f64) -> SkewEstimate {
    let moments: Moments = harmonic_estimates(sample, skew).into_iter().collect();
    SkewEstimate {
        skew,
        mean: moments.mean(),
        std_dev: moments.std_dev(),
    }
}

/// Evaluate every grid candidate, in grid order.
pub fn estimate_grid(sample: &TopKSample, grid: &SkewGrid) -> Vec<SkewEstimate> {
    let estimates: Vec<SkewEstimate> = grid
        .points()
        .into_iter()
        .map(|skew| estimate_at(sample, skew))
        .collect();
    debug!(
        k = sample.k(),
        total = sample.total(),
        candidates = estimates.len(),
        "evaluated skew grid"
    );
    estimates
}

/// Candidate with the smallest dispersion; the earliest wins ties.
///
/// Returns `None` for an empty slice.
pub fn best_candidate(estimates: &[SkewEstimate]) -> Option<SkewEstimate> {
    estimates.iter().copied().fold(None, |best, candidate| match best {
        Some(b) if candidate.std_dev.partial_cmp(&b.std_dev) != Some(Ordering::Less) => Some(b),
        _ => Some(candidate),
    })
}

/// Grid search for the skew: evaluate the grid and pick the least dispersed
/// candidate.
///
/// # Example
///
/// ```
/// use sketchstat_skew::{estimate_skew, zipf_expected_counts, SkewGrid, TopKSample};
///
/// let counts = zipf_expected_counts(10, 1 << 16, 1.1, 1_000_000_000);
/// let sample = TopKSample::new(counts, 1_000_000_000).unwrap();
/// let best = estimate_skew(&sample, &SkewGrid::default());
/// assert!((best.skew - 1.1).abs() < 1e-9);
/// ```
pub fn estimate_skew(sample: &TopKSample, grid: &SkewGrid) -> SkewEstimate {
    let estimates = estimate_grid(sample, grid);
    // A grid always has at least its start point.
    let best = best_candidate(&estimates).unwrap_or_else(|| estimate_at(sample, grid.start()));
    info!(skew = best.skew, std_dev = best.std_dev, "estimated skew");
    best
}

/// Median of the per-rank harmonic estimates at `skew` (the element at
/// index `k / 2` after ordering).
///
/// Less sensitive than the mean to a single badly-sampled rank; used as the
/// point estimate of `H(D, a)` once the skew is known.
pub fn median_harmonic_estimate(sample: &TopKSample, skew: f64) -> f64 {
    let mut estimates = harmonic_estimates(sample, skew);
    let middle = estimates.len() / 2;
    let (_, median, _) =
        estimates.select_nth_unstable_by(middle, |a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    *median
}

/// Mean squared difference between observed frequencies and the Zipf
/// frequencies implied by `skew` and a known harmonic number.
pub fn frequency_fit_cost(sample: &TopKSample, skew: f64, harmonic: f64) -> f64 {
    let inv_harmonic = 1.0 / harmonic;
    let n = sample.total() as f64;
    let sum: f64 = sample
        .ranked()
        .map(|(rank, count)| {
            let expected = inv_harmonic / (rank as f64).powf(skew);
            let actual = count as f64 / n;
            (expected - actual).powi(2)
        })
        .sum();
    sum / sample.k() as f64
}

/// Skew on a harmonic table's grid with the lowest [`frequency_fit_cost`].
///
/// Unlike the dispersion estimators this one needs the domain size, which
/// the table carries. Returns `(skew, cost)`, or `None` for an empty table.
pub fn best_frequency_fit(sample: &TopKSample, table: &HarmonicTable) -> Option<(f64, f64)> {
    table
        .entries()
        .iter()
        .map(|&(skew, harmonic)| (skew, frequency_fit_cost(sample, skew, harmonic)))
        .fold(None, |best, (skew, cost)| match best {
            Some((_, best_cost)) if cost >= best_cost => best,
            _ => Some((skew, cost)),
        })
}

/// Settings for [`bisect_skew`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BisectConfig {
    /// Lower end of the search interval (default: 0.5).
    pub lower: f64,
    /// Upper end of the search interval (default: 1.5).
    pub upper: f64,
    /// Number of halvings (default: 10).
    pub iterations: usize,
    /// Offset used to read the slope of the dispersion (default: 1e-4).
    pub gradient_delta: f64,
}

impl Default for BisectConfig {
    fn default() -> Self {
        Self {
            lower: 0.5,
            upper: 1.5,
            iterations: 10,
            gradient_delta: 1e-4,
        }
    }
}

/// Bisection on the slope of the dispersion.
///
/// Each round compares the dispersion at the midpoint with the dispersion a
/// `gradient_delta` to the right and keeps the half that slopes down. The
/// result is within `(upper - lower) / 2^iterations` of the dispersion
/// minimum, provided the minimum lies inside the interval.
///
/// # Errors
///
/// [`StatError::InvalidConfig`] when `lower >= upper` or the delta is not
/// positive.
pub fn bisect_skew(sample: &TopKSample, config: &BisectConfig) -> Result<f64> {
    if !(config.lower < config.upper) {
        return Err(StatError::InvalidConfig(format!(
            "bisection interval [{}, {}] is empty",
            config.lower, config.upper
        )));
    }
    if !(config.gradient_delta > 0.0) {
        return Err(StatError::InvalidConfig(
            "bisection gradient delta must be positive".to_string(),
        ));
    }

    let dispersion = |skew: f64| estimate_at(sample, skew).std_dev;
    let mut lower = config.lower;
    let mut upper = config.upper;

    for _ in 0..config.iterations {
        let middle = (lower + upper) * 0.5;
        let here = dispersion(middle);
        let right = dispersion(middle + config.gradient_delta);

        match here.partial_cmp(&right) {
            Some(Ordering::Less) => upper = middle,
            Some(Ordering::Greater) => lower = middle,
            _ => return Ok(middle),
        }
    }

    Ok((lower + upper) * 0.5)
}

/// Write per-candidate estimates as a `skew,mean,std` table.
pub fn write_estimates(path: impl AsRef<Path>, estimates: &[SkewEstimate]) -> Result<()> {
    let rows = estimates.iter().map(|e| {
        [
            format_number(e.skew),
            format_number(e.mean),
            format_number(e.std_dev),
        ]
    });
    write_rows(path, &["skew", "mean", "std"], rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::harmonic::zipf_expected_counts;

    const TOTAL: u64 = 1_000_000_000;

    fn noiseless(skew: f64) -> TopKSample {
        TopKSample::new(zipf_expected_counts(10, 1 << 18, skew, TOTAL), TOTAL).unwrap()
    }

    #[test]
    fn test_grid_validation() {
        assert!(SkewGrid::new(0.3, 1.4, 0.0).is_err());
        assert!(SkewGrid::new(1.4, 0.3, 0.05).is_err());
        assert!(SkewGrid::new(f64::NAN, 1.0, 0.1).is_err());
        assert_eq!(SkewGrid::new(0.8, 0.8, 0.1).unwrap().points(), [0.8]);
    }

    #[test]
    fn test_grid_size_is_capped() {
        let err = SkewGrid::new(0.0, 1e6, 1e-12).unwrap_err();
        assert!(matches!(err, StatError::InvalidConfig(ref msg) if msg.contains("candidates")));
        assert!(SkewGrid::new(0.0, 1.0, 1e-300).is_err());

        let widest = SkewGrid::new(0.0, (MAX_GRID_POINTS - 1) as f64, 1.0).unwrap();
        assert_eq!(widest.points().len(), MAX_GRID_POINTS);
        assert!(SkewGrid::new(0.0, MAX_GRID_POINTS as f64, 1.0).is_err());
    }

    #[test]
    fn test_grid_points_are_clean() {
        let points = SkewGrid::default().points();
        assert!(points.contains(&0.8));
        assert!(points.contains(&1.1));
    }

    #[test]
    fn test_recovers_noiseless_skew() {
        let sample = noiseless(0.8);
        let best = estimate_skew(&sample, &SkewGrid::default());
        assert!((best.skew - 0.8).abs() < 1e-9, "got {}", best.skew);
    }

    #[test]
    fn test_dispersion_grows_away_from_true_skew() {
        let sample = noiseless(0.8);
        let at = |a| estimate_at(&sample, a).std_dev;
        assert!(at(0.8) < at(0.75));
        assert!(at(0.75) < at(0.6));
        assert!(at(0.8) < at(0.85));
        assert!(at(0.85) < at(1.0));
    }

    #[test]
    fn test_mean_approximates_harmonic_number() {
        let sample = noiseless(0.8);
        let expected = crate::harmonic::harmonic_number(1 << 18, 0.8);
        let estimate = estimate_at(&sample, 0.8);
        assert!((estimate.mean - expected).abs() / expected < 1e-4);
        let median = median_harmonic_estimate(&sample, 0.8);
        assert!((median - expected).abs() / expected < 1e-4);
    }

    #[test]
    fn test_zero_count_stays_finite() {
        let sample = TopKSample::new(vec![100, 10, 0], 1000).unwrap();
        let estimates = harmonic_estimates(&sample, 1.0);
        assert!(estimates.iter().all(|e| e.is_finite()));
        assert!(estimate_at(&sample, 1.0).std_dev.is_finite());
    }

    #[test]
    fn test_best_candidate_prefers_earliest_tie() {
        let estimates = [
            SkewEstimate { skew: 0.5, mean: 1.0, std_dev: 2.0 },
            SkewEstimate { skew: 0.6, mean: 1.0, std_dev: 1.0 },
            SkewEstimate { skew: 0.7, mean: 1.0, std_dev: 1.0 },
        ];
        assert_eq!(best_candidate(&estimates).unwrap().skew, 0.6);
        assert!(best_candidate(&[]).is_none());
    }

    #[test]
    fn test_bisection_converges() {
        let sample = noiseless(0.8);
        let skew = bisect_skew(&sample, &BisectConfig::default()).unwrap();
        assert!((skew - 0.8).abs() < 0.01, "got {}", skew);
    }

    #[test]
    fn test_bisection_rejects_empty_interval() {
        let config = BisectConfig {
            lower: 1.0,
            upper: 1.0,
            ..Default::default()
        };
        assert!(bisect_skew(&noiseless(0.8), &config).is_err());
    }

    #[test]
    fn test_frequency_fit_prefers_true_skew() {
        let sample = TopKSample::new(zipf_expected_counts(10, 1 << 12, 1.0, TOTAL), TOTAL).unwrap();
        let grid = SkewGrid::new(0.6, 1.3, 0.1).unwrap();
        let table = HarmonicTable::build(1 << 12, &grid);
        let (skew, cost) = best_frequency_fit(&sample, &table).unwrap();
        assert!((skew - 1.0).abs() < 1e-9);
        assert!(cost < 1e-12);
    }

    #[test]
    fn test_write_estimates() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("skew_estimates.csv");
        let estimates = [
            SkewEstimate { skew: 0.5, mean: 40.0, std_dev: 2.5 },
            SkewEstimate { skew: 0.55, mean: 42.0, std_dev: 1.25 },
        ];
        write_estimates(&path, &estimates).unwrap();
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "skew,mean,std\n0.5,40,2.5\n0.55,42,1.25\n"
        );
    }
}
