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

//! # sketchstat
//!
//! Statistical post-processing for sketch-based frequency estimation
//! experiments. An external measurement process writes one CSV per run; this
//! crate turns those files into decision-ready summaries.
//!
//! ## Quick Start
//!
//! ```rust
//! use sketchstat::estimate_skew_from_counts;
//!
//! // Top-10 counts out of 10^9 observations.
//! let counts = vec![
//!     17_549_828, 10_068_646, 7_292_554, 5_785_812, 4_835_542,
//!     4_186_799, 3_699_199, 3_322_079, 3_027_581, 2_777_846,
//! ];
//! let best = estimate_skew_from_counts(counts, 1_000_000_000).unwrap();
//! assert!((best.skew - 0.8).abs() < 1e-9);
//! ```
//!
//! ## Features
//!
//! - **Skew estimation**: recover a Zipf skew from sampled top-k counts
//! - **Averaging**: collapse repeated trials with strict schema checks
//! - **Pivoting**: reshape keyed result tables into per-metric series
//! - **Best selection**: lowest-error variant per sweep value
//! - **Envelopes**: spread of the per-trial best across trials
//!
//! ## Modules
//!
//! - [`skew`]: skew estimators (feature = "skew")
//! - [`pipeline`]: reshaping stages and run configuration (feature = "pipeline")
//! - [`prelude`]: the names most programs need
//!
//! The library emits `tracing` events but never installs a subscriber.

// Re-export core types
pub use sketchstat_core::{
    // Ordering
    compare_labels,
    // Formatting
    format_number,
    order_numerically,
    // Reading
    read_table,
    read_table_from_reader,
    read_table_with_config,
    rows_to_string,
    slug,
    // Writing
    write_rows,
    write_table,
    // Model
    MeasurementTable,
    ReadConfig,
    // Errors
    Result,
    StatError,
    DEFAULT_MAX_COLUMNS,
    DEFAULT_MAX_ROWS,
};

// Error handling extensions
mod error_ext;
pub use error_ext::StatResultExt;

#[cfg(feature = "skew")]
pub mod skew {
    //! Zipf skew estimation
    pub use sketchstat_skew::{
        best_candidate, best_frequency_fit, bisect_skew, estimate_at, estimate_grid,
        estimate_skew, frequency_fit_cost, harmonic_estimates, harmonic_number,
        median_harmonic_estimate, write_estimates, zipf_expected_counts, zipf_frequencies,
        BisectConfig, HarmonicTable, Moments, SkewEstimate, SkewGrid, TopKSample,
        MAX_GRID_POINTS,
    };
}

#[cfg(feature = "pipeline")]
pub mod pipeline {
    //! Averaging, pivoting, best selection and envelopes
    pub use sketchstat_pipeline::batch;
    pub use sketchstat_pipeline::{
        average_group, average_groups, average_tables, best_choices, compute_envelope,
        label_bounds, pivot_results, read_manifest, select_best, series_file_name,
        trial_best_label, write_manifest, AverageStage, BestChoice, BestStage, Envelope,
        EnvelopeEntry, EnvelopeStage, KeyedPath, PipelineConfig, PipelineReport, PivotStage,
        PivotedColumn, TrialGroup,
    };
}

pub mod prelude {
    //! Common imports
    pub use crate::{MeasurementTable, Result, StatError, StatResultExt};

    #[cfg(feature = "skew")]
    pub use crate::skew::{SkewEstimate, SkewGrid, TopKSample};

    #[cfg(feature = "pipeline")]
    pub use crate::pipeline::{PipelineConfig, PivotedColumn, TrialGroup};
}

/// Estimate the skew of a Zipf law from top-k counts in any order, using the
/// default candidate grid.
///
/// # Errors
///
/// [`StatError::EmptyInput`] for no counts and [`StatError::InvalidConfig`]
/// for a zero total.
#[cfg(feature = "skew")]
pub fn estimate_skew_from_counts(counts: Vec<u64>, total: u64) -> Result<skew::SkewEstimate> {
    let sample = skew::TopKSample::from_unordered(counts, total)?;
    Ok(skew::estimate_skew(&sample, &skew::SkewGrid::default()))
}

/// Load a JSON [`pipeline::PipelineConfig`] and run it.
#[cfg(feature = "pipeline")]
pub fn run_pipeline(config: impl AsRef<std::path::Path>) -> Result<pipeline::PipelineReport> {
    let path = config.as_ref();
    tracing::info!(config = %path.display(), "running pipeline");
    pipeline::PipelineConfig::from_json_file(path)?
        .run()
        .with_path(path)
}

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
