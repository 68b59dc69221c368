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

//! Reshaping and aggregation stages over sketch evaluation results.
//!
//! Raw per-trial CSVs flow through these stages:
//!
//! ```text
//! trials ──▶ average ──▶ pivot ──▶ best
//! trials ──▶ envelope
//! ```
//!
//! - [`average_group`]: collapse repeated trials into one file per group
//! - [`pivot_results`]: turn keyed tables into per-metric, per-x series
//! - [`select_best`]: lowest-valued variant per axis key
//! - [`compute_envelope`]: lowest and highest per-trial best per axis key
//!
//! Each stage reads and validates all of its inputs before writing, so a
//! failing stage leaves no partial output. [`batch`] runs many independent
//! stage jobs on a Rayon pool and [`PipelineConfig`] describes a whole run.
//!
//! # Example
//!
//! ```no_run
//! use sketchstat_pipeline::{average_group, TrialGroup};
//! use std::path::Path;
//!
//! let group = TrialGroup::new("skew-0.9.csv", ["raw/1/skew-0.9.csv", "raw/2/skew-0.9.csv"]);
//! let columns = vec!["normalized error".to_string()];
//! let written = average_group(&group, Path::new("averaged"), &columns).unwrap();
//! assert_eq!(written, Path::new("averaged/skew-0.9.csv"));
//! ```

mod average;
pub mod batch;
mod best;
mod config;
mod envelope;
mod pivot;

pub use average::{average_group, average_groups, average_tables, TrialGroup};
pub use batch::{BatchConfig, BatchProcessor, BatchResults, JobResult, StageJob};
pub use best::{best_choices, select_best, BestChoice};
pub use config::{
    AverageStage, BestStage, EnvelopeEntry, EnvelopeStage, KeyedPath, PipelineConfig,
    PipelineReport, PivotStage,
};
pub use envelope::{compute_envelope, label_bounds, trial_best_label, Envelope};
pub use pivot::{
    pivot_results, read_manifest, series_file_name, write_manifest, PivotedColumn,
};
