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

//! Whole-run configuration.
//!
//! A [`PipelineConfig`] describes one post-processing run as data: which
//! trial groups to average, which keyed tables to pivot, how to name the
//! best-variant files and which envelopes to compute. Every path is explicit;
//! nothing depends on the process working directory beyond relative paths
//! resolving against it.
//!
//! ```json
//! {
//!   "average": {
//!     "groups": [{ "name": "skew-0.9.csv", "paths": ["raw/1/skew-0.9.csv", "raw/2/skew-0.9.csv"] }],
//!     "columns": ["normalized error"],
//!     "output_dir": "averaged"
//!   },
//!   "pivot": {
//!     "entries": [{ "key": "0.9", "path": "averaged/skew-0.9.csv" }],
//!     "axis_label": "skew",
//!     "output_dir": "pivoted"
//!   },
//!   "best": { "discriminant": "hash functions", "output_dir": "best" }
//! }
//! ```

use crate::average::TrialGroup;
use crate::batch::{AverageJob, BatchConfig, BatchProcessor, BestJob, EnvelopeJob};
use crate::best::BestChoice;
use crate::envelope::Envelope;
use crate::pivot::{pivot_results, write_manifest, PivotedColumn};
use serde::{Deserialize, Serialize};
use sketchstat_core::{order_numerically, Result, StatError};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// A labelled file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyedPath {
    /// Sweep key or label.
    pub key: String,
    /// File path.
    pub path: PathBuf,
}

/// Averaging stage request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AverageStage {
    /// Groups of repeated trials.
    pub groups: Vec<TrialGroup>,
    /// Columns to average; every other column passes through.
    pub columns: Vec<String>,
    /// Directory receiving one file per group.
    pub output_dir: PathBuf,
}

impl AverageStage {
    fn jobs(&self) -> Vec<AverageJob> {
        self.groups
            .iter()
            .map(|group| AverageJob::new(group.clone(), &self.output_dir, self.columns.clone()))
            .collect()
    }
}

/// Pivot stage request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PivotStage {
    /// Keyed result tables.
    pub entries: Vec<KeyedPath>,
    /// Header of the key column in every output file.
    pub axis_label: String,
    /// Directory receiving one subdirectory per metric.
    pub output_dir: PathBuf,
    /// Sort entries by numeric key before pivoting.
    #[serde(default)]
    pub order_numerically: bool,
    /// Where to write the JSON manifest, if anywhere.
    #[serde(default)]
    pub manifest: Option<PathBuf>,
}

impl PivotStage {
    /// Run the pivot.
    pub fn run(&self) -> Result<Vec<PivotedColumn>> {
        let mut entries: Vec<(String, PathBuf)> = self
            .entries
            .iter()
            .map(|e| (e.key.clone(), e.path.clone()))
            .collect();
        if self.order_numerically {
            order_numerically(&mut entries);
        }

        let columns = pivot_results(&entries, &self.axis_label, &self.output_dir)?;
        if let Some(manifest) = &self.manifest {
            write_manifest(manifest, &columns)?;
        }
        Ok(columns)
    }
}

/// Best-variant stage request, run over every pivoted metric.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BestStage {
    /// Output column name for the winning label.
    pub discriminant: String,
    /// Directory receiving `best-<metric-slug>.csv` per metric.
    pub output_dir: PathBuf,
}

impl BestStage {
    /// Output file for one metric.
    pub fn output_path(&self, column: &PivotedColumn) -> PathBuf {
        self.output_dir.join(format!("best-{}.csv", column.slug))
    }

    fn jobs(&self, axis_label: &str, columns: &[PivotedColumn]) -> Vec<BestJob> {
        columns
            .iter()
            .map(|column| BestJob {
                files: column.files.clone(),
                axis_column: axis_label.to_string(),
                discriminant: self.discriminant.clone(),
                metric: column.name.clone(),
                output: self.output_path(column),
            })
            .collect()
    }
}

/// Envelope stage request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvelopeStage {
    /// Trial files per axis key, in output order.
    pub entries: Vec<EnvelopeEntry>,
    /// Local x column of the trial files.
    pub x_column: String,
    /// Metric minimized per trial.
    pub metric: String,
    /// Header of the key column.
    pub axis_label: String,
    /// Output file.
    pub output: PathBuf,
}

/// Trials of one axis key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvelopeEntry {
    /// Axis key.
    pub key: String,
    /// Trial files.
    pub paths: Vec<PathBuf>,
}

impl EnvelopeStage {
    fn job(&self) -> EnvelopeJob {
        EnvelopeJob {
            entries: self
                .entries
                .iter()
                .map(|e| (e.key.clone(), e.paths.clone()))
                .collect(),
            x_column: self.x_column.clone(),
            metric: self.metric.clone(),
            axis_label: self.axis_label.clone(),
            output: self.output.clone(),
        }
    }
}

/// A whole post-processing run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Worker settings for stages with many independent jobs.
    #[serde(default)]
    pub batch: BatchConfig,
    /// Averaging stage.
    #[serde(default)]
    pub average: Option<AverageStage>,
    /// Pivot stage.
    #[serde(default)]
    pub pivot: Option<PivotStage>,
    /// Best-variant stage; requires `pivot`.
    #[serde(default)]
    pub best: Option<BestStage>,
    /// Envelope stages.
    #[serde(default)]
    pub envelope: Vec<EnvelopeStage>,
}

/// What a run produced.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PipelineReport {
    /// Averaged files, in group order.
    pub averaged: Vec<PathBuf>,
    /// Pivot result.
    pub pivoted: Vec<PivotedColumn>,
    /// Best choices per metric, in pivot order.
    pub best: Vec<(String, Vec<BestChoice>)>,
    /// Envelopes per envelope stage.
    pub envelopes: Vec<Vec<Envelope>>,
}

impl PipelineConfig {
    /// Parse a configuration from JSON text.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|e| StatError::io(path, e))?;
        Self::from_json_str(&json).map_err(|e| e.with_context(path.display()))
    }

    /// Check cross-stage requirements.
    pub fn validate(&self) -> Result<()> {
        if self.best.is_some() && self.pivot.is_none() {
            return Err(StatError::InvalidConfig(
                "the best stage needs a pivot stage".to_string(),
            ));
        }
        if let Some(average) = &self.average {
            if average.columns.is_empty() {
                return Err(StatError::InvalidConfig(
                    "the average stage needs at least one column".to_string(),
                ));
            }
        }
        Ok(())
    }

    /// Run average, pivot, best and envelope stages in that order.
    ///
    /// The first failing stage (or the first failing job of a batched stage)
    /// stops the run.
    pub fn run(&self) -> Result<PipelineReport> {
        self.validate()?;
        let processor = BatchProcessor::new(self.batch.clone());
        let mut report = PipelineReport::default();

        if let Some(average) = &self.average {
            report.averaged = processor.process(&average.jobs())?.into_outputs()?;
        }

        if let Some(pivot) = &self.pivot {
            report.pivoted = pivot.run()?;

            if let Some(best) = &self.best {
                fs::create_dir_all(&best.output_dir)
                    .map_err(|e| StatError::io(&best.output_dir, e))?;
                let choices = processor
                    .process(&best.jobs(&pivot.axis_label, &report.pivoted))?
                    .into_outputs()?;
                report.best = report
                    .pivoted
                    .iter()
                    .map(|column| column.name.clone())
                    .zip(choices)
                    .collect();
            }
        }

        if !self.envelope.is_empty() {
            let jobs: Vec<EnvelopeJob> = self.envelope.iter().map(EnvelopeStage::job).collect();
            report.envelopes = processor.process(&jobs)?.into_outputs()?;
        }

        info!(
            averaged = report.averaged.len(),
            metrics = report.pivoted.len(),
            envelopes = report.envelopes.len(),
            "pipeline finished"
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_config() {
        let config = PipelineConfig::from_json_str("{}").unwrap();
        assert_eq!(config, PipelineConfig::default());
    }

    #[test]
    fn test_best_without_pivot_rejected() {
        let json = r#"{ "best": { "discriminant": "hash functions", "output_dir": "best" } }"#;
        assert!(matches!(
            PipelineConfig::from_json_str(json).unwrap_err(),
            StatError::InvalidConfig(_)
        ));
    }

    #[test]
    fn test_average_needs_columns() {
        let json = r#"{ "average": { "groups": [], "columns": [], "output_dir": "avg" } }"#;
        assert!(PipelineConfig::from_json_str(json).is_err());
    }

    #[test]
    fn test_pivot_defaults() {
        let json = r#"{
            "pivot": {
                "entries": [{ "key": "1.1", "path": "b.csv" }, { "key": "0.9", "path": "a.csv" }],
                "axis_label": "skew",
                "output_dir": "out"
            },
            "batch": { "max_threads": 2 }
        }"#;
        let config = PipelineConfig::from_json_str(json).unwrap();
        let pivot = config.pivot.unwrap();
        assert!(!pivot.order_numerically);
        assert_eq!(pivot.manifest, None);
        assert_eq!(config.batch.max_threads, Some(2));
        assert_eq!(config.batch.parallel_threshold, 4);
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            PipelineConfig::from_json_str("{ \"average\": 3 }").unwrap_err(),
            StatError::Json(_)
        ));
    }

    #[test]
    fn test_best_output_path() {
        let best = BestStage {
            discriminant: "hash functions".into(),
            output_dir: PathBuf::from("best"),
        };
        let column = PivotedColumn {
            name: "normalized error".into(),
            slug: "normalized-error".into(),
            directory: PathBuf::from("pivoted/normalized-error"),
            files: vec![],
        };
        assert_eq!(
            best.output_path(&column),
            Path::new("best/best-normalized-error.csv")
        );
    }
}
