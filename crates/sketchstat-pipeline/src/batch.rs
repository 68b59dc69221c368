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

//! Batch execution of independent stage jobs.
//!
//! A sweep produces many trial groups, many metrics and many envelopes, and
//! each of those is an independent job that reads its own inputs and writes
//! its own output. This module maps such jobs across a Rayon thread pool.
//!
//! # Features
//!
//! - **Parallel Processing**: Rayon work stealing above a size threshold, serial below it
//! - **Error Resilience**: every job runs; failures are collected per job
//! - **Output Safety**: a batch in which two jobs share an output path is refused up front
//! - **Progress Logging**: `tracing` events per job and a summary per batch
//!
//! # Examples
//!
//! ```rust,no_run
//! use sketchstat_pipeline::batch::{AverageJob, BatchConfig, BatchProcessor};
//! use sketchstat_pipeline::TrialGroup;
//!
//! # fn main() -> sketchstat_core::Result<()> {
//! let columns = vec!["normalized error".to_string()];
//! let jobs: Vec<AverageJob> = ["skew-0.9.csv", "skew-1.1.csv"]
//!     .iter()
//!     .map(|name| AverageJob::new(
//!         TrialGroup::new(*name, [format!("raw/1/{}", name), format!("raw/2/{}", name)]),
//!         "averaged",
//!         columns.clone(),
//!     ))
//!     .collect();
//!
//! let results = BatchProcessor::new(BatchConfig::default()).process(&jobs)?;
//! println!("{} of {} groups averaged", results.success_count(), results.total_jobs());
//! # Ok(())
//! # }
//! ```

use crate::average::{average_group, TrialGroup};
use crate::best::{select_best, BestChoice};
use crate::envelope::{compute_envelope, Envelope};
use rayon::prelude::*;
use sketchstat_core::{Result, StatError};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Configuration for batch execution.
///
/// # Examples
///
/// ```rust
/// use sketchstat_pipeline::batch::BatchConfig;
///
/// let config = BatchConfig {
///     parallel_threshold: 2,
///     max_threads: Some(4),
/// };
/// assert_eq!(BatchConfig::default().parallel_threshold, 4);
/// # let _ = config;
/// ```
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Minimum number of jobs to run in parallel.
    ///
    /// Smaller batches run serially on the calling thread.
    /// Default: 4
    pub parallel_threshold: usize,

    /// Maximum number of worker threads.
    ///
    /// None means Rayon's default (typically the number of CPU cores).
    /// Default: None
    pub max_threads: Option<usize>,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            parallel_threshold: 4,
            max_threads: None,
        }
    }
}

/// One independent unit of stage work.
///
/// Jobs must be `Send + Sync`: they are shared across worker threads and
/// may not touch each other's outputs.
pub trait StageJob: Send + Sync {
    /// Value produced on success.
    type Output: Send;

    /// Run the job to completion.
    fn run(&self) -> Result<Self::Output>;

    /// File or directory this job writes.
    fn output_path(&self) -> &Path;

    /// Short name used in log events.
    fn name(&self) -> &str;
}

/// Outcome of one job.
#[derive(Debug)]
pub struct JobResult<T> {
    /// Output path of the job.
    pub output: PathBuf,
    /// What the job produced.
    pub result: Result<T>,
}

impl<T> JobResult<T> {
    /// Check if the job succeeded.
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }

    /// Check if the job failed.
    pub fn is_failure(&self) -> bool {
        self.result.is_err()
    }
}

/// Outcomes of a batch, in job order.
#[derive(Debug)]
pub struct BatchResults<T> {
    /// Individual job results.
    pub results: Vec<JobResult<T>>,
    /// Wall-clock time for the batch in milliseconds.
    pub elapsed_ms: u128,
}

impl<T> BatchResults<T> {
    /// Total number of jobs.
    pub fn total_jobs(&self) -> usize {
        self.results.len()
    }

    /// Number of jobs that succeeded.
    pub fn success_count(&self) -> usize {
        self.results.iter().filter(|r| r.is_success()).count()
    }

    /// Number of jobs that failed.
    pub fn failure_count(&self) -> usize {
        self.results.iter().filter(|r| r.is_failure()).count()
    }

    /// Check if every job succeeded.
    pub fn all_succeeded(&self) -> bool {
        self.results.iter().all(|r| r.is_success())
    }

    /// Iterator over failed jobs.
    pub fn failures(&self) -> impl Iterator<Item = &JobResult<T>> {
        self.results.iter().filter(|r| r.is_failure())
    }

    /// All outputs in job order, or the first failure in job order.
    pub fn into_outputs(self) -> Result<Vec<T>> {
        self.results.into_iter().map(|r| r.result).collect()
    }
}

/// Lock-free job counters, logged through `tracing`.
#[derive(Debug)]
struct ProgressTracker {
    total: usize,
    succeeded: AtomicUsize,
    failed: AtomicUsize,
    start_time: Instant,
}

impl ProgressTracker {
    fn new(total: usize) -> Self {
        Self {
            total,
            succeeded: AtomicUsize::new(0),
            failed: AtomicUsize::new(0),
            start_time: Instant::now(),
        }
    }

    fn record<T>(&self, job: &str, output: &Path, result: &Result<T>) {
        match result {
            Ok(_) => {
                let done = self.succeeded.fetch_add(1, Ordering::Relaxed) + 1;
                debug!(job, output = %output.display(), done, total = self.total, "job finished");
            }
            Err(error) => {
                self.failed.fetch_add(1, Ordering::Relaxed);
                warn!(job, output = %output.display(), %error, "job failed");
            }
        }
    }

    fn summary(&self) {
        info!(
            total = self.total,
            succeeded = self.succeeded.load(Ordering::Relaxed),
            failed = self.failed.load(Ordering::Relaxed),
            elapsed_ms = self.start_time.elapsed().as_millis() as u64,
            "batch finished"
        );
    }
}

/// Runs batches of [`StageJob`]s serially or on a Rayon pool.
#[derive(Debug, Clone, Default)]
pub struct BatchProcessor {
    config: BatchConfig,
}

impl BatchProcessor {
    /// Create a processor with the given configuration.
    pub fn new(config: BatchConfig) -> Self {
        Self { config }
    }

    /// The processor's configuration.
    pub fn config(&self) -> &BatchConfig {
        &self.config
    }

    /// Run every job and collect the outcomes in job order.
    ///
    /// Failing jobs do not stop the others.
    ///
    /// # Errors
    ///
    /// - [`StatError::DuplicateOutput`] if two jobs share an output path (nothing runs)
    /// - [`StatError::InvalidConfig`] if the worker pool cannot be built
    pub fn process<J: StageJob>(&self, jobs: &[J]) -> Result<BatchResults<J::Output>> {
        check_distinct_outputs(jobs)?;

        let start_time = Instant::now();
        let tracker = ProgressTracker::new(jobs.len());

        let run = |job: &J| {
            let result = job.run();
            tracker.record(job.name(), job.output_path(), &result);
            JobResult {
                output: job.output_path().to_path_buf(),
                result,
            }
        };

        let results: Vec<JobResult<J::Output>> = if jobs.len() < self.config.parallel_threshold {
            jobs.iter().map(run).collect()
        } else {
            let mut builder = rayon::ThreadPoolBuilder::new();
            if let Some(threads) = self.config.max_threads {
                builder = builder.num_threads(threads);
            }
            let pool = builder
                .build()
                .map_err(|e| StatError::InvalidConfig(format!("worker pool: {}", e)))?;
            pool.install(|| jobs.par_iter().map(run).collect())
        };

        tracker.summary();
        Ok(BatchResults {
            results,
            elapsed_ms: start_time.elapsed().as_millis(),
        })
    }
}

fn check_distinct_outputs<J: StageJob>(jobs: &[J]) -> Result<()> {
    let mut seen = HashSet::with_capacity(jobs.len());
    for job in jobs {
        if !seen.insert(job.output_path()) {
            return Err(StatError::DuplicateOutput {
                path: job.output_path().to_path_buf(),
            });
        }
    }
    Ok(())
}

// ============================================================================
// Stage Jobs
// ============================================================================

/// Average one trial group.
#[derive(Debug, Clone)]
pub struct AverageJob {
    group: TrialGroup,
    columns: Vec<String>,
    output_dir: PathBuf,
    output: PathBuf,
}

impl AverageJob {
    /// Job writing `<output_dir>/<group name>`.
    pub fn new(group: TrialGroup, output_dir: impl Into<PathBuf>, columns: Vec<String>) -> Self {
        let output_dir = output_dir.into();
        let output = group.output_path(&output_dir);
        Self {
            group,
            columns,
            output_dir,
            output,
        }
    }
}

impl StageJob for AverageJob {
    type Output = PathBuf;

    fn run(&self) -> Result<PathBuf> {
        average_group(&self.group, &self.output_dir, &self.columns)
    }

    fn output_path(&self) -> &Path {
        &self.output
    }

    fn name(&self) -> &str {
        "average"
    }
}

/// Select the best variant of one metric.
#[derive(Debug, Clone)]
pub struct BestJob {
    /// `(label, path)` files to compare.
    pub files: Vec<(String, PathBuf)>,
    /// Axis column of every file.
    pub axis_column: String,
    /// Output column name for the winning label.
    pub discriminant: String,
    /// Metric to minimize.
    pub metric: String,
    /// Output file.
    pub output: PathBuf,
}

impl StageJob for BestJob {
    type Output = Vec<BestChoice>;

    fn run(&self) -> Result<Vec<BestChoice>> {
        select_best(
            &self.files,
            &self.axis_column,
            &self.discriminant,
            &self.metric,
            &self.output,
        )
    }

    fn output_path(&self) -> &Path {
        &self.output
    }

    fn name(&self) -> &str {
        "best"
    }
}

/// Compute one envelope file.
#[derive(Debug, Clone)]
pub struct EnvelopeJob {
    /// `(axis key, trial paths)` entries.
    pub entries: Vec<(String, Vec<PathBuf>)>,
    /// Local x column of the trial files.
    pub x_column: String,
    /// Metric to minimize per trial.
    pub metric: String,
    /// Axis label of the output header.
    pub axis_label: String,
    /// Output file.
    pub output: PathBuf,
}

impl StageJob for EnvelopeJob {
    type Output = Vec<Envelope>;

    fn run(&self) -> Result<Vec<Envelope>> {
        compute_envelope(
            &self.entries,
            &self.x_column,
            &self.metric,
            &self.axis_label,
            &self.output,
        )
    }

    fn output_path(&self) -> &Path {
        &self.output
    }

    fn name(&self) -> &str {
        "envelope"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicBool;

    struct FixedJob {
        output: PathBuf,
        fail: bool,
        ran: AtomicBool,
    }

    impl FixedJob {
        fn new(output: &str, fail: bool) -> Self {
            Self {
                output: PathBuf::from(output),
                fail,
                ran: AtomicBool::new(false),
            }
        }
    }

    impl StageJob for FixedJob {
        type Output = usize;

        fn run(&self) -> Result<usize> {
            self.ran.store(true, Ordering::SeqCst);
            if self.fail {
                Err(StatError::Other(format!("{} failed", self.output.display())))
            } else {
                Ok(self.output.as_os_str().len())
            }
        }

        fn output_path(&self) -> &Path {
            &self.output
        }

        fn name(&self) -> &str {
            "fixed"
        }
    }

    #[test]
    fn test_batch_config_default() {
        let config = BatchConfig::default();
        assert_eq!(config.parallel_threshold, 4);
        assert_eq!(config.max_threads, None);
    }

    #[test]
    fn test_empty_batch() {
        let results = BatchProcessor::default()
            .process::<FixedJob>(&[])
            .unwrap();
        assert_eq!(results.total_jobs(), 0);
        assert!(results.all_succeeded());
    }

    #[test]
    fn test_serial_keeps_order_and_collects_failures() {
        let jobs = vec![
            FixedJob::new("a", false),
            FixedJob::new("bb", true),
            FixedJob::new("ccc", false),
        ];
        let results = BatchProcessor::default().process(&jobs).unwrap();
        assert_eq!(results.success_count(), 2);
        assert_eq!(results.failure_count(), 1);
        assert!(jobs.iter().all(|j| j.ran.load(Ordering::SeqCst)));
        assert_eq!(results.failures().next().unwrap().output, Path::new("bb"));
        assert!(results.into_outputs().is_err());
    }

    #[test]
    fn test_parallel_keeps_job_order() {
        let names: Vec<String> = (0..32).map(|i| "x".repeat(i + 1)).collect();
        let jobs: Vec<FixedJob> = names.iter().map(|n| FixedJob::new(n, false)).collect();
        let processor = BatchProcessor::new(BatchConfig {
            parallel_threshold: 2,
            max_threads: Some(3),
        });
        let outputs = processor.process(&jobs).unwrap().into_outputs().unwrap();
        assert_eq!(outputs, (1..=32).collect::<Vec<_>>());
    }

    #[test]
    fn test_duplicate_outputs_refused_before_running() {
        let jobs = vec![FixedJob::new("same", false), FixedJob::new("same", false)];
        let err = BatchProcessor::default().process(&jobs).unwrap_err();
        assert!(matches!(err, StatError::DuplicateOutput { .. }));
        assert!(jobs.iter().all(|j| !j.ran.load(Ordering::SeqCst)));
    }
}
