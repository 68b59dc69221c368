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

//! Envelope of per-trial best choices.
//!
//! Each trial of a configuration has its own best local x (the row with the
//! lowest metric). Across trials those bests spread out; the envelope is the
//! lowest and highest of them, which bounds how sensitive the choice is to
//! the trial's randomness.

use serde::Serialize;
use sketchstat_core::{compare_labels, read_table, write_rows, MeasurementTable, Result, StatError};
use std::cmp::Ordering;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Lowest and highest best label for one axis key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Envelope {
    /// Axis key.
    pub key: String,
    /// Lowest best label.
    pub lower: String,
    /// Highest best label.
    pub upper: String,
}

/// Local x value of the row with the lowest metric; the first row wins ties.
///
/// # Errors
///
/// [`StatError::EmptyTable`] when the table has no rows, and
/// [`StatError::InvalidNumber`] when a metric cell is not a number.
pub fn trial_best_label(table: &MeasurementTable, x_column: usize, metric: usize) -> Result<String> {
    table.require_rows()?;

    let mut best_row = 0;
    let mut best_value = table.number(0, metric)?;
    for row in 1..table.row_count() {
        let value = table.number(row, metric)?;
        if value < best_value {
            best_row = row;
            best_value = value;
        }
    }
    Ok(table.cell(best_row, x_column).to_string())
}

/// Lowest and highest of `labels` by [`compare_labels`].
///
/// Returns `None` for an empty list.
///
/// # Examples
///
/// ```
/// use sketchstat_pipeline::label_bounds;
///
/// let labels = ["4".to_string(), "8".to_string(), "4".to_string()];
/// assert_eq!(label_bounds(&labels), Some(("4", "8")));
/// ```
pub fn label_bounds(labels: &[String]) -> Option<(&str, &str)> {
    let first = labels.first()?.as_str();
    Some(labels.iter().skip(1).fold((first, first), |(lower, upper), label| {
        let lower = match compare_labels(label, lower) {
            Ordering::Less => label.as_str(),
            _ => lower,
        };
        let upper = match compare_labels(label, upper) {
            Ordering::Greater => label.as_str(),
            _ => upper,
        };
        (lower, upper)
    }))
}

/// Compute the envelope for `(axis key, trial paths)` entries and write it
/// to `output` with header `<axis_label>,lower,upper`.
///
/// Output rows follow the entry order. Every trial file is read and checked
/// before `output` is created.
///
/// # Errors
///
/// - [`StatError::EmptyInput`] when there are no entries or an entry has no trials
/// - [`StatError::EmptyTable`] when a trial file has no rows
/// - [`StatError::MissingColumn`] when a trial lacks `x_column` or `metric`
pub fn compute_envelope(
    entries: &[(String, Vec<PathBuf>)],
    x_column: &str,
    metric: &str,
    axis_label: &str,
    output: &Path,
) -> Result<Vec<Envelope>> {
    if entries.is_empty() {
        return Err(StatError::EmptyInput(format!("envelope '{}'", metric)));
    }

    let envelopes = entries
        .iter()
        .map(|(key, paths)| envelope_for(key, paths, x_column, metric))
        .collect::<Result<Vec<_>>>()?;

    write_rows(
        output,
        &[axis_label, "lower", "upper"],
        envelopes
            .iter()
            .map(|e| [e.key.as_str(), e.lower.as_str(), e.upper.as_str()]),
    )?;
    info!(keys = envelopes.len(), output = %output.display(), "computed envelope");
    Ok(envelopes)
}

fn envelope_for(key: &str, paths: &[PathBuf], x_column: &str, metric: &str) -> Result<Envelope> {
    let labels = paths
        .iter()
        .map(|path| {
            let table = read_table(path)?;
            let x = table.column_index(x_column)?;
            let column = table.column_index(metric)?;
            trial_best_label(&table, x, column)
        })
        .collect::<Result<Vec<_>>>()?;

    let (lower, upper) = label_bounds(&labels)
        .ok_or_else(|| StatError::EmptyInput(format!("envelope key '{}'", key)))?;
    debug!(key, trials = labels.len(), lower, upper, "envelope for key");

    Ok(Envelope {
        key: key.to_string(),
        lower: lower.to_string(),
        upper: upper.to_string(),
    })
}
