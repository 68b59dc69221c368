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

//! Best variant per axis key.

use serde::Serialize;
use sketchstat_core::{read_table, write_rows, Result, StatError};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Winning variant for one axis key.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BestChoice {
    /// Axis key (a row of the first file).
    pub key: String,
    /// Label of the file that holds the lowest value.
    pub label: String,
    /// Lowest metric value.
    pub value: f64,
    /// The winning cell's text, written unchanged.
    pub text: String,
}

/// Pick, for every axis key, the labelled file with the lowest metric value.
///
/// `files` are `(label, path)` pairs, normally [`PivotedColumn::files`] of
/// one metric. The first file fixes the set and order of axis keys. A later
/// file only replaces the current best on a strictly lower value, so ties
/// keep the earliest label. The result is written to `output` with header
/// `<axis_column>,<discriminant>,<metric>`.
///
/// # Errors
///
/// - [`StatError::EmptyInput`] when `files` is empty
/// - [`StatError::MissingColumn`] when a file lacks `axis_column` or `metric`
/// - [`StatError::MissingKey`] when a later file lists an axis key the first did not
/// - [`StatError::InvalidNumber`] when a metric cell is not a number
///
/// [`PivotedColumn::files`]: crate::PivotedColumn::files
pub fn select_best(
    files: &[(String, PathBuf)],
    axis_column: &str,
    discriminant: &str,
    metric: &str,
    output: &Path,
) -> Result<Vec<BestChoice>> {
    let choices = best_choices(files, axis_column, metric)?;

    write_rows(
        output,
        &[axis_column, discriminant, metric],
        choices
            .iter()
            .map(|c| [c.key.as_str(), c.label.as_str(), c.text.as_str()]),
    )?;
    info!(
        files = files.len(),
        keys = choices.len(),
        output = %output.display(),
        "selected best variants"
    );
    Ok(choices)
}

/// [`select_best`] without writing the result.
pub fn best_choices(
    files: &[(String, PathBuf)],
    axis_column: &str,
    metric: &str,
) -> Result<Vec<BestChoice>> {
    if files.is_empty() {
        return Err(StatError::EmptyInput(format!("best '{}'", metric)));
    }

    let mut choices: Vec<BestChoice> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for (position, (label, path)) in files.iter().enumerate() {
        let table = read_table(path)?;
        let axis = table.column_index(axis_column)?;
        let column = table.column_index(metric)?;

        for row in 0..table.row_count() {
            let key = table.cell(row, axis);
            let value = table.number(row, column)?;

            match index.get(key).copied() {
                Some(slot) => {
                    let best = &mut choices[slot];
                    if value < best.value {
                        best.label = label.clone();
                        best.value = value;
                        best.text = table.cell(row, column).to_string();
                    }
                }
                None if position == 0 => {
                    index.insert(key.to_string(), choices.len());
                    choices.push(BestChoice {
                        key: key.to_string(),
                        label: label.clone(),
                        value,
                        text: table.cell(row, column).to_string(),
                    });
                }
                None => {
                    return Err(StatError::MissingKey {
                        key: key.to_string(),
                        path: path.clone(),
                    });
                }
            }
        }
        debug!(label = %label, path = %path.display(), "compared variant");
    }

    Ok(choices)
}
