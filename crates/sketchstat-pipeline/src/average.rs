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

//! Schema-validated averaging of repeated trials.
//!
//! Every file of a [`TrialGroup`] is one trial of the same configuration.
//! The first file fixes the schema (header and row count); the others must
//! match it exactly. Rows are aligned by position, so trials are expected to
//! list their x values in the same order.

use serde::{Deserialize, Serialize};
use sketchstat_core::{
    format_number, read_table, write_rows, MeasurementTable, Result, StatError,
};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Named list of trial files for one configuration.
///
/// # Examples
///
/// ```
/// use sketchstat_pipeline::TrialGroup;
///
/// let group = TrialGroup::new("top-100-skew-1.1.csv", ["trial-1.csv", "trial-2.csv"]);
/// assert_eq!(group.paths.len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrialGroup {
    /// Group name, also the output file name.
    pub name: String,
    /// Trial files, the first one being the schema reference.
    pub paths: Vec<PathBuf>,
}

impl TrialGroup {
    /// Create a group from a name and trial paths.
    pub fn new<P: Into<PathBuf>>(name: impl Into<String>, paths: impl IntoIterator<Item = P>) -> Self {
        Self {
            name: name.into(),
            paths: paths.into_iter().map(Into::into).collect(),
        }
    }

    /// Path the averaged table is written to under `output_dir`.
    pub fn output_path(&self, output_dir: &Path) -> PathBuf {
        output_dir.join(&self.name)
    }
}

/// Average already-read trial tables into output rows.
///
/// Columns named in `average_columns` hold the arithmetic mean over all
/// tables; every other column keeps the first table's text.
///
/// # Errors
///
/// - [`StatError::SchemaMismatch`] if a header differs from the first table's
/// - [`StatError::RowCountMismatch`] if a row count differs
/// - [`StatError::MissingColumn`] if an averaged column is not in the header
/// - [`StatError::InvalidNumber`] if an averaged cell is not a number
pub fn average_tables(
    tables: &[MeasurementTable],
    average_columns: &[String],
) -> Result<Vec<Vec<String>>> {
    let (reference, others) = tables
        .split_first()
        .ok_or_else(|| StatError::EmptyInput("averaging".to_string()))?;

    for table in others {
        reference.require_same_header(table)?;
        if table.row_count() != reference.row_count() {
            return Err(StatError::RowCountMismatch {
                reference: reference.source().to_path_buf(),
                expected: reference.row_count(),
                path: table.source().to_path_buf(),
                actual: table.row_count(),
            });
        }
    }

    let targets = average_columns
        .iter()
        .map(|name| reference.column_index(name))
        .collect::<Result<Vec<_>>>()?;

    let mut rows: Vec<Vec<String>> = reference.rows().to_vec();
    let count = tables.len() as f64;
    for (row_index, row) in rows.iter_mut().enumerate() {
        for &column in &targets {
            let mut sum = 0.0;
            for table in tables {
                sum += table.number(row_index, column)?;
            }
            row[column] = format_number(sum / count);
        }
    }
    Ok(rows)
}

/// Average one trial group into `<output_dir>/<group name>`.
///
/// All trials are read and validated before the output directory or file is
/// touched.
///
/// # Errors
///
/// [`StatError::EmptyInput`] for a group without files, plus everything
/// [`average_tables`] and reading can report.
pub fn average_group(
    group: &TrialGroup,
    output_dir: &Path,
    average_columns: &[String],
) -> Result<PathBuf> {
    if group.paths.is_empty() {
        return Err(StatError::EmptyInput(format!("trial group '{}'", group.name)));
    }

    let tables = group
        .paths
        .iter()
        .map(read_table)
        .collect::<Result<Vec<_>>>()?;
    let rows = average_tables(&tables, average_columns)?;

    fs::create_dir_all(output_dir).map_err(|e| StatError::io(output_dir, e))?;
    let output = group.output_path(output_dir);
    write_rows(&output, tables[0].header(), &rows)?;

    debug!(
        group = %group.name,
        trials = tables.len(),
        rows = rows.len(),
        "averaged trial group"
    );
    Ok(output)
}

/// Average every group in order, stopping at the first failure.
pub fn average_groups(
    groups: &[TrialGroup],
    output_dir: &Path,
    average_columns: &[String],
) -> Result<Vec<PathBuf>> {
    let outputs = groups
        .iter()
        .map(|group| average_group(group, output_dir, average_columns))
        .collect::<Result<Vec<_>>>()?;
    info!(groups = outputs.len(), output_dir = %output_dir.display(), "averaging finished");
    Ok(outputs)
}
