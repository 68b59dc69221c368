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

//! Pivot keyed result tables into per-metric, per-x series.
//!
//! The input maps a sweep key (for example a skew) to a result table whose
//! rows are local x values (for example hash-function counts) and whose
//! columns are metrics. The output turns that inside out: for every metric
//! and every local x there is one file listing `key,value` for every key.
//!
//! ```text
//! <output>/<metric-slug>/trace-<x>-<x-column-slug>.csv
//! ```

use serde::{Deserialize, Serialize};
use sketchstat_core::{read_table, slug, write_rows, MeasurementTable, Result, StatError};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Output of the pivot for one metric.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PivotedColumn {
    /// Metric column name.
    pub name: String,
    /// Directory-safe form of the name.
    pub slug: String,
    /// Directory holding this metric's files.
    pub directory: PathBuf,
    /// Local x value to series file, in the representative table's row order.
    pub files: Vec<(String, PathBuf)>,
}

impl PivotedColumn {
    /// Series file for one local x value.
    pub fn file_for(&self, x: &str) -> Option<&Path> {
        self.files
            .iter()
            .find(|(value, _)| value == x)
            .map(|(_, path)| path.as_path())
    }
}

/// File name of the series for local x value `x`.
///
/// # Examples
///
/// ```
/// assert_eq!(
///     sketchstat_pipeline::series_file_name("4", "hash functions"),
///     "trace-4-hash-functions.csv"
/// );
/// ```
pub fn series_file_name(x: &str, x_column: &str) -> String {
    format!("trace-{}-{}.csv", x, slug(x_column))
}

/// Pivot `(key, path)` entries into per-metric series files.
///
/// The first entry's table is the representative: its first column is the
/// local x column and the rest are metrics. Rows of each output file follow
/// the entry order. A metric directory that already exists is replaced.
///
/// # Errors
///
/// - [`StatError::EmptyInput`] for an empty entry list
/// - [`StatError::DuplicateKey`] if two entries share a key; the reported line
///   is where the repeated key would land in every series file
/// - [`StatError::SchemaMismatch`] if a table's header differs from the representative's
/// - [`StatError::MissingKey`] if a table lacks a local x value or carries an extra one
/// - [`StatError::DuplicateOutput`] if two metric names share a slug
pub fn pivot_results(
    entries: &[(String, PathBuf)],
    axis_label: &str,
    output_dir: &Path,
) -> Result<Vec<PivotedColumn>> {
    if entries.is_empty() {
        return Err(StatError::EmptyInput("pivot".to_string()));
    }
    check_distinct_keys(entries, output_dir)?;

    let tables = entries
        .iter()
        .map(|(_, path)| read_table(path))
        .collect::<Result<Vec<_>>>()?;
    let representative = &tables[0];
    let positions = tables
        .iter()
        .map(|table| align_rows(representative, table))
        .collect::<Result<Vec<_>>>()?;

    let mut slugs = HashSet::new();
    for metric in representative.metric_columns() {
        let directory = output_dir.join(slug(metric));
        if !slugs.insert(slug(metric)) {
            return Err(StatError::DuplicateOutput { path: directory });
        }
    }

    let x_column = representative.x_column();
    let mut columns = Vec::with_capacity(representative.metric_columns().len());

    for (offset, metric) in representative.metric_columns().iter().enumerate() {
        let column = offset + 1;
        let metric_slug = slug(metric);
        let directory = output_dir.join(&metric_slug);
        replace_dir(&directory)?;

        let header = [axis_label, metric.as_str()];
        let mut files = Vec::with_capacity(representative.row_count());
        for (row, x) in representative.x_values().enumerate() {
            let rows = entries
                .iter()
                .zip(&tables)
                .zip(&positions)
                .map(|(((key, _), table), rows)| [key.as_str(), table.cell(rows[row], column)]);
            let path = directory.join(series_file_name(x, x_column));
            write_rows(&path, &header, rows)?;
            files.push((x.to_string(), path));
        }

        debug!(metric = %metric, files = files.len(), "pivoted metric");
        columns.push(PivotedColumn {
            name: metric.clone(),
            slug: metric_slug,
            directory,
            files,
        });
    }

    info!(
        keys = entries.len(),
        metrics = columns.len(),
        output_dir = %output_dir.display(),
        "pivot finished"
    );
    Ok(columns)
}

/// Write the pivot result as pretty JSON, for plotting scripts.
pub fn write_manifest(path: impl AsRef<Path>, columns: &[PivotedColumn]) -> Result<()> {
    let path = path.as_ref();
    let json = serde_json::to_string_pretty(columns)?;
    fs::write(path, json).map_err(|e| StatError::io(path, e))?;
    debug!(path = %path.display(), columns = columns.len(), "wrote pivot manifest");
    Ok(())
}

/// Read a manifest written by [`write_manifest`].
pub fn read_manifest(path: impl AsRef<Path>) -> Result<Vec<PivotedColumn>> {
    let path = path.as_ref();
    let json = fs::read_to_string(path).map_err(|e| StatError::io(path, e))?;
    Ok(serde_json::from_str(&json)?)
}

fn check_distinct_keys(entries: &[(String, PathBuf)], output_dir: &Path) -> Result<()> {
    let mut seen = HashSet::with_capacity(entries.len());
    for (position, (key, _)) in entries.iter().enumerate() {
        if !seen.insert(key.as_str()) {
            return Err(StatError::DuplicateKey {
                path: output_dir.to_path_buf(),
                value: key.clone(),
                line: position + 2,
            });
        }
    }
    Ok(())
}

/// Row of `table` holding each representative x value, in representative order.
fn align_rows(representative: &MeasurementTable, table: &MeasurementTable) -> Result<Vec<usize>> {
    representative.require_same_header(table)?;

    let positions = representative
        .x_values()
        .map(|x| {
            table.find_row(x).ok_or_else(|| StatError::MissingKey {
                key: x.to_string(),
                path: table.source().to_path_buf(),
            })
        })
        .collect::<Result<Vec<_>>>()?;

    // x values are unique, so equal counts mean equal sets.
    if table.row_count() != representative.row_count() {
        if let Some(extra) = table
            .x_values()
            .find(|x| representative.find_row(x).is_none())
        {
            return Err(StatError::MissingKey {
                key: extra.to_string(),
                path: representative.source().to_path_buf(),
            });
        }
    }
    Ok(positions)
}

fn replace_dir(directory: &Path) -> Result<()> {
    if directory.exists() {
        warn!(directory = %directory.display(), "replacing existing pivot output");
        fs::remove_dir_all(directory).map_err(|e| StatError::io(directory, e))?;
    }
    fs::create_dir_all(directory).map_err(|e| StatError::io(directory, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(source: &str, header: &[&str], rows: &[&[&str]]) -> MeasurementTable {
        MeasurementTable::new(
            source,
            header.iter().map(|s| s.to_string()).collect(),
            rows.iter()
                .map(|r| r.iter().map(|s| s.to_string()).collect())
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn test_series_file_name_slugs_column() {
        assert_eq!(series_file_name("16", "memory"), "trace-16-memory.csv");
        assert_eq!(series_file_name("2", "hash fns"), "trace-2-hash-fns.csv");
    }

    #[test]
    fn test_aligned_tables_in_different_row_order() {
        let a = table("a.csv", &["x", "err"], &[&["1", "0.1"], &["2", "0.2"]]);
        let b = table("b.csv", &["x", "err"], &[&["2", "0.3"], &["1", "0.4"]]);
        assert_eq!(align_rows(&a, &b).unwrap(), [1, 0]);
        assert_eq!(align_rows(&a, &a).unwrap(), [0, 1]);
    }

    #[test]
    fn test_missing_x_value() {
        let a = table("a.csv", &["x", "err"], &[&["1", "0.1"], &["2", "0.2"]]);
        let b = table("b.csv", &["x", "err"], &[&["1", "0.3"]]);
        let err = align_rows(&a, &b).unwrap_err();
        assert!(matches!(err, StatError::MissingKey { ref key, .. } if key == "2"));
    }

    #[test]
    fn test_extra_x_value() {
        let a = table("a.csv", &["x", "err"], &[&["1", "0.1"]]);
        let b = table("b.csv", &["x", "err"], &[&["1", "0.3"], &["4", "0.1"]]);
        let err = align_rows(&a, &b).unwrap_err();
        assert!(matches!(err, StatError::MissingKey { ref key, .. } if key == "4"));
    }

    #[test]
    fn test_header_mismatch() {
        let a = table("a.csv", &["x", "err"], &[&["1", "0.1"]]);
        let b = table("b.csv", &["x", "error"], &[&["1", "0.1"]]);
        assert!(matches!(
            align_rows(&a, &b).unwrap_err(),
            StatError::SchemaMismatch { .. }
        ));
    }

    #[test]
    fn test_file_for_lookup() {
        let column = PivotedColumn {
            name: "err".into(),
            slug: "err".into(),
            directory: PathBuf::from("out/err"),
            files: vec![("1".into(), PathBuf::from("out/err/trace-1-x.csv"))],
        };
        assert_eq!(column.file_for("1"), Some(Path::new("out/err/trace-1-x.csv")));
        assert_eq!(column.file_for("2"), None);
    }
}
