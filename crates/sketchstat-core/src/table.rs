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

//! In-memory measurement tables.

use crate::error::{Result, StatError};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// A fully-read measurement table.
///
/// The first column is the table's local x (hash-function count, memory
/// budget, ...); the remaining columns are named metrics. Cells are kept as
/// the exact text that was read so pass-through values survive unchanged;
/// numbers are parsed on demand with [`MeasurementTable::number`].
///
/// Invariants, checked by [`MeasurementTable::new`]:
/// - the header is non-empty and has no empty or repeated names,
/// - every row has exactly one cell per header column,
/// - x values are unique.
///
/// # Examples
///
/// ```
/// use sketchstat_core::MeasurementTable;
///
/// let table = MeasurementTable::new(
///     "trial.csv",
///     vec!["hash functions".into(), "err".into()],
///     vec![vec!["1".into(), "0.5".into()], vec!["2".into(), "0.25".into()]],
/// )
/// .unwrap();
///
/// assert_eq!(table.x_column(), "hash functions");
/// assert_eq!(table.metric_columns(), ["err"]);
/// assert_eq!(table.number(1, 1).unwrap(), 0.25);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct MeasurementTable {
    source: PathBuf,
    header: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl MeasurementTable {
    /// Build a table, validating the header, row widths and x uniqueness.
    ///
    /// `source` is only used in error messages.
    pub fn new(
        source: impl Into<PathBuf>,
        header: Vec<String>,
        rows: Vec<Vec<String>>,
    ) -> Result<Self> {
        let source = source.into();
        validate_header(&source, &header)?;

        let mut seen = HashSet::with_capacity(rows.len());
        for (index, row) in rows.iter().enumerate() {
            let line = index + 2;
            if row.len() != header.len() {
                return Err(StatError::WidthMismatch {
                    path: source,
                    expected: header.len(),
                    actual: row.len(),
                    line,
                });
            }
            if !seen.insert(row[0].as_str()) {
                return Err(StatError::DuplicateKey {
                    value: row[0].clone(),
                    path: source,
                    line,
                });
            }
        }

        Ok(Self {
            source,
            header,
            rows,
        })
    }

    /// Path the table was read from (or was labelled with).
    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Column names, x column first.
    pub fn header(&self) -> &[String] {
        &self.header
    }

    /// Name of the local-x column.
    pub fn x_column(&self) -> &str {
        &self.header[0]
    }

    /// Names of the metric columns (everything after the x column).
    pub fn metric_columns(&self) -> &[String] {
        &self.header[1..]
    }

    /// Data rows as raw cells.
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Number of data rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no data rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// x values in row order.
    pub fn x_values(&self) -> impl Iterator<Item = &str> + '_ {
        self.rows.iter().map(|row| row[0].as_str())
    }

    /// Index of a column by exact name.
    ///
    /// # Errors
    ///
    /// [`StatError::MissingColumn`] naming this table's source.
    pub fn column_index(&self, name: &str) -> Result<usize> {
        self.header
            .iter()
            .position(|column| column == name)
            .ok_or_else(|| StatError::MissingColumn {
                column: name.to_string(),
                path: self.source.clone(),
            })
    }

    /// Row index of an x value.
    pub fn find_row(&self, x: &str) -> Option<usize> {
        self.rows.iter().position(|row| row[0] == x)
    }

    /// Raw text of one cell.
    ///
    /// # Panics
    ///
    /// Panics if `row` or `column` is out of bounds.
    pub fn cell(&self, row: usize, column: usize) -> &str {
        &self.rows[row][column]
    }

    /// Parse one cell as `f64`.
    ///
    /// # Errors
    ///
    /// [`StatError::InvalidNumber`] with the file line of the row.
    pub fn number(&self, row: usize, column: usize) -> Result<f64> {
        let value = self.cell(row, column);
        value
            .trim()
            .parse::<f64>()
            .map_err(|_| StatError::InvalidNumber {
                path: self.source.clone(),
                line: row + 2,
                column: self.header[column].clone(),
                value: value.to_string(),
            })
    }

    /// Require the table to have at least one data row.
    pub fn require_rows(&self) -> Result<()> {
        if self.rows.is_empty() {
            return Err(StatError::EmptyTable {
                path: self.source.clone(),
            });
        }
        Ok(())
    }

    /// Require `other` to carry exactly this table's header.
    ///
    /// # Errors
    ///
    /// [`StatError::SchemaMismatch`] naming both files and both headers.
    pub fn require_same_header(&self, other: &MeasurementTable) -> Result<()> {
        if self.header != other.header {
            return Err(StatError::SchemaMismatch {
                reference: self.source.clone(),
                reference_header: self.header.clone(),
                path: other.source.clone(),
                header: other.header.clone(),
            });
        }
        Ok(())
    }
}

fn validate_header(source: &Path, header: &[String]) -> Result<()> {
    if header.is_empty() {
        return Err(StatError::InvalidHeader {
            path: source.to_path_buf(),
            position: 0,
            reason: "header is empty".to_string(),
        });
    }

    let mut seen = HashSet::with_capacity(header.len());
    for (position, name) in header.iter().enumerate() {
        if name.is_empty() {
            return Err(StatError::InvalidHeader {
                path: source.to_path_buf(),
                position,
                reason: "empty column name".to_string(),
            });
        }
        if !seen.insert(name.as_str()) {
            return Err(StatError::InvalidHeader {
                path: source.to_path_buf(),
                position,
                reason: format!("duplicate column name '{}'", name),
            });
        }
    }
    Ok(())
}
