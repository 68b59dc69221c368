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

//! Builder for CSV measurement tables.

use sketchstat_core::{rows_to_string, MeasurementTable};
use std::fs;
use std::path::{Path, PathBuf};

/// Builder for CSV measurement tables.
///
/// # Examples
///
/// ```
/// use sketchstat_test::fixtures::builders::TableBuilder;
///
/// let csv = TableBuilder::new(["hash functions", "err"])
///     .row(["1", "0.5"])
///     .row(["2", "0.25"])
///     .to_csv();
///
/// assert_eq!(csv, "hash functions,err\n1,0.5\n2,0.25\n");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableBuilder {
    header: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl TableBuilder {
    /// Creates a builder with the given header.
    pub fn new<S: Into<String>>(header: impl IntoIterator<Item = S>) -> Self {
        Self {
            header: header.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Adds a row of raw cells.
    pub fn row<S: Into<String>>(mut self, cells: impl IntoIterator<Item = S>) -> Self {
        self.rows.push(cells.into_iter().map(Into::into).collect());
        self
    }

    /// Adds one `x,value` row per pair, formatting values with `Display`.
    pub fn series<X: ToString, V: ToString>(mut self, points: impl IntoIterator<Item = (X, V)>) -> Self {
        for (x, value) in points {
            self.rows.push(vec![x.to_string(), value.to_string()]);
        }
        self
    }

    /// Header cells.
    pub fn header(&self) -> &[String] {
        &self.header
    }

    /// Rows added so far.
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Renders the table as CSV text.
    ///
    /// # Panics
    ///
    /// Panics if the CSV writer fails, which only happens for invalid UTF-8.
    pub fn to_csv(&self) -> String {
        rows_to_string(&self.header, &self.rows).expect("fixture table renders")
    }

    /// Builds a validated [`MeasurementTable`] labelled with `source`.
    ///
    /// # Panics
    ///
    /// Panics if the fixture violates a table invariant.
    pub fn build(&self, source: impl Into<PathBuf>) -> MeasurementTable {
        MeasurementTable::new(source, self.header.clone(), self.rows.clone())
            .expect("fixture table is valid")
    }

    /// Writes the table to `path` and returns the path.
    ///
    /// # Panics
    ///
    /// Panics on I/O failure.
    pub fn write(&self, path: impl AsRef<Path>) -> PathBuf {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create fixture directory");
        }
        fs::write(path, self.to_csv()).expect("write fixture table");
        path.to_path_buf()
    }
}
