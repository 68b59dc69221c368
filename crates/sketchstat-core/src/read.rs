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

//! Read measurement tables from CSV.

use crate::config::ReadConfig;
use crate::error::{Result, StatError};
use crate::table::MeasurementTable;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::debug;

/// Read a measurement table from a file with the default configuration.
///
/// # Example
/// ```no_run
/// use sketchstat_core::read_table;
///
/// let table = read_table("results/averaged/skew-0.9.csv").unwrap();
/// println!("{} rows", table.row_count());
/// ```
pub fn read_table(path: impl AsRef<Path>) -> Result<MeasurementTable> {
    read_table_with_config(path, &ReadConfig::default())
}

/// Read a measurement table from a file.
///
/// # Errors
///
/// - [`StatError::Io`] when the file cannot be opened
/// - [`StatError::InvalidHeader`], [`StatError::WidthMismatch`],
///   [`StatError::DuplicateKey`] for malformed tables
/// - [`StatError::RowLimit`] when `config.max_rows` is exceeded
pub fn read_table_with_config(
    path: impl AsRef<Path>,
    config: &ReadConfig,
) -> Result<MeasurementTable> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| StatError::io(path, e))?;
    let table = read_table_from_reader(file, path, config)?;
    debug!(
        path = %path.display(),
        rows = table.row_count(),
        columns = table.header().len(),
        "read measurement table"
    );
    Ok(table)
}

/// Parse a measurement table from any reader.
///
/// `source` labels the table in error messages.
///
/// # Example
/// ```
/// use sketchstat_core::{read_table_from_reader, ReadConfig};
///
/// let data = "hash functions,err\n1,0.5\n2,0.25\n";
/// let table = read_table_from_reader(data.as_bytes(), "inline", &ReadConfig::default()).unwrap();
/// assert_eq!(table.row_count(), 2);
/// ```
pub fn read_table_from_reader<R: Read>(
    reader: R,
    source: impl AsRef<Path>,
    config: &ReadConfig,
) -> Result<MeasurementTable> {
    let source = source.as_ref();
    let mut csv_reader = csv::ReaderBuilder::new()
        .delimiter(config.delimiter)
        .has_headers(true)
        .flexible(true)
        .trim(if config.trim {
            csv::Trim::All
        } else {
            csv::Trim::None
        })
        .from_reader(reader);

    let header: Vec<String> = csv_reader
        .headers()
        .map_err(|e| StatError::csv(source, e))?
        .iter()
        .map(str::to_string)
        .collect();

    if header.is_empty() || header.iter().all(String::is_empty) {
        return Err(StatError::InvalidHeader {
            path: source.to_path_buf(),
            position: 0,
            reason: "missing header line".to_string(),
        });
    }
    if header.len() > config.max_columns {
        return Err(StatError::InvalidHeader {
            path: source.to_path_buf(),
            position: config.max_columns,
            reason: format!(
                "{} columns exceed the limit of {}",
                header.len(),
                config.max_columns
            ),
        });
    }

    let mut rows = Vec::new();
    for record in csv_reader.records() {
        let record = record.map_err(|e| StatError::csv(source, e))?;

        if rows.len() >= config.max_rows {
            return Err(StatError::RowLimit {
                path: source.to_path_buf(),
                limit: config.max_rows,
            });
        }

        let line = record
            .position()
            .map(|p| p.line() as usize)
            .unwrap_or(rows.len() + 2);
        if record.len() != header.len() {
            return Err(StatError::WidthMismatch {
                path: source.to_path_buf(),
                expected: header.len(),
                actual: record.len(),
                line,
            });
        }

        rows.push(record.iter().map(str::to_string).collect::<Vec<_>>());
    }

    MeasurementTable::new(source, header, rows)
}
