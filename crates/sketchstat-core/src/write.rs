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

//! Write tables as CSV.
//!
//! Output is always comma-separated with `\n` line endings, header first.

use crate::error::{Result, StatError};
use crate::table::MeasurementTable;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use tracing::debug;

/// Render a number in the locale-independent form used by every output.
///
/// This is Rust's shortest round-trip `f64` formatting, so parsing the text
/// back yields the same value.
///
/// # Examples
///
/// ```
/// use sketchstat_core::format_number;
///
/// assert_eq!(format_number(3.0), "3");
/// assert_eq!(format_number(0.125), "0.125");
/// assert_eq!(format_number(1e-7), "0.0000001");
/// ```
pub fn format_number(value: f64) -> String {
    value.to_string()
}

/// Write a header and rows to any writer.
pub fn write_rows_to_writer<W, H, R, C>(writer: W, header: &[H], rows: R) -> csv::Result<()>
where
    W: Write,
    H: AsRef<str>,
    R: IntoIterator<Item = C>,
    C: IntoIterator,
    C::Item: AsRef<str>,
{
    let mut wtr = csv::WriterBuilder::new()
        .delimiter(b',')
        .terminator(csv::Terminator::Any(b'\n'))
        .quote_style(csv::QuoteStyle::Necessary)
        .from_writer(writer);

    wtr.write_record(header.iter().map(|h| h.as_ref().as_bytes()))?;
    for row in rows {
        wtr.write_record(row.into_iter().map(|cell| cell.as_ref().to_string()))?;
    }
    wtr.flush()?;
    Ok(())
}

/// Write a header and rows to a file, replacing any existing file.
///
/// Callers finish computing every row before calling this, so a failure
/// upstream never leaves a half-written file behind.
///
/// # Example
/// ```no_run
/// use sketchstat_core::write_rows;
///
/// write_rows(
///     "out/best.csv",
///     &["skew", "hash functions", "err"],
///     vec![vec!["0.9", "4", "0.01"]],
/// )
/// .unwrap();
/// ```
pub fn write_rows<H, R, C>(path: impl AsRef<Path>, header: &[H], rows: R) -> Result<()>
where
    H: AsRef<str>,
    R: IntoIterator<Item = C>,
    C: IntoIterator,
    C::Item: AsRef<str>,
{
    let path = path.as_ref();
    let file = File::create(path).map_err(|e| StatError::io(path, e))?;
    write_rows_to_writer(file, header, rows).map_err(|e| StatError::csv(path, e))?;
    debug!(path = %path.display(), "wrote table");
    Ok(())
}

/// Write a measurement table to a file.
pub fn write_table(path: impl AsRef<Path>, table: &MeasurementTable) -> Result<()> {
    write_rows(path, table.header(), table.rows())
}

/// Render a header and rows to a CSV string.
///
/// # Example
/// ```
/// use sketchstat_core::rows_to_string;
///
/// let text = rows_to_string(&["skew", "err"], vec![vec!["0.9", "0.5"]]).unwrap();
/// assert_eq!(text, "skew,err\n0.9,0.5\n");
/// ```
pub fn rows_to_string<H, R, C>(header: &[H], rows: R) -> Result<String>
where
    H: AsRef<str>,
    R: IntoIterator<Item = C>,
    C: IntoIterator,
    C::Item: AsRef<str>,
{
    let mut buffer = Vec::new();
    write_rows_to_writer(&mut buffer, header, rows)
        .map_err(|e| StatError::csv("<memory>", e))?;
    String::from_utf8(buffer).map_err(|_| StatError::Other("CSV output is not UTF-8".to_string()))
}
