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

//! Measurement tables and CSV I/O for sketch evaluation post-processing.
//!
//! The external measurement process writes one CSV per run: a header line,
//! then one row per configuration value. The first column is the run's local
//! x (hash-function count, memory budget, ...), the remaining columns are
//! error metrics. This crate reads those files into [`MeasurementTable`]s,
//! writes derived tables back out, and defines the [`StatError`] type every
//! stage reports.
//!
//! # Features
//!
//! - **Strict tables**: row widths, header names and x uniqueness are checked on read
//! - **Verbatim cells**: cells keep their original text; numbers are parsed on demand
//! - **Configurable reading**: delimiter, trimming and size limits via [`ReadConfig`]
//! - **Label ordering**: numeric-aware comparison of sweep labels
//!
//! # Examples
//!
//! ```
//! use sketchstat_core::{read_table_from_reader, rows_to_string, ReadConfig};
//!
//! let csv = "hash functions,normalized error\n1,0.5\n2,0.25\n";
//! let table = read_table_from_reader(csv.as_bytes(), "run.csv", &ReadConfig::default()).unwrap();
//!
//! let err = table.column_index("normalized error").unwrap();
//! assert_eq!(table.number(0, err).unwrap(), 0.5);
//!
//! let text = rows_to_string(table.header(), table.rows()).unwrap();
//! assert_eq!(text, csv);
//! ```

mod config;
mod error;
mod label;
mod read;
mod table;
mod write;

pub use config::{ReadConfig, DEFAULT_MAX_COLUMNS, DEFAULT_MAX_ROWS};
pub use error::{Result, StatError};
pub use label::{compare_labels, order_numerically, slug};
pub use read::{read_table, read_table_from_reader, read_table_with_config};
pub use table::MeasurementTable;
pub use write::{
    format_number, rows_to_string, write_rows, write_rows_to_writer, write_table,
};
