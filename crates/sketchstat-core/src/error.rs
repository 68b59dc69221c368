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

//! Error types shared by every sketchstat stage.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Post-processing error types.
///
/// Every error is fatal at the point of detection: a stage that returns one
/// of these has not written any output.
///
/// # Examples
///
/// ```
/// use sketchstat_core::StatError;
/// use std::path::PathBuf;
///
/// let err = StatError::MissingColumn {
///     column: "normalized error".to_string(),
///     path: PathBuf::from("results/run-1.csv"),
/// };
///
/// assert_eq!(
///     err.to_string(),
///     "Missing column 'normalized error' in results/run-1.csv"
/// );
/// ```
#[derive(Debug, Error)]
pub enum StatError {
    /// Two files that must share a header do not.
    ///
    /// # Examples
    ///
    /// ```
    /// use sketchstat_core::StatError;
    /// use std::path::PathBuf;
    ///
    /// let err = StatError::SchemaMismatch {
    ///     reference: PathBuf::from("a.csv"),
    ///     reference_header: vec!["x".to_string(), "err".to_string()],
    ///     path: PathBuf::from("b.csv"),
    ///     header: vec!["err".to_string(), "x".to_string()],
    /// };
    /// assert!(err.to_string().contains("did not match"));
    /// ```
    #[error(
        "Headers of {} did not match headers of {} ([{}] vs [{}])",
        .path.display(),
        .reference.display(),
        .reference_header.join(","),
        .header.join(",")
    )]
    SchemaMismatch {
        /// File that defined the reference schema.
        reference: PathBuf,
        /// Header of the reference file.
        reference_header: Vec<String>,
        /// File that failed the check.
        path: PathBuf,
        /// Header of the offending file.
        header: Vec<String>,
    },

    /// Two files that must be row-aligned have different row counts.
    #[error(
        "Row count of {} ({actual}) did not match row count of {} ({expected})",
        .path.display(),
        .reference.display()
    )]
    RowCountMismatch {
        /// File that defined the reference row count.
        reference: PathBuf,
        /// Reference row count.
        expected: usize,
        /// File that failed the check.
        path: PathBuf,
        /// Row count of the offending file.
        actual: usize,
    },

    /// A requested column is absent from a file's header.
    #[error("Missing column '{column}' in {}", .path.display())]
    MissingColumn {
        /// Requested column name.
        column: String,
        /// File whose header was searched.
        path: PathBuf,
    },

    /// A key (axis key or local-x value) expected in a file is absent, or a
    /// file carries a key the reference did not.
    ///
    /// # Examples
    ///
    /// ```
    /// use sketchstat_core::StatError;
    /// use std::path::PathBuf;
    ///
    /// let err = StatError::MissingKey {
    ///     key: "8".to_string(),
    ///     path: PathBuf::from("skew-0.9.csv"),
    /// };
    /// assert_eq!(err.to_string(), "Key '8' does not line up with skew-0.9.csv");
    /// ```
    #[error("Key '{key}' does not line up with {}", .path.display())]
    MissingKey {
        /// The key that failed to line up.
        key: String,
        /// File in which the lookup failed.
        path: PathBuf,
    },

    /// Zero inputs supplied where at least one is required.
    ///
    /// # Examples
    ///
    /// ```
    /// use sketchstat_core::StatError;
    ///
    /// let err = StatError::EmptyInput("trial group 'skew-1.1'".to_string());
    /// assert_eq!(err.to_string(), "No input files for trial group 'skew-1.1'");
    /// ```
    #[error("No input files for {0}")]
    EmptyInput(String),

    /// A table has a header but no data rows where rows are required.
    #[error("Table {} has no data rows", .path.display())]
    EmptyTable {
        /// The empty table.
        path: PathBuf,
    },

    /// A cell expected to hold a number does not parse as one.
    ///
    /// # Examples
    ///
    /// ```
    /// use sketchstat_core::StatError;
    /// use std::path::PathBuf;
    ///
    /// let err = StatError::InvalidNumber {
    ///     path: PathBuf::from("run.csv"),
    ///     line: 3,
    ///     column: "err".to_string(),
    ///     value: "n/a".to_string(),
    /// };
    /// assert_eq!(
    ///     err.to_string(),
    ///     "Invalid number 'n/a' in column 'err' at run.csv:3"
    /// );
    /// ```
    #[error("Invalid number '{value}' in column '{column}' at {}:{line}", .path.display())]
    InvalidNumber {
        /// File containing the cell.
        path: PathBuf,
        /// Line number of the row (1-based, header is line 1).
        line: usize,
        /// Column name of the cell.
        column: String,
        /// Raw cell text.
        value: String,
    },

    /// A data row has the wrong number of cells.
    #[error(
        "Row width mismatch in {}: expected {expected} columns, got {actual} at line {line}",
        .path.display()
    )]
    WidthMismatch {
        /// File containing the row.
        path: PathBuf,
        /// Header width.
        expected: usize,
        /// Width of the offending row.
        actual: usize,
        /// Line number of the row (1-based).
        line: usize,
    },

    /// Invalid header format or content.
    #[error("Invalid header in {} at position {position}: {reason}", .path.display())]
    InvalidHeader {
        /// File with the bad header.
        path: PathBuf,
        /// Column position (0-based).
        position: usize,
        /// Reason the header is invalid.
        reason: String,
    },

    /// The x column repeats a value.
    #[error("Duplicate x value '{value}' in {} at line {line}", .path.display())]
    DuplicateKey {
        /// File with the duplicate.
        path: PathBuf,
        /// The repeated x value.
        value: String,
        /// Line of the second occurrence (1-based).
        line: usize,
    },

    /// Row count exceeded the configured limit.
    #[error("Row limit exceeded in {}: more than {limit} rows", .path.display())]
    RowLimit {
        /// File being read.
        path: PathBuf,
        /// Configured maximum.
        limit: usize,
    },

    /// Two jobs of one batch target the same output path.
    #[error("Output path {} is assigned to more than one job", .path.display())]
    DuplicateOutput {
        /// The shared output path.
        path: PathBuf,
    },

    /// I/O error on a specific file.
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        /// File or directory being accessed.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Error from the underlying CSV library.
    #[error("CSV error in {}: {source}", .path.display())]
    Csv {
        /// File being read or written.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: csv::Error,
    },

    /// A configuration value is outside its valid range.
    ///
    /// # Examples
    ///
    /// ```
    /// use sketchstat_core::StatError;
    ///
    /// let err = StatError::InvalidConfig("skew grid step must be positive".to_string());
    /// assert_eq!(
    ///     err.to_string(),
    ///     "Invalid configuration: skew grid step must be positive"
    /// );
    /// ```
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// JSON (de)serialization error for manifests and pipeline configs.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with custom message.
    #[error("{0}")]
    Other(String),

    /// An error annotated with where it happened.
    ///
    /// Display keeps the inner message first: `"<source> (<context>)"`.
    #[error("{source} ({context})")]
    Context {
        /// What was being done.
        context: String,
        /// The annotated error.
        #[source]
        source: Box<StatError>,
    },
}

/// Convenience type alias for `Result` with `StatError`.
pub type Result<T> = std::result::Result<T, StatError>;

/// Path recorded when an error is converted without one.
const UNKNOWN_PATH: &str = "<unknown>";

impl From<std::io::Error> for StatError {
    fn from(source: std::io::Error) -> Self {
        StatError::io(UNKNOWN_PATH, source)
    }
}

impl From<csv::Error> for StatError {
    fn from(source: csv::Error) -> Self {
        StatError::csv(UNKNOWN_PATH, source)
    }
}

impl StatError {
    /// Wrap an I/O error with the path it occurred on.
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        StatError::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Wrap a CSV library error with the path it occurred on.
    pub fn csv(path: impl AsRef<Path>, source: csv::Error) -> Self {
        StatError::Csv {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Add context to an error message.
    ///
    /// # Examples
    ///
    /// ```
    /// use sketchstat_core::StatError;
    ///
    /// let err = StatError::Other("bad grid".to_string());
    /// let with_context = err.with_context("while estimating skew");
    /// assert_eq!(with_context.to_string(), "bad grid (while estimating skew)");
    /// ```
    pub fn with_context(self, context: impl std::fmt::Display) -> Self {
        StatError::Context {
            context: context.to_string(),
            source: Box::new(self),
        }
    }

    /// The innermost error under any [`StatError::Context`] layers.
    pub fn root_cause(&self) -> &StatError {
        match self {
            StatError::Context { source, .. } => source.root_cause(),
            other => other,
        }
    }

    /// Whether the error reports structurally inconsistent inputs rather than
    /// an environment failure.
    pub fn is_schema_error(&self) -> bool {
        matches!(
            self.root_cause(),
            StatError::SchemaMismatch { .. }
                | StatError::RowCountMismatch { .. }
                | StatError::MissingColumn { .. }
                | StatError::MissingKey { .. }
                | StatError::WidthMismatch { .. }
                | StatError::InvalidHeader { .. }
                | StatError::DuplicateKey { .. }
        )
    }
}
