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

//! Error context helpers.
//!
//! Extension methods for `Result`s that annotate errors as they propagate.
//!
//! # Examples
//!
//! ```rust
//! use sketchstat::{read_table, StatResultExt};
//!
//! fn load(path: &str, trial: usize) -> sketchstat::Result<sketchstat::MeasurementTable> {
//!     read_table(path).with_context(|| format!("trial {}", trial))
//! }
//!
//! let err = load("/nonexistent/run.csv", 3).unwrap_err();
//! assert!(err.to_string().ends_with("(trial 3)"));
//! ```
//!
//! Foreign errors pick up a path:
//!
//! ```rust
//! use sketchstat::{StatError, StatResultExt};
//!
//! let err = std::fs::read_to_string("/nonexistent/run.json")
//!     .with_path("/nonexistent/run.json")
//!     .unwrap_err();
//! assert!(matches!(err, StatError::Io { .. }));
//! ```

use crate::StatError;
use std::fmt;
use std::path::Path;

/// Extension trait turning `Result<T, E>` into `Result<T, StatError>` with
/// context attached.
///
/// - `context()`: immediate evaluation, suitable for simple strings
/// - `with_context()`: lazy evaluation, only computes context on the error path
/// - `with_path()`: attach the file an error happened on
/// - `map_err_to_stat()`: explicit conversion of the underlying error
pub trait StatResultExt<T> {
    /// The error type for this Result
    type ErrorType;

    /// Add context to an error.
    ///
    /// Layers stack: the outermost context is printed last.
    fn context<C>(self, context: C) -> Result<T, StatError>
    where
        C: fmt::Display;

    /// Add context computed only when an error occurs.
    fn with_context<C, F>(self, f: F) -> Result<T, StatError>
    where
        C: fmt::Display,
        F: FnOnce() -> C;

    /// Attach the path of the file the error happened on.
    fn with_path(self, path: impl AsRef<Path>) -> Result<T, StatError>;

    /// Convert the error with a closure.
    fn map_err_to_stat<F>(self, f: F) -> Result<T, StatError>
    where
        F: FnOnce(Self::ErrorType) -> StatError,
        Self: Sized;
}

impl<T> StatResultExt<T> for Result<T, StatError> {
    type ErrorType = StatError;

    fn context<C>(self, context: C) -> Result<T, StatError>
    where
        C: fmt::Display,
    {
        self.map_err(|e| e.with_context(context))
    }

    fn with_context<C, F>(self, f: F) -> Result<T, StatError>
    where
        C: fmt::Display,
        F: FnOnce() -> C,
    {
        self.map_err(|e| e.with_context(f()))
    }

    fn with_path(self, path: impl AsRef<Path>) -> Result<T, StatError> {
        self.map_err(|e| e.with_context(path.as_ref().display()))
    }

    fn map_err_to_stat<F>(self, f: F) -> Result<T, StatError>
    where
        F: FnOnce(StatError) -> StatError,
    {
        self.map_err(f)
    }
}

impl<T> StatResultExt<T> for Result<T, std::io::Error> {
    type ErrorType = std::io::Error;

    fn context<C>(self, context: C) -> Result<T, StatError>
    where
        C: fmt::Display,
    {
        self.map_err(|e| StatError::from(e).with_context(context))
    }

    fn with_context<C, F>(self, f: F) -> Result<T, StatError>
    where
        C: fmt::Display,
        F: FnOnce() -> C,
    {
        self.map_err(|e| StatError::from(e).with_context(f()))
    }

    fn with_path(self, path: impl AsRef<Path>) -> Result<T, StatError> {
        self.map_err(|e| StatError::io(path, e))
    }

    fn map_err_to_stat<F>(self, f: F) -> Result<T, StatError>
    where
        F: FnOnce(std::io::Error) -> StatError,
    {
        self.map_err(f)
    }
}

impl<T> StatResultExt<T> for Result<T, serde_json::Error> {
    type ErrorType = serde_json::Error;

    fn context<C>(self, context: C) -> Result<T, StatError>
    where
        C: fmt::Display,
    {
        self.map_err(|e| StatError::Json(e).with_context(context))
    }

    fn with_context<C, F>(self, f: F) -> Result<T, StatError>
    where
        C: fmt::Display,
        F: FnOnce() -> C,
    {
        self.map_err(|e| StatError::Json(e).with_context(f()))
    }

    fn with_path(self, path: impl AsRef<Path>) -> Result<T, StatError> {
        self.map_err(|e| StatError::Json(e).with_context(path.as_ref().display()))
    }

    fn map_err_to_stat<F>(self, f: F) -> Result<T, StatError>
    where
        F: FnOnce(serde_json::Error) -> StatError,
    {
        self.map_err(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::path::PathBuf;

    fn missing_column() -> Result<(), StatError> {
        Err(StatError::MissingColumn {
            column: "err".to_string(),
            path: PathBuf::from("a.csv"),
        })
    }

    // ==================== context() tests ====================

    #[test]
    fn test_context_on_error() {
        let err = missing_column().context("averaging group g").unwrap_err();
        assert_eq!(err.to_string(), "Missing column 'err' in a.csv (averaging group g)");
        assert!(matches!(err.root_cause(), StatError::MissingColumn { .. }));
    }

    #[test]
    fn test_context_on_ok() {
        let result: Result<i32, StatError> = Ok(42);
        assert_eq!(result.context("never used").unwrap(), 42);
    }

    #[test]
    fn test_context_chaining() {
        let err = missing_column()
            .context("in group g")
            .context("while averaging")
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Missing column 'err' in a.csv (in group g) (while averaging)"
        );
    }

    // ==================== with_context() tests ====================

    #[test]
    fn test_with_context_is_lazy() {
        let mut called = false;
        let result: Result<(), StatError> = Ok(());
        result
            .with_context(|| {
                called = true;
                "unused"
            })
            .unwrap();
        assert!(!called);
    }

    // ==================== foreign errors ====================

    #[test]
    fn test_io_with_path() {
        let result: Result<(), io::Error> = Err(io::Error::new(io::ErrorKind::NotFound, "gone"));
        match result.with_path("raw/1.csv").unwrap_err() {
            StatError::Io { path, .. } => assert_eq!(path, PathBuf::from("raw/1.csv")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_io_context() {
        let result: Result<(), io::Error> = Err(io::Error::new(io::ErrorKind::Other, "disk"));
        let err = result.context("writing best file").unwrap_err();
        assert!(err.to_string().ends_with("(writing best file)"));
        assert!(matches!(err.root_cause(), StatError::Io { .. }));
    }

    #[test]
    fn test_json_with_path() {
        let result: Result<serde_json::Value, _> = serde_json::from_str("{");
        let err = result.with_path("run.json").unwrap_err();
        assert!(matches!(err.root_cause(), StatError::Json(_)));
        assert!(err.to_string().ends_with("(run.json)"));
    }

    #[test]
    fn test_map_err_to_stat() {
        let result: Result<(), io::Error> = Err(io::Error::new(io::ErrorKind::Other, "x"));
        let err = result
            .map_err_to_stat(|e| StatError::Other(format!("custom: {}", e)))
            .unwrap_err();
        assert_eq!(err.to_string(), "custom: x");
    }
}
