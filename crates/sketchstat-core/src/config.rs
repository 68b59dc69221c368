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

//! Reader configuration and resource limits.

/// Default maximum number of data rows read from one table.
///
/// Measurement tables hold one row per configuration value, so real inputs
/// are tiny; the limit only bounds memory when a stage is pointed at the
/// wrong file (a raw trace, say).
///
/// # Examples
///
/// ```
/// # use sketchstat_core::ReadConfig;
/// let config = ReadConfig::default();
/// assert_eq!(config.max_rows, 1_000_000);
/// ```
pub const DEFAULT_MAX_ROWS: usize = 1_000_000;

/// Default maximum number of columns in one table.
pub const DEFAULT_MAX_COLUMNS: usize = 1_024;

/// Configuration for reading measurement tables.
///
/// # Examples
///
/// ```
/// # use sketchstat_core::ReadConfig;
/// let config = ReadConfig {
///     delimiter: b'\t',
///     ..Default::default()
/// };
/// assert!(!config.trim);
/// ```
#[derive(Debug, Clone)]
pub struct ReadConfig {
    /// Field delimiter character (default: `,`).
    pub delimiter: u8,

    /// Whether to trim leading/trailing whitespace from header and data
    /// cells (default: `false`, cells are kept verbatim).
    pub trim: bool,

    /// Maximum number of data rows (default: [`DEFAULT_MAX_ROWS`]).
    pub max_rows: usize,

    /// Maximum number of columns (default: [`DEFAULT_MAX_COLUMNS`]).
    pub max_columns: usize,
}

impl Default for ReadConfig {
    fn default() -> Self {
        Self {
            delimiter: b',',
            trim: false,
            max_rows: DEFAULT_MAX_ROWS,
            max_columns: DEFAULT_MAX_COLUMNS,
        }
    }
}

impl ReadConfig {
    /// Configuration with no size restrictions (for testing).
    pub fn unlimited() -> Self {
        Self {
            max_rows: usize::MAX,
            max_columns: usize::MAX,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_delimiter_is_comma() {
        assert_eq!(ReadConfig::default().delimiter, b',');
    }

    #[test]
    fn test_default_limits() {
        let config = ReadConfig::default();
        assert_eq!(config.max_rows, DEFAULT_MAX_ROWS);
        assert_eq!(config.max_columns, DEFAULT_MAX_COLUMNS);
    }

    #[test]
    fn test_unlimited_keeps_format_options() {
        let config = ReadConfig::unlimited();
        assert_eq!(config.max_rows, usize::MAX);
        assert_eq!(config.max_columns, usize::MAX);
        assert_eq!(config.delimiter, b',');
        assert!(!config.trim);
    }
}
