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

//! Malformed CSV inputs for error-path tests.

/// Returns `(name, csv)` pairs that every table reader must reject.
pub fn invalid_tables() -> Vec<(&'static str, &'static str)> {
    vec![
        ("short_row", "x,err\n1,0.5\n2\n"),
        ("long_row", "x,err\n1,0.5,9\n"),
        ("duplicate_x", "x,err\n1,0.5\n1,0.25\n"),
        ("duplicate_column", "x,err,err\n1,0.5,0.5\n"),
        ("empty_column_name", "x,,err\n1,0.5,0.5\n"),
        ("empty_file", ""),
    ]
}

/// A table whose metric column holds a non-number.
pub fn non_numeric_metric() -> &'static str {
    "hash functions,normalized error\n1,0.5\n2,n/a\n"
}

/// A table with a header and no rows.
pub fn header_only() -> &'static str {
    "hash functions,normalized error\n"
}
