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

//! Canned measurement tables.
//!
//! Column names follow the measurement process: the local x is a
//! hash-function count and metrics are error measures.

use super::builders::TableBuilder;

/// Local x column of the canned trial tables.
pub const X_COLUMN: &str = "hash functions";

/// Metric column of the canned trial tables.
pub const METRIC: &str = "normalized error";

/// A single-metric trial: one row per `(hash functions, error)` point.
pub fn trial(points: &[(u32, f64)]) -> TableBuilder {
    TableBuilder::new([X_COLUMN, METRIC]).series(points.iter().copied())
}

/// A trial over hash-function counts 1, 2, 4 and 8.
pub fn hash_sweep(errors: [f64; 4]) -> TableBuilder {
    trial(&[(1, errors[0]), (2, errors[1]), (4, errors[2]), (8, errors[3])])
}

/// A trial with a pass-through label column between x and the metric.
pub fn labelled_trial(label: &str, errors: [f64; 2]) -> TableBuilder {
    TableBuilder::new([X_COLUMN, "sketch", METRIC])
        .row(["1".to_string(), label.to_string(), errors[0].to_string()])
        .row(["2".to_string(), label.to_string(), errors[1].to_string()])
}

/// [`hash_sweep`] with the two columns swapped.
pub fn reordered_columns() -> TableBuilder {
    TableBuilder::new([METRIC, X_COLUMN])
        .row(["0.5", "1"])
        .row(["0.25", "2"])
        .row(["0.125", "4"])
        .row(["0.0625", "8"])
}

/// Local x values 1, 2 and 3 with a single `err` metric.
pub fn three_point_err(values: [f64; 3]) -> TableBuilder {
    TableBuilder::new(["x", "err"]).series([(1, values[0]), (2, values[1]), (3, values[2])])
}

/// Two metrics, one of which has a space in its name.
pub fn two_metrics() -> TableBuilder {
    TableBuilder::new([X_COLUMN, "err", "heavy hitter error"])
        .row(["1", "0.4", "12"])
        .row(["2", "0.2", "7"])
}

/// Pivoted series `axis -> value` over axis keys `a` and `b`.
pub fn best_series(axis: &str, metric: &str, a: f64, b: f64) -> TableBuilder {
    TableBuilder::new([axis, metric]).series([("a", a), ("b", b)])
}
