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

//! Canonical fixtures for sketchstat tests.
//!
//! - **builders**: [`TableBuilder`](builders::TableBuilder) for custom tables
//! - **tables**: canned trial and series tables
//! - **samples**: top-k samples from known Zipf laws
//! - **errors**: malformed inputs

pub mod builders;
pub mod errors;
mod samples;
mod tables;

pub use samples::*;
pub use tables::*;

use crate::FixtureList;
use builders::TableBuilder;

/// Returns all table fixtures for iteration.
///
/// Useful for running the same test across every well-formed table.
pub fn all() -> FixtureList {
    let fixtures: [(&'static str, fn() -> TableBuilder); 6] = [
        ("hash_sweep", || hash_sweep([0.5, 0.25, 0.125, 0.0625])),
        ("labelled_trial", || labelled_trial("count-min", [0.5, 0.25])),
        ("reordered_columns", reordered_columns),
        ("three_point_err", || three_point_err([0.1, 0.2, 0.3])),
        ("two_metrics", two_metrics),
        ("best_series", || best_series("hash functions", "err", 5.0, 2.0)),
    ];
    Vec::from(fixtures)
}
