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

//! Shared test fixtures and utilities for sketchstat stages.
//!
//! # Quick Start
//!
//! ```rust
//! use sketchstat_test::{fixtures, Workspace};
//! use sketchstat_test::fixtures::builders::TableBuilder;
//!
//! let ws = Workspace::new();
//!
//! // Canned tables
//! let a = ws.write("raw/1/run.csv", &fixtures::hash_sweep([0.5, 0.25, 0.125, 0.0625]));
//!
//! // Custom tables
//! let b = ws.write(
//!     "raw/2/run.csv",
//!     &TableBuilder::new(["hash functions", "normalized error"]).series([(1, 0.5), (2, 0.3)]),
//! );
//!
//! // Reference Zipf samples
//! let sample = fixtures::reference_sample();
//! assert_eq!(sample.k(), 10);
//! # let _ = (a, b);
//! ```

/// Canonical test fixtures.
pub mod fixtures;

mod workspace;

pub use fixtures::builders::TableBuilder;
pub use workspace::Workspace;

/// Named table fixtures, see [`fixtures::all`].
pub type FixtureList = Vec<(&'static str, fn() -> TableBuilder)>;
