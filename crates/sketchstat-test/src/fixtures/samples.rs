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

//! Top-k samples drawn from known Zipf laws.

use sketchstat_skew::{zipf_expected_counts, TopKSample};

/// Domain size of the reference samples.
pub const REFERENCE_DOMAIN: u64 = 1 << 18;

/// Observation count of the reference samples.
pub const REFERENCE_TOTAL: u64 = 1_000_000_000;

/// Top-10 counts from Zipf(0.8) over [`REFERENCE_DOMAIN`] items with up to
/// 0.1% multiplicative noise per rank.
pub const NOISY_COUNTS_SKEW_0_8: [u64; 10] = [
    17_549_828, 10_068_646, 7_292_554, 5_785_812, 4_835_542, 4_186_799, 3_699_199, 3_322_079,
    3_027_581, 2_777_846,
];

/// Noiseless top-`k` sample of Zipf(`skew`) over the reference domain.
pub fn noiseless_zipf(k: usize, skew: f64) -> TopKSample {
    let counts = zipf_expected_counts(k, REFERENCE_DOMAIN, skew, REFERENCE_TOTAL);
    TopKSample::new(counts, REFERENCE_TOTAL).expect("reference sample is non-empty")
}

/// The reference case: top 10 of Zipf(0.8).
pub fn reference_sample() -> TopKSample {
    noiseless_zipf(10, 0.8)
}

/// [`NOISY_COUNTS_SKEW_0_8`] as a sample.
pub fn noisy_sample() -> TopKSample {
    TopKSample::new(NOISY_COUNTS_SKEW_0_8.to_vec(), REFERENCE_TOTAL)
        .expect("reference sample is non-empty")
}
