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

//! Label ordering and file-name helpers.
//!
//! Labels are the text form of sweep values (skews, hash-function counts,
//! memory budgets). Comparing them as strings puts `"16"` before `"4"`, so
//! numeric labels are compared by value and sort ahead of every non-numeric
//! label, which compare byte-wise among themselves.

use std::cmp::Ordering;

/// Compare two labels: numeric labels first, by value, then the rest by text.
///
/// Numerically equal labels with different spellings (`"4"` and `"4.0"`)
/// are ordered by their text. The result is a total order, so it is safe for
/// sorting and for min/max folds over mixed label sets.
///
/// # Examples
///
/// ```
/// use sketchstat_core::compare_labels;
/// use std::cmp::Ordering;
///
/// assert_eq!(compare_labels("4", "16"), Ordering::Less);
/// assert_eq!(compare_labels("0.9", "1.1"), Ordering::Less);
/// assert_eq!(compare_labels("flat", "count-min"), Ordering::Greater);
/// assert_eq!(compare_labels("10", "1a"), Ordering::Less);
/// assert_eq!(compare_labels("1a", "2"), Ordering::Greater);
/// ```
pub fn compare_labels(a: &str, b: &str) -> Ordering {
    match (parse_label(a), parse_label(b)) {
        (Some(x), Some(y)) => x
            .partial_cmp(&y)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.cmp(b)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.cmp(b),
    }
}

fn parse_label(label: &str) -> Option<f64> {
    label.trim().parse::<f64>().ok().filter(|v| !v.is_nan())
}

/// Sort `(key, value)` entries by key with [`compare_labels`].
///
/// The sort is stable, so entries with identical keys keep their order.
///
/// # Examples
///
/// ```
/// use sketchstat_core::order_numerically;
///
/// let mut entries = vec![
///     ("1.1".to_string(), "c.csv"),
///     ("0.6".to_string(), "a.csv"),
///     ("0.9".to_string(), "b.csv"),
/// ];
/// order_numerically(&mut entries);
/// let keys: Vec<_> = entries.iter().map(|(k, _)| k.as_str()).collect();
/// assert_eq!(keys, ["0.6", "0.9", "1.1"]);
/// ```
pub fn order_numerically<T>(entries: &mut [(String, T)]) {
    entries.sort_by(|(a, _), (b, _)| compare_labels(a, b));
}

/// File-system safe form of a column name: spaces become dashes.
///
/// # Examples
///
/// ```
/// assert_eq!(sketchstat_core::slug("heavy hitter error"), "heavy-hitter-error");
/// ```
pub fn slug(name: &str) -> String {
    name.replace(' ', "-")
}
