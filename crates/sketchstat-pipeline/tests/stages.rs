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

//! Stage behaviour on files in a temporary workspace.

use proptest::prelude::*;
use sketchstat_core::{compare_labels, StatError};
use sketchstat_pipeline::{
    average_group, compute_envelope, label_bounds, pivot_results, read_manifest, select_best,
    write_manifest, TrialGroup,
};
use sketchstat_test::fixtures::{self, METRIC, X_COLUMN};
use sketchstat_test::{TableBuilder, Workspace};
use std::cmp::Ordering;
use std::path::PathBuf;

fn metric() -> Vec<String> {
    vec![METRIC.to_string()]
}

// ==================== Averaging ====================

#[test]
fn test_average_of_identical_trials_is_identity() {
    let ws = Workspace::new();
    let table = fixtures::hash_sweep([0.5, 0.25, 0.125, 0.0625]);
    let group = TrialGroup::new(
        "skew-0.9.csv",
        [ws.write("raw/1.csv", &table), ws.write("raw/2.csv", &table)],
    );

    let written = average_group(&group, &ws.join("averaged"), &metric()).unwrap();

    assert_eq!(written, ws.join("averaged/skew-0.9.csv"));
    assert_eq!(ws.read("averaged/skew-0.9.csv"), table.to_csv());
}

#[test]
fn test_average_of_two_and_four_is_three() {
    let ws = Workspace::new();
    let group = TrialGroup::new(
        "g.csv",
        [
            ws.write("raw/1.csv", &fixtures::trial(&[(1, 2.0)])),
            ws.write("raw/2.csv", &fixtures::trial(&[(1, 4.0)])),
        ],
    );

    average_group(&group, &ws.join("out"), &metric()).unwrap();

    assert_eq!(ws.read("out/g.csv"), format!("{},{}\n1,3\n", X_COLUMN, METRIC));
}

#[test]
fn test_average_passes_other_columns_through() {
    let ws = Workspace::new();
    let group = TrialGroup::new(
        "g.csv",
        [
            ws.write("raw/1.csv", &fixtures::labelled_trial("count-min", [0.5, 0.25])),
            ws.write("raw/2.csv", &fixtures::labelled_trial("count-sketch", [0.25, 0.125])),
        ],
    );

    average_group(&group, &ws.join("out"), &metric()).unwrap();

    assert_eq!(
        ws.read("out/g.csv"),
        format!("{},sketch,{}\n1,count-min,0.375\n2,count-min,0.1875\n", X_COLUMN, METRIC)
    );
}

#[test]
fn test_average_keeps_padded_cells_verbatim() {
    let ws = Workspace::new();
    let group = TrialGroup::new(
        "g.csv",
        [
            ws.write_raw("raw/1.csv", "x,sketch,err\n1, cms,2\n"),
            ws.write_raw("raw/2.csv", "x,sketch,err\n1,cms ,4\n"),
        ],
    );

    average_group(&group, &ws.join("out"), &["err".to_string()]).unwrap();

    assert_eq!(ws.read("out/g.csv"), "x,sketch,err\n1, cms,3\n");
}

#[test]
fn test_average_compares_raw_header_text() {
    let ws = Workspace::new();
    let group = TrialGroup::new(
        "g.csv",
        [
            ws.write_raw("raw/1.csv", "x,err\n1,2\n"),
            ws.write_raw("raw/2.csv", "x,err \n1,4\n"),
        ],
    );

    let err = average_group(&group, &ws.join("out"), &["err".to_string()]).unwrap_err();

    assert!(matches!(err, StatError::SchemaMismatch { ref header, .. } if header[1] == "err "));
    assert!(!ws.exists("out/g.csv"));
}

#[test]
fn test_average_rejects_reordered_columns_without_writing() {
    let ws = Workspace::new();
    let group = TrialGroup::new(
        "g.csv",
        [
            ws.write("raw/1.csv", &fixtures::hash_sweep([0.5, 0.25, 0.125, 0.0625])),
            ws.write("raw/2.csv", &fixtures::reordered_columns()),
        ],
    );

    let err = average_group(&group, &ws.join("out"), &metric()).unwrap_err();

    match err {
        StatError::SchemaMismatch {
            reference, path, ..
        } => {
            assert_eq!(reference, ws.join("raw/1.csv"));
            assert_eq!(path, ws.join("raw/2.csv"));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(!ws.exists("out/g.csv"));
}

#[test]
fn test_average_of_empty_group_writes_nothing() {
    let ws = Workspace::new();
    let group = TrialGroup::new("g.csv", Vec::<PathBuf>::new());

    let err = average_group(&group, &ws.join("out"), &metric()).unwrap_err();

    assert!(matches!(err, StatError::EmptyInput(_)));
    assert!(!ws.exists("out"));
}

#[test]
fn test_average_reports_bad_cell_location() {
    let ws = Workspace::new();
    let group = TrialGroup::new(
        "g.csv",
        [
            ws.write("raw/1.csv", &fixtures::trial(&[(1, 0.5), (2, 0.25)])),
            ws.write_raw("raw/2.csv", fixtures::errors::non_numeric_metric()),
        ],
    );

    let err = average_group(&group, &ws.join("out"), &metric()).unwrap_err();

    assert!(matches!(err, StatError::InvalidNumber { line: 3, .. }));
    assert!(!ws.exists("out/g.csv"));
}

// ==================== Pivot ====================

#[test]
fn test_pivot_single_key() {
    let ws = Workspace::new();
    let path = ws.write("avg/k1.csv", &fixtures::three_point_err([0.1, 0.2, 0.3]));

    let columns = pivot_results(&[("k1".to_string(), path)], "skew", &ws.join("pivoted")).unwrap();

    assert_eq!(columns.len(), 1);
    assert_eq!(columns[0].name, "err");
    assert_eq!(
        ws.list("pivoted/err"),
        ["trace-1-x.csv", "trace-2-x.csv", "trace-3-x.csv"]
    );
    assert_eq!(ws.read("pivoted/err/trace-1-x.csv"), "skew,err\nk1,0.1\n");
    assert_eq!(ws.read("pivoted/err/trace-3-x.csv"), "skew,err\nk1,0.3\n");
    let xs: Vec<&str> = columns[0].files.iter().map(|(x, _)| x.as_str()).collect();
    assert_eq!(xs, ["1", "2", "3"]);
}

#[test]
fn test_pivot_rows_follow_entry_order() {
    let ws = Workspace::new();
    let entries = vec![
        ("1.1".to_string(), ws.write("avg/b.csv", &fixtures::two_metrics())),
        (
            "0.9".to_string(),
            ws.write(
                "avg/a.csv",
                &TableBuilder::new([X_COLUMN, "err", "heavy hitter error"])
                    .row(["2", "0.3", "9"])
                    .row(["1", "0.6", "15"]),
            ),
        ),
    ];

    let columns = pivot_results(&entries, "skew", &ws.join("pivoted")).unwrap();

    assert_eq!(columns[1].slug, "heavy-hitter-error");
    assert_eq!(
        ws.read("pivoted/heavy-hitter-error/trace-2-hash-functions.csv"),
        "skew,heavy hitter error\n1.1,7\n0.9,9\n"
    );
}

#[test]
fn test_pivot_replaces_existing_metric_directory() {
    let ws = Workspace::new();
    ws.write_raw("pivoted/err/stale.csv", "old\n");
    let path = ws.write("avg/k1.csv", &fixtures::three_point_err([0.1, 0.2, 0.3]));

    pivot_results(&[("k1".to_string(), path)], "skew", &ws.join("pivoted")).unwrap();

    assert!(!ws.exists("pivoted/err/stale.csv"));
    assert_eq!(ws.list("pivoted/err").len(), 3);
}

#[test]
fn test_pivot_rejects_missing_x_before_writing() {
    let ws = Workspace::new();
    let entries = vec![
        ("k1".to_string(), ws.write("avg/1.csv", &fixtures::three_point_err([0.1, 0.2, 0.3]))),
        (
            "k2".to_string(),
            ws.write("avg/2.csv", &TableBuilder::new(["x", "err"]).series([(1, 0.1), (3, 0.3)])),
        ),
    ];

    let err = pivot_results(&entries, "skew", &ws.join("pivoted")).unwrap_err();

    assert!(matches!(err, StatError::MissingKey { ref key, .. } if key == "2"));
    assert!(!ws.exists("pivoted"));
}

#[test]
fn test_pivot_rejects_repeated_key_before_writing() {
    let ws = Workspace::new();
    ws.write_raw("pivoted/err/keep.csv", "skew,err\n");
    let table = ws.write("avg/1.csv", &fixtures::three_point_err([0.1, 0.2, 0.3]));
    let entries = vec![
        ("0.9".to_string(), table.clone()),
        ("1.1".to_string(), table.clone()),
        ("0.9".to_string(), table),
    ];

    let err = pivot_results(&entries, "skew", &ws.join("pivoted")).unwrap_err();

    assert!(matches!(err, StatError::DuplicateKey { ref value, line: 4, .. } if value == "0.9"));
    assert_eq!(ws.list("pivoted/err"), ["keep.csv"]);
}

#[test]
fn test_pivot_of_nothing() {
    let ws = Workspace::new();
    assert!(matches!(
        pivot_results(&[], "skew", &ws.join("pivoted")).unwrap_err(),
        StatError::EmptyInput(_)
    ));
}

#[test]
fn test_manifest_round_trip() {
    let ws = Workspace::new();
    let path = ws.write("avg/k1.csv", &fixtures::two_metrics());
    let columns = pivot_results(&[("k1".to_string(), path)], "skew", &ws.join("pivoted")).unwrap();

    write_manifest(ws.join("manifest.json"), &columns).unwrap();

    assert_eq!(read_manifest(ws.join("manifest.json")).unwrap(), columns);
}

// ==================== Best ====================

#[test]
fn test_best_per_axis_key() {
    let ws = Workspace::new();
    let files = vec![
        ("1".to_string(), ws.write("series/1.csv", &fixtures::best_series("skew", "err", 5.0, 2.0))),
        ("2".to_string(), ws.write("series/2.csv", &fixtures::best_series("skew", "err", 3.0, 1.0))),
    ];

    let choices = select_best(&files, "skew", X_COLUMN, "err", &ws.join("best.csv")).unwrap();

    assert_eq!(choices[0].key, "a");
    assert_eq!((choices[0].label.as_str(), choices[0].value), ("2", 3.0));
    assert_eq!((choices[1].label.as_str(), choices[1].value), ("2", 1.0));
    assert_eq!(
        ws.read("best.csv"),
        format!("skew,{},err\na,2,3\nb,2,1\n", X_COLUMN)
    );
}

#[test]
fn test_best_without_files() {
    let ws = Workspace::new();
    let err = select_best(&[], "skew", X_COLUMN, "err", &ws.join("best.csv")).unwrap_err();
    assert!(matches!(err, StatError::EmptyInput(_)));
    assert!(!ws.exists("best.csv"));
}

// ==================== Envelope ====================

#[test]
fn test_envelope_of_best_labels() {
    let ws = Workspace::new();
    let best_at_4 = fixtures::hash_sweep([0.5, 0.25, 0.0625, 0.125]);
    let best_at_8 = fixtures::hash_sweep([0.5, 0.25, 0.125, 0.0625]);
    let trials = vec![
        ws.write("raw/1.csv", &best_at_4),
        ws.write("raw/2.csv", &best_at_8),
        ws.write("raw/3.csv", &best_at_4),
    ];

    let envelopes = compute_envelope(
        &[("0.9".to_string(), trials)],
        X_COLUMN,
        METRIC,
        "skew",
        &ws.join("bounds.csv"),
    )
    .unwrap();

    assert_eq!((envelopes[0].lower.as_str(), envelopes[0].upper.as_str()), ("4", "8"));
    assert_eq!(ws.read("bounds.csv"), "skew,lower,upper\n0.9,4,8\n");
}

#[test]
fn test_envelope_of_nothing_writes_nothing() {
    let ws = Workspace::new();
    let err = compute_envelope(&[], X_COLUMN, METRIC, "skew", &ws.join("bounds.csv")).unwrap_err();
    assert!(matches!(err, StatError::EmptyInput(_)));
    assert!(!ws.exists("bounds.csv"));

    let err = compute_envelope(
        &[("0.9".to_string(), vec![])],
        X_COLUMN,
        METRIC,
        "skew",
        &ws.join("bounds.csv"),
    )
    .unwrap_err();
    assert!(matches!(err, StatError::EmptyInput(_)));
    assert!(!ws.exists("bounds.csv"));
}

#[test]
fn test_envelope_rejects_header_only_trial() {
    let ws = Workspace::new();
    let trial = ws.write_raw("raw/1.csv", fixtures::errors::header_only());

    let err = compute_envelope(
        &[("0.9".to_string(), vec![trial])],
        X_COLUMN,
        METRIC,
        "skew",
        &ws.join("bounds.csv"),
    )
    .unwrap_err();

    assert!(matches!(err, StatError::EmptyTable { .. }));
    assert!(!ws.exists("bounds.csv"));
}

// ==================== Property Tests ====================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// Property: every averaged value lies between the trial minimum and maximum
    #[test]
    fn prop_average_within_trial_range(values in prop::collection::vec(-1e6f64..1e6, 1..6)) {
        let ws = Workspace::new();
        let paths: Vec<PathBuf> = values
            .iter()
            .enumerate()
            .map(|(i, v)| ws.write(format!("raw/{}.csv", i), &fixtures::trial(&[(1, *v)])))
            .collect();
        let group = TrialGroup::new("g.csv", paths);

        average_group(&group, &ws.join("out"), &metric()).unwrap();

        let text = ws.read("out/g.csv");
        let mean: f64 = text.lines().nth(1).unwrap().split(',').nth(1).unwrap().parse().unwrap();
        let min = values.iter().cloned().fold(f64::INFINITY, f64::min);
        let max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        prop_assert!(mean >= min - 1e-6 && mean <= max + 1e-6);
    }

    /// Property: the envelope's lower bound never exceeds its upper bound
    #[test]
    fn prop_bounds_ordered(labels in prop::collection::vec("[0-9]{1,2}[a-z]?|[a-z]{1,3}", 1..10)) {
        let (lower, upper) = label_bounds(&labels).unwrap();
        prop_assert_ne!(compare_labels(lower, upper), Ordering::Greater);
        for label in &labels {
            prop_assert_ne!(compare_labels(label, lower), Ordering::Less);
            prop_assert_ne!(compare_labels(label, upper), Ordering::Greater);
        }
    }

    /// Property: the envelope does not depend on the order of the trials
    #[test]
    fn prop_bounds_ignore_trial_order(labels in prop::collection::vec("[0-9]{1,2}[a-z]?", 1..10)) {
        let forward = label_bounds(&labels).unwrap();
        let reversed: Vec<String> = labels.iter().rev().cloned().collect();
        let backward = label_bounds(&reversed).unwrap();
        prop_assert_eq!(forward, backward);
    }
}
