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

//! Facade-level workflows.

use proptest::prelude::*;
use sketchstat::pipeline::PipelineConfig;
use sketchstat::prelude::*;
use sketchstat::{estimate_skew_from_counts, run_pipeline, skew};
use sketchstat_test::fixtures::{self, METRIC, X_COLUMN};
use sketchstat_test::Workspace;
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

#[test]
fn test_noisy_reference_sample() {
    init_tracing();
    let sample = fixtures::noisy_sample();
    let estimates = skew::estimate_grid(&sample, &SkewGrid::default());
    let best = skew::best_candidate(&estimates).unwrap();
    assert!((best.skew - 0.8).abs() < 1e-9);
}

#[test]
fn test_run_pipeline_from_json() {
    init_tracing();
    let ws = Workspace::new();
    for trial in 1..=2 {
        ws.write(
            format!("raw/{}/skew-0.9.csv", trial),
            &fixtures::hash_sweep([0.5, 0.25, 0.125, 0.0625 * trial as f64]),
        );
    }
    let config = format!(
        r#"{{
            "average": {{
                "groups": [{{ "name": "skew-0.9.csv", "paths": ["{raw1}", "{raw2}"] }}],
                "columns": ["{metric}"],
                "output_dir": "{averaged}"
            }},
            "pivot": {{
                "entries": [{{ "key": "0.9", "path": "{averaged}/skew-0.9.csv" }}],
                "axis_label": "skew",
                "output_dir": "{pivoted}"
            }},
            "best": {{ "discriminant": "{x}", "output_dir": "{best}" }}
        }}"#,
        raw1 = ws.join("raw/1/skew-0.9.csv").display(),
        raw2 = ws.join("raw/2/skew-0.9.csv").display(),
        metric = METRIC,
        x = X_COLUMN,
        averaged = ws.join("averaged").display(),
        pivoted = ws.join("pivoted").display(),
        best = ws.join("best").display(),
    );
    let path = ws.write_raw("run.json", &config);

    let report = run_pipeline(&path).unwrap();

    assert_eq!(report.averaged.len(), 1);
    assert_eq!(
        ws.read("averaged/skew-0.9.csv"),
        format!("{},{}\n1,0.5\n2,0.25\n4,0.125\n8,0.09375\n", X_COLUMN, METRIC)
    );
    assert_eq!(
        ws.read("best/best-normalized-error.csv"),
        format!("skew,{},{}\n0.9,8,0.09375\n", X_COLUMN, METRIC)
    );
}

#[test]
fn test_pipeline_error_names_config() {
    let ws = Workspace::new();
    let path = ws.write_raw(
        "run.json",
        &format!(
            r#"{{ "envelope": [{{ "entries": [], "x_column": "x", "metric": "err", "axis_label": "skew", "output": "{}" }}] }}"#,
            ws.join("bounds.csv").display()
        ),
    );

    let err = run_pipeline(&path).unwrap_err();

    assert!(matches!(err.root_cause(), StatError::EmptyInput(_)));
    assert!(err.to_string().contains("run.json"));
    assert!(!ws.exists("bounds.csv"));
}

#[test]
fn test_config_round_trip_through_prelude() {
    let config = PipelineConfig::default();
    let json = serde_json::to_string(&config).unwrap();
    assert_eq!(PipelineConfig::from_json_str(&json).unwrap(), config);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    /// Property: the estimate does not depend on the order counts are given in
    #[test]
    fn prop_estimate_ignores_count_order(seed in any::<u64>()) {
        let mut counts = fixtures::NOISY_COUNTS_SKEW_0_8.to_vec();
        let len = counts.len();
        counts.rotate_left((seed % len as u64) as usize);
        if seed % 2 == 0 {
            counts.reverse();
        }
        let best = estimate_skew_from_counts(counts, fixtures::REFERENCE_TOTAL).unwrap();
        prop_assert!((best.skew - 0.8).abs() < 1e-9);
    }
}
