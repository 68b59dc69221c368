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

//! Pivot benchmarks.
//!
//! Measures the pivot stage over growing sweeps: more keys means more rows
//! per series file, more local x values means more files per metric.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use sketchstat_pipeline::pivot_results;
use sketchstat_test::{TableBuilder, Workspace};
use std::path::PathBuf;

// ============================================================================
// Constants
// ============================================================================

const KEY_COUNTS: [usize; 3] = [10, 50, 200];
const X_COUNTS: [usize; 2] = [8, 32];
const METRICS: [&str; 3] = ["normalized error", "heavy hitter error", "false positives"];

fn sweep(ws: &Workspace, keys: usize, xs: usize) -> Vec<(String, PathBuf)> {
    (0..keys)
        .map(|k| {
            let key = format!("{:.2}", 0.3 + 0.01 * k as f64);
            let mut header = vec!["hash functions"];
            header.extend(METRICS);
            let table = (1..=xs).fold(TableBuilder::new(header), |table, x| {
                let base = 1.0 / (x as f64 + k as f64);
                table.row([
                    x.to_string(),
                    base.to_string(),
                    (base * 2.0).to_string(),
                    (base * 3.0).to_string(),
                ])
            });
            let path = ws.write(format!("averaged/skew-{}.csv", key), &table);
            (key, path)
        })
        .collect()
}

fn bench_pivot(c: &mut Criterion) {
    let mut group = c.benchmark_group("pivot");
    group.sample_size(20);

    for &xs in &X_COUNTS {
        for &keys in &KEY_COUNTS {
            let ws = Workspace::new();
            let entries = sweep(&ws, keys, xs);
            let output = ws.join("pivoted");

            group.throughput(Throughput::Elements((keys * xs * METRICS.len()) as u64));
            group.bench_with_input(
                BenchmarkId::new(format!("x{}", xs), keys),
                &entries,
                |b, entries| {
                    b.iter(|| pivot_results(black_box(entries), "skew", &output).unwrap());
                },
            );
        }
    }
    group.finish();
}

criterion_group!(benches, bench_pivot);
criterion_main!(benches);
