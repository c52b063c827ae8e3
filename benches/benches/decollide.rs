// Copyright 2025 the Stipple Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use kurbo::Point;
use stipple_decollide::{LayoutRun, RelaxationConfig};

/// A dense square lattice where every dot overlaps its neighbors.
fn crowded(side: u32, spacing: f64) -> Vec<(u32, Point)> {
    (0..side * side)
        .map(|i| {
            let (col, row) = (i % side, i / side);
            (i, Point::new(f64::from(col) * spacing, f64::from(row) * spacing))
        })
        .collect()
}

fn bench_full_run(c: &mut Criterion) {
    let mut group = c.benchmark_group("relax_to_completion");
    group.sample_size(20);
    for &side in &[16u32, 32, 64] {
        let dots = crowded(side, 4.0);
        group.bench_function(BenchmarkId::from_parameter(side * side), |b| {
            b.iter_batched(
                || LayoutRun::new(&dots, |_| 3.0, RelaxationConfig::default()),
                |run| black_box(run.settle()),
                BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

fn bench_single_iteration(c: &mut Criterion) {
    let mut group = c.benchmark_group("relax_iteration");
    for &side in &[32u32, 100] {
        let dots = crowded(side, 4.0);
        group.bench_function(BenchmarkId::from_parameter(side * side), |b| {
            b.iter_batched(
                || LayoutRun::new(&dots, |_| 3.0, RelaxationConfig::default()),
                |mut run| black_box(run.next()),
                BatchSize::LargeInput,
            );
        });
    }
    group.finish();
}

criterion_group!(benches, bench_full_run, bench_single_iteration);
criterion_main!(benches);
