// Copyright 2025 the Stipple Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use kurbo::{Point, Rect};
use stipple_geometry::Transform;
use stipple_index::{DEFAULT_CELL_SIZE, HitGrid};

#[derive(Clone)]
struct Lcg(u64);

impl Lcg {
    fn next_f64(&mut self) -> f64 {
        // Numerical Recipes LCG parameters.
        self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1);
        (self.0 >> 11) as f64 / (1_u64 << 53) as f64
    }
}

fn scatter(n: usize, extent: f64, seed: u64) -> Vec<(u32, Point)> {
    let mut rng = Lcg(seed);
    (0..n as u32)
        .map(|i| (i, Point::new(rng.next_f64() * extent, rng.next_f64() * extent)))
        .collect()
}

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("hit_grid_build");
    for &n in &[1_000usize, 10_000, 100_000] {
        let dots = scatter(n, 1_000.0, 7);
        group.throughput(Throughput::Elements(n as u64));
        group.bench_function(BenchmarkId::new("full", n), |b| {
            b.iter(|| HitGrid::build(&dots, |_| 3.0, Transform::IDENTITY, DEFAULT_CELL_SIZE));
        });
        // Zoomed in 4x: most dots land off the canvas.
        let zoomed = Transform::new(4.0, -1_500.0, -1_500.0);
        let canvas = Rect::new(0.0, 0.0, 1_000.0, 1_000.0);
        group.bench_function(BenchmarkId::new("clipped", n), |b| {
            b.iter(|| HitGrid::build_within(&dots, |_| 3.0, zoomed, DEFAULT_CELL_SIZE, canvas));
        });
    }
    group.finish();
}

fn bench_query(c: &mut Criterion) {
    let mut group = c.benchmark_group("hit_grid_query");
    for &n in &[1_000usize, 100_000] {
        let dots = scatter(n, 1_000.0, 11);
        let grid = HitGrid::build(&dots, |_| 3.0, Transform::IDENTITY, DEFAULT_CELL_SIZE);
        let queries: Vec<Point> = scatter(256, 1_000.0, 13).into_iter().map(|(_, p)| p).collect();
        group.throughput(Throughput::Elements(queries.len() as u64));
        group.bench_function(BenchmarkId::new("point", n), |b| {
            b.iter(|| {
                let hits = queries.iter().filter(|&&p| grid.query(p).is_some()).count();
                black_box(hits);
            });
        });
        group.bench_function(BenchmarkId::new("visible_count", n), |b| {
            b.iter(|| black_box(grid.count_centers_in(Rect::new(250.0, 0.0, 1_000.0, 800.0))));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_build, bench_query);
criterion_main!(benches);
