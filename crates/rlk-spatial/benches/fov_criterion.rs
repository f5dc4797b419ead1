//! Field-of-view benchmarks: radius scaling over open and cluttered maps.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use rlk_spatial::{FieldOfView, Grid, VisibilityMap};

/// A map with a pillar on every fourth tile in both directions.
fn pillared(size: u32) -> Grid<bool> {
    let mut grid = Grid::new(size, size);
    for y in (0..size as i32).step_by(4) {
        for x in (0..size as i32).step_by(4) {
            grid.set(x, y, true);
        }
    }
    grid
}

fn radius_benchmarks(c: &mut Criterion) {
    let mut group = c.benchmark_group("fov_radius");
    let open: Grid<bool> = Grid::new(256, 256);
    let cluttered = pillared(256);
    let origin = (129, 130);

    for radius in [4u32, 8, 16, 32, 64] {
        let side = u64::from(2 * radius + 1);
        group.throughput(Throughput::Elements(side * side));

        group.bench_with_input(BenchmarkId::new("open", radius), &radius, |b, &radius| {
            let mut fov = FieldOfView::new();
            b.iter(|| {
                let count = fov.compute(
                    origin,
                    radius,
                    |(x, y)| open.get(x, y).copied().unwrap_or(true),
                    |p| {
                        black_box(p);
                    },
                );
                black_box(count)
            });
        });

        group.bench_with_input(BenchmarkId::new("pillars", radius), &radius, |b, &radius| {
            let mut fov = FieldOfView::new();
            b.iter(|| {
                let count = fov.compute(
                    origin,
                    radius,
                    |(x, y)| cluttered.get(x, y).copied().unwrap_or(true),
                    |p| {
                        black_box(p);
                    },
                );
                black_box(count)
            });
        });
    }

    group.finish();
}

fn reveal_benchmarks(c: &mut Criterion) {
    let grid = pillared(128);
    let mut visibility = VisibilityMap::new(128, 128);
    let mut fov = FieldOfView::new();

    c.bench_function("fov_reveal_map", |b| {
        b.iter(|| {
            visibility.clear_visible();
            fov.compute(
                (64, 65),
                12,
                |(x, y)| grid.get(x, y).copied().unwrap_or(true),
                |(x, y)| {
                    visibility.reveal(x, y);
                },
            );
            black_box(visibility.visible_count())
        });
    });
}

criterion_group!(benches, radius_benchmarks, reveal_benchmarks);
criterion_main!(benches);
