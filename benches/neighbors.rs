//! Benchmarks for neighbor queries and whole ticks.
//!
//! Run with: `cargo bench`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use shoal::initialize_population;
use shoal::prelude::*;
use shoal::spatial::{neighbors_brute_force, SpatialGrid};

fn lattice_positions(edge_length: i64) -> Vec<Vec3> {
    initialize_population(edge_length, 10.0, 1, Palette::Reef)
        .map(|store| store.positions())
        .unwrap_or_default()
}

fn bench_neighbor_queries(c: &mut Criterion) {
    let mut group = c.benchmark_group("neighbor_queries");

    for edge in [6i64, 10, 14] {
        let positions = lattice_positions(edge);
        let count = positions.len();

        group.bench_with_input(BenchmarkId::new("grid", count), &positions, |b, positions| {
            b.iter(|| {
                let grid = SpatialGrid::build(positions.iter().copied(), 5.0).unwrap();
                black_box(grid.neighbor_graph().total_links())
            })
        });

        // Quadratic; kept to small populations.
        if edge <= 10 {
            group.bench_with_input(
                BenchmarkId::new("brute_force", count),
                &positions,
                |b, positions| {
                    b.iter(|| {
                        let mut links = 0;
                        for i in 0..positions.len() {
                            links += neighbors_brute_force(positions, i, 5.0).len();
                        }
                        black_box(links)
                    })
                },
            );
        }
    }

    group.finish();
}

fn bench_tick(c: &mut Criterion) {
    let mut group = c.benchmark_group("tick");

    for edge in [10i64, 20] {
        let mut flock = Simulation::new()
            .with_edge_length(edge)
            .with_seed(3)
            .build()
            .unwrap();
        group.bench_function(BenchmarkId::new("agents", flock.len()), |b| {
            b.iter(|| black_box(flock.tick(1.0 / 60.0).unwrap()))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_neighbor_queries, bench_tick);
criterion_main!(benches);
