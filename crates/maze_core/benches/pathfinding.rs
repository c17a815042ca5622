//! Pathfinding benchmarks for maze_core.
//!
//! Run with: `cargo bench -p maze_core`

// Benchmark binaries don't need docs on macro-generated functions
#![allow(missing_docs)]

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use maze_core::movement::run;
use maze_core::pathfinding::find_route;
use maze_test_utils::fixtures;

/// Runs BFS and execution benchmarks on open and serpentine grids.
pub fn pathfinding_benchmark(c: &mut Criterion) {
    let open = fixtures::open_grid(128, 128);
    c.bench_function("bfs_open_128", |b| {
        b.iter(|| find_route(black_box(&open)))
    });

    let serpentine = fixtures::serpentine_grid(64, 64);
    c.bench_function("bfs_serpentine_64", |b| {
        b.iter(|| find_route(black_box(&serpentine)))
    });

    if let Ok(Some(path)) = find_route(&serpentine) {
        c.bench_function("run_serpentine_64", |b| {
            b.iter(|| {
                let mut position = serpentine.start();
                run(black_box(&serpentine), &mut position, &path)
            })
        });
    }
}

criterion_group!(benches, pathfinding_benchmark);
criterion_main!(benches);
