//! Benchmarks for the pane layout engine.
//!
//! Run with: cargo bench -p peaky-layout

use criterion::{BatchSize, BenchmarkId, Criterion, criterion_group, criterion_main};
use peaky_layout::{
    Axis, Constraints, Engine, EngineConfig, GridSpec, LayoutSpec, Op, ResizeEdge, SnapState,
    SplitDirective, Tree, build_tree, shared_edges,
};
use std::hint::black_box;

fn bench_config() -> EngineConfig {
    EngineConfig {
        constraints: Constraints::new(1, 1),
        ..EngineConfig::default()
    }
}

fn pane_ids(count: u32) -> Vec<String> {
    (0..count).map(|i| format!("p{i}")).collect()
}

fn grid_tree(rows: u32, columns: u32) -> Tree {
    build_tree(
        &LayoutSpec::Grid(GridSpec::new(rows, columns)),
        &pane_ids(rows * columns),
    )
    .expect("bench grid should build")
}

/// A chain of `depth` horizontal splits, each new pane taking 90% of the
/// newest one.
fn deep_tree(depth: u32) -> Tree {
    let directives = (0..=depth)
        .map(|_| SplitDirective::new(Axis::Horizontal, 90))
        .collect();
    build_tree(&LayoutSpec::Splits(directives), &pane_ids(depth + 1))
        .expect("bench chain should build")
}

fn bench_resize(c: &mut Criterion) {
    let mut group = c.benchmark_group("layout/resize");
    let config = bench_config();

    for (name, tree, pane) in [
        ("grid_3x4", grid_tree(3, 4), "p5"),
        ("deep_10", deep_tree(10), "p0"),
    ] {
        let engine = Engine::with_config(tree, &config);
        group.bench_with_input(BenchmarkId::new("plain", name), &engine, |b, engine| {
            b.iter_batched(
                || engine.clone(),
                |mut engine| {
                    let result = engine
                        .apply(Op::resize(pane, ResizeEdge::Right, black_box(7)))
                        .expect("resize should succeed");
                    black_box(result.changed);
                },
                BatchSize::SmallInput,
            );
        });
        group.bench_with_input(BenchmarkId::new("snapped", name), &engine, |b, engine| {
            b.iter_batched(
                || engine.clone(),
                |mut engine| {
                    let result = engine
                        .apply(Op::resize_snapped(
                            pane,
                            ResizeEdge::Right,
                            black_box(-9),
                            SnapState::default(),
                        ))
                        .expect("snapped resize should succeed");
                    black_box(result.snap_state);
                },
                BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

fn bench_structure_ops(c: &mut Criterion) {
    let mut group = c.benchmark_group("layout/structure");
    let engine = Engine::with_config(grid_tree(3, 4), &bench_config());

    group.bench_function("split_close", |b| {
        b.iter_batched(
            || engine.clone(),
            |mut engine| {
                engine
                    .apply(Op::split("p6", "extra", Axis::Vertical, 40))
                    .expect("split should succeed");
                engine.apply(Op::close("extra")).expect("close should succeed");
                black_box(engine.history().undo_depth());
            },
            BatchSize::SmallInput,
        );
    });

    group.bench_function("reset_all", |b| {
        b.iter_batched(
            || {
                let mut engine = engine.clone();
                engine
                    .apply(Op::resize("p0", ResizeEdge::Right, 120))
                    .expect("resize should succeed");
                engine
            },
            |mut engine| {
                let result = engine.apply(Op::reset_all()).expect("reset should succeed");
                black_box(result.affected.len());
            },
            BatchSize::SmallInput,
        );
    });

    group.finish();
}

fn bench_queries(c: &mut Criterion) {
    let mut group = c.benchmark_group("layout/query");

    for (rows, columns) in [(2u32, 2u32), (3, 4), (6, 6)] {
        let tree = grid_tree(rows, columns);
        let case = format!("{rows}x{columns}");
        group.bench_with_input(BenchmarkId::new("rects", &case), &tree, |b, tree| {
            b.iter(|| black_box(tree.rects()))
        });
        group.bench_with_input(BenchmarkId::new("shared_edges", &case), &tree, |b, tree| {
            b.iter(|| black_box(shared_edges(&tree.rects())))
        });
        group.bench_with_input(BenchmarkId::new("state_hash", &case), &tree, |b, tree| {
            b.iter(|| black_box(tree.state_hash()))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_resize, bench_structure_ops, bench_queries);

criterion_main!(benches);
