//! Criterion benchmarks for the chart hot paths.
//!
//! 1. Step-hold resolve (bisection) on long series
//! 2. Unified timeline over many markets
//! 3. Alignment of many markets onto the unified timeline
//! 4. Top-N ranking at the latest cursor

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use probchart_core::synthetic::{generate, SyntheticParams};
use probchart_core::{align_series, build_unified_timeline, rank_top_series, resolve_at};
use probchart_core::CursorTime;

fn params(markets: usize, points: usize) -> SyntheticParams {
    SyntheticParams {
        markets,
        points,
        ..SyntheticParams::default()
    }
}

fn bench_resolve(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolve_at");
    for points in [1_000usize, 100_000] {
        let series = generate(&params(1, points)).remove(0);
        let first = series.samples[0].timestamp;
        let last = series.samples[points - 1].timestamp;
        group.bench_with_input(BenchmarkId::from_parameter(points), &series, |b, s| {
            let mut q = first;
            b.iter(|| {
                q = if q >= last { first } else { q + 997 };
                black_box(resolve_at(s, black_box(q)).unwrap())
            })
        });
    }
    group.finish();
}

fn bench_timeline(c: &mut Criterion) {
    let list = generate(&params(8, 10_000));
    c.bench_function("unified_timeline_8x10k", |b| {
        b.iter(|| black_box(build_unified_timeline(black_box(&list))))
    });

    let timeline = build_unified_timeline(&list);
    c.bench_function("align_8x10k", |b| {
        b.iter(|| black_box(align_series(black_box(&list), &timeline)))
    });
}

fn bench_ranking(c: &mut Criterion) {
    let list = generate(&params(20, 5_000));
    c.bench_function("rank_top_2_of_20", |b| {
        b.iter(|| black_box(rank_top_series(black_box(&list), CursorTime::Latest, 2).len()))
    });
}

criterion_group!(benches, bench_resolve, bench_timeline, bench_ranking);
criterion_main!(benches);
