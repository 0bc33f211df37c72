//! Bulk Fetch Benchmarks
//!
//! Point lookups against wildcard and area queries on a cached sheet.
//!
//! Run with: `cargo bench --bench bulk_fetch`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use std::time::Duration;

use deeplink_cache::path::{column_letters, DocumentKind};
use deeplink_cache::{ResourceCache, ValueBatch};

/// Cache one sheet of `rows` x `cols` text cells
fn cached_sheet(rows: u32, cols: u32) -> ResourceCache {
    let cache = ResourceCache::default();
    let mut batch = ValueBatch::new("/Bench/tables/Sheet1/");
    for row in 1..=rows {
        for col in 0..cols {
            let reference = format!("{}{}", column_letters(col), row);
            batch = batch.text(&reference, &reference);
        }
    }
    cache
        .insert_values("Bench", None, &batch, DocumentKind::Xlsx)
        .unwrap();
    cache
}

fn bench_point_lookup(c: &mut Criterion) {
    let cache = cached_sheet(1000, 26);

    let mut group = c.benchmark_group("point_lookup");
    group.measurement_time(Duration::from_secs(5));

    group.bench_function("single_cell", |b| {
        b.iter(|| {
            let uri = black_box("/Bench/tables/Sheet1/M500");
            let list = cache.fetch_values(uri, DocumentKind::Xlsx);
            black_box(list)
        })
    });

    group.finish();
}

fn bench_bulk_queries(c: &mut Criterion) {
    let cache = cached_sheet(1000, 26);

    let mut group = c.benchmark_group("bulk_queries");
    group.measurement_time(Duration::from_secs(10));
    group.sample_size(50);

    for query in ["D*", "*500", "B20:H120", "*"] {
        let uri = format!("/Bench/tables/Sheet1/{}", query);
        group.bench_with_input(BenchmarkId::from_parameter(query), &uri, |b, uri| {
            b.iter(|| {
                let list = cache.fetch_values(black_box(uri), DocumentKind::Xlsx);
                black_box(list)
            })
        });
    }

    group.finish();
}

fn bench_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("insert");
    group.sample_size(20);

    for rows in [100u32, 1000] {
        group.bench_with_input(BenchmarkId::new("sheet_rows", rows), &rows, |b, &rows| {
            b.iter(|| black_box(cached_sheet(rows, 26)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_point_lookup, bench_bulk_queries, bench_insert);
criterion_main!(benches);
