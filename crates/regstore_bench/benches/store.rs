//! Record store operation benchmarks.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use regstore_bench::{bench_store, populated_store, random_drafts, sorted_drafts};
use regstore_core::RecordDraft;

/// Benchmark submitting batches of records.
fn bench_submit(c: &mut Criterion) {
    let mut group = c.benchmark_group("submit");

    for count in [100, 1_000, 10_000].iter() {
        group.throughput(Throughput::Elements(*count as u64));

        let random = random_drafts(*count);
        group.bench_with_input(BenchmarkId::new("random_names", count), &random, |b, drafts| {
            b.iter(|| {
                let mut store = bench_store();
                for draft in drafts {
                    store.submit(black_box(draft.clone())).unwrap();
                }
                black_box(store.len());
            });
        });

        let sorted = sorted_drafts(*count);
        group.bench_with_input(BenchmarkId::new("sorted_names", count), &sorted, |b, drafts| {
            b.iter(|| {
                let mut store = bench_store();
                for draft in drafts {
                    store.submit(black_box(draft.clone())).unwrap();
                }
                black_box(store.len());
            });
        });
    }
    group.finish();
}

/// Benchmark a rename followed by undo, which rekeys the name index twice.
fn bench_edit_undo(c: &mut Criterion) {
    let mut group = c.benchmark_group("edit_undo");

    for count in [1_000, 10_000].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(count), count, |b, &count| {
            let (mut store, ids) = populated_store(&random_drafts(count));
            let rename = RecordDraft::new("Zz Renamed", "Jl. Baru 9", "SBY");
            let mut i = 0usize;

            b.iter(|| {
                let id = &ids[i % ids.len()];
                store.edit(id, black_box(rename.clone())).unwrap();
                store.undo(id).unwrap();
                i += 1;
            });
        });
    }
    group.finish();
}

/// Benchmark id lookups.
fn bench_get(c: &mut Criterion) {
    let mut group = c.benchmark_group("get");

    for count in [1_000, 10_000].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(count), count, |b, &count| {
            let (store, ids) = populated_store(&random_drafts(count));
            let mut i = 0usize;

            b.iter(|| {
                let record = store.get(black_box(&ids[i % ids.len()]));
                black_box(record);
                i += 1;
            });
        });
    }
    group.finish();
}

/// Benchmark the four listing orders.
fn bench_listings(c: &mut Criterion) {
    let mut group = c.benchmark_group("list");
    let count = 10_000;
    let (store, _) = populated_store(&random_drafts(count));
    group.throughput(Throughput::Elements(count as u64));

    group.bench_function("insertion", |b| {
        b.iter(|| black_box(store.list_by_insertion_order().count()));
    });
    group.bench_function("name", |b| {
        b.iter(|| black_box(store.list_by_name().count()));
    });
    group.bench_function("region", |b| {
        b.iter(|| black_box(store.list_by_region().len()));
    });
    group.bench_function("submission_time", |b| {
        b.iter(|| black_box(store.list_by_submission_time().len()));
    });
    group.finish();
}

/// Benchmark statistics and search over a populated store.
fn bench_queries(c: &mut Criterion) {
    let mut group = c.benchmark_group("queries");
    let (store, _) = populated_store(&random_drafts(10_000));

    group.bench_function("stats", |b| {
        b.iter(|| black_box(store.stats()));
    });
    group.bench_function("search", |b| {
        b.iter(|| black_box(store.search(black_box("applicant 0001")).len()));
    });
    group.bench_function("check_coherence", |b| {
        b.iter(|| store.check_coherence().unwrap());
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_submit,
    bench_edit_undo,
    bench_get,
    bench_listings,
    bench_queries
);
criterion_main!(benches);
