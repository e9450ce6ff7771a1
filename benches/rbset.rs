use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};
use rbset::{compare::Natural, RbSet};
use std::collections::BTreeSet;

fn shuffled(count: u64) -> Vec<u64> {
    let mut vec: Vec<u64> = (0..count).collect();
    vec.shuffle(&mut StdRng::seed_from_u64(0xbe7c));
    vec
}

fn insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("insert");
    for &count in &[1_000u64, 100_000] {
        let vec = shuffled(count);
        group.bench_with_input(BenchmarkId::new("rbset", count), &vec, |b, vec| {
            b.iter(|| {
                let mut set = RbSet::new(Natural);
                for elem in vec {
                    let _ = set.add(*elem);
                }
                black_box(set)
            })
        });
        group.bench_with_input(BenchmarkId::new("btreeset", count), &vec, |b, vec| {
            b.iter(|| {
                let mut set = BTreeSet::new();
                for elem in vec {
                    set.insert(*elem);
                }
                black_box(set)
            })
        });
    }
    group.finish();
}

fn insert_remove(c: &mut Criterion) {
    let mut group = c.benchmark_group("insert_remove");
    let count = 10_000;
    let vec = shuffled(count);
    let mut removals = vec.clone();
    removals.shuffle(&mut StdRng::seed_from_u64(0x4e40));

    group.bench_function(BenchmarkId::new("rbset", count), |b| {
        b.iter(|| {
            let mut set = RbSet::new(Natural);
            for elem in &vec {
                let _ = set.add(*elem);
            }
            for elem in &removals {
                let _ = black_box(set.remove(elem));
            }
            set
        })
    });
    group.bench_function(BenchmarkId::new("btreeset", count), |b| {
        b.iter(|| {
            let mut set = BTreeSet::new();
            for elem in &vec {
                set.insert(*elem);
            }
            for elem in &removals {
                black_box(set.remove(elem));
            }
            set
        })
    });
    group.finish();
}

fn drain_first(c: &mut Criterion) {
    let mut group = c.benchmark_group("drain_first");
    let count = 10_000;
    let vec = shuffled(count);

    group.bench_function(BenchmarkId::new("rbset", count), |b| {
        b.iter(|| {
            let mut set = RbSet::new(Natural);
            for elem in &vec {
                let _ = set.add(*elem);
            }
            while let Ok(first) = set.remove_first() {
                black_box(first);
            }
        })
    });
    group.bench_function(BenchmarkId::new("btreeset", count), |b| {
        b.iter(|| {
            let mut set = BTreeSet::new();
            for elem in &vec {
                set.insert(*elem);
            }
            while let Some(&first) = set.iter().next() {
                black_box(set.remove(&first));
            }
        })
    });
    group.finish();

    rbset::stats::flush_thread_stats();
    rbset::stats::print_stats();
}

criterion_group!(benches, insert, insert_remove, drain_first);
criterion_main!(benches);
