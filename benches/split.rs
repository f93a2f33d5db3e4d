//! Benchmarks for edge loading and splitting.

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use std::path::Path;

use onto_dataset::interactions::{Interaction, InteractionSet, read_interactions};
use onto_dataset::split::{SplitRatios, permutation, split_interactions};

fn edge_set(n: usize) -> InteractionSet {
    (0..n)
        .map(|i| Interaction::new(format!("4932.P{i}"), format!("4932.Q{}", i % 977), 1.0))
        .collect()
}

fn bench_permutation(c: &mut Criterion) {
    c.bench_function("permutation_100k", |bench| {
        bench.iter(|| black_box(permutation(100_000, 0)))
    });
}

fn bench_split(c: &mut Criterion) {
    let set = edge_set(100_000);
    c.bench_function("split_100k", |bench| {
        bench.iter(|| black_box(split_interactions(&set, SplitRatios::default(), 0).unwrap()))
    });
}

fn bench_read(c: &mut Criterion) {
    let mut text = String::from("protein1 protein2 a b c d experimental e f combined\n");
    for i in 0..50_000 {
        text.push_str(&format!("4932.P{i} 4932.Q{} 0 0 0 0 {} 0 0 500\n", i % 977, i % 300));
    }

    c.bench_function("read_50k_rows", |bench| {
        bench.iter(|| black_box(read_interactions(text.as_bytes(), Path::new("bench")).unwrap()))
    });
}

criterion_group!(benches, bench_permutation, bench_split, bench_read);
criterion_main!(benches);
