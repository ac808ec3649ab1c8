//! Benchmarks for signature construction and similarity queries.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::SeedableRng;

use neardup::minhash::hashing::{HashFamily, P1};
use neardup::minhash::signature::signature_column;
use neardup::{IndexConfig, MinHashIndex};

/// Deterministic pseudo-text so runs are comparable.
fn synthetic_document(words: usize, salt: usize) -> String {
    let vocabulary = [
        "alpha", "bravo", "charlie", "delta", "echo", "foxtrot", "golf", "hotel", "india",
        "juliet", "kilo", "lima",
    ];

    (0..words)
        .map(|i| vocabulary[(i * 7 + salt) % vocabulary.len()])
        .collect::<Vec<_>>()
        .join(" ")
}

fn bench_signature_column(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(1);
    let hashers = HashFamily::generate(200, P1, &mut rng);

    let mut group = c.benchmark_group("signature_column");
    for words in [50usize, 500, 5000] {
        let document = synthetic_document(words, 0);
        group.bench_with_input(BenchmarkId::from_parameter(words), &document, |b, doc| {
            b.iter(|| signature_column(black_box(&hashers), 2, doc.as_bytes()));
        });
    }
    group.finish();
}

fn bench_add(c: &mut Criterion) {
    let document = synthetic_document(200, 0);

    c.bench_function("add", |b| {
        let index = MinHashIndex::with_seed(IndexConfig::default(), 1).unwrap();
        b.iter(|| index.add("doc", black_box(document.as_bytes())));
    });
}

fn bench_find_similar(c: &mut Criterion) {
    let index = MinHashIndex::with_seed(IndexConfig::default(), 1).unwrap();
    for i in 0..1000 {
        index.add(&format!("doc-{i}"), synthetic_document(100, i).as_bytes());
    }
    let query = synthetic_document(100, 500);

    // warm the band cache so the benchmark measures the scan
    index.find_similar(query.as_bytes(), 0.5).unwrap();

    c.bench_function("find_similar_1k_docs", |b| {
        b.iter(|| {
            index
                .find_similar(black_box(query.as_bytes()), 0.5)
                .unwrap()
        });
    });
}

criterion_group!(
    benches,
    bench_signature_column,
    bench_add,
    bench_find_similar
);
criterion_main!(benches);
