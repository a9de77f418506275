#![allow(deprecated)]

//! Resolver benchmarks for tombola

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use serde_json::json;
use std::sync::Arc;
use tombola::{Registry, roll};
use tombola_cache::CachedRegistry;

fn roller_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("roller");
    group.throughput(Throughput::Elements(1));

    group.bench_function("roll_short_salt", |b| {
        b.iter(|| roll(black_box("12:session-1234:checkout")));
    });

    let long_salt = "x".repeat(512);
    group.bench_function("roll_long_salt", |b| {
        b.iter(|| roll(black_box(&long_salt)));
    });

    group.finish();
}

fn resolve_benchmark(c: &mut Criterion) {
    let registry = Registry::new();
    registry
        .set_configuration(&json!({
            "always": true,
            "never": false,
            "split": ["a", "b", "c", "d"],
            "weighted": { "a": 5, "b": 10, "c": 15, "d": 20, "e": 50 }
        }))
        .unwrap();

    let mut group = c.benchmark_group("get_variant");
    group.throughput(Throughput::Elements(1));

    for feature in ["always", "never", "split", "weighted", "missing"] {
        group.bench_with_input(BenchmarkId::from_parameter(feature), feature, |b, feature| {
            b.iter(|| registry.get_variant(black_box("session-1234"), feature));
        });
    }

    group.finish();
}

fn digest_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("digest");

    for count in [10usize, 100, 1000] {
        let config: serde_json::Map<String, serde_json::Value> = (0..count)
            .map(|i| (format!("feature_{}", i), json!({ "a": 30, "b": 30, "c": 40 })))
            .collect();
        let registry = Registry::from_configuration(&serde_json::Value::Object(config)).unwrap();

        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), &registry, |b, registry| {
            b.iter(|| registry.get_variant_digest(black_box("session-1234")));
        });
    }

    group.finish();
}

fn cached_benchmark(c: &mut Criterion) {
    let registry = Arc::new(
        Registry::from_configuration(&json!({ "weighted": { "a": 25, "b": 25, "c": 50 } }))
            .unwrap(),
    );
    let cached = CachedRegistry::new(Arc::clone(&registry));
    cached.get_variant("session-1234", "weighted");

    let mut group = c.benchmark_group("cached");
    group.throughput(Throughput::Elements(1));

    group.bench_function("uncached", |b| {
        b.iter(|| registry.get_variant(black_box("session-1234"), "weighted"));
    });
    group.bench_function("cached_hit", |b| {
        b.iter(|| cached.get_variant(black_box("session-1234"), "weighted"));
    });

    group.finish();
}

criterion_group!(
    benches,
    roller_benchmark,
    resolve_benchmark,
    digest_benchmark,
    cached_benchmark
);
criterion_main!(benches);
