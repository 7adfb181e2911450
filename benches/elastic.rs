#![allow(
    missing_docs,
    clippy::missing_docs_in_private_items,
    clippy::unwrap_used,
    clippy::similar_names
)]
use std::collections::HashMap;

use criterion::{Criterion, criterion_group, criterion_main};
use elastic_hash::ElasticHashMap;
use proptest::{
    prelude::{Strategy, any},
    strategy::ValueTree,
    test_runner::TestRunner,
};

const ITEMS_AMOUNT: usize = 1000;
const CAPACITY: usize = 2 * ITEMS_AMOUNT;
const DELTA: f64 = 0.1;
const SAMPLE_SIZE: usize = 10;

fn hash_map_benches(c: &mut Criterion) {
    let mut runner = TestRunner::default();
    let items = any::<[(String, String); ITEMS_AMOUNT]>()
        .new_tree(&mut runner)
        .unwrap()
        .current();

    let mut group = c.benchmark_group("Hash map comparison benchmark");
    group.sample_size(SAMPLE_SIZE);
    group.bench_function("elastic insert", |b| {
        b.iter(|| {
            let mut elastic_map = ElasticHashMap::new(CAPACITY, DELTA).unwrap();
            let mut stored = 0_usize;
            for (key, value) in items.clone() {
                if elastic_map.insert(key, value).is_ok() {
                    stored += 1;
                }
            }
            stored
        });
    });
    group.bench_function("rust std insert", |b| {
        b.iter(|| {
            let mut rust_map = HashMap::with_capacity(CAPACITY);
            for (key, value) in items.clone() {
                rust_map.insert(key, value);
            }
            rust_map.len()
        });
    });

    let mut elastic_map = ElasticHashMap::new(CAPACITY, DELTA).unwrap();
    let mut rust_map = HashMap::with_capacity(CAPACITY);
    for (key, value) in items.clone() {
        if elastic_map.insert(key.clone(), value.clone()).is_ok() {
            rust_map.insert(key, value);
        }
    }
    group.bench_function("elastic get", |b| {
        b.iter(|| items.iter().filter(|(key, _)| elastic_map.get(key).is_some()).count());
    });
    group.bench_function("rust std get", |b| {
        b.iter(|| items.iter().filter(|(key, _)| rust_map.get(key).is_some()).count());
    });
    group.finish();
}

criterion_group!(benches, hash_map_benches);

criterion_main!(benches);
