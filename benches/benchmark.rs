use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::{rngs::StdRng, Rng, SeedableRng};

use balanced_tree::BalancedTree;

const N: usize = 100_000;

pub fn benchmarks(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(0);
    let keys: Vec<String> = (1..=N).map(|_| format!("{:016x}", rng.gen::<u64>())).collect();

    c.bench_function("tree_insert", |b| {
        let mut tree = BalancedTree::new();
        b.iter(|| {
            for (value, key) in keys.iter().enumerate() {
                tree.insert(key.clone(), value as i64);
            }
        })
    });

    let mut tree: BalancedTree = BalancedTree::new();
    for (value, key) in keys.iter().enumerate() {
        tree.insert(key.clone(), value as i64);
    }

    c.bench_function("tree_get", |b| {
        b.iter(|| {
            for key in &keys {
                black_box(tree.get(key.as_str()));
            }
        })
    });

    c.bench_function("tree_iter", |b| {
        b.iter(|| {
            for (k, v) in &tree {
                black_box((k, v));
            }
        })
    });

    c.bench_function("tree_find_range", |b| {
        b.iter(|| black_box(tree.find_range("4", "8")))
    });

    c.bench_function("tree_remove", |b| {
        let mut tree = tree.clone();
        b.iter(|| {
            for key in &keys {
                tree.remove(key.as_str());
            }
        })
    });
}

criterion_group!(benches, benchmarks);
criterion_main!(benches);
