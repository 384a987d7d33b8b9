//! Keystream generation throughput.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use scramjet::MasterKey;

const LEN: usize = 65_536;

fn bench_keystreams(c: &mut Criterion) {
    let key = MasterKey::default();

    c.bench_function("logistic_64k", |b| {
        b.iter(|| key.logistic_keystream(black_box(LEN)));
    });
    c.bench_function("jia_64k", |b| {
        b.iter(|| key.jia_keystream(black_box(LEN)));
    });
    c.bench_function("arnold_64k", |b| {
        b.iter(|| key.arnold_keystream(black_box(LEN)));
    });
}

criterion_group!(benches, bench_keystreams);
criterion_main!(benches);
