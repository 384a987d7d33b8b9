//! DC and AC pipeline throughput on synthetic coefficient populations.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use scramjet::pipeline::{ac, dc};
use scramjet::MasterKey;

/// Coefficient population of a typical 1080p luma plane.
const BLOCKS: usize = 32_400;

fn synthetic_dc(rng: &mut StdRng) -> Vec<i32> {
    (0..BLOCKS)
        .map(|_| {
            let v = rng.gen_range(1..=1023);
            if rng.gen_bool(0.5) {
                v
            } else {
                -v
            }
        })
        .collect()
}

fn synthetic_ac(rng: &mut StdRng) -> Vec<ac::AcBlock> {
    (0..BLOCKS / 10)
        .map(|_| {
            let mut block = [0i32; 63];
            for _ in 0..8 {
                block[rng.gen_range(0..63)] = rng.gen_range(1..=255);
            }
            block
        })
        .collect()
}

fn bench_pipelines(c: &mut Criterion) {
    let key = MasterKey::default();
    let mut rng = StdRng::seed_from_u64(1);

    let dc_seq = synthetic_dc(&mut rng);
    c.bench_function("dc_encrypt_32k_blocks", |b| {
        b.iter(|| {
            let mut seq = black_box(dc_seq.clone());
            dc::encrypt(&mut seq, &key).ok();
            seq
        });
    });
    c.bench_function("dc_round_trip_32k_blocks", |b| {
        b.iter(|| {
            let mut seq = black_box(dc_seq.clone());
            dc::encrypt(&mut seq, &key).ok();
            dc::decrypt(&mut seq, &key).ok();
            seq
        });
    });

    let ac_blocks = synthetic_ac(&mut rng);
    c.bench_function("ac_encrypt_3k_blocks", |b| {
        b.iter(|| {
            let mut blocks = black_box(ac_blocks.clone());
            ac::encrypt(&mut blocks, &key).ok();
            blocks
        });
    });
}

criterion_group!(benches, bench_pipelines);
criterion_main!(benches);
