use criterion::{black_box, criterion_group, criterion_main, Criterion};

use arena_core::config::GenerationConfig;
use arena_core::generation::{generate_arena, Seed};

fn config(size: u32) -> GenerationConfig {
    GenerationConfig {
        width: size,
        height: size,
        ..Default::default()
    }
}

fn bench_arena_generation(c: &mut Criterion) {
    let seed = Seed::try_from(1234).unwrap();

    let default_arena = config(20);
    c.bench_function("generate_arena_20x20", |b| {
        b.iter(|| generate_arena(black_box(seed), black_box(&default_arena)))
    });

    let large_arena = config(64);
    c.bench_function("generate_arena_64x64", |b| {
        b.iter(|| generate_arena(black_box(seed), black_box(&large_arena)))
    });
}

fn bench_fingerprint(c: &mut Criterion) {
    let arena = generate_arena(Seed::try_from(1234).unwrap(), &config(64));
    c.bench_function("grid_fingerprint_64x64", |b| {
        b.iter(|| black_box(&arena.grid).fingerprint())
    });
}

criterion_group!(benches, bench_arena_generation, bench_fingerprint);
criterion_main!(benches);
