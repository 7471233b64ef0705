//! Benchmarks for random placement and transition sampling.

use std::sync::Arc;

use blockworld_core::{GenerationConfig, PropertyCatalog};
use blockworld_scene::{State, TransitionSampler};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn placer_benchmark(c: &mut Criterion) {
    let catalog = Arc::new(PropertyCatalog::clevr());
    let config = GenerationConfig::new().with_num_objects(4);
    let mut rng = StdRng::seed_from_u64(42);

    c.bench_function("shuffle_4_objects", |b| {
        b.iter(|| {
            let state = State::new(catalog.clone(), black_box(&config), &mut rng);
            black_box(state.is_ok())
        })
    });
}

fn sampler_benchmark(c: &mut Criterion) {
    let config = GenerationConfig::new().with_num_objects(4);
    let sampler = TransitionSampler::new(PropertyCatalog::clevr(), config).unwrap();
    let mut rng = StdRng::seed_from_u64(42);

    c.bench_function("sample_transition_4_objects", |b| {
        b.iter(|| black_box(sampler.sample_transition(&mut rng)))
    });
}

criterion_group!(benches, placer_benchmark, sampler_benchmark);
criterion_main!(benches);
