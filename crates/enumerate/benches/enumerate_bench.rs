//! Benchmarks for exhaustive enumeration.

use blockworld_core::{BlockEquality, DuplicatePolicy, PropertyCatalog};
use blockworld_enumerate::{initial_objects, ExploreMode, StackEnumerator, StackLayout, StateSpace};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn enumerate_benchmark(c: &mut Criterion) {
    let catalog = PropertyCatalog::clevr();
    let mut rng = StdRng::seed_from_u64(42);
    let objects = initial_objects(
        &catalog,
        3,
        DuplicatePolicy::Reject(BlockEquality::Appearance),
        &mut rng,
    )
    .unwrap();
    let layout = StackLayout::random(3, 1.5, 2.0, &mut rng).unwrap();
    let materials: Vec<String> = catalog.material_ids().map(str::to_string).collect();

    c.bench_function("distinct_3_objects_3_stacks", |b| {
        b.iter(|| {
            let enumerator =
                StackEnumerator::new(black_box(objects.clone()), layout.clone(), materials.clone());
            black_box(enumerator.distinct().count())
        })
    });

    c.bench_function("dry_explore_3_objects_3_stacks", |b| {
        b.iter(|| {
            let space = StateSpace::explore(
                black_box(objects.clone()),
                &layout,
                &materials,
                ExploreMode::Dry,
            );
            black_box(space.map(|s| s.num_transitions()))
        })
    });
}

criterion_group!(benches, enumerate_benchmark);
criterion_main!(benches);
