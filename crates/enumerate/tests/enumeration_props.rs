//! Properties of the exhaustive enumerators over randomly drawn object sets.

use std::collections::HashSet;

use blockworld_core::{BlockEquality, DuplicatePolicy, GenerationConfig, PropertyCatalog};
use blockworld_enumerate::{
    initial_objects, CanonicalKey, ExploreMode, StackAction, StackEnumerator, StackLayout,
    StateSpace, SuccessorEnumerator,
};
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn materials(catalog: &PropertyCatalog) -> Vec<String> {
    catalog.material_ids().map(str::to_string).collect()
}

#[test]
fn layout_from_config_matches_stack_count() {
    let config = GenerationConfig::new().with_stacks(3, 1.5, 2.0);
    let mut rng = StdRng::seed_from_u64(8);
    let layout = StackLayout::from_config(&config, &mut rng).unwrap();
    assert_eq!(layout.len(), 3);
}

#[test]
fn enumerated_configurations_stack_exactly() {
    let catalog = PropertyCatalog::clevr();
    let mut rng = StdRng::seed_from_u64(21);
    let objects = initial_objects(
        &catalog,
        3,
        DuplicatePolicy::Reject(BlockEquality::Appearance),
        &mut rng,
    )
    .unwrap();
    let layout = StackLayout::random(3, 1.5, 2.0, &mut rng).unwrap();

    for assignment in StackEnumerator::from_catalog(objects, layout.clone(), &catalog) {
        for (stack, &x) in assignment.stacks().iter().zip(layout.positions()) {
            let mut height = 0.0;
            for block in stack {
                assert_eq!(block.x(), x);
                assert!((block.bottom() - height).abs() < 1e-12);
                height = block.top();
            }
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn distinct_keys_are_unique_and_successors_restore(
        seed in any::<u64>(),
        num_objects in 1usize..4,
        num_stacks in 1usize..4,
    ) {
        let catalog = PropertyCatalog::clevr();
        let mut rng = StdRng::seed_from_u64(seed);
        let objects = initial_objects(
            &catalog,
            num_objects,
            DuplicatePolicy::Reject(BlockEquality::Appearance),
            &mut rng,
        )
        .unwrap();
        let layout = StackLayout::random(num_stacks, 1.5, 2.0, &mut rng).unwrap();
        let materials = materials(&catalog);

        let mut keys: HashSet<CanonicalKey> = HashSet::new();
        for (key, mut assignment) in
            StackEnumerator::new(objects, layout, materials.clone()).distinct()
        {
            prop_assert!(keys.insert(key.clone()));
            prop_assert_eq!(key.len(), num_objects);

            let successors: Vec<_> =
                SuccessorEnumerator::new(&mut assignment, &materials).collect();
            prop_assert_eq!(assignment.key(), key.clone());

            for successor in successors {
                if let StackAction::Move { from, to } = successor.action {
                    let mut back = successor.state;
                    back.move_top(to, from).unwrap();
                    prop_assert_eq!(back.key(), key.clone());
                }
            }
        }
    }

    #[test]
    fn dry_and_collect_agree(
        seed in any::<u64>(),
        num_objects in 1usize..3,
    ) {
        let catalog = PropertyCatalog::clevr();
        let mut rng = StdRng::seed_from_u64(seed);
        let objects = initial_objects(&catalog, num_objects, DuplicatePolicy::Allow, &mut rng)
            .unwrap();
        let layout = StackLayout::random(2, 1.5, 2.0, &mut rng).unwrap();
        let materials = materials(&catalog);

        let dry = StateSpace::explore(objects.clone(), &layout, &materials, ExploreMode::Dry)
            .unwrap();
        let full = StateSpace::explore(objects, &layout, &materials, ExploreMode::Collect)
            .unwrap();
        prop_assert_eq!(dry.num_states(), full.num_states());
        prop_assert_eq!(dry.num_transitions(), full.num_transitions());
        prop_assert!(full.num_states() <= full.raw_configurations());
    }
}
