//! Scene state: an ordered set of blocks and the actions that change it.
//!
//! Block order is fixed at construction and survives shuffles and actions,
//! so an object keeps its index across a transition. Support relations are
//! never stored; "what is below" is always recomputed from positions.

use std::sync::Arc;

use rand::seq::SliceRandom;
use rand::Rng;

use blockworld_core::{
    draw_blocks, records_by_id, Block, Error, GenerationConfig, ObjectRecord, PropertyCatalog,
    Result, SceneRecord,
};

use crate::action::{ActionKind, ActionModel};
use crate::placer::{self, sample_gaussian, BlockPlacer};
use crate::table::Table;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Tolerance for resting-height comparisons.
pub const HEIGHT_EPSILON: f64 = 1e-9;

/// Redraws per block before wiggle keeps the original position.
const WIGGLE_TRIALS: usize = 20;

/// One scene.
#[derive(Debug, Clone)]
pub struct State {
    objects: Vec<Block>,
    placer: BlockPlacer,
    catalog: Arc<PropertyCatalog>,
    last_action: Option<ActionKind>,
}

/// Serializable form of a [`State`], without the catalog.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct StateSnapshot {
    /// Table the blocks were placed on.
    pub table: Table,
    /// Placement trial budget.
    pub max_trials: usize,
    /// Blocks in their stable order, with locations.
    pub objects: Vec<Block>,
    /// The action that produced the state, if any.
    pub last_action: Option<ActionKind>,
}

impl State {
    /// Draws `config.num_objects` blocks and shuffles them onto the table.
    ///
    /// An `Unstackable` error means this draw has no plausible arrangement;
    /// callers start over with a fresh state.
    pub fn new<R: Rng + ?Sized>(
        catalog: Arc<PropertyCatalog>,
        config: &GenerationConfig,
        rng: &mut R,
    ) -> Result<Self> {
        config.validate()?;
        let blocks = draw_blocks(&catalog, config.num_objects, config.duplicates, rng)?;
        let mut state = Self::unplaced(catalog, Table::from_config(config), blocks)
            .with_max_trials(config.max_trials);
        state.shuffle(rng)?;
        Ok(state)
    }

    /// Wraps blocks without placing them. Call [`State::shuffle`] before use.
    pub fn unplaced(catalog: Arc<PropertyCatalog>, table: Table, objects: Vec<Block>) -> Self {
        let placer = BlockPlacer::new(&catalog, table);
        Self {
            objects,
            placer,
            catalog,
            last_action: None,
        }
    }

    /// Sets the placement trial budget.
    pub fn with_max_trials(mut self, trials: usize) -> Self {
        self.placer = self.placer.with_max_trials(trials);
        self
    }

    /// Returns the blocks in their stable order.
    pub fn objects(&self) -> &[Block] {
        &self.objects
    }

    /// Number of blocks.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Returns true if the state has no blocks.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Returns the table.
    pub fn table(&self) -> &Table {
        self.placer.table()
    }

    /// Returns the shared catalog.
    pub fn catalog(&self) -> &Arc<PropertyCatalog> {
        &self.catalog
    }

    /// The action that produced this state, if any.
    pub fn last_action(&self) -> Option<ActionKind> {
        self.last_action
    }

    /// Re-places every block in order against the blocks placed before it.
    pub fn shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<()> {
        for i in 0..self.objects.len() {
            let (placed, rest) = self.objects.split_at_mut(i);
            self.placer.place(&mut rest[0], placed, false, rng)?;
        }
        self.last_action = None;
        Ok(())
    }

    /// Indices of blocks with nothing above them.
    pub fn top_indices(&self) -> Vec<usize> {
        (0..self.objects.len())
            .filter(|&i| {
                let block = &self.objects[i];
                !self
                    .objects
                    .iter()
                    .enumerate()
                    .any(|(j, other)| j != i && other.is_above(block))
            })
            .collect()
    }

    /// Blocks with nothing above them.
    pub fn tops(&self) -> Vec<&Block> {
        self.top_indices()
            .into_iter()
            .map(|i| &self.objects[i])
            .collect()
    }

    /// Blocks below the block at `index`.
    pub fn objects_below(&self, index: usize) -> Vec<&Block> {
        match self.objects.get(index) {
            Some(block) => placer::objects_below(block, &self.objects).collect(),
            None => Vec::new(),
        }
    }

    /// The block directly supporting the block at `index`.
    pub fn object_just_below(&self, index: usize) -> Option<&Block> {
        let block = self.objects.get(index)?;
        placer::object_just_below(block, &self.objects)
    }

    fn random_top<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<usize> {
        self.top_indices()
            .choose(rng)
            .copied()
            .ok_or_else(|| Error::InvalidState("state has no blocks".into()))
    }

    /// Moves a random top block so that its support visibly changes.
    ///
    /// On failure the state is left as it was.
    pub fn action_move<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<()> {
        let index = self.random_top(rng)?;
        let mut block = self.objects.remove(index);
        let placed = self.placer.place(&mut block, &self.objects, true, rng);
        self.objects.insert(index, block);
        placed?;
        self.last_action = Some(ActionKind::Move);
        Ok(())
    }

    /// Gives a random top block a different material.
    pub fn action_change_material<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<()> {
        let index = self.random_top(rng)?;
        let current = &self.objects[index].material;
        let alternatives: Vec<&str> = self
            .catalog
            .material_ids()
            .filter(|m| *m != current.as_str())
            .collect();
        let material = match alternatives.choose(rng) {
            Some(m) => m.to_string(),
            None => return Err(Error::NoAlternativeMaterial(current.clone())),
        };
        self.objects[index].material = material;
        self.last_action = Some(ActionKind::ChangeMaterial);
        Ok(())
    }

    /// Applies the given action.
    pub fn apply_action<R: Rng + ?Sized>(&mut self, kind: ActionKind, rng: &mut R) -> Result<()> {
        match kind {
            ActionKind::Move => self.action_move(rng),
            ActionKind::ChangeMaterial => self.action_change_material(rng),
        }
    }

    /// Applies an action chosen by the default [`ActionModel`].
    pub fn random_action<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<ActionKind> {
        ActionModel::default().random_action(self, rng)
    }

    /// Checks the stacking invariant.
    ///
    /// Every block must rest on the highest top among the overlapping blocks
    /// below it (or on the table), and each of those must be stackable and
    /// carry the block's center.
    pub fn validate(&self) -> Result<()> {
        for (i, block) in self.objects.iter().enumerate() {
            let mut support = 0.0_f64;
            for (j, other) in self.objects.iter().enumerate() {
                if i == j || !block.overlaps(other) {
                    continue;
                }
                if (block.z() - other.z()).abs() <= HEIGHT_EPSILON {
                    return Err(Error::InvalidState(format!(
                        "blocks #{} and #{} overlap at the same height",
                        block.id, other.id
                    )));
                }
                if other.z() > block.z() {
                    continue;
                }
                if !other.stackable {
                    return Err(Error::InvalidState(format!(
                        "block #{} rests on non-stackable block #{}",
                        block.id, other.id
                    )));
                }
                if !block.stable_on(other) {
                    return Err(Error::InvalidState(format!(
                        "block #{} is not stable on block #{}",
                        block.id, other.id
                    )));
                }
                support = support.max(other.top());
            }
            if (block.bottom() - support).abs() > HEIGHT_EPSILON {
                return Err(Error::InvalidState(format!(
                    "block #{} bottom at {} but support at {}",
                    block.id,
                    block.bottom(),
                    support
                )));
            }
        }
        Ok(())
    }

    /// Returns true if the stacking invariant holds.
    pub fn is_plausible(&self) -> bool {
        self.validate().is_ok()
    }

    /// Jitters every block's x without changing any support relation.
    ///
    /// A perturbation is kept only if the block overlaps exactly the same
    /// blocks as before and every stable-on relation still holds; otherwise
    /// the block keeps its position.
    pub fn wiggle<R: Rng + ?Sized>(&mut self, magnitude: f64, rng: &mut R) {
        let sigma = magnitude * self.placer.unit();
        if !(sigma > 0.0) {
            return;
        }
        for i in 0..self.objects.len() {
            let original = self.objects[i].clone();
            let mut accepted = false;
            for _ in 0..WIGGLE_TRIALS {
                let mut candidate = original.clone();
                candidate.location.x += sample_gaussian(rng, sigma);
                if self.keeps_relations(i, &original, &candidate) {
                    self.objects[i] = candidate;
                    accepted = true;
                    break;
                }
            }
            if !accepted {
                log::debug!("wiggle kept block #{} in place", original.id);
            }
        }
    }

    /// A wiggled copy of this state.
    pub fn wiggled<R: Rng + ?Sized>(&self, magnitude: f64, rng: &mut R) -> Self {
        let mut copy = self.clone();
        copy.wiggle(magnitude, rng);
        copy
    }

    fn keeps_relations(&self, index: usize, original: &Block, candidate: &Block) -> bool {
        self.objects.iter().enumerate().all(|(j, other)| {
            if j == index {
                return true;
            }
            let overlapped = original.overlaps(other);
            if candidate.overlaps(other) != overlapped {
                return false;
            }
            if !overlapped {
                return true;
            }
            if other.z() < candidate.z() {
                candidate.stable_on(other)
            } else {
                other.stable_on(candidate)
            }
        })
    }

    /// Renderer records, ordered by block id.
    pub fn for_rendering(&self) -> Vec<ObjectRecord> {
        records_by_id(&self.objects)
    }

    /// Scene record tagged with the producing action.
    pub fn scene_record(&self) -> SceneRecord {
        let scene = SceneRecord::new(self.for_rendering());
        match self.last_action {
            Some(action) => scene.with_action(action.name()),
            None => scene,
        }
    }

    /// Captures everything but the catalog.
    pub fn snapshot(&self) -> StateSnapshot {
        StateSnapshot {
            table: *self.placer.table(),
            max_trials: self.placer.max_trials(),
            objects: self.objects.clone(),
            last_action: self.last_action,
        }
    }

    /// Restores a state captured with [`State::snapshot`].
    ///
    /// Fails with `InvalidState` if the stored positions are not plausible.
    pub fn from_snapshot(catalog: Arc<PropertyCatalog>, snapshot: StateSnapshot) -> Result<Self> {
        snapshot.table.validate()?;
        let mut state = Self::unplaced(catalog, snapshot.table, snapshot.objects)
            .with_max_trials(snapshot.max_trials);
        state.last_action = snapshot.last_action;
        state.validate()?;
        Ok(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use blockworld_core::{DuplicatePolicy, Location};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn catalog() -> Arc<PropertyCatalog> {
        Arc::new(PropertyCatalog::clevr())
    }

    fn config(n: usize) -> GenerationConfig {
        GenerationConfig::new().with_num_objects(n)
    }

    /// Keeps drawing seeds until a plausible state comes out.
    fn sample(n: usize, seed: u64) -> State {
        let mut rng = StdRng::seed_from_u64(seed);
        loop {
            match State::new(catalog(), &config(n), &mut rng) {
                Ok(state) => return state,
                Err(e) if e.is_unstackable() => continue,
                Err(e) => panic!("unexpected error: {e}"),
            }
        }
    }

    fn stacked_pair() -> State {
        let catalog = catalog();
        let mut rng = StdRng::seed_from_u64(0);
        let mut blocks = draw_blocks(&catalog, 2, DuplicatePolicy::Allow, &mut rng).unwrap();
        for b in &mut blocks {
            b.stackable = true;
            b.size = 0.35;
        }
        blocks[0].location = Location::new(0.0, 0.35);
        blocks[1].location = Location::new(0.1, 1.05);
        State::unplaced(catalog, Table::new(5), blocks)
    }

    #[test]
    fn test_new_state_is_plausible() {
        for seed in 0..20 {
            let state = sample(4, seed);
            assert_eq!(state.len(), 4);
            assert!(state.validate().is_ok());
            let ids: Vec<usize> = state.objects().iter().map(|b| b.id).collect();
            assert_eq!(ids, vec![0, 1, 2, 3]);
        }
    }

    #[test]
    fn test_tops_and_below() {
        let state = stacked_pair();
        assert!(state.validate().is_ok());
        assert_eq!(state.top_indices(), vec![1]);
        assert_eq!(state.object_just_below(1).map(|b| b.id), Some(0));
        assert_eq!(state.objects_below(1).len(), 1);
        assert!(state.object_just_below(0).is_none());
        assert!(state.objects_below(7).is_empty());
    }

    #[test]
    fn test_validate_detects_floating_block() {
        let mut state = stacked_pair();
        state.objects[1].location.z += 0.2;
        assert!(matches!(state.validate(), Err(Error::InvalidState(_))));
    }

    #[test]
    fn test_validate_detects_overhang() {
        let mut state = stacked_pair();
        state.objects[1].location.x = 0.5;
        assert!(!state.is_plausible());
    }

    #[test]
    fn test_validate_detects_non_stackable_support() {
        let mut state = stacked_pair();
        state.objects[0].stackable = false;
        assert!(!state.is_plausible());
    }

    #[test]
    fn test_move_changes_one_location() {
        let mut moved = 0;
        for seed in 0..20 {
            let mut state = sample(3, seed);
            let before = state.clone();
            let mut rng = StdRng::seed_from_u64(seed + 100);
            match state.action_move(&mut rng) {
                Ok(()) => {
                    moved += 1;
                    let changed = before
                        .objects()
                        .iter()
                        .zip(state.objects())
                        .filter(|(a, b)| a.location != b.location)
                        .count();
                    assert_eq!(changed, 1);
                    assert!(state.validate().is_ok());
                    assert_eq!(state.last_action(), Some(ActionKind::Move));
                }
                Err(e) => {
                    assert!(e.is_unstackable());
                    let same = before
                        .objects()
                        .iter()
                        .zip(state.objects())
                        .all(|(a, b)| a.location == b.location);
                    assert!(same);
                }
            }
        }
        assert!(moved > 0);
    }

    #[test]
    fn test_change_material() {
        let mut state = sample(3, 5);
        let before = state.clone();
        let mut rng = StdRng::seed_from_u64(9);
        state.action_change_material(&mut rng).unwrap();

        let diffs: Vec<(&Block, &Block)> = before
            .objects()
            .iter()
            .zip(state.objects())
            .filter(|(a, b)| a.material != b.material)
            .collect();
        assert_eq!(diffs.len(), 1);
        let (a, b) = diffs[0];
        assert_ne!(a.material, b.material);
        assert_eq!(a.location, b.location);
        assert_eq!(a.color, b.color);
        assert_eq!(state.scene_record().action.as_deref(), Some("action_change_material"));
    }

    #[test]
    fn test_change_material_without_alternative() {
        let catalog = Arc::new(
            PropertyCatalog::builder()
                .shape("cube", "Cube", true)
                .size("small", 0.35)
                .material("rubber", "Rubber")
                .color_rgb("red", [255, 0, 0])
                .build()
                .unwrap(),
        );
        let mut rng = StdRng::seed_from_u64(0);
        let config = config(1);
        let mut state = State::new(catalog, &config, &mut rng).unwrap();
        let err = state.action_change_material(&mut rng).unwrap_err();
        assert!(matches!(err, Error::NoAlternativeMaterial(_)));
    }

    #[test]
    fn test_wiggle_preserves_invariant() {
        for seed in 0..10 {
            let state = sample(4, seed);
            let mut rng = StdRng::seed_from_u64(seed);
            let wiggled = state.wiggled(0.05, &mut rng);
            assert!(wiggled.validate().is_ok());
            for (a, b) in state.objects().iter().zip(wiggled.objects()) {
                assert_relative_eq!(a.z(), b.z());
            }
        }
    }

    #[test]
    fn test_snapshot_roundtrip_and_rejection() {
        let state = sample(4, 1);
        let snapshot = state.snapshot();
        let restored = State::from_snapshot(catalog(), snapshot.clone()).unwrap();
        assert_eq!(restored.for_rendering(), state.for_rendering());

        let mut broken = snapshot;
        broken.objects[0].location.z += 1.0;
        let err = State::from_snapshot(catalog(), broken).unwrap_err();
        assert!(matches!(err, Error::InvalidState(_)));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_snapshot_json_roundtrip() {
        let mut state = sample(4, 6);
        let mut rng = StdRng::seed_from_u64(6);
        state.action_change_material(&mut rng).unwrap();

        let json = serde_json::to_string(&state.snapshot()).unwrap();
        let snapshot: StateSnapshot = serde_json::from_str(&json).unwrap();
        let restored = State::from_snapshot(catalog(), snapshot).unwrap();

        assert_eq!(restored.for_rendering(), state.for_rendering());
        assert_eq!(restored.last_action(), Some(ActionKind::ChangeMaterial));
        assert_eq!(restored.table(), state.table());
    }

    #[test]
    fn test_for_rendering_sorted_by_id() {
        let state = sample(3, 2);
        let records = state.for_rendering();
        assert_eq!(records.len(), 3);
        assert!(state.scene_record().action.is_none());
    }
}
