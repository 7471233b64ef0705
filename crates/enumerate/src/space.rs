//! The complete state and transition graph of a fixed object set.

use std::collections::{HashMap, HashSet};

use blockworld_core::{Block, Error, Result};

use crate::assignment::StackAssignment;
use crate::enumerator::StackEnumerator;
use crate::key::CanonicalKey;
use crate::layout::StackLayout;
use crate::successor::{StackAction, SuccessorEnumerator};

const STATE_LOG_INTERVAL: usize = 1_000;
const TRANSITION_LOG_INTERVAL: usize = 10_000;

/// How much of the graph is kept in memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExploreMode {
    /// Walk the full enumeration but keep only keys and counts.
    Dry,
    /// Keep every distinct state and transition.
    #[default]
    Collect,
}

/// An edge between two distinct states.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateTransition {
    /// Index of the state before the action.
    pub pre: usize,
    /// Index of the state after the action.
    pub suc: usize,
    /// The separating action.
    pub action: StackAction,
}

/// Distinct states (indexed in discovery order) and the distinct
/// transitions between them.
#[derive(Debug, Clone)]
pub struct StateSpace {
    mode: ExploreMode,
    index: HashMap<CanonicalKey, usize>,
    states: Vec<StackAssignment>,
    transitions: Vec<StateTransition>,
    num_transitions: usize,
    raw_configurations: usize,
}

impl StateSpace {
    /// Enumerates every configuration of `objects` and every one-step
    /// transition between them.
    ///
    /// Fails with `Error::Internal` if a successor is not among the
    /// enumerated states.
    pub fn explore(
        objects: Vec<Block>,
        layout: &StackLayout,
        materials: &[String],
        mode: ExploreMode,
    ) -> Result<Self> {
        let mut space = Self {
            mode,
            index: HashMap::new(),
            states: Vec::new(),
            transitions: Vec::new(),
            num_transitions: 0,
            raw_configurations: 0,
        };

        for assignment in StackEnumerator::new(objects.clone(), layout.clone(), materials.to_vec()) {
            space.raw_configurations += 1;
            let key = assignment.key();
            if space.index.contains_key(&key) {
                continue;
            }
            let id = space.index.len();
            space.index.insert(key, id);
            if mode == ExploreMode::Collect {
                space.states.push(assignment);
            }
            if (id + 1) % STATE_LOG_INTERVAL == 0 {
                log::info!("{} states", id + 1);
            }
        }
        log::info!(
            "{} distinct states from {} configurations",
            space.index.len(),
            space.raw_configurations
        );

        let mut expanded = vec![false; space.index.len()];
        let mut seen: HashSet<(usize, usize)> = HashSet::new();
        for mut assignment in StackEnumerator::new(objects, layout.clone(), materials.to_vec()) {
            let pre = space.lookup(&assignment.key())?;
            if expanded[pre] {
                continue;
            }
            expanded[pre] = true;

            for successor in SuccessorEnumerator::new(&mut assignment, materials) {
                let suc = space.lookup(&successor.state.key())?;
                if !seen.insert((pre, suc)) {
                    continue;
                }
                space.num_transitions += 1;
                if mode == ExploreMode::Collect {
                    space.transitions.push(StateTransition {
                        pre,
                        suc,
                        action: successor.action,
                    });
                }
                if space.num_transitions % TRANSITION_LOG_INTERVAL == 0 {
                    log::info!("{} transitions", space.num_transitions);
                }
            }
        }
        log::info!("{} distinct transitions", space.num_transitions);

        Ok(space)
    }

    fn lookup(&self, key: &CanonicalKey) -> Result<usize> {
        self.index.get(key).copied().ok_or_else(|| {
            Error::Internal(format!(
                "configuration with {} objects missing from the enumeration",
                key.len()
            ))
        })
    }

    /// The mode this space was explored in.
    pub fn mode(&self) -> ExploreMode {
        self.mode
    }

    /// Number of distinct states.
    pub fn num_states(&self) -> usize {
        self.index.len()
    }

    /// Number of distinct transitions.
    pub fn num_transitions(&self) -> usize {
        self.num_transitions
    }

    /// Number of configurations visited before deduplication.
    pub fn raw_configurations(&self) -> usize {
        self.raw_configurations
    }

    /// Distinct states in discovery order. Empty in dry mode.
    pub fn states(&self) -> &[StackAssignment] {
        &self.states
    }

    /// Distinct transitions. Empty in dry mode.
    pub fn transitions(&self) -> &[StateTransition] {
        &self.transitions
    }

    /// Index of the state with the given key.
    pub fn index_of(&self, key: &CanonicalKey) -> Option<usize> {
        self.index.get(key).copied()
    }
}
