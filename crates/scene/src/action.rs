//! Neighbor-state actions and random action choice.

use std::fmt;

use rand::seq::SliceRandom;
use rand::Rng;

use blockworld_core::{Error, Result};

use crate::state::State;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A state-to-state transformation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ActionKind {
    /// Relocate a top block so that it visibly changes support.
    Move,
    /// Give a top block a different material.
    ChangeMaterial,
}

impl ActionKind {
    /// Every action kind.
    pub const ALL: [ActionKind; 2] = [ActionKind::Move, ActionKind::ChangeMaterial];

    /// Name recorded in scene metadata.
    pub fn name(self) -> &'static str {
        match self {
            ActionKind::Move => "action_move",
            ActionKind::ChangeMaterial => "action_change_material",
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The set of actions random sampling chooses from.
///
/// The default model only moves blocks; material changes are available but
/// must be enabled explicitly.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ActionModel {
    actions: Vec<ActionKind>,
}

impl Default for ActionModel {
    fn default() -> Self {
        Self {
            actions: vec![ActionKind::Move],
        }
    }
}

impl ActionModel {
    /// Creates a model sampling uniformly from `actions`.
    pub fn new(actions: Vec<ActionKind>) -> Result<Self> {
        if actions.is_empty() {
            return Err(Error::ConfigError(
                "action model needs at least one action".into(),
            ));
        }
        Ok(Self { actions })
    }

    /// A model sampling every action kind.
    pub fn all() -> Self {
        Self {
            actions: ActionKind::ALL.to_vec(),
        }
    }

    /// Returns the enabled actions.
    pub fn actions(&self) -> &[ActionKind] {
        &self.actions
    }

    /// Picks an action uniformly.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> ActionKind {
        self.actions
            .choose(rng)
            .copied()
            .unwrap_or(ActionKind::Move)
    }

    /// Applies one randomly chosen action to `state`.
    pub fn random_action<R: Rng + ?Sized>(&self, state: &mut State, rng: &mut R) -> Result<ActionKind> {
        let kind = self.sample(rng);
        state.apply_action(kind, rng)?;
        Ok(kind)
    }
}
