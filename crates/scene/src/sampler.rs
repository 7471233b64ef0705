//! Stochastic transition and problem sampling.
//!
//! Placement failures are expected here: whenever a state or an action turns
//! out to be unstackable, the whole attempt is thrown away and a fresh state
//! is drawn, up to the configured restart budget.

use std::sync::Arc;

use rand::Rng;

use blockworld_core::{Error, GenerationConfig, PropertyCatalog, Result, SceneRecord};

use crate::action::{ActionKind, ActionModel};
use crate::state::State;

/// Two states separated by one or more actions.
#[derive(Debug, Clone)]
pub struct Transition {
    /// State before the actions.
    pub pre: State,
    /// State after the actions.
    pub suc: State,
    /// Actions applied, in order.
    pub actions: Vec<ActionKind>,
}

impl Transition {
    /// Comma-separated action names.
    pub fn action_name(&self) -> String {
        self.actions
            .iter()
            .map(|a| a.name())
            .collect::<Vec<_>>()
            .join(",")
    }
}

/// A planning problem: an initial state and a goal reached by moves.
#[derive(Debug, Clone)]
pub struct Problem {
    /// Starting state.
    pub init: State,
    /// State to reach.
    pub goal: State,
}

impl Problem {
    /// Renderer-facing init and goal scenes.
    pub fn to_records(&self) -> (SceneRecord, SceneRecord) {
        (self.init.scene_record(), self.goal.scene_record())
    }
}

/// Draws random states and transitions for a fixed catalog and config.
#[derive(Debug, Clone)]
pub struct TransitionSampler {
    catalog: Arc<PropertyCatalog>,
    config: GenerationConfig,
    actions: ActionModel,
}

impl TransitionSampler {
    /// Creates a sampler; the catalog's color list is prepared once here.
    pub fn new(catalog: PropertyCatalog, config: GenerationConfig) -> Result<Self> {
        config.validate()?;
        let catalog = Arc::new(config.prepare_catalog(catalog)?);
        Ok(Self {
            catalog,
            config,
            actions: ActionModel::default(),
        })
    }

    /// Sets the action model used by [`TransitionSampler::sample_transition`].
    pub fn with_actions(mut self, actions: ActionModel) -> Self {
        self.actions = actions;
        self
    }

    /// Returns the prepared catalog.
    pub fn catalog(&self) -> &Arc<PropertyCatalog> {
        &self.catalog
    }

    /// Returns the configuration.
    pub fn config(&self) -> &GenerationConfig {
        &self.config
    }

    /// Runs `attempt` until it stops failing with `Unstackable`.
    fn with_restarts<T, R, F>(&self, rng: &mut R, mut attempt: F) -> Result<T>
    where
        R: Rng + ?Sized,
        F: FnMut(&mut R) -> Result<T>,
    {
        let budget = self.config.max_restarts;
        let warn_at = budget - budget / 10;
        for restart in 1..=budget {
            match attempt(rng) {
                Ok(value) => return Ok(value),
                Err(e) if e.is_unstackable() => {
                    log::debug!("restart {}/{}: {}", restart, budget, e);
                    if restart == warn_at {
                        log::warn!(
                            "{} of {} restarts used; the configuration may be too constrained",
                            restart,
                            budget
                        );
                    }
                }
                Err(e) => return Err(e),
            }
        }
        Err(Error::RetriesExhausted { attempts: budget })
    }

    /// A fresh plausible state.
    pub fn sample_state<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<State> {
        self.with_restarts(rng, |rng| State::new(self.catalog.clone(), &self.config, rng))
    }

    /// A fresh state and the state after `num_steps` random actions.
    pub fn sample_transition<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Transition> {
        self.with_restarts(rng, |rng| {
            let pre = State::new(self.catalog.clone(), &self.config, rng)?;
            let mut suc = pre.clone();
            let mut actions = Vec::with_capacity(self.config.num_steps);
            for _ in 0..self.config.num_steps {
                actions.push(self.actions.random_action(&mut suc, rng)?);
            }
            Ok(Transition { pre, suc, actions })
        })
    }

    /// An initial state and a goal `num_steps` moves away.
    pub fn sample_problem<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Problem> {
        self.with_restarts(rng, |rng| {
            let init = State::new(self.catalog.clone(), &self.config, rng)?;
            let mut goal = init.clone();
            for _ in 0..self.config.num_steps {
                goal.action_move(rng)?;
            }
            Ok(Problem { init, goal })
        })
    }

    /// `count` independent transitions.
    pub fn sample_transitions<R: Rng + ?Sized>(
        &self,
        count: usize,
        rng: &mut R,
    ) -> Result<Vec<Transition>> {
        let mut transitions = Vec::with_capacity(count);
        for i in 0..count {
            transitions.push(self.sample_transition(rng)?);
            if (i + 1) % 1000 == 0 {
                log::info!("sampled {}/{} transitions", i + 1, count);
            }
        }
        Ok(transitions)
    }

    /// `count` renders of one logical state, wiggled if configured.
    pub fn renders<R: Rng + ?Sized>(
        &self,
        state: &State,
        count: usize,
        rng: &mut R,
    ) -> Vec<SceneRecord> {
        (0..count)
            .map(|_| state.wiggled(self.config.wiggle, rng).scene_record())
            .collect()
    }
}
