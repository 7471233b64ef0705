//! Generation configuration.

use crate::block::DuplicatePolicy;
use crate::catalog::PropertyCatalog;
use crate::error::{Error, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Parameters shared by the sampling and enumeration pipelines.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GenerationConfig {
    /// Number of objects in each scene.
    pub num_objects: usize,

    /// Number of discrete candidate x-slots on the table.
    pub table_size: usize,

    /// Standard deviation multiplier (in units of the largest size) for the
    /// Gaussian jitter added to slot positions.
    pub object_jitter: f64,

    /// Duplicate handling when drawing the objects of a scene.
    pub duplicates: DuplicatePolicy,

    /// Draw colors from the full list instead of the first `num_objects` entries.
    pub randomize_colors: bool,

    /// Placement trials per block before giving up.
    pub max_trials: usize,

    /// Fresh states tried by a sampling pipeline before giving up.
    pub max_restarts: usize,

    /// Actions applied between the two states of a transition.
    pub num_steps: usize,

    /// Number of fixed stack positions for exhaustive enumeration.
    pub max_stacks: usize,

    /// Minimum gap between adjacent stacks.
    pub min_margin: f64,

    /// Maximum gap between adjacent stacks.
    pub max_margin: f64,

    /// Standard deviation multiplier for render-time wiggle (0 = off).
    pub wiggle: f64,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            num_objects: 4,
            table_size: 5,
            object_jitter: 0.0,
            duplicates: DuplicatePolicy::default(),
            randomize_colors: false,
            max_trials: 100,
            max_restarts: 1000,
            num_steps: 1,
            max_stacks: 4,
            min_margin: 1.5,
            max_margin: 2.0,
            wiggle: 0.0,
        }
    }
}

impl GenerationConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the number of objects.
    pub fn with_num_objects(mut self, n: usize) -> Self {
        self.num_objects = n;
        self
    }

    /// Sets the number of table slots.
    pub fn with_table_size(mut self, slots: usize) -> Self {
        self.table_size = slots;
        self
    }

    /// Sets the slot jitter multiplier.
    pub fn with_object_jitter(mut self, jitter: f64) -> Self {
        self.object_jitter = jitter;
        self
    }

    /// Sets the duplicate policy.
    pub fn with_duplicates(mut self, policy: DuplicatePolicy) -> Self {
        self.duplicates = policy;
        self
    }

    /// Draws colors from the full list.
    pub fn with_randomize_colors(mut self, randomize: bool) -> Self {
        self.randomize_colors = randomize;
        self
    }

    /// Sets the placement trial budget.
    pub fn with_max_trials(mut self, trials: usize) -> Self {
        self.max_trials = trials;
        self
    }

    /// Sets the restart budget for sampling pipelines.
    pub fn with_max_restarts(mut self, restarts: usize) -> Self {
        self.max_restarts = restarts;
        self
    }

    /// Sets the number of actions per transition.
    pub fn with_num_steps(mut self, steps: usize) -> Self {
        self.num_steps = steps;
        self
    }

    /// Sets the stack layout parameters for enumeration.
    pub fn with_stacks(mut self, max_stacks: usize, min_margin: f64, max_margin: f64) -> Self {
        self.max_stacks = max_stacks;
        self.min_margin = min_margin;
        self.max_margin = max_margin;
        self
    }

    /// Sets the wiggle multiplier.
    pub fn with_wiggle(mut self, wiggle: f64) -> Self {
        self.wiggle = wiggle;
        self
    }

    /// Applies the load-time color policy to a freshly loaded catalog.
    ///
    /// Unless colors are randomized, only the first `num_objects` colors are
    /// kept, in catalog order.
    pub fn prepare_catalog(&self, catalog: PropertyCatalog) -> Result<PropertyCatalog> {
        catalog.validate()?;
        if self.randomize_colors {
            Ok(catalog)
        } else {
            catalog.truncate_colors(self.num_objects)
        }
    }

    /// Checks that the parameters are usable.
    pub fn validate(&self) -> Result<()> {
        if self.num_objects == 0 {
            return Err(Error::ConfigError("num_objects must be at least 1".into()));
        }
        if self.table_size == 0 {
            return Err(Error::ConfigError("table_size must be at least 1".into()));
        }
        if !(self.object_jitter >= 0.0) {
            return Err(Error::ConfigError(format!(
                "object_jitter must be non-negative, got {}",
                self.object_jitter
            )));
        }
        if !(self.wiggle >= 0.0) {
            return Err(Error::ConfigError(format!(
                "wiggle must be non-negative, got {}",
                self.wiggle
            )));
        }
        if self.max_trials == 0 {
            return Err(Error::ConfigError("max_trials must be at least 1".into()));
        }
        if self.max_restarts == 0 {
            return Err(Error::ConfigError("max_restarts must be at least 1".into()));
        }
        if self.num_steps == 0 {
            return Err(Error::ConfigError("num_steps must be at least 1".into()));
        }
        if self.max_stacks == 0 {
            return Err(Error::ConfigError("max_stacks must be at least 1".into()));
        }
        if !(self.min_margin >= 0.0) || self.min_margin > self.max_margin {
            return Err(Error::ConfigError(format!(
                "stack margins must satisfy 0 <= min ({}) <= max ({})",
                self.min_margin, self.max_margin
            )));
        }
        Ok(())
    }
}
