//! The table: a line of evenly spaced candidate slots.

use blockworld_core::{Error, GenerationConfig, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The 1-D table blocks are placed on.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Table {
    /// Number of discrete candidate x-slots.
    size: usize,

    /// Jitter standard deviation, in units of the largest block size.
    object_jitter: f64,
}

impl Table {
    /// Creates a table with `size` slots and no jitter.
    pub fn new(size: usize) -> Self {
        Self {
            size,
            object_jitter: 0.0,
        }
    }

    /// Creates the table described by a generation config.
    pub fn from_config(config: &GenerationConfig) -> Self {
        Self::new(config.table_size).with_jitter(config.object_jitter)
    }

    /// Sets the slot jitter multiplier.
    pub fn with_jitter(mut self, jitter: f64) -> Self {
        self.object_jitter = jitter;
        self
    }

    /// Returns the number of slots.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Returns the jitter multiplier.
    pub fn object_jitter(&self) -> f64 {
        self.object_jitter
    }

    /// Total width spanned by the slots for a given footprint unit.
    pub fn span(&self, unit: f64) -> f64 {
        unit * 2.0 * self.size as f64
    }

    /// Center of slot `index`, slots spread evenly over `[-span/2, span/2]`.
    ///
    /// A single-slot table has its only slot at the origin.
    pub fn slot_x(&self, index: usize, unit: f64) -> f64 {
        if self.size <= 1 {
            return 0.0;
        }
        let t = index as f64 / (self.size - 1) as f64;
        self.span(unit) * (t - 0.5)
    }

    /// Checks that the table is usable.
    pub fn validate(&self) -> Result<()> {
        if self.size == 0 {
            return Err(Error::ConfigError("table must have at least one slot".into()));
        }
        if !(self.object_jitter >= 0.0) {
            return Err(Error::ConfigError(format!(
                "object jitter must be non-negative, got {}",
                self.object_jitter
            )));
        }
        Ok(())
    }
}
