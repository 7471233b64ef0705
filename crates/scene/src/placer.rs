//! Rejection-sampling placement of a single block.
//!
//! A block is dropped on a randomly chosen table slot and rests on the
//! highest block beneath it. A trial is rejected as soon as the block would
//! overlap a non-stackable block or hang over the edge of a supporter.

use std::f64::consts::PI;

use rand::Rng;

use blockworld_core::{Block, Error, PropertyCatalog, Result};

use crate::table::Table;

/// Trials per placement before the block is declared unstackable.
pub const DEFAULT_MAX_TRIALS: usize = 100;

/// Draws from a zero-mean normal distribution (Box-Muller).
///
/// Returns exactly 0 when `std_dev` is not positive, so a zero-jitter
/// configuration consumes no randomness for the perturbation.
pub fn sample_gaussian<R: Rng + ?Sized>(rng: &mut R, std_dev: f64) -> f64 {
    if !(std_dev > 0.0) {
        return 0.0;
    }
    let u1: f64 = rng.gen_range(f64::EPSILON..1.0);
    let u2: f64 = rng.gen();
    std_dev * (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos()
}

/// Blocks of `others` that `block` sits above. `block` itself is skipped by id.
pub fn objects_below<'a>(
    block: &'a Block,
    others: &'a [Block],
) -> impl Iterator<Item = &'a Block> + 'a {
    others
        .iter()
        .filter(move |other| other.id != block.id && block.is_above(other))
}

/// The highest block below `block`, or `None` if it stands on the table.
///
/// On equal heights the first block in `others` wins.
pub fn object_just_below<'a>(block: &'a Block, others: &'a [Block]) -> Option<&'a Block> {
    objects_below(block, others).fold(None, |best: Option<&Block>, candidate| match best {
        Some(current) if current.z() >= candidate.z() => Some(current),
        _ => Some(candidate),
    })
}

/// Places blocks on a [`Table`] by bounded rejection sampling.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlockPlacer {
    /// Footprint unit: the largest size in the catalog.
    unit: f64,
    table: Table,
    max_trials: usize,
}

impl BlockPlacer {
    /// Creates a placer for blocks drawn from `catalog`.
    pub fn new(catalog: &PropertyCatalog, table: Table) -> Self {
        Self {
            unit: catalog.unit(),
            table,
            max_trials: DEFAULT_MAX_TRIALS,
        }
    }

    /// Sets the trial budget.
    pub fn with_max_trials(mut self, trials: usize) -> Self {
        self.max_trials = trials;
        self
    }

    /// Returns the footprint unit.
    pub fn unit(&self) -> f64 {
        self.unit
    }

    /// Returns the table.
    pub fn table(&self) -> &Table {
        &self.table
    }

    /// Returns the trial budget.
    pub fn max_trials(&self) -> usize {
        self.max_trials
    }

    /// Draws a candidate x: a uniform slot plus Gaussian jitter.
    fn candidate_x<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        let slot = rng.gen_range(0..self.table.size().max(1));
        let x = self.table.slot_x(slot, self.unit);
        x + sample_gaussian(rng, self.table.object_jitter() * self.unit)
    }

    /// Height of the surface `block` would rest on at its current x.
    ///
    /// Returns `None` if an overlapping block cannot carry it.
    fn support_height(block: &Block, placed: &[Block]) -> Option<f64> {
        let mut height = 0.0_f64;
        for other in placed.iter().filter(|o| o.overlaps(block)) {
            if !other.stackable || !block.stable_on(other) {
                return None;
            }
            height = height.max(other.top());
        }
        Some(height)
    }

    /// Assigns `block` a location that is plausible with respect to `placed`.
    ///
    /// With `force_change`, a trial is also rejected when the block would end
    /// up on the same supporter (or on the table again) as before. On failure
    /// the block keeps its previous location and [`Error::Unstackable`] is
    /// returned; callers should discard the whole state rather than retry.
    pub fn place<R: Rng + ?Sized>(
        &self,
        block: &mut Block,
        placed: &[Block],
        force_change: bool,
        rng: &mut R,
    ) -> Result<()> {
        let original = block.location;
        let previous_support = if force_change {
            object_just_below(block, placed).map(|b| b.id)
        } else {
            None
        };

        for trial in 1..=self.max_trials {
            block.location.x = self.candidate_x(rng);
            block.location.y = 0.0;

            let Some(height) = Self::support_height(block, placed) else {
                continue;
            };
            block.location.z = height + block.size;

            if force_change {
                let support = object_just_below(block, placed).map(|b| b.id);
                if support == previous_support {
                    continue;
                }
            }

            if trial > 1 {
                log::debug!("block #{} placed after {} trials", block.id, trial);
            }
            return Ok(());
        }

        log::debug!(
            "block #{} unstackable after {} trials",
            block.id,
            self.max_trials
        );
        block.location = original;
        Err(Error::Unstackable {
            trials: self.max_trials,
        })
    }
}
