//! # Blockworld Scene
//!
//! Randomized block placement and scene actions for the block-world
//! generator.
//!
//! A [`State`] is drawn from a shared [`PropertyCatalog`], shuffled onto a
//! [`Table`] by the [`BlockPlacer`], and changed through the actions of an
//! [`ActionModel`]. [`TransitionSampler`] wraps this into the sampling
//! pipeline, restarting from a fresh state whenever a placement is
//! `Unstackable`.

pub mod action;
pub mod placer;
pub mod sampler;
pub mod state;
pub mod table;

// Re-exports
pub use action::{ActionKind, ActionModel};
pub use placer::{object_just_below, objects_below, BlockPlacer, DEFAULT_MAX_TRIALS};
pub use sampler::{Problem, Transition, TransitionSampler};
pub use state::{State, StateSnapshot};
pub use table::Table;
pub use blockworld_core::{Block, Error, GenerationConfig, PropertyCatalog, Result};
