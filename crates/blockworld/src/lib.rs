//! # Blockworld
//!
//! Block-world scene generator for visual reasoning datasets.
//!
//! This crate provides:
//! - **Sampling**: physically plausible random scenes and the transitions
//!   produced by moving a top block or changing its material
//! - **Enumeration**: every distinct stack configuration of a fixed object
//!   set and every one-step transition between them
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use blockworld::core::{GenerationConfig, PropertyCatalog};
//! use blockworld::scene::TransitionSampler;
//! use rand::SeedableRng;
//!
//! let config = GenerationConfig::new().with_num_objects(4);
//! let sampler = TransitionSampler::new(PropertyCatalog::clevr(), config)?;
//! let mut rng = rand::rngs::StdRng::seed_from_u64(0);
//! let transition = sampler.sample_transition(&mut rng)?;
//! println!("{}", transition.action_name());
//! ```
//!
//! ## Feature Flags
//!
//! - `scene` (default): random placement and actions
//! - `enumerate` (default): exhaustive state-space enumeration
//! - `serde`: Serialization support

/// Catalog, blocks, configuration and records.
pub use blockworld_core as core;

/// Random placement, state and actions.
#[cfg(feature = "scene")]
pub use blockworld_scene as scene;

/// Exhaustive enumeration.
#[cfg(feature = "enumerate")]
pub use blockworld_enumerate as enumerate;

// Re-export commonly used types at root level
pub use blockworld_core::{
    Block, BlockEquality, DuplicatePolicy, Error, GenerationConfig, PropertyCatalog, Result,
    SceneRecord,
};
