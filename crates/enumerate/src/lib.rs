//! # Blockworld Enumerate
//!
//! Exhaustive enumeration of the block-world state space for a fixed object
//! set.
//!
//! Objects are assigned to the fixed-position stacks of a [`StackLayout`]
//! with every material, reduced to a [`CanonicalKey`] and deduplicated.
//! [`SuccessorEnumerator`] lists the one-step neighbors of an assignment and
//! [`StateSpace`] ties both into the complete transition graph.

pub mod assignment;
pub mod enumerator;
pub mod key;
pub mod layout;
pub mod space;
pub mod successor;

// Re-exports
pub use assignment::StackAssignment;
pub use enumerator::{initial_objects, Distinct, StackEnumerator};
pub use key::{CanonicalKey, KeyEntry};
pub use layout::StackLayout;
pub use space::{ExploreMode, StateSpace, StateTransition};
pub use successor::{StackAction, Successor, SuccessorEnumerator};
pub use blockworld_core::{Block, Error, Result};
