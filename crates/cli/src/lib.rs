//! Block-world command-line support.
//!
//! This crate provides:
//! - Property catalog loading from CLEVR-style JSON
//! - JSON output of sampled transitions and enumerated state spaces
//! - Object sets for enumeration runs
//! - Reloading stored transitions to render more samples of them

mod enumeration;
mod output;
mod properties;

pub use enumeration::EnumerationSetup;
pub use output::{
    load_json, load_or_sample, numbered, save_json, OutputError, SampleFile, SnapshotFile,
    StateSpaceFile, TransitionEntry,
};
pub use properties::{PropertiesError, PropertiesParser};
