//! # Blockworld Core
//!
//! Shared types for the block-world scene generator.
//!
//! ## Core Components
//!
//! - **Catalog**: `PropertyCatalog`, the immutable shape/size/material/color tables
//! - **Blocks**: `Block`, its geometric predicates and the `BlockEquality` strategies
//! - **Configuration**: `GenerationConfig` for the sampling and enumeration pipelines
//! - **Records**: `ObjectRecord` / `SceneRecord`, the renderer-facing output
//!
//! ## Feature Flags
//!
//! - `serde`: Enable serialization/deserialization support

pub mod block;
pub mod catalog;
pub mod config;
pub mod error;
pub mod record;

// Re-exports
pub use block::{draw_blocks, Block, BlockEquality, DuplicatePolicy, Location};
pub use catalog::{rgb_to_rgba, CatalogBuilder, Entry, PropertyCatalog, Rgba, ShapeEntry};
pub use config::GenerationConfig;
pub use error::{Error, Result};
pub use record::{records_by_id, ObjectRecord, SceneRecord};
