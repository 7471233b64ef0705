//! Per-object and per-scene records handed to the renderer.

use crate::block::Block;
use crate::catalog::Rgba;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Renderer-facing description of one placed object.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ObjectRecord {
    /// Shape model identifier.
    pub shape: String,
    /// Radius.
    pub size: f64,
    /// Material identifier.
    pub material: String,
    /// Normalized RGBA color.
    pub color: Rgba,
    /// Rotation in degrees.
    pub rotation: f64,
    /// Center position (x, y, z).
    pub location: [f64; 3],
    /// Whether other objects may rest on this one.
    pub stackable: bool,
}

impl From<&Block> for ObjectRecord {
    fn from(block: &Block) -> Self {
        Self {
            shape: block.shape.clone(),
            size: block.size,
            material: block.material.clone(),
            color: block.color,
            rotation: block.rotation,
            location: block.location.to_array(),
            stackable: block.stackable,
        }
    }
}

/// Builds records for `blocks` ordered by block id.
pub fn records_by_id<'a>(blocks: impl IntoIterator<Item = &'a Block>) -> Vec<ObjectRecord> {
    let mut sorted: Vec<&Block> = blocks.into_iter().collect();
    sorted.sort_by_key(|b| b.id);
    sorted.into_iter().map(ObjectRecord::from).collect()
}

/// Ground truth for one rendered frame.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SceneRecord {
    /// Objects in block-id order.
    pub objects: Vec<ObjectRecord>,
    /// Name of the action that produced this scene, if any.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub action: Option<String>,
}

impl SceneRecord {
    /// Creates a scene from object records.
    pub fn new(objects: Vec<ObjectRecord>) -> Self {
        Self {
            objects,
            action: None,
        }
    }

    /// Sets the producing action's name.
    pub fn with_action(mut self, action: impl Into<String>) -> Self {
        self.action = Some(action.into());
        self
    }

    /// Number of objects.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Returns true if the scene has no objects.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::Location;
    use crate::catalog::ShapeEntry;

    fn block(id: usize, x: f64) -> Block {
        let shape = ShapeEntry {
            name: "cube".into(),
            model: "SmoothCube_v2".into(),
            stackable: true,
        };
        let mut b = Block::new(id, &shape, 0.35, "Rubber", [0.5, 0.5, 0.5, 1.0], 12.0);
        b.location = Location::new(x, 0.35);
        b
    }

    #[test]
    fn test_record_from_block() {
        let r = ObjectRecord::from(&block(3, 1.5));
        assert_eq!(r.shape, "SmoothCube_v2");
        assert_eq!(r.location, [1.5, 0.0, 0.35]);
        assert_eq!(r.material, "Rubber");
        assert!(r.stackable);
    }

    #[test]
    fn test_records_sorted_by_id() {
        let blocks = vec![block(2, 0.0), block(0, 1.0), block(1, 2.0)];
        let records = records_by_id(&blocks);
        let xs: Vec<f64> = records.iter().map(|r| r.location[0]).collect();
        assert_eq!(xs, vec![1.0, 2.0, 0.0]);
    }

    #[test]
    fn test_scene_record() {
        let scene = SceneRecord::new(records_by_id(&[block(0, 0.0)])).with_action("action_move");
        assert_eq!(scene.len(), 1);
        assert!(!scene.is_empty());
        assert_eq!(scene.action.as_deref(), Some("action_move"));
        assert!(SceneRecord::default().is_empty());
    }
}
