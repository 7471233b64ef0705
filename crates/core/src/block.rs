//! Block types and the geometric predicates they are stacked with.
//!
//! Blocks live on a 1-D table line: `x` is the horizontal center, `y` is
//! always 0 and `z` is the vertical center. A block spans
//! `[x - size, x + size]` horizontally and `[z - size, z + size]` vertically.

use rand::Rng;

use crate::catalog::{PropertyCatalog, Rgba, ShapeEntry};
use crate::error::{Error, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Number of redraws allowed per block before duplicate rejection gives up.
pub const MAX_DRAW_ATTEMPTS: usize = 1000;

/// Position of a block's center.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Location {
    /// Horizontal position along the table.
    pub x: f64,
    /// Depth; always 0.
    pub y: f64,
    /// Height of the center above the table.
    pub z: f64,
}

impl Location {
    /// Creates a location on the table line.
    pub fn new(x: f64, z: f64) -> Self {
        Self { x, y: 0.0, z }
    }

    /// Returns the coordinates as an array.
    pub fn to_array(self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }
}

/// One object of a scene.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Block {
    /// Distinguishes blocks that are otherwise attribute-identical.
    pub id: usize,
    /// Shape model identifier.
    pub shape: String,
    /// Radius (half-extent).
    pub size: f64,
    /// Material identifier.
    pub material: String,
    /// Normalized RGBA color.
    pub color: Rgba,
    /// Rotation around the vertical axis in degrees. Cosmetic only.
    pub rotation: f64,
    /// Whether other blocks may rest on this one.
    pub stackable: bool,
    /// Current center position.
    pub location: Location,
}

impl Block {
    /// Creates an unplaced block.
    pub fn new(
        id: usize,
        shape: &ShapeEntry,
        size: f64,
        material: impl Into<String>,
        color: Rgba,
        rotation: f64,
    ) -> Self {
        Self {
            id,
            shape: shape.model.clone(),
            size,
            material: material.into(),
            color,
            rotation,
            stackable: shape.stackable,
            location: Location::default(),
        }
    }

    /// Draws one entry from each catalog table and a uniform rotation.
    pub fn random<R: Rng + ?Sized>(id: usize, catalog: &PropertyCatalog, rng: &mut R) -> Self {
        let shape = catalog.random_shape(rng);
        let color = catalog.random_color(rng);
        let size = catalog.random_size(rng);
        let material = catalog.random_material(rng).to_string();
        let rotation = 360.0 * rng.gen::<f64>();
        Self::new(id, shape, size, material, color, rotation)
    }

    /// Horizontal center.
    pub fn x(&self) -> f64 {
        self.location.x
    }

    /// Vertical center.
    pub fn z(&self) -> f64 {
        self.location.z
    }

    /// Lowest point of the block.
    pub fn bottom(&self) -> f64 {
        self.location.z - self.size
    }

    /// Highest point of the block; where a block resting on it starts.
    pub fn top(&self) -> f64 {
        self.location.z + self.size
    }

    /// True if the horizontal extents of the two blocks overlap.
    pub fn overlaps(&self, other: &Block) -> bool {
        (self.x() - other.x()).abs() < self.size + other.size
    }

    /// True if this block's center lies within `other`'s half-extent.
    pub fn stable_on(&self, other: &Block) -> bool {
        (self.x() - other.x()).abs() < other.size
    }

    /// True if this block overlaps `other` and sits strictly higher.
    pub fn is_above(&self, other: &Block) -> bool {
        self.overlaps(other) && self.z() > other.z()
    }
}

/// Named comparison strategies for blocks.
///
/// Different pipelines need different notions of "the same block", so the
/// comparison is chosen explicitly instead of through `PartialEq`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum BlockEquality {
    /// Same `id`.
    Identity,
    /// Same color, size and material (shape ignored).
    Similar,
    /// Same shape, size and color (material ignored).
    Appearance,
}

impl BlockEquality {
    /// Compares two blocks under this strategy.
    pub fn matches(self, a: &Block, b: &Block) -> bool {
        match self {
            BlockEquality::Identity => a.id == b.id,
            BlockEquality::Similar => {
                a.color == b.color && a.size == b.size && a.material == b.material
            }
            BlockEquality::Appearance => {
                a.shape == b.shape && a.size == b.size && a.color == b.color
            }
        }
    }

    /// Compares two optional blocks. Two `None`s are equal.
    pub fn matches_opt(self, a: Option<&Block>, b: Option<&Block>) -> bool {
        match (a, b) {
            (None, None) => true,
            (Some(a), Some(b)) => self.matches(a, b),
            _ => false,
        }
    }
}

/// How freshly drawn blocks are checked against the ones drawn before them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum DuplicatePolicy {
    /// Accept every draw.
    Allow,
    /// Redraw while the candidate matches an earlier block.
    Reject(BlockEquality),
}

impl Default for DuplicatePolicy {
    fn default() -> Self {
        DuplicatePolicy::Reject(BlockEquality::Similar)
    }
}

impl DuplicatePolicy {
    /// True if `candidate` must be redrawn.
    pub fn rejects(self, candidate: &Block, existing: &[Block]) -> bool {
        match self {
            DuplicatePolicy::Allow => false,
            DuplicatePolicy::Reject(eq) => existing.iter().any(|b| eq.matches(candidate, b)),
        }
    }
}

/// Draws `count` blocks with ids `0..count`, redrawing duplicates per `policy`.
pub fn draw_blocks<R: Rng + ?Sized>(
    catalog: &PropertyCatalog,
    count: usize,
    policy: DuplicatePolicy,
    rng: &mut R,
) -> Result<Vec<Block>> {
    let mut blocks: Vec<Block> = Vec::with_capacity(count);
    for index in 0..count {
        let mut attempts = 0;
        let block = loop {
            let candidate = Block::random(index, catalog, rng);
            attempts += 1;
            if !policy.rejects(&candidate, &blocks) {
                break candidate;
            }
            log::debug!("duplicate block #{index} rejected (attempt {attempts})");
            if attempts >= MAX_DRAW_ATTEMPTS {
                return Err(Error::DuplicateExhausted { index, attempts });
            }
        };
        blocks.push(block);
    }
    Ok(blocks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn cube(id: usize, x: f64, z: f64, size: f64) -> Block {
        let shape = ShapeEntry {
            name: "cube".into(),
            model: "Cube".into(),
            stackable: true,
        };
        let mut b = Block::new(id, &shape, size, "Rubber", [1.0, 0.0, 0.0, 1.0], 0.0);
        b.location = Location::new(x, z);
        b
    }

    #[test]
    fn test_extents() {
        let b = cube(0, 1.0, 0.5, 0.5);
        assert_relative_eq!(b.bottom(), 0.0);
        assert_relative_eq!(b.top(), 1.0);
        assert_eq!(b.location.to_array(), [1.0, 0.0, 0.5]);
    }

    #[test]
    fn test_overlap_and_stable_on() {
        let base = cube(0, 0.0, 0.5, 0.5);
        let near = cube(1, 0.4, 1.5, 0.35);
        let edge = cube(2, 0.8, 1.5, 0.35);
        let far = cube(3, 0.85, 0.35, 0.35);

        assert!(near.overlaps(&base));
        assert!(near.stable_on(&base));
        assert!(near.is_above(&base));

        assert!(edge.overlaps(&base));
        assert!(!edge.stable_on(&base));

        // Touching extents are not an overlap.
        assert!(!far.overlaps(&base));
        assert!(!base.is_above(&near));
    }

    #[test]
    fn test_equality_strategies() {
        let a = cube(0, 0.0, 0.0, 0.5);
        let mut b = cube(1, 3.0, 0.0, 0.5);
        assert!(!BlockEquality::Identity.matches(&a, &b));
        assert!(BlockEquality::Similar.matches(&a, &b));
        assert!(BlockEquality::Appearance.matches(&a, &b));

        b.material = "Metal".into();
        assert!(!BlockEquality::Similar.matches(&a, &b));
        assert!(BlockEquality::Appearance.matches(&a, &b));

        b.shape = "Sphere".into();
        assert!(!BlockEquality::Appearance.matches(&a, &b));

        assert!(BlockEquality::Identity.matches_opt(None, None));
        assert!(!BlockEquality::Identity.matches_opt(Some(&a), None));
    }

    #[test]
    fn test_draw_blocks_rejects_similar() {
        let catalog = PropertyCatalog::clevr();
        let mut rng = StdRng::seed_from_u64(42);
        let blocks = draw_blocks(&catalog, 6, DuplicatePolicy::default(), &mut rng).unwrap();
        assert_eq!(blocks.len(), 6);
        for (i, a) in blocks.iter().enumerate() {
            assert_eq!(a.id, i);
            for b in &blocks[i + 1..] {
                assert!(!BlockEquality::Similar.matches(a, b));
            }
        }
    }

    #[test]
    fn test_draw_blocks_exhausts_on_tiny_catalog() {
        let catalog = PropertyCatalog::builder()
            .shape("cube", "Cube", true)
            .size("small", 0.35)
            .material("rubber", "Rubber")
            .color_rgb("red", [255, 0, 0])
            .build()
            .unwrap();
        let mut rng = StdRng::seed_from_u64(0);

        let err = draw_blocks(&catalog, 2, DuplicatePolicy::default(), &mut rng).unwrap_err();
        assert!(matches!(err, Error::DuplicateExhausted { index: 1, .. }));

        let blocks = draw_blocks(&catalog, 2, DuplicatePolicy::Allow, &mut rng).unwrap();
        assert_eq!(blocks.len(), 2);
    }

    #[test]
    fn test_stackable_copied_from_shape() {
        let catalog = PropertyCatalog::clevr();
        let mut rng = StdRng::seed_from_u64(3);
        for i in 0..50 {
            let b = Block::random(i, &catalog, &mut rng);
            assert_eq!(catalog.is_stackable(&b.shape), Some(b.stackable));
            assert!((0.0..360.0).contains(&b.rotation));
        }
    }
}
