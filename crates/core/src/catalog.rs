//! Immutable property tables for block construction.
//!
//! A [`PropertyCatalog`] is built once (from code or from a properties file
//! parsed by the caller), adjusted at configuration time with
//! [`PropertyCatalog::truncate_colors`] / [`PropertyCatalog::shuffle_colors`],
//! and then shared read-only, typically behind an `Arc`.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::error::{Error, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// RGBA color with channels normalized to `[0, 1]`.
pub type Rgba = [f64; 4];

/// Converts an 8-bit RGB triple into an opaque normalized RGBA color.
pub fn rgb_to_rgba(rgb: [u8; 3]) -> Rgba {
    [
        f64::from(rgb[0]) / 255.0,
        f64::from(rgb[1]) / 255.0,
        f64::from(rgb[2]) / 255.0,
        1.0,
    ]
}

/// A shape entry: display name, renderer model identifier and whether
/// other blocks may rest on it.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ShapeEntry {
    /// Shape name (e.g. "cube").
    pub name: String,
    /// Model identifier handed to the renderer (e.g. "SmoothCube_v2").
    pub model: String,
    /// Whether other blocks can rest on top of this shape.
    pub stackable: bool,
}

/// A named catalog value.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Entry<T> {
    /// Entry name.
    pub name: String,
    /// Entry value.
    pub value: T,
}

impl<T> Entry<T> {
    fn new(name: impl Into<String>, value: T) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

/// Lookup tables for shapes, sizes, materials and colors.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PropertyCatalog {
    shapes: Vec<ShapeEntry>,
    sizes: Vec<Entry<f64>>,
    materials: Vec<Entry<String>>,
    colors: Vec<Entry<Rgba>>,
}

impl PropertyCatalog {
    /// Starts building a catalog.
    pub fn builder() -> CatalogBuilder {
        CatalogBuilder::default()
    }

    /// The standard CLEVR property set (3 shapes, 2 sizes, 2 materials, 8 colors).
    pub fn clevr() -> Self {
        Self {
            shapes: vec![
                ShapeEntry {
                    name: "cube".into(),
                    model: "SmoothCube_v2".into(),
                    stackable: true,
                },
                ShapeEntry {
                    name: "sphere".into(),
                    model: "Sphere".into(),
                    stackable: false,
                },
                ShapeEntry {
                    name: "cylinder".into(),
                    model: "SmoothCylinder".into(),
                    stackable: true,
                },
            ],
            sizes: vec![Entry::new("large", 0.7), Entry::new("small", 0.35)],
            materials: vec![
                Entry::new("rubber", "Rubber".to_string()),
                Entry::new("metal", "MyMetal".to_string()),
            ],
            colors: vec![
                Entry::new("gray", rgb_to_rgba([87, 87, 87])),
                Entry::new("red", rgb_to_rgba([173, 35, 35])),
                Entry::new("blue", rgb_to_rgba([42, 75, 215])),
                Entry::new("green", rgb_to_rgba([29, 105, 20])),
                Entry::new("brown", rgb_to_rgba([129, 74, 25])),
                Entry::new("purple", rgb_to_rgba([129, 38, 192])),
                Entry::new("cyan", rgb_to_rgba([41, 208, 208])),
                Entry::new("yellow", rgb_to_rgba([255, 238, 51])),
            ],
        }
    }

    /// Returns the shape entries.
    pub fn shapes(&self) -> &[ShapeEntry] {
        &self.shapes
    }

    /// Returns the size entries.
    pub fn sizes(&self) -> &[Entry<f64>] {
        &self.sizes
    }

    /// Returns the material entries.
    pub fn materials(&self) -> &[Entry<String>] {
        &self.materials
    }

    /// Returns the color entries.
    pub fn colors(&self) -> &[Entry<Rgba>] {
        &self.colors
    }

    /// Material identifiers in catalog order.
    pub fn material_ids(&self) -> impl Iterator<Item = &str> + '_ {
        self.materials.iter().map(|m| m.value.as_str())
    }

    /// Looks up the stackable flag of a shape by name or model identifier.
    pub fn is_stackable(&self, shape: &str) -> Option<bool> {
        self.shapes
            .iter()
            .find(|s| s.name == shape || s.model == shape)
            .map(|s| s.stackable)
    }

    /// Conservative per-object footprint: the largest size in the catalog.
    pub fn unit(&self) -> f64 {
        self.sizes
            .iter()
            .map(|s| s.value)
            .fold(0.0_f64, f64::max)
    }

    /// Draws a shape uniformly at random.
    pub fn random_shape<R: Rng + ?Sized>(&self, rng: &mut R) -> &ShapeEntry {
        &self.shapes[rng.gen_range(0..self.shapes.len())]
    }

    /// Draws a size uniformly at random.
    pub fn random_size<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        self.sizes[rng.gen_range(0..self.sizes.len())].value
    }

    /// Draws a material identifier uniformly at random.
    pub fn random_material<R: Rng + ?Sized>(&self, rng: &mut R) -> &str {
        &self.materials[rng.gen_range(0..self.materials.len())].value
    }

    /// Draws a color uniformly at random.
    pub fn random_color<R: Rng + ?Sized>(&self, rng: &mut R) -> Rgba {
        self.colors[rng.gen_range(0..self.colors.len())].value
    }

    /// Keeps only the first `n` colors in catalog order.
    ///
    /// Used when each object should get its own color in a fixed order.
    /// Fails if fewer than one color would remain.
    pub fn truncate_colors(mut self, n: usize) -> Result<Self> {
        if n == 0 {
            return Err(Error::InvalidCatalog(
                "cannot truncate the color list to zero entries".into(),
            ));
        }
        self.colors.truncate(n);
        Ok(self)
    }

    /// Shuffles the color list once.
    pub fn shuffle_colors<R: Rng + ?Sized>(mut self, rng: &mut R) -> Self {
        self.colors.shuffle(rng);
        self
    }

    /// Checks that every table is non-empty and every size is positive.
    pub fn validate(&self) -> Result<()> {
        if self.shapes.is_empty() {
            return Err(Error::InvalidCatalog("no shapes defined".into()));
        }
        if self.sizes.is_empty() {
            return Err(Error::InvalidCatalog("no sizes defined".into()));
        }
        if self.materials.is_empty() {
            return Err(Error::InvalidCatalog("no materials defined".into()));
        }
        if self.colors.is_empty() {
            return Err(Error::InvalidCatalog("no colors defined".into()));
        }

        for size in &self.sizes {
            if !(size.value > 0.0) || !size.value.is_finite() {
                return Err(Error::InvalidCatalog(format!(
                    "size '{}' must be positive, got {}",
                    size.name, size.value
                )));
            }
        }

        for color in &self.colors {
            if color.value.iter().any(|c| !(0.0..=1.0).contains(c)) {
                return Err(Error::InvalidCatalog(format!(
                    "color '{}' has channels outside [0, 1]",
                    color.name
                )));
            }
        }

        Ok(())
    }
}

/// Builder for [`PropertyCatalog`].
#[derive(Debug, Default)]
pub struct CatalogBuilder {
    shapes: Vec<ShapeEntry>,
    sizes: Vec<Entry<f64>>,
    materials: Vec<Entry<String>>,
    colors: Vec<Entry<Rgba>>,
}

impl CatalogBuilder {
    /// Adds a shape.
    pub fn shape(
        mut self,
        name: impl Into<String>,
        model: impl Into<String>,
        stackable: bool,
    ) -> Self {
        self.shapes.push(ShapeEntry {
            name: name.into(),
            model: model.into(),
            stackable,
        });
        self
    }

    /// Adds a size (radius).
    pub fn size(mut self, name: impl Into<String>, radius: f64) -> Self {
        self.sizes.push(Entry::new(name, radius));
        self
    }

    /// Adds a material.
    pub fn material(mut self, name: impl Into<String>, id: impl Into<String>) -> Self {
        self.materials.push(Entry::new(name, id.into()));
        self
    }

    /// Adds a normalized color.
    pub fn color(mut self, name: impl Into<String>, rgba: Rgba) -> Self {
        self.colors.push(Entry::new(name, rgba));
        self
    }

    /// Adds an 8-bit RGB color.
    pub fn color_rgb(self, name: impl Into<String>, rgb: [u8; 3]) -> Self {
        self.color(name, rgb_to_rgba(rgb))
    }

    /// Finishes the catalog, validating it.
    pub fn build(self) -> Result<PropertyCatalog> {
        let catalog = PropertyCatalog {
            shapes: self.shapes,
            sizes: self.sizes,
            materials: self.materials,
            colors: self.colors,
        };
        catalog.validate()?;
        Ok(catalog)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_clevr_catalog_is_valid() {
        let catalog = PropertyCatalog::clevr();
        assert!(catalog.validate().is_ok());
        assert_eq!(catalog.shapes().len(), 3);
        assert_relative_eq!(catalog.unit(), 0.7);
        assert_eq!(catalog.is_stackable("sphere"), Some(false));
        assert_eq!(catalog.is_stackable("SmoothCube_v2"), Some(true));
        assert_eq!(catalog.is_stackable("cone"), None);
    }

    #[test]
    fn test_rgb_normalization() {
        let c = rgb_to_rgba([255, 0, 51]);
        assert_relative_eq!(c[0], 1.0);
        assert_relative_eq!(c[1], 0.0);
        assert_relative_eq!(c[2], 0.2);
        assert_relative_eq!(c[3], 1.0);
    }

    #[test]
    fn test_builder_validation() {
        let empty = PropertyCatalog::builder().build();
        assert!(empty.is_err());

        let bad_size = PropertyCatalog::builder()
            .shape("cube", "Cube", true)
            .size("neg", -1.0)
            .material("rubber", "Rubber")
            .color_rgb("red", [255, 0, 0])
            .build();
        assert!(matches!(bad_size, Err(Error::InvalidCatalog(_))));

        let ok = PropertyCatalog::builder()
            .shape("cube", "Cube", true)
            .size("small", 0.35)
            .material("rubber", "Rubber")
            .color_rgb("red", [255, 0, 0])
            .build();
        assert!(ok.is_ok());
    }

    #[test]
    fn test_truncate_keeps_file_order() {
        let catalog = PropertyCatalog::clevr().truncate_colors(3).unwrap();
        let names: Vec<_> = catalog.colors().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["gray", "red", "blue"]);

        assert!(PropertyCatalog::clevr().truncate_colors(0).is_err());
        assert_eq!(
            PropertyCatalog::clevr().truncate_colors(100).unwrap().colors().len(),
            8
        );
    }

    #[test]
    fn test_shuffle_preserves_colors() {
        let mut rng = StdRng::seed_from_u64(7);
        let shuffled = PropertyCatalog::clevr().shuffle_colors(&mut rng);
        let mut names: Vec<_> = shuffled.colors().iter().map(|c| c.name.clone()).collect();
        names.sort();
        let mut expected: Vec<_> = PropertyCatalog::clevr()
            .colors()
            .iter()
            .map(|c| c.name.clone())
            .collect();
        expected.sort();
        assert_eq!(names, expected);
    }

    #[test]
    fn test_random_draws_come_from_catalog() {
        let catalog = PropertyCatalog::clevr();
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..100 {
            let size = catalog.random_size(&mut rng);
            assert!(catalog.sizes().iter().any(|s| s.value == size));
            let material = catalog.random_material(&mut rng).to_string();
            assert!(catalog.material_ids().any(|m| m == material));
        }
    }
}
