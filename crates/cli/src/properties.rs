//! Property catalog loading from CLEVR-style JSON files.

use std::fs;
use std::path::Path;

use blockworld_core::PropertyCatalog;
use indexmap::IndexMap;
use serde::Deserialize;
use thiserror::Error;

/// Errors that can occur when loading a properties file.
#[derive(Debug, Error)]
pub enum PropertiesError {
    #[error("Failed to read file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Invalid properties format: {0}")]
    InvalidFormat(String),

    #[error("Invalid catalog: {0}")]
    Catalog(#[from] blockworld_core::Error),
}

/// Parser for properties files.
///
/// Tables keep their file order, which decides which colors survive
/// truncation to the object count.
#[derive(Debug, Default)]
pub struct PropertiesParser;

impl PropertiesParser {
    /// Creates a new parser.
    pub fn new() -> Self {
        Self
    }

    /// Parses a catalog from a JSON file.
    pub fn parse_file(&self, path: impl AsRef<Path>) -> Result<PropertyCatalog, PropertiesError> {
        let content = fs::read_to_string(path)?;
        self.parse_json(&content)
    }

    /// Parses a catalog from a JSON string.
    pub fn parse_json(&self, json: &str) -> Result<PropertyCatalog, PropertiesError> {
        let raw: RawProperties = serde_json::from_str(json)?;
        self.convert_raw_properties(raw)
    }

    fn convert_raw_properties(&self, raw: RawProperties) -> Result<PropertyCatalog, PropertiesError> {
        let mut builder = PropertyCatalog::builder();

        for (name, model) in raw.shapes {
            let stackable = match raw.stackable.get(&name) {
                Some(0) => false,
                Some(1) => true,
                Some(other) => {
                    return Err(PropertiesError::InvalidFormat(format!(
                        "stackable flag for '{name}' must be 0 or 1, got {other}"
                    )))
                }
                None => {
                    return Err(PropertiesError::InvalidFormat(format!(
                        "no stackable flag for shape '{name}'"
                    )))
                }
            };
            builder = builder.shape(name, model, stackable);
        }
        for (name, radius) in raw.sizes {
            builder = builder.size(name, radius);
        }
        for (name, id) in raw.materials {
            builder = builder.material(name, id);
        }
        for (name, rgb) in raw.colors {
            builder = builder.color_rgb(name, rgb);
        }

        Ok(builder.build()?)
    }
}

#[derive(Debug, Deserialize)]
struct RawProperties {
    shapes: IndexMap<String, String>,
    colors: IndexMap<String, [u8; 3]>,
    materials: IndexMap<String, String>,
    sizes: IndexMap<String, f64>,
    stackable: IndexMap<String, u8>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const CLEVR: &str = r#"{
        "shapes": {"cube": "SmoothCube_v2", "sphere": "Sphere", "cylinder": "SmoothCylinder"},
        "colors": {
            "gray": [87, 87, 87],
            "red": [173, 35, 35],
            "blue": [42, 75, 215]
        },
        "materials": {"rubber": "Rubber", "metal": "MyMetal"},
        "sizes": {"large": 0.7, "small": 0.35},
        "stackable": {"cube": 1, "sphere": 0, "cylinder": 1}
    }"#;

    #[test]
    fn test_parse_clevr_properties() {
        let catalog = PropertiesParser::new().parse_json(CLEVR).unwrap();

        assert_eq!(catalog.shapes().len(), 3);
        assert_eq!(catalog.is_stackable("sphere"), Some(false));
        assert_eq!(catalog.is_stackable("SmoothCube_v2"), Some(true));
        assert_relative_eq!(catalog.unit(), 0.7);

        let materials: Vec<&str> = catalog.material_ids().collect();
        assert_eq!(materials, vec!["Rubber", "MyMetal"]);
    }

    #[test]
    fn test_colors_keep_file_order() {
        let catalog = PropertiesParser::new().parse_json(CLEVR).unwrap();
        let names: Vec<&str> = catalog.colors().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["gray", "red", "blue"]);
        assert_relative_eq!(catalog.colors()[1].value[0], 173.0 / 255.0);
        assert_relative_eq!(catalog.colors()[1].value[3], 1.0);
    }

    #[test]
    fn test_missing_stackable_flag() {
        let json = CLEVR.replace(r#""sphere": 0, "#, "");
        let err = PropertiesParser::new().parse_json(&json).unwrap_err();
        assert!(matches!(err, PropertiesError::InvalidFormat(_)));
    }

    #[test]
    fn test_empty_table_rejected() {
        let json = CLEVR.replace(r#"{"rubber": "Rubber", "metal": "MyMetal"}"#, "{}");
        let err = PropertiesParser::new().parse_json(&json).unwrap_err();
        assert!(matches!(err, PropertiesError::Catalog(_)));
    }

    #[test]
    fn test_malformed_json() {
        let err = PropertiesParser::new().parse_json("{").unwrap_err();
        assert!(matches!(err, PropertiesError::JsonError(_)));
    }
}
