//! Inputs of one exhaustive enumeration run.

use blockworld_core::{Block, GenerationConfig, PropertyCatalog, Result};
use blockworld_enumerate::{initial_objects, StackLayout};
use rand::Rng;

/// Object set, stack layout and material ids for [`StateSpace::explore`].
///
/// [`StateSpace::explore`]: blockworld_enumerate::StateSpace::explore
#[derive(Debug, Clone)]
pub struct EnumerationSetup {
    /// Objects to distribute, material left unset.
    pub objects: Vec<Block>,
    /// Stack positions.
    pub layout: StackLayout,
    /// Material ids the enumerator assigns.
    pub materials: Vec<String>,
}

impl EnumerationSetup {
    /// Draws the object set from the full color list of `catalog`.
    ///
    /// Unlike sampling, enumeration never truncates colors to the object count.
    pub fn draw<R: Rng + ?Sized>(
        catalog: &PropertyCatalog,
        config: &GenerationConfig,
        rng: &mut R,
    ) -> Result<Self> {
        config.validate()?;
        catalog.validate()?;
        let objects = initial_objects(catalog, config.num_objects, config.duplicates, rng)?;
        let layout = StackLayout::from_config(config, rng)?;
        let materials = catalog.material_ids().map(str::to_string).collect();
        Ok(Self {
            objects,
            layout,
            materials,
        })
    }
}
