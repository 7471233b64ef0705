//! Order-independent fingerprints of configurations.

use blockworld_core::Block;

/// Bit pattern of `v`, with both zeros mapped to the same value.
fn exact_bits(v: f64) -> u64 {
    if v == 0.0 {
        0
    } else {
        v.to_bits()
    }
}

fn channel(c: f64) -> u8 {
    (c * 255.0).round().clamp(0.0, 255.0) as u8
}

/// Fingerprint of one object.
///
/// Locations and sizes are compared exactly; colors at 8-bit resolution.
/// Rotation and id are not part of the key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct KeyEntry {
    shape: String,
    location: [u64; 3],
    color: [u8; 4],
    size: u64,
    material: String,
}

impl From<&Block> for KeyEntry {
    fn from(block: &Block) -> Self {
        let [x, y, z] = block.location.to_array();
        let [r, g, b, a] = block.color;
        Self {
            shape: block.shape.clone(),
            location: [exact_bits(x), exact_bits(y), exact_bits(z)],
            color: [channel(r), channel(g), channel(b), channel(a)],
            size: exact_bits(block.size),
            material: block.material.clone(),
        }
    }
}

/// Sorted object fingerprints of a whole configuration.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CanonicalKey(Vec<KeyEntry>);

impl CanonicalKey {
    /// Builds the key of a set of placed blocks; input order is irrelevant.
    pub fn from_blocks<'a>(blocks: impl IntoIterator<Item = &'a Block>) -> Self {
        let mut entries: Vec<KeyEntry> = blocks.into_iter().map(KeyEntry::from).collect();
        entries.sort();
        Self(entries)
    }

    /// Number of objects.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True for the empty configuration.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Per-object entries in canonical order.
    pub fn entries(&self) -> &[KeyEntry] {
        &self.0
    }
}
