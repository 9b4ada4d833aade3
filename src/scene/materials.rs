//! Material registry
//!
//! Named Phong material parameter sets. Lookup is a linear scan returning the
//! first definition with a matching tag, so redefining a tag has no effect on
//! lookups.

use cgmath::Vector3;

use crate::error::{Result, SceneError};

/// Diffuse/specular response of a surface.
#[derive(Debug, Clone, PartialEq)]
pub struct MaterialEntry {
    pub tag: String,
    /// Each component in [0, 1]
    pub diffuse_color: Vector3<f32>,
    /// Each component in [0, 1]
    pub specular_color: Vector3<f32>,
    /// Phong exponent, always positive
    pub shininess: f32,
}

impl MaterialEntry {
    /// Builds a validated entry. Colors are clamped into [0, 1].
    ///
    /// # Arguments
    /// * `tag` - Name draw blocks use to reference this material
    /// * `diffuse` - Diffuse reflectance
    /// * `specular` - Specular reflectance
    /// * `shininess` - Phong exponent; must be positive and finite
    pub fn new(
        tag: &str,
        diffuse: Vector3<f32>,
        specular: Vector3<f32>,
        shininess: f32,
    ) -> Result<Self> {
        if !(shininess.is_finite() && shininess > 0.0) {
            return Err(SceneError::InvalidShininess {
                tag: tag.to_string(),
                shininess,
            });
        }

        Ok(Self {
            tag: tag.to_string(),
            diffuse_color: clamp_color(diffuse),
            specular_color: clamp_color(specular),
            shininess,
        })
    }
}

fn clamp_color(color: Vector3<f32>) -> Vector3<f32> {
    color.map(|c| if c.is_nan() { 0.0 } else { c.clamp(0.0, 1.0) })
}

/// Insertion-ordered material table.
#[derive(Debug, Default, Clone)]
pub struct MaterialRegistry {
    entries: Vec<MaterialEntry>,
}

impl MaterialRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a material. Duplicate tags are accepted; the first one wins on lookup.
    pub fn define(
        &mut self,
        tag: &str,
        diffuse: Vector3<f32>,
        specular: Vector3<f32>,
        shininess: f32,
    ) -> Result<()> {
        let entry = MaterialEntry::new(tag, diffuse, specular, shininess)?;
        self.insert(entry);
        Ok(())
    }

    /// Appends an already validated entry.
    pub fn insert(&mut self, entry: MaterialEntry) {
        if self.find(&entry.tag).is_some() {
            log::warn!(
                "Material '{}' is already defined; lookups keep returning the first definition",
                entry.tag
            );
        }
        log::debug!("Defined material '{}'", entry.tag);
        self.entries.push(entry);
    }

    pub fn find(&self, tag: &str) -> Option<&MaterialEntry> {
        self.entries.iter().find(|entry| entry.tag == tag)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &MaterialEntry> {
        self.entries.iter()
    }
}
