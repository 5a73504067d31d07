//! Sound catalog
//!
//! The catalog is the fixed, ordered list of ambient sounds a mixer can play.
//! It is built once (from the built-in list or from configuration) and never
//! mutated afterwards; every ordered view the mixer produces follows catalog
//! order.

mod builtin;

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

/// Stable identifier of a sound
pub type SoundId = String;

/// Immutable description of one ambient sound
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SoundDescriptor {
    /// Unique, stable identifier
    pub id: SoundId,
    /// Display title
    pub title: String,
    /// Display description
    pub description: String,
    /// Display credit for the recording
    pub attribution: String,
    /// Source locator of the audio stream (URL or file path)
    pub url: String,
    /// Presentation hint, opaque to the mixer
    #[serde(default)]
    pub color_theme: String,
}

/// Catalog construction errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    /// Two descriptors share an id
    #[error("Duplicate sound id: {0}")]
    DuplicateId(SoundId),

    /// A descriptor has an empty id
    #[error("Sound at position {0} has an empty id")]
    EmptyId(usize),
}

/// Fixed, ordered list of sound descriptors
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    sounds: Vec<SoundDescriptor>,
}

impl Catalog {
    /// Build a catalog, validating that ids are non-empty and unique
    pub fn new(sounds: Vec<SoundDescriptor>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::with_capacity(sounds.len());
        for (position, sound) in sounds.iter().enumerate() {
            if sound.id.is_empty() {
                return Err(CatalogError::EmptyId(position));
            }
            if !seen.insert(sound.id.as_str()) {
                return Err(CatalogError::DuplicateId(sound.id.clone()));
            }
        }
        Ok(Self { sounds })
    }

    /// The built-in six-sound catalog
    pub fn builtin() -> Self {
        Self {
            sounds: builtin::builtin_sounds(),
        }
    }

    /// Look up a descriptor by id
    pub fn get(&self, id: &str) -> Option<&SoundDescriptor> {
        self.sounds.iter().find(|sound| sound.id == id)
    }

    /// Whether the catalog holds a sound with this id
    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Descriptors in catalog order
    pub fn iter(&self) -> std::slice::Iter<'_, SoundDescriptor> {
        self.sounds.iter()
    }

    /// Ids in catalog order
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.sounds.iter().map(|sound| sound.id.as_str())
    }

    /// Number of sounds
    pub fn len(&self) -> usize {
        self.sounds.len()
    }

    /// Whether the catalog is empty
    pub fn is_empty(&self) -> bool {
        self.sounds.is_empty()
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a SoundDescriptor;
    type IntoIter = std::slice::Iter<'a, SoundDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor(id: &str) -> SoundDescriptor {
        SoundDescriptor {
            id: id.to_string(),
            title: format!("{id} title"),
            description: String::new(),
            attribution: String::new(),
            url: format!("sounds/{id}.ogg"),
            color_theme: String::new(),
        }
    }

    #[test]
    fn test_builtin_order() {
        let catalog = Catalog::builtin();
        let ids: Vec<_> = catalog.ids().collect();
        assert_eq!(ids, ["ocean", "rain", "forest", "fireplace", "cafe", "white-noise"]);
        assert_eq!(catalog.get("rain").map(|s| s.title.as_str()), Some("Gentle Rain"));
        assert_eq!(catalog.get("forest").map(|s| s.title.as_str()), Some("Forest Birds"));
    }

    #[test]
    fn test_builtin_passes_validation() {
        let sounds: Vec<_> = Catalog::builtin().iter().cloned().collect();
        assert_eq!(Catalog::new(sounds), Ok(Catalog::builtin()));
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let result = Catalog::new(vec![descriptor("a"), descriptor("b"), descriptor("a")]);
        assert_eq!(result, Err(CatalogError::DuplicateId("a".to_string())));
    }

    #[test]
    fn test_empty_id_rejected() {
        let result = Catalog::new(vec![descriptor("a"), descriptor("")]);
        assert_eq!(result, Err(CatalogError::EmptyId(1)));
    }

    #[test]
    fn test_unknown_lookup() {
        let catalog = Catalog::builtin();
        assert!(catalog.get("thunder").is_none());
        assert!(!catalog.contains("thunder"));
        assert_eq!(catalog.len(), 6);
    }
}
