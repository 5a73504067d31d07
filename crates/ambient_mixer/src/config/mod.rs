//! Configuration system
//!
//! [`Config`] gives any serde type TOML/RON file loading, picked by file
//! extension. [`MixerConfig`] is the mixer's own configuration: playback
//! defaults, backend tuning and an optional replacement catalog.

pub use serde::{Deserialize, Serialize};

use crate::audio::backend::AudioBackendConfig;
use crate::catalog::{Catalog, CatalogError, SoundDescriptor};
use crate::mixer::PlaybackDefaults;

/// Configuration trait
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Load configuration from file
    fn load_from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(ConfigError::Io)?;

        // Try different formats
        if path.ends_with(".toml") {
            toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else if path.ends_with(".ron") {
            ron::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else {
            Err(ConfigError::UnsupportedFormat(path.to_string()))
        }
    }

    /// Save configuration to file
    fn save_to_file(&self, path: &str) -> Result<(), ConfigError> {
        let contents = if path.ends_with(".toml") {
            toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else if path.ends_with(".ron") {
            ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
                .map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else {
            return Err(ConfigError::UnsupportedFormat(path.to_string()));
        };

        std::fs::write(path, contents).map_err(ConfigError::Io)
    }
}

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Unsupported format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Values that parse but make no sense
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    /// Configured catalog is malformed
    #[error("Invalid catalog: {0}")]
    Catalog(#[from] CatalogError),
}

/// Mixer configuration
///
/// ```toml
/// [defaults]
/// volume = 0.6
/// looping = true
///
/// [backend]
/// fetch_timeout_secs = 30
/// max_decoded_samples = 57600000
///
/// [[sounds]]
/// id = "rain"
/// title = "Gentle Rain"
/// description = "Soft rainfall"
/// attribution = "Field recording"
/// url = "sounds/rain.ogg"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct MixerConfig {
    /// Values every sound starts at
    pub defaults: PlaybackDefaults,
    /// Audio backend tuning
    pub backend: AudioBackendConfig,
    /// Catalog override; the built-in catalog is used when empty
    pub sounds: Vec<SoundDescriptor>,
}

impl MixerConfig {
    /// Check values that deserialization alone cannot
    pub fn validate(&self) -> Result<(), ConfigError> {
        let volume = self.defaults.volume;
        if !(0.0..=1.0).contains(&volume) {
            return Err(ConfigError::Invalid(format!(
                "default volume {volume} is outside 0.0..=1.0"
            )));
        }
        Ok(())
    }

    /// Catalog this configuration describes
    pub fn catalog(&self) -> Result<Catalog, ConfigError> {
        if self.sounds.is_empty() {
            Ok(Catalog::builtin())
        } else {
            Ok(Catalog::new(self.sounds.clone())?)
        }
    }
}

impl Config for MixerConfig {}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_defaults() {
        let config = MixerConfig::default();
        assert_relative_eq!(config.defaults.volume, 0.6);
        assert!(config.defaults.looping);
        assert_eq!(config.backend.fetch_timeout_secs, 30);
        assert!(config.validate().is_ok());
        assert_eq!(config.catalog().unwrap(), Catalog::builtin());
    }

    #[test]
    fn test_parse_toml_with_catalog() {
        let contents = r#"
            [defaults]
            volume = 0.4

            [backend]
            max_decoded_samples = 480000

            [[sounds]]
            id = "rain"
            title = "Gentle Rain"
            description = "Soft rainfall"
            attribution = "Field recording"
            url = "sounds/rain.ogg"
        "#;
        let config: MixerConfig = toml::from_str(contents).unwrap();

        assert_relative_eq!(config.defaults.volume, 0.4);
        assert!(config.defaults.looping);
        assert_eq!(config.backend.max_decoded_samples, 480_000);
        assert_eq!(config.backend.fetch_timeout_secs, 30);
        let catalog = config.catalog().unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.get("rain").map(|s| s.url.as_str()), Some("sounds/rain.ogg"));
    }

    #[test]
    fn test_parse_ron() {
        let config: MixerConfig =
            ron::from_str("(defaults: (volume: 0.25, looping: false))").unwrap();
        assert_relative_eq!(config.defaults.volume, 0.25);
        assert!(!config.defaults.looping);
        assert!(config.sounds.is_empty());
    }

    #[test]
    fn test_invalid_default_volume() {
        let mut config = MixerConfig::default();
        config.defaults.volume = 1.5;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_duplicate_catalog_ids() {
        let sound = Catalog::builtin().get("rain").cloned().unwrap();
        let config = MixerConfig {
            sounds: vec![sound.clone(), sound],
            ..MixerConfig::default()
        };
        assert!(matches!(config.catalog(), Err(ConfigError::Catalog(_))));
    }

    #[test]
    fn test_file_round_trip() {
        let path = std::env::temp_dir().join("ambient_mixer_config_test.toml");
        let path = path.to_str().unwrap();

        let mut config = MixerConfig::default();
        config.defaults.volume = 0.3;
        config.save_to_file(path).unwrap();
        let loaded = MixerConfig::load_from_file(path).unwrap();
        assert_eq!(loaded, config);

        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn test_unsupported_extension() {
        let result = MixerConfig::default().save_to_file("mixer.json");
        assert!(matches!(result, Err(ConfigError::UnsupportedFormat(_))));
    }
}
