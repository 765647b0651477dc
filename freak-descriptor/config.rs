use freak_core::FreakConfig;
use freak_pattern::validate_geometry;

use crate::builder::ExtractorBuilder;
use crate::error::{ExtractError, ExtractResult};
use crate::extractor::FreakExtractor;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Complete extractor configuration with presets and metadata
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ExtractorConfig {
    /// Core FREAK parameters
    pub core: FreakConfig,
    /// Compare all 903 point pairs instead of the selected 512
    #[cfg_attr(feature = "serde", serde(default))]
    pub all_pairs: bool,
    /// Metadata
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub name: Option<String>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub description: Option<String>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub version: Option<String>,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl ExtractorConfig {
    /// Default parameters, no metadata
    pub fn new() -> Self {
        Self {
            core: FreakConfig::default(),
            all_pairs: false,
            name: None,
            description: None,
            version: None,
        }
    }

    /// Rotation and scale invariant descriptor with the built-in pair table
    pub fn standard_preset() -> Self {
        Self::new().with_metadata(
            "Standard",
            "Rotation and scale normalised 512-bit descriptor",
        )
    }

    /// Skips orientation estimation; for images without in-plane rotation
    pub fn upright_preset() -> Self {
        let mut config = Self::new().with_metadata(
            "Upright",
            "Scale normalised descriptor sampled at orientation 0",
        );
        config.core.orientation_normalized = false;
        config
    }

    /// Samples every keypoint at the same pattern scale
    pub fn fixed_scale_preset() -> Self {
        let mut config = Self::new().with_metadata(
            "Fixed scale",
            "Rotation normalised descriptor at a fixed pattern scale",
        );
        config.core.scale_normalized = false;
        config
    }

    /// 903-bit descriptors feeding pair selection
    pub fn calibration_preset() -> Self {
        let mut config = Self::new().with_metadata(
            "Calibration",
            "All-pairs descriptor for offline pair selection",
        );
        config.all_pairs = true;
        config
    }

    /// Add metadata to configuration
    pub fn with_metadata(mut self, name: &str, description: &str) -> Self {
        self.name = Some(name.to_string());
        self.description = Some(description.to_string());
        self.version = Some("1.0".to_string());
        self
    }

    /// Convert to ExtractorBuilder for further customization
    pub fn to_builder(self) -> ExtractorBuilder {
        ExtractorBuilder::from_config(self)
    }

    /// Validate and build the extractor
    pub fn build(&self) -> ExtractResult<FreakExtractor> {
        self.validate()?;
        FreakExtractor::build(&self.core, self.all_pairs)
    }

    /// Generate human-readable summary
    pub fn summary(&self) -> String {
        format!(
            "ExtractorConfig{}: scale={}, octaves={}, threads={}, pairs={}, features=[Orientation:{}, Scale:{}, AllPairs:{}]",
            self.name
                .as_deref()
                .map(|n| format!(" '{}'", n))
                .unwrap_or_default(),
            self.core.pattern_scale,
            self.core.n_octaves,
            self.core.n_threads,
            self.core
                .pair_table
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "built-in".to_string()),
            self.core.orientation_normalized,
            self.core.scale_normalized,
            self.all_pairs
        )
    }

    /// Validate configuration parameters
    pub fn validate(&self) -> ExtractResult<()> {
        let core = &self.core;
        validate_geometry(core.pattern_scale, core.n_octaves)?;
        if core.n_threads == 0 {
            return Err(ExtractError::InvalidThreadCount(core.n_threads));
        }
        Ok(())
    }

    /// Save configuration to JSON file
    #[cfg(feature = "serde")]
    pub fn save_json<P: AsRef<std::path::Path>>(&self, path: P) -> Result<(), Box<dyn std::error::Error>> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Load configuration from JSON file
    #[cfg(feature = "serde")]
    pub fn load_json<P: AsRef<std::path::Path>>(path: P) -> Result<Self, Box<dyn std::error::Error>> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Save configuration to TOML file
    #[cfg(feature = "serde")]
    pub fn save_toml<P: AsRef<std::path::Path>>(&self, path: P) -> Result<(), Box<dyn std::error::Error>> {
        let toml = toml::to_string_pretty(self)?;
        std::fs::write(path, toml)?;
        Ok(())
    }

    /// Load configuration from TOML file
    #[cfg(feature = "serde")]
    pub fn load_toml<P: AsRef<std::path::Path>>(path: P) -> Result<Self, Box<dyn std::error::Error>> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Serialize to JSON string
    #[cfg(feature = "serde")]
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize from JSON string
    #[cfg(feature = "serde")]
    pub fn from_json(json: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to TOML string
    #[cfg(feature = "serde")]
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Deserialize from TOML string
    #[cfg(feature = "serde")]
    pub fn from_toml(toml_str: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let config: Self = toml::from_str(toml_str)?;
        config.validate()?;
        Ok(config)
    }
}
