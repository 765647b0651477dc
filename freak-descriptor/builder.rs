use std::path::PathBuf;

use freak_core::FreakConfig;

use crate::config::ExtractorConfig;
use crate::error::ExtractResult;
use crate::extractor::FreakExtractor;

/// Builder for creating a [`FreakExtractor`]
#[derive(Debug, Clone)]
pub struct ExtractorBuilder {
    config: FreakConfig,
    all_pairs: bool,
}

impl Default for ExtractorBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ExtractorBuilder {
    /// Create a new builder with default settings
    pub fn new() -> Self {
        Self {
            config: FreakConfig::default(),
            all_pairs: false,
        }
    }

    /// Enable or disable per-keypoint orientation estimation
    pub fn orientation_normalized(mut self, enable: bool) -> Self {
        self.config.orientation_normalized = enable;
        self
    }

    /// Enable or disable choosing the pattern scale from keypoint size
    pub fn scale_normalized(mut self, enable: bool) -> Self {
        self.config.scale_normalized = enable;
        self
    }

    /// Set the pattern radius scaling at the smallest scale
    pub fn pattern_scale(mut self, scale: f32) -> Self {
        self.config.pattern_scale = scale;
        self
    }

    /// Set the number of octaves covered by the 64 scales
    pub fn octaves(mut self, n_octaves: u32) -> Self {
        self.config.n_octaves = n_octaves;
        self
    }

    /// Load description pairs from a table file
    pub fn pair_table<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.config.pair_table = Some(path.into());
        self
    }

    /// Compare every point pair (903 bits)
    pub fn all_pairs(mut self, enable: bool) -> Self {
        self.all_pairs = enable;
        self
    }

    /// Set the number of threads for parallel processing
    pub fn threads(mut self, n_threads: usize) -> Self {
        self.config.n_threads = n_threads;
        self
    }

    /// Apply the upright preset
    pub fn preset_upright(self) -> Self {
        self.apply_preset(ExtractorConfig::upright_preset())
    }

    /// Apply the fixed-scale preset
    pub fn preset_fixed_scale(self) -> Self {
        self.apply_preset(ExtractorConfig::fixed_scale_preset())
    }

    /// Apply the calibration preset
    pub fn preset_calibration(self) -> Self {
        self.apply_preset(ExtractorConfig::calibration_preset())
    }

    // Presets replace the flags but keep the pair table and thread count
    fn apply_preset(mut self, preset: ExtractorConfig) -> Self {
        self.config.orientation_normalized = preset.core.orientation_normalized;
        self.config.scale_normalized = preset.core.scale_normalized;
        self.config.pattern_scale = preset.core.pattern_scale;
        self.config.n_octaves = preset.core.n_octaves;
        self.all_pairs = preset.all_pairs;
        self
    }

    /// Validate and build the extractor
    pub fn build(self) -> ExtractResult<FreakExtractor> {
        self.to_config().build()
    }

    /// Generate summary of current configuration
    pub fn summary(&self) -> String {
        format!(
            "ExtractorBuilder: scale={}, octaves={}, threads={}, orientation={}, scale_norm={}, all_pairs={}, pair_table={:?}",
            self.config.pattern_scale,
            self.config.n_octaves,
            self.config.n_threads,
            self.config.orientation_normalized,
            self.config.scale_normalized,
            self.all_pairs,
            self.config.pair_table
        )
    }

    /// Create builder from existing configuration
    pub fn from_config(config: ExtractorConfig) -> Self {
        Self {
            config: config.core,
            all_pairs: config.all_pairs,
        }
    }

    /// Convert back into a serialisable configuration
    pub fn to_config(self) -> ExtractorConfig {
        ExtractorConfig {
            core: self.config,
            all_pairs: self.all_pairs,
            name: None,
            description: None,
            version: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ExtractError;
    use freak_core::DescriptorExtractor;

    #[test]
    fn test_fluent_settings() {
        let config = ExtractorBuilder::new()
            .pattern_scale(16.0)
            .octaves(3)
            .orientation_normalized(false)
            .threads(2)
            .pair_table("trained.txt")
            .to_config();
        assert_eq!(config.core.pattern_scale, 16.0);
        assert_eq!(config.core.n_octaves, 3);
        assert!(!config.core.orientation_normalized);
        assert!(config.core.scale_normalized);
        assert_eq!(config.core.n_threads, 2);
        assert_eq!(config.core.pair_table, Some(PathBuf::from("trained.txt")));
    }

    #[test]
    fn test_preset_keeps_pair_table() {
        let config = ExtractorBuilder::new()
            .pair_table("trained.txt")
            .threads(3)
            .preset_upright()
            .to_config();
        assert!(!config.core.orientation_normalized);
        assert_eq!(config.core.n_threads, 3);
        assert!(config.core.pair_table.is_some());
    }

    #[test]
    fn test_build() {
        let ext = ExtractorBuilder::new().preset_calibration().build().unwrap();
        assert!(ext.table().is_all_pairs());
        assert_eq!(ext.descriptor_size(), 113);

        let err = ExtractorBuilder::new().threads(0).build().unwrap_err();
        assert!(matches!(err, ExtractError::InvalidThreadCount(0)));
    }

    #[test]
    fn test_roundtrip_through_config() {
        let builder = ExtractorConfig::fixed_scale_preset().to_builder();
        assert!(builder.summary().contains("scale_norm=false"));
        let ext = builder.build().unwrap();
        assert!(!ext.scale_normalized());
        assert!(ext.orientation_normalized());
    }
}
