use std::f32::consts::TAU;
use std::sync::Arc;

use freak_core::consts::NB_ORIENTATIONS;
use freak_core::{
    Descriptor, DescriptorExtractor, DescriptorType, Extraction, FreakConfig, Image, IntegralImage,
    Keypoint,
};
use freak_pattern::PatternTable;
use log::debug;
use rayon::prelude::*;

use crate::encoder::{descriptor_len, encode};
use crate::error::{ExtractError, ExtractResult, Rejection};
use crate::orientation::estimate_orientation;
use crate::sampler::IntensitySampler;

/// FREAK descriptor extractor.
///
/// Holds a shared, read-only [`PatternTable`]; cloning is cheap and every
/// clone can describe keypoints concurrently.
#[derive(Debug, Clone)]
pub struct FreakExtractor {
    table: Arc<PatternTable>,
    orientation_normalized: bool,
    scale_normalized: bool,
}

impl FreakExtractor {
    /// Build the pattern tables for `cfg`
    pub fn new(cfg: &FreakConfig) -> ExtractResult<Self> {
        Self::build(cfg, false)
    }

    /// Extractor comparing all 903 point pairs, used for calibration.
    ///
    /// A pair table in `cfg` still takes precedence.
    pub fn with_all_pairs(cfg: &FreakConfig) -> ExtractResult<Self> {
        Self::build(cfg, true)
    }

    pub(crate) fn build(cfg: &FreakConfig, all_pairs: bool) -> ExtractResult<Self> {
        let table = PatternTable::build(cfg, all_pairs)?;
        Ok(Self::from_table(
            Arc::new(table),
            cfg.orientation_normalized,
            cfg.scale_normalized,
        ))
    }

    /// Share an already built table between extractors
    pub fn from_table(
        table: Arc<PatternTable>,
        orientation_normalized: bool,
        scale_normalized: bool,
    ) -> Self {
        Self {
            table,
            orientation_normalized,
            scale_normalized,
        }
    }

    pub fn table(&self) -> &Arc<PatternTable> {
        &self.table
    }

    pub fn orientation_normalized(&self) -> bool {
        self.orientation_normalized
    }

    pub fn scale_normalized(&self) -> bool {
        self.scale_normalized
    }

    /// Describe a single keypoint.
    ///
    /// Returns a copy of the keypoint carrying the estimated angle (0 when
    /// orientation normalisation is off) together with its descriptor. Any
    /// angle already set on `kp` is ignored.
    pub fn describe_keypoint(
        &self,
        integral: &IntegralImage,
        kp: &Keypoint,
    ) -> Result<(Keypoint, Descriptor), Rejection> {
        let table = self.table.as_ref();
        let scale = table
            .scale_index(kp.size, self.scale_normalized)
            .ok_or(Rejection::TooSmall { size: kp.size })?;

        // Written as negated `>` so NaN coordinates fail the check
        let margin = table.pattern_size(scale);
        let m = margin as f32;
        let inside = kp.x > m
            && kp.y > m
            && kp.x < integral.width() as f32 - m
            && kp.y < integral.height() as f32 - m;
        if !inside {
            return Err(Rejection::OutsideMargin { scale, margin });
        }

        let sampler = IntensitySampler::new(table, integral);
        let orientation = if self.orientation_normalized {
            estimate_orientation(&sampler, table.orientation_pairs(), kp.x, kp.y, scale)?
        } else {
            0
        };

        let values = sampler.sample_all(kp.x, kp.y, scale, orientation as usize)?;
        let descriptor = encode(&values, table.description_pairs());

        let mut described = *kp;
        described.angle = Some(orientation as f32 * TAU / NB_ORIENTATIONS as f32);
        Ok((described, descriptor))
    }
}

impl DescriptorExtractor for FreakExtractor {
    type Descriptor = Descriptor;
    type Error = ExtractError;

    fn descriptor_size(&self) -> usize {
        descriptor_len(self.table.description_pairs().len())
    }

    fn descriptor_type(&self) -> DescriptorType {
        DescriptorType::Binary
    }

    fn compute_with_integral(
        &self,
        img: &Image,
        integral: &IntegralImage,
        keypoints: &[Keypoint],
    ) -> ExtractResult<Extraction<Descriptor>> {
        let expected_len = integral.width() * integral.height();
        if img.len() != expected_len {
            return Err(ExtractError::InvalidImageData {
                expected_len,
                actual_len: img.len(),
            });
        }

        let described: Vec<Result<(Keypoint, Descriptor), Rejection>> = keypoints
            .par_iter()
            .map(|kp| self.describe_keypoint(integral, kp))
            .collect();

        let mut extraction = Extraction {
            keypoints: Vec::with_capacity(described.len()),
            descriptors: Vec::with_capacity(described.len()),
        };
        let mut rejected = 0usize;
        for result in described {
            match result {
                Ok((kp, desc)) => {
                    extraction.keypoints.push(kp);
                    extraction.descriptors.push(desc);
                }
                Err(_) => rejected += 1,
            }
        }

        debug!(
            "described {} of {} keypoints ({} rejected)",
            extraction.len(),
            keypoints.len(),
            rejected
        );
        Ok(extraction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use freak_core::consts::{DESCRIPTOR_SIZE, EXTENDED_DESCRIPTOR_SIZE};

    fn gradient_image(w: usize, h: usize) -> Vec<u8> {
        (0..w * h)
            .map(|i| ((i % w) * 2 + (i / w)) as u8)
            .collect()
    }

    #[test]
    fn test_descriptor_metadata() {
        let ext = FreakExtractor::new(&FreakConfig::default()).unwrap();
        assert_eq!(ext.descriptor_size(), DESCRIPTOR_SIZE);
        assert_eq!(ext.descriptor_type(), DescriptorType::Binary);

        let all = FreakExtractor::with_all_pairs(&FreakConfig::default()).unwrap();
        assert_eq!(all.descriptor_size(), EXTENDED_DESCRIPTOR_SIZE);
    }

    #[test]
    fn test_invalid_config_fails_at_build() {
        let cfg = FreakConfig {
            pattern_scale: 0.0,
            ..FreakConfig::default()
        };
        assert!(matches!(
            FreakExtractor::new(&cfg),
            Err(ExtractError::Pattern(_))
        ));
    }

    #[test]
    fn test_rejections() {
        let (w, h) = (100, 100);
        let img = gradient_image(w, h);
        let integral = IntegralImage::new(&img, w, h).unwrap();
        let ext = FreakExtractor::new(&FreakConfig::default()).unwrap();

        assert_eq!(
            ext.describe_keypoint(&integral, &Keypoint::new(50.0, 50.0, 3.0)),
            Err(Rejection::TooSmall { size: 3.0 })
        );
        assert!(matches!(
            ext.describe_keypoint(&integral, &Keypoint::new(0.0, 0.0, 7.0)),
            Err(Rejection::OutsideMargin { scale: 0, margin: 30 })
        ));
        // Exactly on the margin is still rejected
        assert!(ext
            .describe_keypoint(&integral, &Keypoint::new(30.0, 50.0, 7.0))
            .is_err());
        assert!(ext
            .describe_keypoint(&integral, &Keypoint::new(f32::NAN, 50.0, 7.0))
            .is_err());
        assert!(ext
            .describe_keypoint(&integral, &Keypoint::new(31.0, 50.0, 7.0))
            .is_ok());
    }

    #[test]
    fn test_batch_drops_rejected_keypoints_in_order() {
        let (w, h) = (120, 120);
        let img = gradient_image(w, h);
        let ext = FreakExtractor::new(&FreakConfig::default()).unwrap();
        let kps = vec![
            Keypoint::new(60.0, 60.0, 7.0).with_response(1.0),
            Keypoint::new(2.0, 2.0, 7.0).with_response(2.0),
            Keypoint::new(50.0, 70.0, 8.0).with_response(3.0),
            Keypoint::new(60.0, 60.0, 1.0).with_response(4.0),
        ];
        let out = ext.compute(&img, w, h, &kps).unwrap();
        assert_eq!(out.len(), 2);
        assert_eq!(out.keypoints[0].response, 1.0);
        assert_eq!(out.keypoints[1].response, 3.0);
        assert!(out.keypoints.iter().all(|kp| kp.angle.is_some()));
        assert!(out.descriptors.iter().all(|d| d.len() == DESCRIPTOR_SIZE));
    }

    #[test]
    fn test_upright_reports_zero_angle() {
        let (w, h) = (100, 100);
        let img = gradient_image(w, h);
        let integral = IntegralImage::new(&img, w, h).unwrap();
        let cfg = FreakConfig {
            orientation_normalized: false,
            ..FreakConfig::default()
        };
        let ext = FreakExtractor::new(&cfg).unwrap();
        let mut kp = Keypoint::new(50.0, 50.0, 7.0);
        kp.angle = Some(1.0);
        let (described, _) = ext.describe_keypoint(&integral, &kp).unwrap();
        assert_eq!(described.angle, Some(0.0));
    }

    #[test]
    fn test_image_length_mismatch() {
        let img = vec![0u8; 50 * 50];
        let integral = IntegralImage::new(&img, 50, 50).unwrap();
        let ext = FreakExtractor::new(&FreakConfig::default()).unwrap();
        let short = vec![0u8; 10];
        assert!(matches!(
            ext.compute_with_integral(&short, &integral, &[]),
            Err(ExtractError::InvalidImageData { expected_len: 2500, actual_len: 10 })
        ));
    }

    #[test]
    fn test_clones_share_the_table() {
        let ext = FreakExtractor::new(&FreakConfig::default()).unwrap();
        let other = ext.clone();
        assert!(Arc::ptr_eq(ext.table(), other.table()));
    }
}
