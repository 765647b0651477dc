use std::path::Path;

use freak_core::{
    init_thread_pool, Descriptor, DescriptorExtractor, Extraction, IntegralError, IntegralImage,
    Keypoint,
};
use freak_descriptor::{ExtractError, ExtractorConfig, FreakExtractor};
use freak_select::{SelectError, TrainingImage};
use image::{GrayImage, ImageReader};
use imageproc::corners::corners_fast9;
use log::debug;
use serde::Serialize;
use thiserror::Error;

pub use freak_core::{self, FreakConfig as Config, Keypoint as FreakKeypoint};

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Extraction error: {0}")]
    Extract(#[from] ExtractError),
    #[error("Pair selection error: {0}")]
    Select(#[from] SelectError),
    #[error("Integral image error: {0}")]
    Integral(#[from] IntegralError),
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Thread pool error: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

pub type PipelineResult<T> = Result<T, PipelineError>;

/// Default FAST-9 intensity threshold
pub const DEFAULT_FAST_THRESHOLD: u8 = 20;

/// Load an image from disk as 8-bit grayscale
pub fn load_gray<P: AsRef<Path>>(path: P) -> PipelineResult<GrayImage> {
    Ok(ImageReader::open(path)?.decode()?.to_luma8())
}

/// Integral image of `img`, computed by imageproc
pub fn integral_of(img: &GrayImage) -> PipelineResult<IntegralImage> {
    let (w, h) = img.dimensions();
    let sums: image::ImageBuffer<image::Luma<u32>, Vec<u32>> =
        imageproc::integral_image::integral_image(img);
    Ok(IntegralImage::from_raw(sums.into_raw(), w as usize, h as usize)?)
}

/// Size the global rayon pool; fails if the pool was already started
pub fn configure_threads(n_threads: usize) -> PipelineResult<()> {
    Ok(init_thread_pool(n_threads)?)
}

/// Lowercase hex, two digits per byte
pub fn hex_encode(descriptor: &[u8]) -> String {
    descriptor.iter().map(|b| format!("{:02x}", b)).collect()
}

/// One described keypoint in report form
#[derive(Debug, Clone, Serialize)]
pub struct DescribedKeypoint {
    pub x: f32,
    pub y: f32,
    pub size: f32,
    pub angle: Option<f32>,
    pub response: f32,
    pub descriptor: String,
}

/// Descriptors of one image in report form
#[derive(Debug, Clone, Serialize)]
pub struct DescribeReport {
    pub width: u32,
    pub height: u32,
    pub detected: usize,
    pub descriptor_size: usize,
    pub keypoints: Vec<DescribedKeypoint>,
}

/// High-level pipeline: FAST-9 corners from imageproc described with FREAK
#[derive(Debug, Clone)]
pub struct FreakPipeline {
    extractor: FreakExtractor,
    fast_threshold: u8,
    keypoint_size: f32,
    max_keypoints: Option<usize>,
}

impl FreakPipeline {
    /// Create a pipeline from a validated extractor configuration
    pub fn new(config: &ExtractorConfig, fast_threshold: u8) -> PipelineResult<Self> {
        Ok(Self {
            extractor: config.build()?,
            fast_threshold,
            keypoint_size: 7.0,
            max_keypoints: None,
        })
    }

    /// Diameter assigned to detected corners
    pub fn with_keypoint_size(mut self, size: f32) -> Self {
        self.keypoint_size = size;
        self
    }

    /// Keep only the strongest corners
    pub fn with_max_keypoints(mut self, max: Option<usize>) -> Self {
        self.max_keypoints = max;
        self
    }

    pub fn extractor(&self) -> &FreakExtractor {
        &self.extractor
    }

    /// Detect FAST-9 corners, strongest first
    pub fn detect_keypoints(&self, img: &GrayImage) -> Vec<Keypoint> {
        let mut corners = corners_fast9(img, self.fast_threshold);
        corners.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        if let Some(max) = self.max_keypoints {
            corners.truncate(max);
        }
        debug!("detected {} FAST-9 corners", corners.len());
        corners
            .into_iter()
            .map(|c| Keypoint::new(c.x as f32, c.y as f32, self.keypoint_size).with_response(c.score))
            .collect()
    }

    /// Describe the given keypoints
    pub fn describe(
        &self,
        img: &GrayImage,
        keypoints: &[Keypoint],
    ) -> PipelineResult<Extraction<Descriptor>> {
        let integral = integral_of(img)?;
        Ok(self
            .extractor
            .compute_with_integral(img.as_raw(), &integral, keypoints)?)
    }

    /// Detect keypoints and describe them in one step
    pub fn detect_and_describe(&self, img: &GrayImage) -> PipelineResult<Extraction<Descriptor>> {
        let keypoints = self.detect_keypoints(img);
        self.describe(img, &keypoints)
    }

    /// Detect and describe, packaged for output
    pub fn report(&self, img: &GrayImage) -> PipelineResult<DescribeReport> {
        let keypoints = self.detect_keypoints(img);
        let extraction = self.describe(img, &keypoints)?;
        Ok(DescribeReport {
            width: img.width(),
            height: img.height(),
            detected: keypoints.len(),
            descriptor_size: self.extractor.descriptor_size(),
            keypoints: extraction
                .iter()
                .map(|(kp, desc)| DescribedKeypoint {
                    x: kp.x,
                    y: kp.y,
                    size: kp.size,
                    angle: kp.angle,
                    response: kp.response,
                    descriptor: hex_encode(desc),
                })
                .collect(),
        })
    }

    /// Detect corners and package the image for pair selection
    pub fn training_image(&self, img: GrayImage) -> PipelineResult<TrainingImage> {
        let keypoints = self.detect_keypoints(&img);
        let integral = integral_of(&img)?;
        Ok(TrainingImage {
            pixels: img.into_raw(),
            integral,
            keypoints,
        })
    }
}
