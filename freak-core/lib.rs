use std::path::PathBuf;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

mod integral;

pub use integral::{IntegralImage, IntegralError};

/// Compile-time dimensions of the sampling pattern and its lookup tables.
pub mod consts {
    /// Discrete scales covered by the pattern lookup table
    pub const NB_SCALES: usize = 64;
    /// Discrete orientations over a full turn
    pub const NB_ORIENTATIONS: usize = 256;
    /// Pattern points: 7 rings of 6 plus the centre
    pub const NB_POINTS: usize = 43;
    /// Description pairs in a runtime table
    pub const NB_PAIRS: usize = 512;
    /// Every unordered pair of pattern points, C(43, 2)
    pub const NB_ALL_PAIRS: usize = NB_POINTS * (NB_POINTS - 1) / 2;
    /// Pairs used for orientation estimation
    pub const NB_ORIENTATION_PAIRS: usize = 45;
    /// Smallest keypoint diameter the pattern is defined for
    pub const SMALLEST_KEYPOINT_SIZE: f32 = 7.0;
    /// Fixed-point scale of the orientation weights
    pub const ORIENTATION_WEIGHT_SCALE: i32 = 4096;
    /// Descriptor length in bytes (512 bits)
    pub const DESCRIPTOR_SIZE: usize = NB_PAIRS / 8;
    /// All-pairs descriptor length in bytes (903 bits, zero padded)
    pub const EXTENDED_DESCRIPTOR_SIZE: usize = (NB_ALL_PAIRS + 7) / 8;
}

/// Row-major 8-bit grayscale image
pub type Image = Vec<u8>;

/// Packed comparison bits, most significant bit first within each byte
pub type Descriptor = Vec<u8>;

/// Detected point of interest, supplied by an external detector.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Keypoint {
    pub x: f32,      // Subpixel x coordinate
    pub y: f32,      // Subpixel y coordinate
    /// Diameter of the meaningful neighbourhood in pixels
    pub size: f32,
    /// Orientation in radians, if known
    pub angle: Option<f32>,
    pub response: f32,
}

impl Keypoint {
    pub fn new(x: f32, y: f32, size: f32) -> Self {
        Self {
            x,
            y,
            size,
            angle: None,
            response: 0.0,
        }
    }

    pub fn with_response(mut self, response: f32) -> Self {
        self.response = response;
        self
    }
}

/// Element type of a descriptor row, for downstream matchers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum DescriptorType {
    /// Packed bitset compared with Hamming distance
    Binary,
}

#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FreakConfig {
    /// Estimate a per-keypoint orientation and sample the rotated pattern
    pub orientation_normalized: bool,
    /// Pick the pattern scale from the keypoint size
    pub scale_normalized: bool,
    /// Radius scaling of the pattern at the smallest scale
    pub pattern_scale: f32,
    /// Octaves spanned by the 64 pattern scales
    pub n_octaves: u32,
    /// Description-pair table to load instead of the built-in one
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub pair_table: Option<PathBuf>,
    pub n_threads: usize,
}

impl Default for FreakConfig {
    fn default() -> Self {
        Self {
            orientation_normalized: true,
            scale_normalized: true,
            pattern_scale: 22.0,
            n_octaves: 4,
            pair_table: None,
            n_threads: num_cpus::get().max(1),
        }
    }
}

/// Keypoints that survived extraction, paired row-by-row with their descriptors.
#[derive(Debug, Clone, Default)]
pub struct Extraction<D> {
    pub keypoints: Vec<Keypoint>,
    pub descriptors: Vec<D>,
}

impl<D> Extraction<D> {
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Keypoint, &D)> {
        self.keypoints.iter().zip(self.descriptors.iter())
    }
}

/// Generic descriptor extractor contract.
///
/// Keypoints that cannot be described are dropped from the returned
/// [`Extraction`]; errors are reserved for invalid inputs.
pub trait DescriptorExtractor {
    type Descriptor;
    type Error;

    /// Descriptor length in bytes
    fn descriptor_size(&self) -> usize;

    fn descriptor_type(&self) -> DescriptorType;

    /// Describe `keypoints` using a precomputed integral image of `img`
    fn compute_with_integral(
        &self,
        img: &Image,
        integral: &IntegralImage,
        keypoints: &[Keypoint],
    ) -> Result<Extraction<Self::Descriptor>, Self::Error>;

    /// Describe `keypoints` in a `width`x`height` image
    fn compute(
        &self,
        img: &Image,
        width: usize,
        height: usize,
        keypoints: &[Keypoint],
    ) -> Result<Extraction<Self::Descriptor>, Self::Error>
    where
        Self::Error: From<IntegralError>,
    {
        let integral = IntegralImage::new(img, width, height)?;
        self.compute_with_integral(img, &integral, keypoints)
    }
}

/// Initialize Rayon thread pool with the specified number of threads
pub fn init_thread_pool(n_threads: usize) -> Result<(), rayon::ThreadPoolBuildError> {
    rayon::ThreadPoolBuilder::new()
        .num_threads(n_threads)
        .build_global()
}
