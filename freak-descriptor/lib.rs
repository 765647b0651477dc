//! FREAK descriptor extraction.
//!
//! Per keypoint: pick the pattern scale from the keypoint size, reject it if
//! the pattern would leave the image, estimate its orientation from the 45
//! orientation pairs, sample the rotated pattern with box filters over the
//! integral image and pack one comparison bit per description pair.

pub mod builder;
pub mod config;
pub mod encoder;
pub mod error;
pub mod extractor;
pub mod orientation;
pub mod sampler;

pub use builder::ExtractorBuilder;
pub use config::ExtractorConfig;
pub use encoder::{descriptor_bit, descriptor_len, encode};
pub use error::{ExtractError, ExtractResult, Rejection};
pub use extractor::FreakExtractor;
pub use orientation::{estimate_orientation, orientation_from_values};
pub use sampler::IntensitySampler;
