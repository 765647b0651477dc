use freak_core::IntegralError;
use freak_pattern::PatternError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Pattern construction failed: {0}")]
    Pattern(#[from] PatternError),
    #[error("Invalid integral image: {0}")]
    Integral(#[from] IntegralError),
    #[error("Image data length mismatch: expected {expected_len}, got {actual_len}")]
    InvalidImageData { expected_len: usize, actual_len: usize },
    #[error("Invalid thread count: {0} (must be > 0)")]
    InvalidThreadCount(usize),
}

pub type ExtractResult<T> = Result<T, ExtractError>;

/// Why a single keypoint produced no descriptor.
///
/// Batch extraction drops such keypoints instead of failing.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum Rejection {
    #[error("keypoint size {size} is below the smallest pattern size")]
    TooSmall { size: f32 },
    #[error("keypoint is within {margin} px of the border at scale {scale}")]
    OutsideMargin { scale: usize, margin: usize },
    #[error("sampling box of pattern point {point} leaves the image")]
    SampleOutOfBounds { point: usize },
}
