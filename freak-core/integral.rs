use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IntegralError {
    #[error("Invalid image dimensions: {width}x{height} (must be > 0)")]
    InvalidImageSize { width: usize, height: usize },
    #[error("Image data length mismatch: expected {expected_len}, got {actual_len}")]
    InvalidImageData { expected_len: usize, actual_len: usize },
}

/// Summed-area table of an 8-bit grayscale image.
///
/// The table is one cell wider and taller than its source: `at(x, y)` holds the
/// sum of all source pixels strictly above and strictly to the left of `(x, y)`,
/// so the first row and column are zero. Sums are kept modulo 2^32, which keeps
/// every box sum exact as long as the box itself sums to less than 2^32.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntegralImage {
    data: Vec<u32>,
    width: usize,
    height: usize,
}

impl IntegralImage {
    /// Build the integral image of a row-major `width`x`height` image
    pub fn new(img: &[u8], width: usize, height: usize) -> Result<Self, IntegralError> {
        if width == 0 || height == 0 {
            return Err(IntegralError::InvalidImageSize { width, height });
        }
        if img.len() != width * height {
            return Err(IntegralError::InvalidImageData {
                expected_len: width * height,
                actual_len: img.len(),
            });
        }

        let stride = width + 1;
        let mut data = vec![0u32; stride * (height + 1)];
        for y in 0..height {
            let mut row_sum = 0u32;
            let row = &img[y * width..(y + 1) * width];
            for (x, &p) in row.iter().enumerate() {
                row_sum = row_sum.wrapping_add(p as u32);
                let above = data[y * stride + x + 1];
                data[(y + 1) * stride + x + 1] = above.wrapping_add(row_sum);
            }
        }

        Ok(Self { data, width, height })
    }

    /// Wrap a table computed elsewhere, e.g. by `imageproc::integral_image`.
    ///
    /// `width` and `height` are the dimensions of the source image.
    pub fn from_raw(data: Vec<u32>, width: usize, height: usize) -> Result<Self, IntegralError> {
        if width == 0 || height == 0 {
            return Err(IntegralError::InvalidImageSize { width, height });
        }
        let expected_len = (width + 1) * (height + 1);
        if data.len() != expected_len {
            return Err(IntegralError::InvalidImageData {
                expected_len,
                actual_len: data.len(),
            });
        }
        Ok(Self { data, width, height })
    }

    /// Width of the source image
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height of the source image
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn at(&self, x: usize, y: usize) -> u32 {
        self.data[y * (self.width + 1) + x]
    }

    /// Sum of source pixels in `[left, right) x [top, bottom)`.
    ///
    /// Corners are integral-image coordinates, so `right` may equal `width`.
    /// Returns `None` for an empty or out-of-range box.
    #[inline]
    pub fn box_sum(&self, left: usize, top: usize, right: usize, bottom: usize) -> Option<u32> {
        if left >= right || top >= bottom || right > self.width || bottom > self.height {
            return None;
        }
        Some(
            self.at(right, bottom)
                .wrapping_sub(self.at(left, bottom))
                .wrapping_add(self.at(left, top))
                .wrapping_sub(self.at(right, top)),
        )
    }
}
