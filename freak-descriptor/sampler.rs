use freak_core::consts::NB_POINTS;
use freak_core::IntegralImage;
use freak_pattern::PatternTable;

use crate::error::Rejection;

/// Box-filtered intensity of pattern points, read from an integral image.
///
/// Each point is smoothed by averaging a square box of half-side `sigma`
/// centred on its rotated, scaled position. Boxes are never clamped to the
/// image: one that would leave it is reported as a [`Rejection`].
#[derive(Clone, Copy)]
pub struct IntensitySampler<'a> {
    table: &'a PatternTable,
    integral: &'a IntegralImage,
}

impl<'a> IntensitySampler<'a> {
    pub fn new(table: &'a PatternTable, integral: &'a IntegralImage) -> Self {
        Self { table, integral }
    }

    /// Mean intensity around one pattern point of the keypoint at `(kp_x, kp_y)`
    #[inline]
    pub fn mean_intensity(
        &self,
        kp_x: f32,
        kp_y: f32,
        scale: usize,
        orientation: usize,
        point: usize,
    ) -> Result<u8, Rejection> {
        let p = self.table.point(scale, orientation, point);
        let xf = p.x + kp_x;
        let yf = p.y + kp_y;
        let r = p.sigma;

        // Integral coordinates, one past the box on the right and bottom
        let left = (xf - r + 0.5).floor();
        let top = (yf - r + 0.5).floor();
        let right = (xf + r + 1.5).floor();
        let bottom = (yf + r + 1.5).floor();

        let inside = left >= 0.0
            && top >= 0.0
            && right <= self.integral.width() as f32
            && bottom <= self.integral.height() as f32;
        if !inside {
            return Err(Rejection::SampleOutOfBounds { point });
        }

        let (left, top, right, bottom) = (left as usize, top as usize, right as usize, bottom as usize);
        let sum = self
            .integral
            .box_sum(left, top, right, bottom)
            .ok_or(Rejection::SampleOutOfBounds { point })?;
        let area = ((right - left) * (bottom - top)) as u32;
        Ok((sum / area) as u8)
    }

    /// Intensities of all pattern points at one scale and orientation
    pub fn sample_all(
        &self,
        kp_x: f32,
        kp_y: f32,
        scale: usize,
        orientation: usize,
    ) -> Result<[u8; NB_POINTS], Rejection> {
        let mut values = [0u8; NB_POINTS];
        for (point, value) in values.iter_mut().enumerate() {
            *value = self.mean_intensity(kp_x, kp_y, scale, orientation, point)?;
        }
        Ok(values)
    }
}
