use freak_core::consts::{NB_ORIENTATION_PAIRS, NB_POINTS, ORIENTATION_WEIGHT_SCALE};
use freak_pattern::geometry::orientation_index;
use freak_pattern::OrientationPair;

use crate::error::Rejection;
use crate::sampler::IntensitySampler;

/// Weighted sum of intensity differences over the orientation pairs.
///
/// Accumulates in fixed point; divide by [`ORIENTATION_WEIGHT_SCALE`] for
/// the gradient in intensity units per pixel.
pub fn accumulate_gradient(
    values: &[u8; NB_POINTS],
    pairs: &[OrientationPair; NB_ORIENTATION_PAIRS],
) -> (i64, i64) {
    pairs.iter().fold((0i64, 0i64), |(sx, sy), pair| {
        let delta = values[pair.i as usize] as i64 - values[pair.j as usize] as i64;
        (
            sx + delta * pair.weight_dx as i64,
            sy + delta * pair.weight_dy as i64,
        )
    })
}

/// Discrete orientation of the unrotated pattern intensities
pub fn orientation_from_values(
    values: &[u8; NB_POINTS],
    pairs: &[OrientationPair; NB_ORIENTATION_PAIRS],
) -> u8 {
    let (sum_x, sum_y) = accumulate_gradient(values, pairs);
    let scale = ORIENTATION_WEIGHT_SCALE as f64;
    let angle = (sum_y as f64 / scale).atan2(sum_x as f64 / scale);
    orientation_index(angle)
}

/// Sample the pattern at orientation 0 and estimate the keypoint's rotation
pub fn estimate_orientation(
    sampler: &IntensitySampler<'_>,
    pairs: &[OrientationPair; NB_ORIENTATION_PAIRS],
    kp_x: f32,
    kp_y: f32,
    scale: usize,
) -> Result<u8, Rejection> {
    let values = sampler.sample_all(kp_x, kp_y, scale, 0)?;
    Ok(orientation_from_values(&values, pairs))
}

#[cfg(test)]
mod tests {
    use super::*;
    use freak_core::{FreakConfig, IntegralImage};
    use freak_pattern::PatternTable;

    fn table() -> PatternTable {
        PatternTable::build(&FreakConfig::default(), false).unwrap()
    }

    /// Linear ramp along a direction, centred on (cx, cy)
    fn ramp_image(w: usize, h: usize, angle: f64) -> Vec<u8> {
        let (s, c) = angle.sin_cos();
        let (cx, cy) = (w as f64 / 2.0, h as f64 / 2.0);
        (0..w * h)
            .map(|i| {
                let (x, y) = ((i % w) as f64 + 0.5 - cx, (i / w) as f64 + 0.5 - cy);
                (128.0 + 2.5 * (x * c + y * s)).clamp(0.0, 255.0) as u8
            })
            .collect()
    }

    #[test]
    fn test_flat_values_give_zero() {
        let table = table();
        let values = [90u8; NB_POINTS];
        assert_eq!(accumulate_gradient(&values, table.orientation_pairs()), (0, 0));
        assert_eq!(orientation_from_values(&values, table.orientation_pairs()), 0);
    }

    #[test]
    fn test_ramp_direction_is_recovered() {
        let table = table();
        let (w, h) = (100, 100);
        for &degrees in &[0.0f64, 45.0, 90.0, 180.0, 250.0] {
            let img = ramp_image(w, h, degrees.to_radians());
            let integral = IntegralImage::new(&img, w, h).unwrap();
            let sampler = IntensitySampler::new(&table, &integral);
            let idx = estimate_orientation(&sampler, table.orientation_pairs(), 50.0, 50.0, 0)
                .unwrap();
            let expected = orientation_index(degrees.to_radians()) as i32;
            let diff = (idx as i32 - expected).rem_euclid(256);
            let diff = diff.min(256 - diff);
            assert!(diff <= 3, "ramp at {} deg gave index {}, expected {}", degrees, idx, expected);
        }
    }

    #[test]
    fn test_border_keypoint_is_rejected() {
        let table = table();
        let img = vec![0u8; 40 * 40];
        let integral = IntegralImage::new(&img, 40, 40).unwrap();
        let sampler = IntensitySampler::new(&table, &integral);
        assert!(estimate_orientation(&sampler, table.orientation_pairs(), 5.0, 20.0, 0).is_err());
    }
}
