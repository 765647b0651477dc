//! Ring layout of the retina-like sampling pattern and the discretisation of
//! scale and orientation.
//!
//! Radii are normalised so the outer ring sits at 2/3 and the innermost ring at
//! 1/12. Rings get closer together towards the centre: counting gaps of
//! `unit = (2/3 - 1/12) / 21`, the outer rings are 6, 5, 4, 3 and 2 units
//! apart. Every ring's sigma is half its radius.

use std::f64::consts::{LN_2, PI, TAU};

use freak_core::consts::{NB_ORIENTATIONS, NB_POINTS, NB_SCALES, SMALLEST_KEYPOINT_SIZE};

/// Points on each concentric circle, outer to inner
pub const POINTS_PER_RING: [usize; 8] = [6, 6, 6, 6, 6, 6, 6, 1];

const BIG_R: f64 = 2.0 / 3.0;
const SMALL_R: f64 = 2.0 / 24.0;
const UNIT: f64 = (BIG_R - SMALL_R) / 21.0;

pub const RING_RADII: [f64; 8] = [
    BIG_R,
    BIG_R - 6.0 * UNIT,
    BIG_R - 11.0 * UNIT,
    BIG_R - 15.0 * UNIT,
    BIG_R - 18.0 * UNIT,
    BIG_R - 20.0 * UNIT,
    SMALL_R,
    0.0,
];

pub const RING_SIGMAS: [f64; 8] = [
    RING_RADII[0] / 2.0,
    RING_RADII[1] / 2.0,
    RING_RADII[2] / 2.0,
    RING_RADII[3] / 2.0,
    RING_RADII[4] / 2.0,
    RING_RADII[5] / 2.0,
    RING_RADII[6] / 2.0,
    RING_RADII[6] / 2.0,
];

/// Smallest box half-side in pixels, keeps every box at least one pixel wide
pub const MIN_SIGMA: f32 = 0.5;

/// Unscaled, unrotated pattern point in polar form
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RingPoint {
    pub ring: usize,
    pub radius: f64,
    pub sigma: f64,
    pub angle: f64,
}

/// The 43 pattern points in table order: outer ring first, centre last.
///
/// Odd rings are staggered by half an angular step.
pub fn ring_points() -> Vec<RingPoint> {
    let mut points = Vec::with_capacity(NB_POINTS);
    for (ring, &n) in POINTS_PER_RING.iter().enumerate() {
        let stagger = PI / n as f64 * (ring % 2) as f64;
        for k in 0..n {
            points.push(RingPoint {
                ring,
                radius: RING_RADII[ring],
                sigma: RING_SIGMAS[ring],
                angle: k as f64 * TAU / n as f64 + stagger,
            });
        }
    }
    points
}

/// Ratio between consecutive scale indices
pub fn scale_step(n_octaves: u32) -> f64 {
    2f64.powf(n_octaves as f64 / NB_SCALES as f64)
}

/// Pixel size of the unit pattern at `scale_idx`
pub fn scale_factor(pattern_scale: f32, n_octaves: u32, scale_idx: usize) -> f64 {
    pattern_scale as f64 * scale_step(n_octaves).powi(scale_idx as i32)
}

/// Pattern rotation of an orientation index, in radians
pub fn orientation_angle(orientation_idx: usize) -> f64 {
    orientation_idx as f64 * TAU / NB_ORIENTATIONS as f64
}

/// Nearest orientation index of an angle in radians, wrapped into `0..256`
pub fn orientation_index(angle: f64) -> u8 {
    let steps = (angle * NB_ORIENTATIONS as f64 / TAU).round() as i64;
    steps.rem_euclid(NB_ORIENTATIONS as i64) as u8
}

/// Scale index used to describe a keypoint of diameter `size`.
///
/// Returns `None` when scale normalisation is on and the keypoint is smaller
/// than the pattern's smallest supported size.
pub fn scale_index(size: f32, n_octaves: u32, scale_normalized: bool) -> Option<usize> {
    let size_cst = NB_SCALES as f64 / (LN_2 * n_octaves as f64);
    let raw = if scale_normalized {
        if !size.is_finite() || size < SMALLEST_KEYPOINT_SIZE {
            return None;
        }
        (size as f64 / SMALLEST_KEYPOINT_SIZE as f64).ln() * size_cst
    } else {
        // A fixed keypoint size of 3 * SMALLEST_KEYPOINT_SIZE
        3f64.ln() * size_cst
    };
    Some(((raw + 0.5).floor() as usize).min(NB_SCALES - 1))
}
