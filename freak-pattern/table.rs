use freak_core::consts::{
    NB_ALL_PAIRS, NB_ORIENTATIONS, NB_ORIENTATION_PAIRS, NB_PAIRS, NB_POINTS, NB_SCALES,
};
use freak_core::FreakConfig;
use log::debug;

use crate::error::{PatternError, PatternResult};
use crate::geometry::{self, RingPoint, MIN_SIGMA};
use crate::pair_file::read_pair_table;
use crate::pairs::{all_pairs, default_pairs, orientation_pairs, validate_description_pairs};
use crate::types::{DescriptionPair, OrientationPair, PatternPoint};

/// Immutable sampling pattern instantiated at every scale and orientation.
///
/// Built once from a [`FreakConfig`]; read-only afterwards and safe to share
/// between threads.
#[derive(Debug, Clone)]
pub struct PatternTable {
    lookup: Vec<PatternPoint>,
    sizes: [usize; NB_SCALES],
    orientation_pairs: [OrientationPair; NB_ORIENTATION_PAIRS],
    description_pairs: Vec<DescriptionPair>,
    pattern_scale: f32,
    n_octaves: u32,
}

impl PatternTable {
    /// Build the lookup tables.
    ///
    /// Description pairs come from `cfg.pair_table` when set, otherwise from
    /// the canonical 903-pair enumeration when `all_pairs` is requested,
    /// otherwise from the built-in table.
    pub fn build(cfg: &FreakConfig, all_pairs_mode: bool) -> PatternResult<Self> {
        let description_pairs = match &cfg.pair_table {
            Some(path) => read_pair_table(path)?,
            None if all_pairs_mode => all_pairs(),
            None => default_pairs(),
        };
        Self::with_description_pairs(cfg.pattern_scale, cfg.n_octaves, description_pairs)
    }

    /// Build the lookup tables around an explicit description-pair list of
    /// either 512 or 903 pairs
    pub fn with_description_pairs(
        pattern_scale: f32,
        n_octaves: u32,
        description_pairs: Vec<DescriptionPair>,
    ) -> PatternResult<Self> {
        validate_geometry(pattern_scale, n_octaves)?;
        let expected = if description_pairs.len() == NB_ALL_PAIRS {
            NB_ALL_PAIRS
        } else {
            NB_PAIRS
        };
        validate_description_pairs(&description_pairs, expected)?;

        let ring_points = geometry::ring_points();
        let (lookup, sizes) = build_lookup(&ring_points, pattern_scale, n_octaves);
        let orientation_pairs = orientation_pairs(&lookup[..NB_POINTS]);

        debug!(
            "pattern table built: scale={}, octaves={}, margins {}..{} px, {} description pairs",
            pattern_scale,
            n_octaves,
            sizes[0],
            sizes[NB_SCALES - 1],
            description_pairs.len()
        );

        Ok(Self {
            lookup,
            sizes,
            orientation_pairs,
            description_pairs,
            pattern_scale,
            n_octaves,
        })
    }

    #[inline]
    fn offset(scale: usize, orientation: usize, point: usize) -> usize {
        (scale * NB_ORIENTATIONS + orientation) * NB_POINTS + point
    }

    /// Pattern point at a scale and orientation index
    #[inline]
    pub fn point(&self, scale: usize, orientation: usize, point: usize) -> &PatternPoint {
        &self.lookup[Self::offset(scale, orientation, point)]
    }

    /// All 43 points at a scale and orientation index
    #[inline]
    pub fn points(&self, scale: usize, orientation: usize) -> &[PatternPoint] {
        let start = Self::offset(scale, orientation, 0);
        &self.lookup[start..start + NB_POINTS]
    }

    /// Margin in pixels a keypoint needs from every border at `scale`
    #[inline]
    pub fn pattern_size(&self, scale: usize) -> usize {
        self.sizes[scale]
    }

    pub fn pattern_sizes(&self) -> &[usize; NB_SCALES] {
        &self.sizes
    }

    pub fn orientation_pairs(&self) -> &[OrientationPair; NB_ORIENTATION_PAIRS] {
        &self.orientation_pairs
    }

    pub fn description_pairs(&self) -> &[DescriptionPair] {
        &self.description_pairs
    }

    /// True when every unordered pair is compared
    pub fn is_all_pairs(&self) -> bool {
        self.description_pairs.len() == NB_ALL_PAIRS
    }

    pub fn pattern_scale(&self) -> f32 {
        self.pattern_scale
    }

    pub fn n_octaves(&self) -> u32 {
        self.n_octaves
    }

    /// Scale index for a keypoint of diameter `size`, see [`geometry::scale_index`]
    pub fn scale_index(&self, size: f32, scale_normalized: bool) -> Option<usize> {
        geometry::scale_index(size, self.n_octaves, scale_normalized)
    }
}

/// Check that a pattern scale and octave count give a finite pattern at
/// every scale index, outermost ring and its blur included
pub fn validate_geometry(pattern_scale: f32, n_octaves: u32) -> PatternResult<()> {
    if !pattern_scale.is_finite() || pattern_scale <= 0.0 {
        return Err(PatternError::InvalidPatternScale(pattern_scale));
    }
    if n_octaves == 0 {
        return Err(PatternError::InvalidOctaveCount(n_octaves));
    }
    let extent = geometry::scale_factor(pattern_scale, n_octaves, NB_SCALES - 1)
        * (geometry::RING_RADII[0] + 2.0 * geometry::RING_SIGMAS[0]);
    if !(extent as f32).is_finite() {
        return Err(PatternError::PatternTooLarge {
            pattern_scale,
            n_octaves,
        });
    }
    Ok(())
}

fn build_lookup(
    ring_points: &[RingPoint],
    pattern_scale: f32,
    n_octaves: u32,
) -> (Vec<PatternPoint>, [usize; NB_SCALES]) {
    // Unit directions are shared by every scale
    let mut directions = Vec::with_capacity(NB_ORIENTATIONS * NB_POINTS);
    for orientation in 0..NB_ORIENTATIONS {
        let theta = geometry::orientation_angle(orientation);
        for rp in ring_points {
            let (sin, cos) = (rp.angle + theta).sin_cos();
            directions.push((cos, sin));
        }
    }

    let mut lookup = Vec::with_capacity(NB_SCALES * NB_ORIENTATIONS * NB_POINTS);
    let mut sizes = [0usize; NB_SCALES];

    for (scale, size) in sizes.iter_mut().enumerate() {
        let factor = geometry::scale_factor(pattern_scale, n_octaves, scale);
        let sigmas: Vec<f32> = ring_points
            .iter()
            .map(|rp| ((rp.sigma * factor) as f32).max(MIN_SIGMA))
            .collect();

        *size = ring_points
            .iter()
            .zip(&sigmas)
            .map(|(rp, &sigma)| (rp.radius * factor + 2.0 * sigma as f64).ceil() as usize)
            .max()
            .unwrap_or(0);

        for chunk in directions.chunks_exact(NB_POINTS) {
            for ((rp, &sigma), &(cos, sin)) in ring_points.iter().zip(&sigmas).zip(chunk) {
                let r = rp.radius * factor;
                lookup.push(PatternPoint {
                    x: (r * cos) as f32,
                    y: (r * sin) as f32,
                    sigma,
                });
            }
        }
    }

    (lookup, sizes)
}
