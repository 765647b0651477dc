/// Sampling location relative to the keypoint centre
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PatternPoint {
    pub x: f32,
    pub y: f32,
    /// Half side of the averaging box
    pub sigma: f32,
}

/// Two pattern points whose intensities are compared for one descriptor bit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DescriptionPair {
    pub i: u8,
    pub j: u8,
}

impl DescriptionPair {
    pub fn new(i: u8, j: u8) -> Self {
        Self { i, j }
    }

    /// Order-independent key, `(max, min)`
    pub fn unordered(&self) -> (u8, u8) {
        (self.i.max(self.j), self.i.min(self.j))
    }
}

/// Pattern-point pair feeding the orientation estimate.
///
/// Weights are `(p_i - p_j) / |p_i - p_j|^2`, scaled by 4096 and rounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OrientationPair {
    pub i: u8,
    pub j: u8,
    pub weight_dx: i32,
    pub weight_dy: i32,
}
