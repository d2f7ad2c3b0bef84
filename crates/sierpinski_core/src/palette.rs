//! Depth-derived color

use sierpinski_math::Vec3;

use crate::depth::MAX_DEPTH;

/// Linear color ramp from `shallow` (depth 0) to `deep` (`MAX_DEPTH`)
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DepthPalette {
    pub shallow: Vec3,
    pub deep: Vec3,
}

impl Default for DepthPalette {
    fn default() -> Self {
        Self {
            shallow: Vec3::new(1.0, 0.2, 0.5),
            deep: Vec3::new(0.2, 0.8, 0.1),
        }
    }
}

impl DepthPalette {
    pub fn new(shallow: Vec3, deep: Vec3) -> Self {
        Self { shallow, deep }
    }

    /// Color for `depth`; depths past `MAX_DEPTH` get the deep color
    pub fn color_for(&self, depth: u32) -> [f32; 3] {
        let t = depth.min(MAX_DEPTH) as f32 / MAX_DEPTH as f32;
        self.shallow.lerp(self.deep, t).to_array()
    }
}
