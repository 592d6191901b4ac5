use glam::Vec3;
use lumen_common::JitterShape;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

/// Uniformly distributed light positions inside a ball or disc around a nominal position.
///
/// Uses rejection sampling from the bounding cube (square for discs), so there is
/// no bias toward the center, the rim, or the corners.
#[derive(Debug, Clone)]
pub struct JitteredLightSampler {
    rng: Pcg32,
    shape: JitterShape,
}

impl JitteredLightSampler {
    pub fn new(shape: JitterShape, seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
            shape,
        }
    }

    pub fn shape(&self) -> JitterShape {
        self.shape
    }

    /// A position within `radius` of `nominal`. A non-positive radius returns `nominal`.
    pub fn sample(&mut self, nominal: Vec3, radius: f32) -> Vec3 {
        if !(radius > 0.0) {
            return nominal;
        }
        nominal + self.unit_offset() * radius
    }

    fn unit_offset(&mut self) -> Vec3 {
        loop {
            let x = self.rng.random_range(-1.0f32..=1.0);
            let z = self.rng.random_range(-1.0f32..=1.0);
            let y = match self.shape {
                JitterShape::Sphere => self.rng.random_range(-1.0f32..=1.0),
                JitterShape::Disc => 0.0,
            };
            let v = Vec3::new(x, y, z);
            if v.length_squared() <= 1.0 {
                return v;
            }
        }
    }
}
