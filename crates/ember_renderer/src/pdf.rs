//! Sampling densities for diffuse scattering.

use crate::sampling::{random_cosine_direction, random_unit_vector};
use ember_math::{near_zero, Onb, Vec3};
use rand::RngCore;
use std::f32::consts::PI;

/// Density of the uniform distribution over the unit sphere.
pub const UNIFORM_SPHERE_PDF: f32 = 1.0 / (4.0 * PI);

/// A probability density over directions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Pdf {
    /// Cosine-weighted hemisphere around the basis `w` axis.
    Cosine(Onb),
    /// Uniform over the whole sphere.
    UniformSphere,
}

impl Pdf {
    /// Cosine-weighted hemisphere around `normal`.
    pub fn cosine(normal: Vec3) -> Self {
        Pdf::Cosine(Onb::from_w(normal))
    }

    /// Density of sampling `direction` (any length).
    pub fn value(&self, direction: Vec3) -> f32 {
        match self {
            Pdf::Cosine(uvw) => {
                let cosine = direction.normalize_or_zero().dot(uvw.w());
                (cosine / PI).max(0.0)
            }
            Pdf::UniformSphere => UNIFORM_SPHERE_PDF,
        }
    }

    /// Draw a direction from the density.
    pub fn generate(&self, rng: &mut dyn RngCore) -> Vec3 {
        match self {
            Pdf::Cosine(uvw) => {
                let direction = uvw.local(random_cosine_direction(rng));
                if near_zero(direction) {
                    uvw.w()
                } else {
                    direction
                }
            }
            Pdf::UniformSphere => random_unit_vector(rng),
        }
    }
}
