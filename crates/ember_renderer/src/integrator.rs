//! Recursive path-tracing integrator.
//!
//! Traces a ray through the scene, bouncing off surfaces until it escapes to
//! the background, is absorbed, or runs out of depth.

use crate::hittable::Hittable;
use crate::material::ScatterRecord;
use ember_core::Color;
use ember_math::{Interval, Ray};
use rand::RngCore;
use serde::{Deserialize, Serialize};

/// Closest accepted hit distance; avoids self-intersection ("shadow acne").
pub const T_MIN: f32 = 0.001;

/// Radiance seen by rays that escape the scene.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Background {
    /// The same color in every direction.
    Solid { color: Color },
    /// Vertical gradient from `horizon` (straight down) to `zenith`
    /// (straight up).
    SkyGradient { horizon: Color, zenith: Color },
}

impl Background {
    /// White-to-light-blue daylight sky.
    pub fn sky() -> Self {
        Background::SkyGradient {
            horizon: Color::ONE,
            zenith: Color::new(0.5, 0.7, 1.0),
        }
    }

    pub fn solid(color: Color) -> Self {
        Background::Solid { color }
    }

    /// Background radiance in the direction of `ray`.
    pub fn value(&self, ray: &Ray) -> Color {
        match *self {
            Background::Solid { color } => color,
            Background::SkyGradient { horizon, zenith } => {
                let unit_direction = ray.direction().normalize_or_zero();
                let a = 0.5 * (unit_direction.y + 1.0);
                horizon * (1.0 - a) + zenith * a
            }
        }
    }
}

impl Default for Background {
    fn default() -> Self {
        Self::sky()
    }
}

/// Compute the radiance carried back along `ray`.
///
/// Emission is added at every hit. Specular bounces follow their single
/// continuation; diffuse bounces sample a direction from the material's
/// density and weight it by `scattering_pdf / pdf_value`.
pub fn radiance(
    ray: &Ray,
    background: &Background,
    world: &dyn Hittable,
    depth: u32,
    rng: &mut dyn RngCore,
) -> Color {
    // If we've exceeded max depth, return black (no light)
    if depth == 0 {
        return Color::ZERO;
    }

    let Some(rec) = world.hit(ray, Interval::new(T_MIN, f32::INFINITY), rng) else {
        return background.value(ray);
    };

    let emitted = rec.material.emitted(ray, &rec, rec.u, rec.v, rec.p);

    let Some(scatter) = rec.material.scatter(ray, &rec, rng) else {
        return emitted;
    };

    match scatter {
        ScatterRecord::Specular {
            ray: continuation,
            attenuation,
        } => {
            emitted + attenuation * radiance(&continuation, background, world, depth - 1, rng)
        }
        ScatterRecord::Diffuse { attenuation, pdf } => {
            let scattered = Ray::new(rec.p, pdf.generate(rng), ray.time());
            let pdf_value = pdf.value(scattered.direction());
            if pdf_value <= 0.0 {
                return emitted;
            }

            let weight = rec.material.scattering_pdf(ray, &rec, &scattered) / pdf_value;
            emitted
                + attenuation
                    * weight
                    * radiance(&scattered, background, world, depth - 1, rng)
        }
    }
}
