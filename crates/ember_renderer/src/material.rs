//! Material trait for surface scattering.
//!
//! A material answers three questions about a hit: how much light the
//! surface emits, whether and how the incoming ray continues, and (for
//! diffuse continuations) the density of scattering in a given direction.

use crate::hittable::HitRecord;
use crate::pdf::{Pdf, UNIFORM_SPHERE_PDF};
use crate::sampling::{gen_f32, random_in_unit_sphere};
use ember_core::{Color, SolidColor, Texture};
use ember_math::{reflect, refract, Ray, Vec3};
use rand::RngCore;
use std::f32::consts::PI;
use std::sync::Arc;

/// How an incoming ray continues after a scattering event.
#[derive(Debug, Clone, Copy)]
pub enum ScatterRecord {
    /// A single deterministic continuation ray.
    Specular { ray: Ray, attenuation: Color },
    /// Continue in a direction drawn from `pdf`, weighted by the material's
    /// scattering density.
    Diffuse { attenuation: Color, pdf: Pdf },
}

/// Trait for materials that describe how light interacts with surfaces.
pub trait Material: Send + Sync {
    /// Scatter an incoming ray, or `None` if it is absorbed.
    fn scatter(
        &self,
        ray_in: &Ray,
        rec: &HitRecord,
        rng: &mut dyn RngCore,
    ) -> Option<ScatterRecord>;

    /// Density of scattering from `ray_in` into `scattered`.
    fn scattering_pdf(&self, _ray_in: &Ray, _rec: &HitRecord, _scattered: &Ray) -> f32 {
        0.0
    }

    /// Light emitted at surface coordinates `(u, v)` and point `p`.
    ///
    /// Most materials return black (no emission).
    fn emitted(&self, _ray_in: &Ray, _rec: &HitRecord, _u: f32, _v: f32, _p: Vec3) -> Color {
        Color::ZERO
    }
}

fn solid(color: Color) -> Arc<dyn Texture> {
    Arc::new(SolidColor::new(color))
}

/// Lambertian (diffuse) material.
#[derive(Clone)]
pub struct Lambertian {
    albedo: Arc<dyn Texture>,
}

impl Lambertian {
    /// Create a new Lambertian material with the given albedo color.
    pub fn new(albedo: Color) -> Self {
        Self::from_texture(solid(albedo))
    }

    pub fn from_texture(albedo: Arc<dyn Texture>) -> Self {
        Self { albedo }
    }
}

impl Material for Lambertian {
    fn scatter(
        &self,
        _ray_in: &Ray,
        rec: &HitRecord,
        _rng: &mut dyn RngCore,
    ) -> Option<ScatterRecord> {
        Some(ScatterRecord::Diffuse {
            attenuation: self.albedo.value(rec.u, rec.v, rec.p),
            pdf: Pdf::cosine(rec.normal),
        })
    }

    fn scattering_pdf(&self, _ray_in: &Ray, rec: &HitRecord, scattered: &Ray) -> f32 {
        let cosine = rec.normal.dot(scattered.direction().normalize_or_zero());
        if cosine < 0.0 {
            0.0
        } else {
            cosine / PI
        }
    }
}

/// Metal (specular) material.
pub struct Metal {
    albedo: Arc<dyn Texture>,
    fuzz: f32,
}

impl Metal {
    /// Create a new Metal material.
    ///
    /// - `albedo`: The color of the metal
    /// - `fuzz`: Roughness, 0.0 = perfect mirror, 1.0 = very rough
    pub fn new(albedo: Color, fuzz: f32) -> Self {
        Self::from_texture(solid(albedo), fuzz)
    }

    pub fn from_texture(albedo: Arc<dyn Texture>, fuzz: f32) -> Self {
        Self {
            albedo,
            fuzz: fuzz.min(1.0),
        }
    }
}

impl Material for Metal {
    fn scatter(
        &self,
        ray_in: &Ray,
        rec: &HitRecord,
        rng: &mut dyn RngCore,
    ) -> Option<ScatterRecord> {
        let reflected = reflect(ray_in.direction().normalize(), rec.normal);
        let direction = reflected + self.fuzz * random_in_unit_sphere(rng);

        // Fuzz pushed the ray below the surface
        if direction.dot(rec.normal) <= 0.0 {
            return None;
        }

        Some(ScatterRecord::Specular {
            ray: Ray::new(rec.p, direction, ray_in.time()),
            attenuation: self.albedo.value(rec.u, rec.v, rec.p),
        })
    }
}

/// Dielectric (glass) material.
pub struct Dielectric {
    /// Index of refraction
    ior: f32,
}

impl Dielectric {
    /// Create a new Dielectric material.
    ///
    /// - `ior`: Index of refraction (1.0 = air, 1.5 = glass, 2.4 = diamond)
    pub fn new(ior: f32) -> Self {
        Self { ior }
    }

    /// Schlick's approximation for reflectance
    fn reflectance(cosine: f32, ior: f32) -> f32 {
        let r0 = ((1.0 - ior) / (1.0 + ior)).powi(2);
        r0 + (1.0 - r0) * (1.0 - cosine).powi(5)
    }
}

impl Material for Dielectric {
    fn scatter(
        &self,
        ray_in: &Ray,
        rec: &HitRecord,
        rng: &mut dyn RngCore,
    ) -> Option<ScatterRecord> {
        let refraction_ratio = if rec.front_face {
            1.0 / self.ior
        } else {
            self.ior
        };

        let unit_direction = ray_in.direction().normalize();
        let cos_theta = (-unit_direction).dot(rec.normal).min(1.0);
        let sin_theta = (1.0 - cos_theta * cos_theta).sqrt();

        // Check for total internal reflection
        let cannot_refract = refraction_ratio * sin_theta > 1.0;

        let direction = if cannot_refract
            || Self::reflectance(cos_theta, refraction_ratio) > gen_f32(rng)
        {
            reflect(unit_direction, rec.normal)
        } else {
            refract(unit_direction, rec.normal, refraction_ratio)
        };

        Some(ScatterRecord::Specular {
            ray: Ray::new(rec.p, direction, ray_in.time()),
            attenuation: Color::ONE,
        })
    }
}

/// Diffuse light emitter.
pub struct DiffuseLight {
    emit: Arc<dyn Texture>,
    front_only: bool,
}

impl DiffuseLight {
    /// Create a new diffuse light with the given emission color.
    pub fn new(emit: Color) -> Self {
        Self::from_texture(solid(emit))
    }

    pub fn from_texture(emit: Arc<dyn Texture>) -> Self {
        Self {
            emit,
            front_only: false,
        }
    }

    /// Emit only from the front face.
    pub fn front_only(mut self) -> Self {
        self.front_only = true;
        self
    }
}

impl Material for DiffuseLight {
    fn scatter(
        &self,
        _ray_in: &Ray,
        _rec: &HitRecord,
        _rng: &mut dyn RngCore,
    ) -> Option<ScatterRecord> {
        None
    }

    fn emitted(&self, _ray_in: &Ray, rec: &HitRecord, u: f32, v: f32, p: Vec3) -> Color {
        if self.front_only && !rec.front_face {
            return Color::ZERO;
        }
        self.emit.value(u, v, p)
    }
}

/// Phase function of a participating medium: scatters uniformly in all
/// directions.
pub struct Isotropic {
    albedo: Arc<dyn Texture>,
}

impl Isotropic {
    pub fn new(albedo: Color) -> Self {
        Self::from_texture(solid(albedo))
    }

    pub fn from_texture(albedo: Arc<dyn Texture>) -> Self {
        Self { albedo }
    }
}

impl Material for Isotropic {
    fn scatter(
        &self,
        _ray_in: &Ray,
        rec: &HitRecord,
        _rng: &mut dyn RngCore,
    ) -> Option<ScatterRecord> {
        Some(ScatterRecord::Diffuse {
            attenuation: self.albedo.value(rec.u, rec.v, rec.p),
            pdf: Pdf::UniformSphere,
        })
    }

    fn scattering_pdf(&self, _ray_in: &Ray, _rec: &HitRecord, _scattered: &Ray) -> f32 {
        UNIFORM_SPHERE_PDF
    }
}
