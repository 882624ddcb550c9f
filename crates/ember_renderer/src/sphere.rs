//! Sphere primitives for ray tracing.

use crate::hittable::{HitRecord, Hittable};
use crate::material::Material;
use ember_math::{Aabb, Interval, Ray, Vec3};
use rand::RngCore;
use std::f32::consts::PI;
use std::sync::Arc;

/// A static sphere.
///
/// A negative radius keeps the same surface but flips its normals inward,
/// which is how hollow glass shells are modeled.
pub struct Sphere {
    center: Vec3,
    radius: f32,
    material: Arc<dyn Material>,
}

impl Sphere {
    /// Create a new sphere.
    pub fn new(center: Vec3, radius: f32, material: Arc<dyn Material>) -> Self {
        Self {
            center,
            radius,
            material,
        }
    }

    pub fn center(&self) -> Vec3 {
        self.center
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }
}

impl Hittable for Sphere {
    fn hit<'a>(
        &'a self,
        ray: &Ray,
        ray_t: Interval,
        _rng: &mut dyn RngCore,
    ) -> Option<HitRecord<'a>> {
        hit_sphere(self.center, self.radius, self.material.as_ref(), ray, ray_t)
    }

    fn bounding_box(&self, _time: Interval) -> Aabb {
        sphere_bounds(self.center, self.radius)
    }
}

/// A sphere whose center moves linearly during `time`.
///
/// Outside the motion window the center keeps extrapolating along the same
/// line.
pub struct MovingSphere {
    center0: Vec3,
    center1: Vec3,
    time: Interval,
    radius: f32,
    material: Arc<dyn Material>,
}

impl MovingSphere {
    /// Create a sphere at `center0` at `time.min` and `center1` at `time.max`.
    pub fn new(
        center0: Vec3,
        center1: Vec3,
        time: Interval,
        radius: f32,
        material: Arc<dyn Material>,
    ) -> Self {
        Self {
            center0,
            center1,
            time,
            radius,
            material,
        }
    }

    /// Center of the sphere at `time`.
    pub fn center(&self, time: f32) -> Vec3 {
        self.center0 + self.time.normalized(time) * (self.center1 - self.center0)
    }
}

impl Hittable for MovingSphere {
    fn hit<'a>(
        &'a self,
        ray: &Ray,
        ray_t: Interval,
        _rng: &mut dyn RngCore,
    ) -> Option<HitRecord<'a>> {
        let center = self.center(ray.time());
        hit_sphere(center, self.radius, self.material.as_ref(), ray, ray_t)
    }

    fn bounding_box(&self, time: Interval) -> Aabb {
        let box0 = sphere_bounds(self.center(time.min), self.radius);
        let box1 = sphere_bounds(self.center(time.max), self.radius);
        Aabb::surrounding(&box0, &box1)
    }
}

fn sphere_bounds(center: Vec3, radius: f32) -> Aabb {
    let rvec = Vec3::splat(radius.abs());
    Aabb::from_points(center - rvec, center + rvec)
}

fn hit_sphere<'a>(
    center: Vec3,
    radius: f32,
    material: &'a dyn Material,
    ray: &Ray,
    ray_t: Interval,
) -> Option<HitRecord<'a>> {
    let oc = center - ray.origin();
    let a = ray.direction().length_squared();
    let h = ray.direction().dot(oc);
    let c = oc.length_squared() - radius * radius;

    // A tangent ray (zero discriminant) counts as a hit
    let discriminant = h * h - a * c;
    if discriminant < 0.0 {
        return None;
    }

    let sqrtd = discriminant.sqrt();

    // Find the nearest root in the acceptable range
    let mut root = (h - sqrtd) / a;
    if !ray_t.surrounds(root) {
        root = (h + sqrtd) / a;
        if !ray_t.surrounds(root) {
            return None;
        }
    }

    let outward_normal = (ray.at(root) - center) / radius;
    let uv = get_sphere_uv(outward_normal);
    Some(HitRecord::new(ray, root, outward_normal, material, uv))
}

/// UV coordinates of a point on the unit sphere centered at the origin.
///
/// `u` is the angle around the Y axis measured from -X, `v` the angle from
/// -Y up to +Y, both normalized to [0, 1].
pub fn get_sphere_uv(p: Vec3) -> (f32, f32) {
    let theta = (-p.y).acos();
    let phi = (-p.z).atan2(p.x) + PI;

    (phi / (2.0 * PI), theta / PI)
}
