//! Triangle primitive for ray tracing.
//!
//! Uses the Möller-Trumbore algorithm for ray-triangle intersection.

use crate::hittable::{HitRecord, Hittable};
use crate::material::Material;
use ember_math::{Aabb, Interval, Ray, Vec3};
use rand::RngCore;
use std::sync::Arc;

/// Determinant threshold below which the ray counts as parallel.
const PARALLEL_EPSILON: f32 = 1e-6;

/// A flat triangle.
///
/// The outward normal follows the winding `v0 -> v1 -> v2` (right-hand rule).
/// Hits report barycentric `(u, v)` weights of `v1` and `v2`.
pub struct Triangle {
    v0: Vec3,
    edge1: Vec3,
    edge2: Vec3,
    /// Pre-computed face normal (unit length)
    normal: Vec3,
    single_sided: bool,
    material: Arc<dyn Material>,
    bbox: Aabb,
}

impl Triangle {
    /// Create a double-sided triangle from three vertices.
    pub fn new(v0: Vec3, v1: Vec3, v2: Vec3, material: Arc<dyn Material>) -> Self {
        let edge1 = v1 - v0;
        let edge2 = v2 - v0;
        let normal = edge1.cross(edge2).normalize_or_zero();

        let min = v0.min(v1).min(v2);
        let max = v0.max(v1).max(v2);

        Self {
            v0,
            edge1,
            edge2,
            normal,
            single_sided: false,
            material,
            bbox: Aabb::from_points(min, max),
        }
    }

    /// Only report hits on the front face.
    pub fn single_sided(mut self) -> Self {
        self.single_sided = true;
        self
    }

    pub fn normal(&self) -> Vec3 {
        self.normal
    }
}

impl Hittable for Triangle {
    fn hit<'a>(
        &'a self,
        ray: &Ray,
        ray_t: Interval,
        _rng: &mut dyn RngCore,
    ) -> Option<HitRecord<'a>> {
        let h = ray.direction().cross(self.edge2);
        let det = self.edge1.dot(h);

        // Ray is parallel to triangle
        if det.abs() < PARALLEL_EPSILON {
            return None;
        }

        let inv_det = 1.0 / det;
        let s = ray.origin() - self.v0;
        let u = inv_det * s.dot(h);
        if !(0.0..=1.0).contains(&u) {
            return None;
        }

        let q = s.cross(self.edge1);
        let v = inv_det * ray.direction().dot(q);
        if v < 0.0 || u + v > 1.0 {
            return None;
        }

        let t = inv_det * self.edge2.dot(q);
        if !ray_t.surrounds(t) {
            return None;
        }

        let rec = HitRecord::new(ray, t, self.normal, self.material.as_ref(), (u, v));
        if self.single_sided && !rec.front_face {
            return None;
        }

        Some(rec)
    }

    fn bounding_box(&self, _time: Interval) -> Aabb {
        self.bbox
    }
}
