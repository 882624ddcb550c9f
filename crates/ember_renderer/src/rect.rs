//! Axis-aligned rectangles.

use crate::hittable::{HitRecord, Hittable};
use crate::material::Material;
use ember_math::{Aabb, Interval, Ray, Vec3};
use rand::RngCore;
use std::sync::Arc;

/// Which coordinate plane a rectangle lies in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Plane {
    XY,
    XZ,
    YZ,
}

impl Plane {
    /// Axis indices `(a, b, normal)`: the two in-plane axes followed by the
    /// axis the rectangle is perpendicular to.
    #[inline]
    fn axes(self) -> (usize, usize, usize) {
        match self {
            Plane::XY => (0, 1, 2),
            Plane::XZ => (0, 2, 1),
            Plane::YZ => (1, 2, 0),
        }
    }
}

/// A rectangle `[a0, a1] x [b0, b1]` lying in `plane` at offset `k` along the
/// remaining axis.
///
/// The outward normal is the positive normal axis unless the rectangle was
/// [`flipped`](AaRect::flipped). Hits report `(u, v)` as the normalized
/// in-plane coordinates.
pub struct AaRect {
    plane: Plane,
    a: Interval,
    b: Interval,
    k: f32,
    outward_normal: Vec3,
    material: Arc<dyn Material>,
}

impl AaRect {
    pub fn new(
        plane: Plane,
        a: (f32, f32),
        b: (f32, f32),
        k: f32,
        material: Arc<dyn Material>,
    ) -> Self {
        let (_, _, n) = plane.axes();
        let mut outward_normal = Vec3::ZERO;
        outward_normal[n] = 1.0;

        Self {
            plane,
            a: Interval::new(a.0.min(a.1), a.0.max(a.1)),
            b: Interval::new(b.0.min(b.1), b.0.max(b.1)),
            k,
            outward_normal,
            material,
        }
    }

    /// Rectangle in the XY plane at `z = k`.
    pub fn xy(x: (f32, f32), y: (f32, f32), k: f32, material: Arc<dyn Material>) -> Self {
        Self::new(Plane::XY, x, y, k, material)
    }

    /// Rectangle in the XZ plane at `y = k`.
    pub fn xz(x: (f32, f32), z: (f32, f32), k: f32, material: Arc<dyn Material>) -> Self {
        Self::new(Plane::XZ, x, z, k, material)
    }

    /// Rectangle in the YZ plane at `x = k`.
    pub fn yz(y: (f32, f32), z: (f32, f32), k: f32, material: Arc<dyn Material>) -> Self {
        Self::new(Plane::YZ, y, z, k, material)
    }

    /// Point the outward normal along the negative axis.
    pub fn flipped(mut self) -> Self {
        self.outward_normal = -self.outward_normal;
        self
    }

    pub fn plane(&self) -> Plane {
        self.plane
    }
}

impl Hittable for AaRect {
    fn hit<'a>(
        &'a self,
        ray: &Ray,
        ray_t: Interval,
        _rng: &mut dyn RngCore,
    ) -> Option<HitRecord<'a>> {
        let (ai, bi, ni) = self.plane.axes();
        let origin = ray.origin();
        let direction = ray.direction();

        // A ray parallel to the plane divides by zero and fails the interval check
        let t = (self.k - origin[ni]) / direction[ni];
        if !ray_t.surrounds(t) {
            return None;
        }

        let a = origin[ai] + t * direction[ai];
        let b = origin[bi] + t * direction[bi];
        if !self.a.contains(a) || !self.b.contains(b) {
            return None;
        }

        let uv = (self.a.normalized(a), self.b.normalized(b));
        Some(HitRecord::new(
            ray,
            t,
            self.outward_normal,
            self.material.as_ref(),
            uv,
        ))
    }

    fn bounding_box(&self, _time: Interval) -> Aabb {
        let (ai, bi, ni) = self.plane.axes();
        let mut min = Vec3::ZERO;
        let mut max = Vec3::ZERO;
        min[ai] = self.a.min;
        max[ai] = self.a.max;
        min[bi] = self.b.min;
        max[bi] = self.b.max;
        min[ni] = self.k;
        max[ni] = self.k;

        // Zero thickness along the normal axis; from_points pads it
        Aabb::from_points(min, max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::Lambertian;
    use ember_core::Color;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn gray() -> Arc<dyn Material> {
        Arc::new(Lambertian::new(Color::splat(0.5)))
    }

    fn front() -> Interval {
        Interval::new(0.001, f32::INFINITY)
    }

    #[test]
    fn test_xy_rect_hit_and_uv() {
        let rect = AaRect::xy((0.0, 2.0), (0.0, 4.0), -1.0, gray());
        let mut rng = StdRng::seed_from_u64(0);

        let ray = Ray::new_simple(Vec3::new(0.5, 3.0, 0.0), Vec3::NEG_Z);
        let rec = rect.hit(&ray, front(), &mut rng).unwrap();

        assert!((rec.t - 1.0).abs() < 1e-6);
        assert!((rec.u - 0.25).abs() < 1e-6);
        assert!((rec.v - 0.75).abs() < 1e-6);
        assert!(rec.front_face);
        assert_eq!(rec.normal, Vec3::Z);
    }

    #[test]
    fn test_rect_miss_outside_and_parallel() {
        let rect = AaRect::xz((-1.0, 1.0), (-1.0, 1.0), 0.0, gray());
        let mut rng = StdRng::seed_from_u64(0);

        let ray = Ray::new_simple(Vec3::new(2.0, 1.0, 0.0), Vec3::NEG_Y);
        assert!(rect.hit(&ray, front(), &mut rng).is_none());

        let ray = Ray::new_simple(Vec3::new(0.0, 1.0, 0.0), Vec3::X);
        assert!(rect.hit(&ray, front(), &mut rng).is_none());

        let ray = Ray::new_simple(Vec3::new(0.0, 1.0, 0.0), Vec3::NEG_Y);
        let rec = rect.hit(&ray, front(), &mut rng).unwrap();
        assert_eq!(rec.normal, Vec3::Y);
    }

    #[test]
    fn test_yz_rect_back_face() {
        let rect = AaRect::yz((0.0, 1.0), (0.0, 1.0), 3.0, gray());
        let mut rng = StdRng::seed_from_u64(0);

        // Travelling along +X reaches the face from behind its +X normal
        let ray = Ray::new_simple(Vec3::new(0.0, 0.5, 0.5), Vec3::X);
        let rec = rect.hit(&ray, front(), &mut rng).unwrap();
        assert!(!rec.front_face);
        assert_eq!(rec.normal, Vec3::NEG_X);

        let flipped = AaRect::yz((0.0, 1.0), (0.0, 1.0), 3.0, gray()).flipped();
        let rec = flipped.hit(&ray, front(), &mut rng).unwrap();
        assert!(rec.front_face);
    }

    #[test]
    fn test_rect_bounding_box_has_thickness() {
        let rect = AaRect::xz((213.0, 343.0), (227.0, 332.0), 554.0, gray());
        let bbox = rect.bounding_box(Interval::UNIT);

        assert!(bbox.y.size() > 0.0);
        assert!(bbox.y.contains(554.0));
        assert_eq!(bbox.x, Interval::new(213.0, 343.0));
        assert_eq!(rect.plane(), Plane::XZ);
    }
}
