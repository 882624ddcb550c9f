//! Axis-aligned box built from six rectangles.

use crate::hittable::{HitRecord, Hittable, HittableList};
use crate::material::Material;
use crate::rect::AaRect;
use ember_math::{Aabb, Interval, Ray, Vec3};
use rand::RngCore;
use std::sync::Arc;

/// A closed box between two corners, all faces sharing one material.
///
/// Faces on the minimum side of each axis point their normal outward along
/// the negative axis, so front faces are always the outside of the box.
pub struct AaBox {
    sides: HittableList,
    bbox: Aabb,
}

impl AaBox {
    /// Create a box spanning the corners `p0` and `p1`, in any order.
    pub fn new(p0: Vec3, p1: Vec3, material: Arc<dyn Material>) -> Self {
        let min = p0.min(p1);
        let max = p0.max(p1);

        let x = (min.x, max.x);
        let y = (min.y, max.y);
        let z = (min.z, max.z);

        let mut sides = HittableList::new();
        sides.add(Box::new(AaRect::xy(x, y, max.z, material.clone())));
        sides.add(Box::new(AaRect::xy(x, y, min.z, material.clone()).flipped()));
        sides.add(Box::new(AaRect::xz(x, z, max.y, material.clone())));
        sides.add(Box::new(AaRect::xz(x, z, min.y, material.clone()).flipped()));
        sides.add(Box::new(AaRect::yz(y, z, max.x, material.clone())));
        sides.add(Box::new(AaRect::yz(y, z, min.x, material).flipped()));

        Self {
            sides,
            bbox: Aabb::from_points(min, max),
        }
    }
}

impl Hittable for AaBox {
    fn hit<'a>(
        &'a self,
        ray: &Ray,
        ray_t: Interval,
        rng: &mut dyn RngCore,
    ) -> Option<HitRecord<'a>> {
        self.sides.hit(ray, ray_t, rng)
    }

    fn bounding_box(&self, _time: Interval) -> Aabb {
        self.bbox
    }
}
