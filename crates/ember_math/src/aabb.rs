use crate::{Interval, Ray, Vec3};

/// Minimum slab thickness; thinner axes are padded up to this.
const PAD_DELTA: f32 = 0.0001;

/// Axis-Aligned Bounding Box for spatial acceleration structures (BVH).
///
/// An AABB is defined by three intervals (one per axis) that bound a 3D volume.
/// Boxes built through [`Aabb::new`] or [`Aabb::from_points`] never have a
/// zero-thickness axis, so the slab test cannot miss flat geometry.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Aabb {
    pub x: Interval,
    pub y: Interval,
    pub z: Interval,
}

impl Aabb {
    /// Create a new AABB from three intervals.
    pub fn new(x: Interval, y: Interval, z: Interval) -> Self {
        let mut aabb = Self { x, y, z };
        aabb.pad_to_minimums();
        aabb
    }

    /// Create an AABB from two corner points, in any order.
    pub fn from_points(a: Vec3, b: Vec3) -> Self {
        Self::new(
            Interval::new(a.x.min(b.x), a.x.max(b.x)),
            Interval::new(a.y.min(b.y), a.y.max(b.y)),
            Interval::new(a.z.min(b.z), a.z.max(b.z)),
        )
    }

    /// Create an AABB that surrounds two other AABBs.
    pub fn surrounding(box0: &Aabb, box1: &Aabb) -> Self {
        Self {
            x: Interval::surrounding(&box0.x, &box1.x),
            y: Interval::surrounding(&box0.y, &box1.y),
            z: Interval::surrounding(&box0.z, &box1.z),
        }
    }

    /// Get the interval for a specific axis (0=X, 1=Y, 2=Z).
    #[inline]
    pub fn axis_interval(&self, n: usize) -> Interval {
        match n {
            0 => self.x,
            1 => self.y,
            _ => self.z,
        }
    }

    /// Test if a ray intersects this AABB within the given interval.
    ///
    /// Uses the slab method. The interval is narrowed axis by axis and the test
    /// fails as soon as it becomes empty.
    pub fn hit(&self, r: &Ray, mut ray_t: Interval) -> bool {
        let origin = r.origin.to_array();
        let direction = r.direction.to_array();

        for axis in 0..3 {
            let slab = self.axis_interval(axis);
            let adinv = 1.0 / direction[axis];

            let mut t0 = (slab.min - origin[axis]) * adinv;
            let mut t1 = (slab.max - origin[axis]) * adinv;
            if adinv < 0.0 {
                std::mem::swap(&mut t0, &mut t1);
            }

            ray_t.min = t0.max(ray_t.min);
            ray_t.max = t1.min(ray_t.max);
            if ray_t.max <= ray_t.min {
                return false;
            }
        }

        true
    }

    /// Returns true if `other` lies entirely inside this box.
    pub fn encloses(&self, other: &Aabb) -> bool {
        self.x.encloses(&other.x) && self.y.encloses(&other.y) && self.z.encloses(&other.z)
    }

    /// Pad intervals to avoid zero-width AABBs (degenerate cases).
    fn pad_to_minimums(&mut self) {
        if self.x.size() < PAD_DELTA {
            self.x = self.x.expand(PAD_DELTA);
        }
        if self.y.size() < PAD_DELTA {
            self.y = self.y.expand(PAD_DELTA);
        }
        if self.z.size() < PAD_DELTA {
            self.z = self.z.expand(PAD_DELTA);
        }
    }

    /// Returns the index (0=X, 1=Y, 2=Z) of the axis with the longest extent.
    pub fn longest_axis(&self) -> usize {
        let x_size = self.x.size();
        let y_size = self.y.size();
        let z_size = self.z.size();

        if x_size > y_size && x_size > z_size {
            0
        } else if y_size > z_size {
            1
        } else {
            2
        }
    }

    /// Returns the center point of the bounding box.
    pub fn centroid(&self) -> Vec3 {
        Vec3::new(
            (self.x.min + self.x.max) * 0.5,
            (self.y.min + self.y.max) * 0.5,
            (self.z.min + self.z.max) * 0.5,
        )
    }

    /// The box containing nothing; the identity for [`Aabb::surrounding`].
    pub const EMPTY: Aabb = Aabb {
        x: Interval::EMPTY,
        y: Interval::EMPTY,
        z: Interval::EMPTY,
    };

    pub const UNIVERSE: Aabb = Aabb {
        x: Interval::UNIVERSE,
        y: Interval::UNIVERSE,
        z: Interval::UNIVERSE,
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    fn boxes() -> [Aabb; 3] {
        [
            Aabb::from_points(Vec3::ZERO, Vec3::new(5.0, 5.0, 5.0)),
            Aabb::from_points(Vec3::new(3.0, -2.0, 3.0), Vec3::new(10.0, 1.0, 4.0)),
            Aabb::from_points(Vec3::new(-7.0, 0.5, 0.5), Vec3::new(-6.0, 9.0, 0.5)),
        ]
    }

    #[test]
    fn test_aabb_from_points_any_order() {
        let aabb = Aabb::from_points(Vec3::new(10.0, 0.0, 10.0), Vec3::new(0.0, 10.0, 0.0));

        assert_eq!(aabb.x, Interval::new(0.0, 10.0));
        assert_eq!(aabb.y, Interval::new(0.0, 10.0));
        assert_eq!(aabb.z, Interval::new(0.0, 10.0));
    }

    #[test]
    fn test_aabb_surrounding_contains_inputs() {
        let [a, b, c] = boxes();
        let ab = Aabb::surrounding(&a, &b);
        assert!(ab.encloses(&a));
        assert!(ab.encloses(&b));

        let abc = Aabb::surrounding(&ab, &c);
        assert!(abc.encloses(&a) && abc.encloses(&b) && abc.encloses(&c));
    }

    #[test]
    fn test_aabb_surrounding_commutative_and_associative() {
        let [a, b, c] = boxes();

        assert_eq!(Aabb::surrounding(&a, &b), Aabb::surrounding(&b, &a));

        let left = Aabb::surrounding(&Aabb::surrounding(&a, &b), &c);
        let right = Aabb::surrounding(&a, &Aabb::surrounding(&b, &c));
        assert_eq!(left, right);

        // EMPTY is the identity element
        assert_eq!(Aabb::surrounding(&Aabb::EMPTY, &a), a);
    }

    #[test]
    fn test_aabb_hit() {
        let aabb = Aabb::from_points(Vec3::new(-1.0, -1.0, -1.0), Vec3::new(1.0, 1.0, 1.0));

        // Ray pointing at center
        let ray = Ray::new(Vec3::new(0.0, 0.0, -5.0), Vec3::new(0.0, 0.0, 1.0), 0.0);
        assert!(aabb.hit(&ray, Interval::new(0.0, 100.0)));

        // Interval ends before the box
        assert!(!aabb.hit(&ray, Interval::new(0.0, 3.0)));

        // Ray pointing away
        let ray = Ray::new(Vec3::new(0.0, 0.0, -5.0), Vec3::new(0.0, 0.0, -1.0), 0.0);
        assert!(!aabb.hit(&ray, Interval::new(0.0, 100.0)));

        // Ray missing the box
        let ray = Ray::new(Vec3::new(10.0, 0.0, 0.0), Vec3::new(0.0, 0.0, 1.0), 0.0);
        assert!(!aabb.hit(&ray, Interval::new(0.0, 100.0)));
    }

    #[test]
    fn test_zero_thickness_box_is_padded_and_hit() {
        // Flat in Z: a rectangle lying in the z = 2 plane
        let flat = Aabb::from_points(Vec3::new(-1.0, -1.0, 2.0), Vec3::new(1.0, 1.0, 2.0));
        assert!(flat.z.size() > 0.0);

        let ray = Ray::new(Vec3::new(0.5, -0.5, 0.0), Vec3::new(0.0, 0.0, 1.0), 0.0);
        assert!(flat.hit(&ray, Interval::new(0.001, f32::INFINITY)));

        // Oblique ray through the plane inside the x/y ranges
        let ray = Ray::new(Vec3::new(-2.5, 0.0, 0.0), Vec3::new(1.0, 0.25, 1.0), 0.0);
        assert!(flat.hit(&ray, Interval::new(0.001, f32::INFINITY)));

        // Through the plane but outside the x range
        let ray = Ray::new(Vec3::new(3.0, 0.0, 0.0), Vec3::new(0.0, 0.0, 1.0), 0.0);
        assert!(!flat.hit(&ray, Interval::new(0.001, f32::INFINITY)));
    }

    #[test]
    fn test_aabb_centroid() {
        let aabb = Aabb::from_points(Vec3::new(0.0, 0.0, 0.0), Vec3::new(10.0, 10.0, 10.0));
        assert_eq!(aabb.centroid(), Vec3::new(5.0, 5.0, 5.0));
    }

    #[test]
    fn test_aabb_longest_axis() {
        let aabb_x = Aabb::from_points(Vec3::ZERO, Vec3::new(10.0, 1.0, 1.0));
        assert_eq!(aabb_x.longest_axis(), 0);

        let aabb_y = Aabb::from_points(Vec3::ZERO, Vec3::new(1.0, 10.0, 1.0));
        assert_eq!(aabb_y.longest_axis(), 1);

        let aabb_z = Aabb::from_points(Vec3::ZERO, Vec3::new(1.0, 1.0, 10.0));
        assert_eq!(aabb_z.longest_axis(), 2);
    }
}
