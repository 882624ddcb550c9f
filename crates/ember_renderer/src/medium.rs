//! Participating media (smoke, fog).

use crate::hittable::{HitRecord, Hittable};
use crate::material::Isotropic;
use crate::sampling::gen_f32;
use ember_core::{Color, Texture};
use ember_math::{Aabb, Interval, Ray, Vec3};
use rand::RngCore;
use std::sync::Arc;

/// Offset past the entry point when searching for the exit.
const EXIT_EPSILON: f32 = 0.0001;

/// A volume of constant density filling a convex boundary.
///
/// Rays passing through the boundary scatter at an exponentially distributed
/// distance; those that travel further than the chord length pass through.
/// The free-flight distance is drawn from the caller's random stream on every
/// query.
pub struct ConstantMedium {
    boundary: Box<dyn Hittable>,
    neg_inv_density: f32,
    phase_function: Isotropic,
}

impl ConstantMedium {
    pub fn new(boundary: Box<dyn Hittable>, density: f32, albedo: Arc<dyn Texture>) -> Self {
        Self {
            boundary,
            neg_inv_density: -1.0 / density,
            phase_function: Isotropic::from_texture(albedo),
        }
    }

    pub fn from_color(boundary: Box<dyn Hittable>, density: f32, color: Color) -> Self {
        Self {
            boundary,
            neg_inv_density: -1.0 / density,
            phase_function: Isotropic::new(color),
        }
    }
}

impl Hittable for ConstantMedium {
    fn hit<'a>(
        &'a self,
        ray: &Ray,
        ray_t: Interval,
        rng: &mut dyn RngCore,
    ) -> Option<HitRecord<'a>> {
        let entry = self.boundary.hit(ray, Interval::UNIVERSE, rng)?;
        let exit = self.boundary.hit(
            ray,
            Interval::new(entry.t + EXIT_EPSILON, f32::INFINITY),
            rng,
        )?;

        let mut t_enter = entry.t.max(ray_t.min);
        let t_exit = exit.t.min(ray_t.max);
        if t_enter >= t_exit {
            return None;
        }
        t_enter = t_enter.max(0.0);

        let ray_length = ray.direction().length();
        let distance_inside_boundary = (t_exit - t_enter) * ray_length;
        let hit_distance = self.neg_inv_density * gen_f32(rng).ln();
        if hit_distance > distance_inside_boundary {
            return None;
        }

        let t = t_enter + hit_distance / ray_length;

        // Normal and facing are arbitrary inside a volume
        Some(HitRecord {
            p: ray.at(t),
            normal: Vec3::X,
            material: &self.phase_function,
            u: 0.0,
            v: 0.0,
            t,
            front_face: true,
        })
    }

    fn bounding_box(&self, time: Interval) -> Aabb {
        self.boundary.bounding_box(time)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aabox::AaBox;
    use crate::material::Lambertian;
    use crate::sphere::Sphere;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn boundary() -> Box<dyn Hittable> {
        Box::new(Sphere::new(
            Vec3::new(0.0, 0.0, -5.0),
            1.0,
            Arc::new(Lambertian::new(Color::ONE)),
        ))
    }

    fn front() -> Interval {
        Interval::new(0.001, f32::INFINITY)
    }

    #[test]
    fn test_dense_medium_scatters_inside_boundary() {
        let fog = ConstantMedium::from_color(boundary(), 1000.0, Color::ONE);
        let mut rng = StdRng::seed_from_u64(7);

        let ray = Ray::new_simple(Vec3::ZERO, Vec3::NEG_Z);
        let rec = fog.hit(&ray, front(), &mut rng).unwrap();

        assert!(rec.t >= 4.0 && rec.t <= 6.0);
        assert_eq!(rec.normal, Vec3::X);
        assert!(rec.front_face);
    }

    #[test]
    fn test_thin_medium_mostly_passes_through() {
        let fog = ConstantMedium::from_color(boundary(), 0.001, Color::ONE);
        let mut rng = StdRng::seed_from_u64(11);
        let ray = Ray::new_simple(Vec3::ZERO, Vec3::NEG_Z);

        let hits = (0..1000)
            .filter(|_| fog.hit(&ray, front(), &mut rng).is_some())
            .count();
        // Expected scatter probability is about 0.2%
        assert!(hits < 50, "hits = {}", hits);
    }

    #[test]
    fn test_ray_missing_boundary_never_scatters() {
        let fog = ConstantMedium::from_color(boundary(), 1000.0, Color::ONE);
        let mut rng = StdRng::seed_from_u64(3);

        let ray = Ray::new_simple(Vec3::ZERO, Vec3::Y);
        for _ in 0..100 {
            assert!(fog.hit(&ray, front(), &mut rng).is_none());
        }
    }

    #[test]
    fn test_ray_starting_inside_scatters_ahead() {
        let fog = ConstantMedium::from_color(
            Box::new(AaBox::new(
                Vec3::splat(-1.0),
                Vec3::splat(1.0),
                Arc::new(Lambertian::new(Color::ONE)),
            )),
            1000.0,
            Color::ONE,
        );
        let mut rng = StdRng::seed_from_u64(5);

        let ray = Ray::new_simple(Vec3::ZERO, Vec3::X);
        let rec = fog.hit(&ray, front(), &mut rng).unwrap();
        assert!(rec.t >= 0.0 && rec.t <= 1.0);
    }

    #[test]
    fn test_medium_bounds_match_boundary() {
        let fog = ConstantMedium::from_color(boundary(), 0.5, Color::ONE);
        assert_eq!(
            fog.bounding_box(Interval::UNIT),
            boundary().bounding_box(Interval::UNIT)
        );
    }
}
