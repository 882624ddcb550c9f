//! Camera for ray generation.

use crate::sampling::{gen_f32, random_in_unit_disk};
use ember_math::{Interval, Ray, Vec3};
use rand::RngCore;

/// Thin-lens camera with a shutter window.
///
/// Configure it with the `with_*` builders; the viewport is recomputed after
/// every change, so a built camera is always ready to produce rays.
#[derive(Debug, Clone)]
pub struct Camera {
    // Camera positioning
    look_from: Vec3,
    look_at: Vec3,
    vup: Vec3,

    // Lens settings
    vfov: f32,         // Vertical field of view in degrees
    aspect_ratio: f32, // Viewport width / height
    aperture: f32,     // Lens diameter
    focus_dist: f32,   // Distance from camera to plane of perfect focus

    shutter: Interval,

    // Derived viewport
    origin: Vec3,
    lower_left_corner: Vec3,
    horizontal: Vec3,
    vertical: Vec3,
    u: Vec3,
    v: Vec3,
    w: Vec3,
    lens_radius: f32,
}

impl Camera {
    /// Create a new camera with default settings.
    ///
    /// Looks from the origin down -Z with a 90 degree field of view, a square
    /// viewport, a pinhole lens and the unit shutter window.
    pub fn new() -> Self {
        let mut camera = Self {
            look_from: Vec3::ZERO,
            look_at: Vec3::new(0.0, 0.0, -1.0),
            vup: Vec3::Y,
            vfov: 90.0,
            aspect_ratio: 1.0,
            aperture: 0.0,
            focus_dist: 1.0,
            shutter: Interval::UNIT,
            origin: Vec3::ZERO,
            lower_left_corner: Vec3::ZERO,
            horizontal: Vec3::ZERO,
            vertical: Vec3::ZERO,
            u: Vec3::X,
            v: Vec3::Y,
            w: Vec3::Z,
            lens_radius: 0.0,
        };
        camera.update();
        camera
    }

    /// Set camera position.
    pub fn with_position(mut self, look_from: Vec3, look_at: Vec3, vup: Vec3) -> Self {
        self.look_from = look_from;
        self.look_at = look_at;
        self.vup = vup;
        self.update();
        self
    }

    /// Set lens settings. The lens radius is half the aperture.
    pub fn with_lens(mut self, vfov: f32, aperture: f32, focus_dist: f32) -> Self {
        self.vfov = vfov;
        self.aperture = aperture.max(0.0);
        self.focus_dist = focus_dist;
        self.update();
        self
    }

    /// Set the viewport aspect ratio (width / height).
    pub fn with_aspect_ratio(mut self, aspect_ratio: f32) -> Self {
        self.aspect_ratio = aspect_ratio;
        self.update();
        self
    }

    /// Set the shutter window rays are stamped within.
    pub fn with_shutter(mut self, open: f32, close: f32) -> Self {
        self.shutter = Interval::new(open.min(close), open.max(close));
        self
    }

    /// Recompute the viewport from the current settings.
    fn update(&mut self) {
        let theta = self.vfov.to_radians();
        let h = (theta / 2.0).tan();
        let viewport_height = 2.0 * h;
        let viewport_width = self.aspect_ratio * viewport_height;

        self.w = (self.look_from - self.look_at).normalize_or_zero();
        self.u = self.vup.cross(self.w).normalize_or_zero();
        self.v = self.w.cross(self.u);

        self.origin = self.look_from;
        self.horizontal = self.focus_dist * viewport_width * self.u;
        self.vertical = self.focus_dist * viewport_height * self.v;
        self.lower_left_corner =
            self.origin - self.horizontal / 2.0 - self.vertical / 2.0 - self.focus_dist * self.w;

        self.lens_radius = self.aperture / 2.0;
    }

    /// Generate a ray through viewport coordinates `(s, t)` in [0, 1]^2,
    /// `s` to the right and `t` upward.
    ///
    /// The origin is jittered over the lens and the time is drawn uniformly
    /// from the shutter window.
    pub fn get_ray(&self, s: f32, t: f32, rng: &mut dyn RngCore) -> Ray {
        let offset = if self.lens_radius > 0.0 {
            let rd = self.lens_radius * random_in_unit_disk(rng);
            self.u * rd.x + self.v * rd.y
        } else {
            Vec3::ZERO
        };

        let time = self.shutter.min + gen_f32(rng) * self.shutter.size();

        Ray::new(
            self.origin + offset,
            self.lower_left_corner + s * self.horizontal + t * self.vertical
                - self.origin
                - offset,
            time,
        )
    }

    #[inline]
    pub fn look_from(&self) -> Vec3 {
        self.look_from
    }

    #[inline]
    pub fn aspect_ratio(&self) -> f32 {
        self.aspect_ratio
    }

    #[inline]
    pub fn lens_radius(&self) -> f32 {
        self.lens_radius
    }

    /// Time window the camera stamps its rays within.
    #[inline]
    pub fn shutter(&self) -> Interval {
        self.shutter
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_camera_basis() {
        let camera = Camera::new().with_position(
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(0.0, 0.0, -1.0),
            Vec3::new(0.0, 1.0, 0.0),
        );

        assert_eq!(camera.origin, Vec3::ZERO);
        assert!((camera.w - Vec3::Z).length() < 0.001);
        assert!((camera.u - Vec3::X).length() < 0.001);
        assert!((camera.v - Vec3::Y).length() < 0.001);
    }

    #[test]
    fn test_camera_ray_directions() {
        let camera = Camera::new().with_lens(90.0, 0.0, 1.0);
        let mut rng = StdRng::seed_from_u64(42);

        // Center ray points straight down -Z
        let ray = camera.get_ray(0.5, 0.5, &mut rng);
        assert!((ray.direction().normalize() - Vec3::NEG_Z).length() < 1e-5);

        // Corners of a 90 degree square viewport
        let ray = camera.get_ray(0.0, 0.0, &mut rng);
        assert!((ray.direction() - Vec3::new(-1.0, -1.0, -1.0)).length() < 1e-5);
        let ray = camera.get_ray(1.0, 1.0, &mut rng);
        assert!((ray.direction() - Vec3::new(1.0, 1.0, -1.0)).length() < 1e-5);
    }

    #[test]
    fn test_aspect_ratio_widens_viewport() {
        let camera = Camera::new().with_aspect_ratio(2.0);
        let mut rng = StdRng::seed_from_u64(0);

        let ray = camera.get_ray(1.0, 0.5, &mut rng);
        assert!((ray.direction() - Vec3::new(2.0, 0.0, -1.0)).length() < 1e-5);
    }

    #[test]
    fn test_lens_jitters_origin_but_keeps_focus() {
        let camera = Camera::new().with_lens(40.0, 2.0, 10.0);
        assert_eq!(camera.lens_radius(), 1.0);

        let mut rng = StdRng::seed_from_u64(5);
        for _ in 0..50 {
            let ray = camera.get_ray(0.5, 0.5, &mut rng);
            assert!(ray.origin().length() <= 1.0 + 1e-5);

            // Every ray through the center passes the focus point
            assert!((ray.at(1.0) - Vec3::new(0.0, 0.0, -10.0)).length() < 1e-3);
        }
    }

    #[test]
    fn test_ray_times_fall_in_shutter() {
        let camera = Camera::new().with_shutter(0.25, 0.75);
        assert_eq!(camera.shutter(), Interval::new(0.25, 0.75));

        let mut rng = StdRng::seed_from_u64(8);
        for _ in 0..100 {
            let time = camera.get_ray(0.3, 0.6, &mut rng).time();
            assert!((0.25..=0.75).contains(&time));
        }

        // A closed shutter stamps every ray with the same instant
        let still = Camera::new().with_shutter(0.0, 0.0);
        assert_eq!(still.get_ray(0.5, 0.5, &mut rng).time(), 0.0);
    }
}
