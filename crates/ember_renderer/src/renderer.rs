//! Core path tracing renderer.
//!
//! Implements Monte Carlo path tracing with:
//! - One tile per worker on a fixed-size rayon pool
//! - Per-pixel random streams, so output is independent of the tiling
//! - Anti-aliasing via jittered multi-sampling
//! - Gamma correction

use crate::error::{RenderError, RenderResult};
use crate::integrator::radiance;
use crate::sampling::{gen_f32, pixel_seed};
use crate::scene::Scene;
use crate::tile::{generate_tiles, render_tile, Tile, TileResult};
use ember_core::Color;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::AtomicBool;
use std::time::Instant;

/// Largest accepted `max_depth`. The integrator recurses once per bounce on
/// the worker's stack, and a stack overflow aborts the process instead of
/// failing the tile.
pub const MAX_DEPTH_LIMIT: u32 = 1024;

/// Render configuration.
///
/// A `max_depth` of 0 is valid and renders black.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
    /// Samples per pixel for anti-aliasing
    pub samples_per_pixel: u32,
    /// Maximum ray bounce depth
    pub max_depth: u32,
    /// Number of worker threads (and tiles)
    pub workers: usize,
    /// Seed for the per-pixel random streams
    pub seed: u64,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 400,
            height: 225,
            samples_per_pixel: 100,
            max_depth: 50,
            workers: std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1),
            seed: 0,
        }
    }
}

impl RenderConfig {
    /// Reject configurations that cannot produce an image.
    pub fn validate(&self) -> RenderResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(RenderError::InvalidConfig(format!(
                "image size must be non-zero, got {}x{}",
                self.width, self.height
            )));
        }
        if self.samples_per_pixel == 0 {
            return Err(RenderError::InvalidConfig(
                "samples_per_pixel must be at least 1".to_string(),
            ));
        }
        if self.max_depth > MAX_DEPTH_LIMIT {
            return Err(RenderError::InvalidConfig(format!(
                "max_depth must be at most {}, got {}",
                MAX_DEPTH_LIMIT, self.max_depth
            )));
        }
        if self.workers == 0 {
            return Err(RenderError::InvalidConfig(
                "workers must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Image aspect ratio (width / height).
    pub fn aspect_ratio(&self) -> f32 {
        self.width as f32 / self.height.max(1) as f32
    }

    /// Total number of pixels.
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }
}

/// Apply gamma correction (gamma = 2.0).
#[inline]
pub fn linear_to_gamma(linear: f32) -> f32 {
    if linear > 0.0 {
        linear.sqrt()
    } else {
        0.0
    }
}

/// Convert one channel in [0, 1] to a byte: `clamp(c, 0, 0.999) * 256`.
#[inline]
pub fn channel_to_u8(c: f32) -> u8 {
    (256.0 * c.clamp(0.0, 0.999)) as u8
}

/// Convert a display color to 8-bit RGB.
pub fn color_to_rgb8(color: Color) -> [u8; 3] {
    [
        channel_to_u8(color.x),
        channel_to_u8(color.y),
        channel_to_u8(color.z),
    ]
}

/// Render a single pixel with multi-sampling.
///
/// The pixel draws from its own random stream seeded by the render seed and
/// the pixel index. Returns the gamma-corrected average.
pub fn render_pixel(scene: &Scene, config: &RenderConfig, x: u32, y: u32) -> Color {
    let index = y as usize * config.width as usize + x as usize;
    let mut rng = SmallRng::seed_from_u64(pixel_seed(config.seed, index));

    let width_span = config.width.saturating_sub(1).max(1) as f32;
    let height_span = config.height.saturating_sub(1).max(1) as f32;
    let row = config.height.saturating_sub(1).saturating_sub(y) as f32;

    let mut pixel_color = Color::ZERO;
    for _ in 0..config.samples_per_pixel {
        let s = (x as f32 + gen_f32(&mut rng)) / width_span;
        let t = (row + gen_f32(&mut rng)) / height_span;

        let ray = scene.camera().get_ray(s, t, &mut rng);
        pixel_color += radiance(
            &ray,
            scene.background(),
            scene.world(),
            config.max_depth,
            &mut rng,
        );
    }

    let scale = 1.0 / config.samples_per_pixel.max(1) as f32;
    Color::new(
        linear_to_gamma(pixel_color.x * scale),
        linear_to_gamma(pixel_color.y * scale),
        linear_to_gamma(pixel_color.z * scale),
    )
}

/// Rendered image: gamma-corrected colors, row-major with the top row first.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageBuffer {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Color>,
}

impl ImageBuffer {
    /// Create a new image buffer filled with black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::ZERO; width as usize * height as usize],
        }
    }

    /// Get the pixel at (x, y).
    pub fn get(&self, x: u32, y: u32) -> Color {
        self.pixels[y as usize * self.width as usize + x as usize]
    }

    /// Set the pixel at (x, y).
    pub fn set(&mut self, x: u32, y: u32, color: Color) {
        self.pixels[y as usize * self.width as usize + x as usize] = color;
    }

    /// Convert to packed RGB bytes (for saving).
    pub fn to_rgb8(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.pixels.len() * 3);
        for color in &self.pixels {
            bytes.extend_from_slice(&color_to_rgb8(*color));
        }
        bytes
    }
}

/// Render the scene to an image buffer on `config.workers` threads.
pub fn render(scene: &Scene, config: &RenderConfig) -> RenderResult<ImageBuffer> {
    render_with_cancel(scene, config, &AtomicBool::new(false))
}

/// Render the scene, stopping early once `cancel` is set.
///
/// A cancelled render returns [`RenderError::Cancelled`], never a partial
/// image. A panic inside a tile becomes [`RenderError::TileFailed`].
pub fn render_with_cancel(
    scene: &Scene,
    config: &RenderConfig,
    cancel: &AtomicBool,
) -> RenderResult<ImageBuffer> {
    config.validate()?;

    let tiles = generate_tiles(config.width, config.height, config.workers);
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.workers)
        .thread_name(|i| format!("ember-worker-{}", i))
        .build()?;

    log::info!(
        "Rendering {}x{} at {} spp (max depth {}) as {} tiles on {} workers",
        config.width,
        config.height,
        config.samples_per_pixel,
        config.max_depth,
        tiles.len(),
        config.workers
    );
    let start = Instant::now();

    let results = pool.install(|| {
        tiles
            .par_iter()
            .map(|tile| run_tile(tile, scene, config, cancel))
            .collect::<RenderResult<Vec<_>>>()
    })?;

    let image = assemble(config.width, config.height, results)?;

    let elapsed = start.elapsed();
    let samples = config.pixel_count() as f64 * config.samples_per_pixel as f64;
    log::info!(
        "Render finished in {:.2?} ({:.2} Msamples/s)",
        elapsed,
        samples / elapsed.as_secs_f64().max(1e-9) / 1e6
    );

    Ok(image)
}

/// Render one tile, turning a panic into a tile error.
fn run_tile(
    tile: &Tile,
    scene: &Scene,
    config: &RenderConfig,
    cancel: &AtomicBool,
) -> RenderResult<TileResult> {
    panic::catch_unwind(AssertUnwindSafe(|| render_tile(tile, scene, config, cancel)))
        .unwrap_or_else(|payload| {
            let message = panic_message(payload.as_ref());
            log::error!("Tile {} panicked: {}", tile.index, message);
            Err(RenderError::TileFailed {
                index: tile.index,
                message,
            })
        })
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// Scatter tile results into a row-major image by pixel index.
///
/// Every pixel must be written exactly once; a gap or an overlap means the
/// tiling is broken and is reported as an error.
pub fn assemble(width: u32, height: u32, results: Vec<TileResult>) -> RenderResult<ImageBuffer> {
    let mut image = ImageBuffer::new(width, height);
    let len = image.pixels.len();
    let mut writes = vec![0u32; len];

    for result in results {
        for (index, color) in result.pixels {
            if index >= len {
                return Err(RenderError::PixelOutOfRange { index, len });
            }
            writes[index] += 1;
            image.pixels[index] = color;
        }
    }

    if let Some((index, &count)) = writes.iter().enumerate().find(|&(_, &count)| count != 1) {
        return Err(RenderError::Assembly { index, count });
    }

    Ok(image)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::Camera;
    use crate::hittable::{HitRecord, Hittable};
    use crate::integrator::Background;
    use crate::material::{DiffuseLight, Lambertian};
    use crate::sphere::Sphere;
    use ember_math::{Aabb, Interval, Ray, Vec3};
    use rand::RngCore;
    use std::sync::atomic::Ordering;
    use std::sync::Arc;

    fn small_config(workers: usize) -> RenderConfig {
        RenderConfig {
            width: 12,
            height: 8,
            samples_per_pixel: 4,
            max_depth: 5,
            workers,
            seed: 7,
        }
    }

    fn sphere_scene() -> Scene {
        let objects: Vec<Box<dyn Hittable>> = vec![Box::new(Sphere::new(
            Vec3::new(0.0, 0.0, -1.0),
            0.5,
            Arc::new(Lambertian::new(Color::splat(0.5))),
        ))];
        Scene::build(objects, Camera::new().with_aspect_ratio(1.5), Background::sky()).unwrap()
    }

    struct Exploding;

    impl Hittable for Exploding {
        fn hit<'a>(
            &'a self,
            _ray: &Ray,
            _ray_t: Interval,
            _rng: &mut dyn RngCore,
        ) -> Option<HitRecord<'a>> {
            panic!("intersection exploded")
        }

        fn bounding_box(&self, _time: Interval) -> Aabb {
            Aabb::UNIVERSE
        }
    }

    #[test]
    fn test_linear_to_gamma() {
        assert_eq!(linear_to_gamma(0.0), 0.0);
        assert_eq!(linear_to_gamma(-1.0), 0.0);
        assert_eq!(linear_to_gamma(f32::NAN), 0.0);
        assert!((linear_to_gamma(1.0) - 1.0).abs() < 0.0001);
        assert!((linear_to_gamma(0.25) - 0.5).abs() < 0.0001);
    }

    #[test]
    fn test_channel_conversion_clamps() {
        assert_eq!(channel_to_u8(0.0), 0);
        assert_eq!(channel_to_u8(-3.0), 0);
        assert_eq!(channel_to_u8(1.0), 255);
        assert_eq!(channel_to_u8(50.0), 255);
        assert_eq!(channel_to_u8(0.5), 128);
        assert_eq!(color_to_rgb8(Color::new(1.0, 0.5, 0.0)), [255, 128, 0]);
    }

    #[test]
    fn test_config_validation() {
        assert!(small_config(2).validate().is_ok());
        assert!(RenderConfig::default().validate().is_ok());

        for bad in [
            RenderConfig { workers: 0, ..small_config(1) },
            RenderConfig { samples_per_pixel: 0, ..small_config(1) },
            RenderConfig { width: 0, ..small_config(1) },
            RenderConfig { height: 0, ..small_config(1) },
            RenderConfig { max_depth: MAX_DEPTH_LIMIT + 1, ..small_config(1) },
        ] {
            assert!(matches!(bad.validate(), Err(RenderError::InvalidConfig(_))));
        }
    }

    #[test]
    fn test_depth_limits() {
        let zero = RenderConfig { max_depth: 0, ..small_config(1) };
        assert!(zero.validate().is_ok());

        let deepest = RenderConfig { max_depth: MAX_DEPTH_LIMIT, ..small_config(1) };
        assert!(deepest.validate().is_ok());
    }

    #[test]
    fn test_zero_depth_renders_black() {
        let scene = sphere_scene();
        let config = RenderConfig { max_depth: 0, ..small_config(2) };

        let image = render(&scene, &config).unwrap();
        assert!(image.pixels.iter().all(|c| *c == Color::ZERO));
    }

    #[test]
    fn test_config_serde_fills_defaults() {
        let config: RenderConfig =
            serde_json::from_str(r#"{"width": 64, "height": 32, "seed": 3}"#).unwrap();
        assert_eq!(config.width, 64);
        assert_eq!(config.height, 32);
        assert_eq!(config.seed, 3);
        assert_eq!(config.samples_per_pixel, RenderConfig::default().samples_per_pixel);
        assert_eq!(config.aspect_ratio(), 2.0);
    }

    #[test]
    fn test_render_pixel_is_deterministic() {
        let scene = sphere_scene();
        let config = small_config(1);

        let a = render_pixel(&scene, &config, 6, 4);
        let b = render_pixel(&scene, &config, 6, 4);
        assert_eq!(a, b);

        // Center pixel sees the sphere, a different seed changes the noise
        let other = RenderConfig { seed: 8, ..config.clone() };
        assert_ne!(a, render_pixel(&scene, &other, 6, 4));
    }

    #[test]
    fn test_render_fills_every_pixel() {
        let scene = sphere_scene();
        let image = render(&scene, &small_config(3)).unwrap();

        assert_eq!(image.width, 12);
        assert_eq!(image.height, 8);
        assert_eq!(image.pixels.len(), 96);
        assert!(image.pixels.iter().all(|c| c.is_finite() && c.min_element() > 0.0));
        assert_eq!(image.to_rgb8().len(), 96 * 3);
    }

    #[test]
    fn test_emissive_scene_renders_exact_color() {
        let objects: Vec<Box<dyn Hittable>> = vec![Box::new(Sphere::new(
            Vec3::ZERO,
            10.0,
            Arc::new(DiffuseLight::new(Color::new(0.25, 0.25, 0.25))),
        ))];
        let scene = Scene::build(objects, Camera::new(), Background::solid(Color::ZERO)).unwrap();

        let image = render(&scene, &small_config(2)).unwrap();
        for c in &image.pixels {
            assert!((*c - Color::splat(0.5)).length() < 1e-6);
        }
    }

    #[test]
    fn test_invalid_config_fails_before_rendering() {
        let scene = sphere_scene();
        let result = render(&scene, &small_config(0));
        assert!(matches!(result, Err(RenderError::InvalidConfig(_))));
    }

    #[test]
    fn test_cancelled_render_returns_error() {
        let scene = sphere_scene();
        let cancel = AtomicBool::new(false);
        cancel.store(true, Ordering::Relaxed);

        let result = render_with_cancel(&scene, &small_config(2), &cancel);
        assert!(matches!(result, Err(RenderError::Cancelled)));
    }

    #[test]
    fn test_tile_panic_is_reported() {
        let objects: Vec<Box<dyn Hittable>> = vec![Box::new(Exploding)];
        let scene = Scene::build(objects, Camera::new(), Background::sky()).unwrap();

        let result = render(&scene, &small_config(2));
        match result {
            Err(RenderError::TileFailed { message, .. }) => {
                assert!(message.contains("intersection exploded"))
            }
            _ => panic!("expected a tile failure"),
        }
    }

    #[test]
    fn test_assemble_detects_gaps_and_overlaps() {
        let tile = Tile::new(0, 0, 2, 1, 0);
        let full = TileResult {
            tile,
            pixels: vec![(0, Color::ONE), (1, Color::ZERO)],
        };
        let image = assemble(2, 1, vec![full.clone()]).unwrap();
        assert_eq!(image.get(0, 0), Color::ONE);
        assert_eq!(image.get(1, 0), Color::ZERO);

        // Same tile twice: every pixel overlaps
        let result = assemble(2, 1, vec![full.clone(), full]);
        assert!(matches!(result, Err(RenderError::Assembly { index: 0, count: 2 })));

        // Missing pixel 1
        let partial = TileResult {
            tile,
            pixels: vec![(0, Color::ONE)],
        };
        let result = assemble(2, 1, vec![partial]);
        assert!(matches!(result, Err(RenderError::Assembly { index: 1, count: 0 })));

        let stray = TileResult {
            tile,
            pixels: vec![(5, Color::ONE)],
        };
        let result = assemble(2, 1, vec![stray]);
        assert!(matches!(result, Err(RenderError::PixelOutOfRange { index: 5, len: 2 })));
    }

    #[test]
    fn test_image_buffer_get_set() {
        let mut image = ImageBuffer::new(4, 3);
        image.set(3, 2, Color::new(0.1, 0.2, 0.3));
        assert_eq!(image.get(3, 2), Color::new(0.1, 0.2, 0.3));
        assert_eq!(image.pixels[11], Color::new(0.1, 0.2, 0.3));
    }
}
