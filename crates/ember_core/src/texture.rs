//! Surface patterns.
//!
//! A [`Texture`] maps a surface point (its `(u, v)` parameterization and
//! world-space position) to a color. Materials hold textures behind `Arc` so
//! one pattern can drive any number of surfaces.

use std::f32::consts::PI;
use std::path::Path;
use std::sync::Arc;

use ember_math::Vec3;

use crate::decoder::{load_image, ImageCache, ImageData};
use crate::perlin::Perlin;

/// Color type alias (linear RGB, typically 0-1 per channel).
pub type Color = Vec3;

/// Color returned by image textures whose image could not be decoded.
pub const MISSING_TEXTURE_COLOR: Color = Color::new(1.0, 0.0, 1.0);

/// Number of octaves used by the turbulence-based noise styles.
const TURBULENCE_DEPTH: u32 = 7;

/// Trait for anything that can color a surface point.
pub trait Texture: Send + Sync {
    /// Color at surface coordinates `(u, v)` and world-space point `p`.
    fn value(&self, u: f32, v: f32, p: Vec3) -> Color;
}

/// A constant color.
#[derive(Debug, Clone, Copy)]
pub struct SolidColor {
    color: Color,
}

impl SolidColor {
    pub fn new(color: Color) -> Self {
        Self { color }
    }

    pub fn from_rgb(r: f32, g: f32, b: f32) -> Self {
        Self::new(Color::new(r, g, b))
    }
}

impl Texture for SolidColor {
    fn value(&self, _u: f32, _v: f32, _p: Vec3) -> Color {
        self.color
    }
}

/// 3D checker pattern from the sign of `sin(fx)·sin(fy)·sin(fz)`.
pub struct CheckerTexture {
    even: Arc<dyn Texture>,
    odd: Arc<dyn Texture>,
    frequency: f32,
}

impl CheckerTexture {
    pub fn new(even: Arc<dyn Texture>, odd: Arc<dyn Texture>, frequency: f32) -> Self {
        Self {
            even,
            odd,
            frequency,
        }
    }

    pub fn from_colors(even: Color, odd: Color, frequency: f32) -> Self {
        Self::new(
            Arc::new(SolidColor::new(even)),
            Arc::new(SolidColor::new(odd)),
            frequency,
        )
    }
}

impl Texture for CheckerTexture {
    fn value(&self, u: f32, v: f32, p: Vec3) -> Color {
        let f = self.frequency;
        let sines = (f * p.x).sin() * (f * p.y).sin() * (f * p.z).sin();
        if sines < 0.0 {
            self.odd.value(u, v, p)
        } else {
            self.even.value(u, v, p)
        }
    }
}

/// Horizontal bands in `v` whose edge follows a sine wave in `u`.
pub struct WaveTexture {
    even: Arc<dyn Texture>,
    odd: Arc<dyn Texture>,
    x_frequency: f32,
    y_frequency: f32,
}

impl WaveTexture {
    pub fn new(
        even: Arc<dyn Texture>,
        odd: Arc<dyn Texture>,
        x_frequency: f32,
        y_frequency: f32,
    ) -> Self {
        Self {
            even,
            odd,
            x_frequency,
            y_frequency: y_frequency.max(f32::EPSILON),
        }
    }

    pub fn from_colors(even: Color, odd: Color, x_frequency: f32, y_frequency: f32) -> Self {
        Self::new(
            Arc::new(SolidColor::new(even)),
            Arc::new(SolidColor::new(odd)),
            x_frequency,
            y_frequency,
        )
    }
}

impl Texture for WaveTexture {
    fn value(&self, u: f32, v: f32, p: Vec3) -> Color {
        let band = 1.0 / self.y_frequency;
        let wave_height = ((u * PI * self.x_frequency).sin() + 1.0) * 0.5;

        if v.rem_euclid(band) > wave_height * band {
            self.odd.value(u, v, p)
        } else {
            self.even.value(u, v, p)
        }
    }
}

/// How a [`NoiseTexture`] turns Perlin noise into color.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NoiseStyle {
    /// Gray noise remapped to [0, 1].
    Plain,
    /// Gray multi-octave turbulence.
    Turbulent,
    /// Gray marble veins: a sine along z phase-shifted by turbulence.
    Marble,
    /// Marble veins tinted by a color.
    Colored(Color),
    /// Marble veins blended between two colors.
    Gradient(Color, Color),
}

/// Procedural texture driven by Perlin noise.
#[derive(Clone)]
pub struct NoiseTexture {
    noise: Perlin,
    scale: f32,
    style: NoiseStyle,
}

impl NoiseTexture {
    pub fn new(scale: f32, style: NoiseStyle) -> Self {
        Self::with_perlin(Perlin::default(), scale, style)
    }

    pub fn with_perlin(noise: Perlin, scale: f32, style: NoiseStyle) -> Self {
        Self {
            noise,
            scale,
            style,
        }
    }

    fn marble(&self, p: Vec3) -> f32 {
        0.5 * (1.0 + (self.scale * p.z + 10.0 * self.noise.turbulence(p, TURBULENCE_DEPTH)).sin())
    }
}

impl Texture for NoiseTexture {
    fn value(&self, _u: f32, _v: f32, p: Vec3) -> Color {
        match self.style {
            NoiseStyle::Plain => Color::ONE * 0.5 * (1.0 + self.noise.noise(self.scale * p)),
            NoiseStyle::Turbulent => {
                Color::ONE * self.noise.turbulence(self.scale * p, TURBULENCE_DEPTH)
            }
            NoiseStyle::Marble => Color::ONE * self.marble(p),
            NoiseStyle::Colored(tint) => tint * self.marble(p),
            NoiseStyle::Gradient(a, b) => a.lerp(b, self.marble(p)),
        }
    }
}

/// Texture that samples a decoded image with nearest-pixel lookup.
///
/// `u` runs left to right and `v` bottom to top. A texture without image data
/// returns [`MISSING_TEXTURE_COLOR`] everywhere.
pub struct ImageTexture {
    image: Option<Arc<ImageData>>,
}

impl ImageTexture {
    pub fn new(image: Arc<ImageData>) -> Self {
        Self { image: Some(image) }
    }

    /// Decode `path`, falling back to the missing-texture color on failure.
    pub fn open(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match load_image(path) {
            Ok(image) => Self::new(Arc::new(image)),
            Err(e) => {
                log::warn!("Could not load texture image {}: {}", path.display(), e);
                Self { image: None }
            }
        }
    }

    /// Load through a shared cache, falling back to the missing-texture color.
    pub fn from_cache(cache: &mut ImageCache, path: &str) -> Self {
        match cache.load(path) {
            Ok(image) => Self::new(image),
            Err(e) => {
                log::warn!("Could not load texture image {}: {}", path, e);
                Self { image: None }
            }
        }
    }

    /// Returns true if image data is available.
    pub fn is_loaded(&self) -> bool {
        self.image.is_some()
    }
}

impl Texture for ImageTexture {
    fn value(&self, u: f32, v: f32, _p: Vec3) -> Color {
        let Some(image) = &self.image else {
            return MISSING_TEXTURE_COLOR;
        };

        // Flip v to image row order
        let u = u.clamp(0.0, 1.0);
        let v = 1.0 - v.clamp(0.0, 1.0);

        let i = (u * image.width() as f32) as u32;
        let j = (v * image.height() as f32) as u32;

        let [r, g, b] = image.pixel(i, j);
        let color_scale = 1.0 / 255.0;
        Color::new(r as f32, g as f32, b as f32) * color_scale
    }
}
