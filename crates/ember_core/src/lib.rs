//! Ember Core - surface patterns and image resources for the path tracer.
//!
//! This crate provides:
//!
//! - **Textures**: the [`Texture`] capability and its procedural and
//!   image-backed implementations
//! - **Noise**: a seedable [`Perlin`] noise generator
//! - **Images**: decoding to raw bytes and a path-keyed [`ImageCache`]
//!
//! # Example
//!
//! ```ignore
//! use ember_core::{CheckerTexture, Texture};
//! use ember_math::Vec3;
//!
//! let checker = CheckerTexture::from_colors(Vec3::ZERO, Vec3::ONE, 10.0);
//! let color = checker.value(0.5, 0.5, Vec3::new(0.1, 0.2, 0.3));
//! ```

pub mod decoder;
pub mod perlin;
pub mod texture;

pub use decoder::{load_image, ImageCache, ImageData, TextureError, TextureResult};
pub use perlin::Perlin;
pub use texture::{
    CheckerTexture, Color, ImageTexture, NoiseStyle, NoiseTexture, SolidColor, Texture,
    WaveTexture, MISSING_TEXTURE_COLOR,
};
