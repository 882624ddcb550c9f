//! Image decoding and caching for image-backed textures.
//!
//! Decodes image files into raw 8-bit pixel bytes plus their dimensions and
//! channel count. Textures sample these bytes directly; no color-space
//! conversion is applied here.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use thiserror::Error;

/// Errors that can occur while decoding texture images.
#[derive(Error, Debug)]
pub enum TextureError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image decoding error: {0}")]
    Decode(#[from] image::ImageError),

    #[error("Unsupported channel count: {0}")]
    UnsupportedFormat(u32),

    #[error("Pixel buffer holds {actual} bytes, expected {expected}")]
    InvalidData { expected: usize, actual: usize },
}

pub type TextureResult<T> = Result<T, TextureError>;

/// Decoded image pixels.
///
/// Bytes are stored row-major, top row first, `channels` bytes per pixel.
#[derive(Clone, Debug)]
pub struct ImageData {
    width: u32,
    height: u32,
    channels: u32,
    bytes: Vec<u8>,
}

impl ImageData {
    /// Wrap raw pixel bytes, checking that the buffer matches the dimensions.
    pub fn new(bytes: Vec<u8>, width: u32, height: u32, channels: u32) -> TextureResult<Self> {
        if !(1..=4).contains(&channels) {
            return Err(TextureError::UnsupportedFormat(channels));
        }

        let expected = width as usize * height as usize * channels as usize;
        if bytes.len() != expected {
            return Err(TextureError::InvalidData {
                expected,
                actual: bytes.len(),
            });
        }

        Ok(Self {
            width,
            height,
            channels,
            bytes,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn channels(&self) -> u32 {
        self.channels
    }

    /// Raw pixel bytes.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// RGB bytes of the pixel at (x, y). Coordinates are clamped to the image.
    ///
    /// Grayscale images replicate their single channel; alpha is ignored.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 3] {
        if self.width == 0 || self.height == 0 {
            return [0, 0, 0];
        }

        let x = x.min(self.width - 1) as usize;
        let y = y.min(self.height - 1) as usize;
        let channels = self.channels as usize;
        let idx = (y * self.width as usize + x) * channels;

        match channels {
            1 | 2 => {
                let g = self.bytes[idx];
                [g, g, g]
            }
            _ => [self.bytes[idx], self.bytes[idx + 1], self.bytes[idx + 2]],
        }
    }

    /// Get total size in bytes.
    pub fn size_bytes(&self) -> usize {
        self.bytes.len()
    }
}

/// Decode an image file to 8-bit RGB bytes.
pub fn load_image(path: impl AsRef<Path>) -> TextureResult<ImageData> {
    let img = image::open(path.as_ref())?;

    let rgb = img.to_rgb8();
    let (width, height) = rgb.dimensions();

    ImageData::new(rgb.into_raw(), width, height, 3)
}

/// Cache for decoded images.
///
/// Scenes often reference the same image from several materials; each file
/// is decoded once and shared.
pub struct ImageCache {
    /// Cached images by the path they were requested with
    images: HashMap<String, Arc<ImageData>>,

    /// Base directory for resolving relative paths
    base_dir: Option<PathBuf>,
}

impl ImageCache {
    /// Create a new empty image cache.
    pub fn new() -> Self {
        Self {
            images: HashMap::new(),
            base_dir: None,
        }
    }

    /// Create an image cache with a base directory for relative paths.
    pub fn with_base_dir(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            images: HashMap::new(),
            base_dir: Some(base_dir.into()),
        }
    }

    /// Load an image from file, using the cache if available.
    pub fn load(&mut self, path: &str) -> TextureResult<Arc<ImageData>> {
        if let Some(image) = self.images.get(path) {
            return Ok(image.clone());
        }

        let full_path = self.resolve_path(path);
        let image = Arc::new(load_image(&full_path)?);
        self.images.insert(path.to_string(), image.clone());

        log::debug!(
            "Loaded image: {} ({}x{}, {:.1} KB)",
            path,
            image.width(),
            image.height(),
            image.size_bytes() as f32 / 1024.0
        );

        Ok(image)
    }

    /// Get a cached image without loading.
    pub fn get(&self, path: &str) -> Option<Arc<ImageData>> {
        self.images.get(path).cloned()
    }

    /// Get the number of cached images.
    pub fn len(&self) -> usize {
        self.images.len()
    }

    /// Check if cache is empty.
    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    /// Resolve a path relative to the base directory.
    fn resolve_path(&self, path: &str) -> PathBuf {
        let path = Path::new(path);

        match &self.base_dir {
            Some(base) if !path.is_absolute() => base.join(path),
            _ => path.to_path_buf(),
        }
    }
}

impl Default for ImageCache {
    fn default() -> Self {
        Self::new()
    }
}
