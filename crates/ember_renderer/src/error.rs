//! Error types for scene building and rendering.

use thiserror::Error;

/// Errors that can occur while building a scene or rendering it.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Invalid render configuration: {0}")]
    InvalidConfig(String),

    #[error("Cannot build a BVH from an empty primitive list")]
    EmptyScene,

    #[error("Tile {index} failed: {message}")]
    TileFailed { index: usize, message: String },

    #[error("Render cancelled")]
    Cancelled,

    #[error("Pixel {index} was written {count} times (expected exactly once)")]
    Assembly { index: usize, count: u32 },

    #[error("Tile wrote pixel {index} outside an image of {len} pixels")]
    PixelOutOfRange { index: usize, len: usize },

    #[error("Failed to start worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image encoding error: {0}")]
    Image(#[from] image::ImageError),
}

pub type RenderResult<T> = Result<T, RenderError>;
