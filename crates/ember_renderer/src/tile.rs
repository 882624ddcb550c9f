//! Tile-based parallel rendering.
//!
//! Divides the image into one rectangular tile per worker. Each tile is
//! rendered independently and returns its pixels tagged with their global
//! index, so the final image does not depend on which worker finishes first.

use crate::error::{RenderError, RenderResult};
use crate::renderer::{render_pixel, RenderConfig};
use crate::scene::Scene;
use ember_core::Color;
use std::sync::atomic::{AtomicBool, Ordering};

/// A rectangular region of the image to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tile {
    /// X coordinate of the tile's top-left corner
    pub x: u32,
    /// Y coordinate of the tile's top-left corner
    pub y: u32,
    /// Width of the tile in pixels
    pub width: u32,
    /// Height of the tile in pixels
    pub height: u32,
    /// Position of this tile in the row-major tile grid
    pub index: usize,
}

impl Tile {
    /// Create a new tile.
    pub fn new(x: u32, y: u32, width: u32, height: u32, index: usize) -> Self {
        Self {
            x,
            y,
            width,
            height,
            index,
        }
    }

    /// Get the total number of pixels in this tile.
    pub fn pixel_count(&self) -> u32 {
        self.width * self.height
    }
}

/// Pixels produced by one tile, tagged with their row-major image index.
#[derive(Debug, Clone)]
pub struct TileResult {
    /// The tile that was rendered
    pub tile: Tile,
    /// `(pixel_index, color)` pairs
    pub pixels: Vec<(usize, Color)>,
}

/// Split `workers` into two factors `(a, b)` with `a <= b`, `a * b = workers`
/// and `a` as large as possible.
pub fn factor_workers(workers: usize) -> (usize, usize) {
    let workers = workers.max(1);

    let mut a = 1;
    while (a + 1) * (a + 1) <= workers {
        a += 1;
    }
    while workers % a != 0 {
        a -= 1;
    }

    (a, workers / a)
}

/// Split `dim` pixels into `count` spans of `dim / count` pixels, the first
/// span absorbing the remainder. Returns `(start, length)` pairs.
fn split_axis(dim: u32, count: u32) -> Vec<(u32, u32)> {
    let base = dim / count;
    let remainder = dim % count;

    let mut spans = Vec::with_capacity(count as usize);
    let mut start = 0;
    for i in 0..count {
        let len = if i == 0 { base + remainder } else { base };
        spans.push((start, len));
        start += len;
    }
    spans
}

/// Generate one tile per worker for a `width` x `height` image.
///
/// The worker count is factored into a grid; the larger factor goes to the
/// larger image dimension (columns on a tie). A factor larger than its
/// dimension is reduced to the dimension, so tiles are never empty. Tiles are
/// returned in row-major grid order.
pub fn generate_tiles(width: u32, height: u32, workers: usize) -> Vec<Tile> {
    let (small, large) = factor_workers(workers);
    let (cols, rows) = if width >= height {
        (large, small)
    } else {
        (small, large)
    };

    let cols = (cols.min(width as usize) as u32).max(1);
    let rows = (rows.min(height as usize) as u32).max(1);

    let xs = split_axis(width, cols);
    let ys = split_axis(height, rows);

    let mut tiles = Vec::with_capacity(xs.len() * ys.len());
    for &(y, h) in &ys {
        for &(x, w) in &xs {
            let index = tiles.len();
            tiles.push(Tile::new(x, y, w, h, index));
        }
    }
    tiles
}

/// Render every pixel of `tile`.
///
/// The cancellation flag is checked once per tile row; a cancelled tile
/// returns [`RenderError::Cancelled`] and no pixels.
pub fn render_tile(
    tile: &Tile,
    scene: &Scene,
    config: &RenderConfig,
    cancel: &AtomicBool,
) -> RenderResult<TileResult> {
    let mut pixels = Vec::with_capacity(tile.pixel_count() as usize);

    for global_y in tile.y..tile.y + tile.height {
        if cancel.load(Ordering::Relaxed) {
            return Err(RenderError::Cancelled);
        }

        for global_x in tile.x..tile.x + tile.width {
            let index = global_y as usize * config.width as usize + global_x as usize;
            pixels.push((index, render_pixel(scene, config, global_x, global_y)));
        }
    }

    log::debug!(
        "Tile {} done ({}x{} at {}, {})",
        tile.index,
        tile.width,
        tile.height,
        tile.x,
        tile.y
    );

    Ok(TileResult {
        tile: *tile,
        pixels,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_exact_cover(width: u32, height: u32, tiles: &[Tile]) {
        let mut counts = vec![0u32; (width * height) as usize];
        for tile in tiles {
            for y in tile.y..tile.y + tile.height {
                for x in tile.x..tile.x + tile.width {
                    counts[(y * width + x) as usize] += 1;
                }
            }
        }
        assert!(counts.iter().all(|&c| c == 1), "{}x{} not covered exactly once", width, height);
    }

    #[test]
    fn test_factor_workers() {
        assert_eq!(factor_workers(1), (1, 1));
        assert_eq!(factor_workers(4), (2, 2));
        assert_eq!(factor_workers(6), (2, 3));
        assert_eq!(factor_workers(7), (1, 7));
        assert_eq!(factor_workers(12), (3, 4));
        assert_eq!(factor_workers(16), (4, 4));
        assert_eq!(factor_workers(18), (3, 6));
    }

    #[test]
    fn test_larger_factor_goes_to_larger_dimension() {
        // Wide image: three columns, two rows
        let tiles = generate_tiles(300, 100, 6);
        assert_eq!(tiles.len(), 6);
        assert_eq!(tiles.iter().filter(|t| t.y == 0).count(), 3);

        // Tall image: two columns, three rows
        let tiles = generate_tiles(100, 300, 6);
        assert_eq!(tiles.iter().filter(|t| t.y == 0).count(), 2);

        // Square image: columns win the tie
        let tiles = generate_tiles(120, 120, 6);
        assert_eq!(tiles.iter().filter(|t| t.y == 0).count(), 3);
    }

    #[test]
    fn test_remainder_goes_to_first_tile() {
        let tiles = generate_tiles(10, 1, 3);
        let widths: Vec<u32> = tiles.iter().map(|t| t.width).collect();
        assert_eq!(widths, vec![4, 3, 3]);
        assert_eq!(tiles[1].x, 4);
        assert_eq!(tiles[2].x, 7);
    }

    #[test]
    fn test_factor_reduced_for_small_dimensions() {
        let tiles = generate_tiles(3, 2, 16);
        assert_eq!(tiles.len(), 6);
        assert!(tiles.iter().all(|t| t.pixel_count() == 1));
        assert_exact_cover(3, 2, &tiles);
    }

    #[test]
    fn test_tiles_cover_image_exactly_once() {
        for &(w, h) in &[(64, 64), (100, 37), (17, 211), (1, 1), (640, 360)] {
            for workers in [1, 2, 3, 4, 5, 8, 12, 13, 64] {
                let tiles = generate_tiles(w, h, workers);
                assert!(tiles.len() <= workers);
                assert_exact_cover(w, h, &tiles);
                for (i, tile) in tiles.iter().enumerate() {
                    assert_eq!(tile.index, i);
                }
            }
        }
    }
}
