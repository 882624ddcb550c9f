//! Ember renderer - CPU Monte Carlo path tracing.
//!
//! Hittable primitives (spheres, moving spheres, triangles, axis-aligned
//! rectangles and boxes, constant-density media) are collected into a BVH,
//! shaded through a material scatter/PDF contract and rendered by a
//! recursive integrator on a tiled, multi-threaded scheduler.
//!
//! Rendering is deterministic: every pixel draws from its own random stream
//! seeded from the render seed, so the image does not depend on the worker
//! count.

mod aabox;
mod bvh;
mod camera;
mod error;
mod hittable;
mod integrator;
mod material;
mod medium;
mod output;
mod pdf;
mod rect;
mod renderer;
mod sampling;
mod scene;
mod sphere;
mod tile;
mod triangle;

pub use aabox::AaBox;
pub use bvh::BvhNode;
pub use camera::Camera;
pub use error::{RenderError, RenderResult};
pub use hittable::{HitRecord, Hittable, HittableList};
pub use integrator::{radiance, Background, T_MIN};
pub use material::{
    DiffuseLight, Dielectric, Isotropic, Lambertian, Material, Metal, ScatterRecord,
};
pub use medium::ConstantMedium;
pub use output::{save_encoded, save_image, save_ppm, write_ppm};
pub use pdf::Pdf;
pub use rect::{AaRect, Plane};
pub use renderer::{
    assemble, color_to_rgb8, linear_to_gamma, render, render_pixel, render_with_cancel,
    ImageBuffer, RenderConfig, MAX_DEPTH_LIMIT,
};
pub use sampling::{gen_f32, gen_range_f32, pixel_seed};
pub use scene::Scene;
pub use sphere::{MovingSphere, Sphere};
pub use tile::{factor_workers, generate_tiles, render_tile, Tile, TileResult};
pub use triangle::Triangle;

/// Re-export the shared math and texture types.
pub use ember_core::Color;
pub use ember_math::{Aabb, Interval, Ray, Vec3};
