//! A render-ready scene: BVH, camera and background.

use crate::bvh::BvhNode;
use crate::camera::Camera;
use crate::error::RenderResult;
use crate::hittable::Hittable;
use crate::integrator::Background;

/// Everything the renderer reads. Immutable once built and shared by
/// reference with every worker.
pub struct Scene {
    world: BvhNode,
    camera: Camera,
    background: Background,
}

impl Scene {
    /// Build the BVH over `objects`, bounding moving primitives over the
    /// camera's shutter window.
    pub fn build(
        objects: Vec<Box<dyn Hittable>>,
        camera: Camera,
        background: Background,
    ) -> RenderResult<Self> {
        let world = BvhNode::new(objects, camera.shutter())?;
        Ok(Self {
            world,
            camera,
            background,
        })
    }

    #[inline]
    pub fn world(&self) -> &BvhNode {
        &self.world
    }

    #[inline]
    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    #[inline]
    pub fn background(&self) -> &Background {
        &self.background
    }
}
