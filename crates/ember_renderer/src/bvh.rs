//! Bounding Volume Hierarchy (BVH) acceleration structure.
//!
//! Binary tree over boxed hittables. Built once per scene from the full
//! primitive list and the camera shutter window, then shared read-only by
//! every render worker.

use crate::error::{RenderError, RenderResult};
use crate::hittable::{HitRecord, Hittable};
use ember_math::{Aabb, Interval, Ray, Vec3};
use rand::RngCore;

/// Maximum primitives per leaf node before splitting.
const LEAF_MAX_SIZE: usize = 2;

/// BVH node - either a branch with two children or a leaf with primitives.
///
/// Using an enum keeps the tree itself free of dynamic dispatch; only the
/// primitives in the leaves are trait objects.
pub enum BvhNode {
    /// Internal node with two children.
    Branch {
        left: Box<BvhNode>,
        right: Box<BvhNode>,
        bbox: Aabb,
    },
    /// Leaf node holding one or two primitives, ordered along the split axis.
    Leaf {
        objects: Vec<Box<dyn Hittable>>,
        bbox: Aabb,
    },
}

/// A primitive with its bounds over the build time window.
struct BuildItem {
    object: Box<dyn Hittable>,
    bbox: Aabb,
    centroid: Vec3,
}

impl BvhNode {
    /// Create a BVH from a list of hittable objects.
    ///
    /// Moving primitives are bounded over `time`, normally the camera
    /// shutter. An empty list is an error.
    pub fn new(objects: Vec<Box<dyn Hittable>>, time: Interval) -> RenderResult<Self> {
        if objects.is_empty() {
            return Err(RenderError::EmptyScene);
        }

        let count = objects.len();
        let items = objects
            .into_iter()
            .map(|object| {
                let bbox = object.bounding_box(time);
                BuildItem {
                    object,
                    bbox,
                    centroid: bbox.centroid(),
                }
            })
            .collect();

        let root = Self::build(items);
        log::info!(
            "Built BVH over {} primitives ({} nodes, depth {})",
            count,
            root.node_count(),
            root.depth()
        );

        Ok(root)
    }

    /// Recursive BVH construction.
    ///
    /// Simple median-split approach: sort objects by centroid on the axis
    /// where the centroids spread the most, split in half, recurse.
    fn build(mut items: Vec<BuildItem>) -> Self {
        let n = items.len();

        let bbox = items
            .iter()
            .fold(Aabb::EMPTY, |acc, item| Aabb::surrounding(&acc, &item.bbox));

        let centroid_bounds = items.iter().fold(Aabb::EMPTY, |acc, item| {
            Aabb::surrounding(&acc, &Aabb::from_points(item.centroid, item.centroid))
        });
        let axis = centroid_bounds.longest_axis();

        // Stable sort keeps the build deterministic when centroids tie
        items.sort_by(|a, b| a.centroid[axis].total_cmp(&b.centroid[axis]));

        if n <= LEAF_MAX_SIZE {
            return BvhNode::Leaf {
                objects: items.into_iter().map(|item| item.object).collect(),
                bbox,
            };
        }

        let right_items = items.split_off(n / 2);
        let left = Self::build(items);
        let right = Self::build(right_items);

        BvhNode::Branch {
            left: Box::new(left),
            right: Box::new(right),
            bbox,
        }
    }

    /// Number of nodes in the tree, leaves included.
    pub fn node_count(&self) -> usize {
        match self {
            BvhNode::Leaf { .. } => 1,
            BvhNode::Branch { left, right, .. } => 1 + left.node_count() + right.node_count(),
        }
    }

    /// Length of the longest root-to-leaf path, counting the root as 1.
    pub fn depth(&self) -> usize {
        match self {
            BvhNode::Leaf { .. } => 1,
            BvhNode::Branch { left, right, .. } => 1 + left.depth().max(right.depth()),
        }
    }

    /// Number of primitives stored in the leaves.
    pub fn primitive_count(&self) -> usize {
        match self {
            BvhNode::Leaf { objects, .. } => objects.len(),
            BvhNode::Branch { left, right, .. } => {
                left.primitive_count() + right.primitive_count()
            }
        }
    }
}

impl Hittable for BvhNode {
    fn hit<'a>(
        &'a self,
        ray: &Ray,
        ray_t: Interval,
        rng: &mut dyn RngCore,
    ) -> Option<HitRecord<'a>> {
        match self {
            BvhNode::Leaf { objects, bbox } => {
                if !bbox.hit(ray, ray_t) {
                    return None;
                }

                let mut closest = ray_t.max;
                let mut result = None;
                for obj in objects {
                    if let Some(rec) = obj.hit(ray, Interval::new(ray_t.min, closest), rng) {
                        closest = rec.t;
                        result = Some(rec);
                    }
                }
                result
            }

            BvhNode::Branch { left, right, bbox } => {
                if !bbox.hit(ray, ray_t) {
                    return None;
                }

                let hit_left = left.hit(ray, ray_t, rng);

                // Only check right up to closest hit
                let right_max = hit_left.as_ref().map_or(ray_t.max, |rec| rec.t);
                let hit_right = right.hit(ray, Interval::new(ray_t.min, right_max), rng);

                hit_right.or(hit_left)
            }
        }
    }

    fn bounding_box(&self, _time: Interval) -> Aabb {
        match self {
            BvhNode::Leaf { bbox, .. } => *bbox,
            BvhNode::Branch { bbox, .. } => *bbox,
        }
    }
}
