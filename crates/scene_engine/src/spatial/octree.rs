//! Octree spatial partitioning structure
//!
//! Divides the space occupied by a set of boxes into hierarchical regions
//! for broad-phase pruning. The tree is built in one pass from a slice of
//! boxes and refers to them by their index in that slice; all results are
//! reported in index order, so the shape of the tree never leaks into the
//! output.
//!
//! A box descends into an octant only when it lies strictly on one side of
//! the node centre on every axis. Boxes straddling a split plane stay in the
//! node. Two boxes in disjoint subtrees are therefore separated by a split
//! plane and cannot overlap, which lets pair enumeration test each box only
//! against its own node and the nodes above it.

use serde::{Deserialize, Serialize};

use super::bounds::{Aabb, BoundingSphere};
use super::ray::Ray;
use crate::foundation::math::Vec3;

/// Configuration for octree behavior
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OctreeConfig {
    /// Maximum entities per node before subdivision
    pub max_entities_per_node: usize,

    /// Maximum subdivision depth
    pub max_depth: u32,

    /// Minimum node half size (prevents excessive subdivision)
    pub min_node_size: f32,
}

impl Default for OctreeConfig {
    fn default() -> Self {
        Self {
            max_entities_per_node: 8,
            max_depth: 8,
            min_node_size: 1.0,
        }
    }
}

/// Single node in the octree hierarchy
#[derive(Debug, Clone)]
pub struct OctreeNode {
    /// Region of space covered by this node
    pub bounds: Aabb,

    /// Indices of the boxes stored at this node
    pub entities: Vec<usize>,

    /// Child nodes (8 octants), None if this is a leaf
    pub children: Option<Box<[OctreeNode; 8]>>,

    /// Depth in the tree (0 = root)
    pub depth: u32,
}

impl OctreeNode {
    /// Create a new leaf node
    pub fn new(bounds: Aabb, depth: u32) -> Self {
        Self {
            bounds,
            entities: Vec::new(),
            children: None,
            depth,
        }
    }

    /// Check if this node is a leaf (has no children)
    pub fn is_leaf(&self) -> bool {
        self.children.is_none()
    }

    /// Octant (0-7) holding `aabb` entirely, or `None` when it straddles
    /// a split plane.
    ///
    /// Octant layout: bit 0 = +X, bit 1 = +Y, bit 2 = +Z.
    fn octant_for(center: &Vec3, aabb: &Aabb) -> Option<usize> {
        let mut octant = 0;
        for axis in 0..3 {
            if aabb.max[axis] < center[axis] {
                continue;
            } else if aabb.min[axis] > center[axis] {
                octant |= 1 << axis;
            } else {
                return None;
            }
        }
        Some(octant)
    }

    /// Region of one octant of this node
    fn octant_bounds(&self, octant: usize) -> Aabb {
        let center = self.bounds.center();
        let mut min = self.bounds.min;
        let mut max = self.bounds.max;
        for axis in 0..3 {
            if octant & (1 << axis) != 0 {
                min[axis] = center[axis];
            } else {
                max[axis] = center[axis];
            }
        }
        Aabb::new(min, max)
    }

    /// Store `candidates` in this subtree, subdividing while the node is
    /// over capacity.
    fn build(&mut self, candidates: Vec<usize>, boxes: &[Aabb], config: &OctreeConfig) {
        let can_split = candidates.len() > config.max_entities_per_node
            && self.depth < config.max_depth
            && self.bounds.extents().max() > config.min_node_size;

        if !can_split {
            self.entities = candidates;
            return;
        }

        let center = self.bounds.center();
        let mut buckets: [Vec<usize>; 8] = Default::default();
        for index in candidates {
            match Self::octant_for(&center, &boxes[index]) {
                Some(octant) => buckets[octant].push(index),
                None => self.entities.push(index),
            }
        }

        if buckets.iter().all(Vec::is_empty) {
            return;
        }

        let depth = self.depth + 1;
        let mut children = Box::new(std::array::from_fn(|octant| {
            Self::new(self.octant_bounds(octant), depth)
        }));
        for (child, bucket) in children.iter_mut().zip(buckets) {
            if !bucket.is_empty() {
                child.build(bucket, boxes, config);
            }
        }
        self.children = Some(children);
    }

    /// Collect every overlapping pair in this subtree.
    ///
    /// `ancestors` holds the entries of all nodes on the path from the root.
    fn collect_pairs(&self, boxes: &[Aabb], ancestors: &mut Vec<usize>, pairs: &mut Vec<(usize, usize)>) {
        for (position, &index) in self.entities.iter().enumerate() {
            let aabb = &boxes[index];

            for &other in &self.entities[position + 1..] {
                if aabb.intersects(&boxes[other]) {
                    pairs.push(ordered_pair(index, other));
                }
            }

            for &other in ancestors.iter() {
                if aabb.intersects(&boxes[other]) {
                    pairs.push(ordered_pair(index, other));
                }
            }
        }

        if let Some(ref children) = self.children {
            let mark = ancestors.len();
            ancestors.extend_from_slice(&self.entities);
            for child in children.iter() {
                child.collect_pairs(boxes, ancestors, pairs);
            }
            ancestors.truncate(mark);
        }
    }

    /// Query all boxes hit by a ray, with the distance to each
    fn query_ray(&self, boxes: &[Aabb], ray: &Ray, results: &mut Vec<(usize, f32)>) {
        // Quick AABB check - if the ray misses the node region, skip the subtree
        if ray.intersect_aabb(&self.bounds).is_none() {
            return;
        }

        for &index in &self.entities {
            if let Some(distance) = ray.intersect_aabb(&boxes[index]) {
                results.push((index, distance));
            }
        }

        if let Some(ref children) = self.children {
            for child in children.iter() {
                child.query_ray(boxes, ray, results);
            }
        }
    }

    /// Query all boxes overlapping another box
    fn query_aabb(&self, boxes: &[Aabb], region: &Aabb, results: &mut Vec<usize>) {
        if !self.bounds.intersects(region) {
            return;
        }

        results.extend(
            self.entities
                .iter()
                .copied()
                .filter(|&index| boxes[index].intersects(region)),
        );

        if let Some(ref children) = self.children {
            for child in children.iter() {
                child.query_aabb(boxes, region, results);
            }
        }
    }

    /// Query all boxes touching a sphere
    fn query_sphere(&self, boxes: &[Aabb], sphere: &BoundingSphere, results: &mut Vec<usize>) {
        // Quick check - if the sphere doesn't reach the node region, skip
        if !sphere.intersects_aabb(&self.bounds) {
            return;
        }

        results.extend(
            self.entities
                .iter()
                .copied()
                .filter(|&index| sphere.intersects_aabb(&boxes[index])),
        );

        if let Some(ref children) = self.children {
            for child in children.iter() {
                child.query_sphere(boxes, sphere, results);
            }
        }
    }

    /// Count total entities in this node and all children
    pub fn count_entities(&self) -> usize {
        let mut count = self.entities.len();

        if let Some(ref children) = self.children {
            for child in children.iter() {
                count += child.count_entities();
            }
        }

        count
    }

    /// Deepest level below (and including) this node
    pub fn max_depth(&self) -> u32 {
        self.children
            .as_ref()
            .map_or(self.depth, |children| children.iter().map(Self::max_depth).max().unwrap_or(self.depth))
    }
}

fn ordered_pair(a: usize, b: usize) -> (usize, usize) {
    if a < b { (a, b) } else { (b, a) }
}

/// Octree spatial partitioning structure
#[derive(Debug, Clone, Default)]
pub struct Octree {
    /// Root node containing every box, None when the tree is empty
    pub root: Option<OctreeNode>,

    /// Boxes the tree was built from; indices refer into this list
    boxes: Vec<Aabb>,
}

impl Octree {
    /// Build an octree over `boxes`. Null boxes are skipped.
    pub fn build(boxes: Vec<Aabb>, config: &OctreeConfig) -> Self {
        let world_bounds = boxes.iter().fold(Aabb::NULL, |acc, aabb| acc.merge(aabb));
        if world_bounds.is_null() {
            return Self { root: None, boxes };
        }

        let candidates: Vec<usize> = boxes
            .iter()
            .enumerate()
            .filter(|(_, aabb)| !aabb.is_null())
            .map(|(index, _)| index)
            .collect();

        let mut root = OctreeNode::new(world_bounds, 0);
        root.build(candidates, &boxes, config);

        log::trace!(
            "Octree built: {} boxes, depth {}",
            root.count_entities(),
            root.max_depth()
        );

        Self { root: Some(root), boxes }
    }

    /// Number of boxes handed to [`Octree::build`]
    pub fn len(&self) -> usize {
        self.boxes.len()
    }

    /// Whether the tree holds no boxes
    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }

    /// Every pair of overlapping boxes as `(i, j)` with `i < j`, sorted
    pub fn overlapping_pairs(&self) -> Vec<(usize, usize)> {
        let mut pairs = Vec::new();
        if let Some(ref root) = self.root {
            let mut ancestors = Vec::new();
            root.collect_pairs(&self.boxes, &mut ancestors, &mut pairs);
        }
        pairs.sort_unstable();
        pairs.dedup();
        pairs
    }

    /// Boxes hit by `ray` with the distance to the first intersection,
    /// sorted by index
    pub fn ray_hits(&self, ray: &Ray) -> Vec<(usize, f32)> {
        let mut results = Vec::new();
        if let Some(ref root) = self.root {
            root.query_ray(&self.boxes, ray, &mut results);
        }
        results.sort_unstable_by_key(|&(index, _)| index);
        results
    }

    /// Boxes overlapping `region`, sorted by index
    pub fn query_aabb(&self, region: &Aabb) -> Vec<usize> {
        let mut results = Vec::new();
        if let Some(ref root) = self.root {
            root.query_aabb(&self.boxes, region, &mut results);
        }
        results.sort_unstable();
        results
    }

    /// Boxes touching `sphere`, sorted by index
    pub fn query_sphere(&self, sphere: &BoundingSphere) -> Vec<usize> {
        let mut results = Vec::new();
        if let Some(ref root) = self.root {
            root.query_sphere(&self.boxes, sphere, &mut results);
        }
        results.sort_unstable();
        results
    }

    /// Get total entity count
    pub fn entity_count(&self) -> usize {
        self.root.as_ref().map_or(0, OctreeNode::count_entities)
    }
}
