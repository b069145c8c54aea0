//! Spatial partitioning data structures
//!
//! Provides the bounding volumes and the octree used for broad-phase
//! pruning of intersection and ray queries.

mod bounds;
mod octree;
mod ray;

pub use bounds::{Aabb, BoundingSphere};
pub use octree::{Octree, OctreeConfig, OctreeNode};
pub use ray::Ray;
