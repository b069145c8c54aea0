//! Region queries: everything touching a sphere or a box

use super::live_entry;
use crate::foundation::collections::ObjectHandle;
use crate::scene::{QueryFlags, SceneManager};
use crate::spatial::{Aabb, BoundingSphere};

/// Finds the indexed objects whose world bounding box touches a sphere
#[derive(Debug, Clone, PartialEq)]
pub struct SphereSceneQuery {
    sphere: BoundingSphere,
    query_mask: QueryFlags,
}

impl SphereSceneQuery {
    /// Query over all objects
    pub fn new(sphere: BoundingSphere) -> Self {
        Self {
            sphere,
            query_mask: QueryFlags::all(),
        }
    }

    /// Replace the sphere
    pub fn set_sphere(&mut self, sphere: BoundingSphere) {
        self.sphere = sphere;
    }

    /// Restrict the query to objects whose flags intersect `mask`
    pub fn set_query_mask(&mut self, mask: QueryFlags) {
        self.query_mask = mask;
    }

    /// Matching objects in entry order
    pub fn execute(&self, scene: &SceneManager) -> Vec<ObjectHandle> {
        let Some(index) = scene.spatial_index() else {
            return Vec::new();
        };
        index
            .octree
            .query_sphere(&self.sphere)
            .into_iter()
            .filter_map(|entry| live_entry(scene, index, entry, self.query_mask))
            .collect()
    }
}

/// Finds the indexed objects whose world bounding box overlaps a box
#[derive(Debug, Clone, PartialEq)]
pub struct AabbSceneQuery {
    region: Aabb,
    query_mask: QueryFlags,
}

impl AabbSceneQuery {
    /// Query over all objects
    pub fn new(region: Aabb) -> Self {
        Self {
            region,
            query_mask: QueryFlags::all(),
        }
    }

    /// Replace the region
    pub fn set_box(&mut self, region: Aabb) {
        self.region = region;
    }

    /// Restrict the query to objects whose flags intersect `mask`
    pub fn set_query_mask(&mut self, mask: QueryFlags) {
        self.query_mask = mask;
    }

    /// Matching objects in entry order
    pub fn execute(&self, scene: &SceneManager) -> Vec<ObjectHandle> {
        let Some(index) = scene.spatial_index() else {
            return Vec::new();
        };
        index
            .octree
            .query_aabb(&self.region)
            .into_iter()
            .filter_map(|entry| live_entry(scene, index, entry, self.query_mask))
            .collect()
    }
}
