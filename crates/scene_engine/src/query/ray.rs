//! Ray picking query

use super::live_entry;
use crate::error::{Result, SceneError};
use crate::foundation::collections::ObjectHandle;
use crate::scene::{QueryFlags, SceneManager};
use crate::spatial::Ray;

/// An object hit by a ray
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayQueryHit {
    /// The object whose world bounding box the ray hits
    pub object: ObjectHandle,
    /// Distance from the ray origin to the box, 0 when the origin is inside
    pub distance: f32,
}

/// Finds the indexed objects whose world bounding box a ray hits
#[derive(Debug, Clone, PartialEq)]
pub struct RaySceneQuery {
    ray: Ray,
    sort_by_distance: bool,
    max_results: usize,
    query_mask: QueryFlags,
}

impl RaySceneQuery {
    /// Unsorted query over all objects
    pub fn new(ray: Ray) -> Self {
        Self {
            ray,
            sort_by_distance: false,
            max_results: 0,
            query_mask: QueryFlags::all(),
        }
    }

    /// Replace the ray
    pub fn set_ray(&mut self, ray: Ray) {
        self.ray = ray;
    }

    /// The ray being cast
    pub fn ray(&self) -> &Ray {
        &self.ray
    }

    /// Sort hits by ascending distance and keep at most `max_results`
    /// (0 keeps all). Disabled sorting reports hits in entry order.
    pub fn set_sort_by_distance(&mut self, enable: bool, max_results: usize) {
        self.sort_by_distance = enable;
        self.max_results = max_results;
    }

    /// Whether hits are sorted by distance
    pub fn sort_by_distance(&self) -> bool {
        self.sort_by_distance
    }

    /// Result cap applied when sorting
    pub fn max_results(&self) -> usize {
        self.max_results
    }

    /// Restrict the query to objects whose flags intersect `mask`
    pub fn set_query_mask(&mut self, mask: QueryFlags) {
        self.query_mask = mask;
    }

    /// Current query mask
    pub fn query_mask(&self) -> QueryFlags {
        self.query_mask
    }

    /// Cast the ray against the spatial index.
    ///
    /// Equal distances keep entry order.
    pub fn execute(&self, scene: &SceneManager) -> Result<Vec<RayQueryHit>> {
        if self.ray.is_degenerate() {
            return Err(SceneError::InvalidQuery(format!(
                "ray direction {:?} cannot be normalized",
                self.ray.direction()
            )));
        }
        let Some(index) = scene.spatial_index() else {
            log::trace!("Ray query on a scene that was never updated");
            return Ok(Vec::new());
        };

        let mut hits: Vec<RayQueryHit> = index
            .octree
            .ray_hits(&self.ray)
            .into_iter()
            .filter_map(|(entry, distance)| {
                Some(RayQueryHit {
                    object: live_entry(scene, index, entry, self.query_mask)?,
                    distance,
                })
            })
            .collect();

        if self.sort_by_distance {
            hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
            if self.max_results > 0 {
                hits.truncate(self.max_results);
            }
        }

        log::trace!("Ray query hit {} objects", hits.len());
        Ok(hits)
    }
}
