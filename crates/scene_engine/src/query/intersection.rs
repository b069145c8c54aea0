//! Pairwise overlap query

use super::live_entry;
use crate::foundation::collections::ObjectHandle;
use crate::scene::{QueryFlags, SceneManager};

/// Two movable objects whose world bounding boxes overlap
///
/// `first` precedes `second` in entry order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IntersectionPair {
    /// Earlier object in entry order
    pub first: ObjectHandle,
    /// Later object in entry order
    pub second: ObjectHandle,
}

impl IntersectionPair {
    /// Names of both objects, if they still exist
    pub fn names<'a>(&self, scene: &'a SceneManager) -> Option<(&'a str, &'a str)> {
        Some((scene.object(self.first)?.name(), scene.object(self.second)?.name()))
    }
}

/// Finds every pair of indexed objects with overlapping world bounds
///
/// Touching boxes overlap. Each unordered pair is reported once and no
/// object is paired with itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntersectionSceneQuery {
    query_mask: QueryFlags,
}

impl IntersectionSceneQuery {
    /// Query over all objects
    pub fn new() -> Self {
        Self {
            query_mask: QueryFlags::all(),
        }
    }

    /// Restrict the query to objects whose flags intersect `mask`
    #[must_use]
    pub fn with_query_mask(mut self, mask: QueryFlags) -> Self {
        self.query_mask = mask;
        self
    }

    /// Set the query mask
    pub fn set_query_mask(&mut self, mask: QueryFlags) {
        self.query_mask = mask;
    }

    /// Current query mask
    pub fn query_mask(&self) -> QueryFlags {
        self.query_mask
    }

    /// Overlapping pairs, ordered by first then second object in entry order
    pub fn execute(&self, scene: &SceneManager) -> Vec<IntersectionPair> {
        let Some(index) = scene.spatial_index() else {
            log::trace!("Intersection query on a scene that was never updated");
            return Vec::new();
        };

        let pairs: Vec<IntersectionPair> = index
            .octree
            .overlapping_pairs()
            .into_iter()
            .filter_map(|(a, b)| {
                Some(IntersectionPair {
                    first: live_entry(scene, index, a, self.query_mask)?,
                    second: live_entry(scene, index, b, self.query_mask)?,
                })
            })
            .collect();

        log::trace!("Intersection query found {} pairs", pairs.len());
        pairs
    }
}

impl Default for IntersectionSceneQuery {
    fn default() -> Self {
        Self::new()
    }
}
