//! Scene queries
//!
//! Query objects hold only their parameters. Each `execute` call reads the
//! spatial index built by the last
//! [`update_scene_graph`](crate::scene::SceneManager::update_scene_graph):
//! the octree prunes candidates (broad phase) and bounding-box tests confirm
//! them (narrow phase). Results follow entry order, the `(movable type,
//! name)` order of the indexed objects, so they never depend on the tree
//! layout.
//!
//! A query against a scene that was never updated returns nothing. A query
//! against a stale index uses the old bounds and skips objects destroyed
//! since.

mod intersection;
mod ray;
mod region;

pub use intersection::{IntersectionPair, IntersectionSceneQuery};
pub use ray::{RayQueryHit, RaySceneQuery};
pub use region::{AabbSceneQuery, SphereSceneQuery};

use crate::foundation::collections::ObjectHandle;
use crate::scene::{QueryFlags, SceneManager, SpatialIndex};

/// Handle of index entry `entry` when the object still exists and matches
/// `mask`
fn live_entry(scene: &SceneManager, index: &SpatialIndex, entry: usize, mask: QueryFlags) -> Option<ObjectHandle> {
    let handle = *index.entries.get(entry)?;
    let object = scene.object(handle)?;
    object.query_flags().intersects(mask).then_some(handle)
}
