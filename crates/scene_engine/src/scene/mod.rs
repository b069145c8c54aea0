//! Scene management system
//!
//! Provides the transform hierarchy and the movable objects hanging off it.
//! Following Game Engine Architecture Chapter 11.2.7 - Scene Graphs.
//!
//! ## Architecture
//!
//! ```text
//! SceneManager
//!   ├── SceneNode arena (root + hierarchy, cached world transforms)
//!   ├── MovableObject arena (entities, cameras; unique names per type)
//!   ├── MeshRegistry (shared object-space bounds)
//!   └── Spatial index (octree snapshot from update_scene_graph)
//! ```
//!
//! Every mutation marks the spatial index stale; queries keep seeing the
//! last snapshot until [`SceneManager::update_scene_graph`] runs again.

mod camera;
mod mesh;
mod movable;
mod node;
mod placement;
mod scene_manager;

pub use camera::Camera;
pub use mesh::{Mesh, MeshRegistry};
pub use movable::{MovableKind, MovableObject, MovableType, QueryFlags};
pub use node::{SceneNode, TransformSpace};
pub use placement::scatter_clones;
pub use scene_manager::SceneManager;
pub(crate) use scene_manager::SpatialIndex;
