//! # Scene Engine
//!
//! A scene graph with deterministic spatial queries.
//!
//! ## Features
//!
//! - **Transform Hierarchy**: Arena-backed scene nodes with cached world transforms
//! - **Movable Objects**: Mesh-backed entities and cameras with unique names
//! - **Octree Broad Phase**: Rebuilt on every scene graph update
//! - **Scene Queries**: Overlapping pairs, ray picking, sphere and box regions
//! - **Deterministic Results**: Ordered by object type and name, never by tree layout
//!
//! ## Quick Start
//!
//! ```rust
//! use scene_engine::prelude::*;
//!
//! fn main() -> Result<(), SceneError> {
//!     let mut scene = SceneManager::new();
//!     scene.mesh_registry_mut().register("General", "cube.mesh", Aabb::cube(1.0));
//!
//!     let root = scene.root_scene_node();
//!     for (name, x) in [("left", -0.5), ("right", 0.5)] {
//!         let node = scene.create_child_scene_node_at(root, Vec3::new(x, 0.0, 0.0))?;
//!         let entity = scene.create_entity(name, "cube.mesh", "General")?;
//!         scene.attach_object(node, entity)?;
//!     }
//!     scene.update_scene_graph();
//!
//!     let pairs = scene.create_intersection_query().execute(&scene);
//!     assert_eq!(pairs[0].names(&scene), Some(("left", "right")));
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod config;
pub mod error;
pub mod foundation;
pub mod query;
pub mod scene;
pub mod spatial;

pub use error::{Result, SceneError};

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        config::{Config, ConfigError, RayQueryDefaults, SceneConfig},
        error::SceneError,
        foundation::{
            collections::{NodeHandle, ObjectHandle},
            math::{Quat, Transform, Vec3},
            random::MinStdRand,
        },
        query::{AabbSceneQuery, IntersectionPair, IntersectionSceneQuery, RayQueryHit, RaySceneQuery, SphereSceneQuery},
        scene::{scatter_clones, Camera, MovableObject, MovableType, QueryFlags, SceneManager, TransformSpace},
        spatial::{Aabb, BoundingSphere, OctreeConfig, Ray},
    };
}
