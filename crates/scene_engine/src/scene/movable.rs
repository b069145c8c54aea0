//! Movable objects: anything that can hang off a scene node and take part
//! in spatial queries

use std::fmt;
use std::sync::Arc;

use bitflags::bitflags;

use super::camera::Camera;
use super::mesh::Mesh;
use crate::foundation::collections::NodeHandle;
use crate::foundation::math::Transform;
use crate::spatial::{Aabb, BoundingSphere};

bitflags! {
    /// Query filtering bits.
    ///
    /// An object takes part in a query only when its flags share at least
    /// one bit with the query mask. Any bit may be used; the named
    /// constants are conventions.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct QueryFlags: u32 {
        /// Static world geometry
        const WORLD     = 1 << 0;
        /// Objects that can be picked by rays
        const PICKABLE  = 1 << 1;
        /// Objects taking part in overlap tests
        const COLLIDER  = 1 << 2;
        // Remaining bits are free for callers
        const _ = !0;
    }
}

impl Default for QueryFlags {
    fn default() -> Self {
        Self::all()
    }
}

/// Type of a movable object.
///
/// Names are unique per type, and spatial index entries are ordered by type
/// first, then by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MovableType {
    /// Camera object
    Camera,
    /// Mesh-backed entity
    Entity,
}

impl MovableType {
    /// Human-readable type name
    pub const fn name(self) -> &'static str {
        match self {
            Self::Camera => "Camera",
            Self::Entity => "Entity",
        }
    }
}

impl fmt::Display for MovableType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Type-specific payload of a movable object
#[derive(Debug, Clone)]
pub enum MovableKind {
    /// Mesh-backed entity; the mesh is shared and never mutated
    Entity {
        /// Shared mesh bounds
        mesh: Arc<Mesh>,
    },
    /// Camera with its projection parameters
    Camera(Camera),
}

impl MovableKind {
    /// Type tag of this payload
    pub fn movable_type(&self) -> MovableType {
        match self {
            Self::Entity { .. } => MovableType::Entity,
            Self::Camera(_) => MovableType::Camera,
        }
    }
}

/// An object that can be attached to a scene node
#[derive(Debug, Clone)]
pub struct MovableObject {
    name: String,
    local_bounds: Aabb,
    bounding_radius: f32,
    pub(crate) node: Option<NodeHandle>,
    query_flags: QueryFlags,
    kind: MovableKind,
}

impl MovableObject {
    /// Entity built from a mesh; local bounds come from the mesh
    pub(crate) fn entity(name: &str, mesh: Arc<Mesh>) -> Self {
        Self {
            name: name.to_string(),
            local_bounds: mesh.bounds,
            bounding_radius: mesh.bounding_radius,
            node: None,
            query_flags: QueryFlags::default(),
            kind: MovableKind::Entity { mesh },
        }
    }

    /// Camera object; cameras have no volume and are never indexed
    pub(crate) fn camera(name: &str, camera: Camera) -> Self {
        Self {
            name: name.to_string(),
            local_bounds: Aabb::NULL,
            bounding_radius: 0.0,
            node: None,
            query_flags: QueryFlags::default(),
            kind: MovableKind::Camera(camera),
        }
    }

    /// Copy with a new identity, detached, sharing the mesh
    pub(crate) fn clone_named(&self, name: &str) -> Self {
        Self {
            name: name.to_string(),
            node: None,
            ..self.clone()
        }
    }

    /// Object name, unique for its type
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Type of the object
    pub fn movable_type(&self) -> MovableType {
        self.kind.movable_type()
    }

    /// Type-specific payload
    pub fn kind(&self) -> &MovableKind {
        &self.kind
    }

    /// Camera parameters, if the object is a camera
    pub fn as_camera(&self) -> Option<&Camera> {
        match &self.kind {
            MovableKind::Camera(camera) => Some(camera),
            MovableKind::Entity { .. } => None,
        }
    }

    /// Mesh of an entity
    pub fn mesh(&self) -> Option<&Arc<Mesh>> {
        match &self.kind {
            MovableKind::Entity { mesh } => Some(mesh),
            MovableKind::Camera(_) => None,
        }
    }

    /// Node the object is attached to
    pub fn parent_node(&self) -> Option<NodeHandle> {
        self.node
    }

    /// Whether the object hangs off a node
    pub fn is_attached(&self) -> bool {
        self.node.is_some()
    }

    /// Object-space bounding box
    pub fn local_bounding_box(&self) -> &Aabb {
        &self.local_bounds
    }

    /// Object-space bounding sphere, centred on the box
    pub fn local_bounding_sphere(&self) -> Option<BoundingSphere> {
        if self.local_bounds.is_null() {
            return None;
        }
        Some(BoundingSphere::new(self.local_bounds.center(), self.bounding_radius))
    }

    /// Query filtering bits
    pub fn query_flags(&self) -> QueryFlags {
        self.query_flags
    }

    pub(crate) fn set_query_flags(&mut self, flags: QueryFlags) {
        self.query_flags = flags;
    }

    /// World-space box for a node world transform
    pub(crate) fn bounds_in(&self, world: &Transform) -> Aabb {
        self.local_bounds.transformed(world)
    }

    /// World-space sphere for a node world transform
    pub(crate) fn sphere_in(&self, world: &Transform) -> Option<BoundingSphere> {
        self.local_bounding_sphere().map(|sphere| sphere.transformed(world))
    }
}
