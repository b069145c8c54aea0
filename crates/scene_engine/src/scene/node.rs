//! Scene graph nodes
//!
//! Nodes live in the scene manager's arena and link to each other through
//! handles. Each node owns its local transform and memoizes its world
//! transform until an ancestor or the node itself changes.

use std::cell::Cell;

use crate::foundation::collections::{NodeHandle, ObjectHandle};
use crate::foundation::math::{Quat, Transform, Vec3};

/// Coordinate space a position or direction argument is expressed in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransformSpace {
    /// Relative to the node's own position and orientation
    Local,
    /// Relative to the node's parent
    #[default]
    Parent,
    /// Relative to the root of the scene graph
    World,
}

/// A node in the transform hierarchy
#[derive(Debug)]
pub struct SceneNode {
    pub(crate) local: Transform,
    pub(crate) parent: Option<NodeHandle>,
    pub(crate) children: Vec<NodeHandle>,
    pub(crate) objects: Vec<ObjectHandle>,
    pub(crate) world: Cell<Option<Transform>>,
}

impl SceneNode {
    pub(crate) fn new(local: Transform) -> Self {
        Self {
            local,
            parent: None,
            children: Vec::new(),
            objects: Vec::new(),
            world: Cell::new(None),
        }
    }

    /// Transform relative to the parent
    pub fn local_transform(&self) -> &Transform {
        &self.local
    }

    /// Position relative to the parent
    pub fn position(&self) -> Vec3 {
        self.local.position
    }

    /// Orientation relative to the parent
    pub fn orientation(&self) -> Quat {
        self.local.rotation
    }

    /// Scale relative to the parent
    pub fn scale(&self) -> Vec3 {
        self.local.scale
    }

    /// Parent node, `None` for the root and for detached nodes
    pub fn parent(&self) -> Option<NodeHandle> {
        self.parent
    }

    /// Child nodes in insertion order
    pub fn children(&self) -> &[NodeHandle] {
        &self.children
    }

    /// Attached movable objects in attachment order
    pub fn attached_objects(&self) -> &[ObjectHandle] {
        &self.objects
    }

    /// Whether the world transform must be recomputed
    pub fn is_dirty(&self) -> bool {
        self.world.get().is_none()
    }

    pub(crate) fn invalidate(&self) {
        self.world.set(None);
    }
}
