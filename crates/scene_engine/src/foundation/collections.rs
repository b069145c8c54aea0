//! Handle types for arena-stored scene data

use slotmap::new_key_type;

new_key_type! {
    /// Stable handle to a [`SceneNode`](crate::scene::SceneNode)
    pub struct NodeHandle;

    /// Stable handle to a [`MovableObject`](crate::scene::MovableObject)
    pub struct ObjectHandle;
}

pub use slotmap::{SlotMap, SecondaryMap};
