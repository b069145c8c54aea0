//! Scene Manager - owner of the scene graph and its spatial index
//!
//! Following Game Engine Architecture Chapter 11.2.7 - Scene Graphs.
//!
//! The Scene Manager:
//! 1. Owns the node hierarchy and every movable object (arena + handles)
//! 2. Keeps object names unique per movable type
//! 3. Rebuilds the broad-phase octree in [`SceneManager::update_scene_graph`]
//! 4. Creates queries that run against the last built index

use std::collections::BTreeMap;

use crate::config::SceneConfig;
use crate::error::{Result, SceneError};
use crate::foundation::collections::{NodeHandle, ObjectHandle, SecondaryMap, SlotMap};
use crate::foundation::math::{self, Quat, Transform, Vec3};
use crate::query::{IntersectionSceneQuery, RaySceneQuery, SphereSceneQuery};
use crate::spatial::{Aabb, BoundingSphere, Octree, Ray};

use super::camera::Camera;
use super::mesh::MeshRegistry;
use super::movable::{MovableObject, MovableType, QueryFlags};
use super::node::{SceneNode, TransformSpace};

/// Snapshot of world bounds taken by the last scene graph update.
///
/// Entry `i` of the octree is `entries[i]`; entries are in
/// `(movable type, name)` order.
#[derive(Debug)]
pub(crate) struct SpatialIndex {
    pub(crate) entries: Vec<ObjectHandle>,
    pub(crate) octree: Octree,
}

/// Scene Manager - owns nodes, movable objects and the spatial index
///
/// All mutation goes through the manager; nodes and objects are addressed by
/// handles that stay valid until the item is destroyed. Queries see the
/// index built by the most recent [`update_scene_graph`](Self::update_scene_graph).
#[derive(Debug)]
pub struct SceneManager {
    /// Configuration
    config: SceneConfig,

    /// Node arena; the root is never removed
    nodes: SlotMap<NodeHandle, SceneNode>,
    root: NodeHandle,

    /// Movable object arena
    objects: SlotMap<ObjectHandle, MovableObject>,

    /// Name registry, iterated in entry order
    names: BTreeMap<(MovableType, String), ObjectHandle>,

    meshes: MeshRegistry,

    index: Option<SpatialIndex>,
    index_stale: bool,
}

impl SceneManager {
    /// Create a new scene manager with default configuration
    pub fn new() -> Self {
        let mut nodes = SlotMap::with_key();
        let root = nodes.insert(SceneNode::new(Transform::identity()));
        Self {
            config: SceneConfig::default(),
            nodes,
            root,
            objects: SlotMap::with_key(),
            names: BTreeMap::new(),
            meshes: MeshRegistry::new(),
            index: None,
            index_stale: true,
        }
    }

    /// Create a scene manager with custom configuration
    pub fn with_config(config: SceneConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            ..Self::new()
        })
    }

    /// Active configuration
    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    /// Shared mesh bounds available to [`create_entity`](Self::create_entity)
    pub fn mesh_registry(&self) -> &MeshRegistry {
        &self.meshes
    }

    /// Mutable access to the mesh registry
    pub fn mesh_registry_mut(&mut self) -> &mut MeshRegistry {
        &mut self.meshes
    }

    // ------------------------------------------------------------------
    // Nodes
    // ------------------------------------------------------------------

    /// The root of the scene graph
    pub fn root_scene_node(&self) -> NodeHandle {
        self.root
    }

    /// Create a node outside the graph; it has no effect on queries until
    /// it is added under the root.
    pub fn create_scene_node(&mut self) -> NodeHandle {
        self.nodes.insert(SceneNode::new(Transform::identity()))
    }

    /// Create a node as the last child of `parent`
    pub fn create_child_scene_node(&mut self, parent: NodeHandle) -> Result<NodeHandle> {
        self.create_child_scene_node_at(parent, Vec3::zeros())
    }

    /// Create a child node of `parent` at a position relative to it
    pub fn create_child_scene_node_at(&mut self, parent: NodeHandle, position: Vec3) -> Result<NodeHandle> {
        self.node_ref(parent)?;

        let mut node = SceneNode::new(Transform::from_position(position));
        node.parent = Some(parent);
        let handle = self.nodes.insert(node);
        if let Some(parent_node) = self.nodes.get_mut(parent) {
            parent_node.children.push(handle);
        }
        self.index_stale = true;
        Ok(handle)
    }

    /// Look up a node
    pub fn node(&self, node: NodeHandle) -> Option<&SceneNode> {
        self.nodes.get(node)
    }

    /// Children of a node in insertion order
    pub fn children(&self, node: NodeHandle) -> Result<&[NodeHandle]> {
        Ok(self.node_ref(node)?.children())
    }

    /// Parent of a node
    pub fn parent(&self, node: NodeHandle) -> Result<Option<NodeHandle>> {
        Ok(self.node_ref(node)?.parent())
    }

    /// Movable objects attached to a node
    pub fn attached_objects(&self, node: NodeHandle) -> Result<&[ObjectHandle]> {
        Ok(self.node_ref(node)?.attached_objects())
    }

    /// Whether the node is the root or hangs below it
    pub fn is_in_scene_graph(&self, node: NodeHandle) -> bool {
        let mut current = Some(node);
        while let Some(handle) = current {
            if handle == self.root {
                return true;
            }
            current = self.nodes.get(handle).and_then(|n| n.parent);
        }
        false
    }

    /// Make `child` the last child of `parent`.
    ///
    /// Fails when `child` already has a parent, is the root, or is `parent`
    /// or one of its ancestors.
    pub fn add_child(&mut self, parent: NodeHandle, child: NodeHandle) -> Result<()> {
        self.node_ref(parent)?;
        let child_node = self.node_ref(child)?;

        if child == self.root {
            return Err(SceneError::InvalidHierarchy("the root node cannot become a child".to_string()));
        }
        if child_node.parent.is_some() {
            return Err(SceneError::InvalidHierarchy("node already has a parent".to_string()));
        }
        if self.is_ancestor_or_self(child, parent) {
            return Err(SceneError::InvalidHierarchy("adding the node would create a cycle".to_string()));
        }

        if let Some(parent_node) = self.nodes.get_mut(parent) {
            parent_node.children.push(child);
        }
        if let Some(child_node) = self.nodes.get_mut(child) {
            child_node.parent = Some(parent);
        }
        self.invalidate_subtree(child);
        Ok(())
    }

    /// Detach `child` from `parent`; the child keeps its subtree and objects
    pub fn remove_child(&mut self, parent: NodeHandle, child: NodeHandle) -> Result<()> {
        let parent_node = self.nodes.get_mut(parent).ok_or_else(|| not_found_node(parent))?;
        let Some(position) = parent_node.children.iter().position(|&c| c == child) else {
            return Err(SceneError::InvalidHierarchy("node is not a child of the given parent".to_string()));
        };
        parent_node.children.remove(position);

        if let Some(child_node) = self.nodes.get_mut(child) {
            child_node.parent = None;
        }
        self.invalidate_subtree(child);
        Ok(())
    }

    /// Destroy a node and its subtree.
    ///
    /// Objects attached anywhere in the subtree are detached, not destroyed.
    pub fn destroy_scene_node(&mut self, node: NodeHandle) -> Result<()> {
        if node == self.root {
            return Err(SceneError::InvalidHierarchy("the root node cannot be destroyed".to_string()));
        }
        let parent = self.node_ref(node)?.parent;
        if let Some(parent) = parent {
            self.remove_child(parent, node)?;
        }

        for handle in self.collect_subtree(node) {
            if let Some(removed) = self.nodes.remove(handle) {
                for object in removed.objects {
                    if let Some(object) = self.objects.get_mut(object) {
                        object.node = None;
                    }
                }
            }
        }
        self.index_stale = true;
        Ok(())
    }

    /// Destroy every descendant of `node` together with the movable objects
    /// attached to them. The node itself and its own objects survive.
    pub fn remove_and_destroy_all_children(&mut self, node: NodeHandle) -> Result<()> {
        let children = std::mem::take(&mut self.nodes.get_mut(node).ok_or_else(|| not_found_node(node))?.children);

        let mut destroyed_nodes = 0;
        let mut destroyed_objects = 0;
        for child in children {
            for handle in self.collect_subtree(child) {
                let Some(removed) = self.nodes.remove(handle) else {
                    continue;
                };
                destroyed_nodes += 1;
                for object in removed.objects {
                    if self.remove_object(object).is_some() {
                        destroyed_objects += 1;
                    }
                }
            }
        }

        log::debug!(
            "Destroyed {} nodes and {} objects below {:?}",
            destroyed_nodes,
            destroyed_objects,
            node
        );
        self.index_stale = true;
        Ok(())
    }

    /// Destroy every node except the root and every movable object
    pub fn clear_scene(&mut self) {
        let root = self.root;
        self.nodes.retain(|handle, _| handle == root);
        if let Some(root_node) = self.nodes.get_mut(root) {
            root_node.children.clear();
            root_node.objects.clear();
        }
        self.objects.clear();
        self.names.clear();
        self.index = None;
        self.index_stale = true;
        log::debug!("Scene cleared");
    }

    // ------------------------------------------------------------------
    // Transforms
    // ------------------------------------------------------------------

    /// Set the position relative to the parent
    pub fn set_position(&mut self, node: NodeHandle, position: Vec3) -> Result<()> {
        self.update_local(node, |local| local.position = position)
    }

    /// Set the orientation relative to the parent
    pub fn set_orientation(&mut self, node: NodeHandle, orientation: Quat) -> Result<()> {
        self.update_local(node, |local| local.rotation = orientation)
    }

    /// Set the scale relative to the parent
    pub fn set_scale(&mut self, node: NodeHandle, scale: Vec3) -> Result<()> {
        self.update_local(node, |local| local.scale = scale)
    }

    /// Replace the whole local transform
    pub fn set_transform(&mut self, node: NodeHandle, transform: Transform) -> Result<()> {
        self.update_local(node, |local| *local = transform)
    }

    /// Move a node by `delta` expressed in `space`
    pub fn translate(&mut self, node: NodeHandle, delta: Vec3, space: TransformSpace) -> Result<()> {
        let delta = match space {
            TransformSpace::Local => self.node_ref(node)?.local.rotation * delta,
            TransformSpace::Parent => delta,
            TransformSpace::World => match self.node_ref(node)?.parent {
                Some(parent) => {
                    let parent_world = self.resolve_world(parent);
                    (parent_world.rotation.inverse() * delta).component_div(&parent_world.scale)
                }
                None => delta,
            },
        };
        self.update_local(node, |local| local.position += delta)
    }

    /// Rotate a node by `rotation` expressed in `space`
    pub fn rotate(&mut self, node: NodeHandle, rotation: Quat, space: TransformSpace) -> Result<()> {
        let current = self.node_ref(node)?.local.rotation;
        let orientation = match space {
            TransformSpace::Local => current * rotation,
            TransformSpace::Parent => rotation * current,
            TransformSpace::World => {
                let world = self.resolve_world(node).rotation;
                current * world.inverse() * rotation * world
            }
        };
        self.update_local(node, |local| local.rotation = orientation)
    }

    /// Transform of a node relative to the root, recomputed only when the
    /// node or one of its ancestors changed.
    pub fn world_transform(&self, node: NodeHandle) -> Result<Transform> {
        self.node_ref(node)?;
        Ok(self.resolve_world(node))
    }

    /// Orient a node so that its local -Z axis points at `target`.
    ///
    /// `target` is a point in `space`. A target at the node's own position
    /// leaves the orientation unchanged.
    pub fn look_at(&mut self, node: NodeHandle, target: Vec3, space: TransformSpace) -> Result<()> {
        let local = *self.node_ref(node)?.local_transform();
        let parent = self.node_ref(node)?.parent;
        let parent_world = parent.map_or_else(Transform::identity, |p| self.resolve_world(p));

        // Direction towards the target in world space
        let direction = match space {
            TransformSpace::World => target - self.resolve_world(node).position,
            TransformSpace::Parent => parent_world.rotation * (target - local.position),
            TransformSpace::Local => self.resolve_world(node).rotation * target,
        };

        let Some(world_orientation) = math::look_rotation(direction, math::UP) else {
            log::warn!("look_at target coincides with node position, orientation unchanged");
            return Ok(());
        };
        let orientation = parent_world.rotation.inverse() * world_orientation;
        self.update_local(node, |local| local.rotation = orientation)
    }

    // ------------------------------------------------------------------
    // Movable objects
    // ------------------------------------------------------------------

    /// Create an entity backed by a registered mesh
    pub fn create_entity(&mut self, name: &str, mesh: &str, group: &str) -> Result<ObjectHandle> {
        let mesh = self
            .meshes
            .get(group, mesh)
            .ok_or_else(|| SceneError::ItemNotFound(format!("mesh '{mesh}' in group '{group}'")))?;
        self.insert_object(MovableObject::entity(name, mesh))
    }

    /// Create a camera object
    pub fn create_camera(&mut self, name: &str, camera: Camera) -> Result<ObjectHandle> {
        self.insert_object(MovableObject::camera(name, camera))
    }

    /// Copy an object under a new name.
    ///
    /// The copy shares the mesh, copies bounds and query flags, and starts
    /// detached.
    pub fn clone_object(&mut self, source: ObjectHandle, new_name: &str) -> Result<ObjectHandle> {
        let copy = self.object_ref(source)?.clone_named(new_name);
        self.insert_object(copy)
    }

    /// Destroy an object, detaching it first
    pub fn destroy_movable_object(&mut self, object: ObjectHandle) -> Result<()> {
        self.remove_object(object).map(|_| ()).ok_or_else(|| not_found_object(object))
    }

    /// Look up an object
    pub fn object(&self, object: ObjectHandle) -> Option<&MovableObject> {
        self.objects.get(object)
    }

    /// Find an object by type and name
    pub fn object_by_name(&self, kind: MovableType, name: &str) -> Option<ObjectHandle> {
        self.names.get(&(kind, name.to_string())).copied()
    }

    /// Replace an object's query flags
    pub fn set_query_flags(&mut self, object: ObjectHandle, flags: QueryFlags) -> Result<()> {
        self.objects
            .get_mut(object)
            .ok_or_else(|| not_found_object(object))?
            .set_query_flags(flags);
        Ok(())
    }

    /// Attach an object to a node, detaching it from its previous node
    pub fn attach_object(&mut self, node: NodeHandle, object: ObjectHandle) -> Result<()> {
        self.node_ref(node)?;
        let previous = self.object_ref(object)?.node;
        if previous == Some(node) {
            return Ok(());
        }
        if previous.is_some() {
            self.detach_object(object)?;
        }

        if let Some(node_ref) = self.nodes.get_mut(node) {
            node_ref.objects.push(object);
        }
        if let Some(object_ref) = self.objects.get_mut(object) {
            object_ref.node = Some(node);
        }
        self.index_stale = true;
        Ok(())
    }

    /// Detach an object from its node; detached objects are left alone
    pub fn detach_object(&mut self, object: ObjectHandle) -> Result<()> {
        let object_ref = self.objects.get_mut(object).ok_or_else(|| not_found_object(object))?;
        let Some(node) = object_ref.node.take() else {
            return Ok(());
        };
        if let Some(node_ref) = self.nodes.get_mut(node) {
            node_ref.objects.retain(|&o| o != object);
        }
        self.index_stale = true;
        Ok(())
    }

    /// Detach every object attached to a node
    pub fn detach_all_objects(&mut self, node: NodeHandle) -> Result<()> {
        let objects = std::mem::take(&mut self.nodes.get_mut(node).ok_or_else(|| not_found_node(node))?.objects);
        for object in objects {
            if let Some(object_ref) = self.objects.get_mut(object) {
                object_ref.node = None;
            }
        }
        self.index_stale = true;
        Ok(())
    }

    /// World-space bounding box of an object; null when detached
    pub fn world_bounding_box(&self, object: ObjectHandle) -> Result<Aabb> {
        let object_ref = self.object_ref(object)?;
        Ok(object_ref
            .node
            .map_or(Aabb::NULL, |node| object_ref.bounds_in(&self.resolve_world(node))))
    }

    /// World-space bounding sphere of an object; `None` when detached or
    /// without volume
    pub fn world_bounding_sphere(&self, object: ObjectHandle) -> Result<Option<BoundingSphere>> {
        let object_ref = self.object_ref(object)?;
        Ok(object_ref
            .node
            .and_then(|node| object_ref.sphere_in(&self.resolve_world(node))))
    }

    /// World-space bounding box, failing for detached objects
    pub fn require_world_bounding_box(&self, object: ObjectHandle) -> Result<Aabb> {
        let object_ref = self.object_ref(object)?;
        let node = object_ref
            .node
            .ok_or_else(|| SceneError::DetachedObject(object_ref.name().to_string()))?;
        Ok(object_ref.bounds_in(&self.resolve_world(node)))
    }

    /// World-space ray from a camera's near plane through a viewport point.
    ///
    /// `x` and `y` are normalized viewport coordinates, `(0, 0)` top-left.
    pub fn camera_to_viewport_ray(&self, camera: ObjectHandle, x: f32, y: f32) -> Result<Ray> {
        let object_ref = self.object_ref(camera)?;
        let params = object_ref
            .as_camera()
            .ok_or_else(|| SceneError::InvalidQuery(format!("'{}' is not a camera", object_ref.name())))?;
        let node = object_ref
            .node
            .ok_or_else(|| SceneError::DetachedObject(object_ref.name().to_string()))?;
        Ok(params.viewport_ray(&self.resolve_world(node), x, y))
    }

    // ------------------------------------------------------------------
    // Update and queries
    // ------------------------------------------------------------------

    /// Bring world transforms up to date and rebuild the spatial index.
    ///
    /// Only objects attached to nodes reachable from the root are indexed.
    pub fn update_scene_graph(&mut self) {
        let mut in_graph: SecondaryMap<ObjectHandle, ()> = SecondaryMap::new();
        let mut visited_nodes = 0;
        let mut stack = vec![self.root];
        while let Some(handle) = stack.pop() {
            let Some(node) = self.nodes.get(handle) else {
                continue;
            };
            // Parents are popped before their children, so this is one combine
            self.resolve_world(handle);
            visited_nodes += 1;
            for &object in &node.objects {
                in_graph.insert(object, ());
            }
            stack.extend(node.children.iter().rev().copied());
        }

        let mut entries = Vec::with_capacity(in_graph.len());
        let mut boxes = Vec::with_capacity(in_graph.len());
        for &handle in self.names.values() {
            if !in_graph.contains_key(handle) {
                continue;
            }
            let Some(object) = self.objects.get(handle) else {
                continue;
            };
            let Some(world) = object.node.and_then(|node| self.nodes.get(node)).and_then(|node| node.world.get()) else {
                continue;
            };
            let aabb = object.bounds_in(&world);
            if aabb.is_null() {
                continue;
            }
            entries.push(handle);
            boxes.push(aabb);
        }

        let octree = Octree::build(boxes, &self.config.octree);
        log::debug!(
            "Scene graph updated: {} nodes visited, {} objects indexed",
            visited_nodes,
            entries.len()
        );

        self.index = Some(SpatialIndex { entries, octree });
        self.index_stale = false;
    }

    /// Whether the scene changed since the last [`update_scene_graph`](Self::update_scene_graph)
    pub fn is_index_stale(&self) -> bool {
        self.index_stale
    }

    /// Number of nodes, including the root and detached nodes
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of movable objects
    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    /// New intersection query over this scene
    pub fn create_intersection_query(&self) -> IntersectionSceneQuery {
        IntersectionSceneQuery::new()
    }

    /// New ray query using the configured defaults
    pub fn create_ray_query(&self, ray: Ray) -> RaySceneQuery {
        let defaults = &self.config.ray_query;
        let mut query = RaySceneQuery::new(ray);
        query.set_sort_by_distance(defaults.sort_by_distance, defaults.max_results);
        query
    }

    /// New sphere query
    pub fn create_sphere_query(&self, sphere: BoundingSphere) -> SphereSceneQuery {
        SphereSceneQuery::new(sphere)
    }

    pub(crate) fn spatial_index(&self) -> Option<&SpatialIndex> {
        self.index.as_ref()
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    fn node_ref(&self, node: NodeHandle) -> Result<&SceneNode> {
        self.nodes.get(node).ok_or_else(|| not_found_node(node))
    }

    fn object_ref(&self, object: ObjectHandle) -> Result<&MovableObject> {
        self.objects.get(object).ok_or_else(|| not_found_object(object))
    }

    fn update_local(&mut self, node: NodeHandle, update: impl FnOnce(&mut Transform)) -> Result<()> {
        let node_ref = self.nodes.get_mut(node).ok_or_else(|| not_found_node(node))?;
        update(&mut node_ref.local);
        self.invalidate_subtree(node);
        Ok(())
    }

    /// Drop cached world transforms below and including `node`
    fn invalidate_subtree(&mut self, node: NodeHandle) {
        let mut stack = vec![node];
        while let Some(handle) = stack.pop() {
            if let Some(node) = self.nodes.get(handle) {
                node.invalidate();
                stack.extend_from_slice(&node.children);
            }
        }
        self.index_stale = true;
    }

    /// World transform from the nearest cached ancestor down to `node`
    fn resolve_world(&self, node: NodeHandle) -> Transform {
        let mut chain = Vec::new();
        let mut base = Transform::identity();
        let mut current = Some(node);
        while let Some(handle) = current {
            let Some(node) = self.nodes.get(handle) else {
                break;
            };
            if let Some(cached) = node.world.get() {
                base = cached;
                break;
            }
            chain.push(handle);
            current = node.parent;
        }

        for handle in chain.into_iter().rev() {
            if let Some(node) = self.nodes.get(handle) {
                base = base.combine(&node.local);
                node.world.set(Some(base));
            }
        }
        base
    }

    fn is_ancestor_or_self(&self, candidate: NodeHandle, node: NodeHandle) -> bool {
        let mut current = Some(node);
        while let Some(handle) = current {
            if handle == candidate {
                return true;
            }
            current = self.nodes.get(handle).and_then(|n| n.parent);
        }
        false
    }

    /// `node` and all its descendants, parents first
    fn collect_subtree(&self, node: NodeHandle) -> Vec<NodeHandle> {
        let mut result = Vec::new();
        let mut stack = vec![node];
        while let Some(handle) = stack.pop() {
            if let Some(node) = self.nodes.get(handle) {
                result.push(handle);
                stack.extend_from_slice(&node.children);
            }
        }
        result
    }

    fn insert_object(&mut self, object: MovableObject) -> Result<ObjectHandle> {
        let key = (object.movable_type(), object.name().to_string());
        if self.names.contains_key(&key) {
            return Err(SceneError::DuplicateName {
                kind: key.0.name(),
                name: key.1,
            });
        }
        let handle = self.objects.insert(object);
        self.names.insert(key, handle);
        Ok(handle)
    }

    fn remove_object(&mut self, object: ObjectHandle) -> Option<MovableObject> {
        let removed = self.objects.remove(object)?;
        if let Some(node) = removed.node.and_then(|node| self.nodes.get_mut(node)) {
            node.objects.retain(|&o| o != object);
        }
        self.names.remove(&(removed.movable_type(), removed.name().to_string()));
        self.index_stale = true;
        Some(removed)
    }
}

impl Default for SceneManager {
    fn default() -> Self {
        Self::new()
    }
}

fn not_found_node(node: NodeHandle) -> SceneError {
    SceneError::ItemNotFound(format!("scene node {node:?}"))
}

fn not_found_object(object: ObjectHandle) -> SceneError {
    SceneError::ItemNotFound(format!("movable object {object:?}"))
}
