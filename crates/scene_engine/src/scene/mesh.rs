//! Mesh bounds shared between entities
//!
//! Geometry loading lives outside this crate. Entities only need the
//! object-space bounds of their mesh, which are registered here once and
//! shared read-only by every entity (and clone) that uses the mesh.

use std::collections::HashMap;
use std::sync::Arc;

use crate::spatial::Aabb;

/// Read-only bounds of a named mesh
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    /// Mesh name, unique within its group
    pub name: String,
    /// Resource group the mesh was registered in
    pub group: String,
    /// Object-space bounding box
    pub bounds: Aabb,
    /// Radius of the object-space bounding sphere around the box centre
    pub bounding_radius: f32,
}

/// Registry of meshes keyed by `(group, name)`
#[derive(Debug, Default)]
pub struct MeshRegistry {
    meshes: HashMap<(String, String), Arc<Mesh>>,
}

impl MeshRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a mesh whose bounding sphere encloses `bounds`.
    ///
    /// Registering an existing `(group, name)` replaces the entry; entities
    /// created earlier keep the mesh they were built with.
    pub fn register(&mut self, group: &str, name: &str, bounds: Aabb) -> Arc<Mesh> {
        let radius = bounds.bounding_sphere().map_or(0.0, |sphere| sphere.radius);
        self.register_with_radius(group, name, bounds, radius)
    }

    /// Register a mesh with an explicit bounding sphere radius
    pub fn register_with_radius(&mut self, group: &str, name: &str, bounds: Aabb, bounding_radius: f32) -> Arc<Mesh> {
        let mesh = Arc::new(Mesh {
            name: name.to_string(),
            group: group.to_string(),
            bounds,
            bounding_radius,
        });
        if self
            .meshes
            .insert((group.to_string(), name.to_string()), Arc::clone(&mesh))
            .is_some()
        {
            log::warn!("Mesh '{}' in group '{}' re-registered", name, group);
        }
        mesh
    }

    /// Look up a mesh
    pub fn get(&self, group: &str, name: &str) -> Option<Arc<Mesh>> {
        self.meshes.get(&(group.to_string(), name.to_string())).cloned()
    }

    /// Number of registered meshes
    pub fn len(&self) -> usize {
        self.meshes.len()
    }

    /// Whether no mesh is registered
    pub fn is_empty(&self) -> bool {
        self.meshes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_register_and_lookup() {
        let mut registry = MeshRegistry::new();
        registry.register("General", "sphere.mesh", Aabb::cube(100.0));

        let mesh = registry.get("General", "sphere.mesh").unwrap();
        assert_eq!(mesh.bounds, Aabb::cube(100.0));
        assert_relative_eq!(mesh.bounding_radius, 100.0 * 3.0_f32.sqrt(), epsilon = 1e-3);
        assert!(registry.get("Other", "sphere.mesh").is_none());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_explicit_radius() {
        let mut registry = MeshRegistry::new();
        let mesh = registry.register_with_radius("General", "sphere.mesh", Aabb::cube(100.0), 100.0);
        assert_eq!(mesh.bounding_radius, 100.0);
    }
}
