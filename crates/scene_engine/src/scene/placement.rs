//! Reproducible scene population

use crate::error::Result;
use crate::foundation::collections::{NodeHandle, ObjectHandle};
use crate::foundation::math::Vec3;
use crate::foundation::random::MinStdRand;

use super::scene_manager::SceneManager;

/// Scatter `count` clones of `source` below the root.
///
/// Each clone is named after its index (`"0"`, `"1"`, ...) and attached to
/// a fresh child of the root placed at a point drawn from `rng` inside
/// `[min, max]`. Returns the created nodes and clones in creation order.
pub fn scatter_clones(
    scene: &mut SceneManager,
    source: ObjectHandle,
    count: usize,
    min: Vec3,
    max: Vec3,
    rng: &mut MinStdRand,
) -> Result<Vec<(NodeHandle, ObjectHandle)>> {
    let root = scene.root_scene_node();
    let mut placed = Vec::with_capacity(count);

    for index in 0..count {
        let clone = scene.clone_object(source, &index.to_string())?;
        let node = scene.create_child_scene_node_at(root, rng.next_point_in(min, max))?;
        scene.attach_object(node, clone)?;
        placed.push((node, clone));
    }

    log::debug!("Scattered {} clones", count);
    Ok(placed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::MovableType;
    use crate::spatial::Aabb;

    #[test]
    fn test_scatter_is_reproducible() {
        let build = || {
            let mut scene = SceneManager::new();
            scene.mesh_registry_mut().register("General", "sphere.mesh", Aabb::cube(100.0));
            let source = scene.create_entity("source", "sphere.mesh", "General").unwrap();
            let mut rng = MinStdRand::new();
            let min = Vec3::new(-2500.0, -2500.0, -2500.0);
            let max = Vec3::new(2500.0, 2500.0, 2500.0);
            let placed = scatter_clones(&mut scene, source, 10, min, max, &mut rng).unwrap();
            placed
                .iter()
                .map(|&(node, _)| scene.world_transform(node).unwrap().position)
                .collect::<Vec<_>>()
        };

        let first = build();
        assert_eq!(first, build());
        assert_eq!(first[0], Vec3::new(-2499.8877, -2074.838, 506.76318));
    }

    #[test]
    fn test_scatter_names_and_attachment() {
        let mut scene = SceneManager::new();
        scene.mesh_registry_mut().register("General", "sphere.mesh", Aabb::cube(1.0));
        let source = scene.create_entity("source", "sphere.mesh", "General").unwrap();
        let mut rng = MinStdRand::new();

        let placed = scatter_clones(&mut scene, source, 3, Vec3::zeros(), Vec3::new(1.0, 1.0, 1.0), &mut rng).unwrap();
        assert_eq!(placed.len(), 3);
        for (index, &(node, clone)) in placed.iter().enumerate() {
            assert_eq!(scene.object_by_name(MovableType::Entity, &index.to_string()), Some(clone));
            assert_eq!(scene.object(clone).unwrap().parent_node(), Some(node));
        }
        assert!(!scene.object(source).unwrap().is_attached());

        // Names are taken now
        assert!(scatter_clones(&mut scene, source, 1, Vec3::zeros(), Vec3::zeros(), &mut rng).is_err());
    }
}
