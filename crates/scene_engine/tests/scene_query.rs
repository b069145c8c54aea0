//! End-to-end scene query tests
//!
//! Builds a field of 501 spheres (one at the origin, 500 seeded clones in a
//! 5000 unit cube) and checks the exact overlap list and ray picking order.

use approx::assert_relative_eq;
use scene_engine::prelude::*;

const EXPECTED_PAIRS: [(u32, u32); 51] = [
    (0, 391), (1, 8), (117, 128), (118, 171), (118, 24), (121, 72), (121, 95),
    (132, 344), (14, 227), (14, 49), (144, 379), (151, 271), (153, 28), (164, 222),
    (169, 212), (176, 20), (179, 271), (185, 238), (190, 47), (193, 481), (201, 210),
    (205, 404), (235, 366), (239, 3), (250, 492), (256, 67), (26, 333), (260, 487),
    (263, 272), (265, 319), (265, 472), (270, 45), (284, 329), (289, 405), (316, 80),
    (324, 388), (334, 337), (336, 436), (34, 57), (340, 440), (342, 41), (348, 82),
    (35, 478), (372, 412), (380, 460), (398, 92), (417, 454), (432, 99), (448, 79),
    (498, 82), (72, 77),
];

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

struct SphereField {
    scene: SceneManager,
    camera: ObjectHandle,
    origin_sphere: ObjectHandle,
}

fn sphere_field() -> SphereField {
    init_logging();
    let mut scene = SceneManager::new();
    scene
        .mesh_registry_mut()
        .register_with_radius("General", "sphere.mesh", Aabb::cube(100.0), 100.0);
    let root = scene.root_scene_node();

    let camera = scene
        .create_camera("Camera", Camera::perspective(45.0, 4.0 / 3.0, 100.0, 100_000.0))
        .unwrap();
    let camera_node = scene.create_child_scene_node(root).unwrap();
    scene.attach_object(camera_node, camera).unwrap();
    scene.set_position(camera_node, Vec3::new(0.0, 0.0, 500.0)).unwrap();
    scene.look_at(camera_node, Vec3::zeros(), TransformSpace::Parent).unwrap();

    // One sphere at the origin so the centre ray always hits something
    let origin_sphere = scene.create_entity("501", "sphere.mesh", "General").unwrap();
    let origin_node = scene.create_child_scene_node(root).unwrap();
    scene.attach_object(origin_node, origin_sphere).unwrap();

    let mut rng = MinStdRand::new();
    scatter_clones(
        &mut scene,
        origin_sphere,
        500,
        Vec3::new(-2500.0, -2500.0, -2500.0),
        Vec3::new(2500.0, 2500.0, 2500.0),
        &mut rng,
    )
    .unwrap();

    scene.update_scene_graph();
    SphereField {
        scene,
        camera,
        origin_sphere,
    }
}

fn pair_names(scene: &SceneManager, pairs: &[IntersectionPair]) -> Vec<(String, String)> {
    pairs
        .iter()
        .map(|pair| {
            let (first, second) = pair.names(scene).expect("pair refers to live objects");
            (first.to_string(), second.to_string())
        })
        .collect()
}

#[test]
fn intersection_query_matches_reference_pairs() {
    let field = sphere_field();
    let pairs = field.scene.create_intersection_query().execute(&field.scene);

    let expected: Vec<(String, String)> = EXPECTED_PAIRS
        .iter()
        .map(|(a, b)| (a.to_string(), b.to_string()))
        .collect();
    assert_eq!(pair_names(&field.scene, &pairs), expected);
}

#[test]
fn intersection_pairs_really_overlap() {
    let field = sphere_field();
    let scene = &field.scene;
    let pairs = scene.create_intersection_query().execute(scene);

    for pair in &pairs {
        assert_ne!(pair.first, pair.second);
        let a = scene.world_bounding_box(pair.first).unwrap();
        let b = scene.world_bounding_box(pair.second).unwrap();
        assert!(a.intersects(&b));
    }

    // Every overlapping pair among the clones is reported
    let mut overlapping = 0;
    for i in 0..500 {
        let a = scene.object_by_name(MovableType::Entity, &i.to_string()).unwrap();
        let a_box = scene.world_bounding_box(a).unwrap();
        for j in (i + 1)..500 {
            let b = scene.object_by_name(MovableType::Entity, &j.to_string()).unwrap();
            if a_box.intersects(&scene.world_bounding_box(b).unwrap()) {
                overlapping += 1;
            }
        }
    }
    assert_eq!(overlapping, pairs.len());
}

#[test]
fn intersection_query_is_deterministic() {
    let first = sphere_field();
    let second = sphere_field();

    let a = pair_names(&first.scene, &first.scene.create_intersection_query().execute(&first.scene));
    let b = pair_names(&second.scene, &second.scene.create_intersection_query().execute(&second.scene));
    assert_eq!(a, b);
}

#[test]
fn camera_ray_hits_origin_sphere_first() {
    let field = sphere_field();
    let scene = &field.scene;

    let ray = scene.camera_to_viewport_ray(field.camera, 0.5, 0.5).unwrap();
    assert_relative_eq!(ray.direction(), Vec3::new(0.0, 0.0, -1.0), epsilon = 1e-5);

    let mut query = scene.create_ray_query(ray);
    query.set_sort_by_distance(true, 2);
    let hits = query.execute(scene).unwrap();

    assert_eq!(hits.len(), 2);
    assert_eq!(hits[0].object, field.origin_sphere);
    assert_eq!(scene.object(hits[0].object).unwrap().name(), "501");
    assert_eq!(scene.object(hits[1].object).unwrap().name(), "397");
    // The ray starts on the near plane, 100 units in front of the camera
    assert_relative_eq!(hits[0].distance, 300.0, epsilon = 1e-2);
    assert!(hits[0].distance <= hits[1].distance);
}

#[test]
fn unsorted_ray_hits_follow_name_order() {
    let field = sphere_field();
    let scene = &field.scene;
    let ray = scene.camera_to_viewport_ray(field.camera, 0.5, 0.5).unwrap();

    let hits = RaySceneQuery::new(ray).execute(scene).unwrap();
    let names: Vec<&str> = hits
        .iter()
        .map(|hit| scene.object(hit.object).unwrap().name())
        .collect();

    let mut sorted = names.clone();
    sorted.sort_unstable();
    assert_eq!(names, sorted);
    assert!(names.contains(&"501"));
    assert!(names.contains(&"397"));
}

#[test]
fn queries_before_update_are_empty() {
    init_logging();
    let mut scene = SceneManager::new();
    scene.mesh_registry_mut().register("General", "sphere.mesh", Aabb::cube(100.0));
    let root = scene.root_scene_node();
    for name in ["a", "b"] {
        let node = scene.create_child_scene_node(root).unwrap();
        let entity = scene.create_entity(name, "sphere.mesh", "General").unwrap();
        scene.attach_object(node, entity).unwrap();
    }

    assert!(scene.create_intersection_query().execute(&scene).is_empty());
    let ray = Ray::new(Vec3::new(0.0, 0.0, 500.0), Vec3::new(0.0, 0.0, -1.0));
    assert!(scene.create_ray_query(ray).execute(&scene).unwrap().is_empty());

    scene.update_scene_graph();
    assert_eq!(scene.create_intersection_query().execute(&scene).len(), 1);
}

#[test]
fn remove_and_destroy_all_children_clears_subtree() {
    let mut field = sphere_field();
    let scene = &mut field.scene;
    let root = scene.root_scene_node();

    scene.remove_and_destroy_all_children(root).unwrap();

    assert!(scene.children(root).unwrap().is_empty());
    assert_eq!(scene.node_count(), 1);
    assert_eq!(scene.object_count(), 0);
    assert!(scene.object(field.camera).is_none());
    assert!(scene.object_by_name(MovableType::Entity, "501").is_none());
    assert!(scene.object_by_name(MovableType::Entity, "0").is_none());

    scene.update_scene_graph();
    assert!(scene.create_intersection_query().execute(scene).is_empty());
}

#[test]
fn remove_and_destroy_all_children_keeps_inner_node() {
    init_logging();
    let mut scene = SceneManager::new();
    scene.mesh_registry_mut().register("General", "cube.mesh", Aabb::cube(1.0));
    let root = scene.root_scene_node();

    let parent = scene.create_child_scene_node(root).unwrap();
    let own = scene.create_entity("parent", "cube.mesh", "General").unwrap();
    scene.attach_object(parent, own).unwrap();

    let child = scene.create_child_scene_node(parent).unwrap();
    let grandchild = scene.create_child_scene_node(child).unwrap();
    for (node, name) in [(child, "child"), (grandchild, "grandchild")] {
        let entity = scene.create_entity(name, "cube.mesh", "General").unwrap();
        scene.attach_object(node, entity).unwrap();
    }
    let sibling = scene.create_child_scene_node(root).unwrap();
    let other = scene.create_entity("sibling", "cube.mesh", "General").unwrap();
    scene.attach_object(sibling, other).unwrap();

    scene.remove_and_destroy_all_children(parent).unwrap();

    assert!(scene.node(parent).is_some());
    assert_eq!(scene.parent(parent).unwrap(), Some(root));
    assert!(scene.children(parent).unwrap().is_empty());
    assert_eq!(scene.attached_objects(parent).unwrap(), &[own]);
    assert!(scene.object(own).unwrap().is_attached());

    assert!(scene.node(child).is_none());
    assert!(scene.node(grandchild).is_none());
    assert!(scene.object_by_name(MovableType::Entity, "child").is_none());
    assert!(scene.object_by_name(MovableType::Entity, "grandchild").is_none());
    assert_eq!(scene.object_by_name(MovableType::Entity, "sibling"), Some(other));
    assert_eq!(scene.node_count(), 3);
    assert_eq!(scene.object_count(), 2);

    scene.update_scene_graph();
    let pairs = scene.create_intersection_query().execute(&scene);
    assert_eq!(pairs, vec![IntersectionPair { first: own, second: other }]);
}

#[test]
fn cloning_leaves_the_original_untouched() {
    let mut field = sphere_field();
    let scene = &mut field.scene;
    let original = field.origin_sphere;
    let before = scene.world_bounding_box(original).unwrap();

    let copy = scene.clone_object(original, "copy").unwrap();
    assert!(!scene.object(copy).unwrap().is_attached());

    let root = scene.root_scene_node();
    let node = scene
        .create_child_scene_node_at(root, Vec3::new(9000.0, 0.0, 0.0))
        .unwrap();
    scene.attach_object(node, copy).unwrap();

    assert_eq!(scene.world_bounding_box(original).unwrap(), before);
    assert_eq!(scene.object(original).unwrap().name(), "501");
    assert_eq!(
        scene.world_bounding_box(copy).unwrap().center(),
        Vec3::new(9000.0, 0.0, 0.0)
    );

    let duplicate = scene.clone_object(original, "copy");
    assert!(matches!(duplicate, Err(SceneError::DuplicateName { .. })));
}

#[test]
fn degenerate_ray_is_an_error() {
    let field = sphere_field();
    let query = RaySceneQuery::new(Ray::new(Vec3::new(0.0, 0.0, 500.0), Vec3::zeros()));
    assert!(matches!(query.execute(&field.scene), Err(SceneError::InvalidQuery(_))));
}

#[test]
fn configured_scene_gives_the_same_answer() {
    init_logging();
    let config = SceneConfig::from_toml_str(
        "[octree]\nmax_entities_per_node = 1\nmax_depth = 12\nmin_node_size = 10.0\n\n[ray_query]\nsort_by_distance = true\nmax_results = 1\n",
    )
    .unwrap();
    let mut scene = SceneManager::with_config(config).unwrap();
    scene.mesh_registry_mut().register("General", "sphere.mesh", Aabb::cube(100.0));
    let source = scene.create_entity("501", "sphere.mesh", "General").unwrap();
    let root = scene.root_scene_node();
    let node = scene.create_child_scene_node(root).unwrap();
    scene.attach_object(node, source).unwrap();
    let mut rng = MinStdRand::new();
    scatter_clones(
        &mut scene,
        source,
        500,
        Vec3::new(-2500.0, -2500.0, -2500.0),
        Vec3::new(2500.0, 2500.0, 2500.0),
        &mut rng,
    )
    .unwrap();
    scene.update_scene_graph();

    assert_eq!(scene.create_intersection_query().execute(&scene).len(), EXPECTED_PAIRS.len());

    let ray = Ray::new(Vec3::new(0.0, 0.0, 500.0), Vec3::new(0.0, 0.0, -1.0));
    let hits = scene.create_ray_query(ray).execute(&scene).unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].object, source);
    assert_relative_eq!(hits[0].distance, 400.0, epsilon = 1e-2);
}
