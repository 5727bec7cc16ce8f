use approx::assert_abs_diff_eq;
use glam::{Mat4, Quat, Vec3};

use lightgraph::backend::{MeshHandle, RecordingBackend};
use lightgraph::camera::Camera;
use lightgraph::light::SpotLight;
use lightgraph::mesh::{Material, Mesh, MeshLibrary, Submesh};
use lightgraph::scene_graph::{NodeId, Root};
use lightgraph::shaders::{ShadingMode, UniformAllocator};

struct Scene {
    root: Root,
    meshes: MeshLibrary,
    world: NodeId,
}

/// root -> world -> group -> [big -> sphere_a, moved -> sphere_b]
fn build_scene() -> Scene {
    let mut meshes = MeshLibrary::new();
    let sphere = meshes.add_mesh(
        Mesh::new("sphere", MeshHandle(1))
            .with_material(Material::new("white", Vec3::ONE))
            .with_element(Submesh::new(0, 0, 80)),
    );

    let mut root = Root::new();
    root.set_shaders(UniformAllocator::new().full_set());

    let world = root.create_transform("world");
    let group = root.create_group("spheres");
    let big = root.create_transform("big");
    let moved = root.create_transform("moved");
    let sphere_a = root.create_geometry("sphere_a", Some(sphere));
    let sphere_b = root.create_geometry("sphere_b", Some(sphere));

    // Attached bottom-up on purpose; init still sees the finished tree.
    root.add_child(big, sphere_a).unwrap();
    root.add_child(moved, sphere_b).unwrap();
    root.add_child(group, big).unwrap();
    root.add_child(group, moved).unwrap();
    root.add_child(world, group).unwrap();
    root.add_child(root.id(), world).unwrap();

    root.transform_mut(world).unwrap().set_rotation(30.0, 0.0, 1.0, 0.0);
    root.transform_mut(world)
        .unwrap()
        .set_translation(0.0, -10.0, 0.0);
    root.transform_mut(big).unwrap().set_scale(3.0, 3.0, 3.0);

    let moved_transform = root.transform_mut(moved).unwrap();
    moved_transform.set_translation(10.0, 2.0, 0.0);
    moved_transform.set_rotation(45.0, 0.0, 0.0, 1.0);
    moved_transform.set_scale(1.2, 1.2, 1.2);

    root.init().unwrap();

    Scene {
        root,
        meshes,
        world,
    }
}

#[test]
fn sibling_leaves_compose_with_the_shared_parent_chain() {
    let mut scene = build_scene();
    let camera = Camera::new(Vec3::new(0.0, 30.0, 80.0), Vec3::ZERO);
    scene.root.set_view_mat(camera.view_matrix());
    scene
        .root
        .set_projection_mat(camera.projection_matrix(glam::Vec2::new(800.0, 600.0)));

    let mut backend = RecordingBackend::new();
    scene
        .root
        .draw(ShadingMode::Unlit, &scene.meshes, &mut backend)
        .unwrap();

    let basic = scene.root.shaders().basic.unwrap();
    let models = backend.mat4_uploads(basic.mvp.m);
    assert_eq!(models.len(), 2);

    let parent_chain = Mat4::from_translation(Vec3::new(0.0, -10.0, 0.0))
        * Mat4::from_rotation_y(30f32.to_radians());
    let expected_a = parent_chain * Mat4::from_scale(Vec3::splat(3.0));
    let expected_b = parent_chain
        * Mat4::from_translation(Vec3::new(10.0, 2.0, 0.0))
        * Mat4::from_quat(Quat::from_rotation_z(45f32.to_radians()))
        * Mat4::from_scale(Vec3::splat(1.2));

    assert_abs_diff_eq!(models[0], expected_a, epsilon = 1e-5);
    assert_abs_diff_eq!(models[1], expected_b, epsilon = 1e-5);

    // Both leaves share the parent chain, so only the local part tells them apart.
    let local_b = parent_chain.inverse() * models[1];
    assert_abs_diff_eq!(
        local_b.transform_point3(Vec3::ZERO),
        Vec3::new(10.0, 2.0, 0.0),
        epsilon = 1e-4
    );

    assert_eq!(
        backend.mat4_uploads(basic.mvp.v),
        vec![camera.view_matrix(); 2]
    );
}

#[test]
fn drawing_twice_with_the_same_state_repeats_the_same_calls() {
    let mut scene = build_scene();
    let light = SpotLight::new("spot", Vec3::new(60.0, 30.0, 0.0), Vec3::ZERO, Vec3::ONE);
    scene.root.set_view_mat(Mat4::look_at_rh(
        Vec3::new(0.0, 100.0, 170.0),
        Vec3::ZERO,
        Vec3::Y,
    ));
    scene.root.set_light_view_mat(light.view_matrix());
    scene
        .root
        .set_light_projection_mat(light.projection_matrix(90.0));
    scene.root.set_active_spotlight(Some(light));

    let mut first = RecordingBackend::new();
    let mut second = RecordingBackend::new();
    let stats_first = scene
        .root
        .draw(ShadingMode::Spot, &scene.meshes, &mut first)
        .unwrap();
    let stats_second = scene
        .root
        .draw(ShadingMode::Spot, &scene.meshes, &mut second)
        .unwrap();

    assert!(!first.calls.is_empty());
    assert_eq!(first.calls, second.calls);
    assert_eq!(stats_first, stats_second);
    assert_eq!(stats_first.draw_calls, 2);
}

#[test]
fn additive_light_passes_reuse_geometry_with_different_lights() {
    let mut scene = build_scene();
    let red = SpotLight::new(
        "red",
        Vec3::new(20.0, 20.0, 0.0),
        Vec3::ZERO,
        Vec3::new(1.0, 0.0, 0.0),
    );
    let blue = SpotLight::new(
        "blue",
        Vec3::new(-20.0, 20.0, 0.0),
        Vec3::ZERO,
        Vec3::new(0.0, 0.0, 1.0),
    );

    let mut backend = RecordingBackend::new();
    scene.root.set_ambient_light_color(Vec3::splat(0.1));
    scene
        .root
        .draw(ShadingMode::Ambient, &scene.meshes, &mut backend)
        .unwrap();

    for light in [red, blue] {
        scene.root.set_active_spotlight(Some(light));
        scene
            .root
            .draw(ShadingMode::Spot, &scene.meshes, &mut backend)
            .unwrap();
    }

    let spot = scene.root.shaders().spot.unwrap();
    assert_eq!(
        backend.vec3_uploads(spot.light_color),
        vec![
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 0.0, 1.0),
            Vec3::new(0.0, 0.0, 1.0),
        ]
    );

    let ambient = scene.root.shaders().ambient.unwrap();
    assert_eq!(
        backend.mat4_uploads(ambient.mvp.m),
        backend.mat4_uploads(spot.mvp.m)[..2].to_vec()
    );
}

#[test]
fn transforms_can_change_between_frames() {
    let mut scene = build_scene();
    let world = scene.world;
    let basic = scene.root.shaders().basic.unwrap();

    let mut before = RecordingBackend::new();
    scene
        .root
        .draw(ShadingMode::Unlit, &scene.meshes, &mut before)
        .unwrap();

    scene
        .root
        .transform_mut(world)
        .unwrap()
        .set_translation(0.0, 0.0, 0.0);

    let mut after = RecordingBackend::new();
    scene
        .root
        .draw(ShadingMode::Unlit, &scene.meshes, &mut after)
        .unwrap();

    let before_origin = before.mat4_uploads(basic.mvp.m)[0].w_axis;
    let after_origin = after.mat4_uploads(basic.mvp.m)[0].w_axis;
    let shift = after_origin - before_origin;
    assert_abs_diff_eq!(shift.y, 10.0, epsilon = 1e-5);
}
