use anyhow::Context;
use glam::{Mat4, Vec3};

use lightgraph::backend::{MeshHandle, TextureHandle};
use lightgraph::camera::Camera;
use lightgraph::light::SpotLight;
use lightgraph::mesh::{Material, MaterialTextures, Mesh, MeshLibrary, Submesh};
use lightgraph::scene_graph::{NodeId, Root};
use lightgraph::shaders::UniformAllocator;
use lightgraph::SceneConfig;

/// Degrees the spotlight travels around the Y axis per second.
const LIGHT_DEGREES_PER_SECOND: f32 = 24.0;

/// Two spheres over a ground plane, lit by one orbiting spotlight.
pub struct DemoState {
    pub camera: Camera,
    pub root: Root,
    pub meshes: MeshLibrary,
    pub spotlight: SpotLight,
    /// Spotlight as placed for the current frame.
    pub animated_spotlight: SpotLight,
    world: NodeId,
}

impl DemoState {
    pub fn new(config: SceneConfig) -> anyhow::Result<Self> {
        let camera = Camera::new(Vec3::new(0.0, 30.0, 80.0), Vec3::ZERO);

        let mut meshes = MeshLibrary::new();
        meshes.add_mesh(
            Mesh::new("sphere", MeshHandle(1))
                .with_material(Material::new("orange", Vec3::new(0.9, 0.5, 0.1)))
                .with_element(Submesh::new(0, 0, 960)),
        );
        meshes.add_mesh(
            Mesh::new("plane", MeshHandle(2))
                .with_material(
                    Material::new("tiles", Vec3::ONE).with_textures(MaterialTextures {
                        diffuse: Some(TextureHandle(1)),
                        normal: Some(TextureHandle(2)),
                        ..Default::default()
                    }),
                )
                .with_element(Submesh::new(0, 0, 2)),
        );

        let sphere = meshes
            .get_mesh_by_name("sphere")
            .context("sphere mesh not registered")?;
        let plane = meshes
            .get_mesh_by_name("plane")
            .context("plane mesh not registered")?;

        let mut root = Root::with_config(config);
        root.set_shaders(UniformAllocator::new().full_set());

        let world = root.create_transform("world");
        let ground_transform = root.create_transform("ground_transform");
        let ground = root.create_geometry("ground", Some(plane));
        let spheres = root.create_group("spheres");
        let sphere1_transform = root.create_transform("sphere1_transform");
        let sphere1 = root.create_geometry("sphere1", Some(sphere));
        let sphere2_transform = root.create_transform("sphere2_transform");
        let sphere2 = root.create_geometry("sphere2", Some(sphere));

        root.add_child(root.id(), world)?;
        root.add_child(world, ground_transform)?;
        root.add_child(ground_transform, ground)?;
        root.add_child(world, spheres)?;
        root.add_child(spheres, sphere1_transform)?;
        root.add_child(sphere1_transform, sphere1)?;
        root.add_child(spheres, sphere2_transform)?;
        root.add_child(sphere2_transform, sphere2)?;

        root.init()?;

        root.transform_mut(ground_transform)
            .context("ground transform missing")?
            .set_translation(0.0, -10.0, 0.0);

        for (id, x) in [(sphere1_transform, -10.0), (sphere2_transform, 10.0)] {
            let transform = root.transform_mut(id).context("sphere transform missing")?;
            transform.set_scale(3.0, 3.0, 3.0);
            transform.set_translation(x, 0.0, 0.0);
        }

        let mut spotlight = SpotLight::new(
            "spotlight",
            Vec3::new(5.0, 20.0, 0.0),
            Vec3::ZERO,
            Vec3::new(1.0, 0.57, 0.16),
        );
        spotlight.aperture = 60.0;
        spotlight.shadow_map = Some(TextureHandle(100));

        Ok(Self {
            camera,
            root,
            meshes,
            animated_spotlight: spotlight.clone(),
            spotlight,
            world,
        })
    }

    /// Advances the animation to `time` seconds since start.
    pub fn update(&mut self, time: f32) -> anyhow::Result<()> {
        let light_angle = (time * LIGHT_DEGREES_PER_SECOND) % 360.0;
        self.animated_spotlight = self
            .spotlight
            .transformed(&Mat4::from_rotation_y(light_angle.to_radians()));

        self.root
            .transform_mut(self.world)
            .context("world transform missing")?
            .set_rotation(time.sin() * 10.0, 0.0, 1.0, 0.0);

        Ok(())
    }
}
