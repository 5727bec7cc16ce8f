//! Draw routines of a geometry leaf, one per [`ShadingMode`].
//!
//! Every routine follows the same shape: pick the program, upload the per-object uniforms, bind
//! the mesh, then walk the submeshes and issue one ranged draw per non-empty element.

use glam::{Mat4, Vec4};

use crate::backend::{PrimitiveType, RenderBackend, TextureHandle};
use crate::config::SceneConfig;
use crate::frame_context::FrameContext;
use crate::mesh::{Material, Mesh};
use crate::shaders::{MvpUniforms, ShaderSet, ShadingMode, TextureSlot};

/// Everything a geometry leaf reads besides its own mesh and world matrix.
#[derive(Clone, Copy)]
pub struct DrawEnv<'a> {
    pub context: &'a FrameContext,
    pub shaders: &'a ShaderSet,
    pub config: &'a SceneConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    NoMesh,
    MissingShader,
    MissingLight,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeometryOutcome {
    /// Number of ranged draws issued.
    Drawn(usize),
    Skipped(SkipReason),
}

/// Inverse-transpose of the model-view matrix; carries normals into eye space under
/// non-uniform scale.
pub fn normal_matrix(view: &Mat4, model: &Mat4) -> Mat4 {
    let model_view = *view * *model;
    model_view.transpose().inverse()
}

pub fn draw_geometry<B: RenderBackend + ?Sized>(
    mesh: &Mesh,
    model: &Mat4,
    mode: ShadingMode,
    env: &DrawEnv,
    backend: &mut B,
) -> GeometryOutcome {
    match mode {
        ShadingMode::Unlit => draw_unlit(mesh, model, env, backend),
        ShadingMode::Ambient => draw_ambient(mesh, model, env, backend),
        ShadingMode::Directional => draw_directional(mesh, model, env, backend),
        ShadingMode::Omni => draw_omni(mesh, model, env, backend),
        ShadingMode::Spot => draw_spot(mesh, model, env, backend),
        ShadingMode::ShadowDepth => draw_shadow_depth(mesh, model, env, backend),
    }
}

fn upload_mvp<B: RenderBackend + ?Sized>(
    backend: &mut B,
    uniforms: &MvpUniforms,
    model: &Mat4,
    context: &FrameContext,
) {
    backend.set_uniform_mat4(uniforms.m, model);
    backend.set_uniform_mat4(uniforms.v, &context.view);
    backend.set_uniform_mat4(uniforms.p, &context.projection);
}

fn material_color(material: &Material) -> Vec4 {
    material.diffuse.extend(material.opacity)
}

fn bind_slot<B: RenderBackend + ?Sized>(
    backend: &mut B,
    slot: &TextureSlot,
    unit: u32,
    texture: Option<TextureHandle>,
) {
    if texture.is_some() {
        backend.bind_texture(unit, texture);
    }
    backend.set_uniform_i32(slot.sampler, unit as i32);
    backend.set_uniform_i32(slot.has_sampler, i32::from(texture.is_some()));
}

/// Walks the non-empty submeshes, handing each material to `per_material` before its draw and
/// clearing `unbind_after` once the draw is issued.
fn draw_elements<B, F>(
    mesh: &Mesh,
    backend: &mut B,
    unbind_after: &[u32],
    mut per_material: F,
) -> usize
where
    B: RenderBackend + ?Sized,
    F: FnMut(&mut B, &Material),
{
    let fallback = Material::default();
    let mut draws = 0;

    backend.bind_mesh(mesh.buffer);

    for (element, material) in mesh.drawable_elements() {
        let material = material.unwrap_or_else(|| {
            log::debug!(
                "mesh '{}': material {} out of range, using default",
                mesh.name,
                element.material_index
            );
            &fallback
        });

        per_material(backend, material);
        backend.draw_indexed_range(
            PrimitiveType::Triangles,
            element.start_index,
            element.index_count(),
        );
        for unit in unbind_after {
            backend.bind_texture(*unit, None);
        }
        draws += 1;
    }

    draws
}

fn units_to_clear(config: &SceneConfig, units: &[u32]) -> Vec<u32> {
    if config.unbind_textures_after_submesh {
        units.to_vec()
    } else {
        Vec::new()
    }
}

fn draw_unlit<B: RenderBackend + ?Sized>(
    mesh: &Mesh,
    model: &Mat4,
    env: &DrawEnv,
    backend: &mut B,
) -> GeometryOutcome {
    let Some(shader) = env.shaders.basic else {
        return GeometryOutcome::Skipped(SkipReason::MissingShader);
    };
    let units = env.config.texture_units;

    backend.use_shader_program(shader.program);
    upload_mvp(backend, &shader.mvp, model, env.context);

    let clear = units_to_clear(env.config, &[units.diffuse]);

    let draws = draw_elements(mesh, backend, &clear, |backend, material| {
        backend.set_uniform_vec4(shader.material_color, material_color(material));
        bind_slot(backend, &shader.diffuse, units.diffuse, material.textures.diffuse);
    });

    GeometryOutcome::Drawn(draws)
}

fn draw_ambient<B: RenderBackend + ?Sized>(
    mesh: &Mesh,
    model: &Mat4,
    env: &DrawEnv,
    backend: &mut B,
) -> GeometryOutcome {
    let Some(shader) = env.shaders.ambient else {
        return GeometryOutcome::Skipped(SkipReason::MissingShader);
    };
    let units = env.config.texture_units;

    backend.use_shader_program(shader.program);
    upload_mvp(backend, &shader.mvp, model, env.context);
    backend.set_uniform_vec3(shader.ambient_light_color, env.context.ambient_light_color);

    let clear = units_to_clear(env.config, &[units.diffuse]);

    let draws = draw_elements(mesh, backend, &clear, |backend, material| {
        backend.set_uniform_vec4(shader.material_color, material_color(material));
        bind_slot(backend, &shader.diffuse, units.diffuse, material.textures.diffuse);
    });

    GeometryOutcome::Drawn(draws)
}

fn draw_directional<B: RenderBackend + ?Sized>(
    mesh: &Mesh,
    model: &Mat4,
    env: &DrawEnv,
    backend: &mut B,
) -> GeometryOutcome {
    let Some(light) = env.context.directional_light.as_ref() else {
        return GeometryOutcome::Skipped(SkipReason::MissingLight);
    };
    let Some(shader) = env.shaders.directional else {
        return GeometryOutcome::Skipped(SkipReason::MissingShader);
    };
    let view = env.context.view;

    backend.use_shader_program(shader.program);
    upload_mvp(backend, &shader.mvp, model, env.context);
    backend.set_uniform_mat4(shader.normal_matrix_ecs, &normal_matrix(&view, model));

    let direction_ecs = (view * light.direction_h()).truncate().normalize_or_zero();
    backend.set_uniform_vec3(shader.light_direction_ecs, direction_ecs);
    backend.set_uniform_vec3(shader.light_color, light.color);

    let draws = draw_elements(mesh, backend, &[], |backend, material| {
        backend.set_uniform_vec4(shader.material_color, material_color(material));
    });

    GeometryOutcome::Drawn(draws)
}

fn draw_omni<B: RenderBackend + ?Sized>(
    mesh: &Mesh,
    model: &Mat4,
    env: &DrawEnv,
    backend: &mut B,
) -> GeometryOutcome {
    let Some(light) = env.context.omni_light.as_ref() else {
        return GeometryOutcome::Skipped(SkipReason::MissingLight);
    };
    let Some(shader) = env.shaders.omni else {
        return GeometryOutcome::Skipped(SkipReason::MissingShader);
    };
    let view = env.context.view;

    backend.use_shader_program(shader.program);
    upload_mvp(backend, &shader.mvp, model, env.context);
    backend.set_uniform_mat4(shader.normal_matrix_ecs, &normal_matrix(&view, model));

    let position_ecs = view.transform_point3(light.position);
    backend.set_uniform_vec3(shader.light_position_ecs, position_ecs);
    backend.set_uniform_vec3(shader.light_color, light.color);

    let draws = draw_elements(mesh, backend, &[], |backend, material| {
        backend.set_uniform_vec4(shader.material_color, material_color(material));
    });

    GeometryOutcome::Drawn(draws)
}

fn draw_spot<B: RenderBackend + ?Sized>(
    mesh: &Mesh,
    model: &Mat4,
    env: &DrawEnv,
    backend: &mut B,
) -> GeometryOutcome {
    let Some(light) = env.context.spotlight.as_ref() else {
        return GeometryOutcome::Skipped(SkipReason::MissingLight);
    };
    let Some(shader) = env.shaders.spot else {
        return GeometryOutcome::Skipped(SkipReason::MissingShader);
    };
    let view = env.context.view;
    let units = env.config.texture_units;

    backend.use_shader_program(shader.program);
    upload_mvp(backend, &shader.mvp, model, env.context);
    backend.set_uniform_mat4(shader.normal_matrix_ecs, &normal_matrix(&view, model));

    let position_ecs = view.transform_point3(light.position);
    let target_ecs = view.transform_point3(light.target);
    let direction_ecs = (target_ecs - position_ecs).normalize_or_zero();
    backend.set_uniform_vec3(shader.light_position_ecs, position_ecs);
    backend.set_uniform_vec3(shader.light_direction_ecs, direction_ecs);
    backend.set_uniform_vec3(shader.light_color, light.color);

    backend.set_uniform_mat4(
        shader.light_view_projection,
        &env.context.light_view_projection(),
    );
    backend.set_uniform_mat4(shader.view_inverse, &view.inverse());

    // Shared by every submesh.
    backend.bind_texture(units.shadow_map, light.shadow_map);
    backend.set_uniform_i32(shader.sampler_shadow_map, units.shadow_map as i32);

    let clear = units_to_clear(
        env.config,
        &[units.diffuse, units.normal, units.specular, units.emission],
    );

    let draws = draw_elements(mesh, backend, &clear, |backend, material| {
        backend.set_uniform_vec4(shader.material_color, material_color(material));

        let textures = &material.textures;
        bind_slot(backend, &shader.diffuse, units.diffuse, textures.diffuse);
        bind_slot(backend, &shader.normal, units.normal, textures.normal);
        bind_slot(backend, &shader.specular, units.specular, textures.specular);
        bind_slot(backend, &shader.emission, units.emission, textures.emission);
    });

    GeometryOutcome::Drawn(draws)
}

fn draw_shadow_depth<B: RenderBackend + ?Sized>(
    mesh: &Mesh,
    model: &Mat4,
    env: &DrawEnv,
    backend: &mut B,
) -> GeometryOutcome {
    let Some(shader) = env.shaders.shadow_map else {
        return GeometryOutcome::Skipped(SkipReason::MissingShader);
    };

    // object -> world -> light -> clip
    let mvp = env.context.light_view_projection() * *model;

    backend.use_shader_program(shader.program);
    backend.set_uniform_mat4(shader.mvp, &mvp);

    let draws = draw_elements(mesh, backend, &[], |_, _| {});

    GeometryOutcome::Drawn(draws)
}
