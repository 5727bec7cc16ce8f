use glam::Vec2;

use lightgraph::{DrawStats, RenderBackend, ShadingMode};

use crate::demo::DemoState;

#[derive(Debug, Default, Clone, Copy)]
pub struct FrameStats {
    pub shadow: DrawStats,
    pub lit: DrawStats,
}

/// Renders one frame: depth from the spotlight's point of view, then the lit scene from the
/// camera.
pub fn render_frame<B: RenderBackend + ?Sized>(
    state: &mut DemoState,
    time: f32,
    resolution: Vec2,
    backend: &mut B,
) -> anyhow::Result<FrameStats> {
    state.update(time)?;
    state.root.update()?;

    let light = state.animated_spotlight.clone();
    let shadow_fov = state.root.config().shadow_fov_degrees;

    state.root.set_light_view_mat(light.view_matrix());
    state
        .root
        .set_light_projection_mat(light.projection_matrix(shadow_fov));
    let shadow = state
        .root
        .draw(ShadingMode::ShadowDepth, &state.meshes, backend)?;

    state.root.set_view_mat(state.camera.view_matrix());
    state
        .root
        .set_projection_mat(state.camera.projection_matrix(resolution));
    state.root.set_active_spotlight(Some(light));
    let lit = state.root.draw(ShadingMode::Spot, &state.meshes, backend)?;

    Ok(FrameStats { shadow, lit })
}
