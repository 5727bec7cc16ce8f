use glam::{Mat4, Vec3};

use crate::light::{DirectionalLight, OmniLight, SpotLight};

/// Camera and light state for one draw call over the tree.
///
/// Written by the frame driver before traversal and only read while the tree is drawn.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameContext {
    pub view: Mat4,
    pub projection: Mat4,
    pub light_view: Mat4,
    pub light_projection: Mat4,
    pub ambient_light_color: Vec3,
    pub directional_light: Option<DirectionalLight>,
    pub omni_light: Option<OmniLight>,
    pub spotlight: Option<SpotLight>,
}

impl FrameContext {
    pub fn new(view: Mat4, projection: Mat4) -> Self {
        Self {
            view,
            projection,
            ..Default::default()
        }
    }

    pub fn light_view_projection(&self) -> Mat4 {
        self.light_projection * self.light_view
    }
}

impl Default for FrameContext {
    fn default() -> Self {
        Self {
            view: Mat4::IDENTITY,
            projection: Mat4::IDENTITY,
            light_view: Mat4::IDENTITY,
            light_projection: Mat4::IDENTITY,
            ambient_light_color: Vec3::ZERO,
            directional_light: None,
            omni_light: None,
            spotlight: None,
        }
    }
}
