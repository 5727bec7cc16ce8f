use glam::{Mat4, Vec3, Vec4};

use crate::backend::TextureHandle;

/// Light arriving from a fixed world-space direction.
#[derive(Debug, Clone, PartialEq)]
pub struct DirectionalLight {
    pub name: String,
    pub color: Vec3,
    /// World-space direction the light travels in.
    pub direction: Vec3,
}

impl DirectionalLight {
    pub fn new(name: impl Into<String>, direction: Vec3, color: Vec3) -> Self {
        Self {
            name: name.into(),
            color,
            direction,
        }
    }

    /// Homogeneous form (w = 0) so the view matrix ignores its translation.
    pub fn direction_h(&self) -> Vec4 {
        self.direction.extend(0.0)
    }
}

impl Default for DirectionalLight {
    fn default() -> Self {
        Self::new("directional", Vec3::NEG_Y, Vec3::ONE)
    }
}

/// Point light radiating in every direction.
#[derive(Debug, Clone, PartialEq)]
pub struct OmniLight {
    pub name: String,
    pub color: Vec3,
    pub position: Vec3,
}

impl OmniLight {
    pub fn new(name: impl Into<String>, position: Vec3, color: Vec3) -> Self {
        Self {
            name: name.into(),
            color,
            position,
        }
    }
}

impl Default for OmniLight {
    fn default() -> Self {
        Self::new("omni", Vec3::new(0.0, 10.0, 0.0), Vec3::ONE)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SpotLight {
    pub name: String,
    pub color: Vec3,
    pub position: Vec3,
    pub target: Vec3,
    pub near_range: f32,
    pub far_range: f32,
    /// Cone opening in degrees.
    pub aperture: f32,
    /// Depth texture rendered by the shadow pass, sampled by the lit pass.
    pub shadow_map: Option<TextureHandle>,
}

impl SpotLight {
    pub fn new(name: impl Into<String>, position: Vec3, target: Vec3, color: Vec3) -> Self {
        Self {
            name: name.into(),
            color,
            position,
            target,
            near_range: 1.0,
            far_range: 100.0,
            aperture: 30.0,
            shadow_map: None,
        }
    }

    pub fn direction(&self) -> Vec3 {
        (self.target - self.position).normalize_or_zero()
    }

    /// World-to-light matrix. A light pointing straight up or down would make the usual Y up
    /// vector degenerate, so Z is used instead.
    pub fn view_matrix(&self) -> Mat4 {
        let direction = self.direction();
        let up = if direction.z.abs() < 0.001 && direction.x.abs() < 0.001 {
            Vec3::Z
        } else {
            Vec3::Y
        };

        Mat4::look_at_rh(self.position, self.target, up)
    }

    /// Square perspective frustum covering `[near_range, far_range]`.
    pub fn projection_matrix(&self, fov_degrees: f32) -> Mat4 {
        Mat4::perspective_rh_gl(
            fov_degrees.to_radians(),
            1.0,
            self.near_range,
            self.far_range,
        )
    }

    /// Copy of this light with position and target moved by `matrix`.
    pub fn transformed(&self, matrix: &Mat4) -> SpotLight {
        SpotLight {
            position: matrix.transform_point3(self.position),
            target: matrix.transform_point3(self.target),
            ..self.clone()
        }
    }
}

impl Default for SpotLight {
    fn default() -> Self {
        Self::new("spotlight", Vec3::new(0.0, 10.0, 0.0), Vec3::ZERO, Vec3::ONE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn spot_view_matrix_maps_position_to_origin() {
        let light = SpotLight::new("key", Vec3::new(5.0, 20.0, 3.0), Vec3::ZERO, Vec3::ONE);
        let origin = light.view_matrix().transform_point3(light.position);
        assert_abs_diff_eq!(origin, Vec3::ZERO, epsilon = 1e-4);
    }

    #[test]
    fn spot_view_matrix_handles_vertical_light() {
        let light = SpotLight::default();
        let view = light.view_matrix();
        assert!(view.is_finite());

        // The target lies straight ahead on -Z in light space.
        let target = view.transform_point3(light.target);
        assert_abs_diff_eq!(target, Vec3::new(0.0, 0.0, -10.0), epsilon = 1e-4);
    }

    #[test]
    fn transformed_moves_position_and_target() {
        let light = SpotLight::new("key", Vec3::new(1.0, 0.0, 0.0), Vec3::ZERO, Vec3::ONE);
        let moved = light.transformed(&Mat4::from_translation(Vec3::new(0.0, 2.0, 0.0)));

        assert_eq!(moved.position, Vec3::new(1.0, 2.0, 0.0));
        assert_eq!(moved.target, Vec3::new(0.0, 2.0, 0.0));
        assert_eq!(moved.color, light.color);
    }

    #[test]
    fn directional_light_is_a_vector() {
        let light = DirectionalLight::default();
        assert_eq!(light.direction_h(), Vec4::new(0.0, -1.0, 0.0, 0.0));
    }
}
