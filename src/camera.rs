use glam::{Mat4, Vec2, Vec3};

#[derive(Debug, Clone)]
pub struct Camera {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    /// Vertical field of view in degrees.
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
}

impl Camera {
    pub fn new(eye: Vec3, target: Vec3) -> Self {
        Self {
            eye,
            target,
            up: Vec3::Y,
            fov_degrees: 30.0,
            near: 1.0,
            far: 1000.0,
        }
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.up)
    }

    /// A zero height is treated as one pixel so the aspect ratio stays finite.
    pub fn projection_matrix(&self, resolution: Vec2) -> Mat4 {
        let aspect = resolution.x / resolution.y.max(1.0);
        Mat4::perspective_rh_gl(self.fov_degrees.to_radians(), aspect, self.near, self.far)
    }

    pub fn get_vp_matrix(&self, resolution: Vec2) -> Mat4 {
        self.projection_matrix(resolution) * self.view_matrix()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn eye_maps_to_view_origin() {
        let camera = Camera::new(Vec3::new(0.0, 30.0, 80.0), Vec3::ZERO);
        let eye = camera.view_matrix().transform_point3(camera.eye);
        assert_abs_diff_eq!(eye, Vec3::ZERO, epsilon = 1e-4);
    }

    #[test]
    fn zero_height_resolution_stays_finite() {
        let camera = Camera::new(Vec3::Z * 10.0, Vec3::ZERO);
        assert!(camera.projection_matrix(Vec2::new(800.0, 0.0)).is_finite());
    }
}
