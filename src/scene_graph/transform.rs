use glam::{Mat4, Quat, Vec3};
use std::cell::{Cell, Ref, RefCell};

/// Local placement of a node: `T * R * S`, translation outermost.
///
/// The rotation is set in degrees and kept in radians. The composed matrix is cached and only
/// rebuilt after one of the setters has run.
#[derive(Debug, Clone)]
pub struct Transform {
    translation: Vec3,
    rotation_angle: f32,
    rotation_axis: Vec3,
    scale: Vec3,

    local_matrix: RefCell<Mat4>,
    local_dirty: Cell<bool>,
}

impl Transform {
    pub fn from_translation(translation: Vec3) -> Self {
        Self {
            translation,
            rotation_angle: 0.0,
            rotation_axis: Vec3::Y,
            scale: Vec3::ONE,
            local_matrix: RefCell::new(Mat4::IDENTITY),
            local_dirty: Cell::new(true),
        }
    }

    pub fn set_scale(&mut self, x: f32, y: f32, z: f32) {
        self.scale = Vec3::new(x, y, z);
        self.invalidate_local();
    }

    /// Rotation of `angle_degrees` about `(axis_x, axis_y, axis_z)`. The axis does not need to
    /// be normalized; a zero axis yields no rotation.
    pub fn set_rotation(&mut self, angle_degrees: f32, axis_x: f32, axis_y: f32, axis_z: f32) {
        self.rotation_angle = angle_degrees.to_radians();
        self.rotation_axis = Vec3::new(axis_x, axis_y, axis_z);
        self.invalidate_local();
    }

    pub fn set_translation(&mut self, x: f32, y: f32, z: f32) {
        self.translation = Vec3::new(x, y, z);
        self.invalidate_local();
    }

    pub fn get_local_matrix(&self) -> Ref<Mat4> {
        if self.local_dirty.get() {
            let matrix =
                Mat4::from_scale_rotation_translation(self.scale, self.rotation(), self.translation);

            self.local_matrix.replace(matrix);
            self.local_dirty.set(false);
        }

        self.local_matrix.borrow()
    }

    pub fn invalidate_local(&self) {
        self.local_dirty.set(true);
    }

    pub fn is_local_dirty(&self) -> bool {
        self.local_dirty.get()
    }

    pub fn translation(&self) -> Vec3 {
        self.translation
    }

    pub fn rotation(&self) -> Quat {
        match self.rotation_axis.try_normalize() {
            Some(axis) => Quat::from_axis_angle(axis, self.rotation_angle),
            None => Quat::IDENTITY,
        }
    }

    /// Rotation angle in radians.
    pub fn rotation_angle(&self) -> f32 {
        self.rotation_angle
    }

    pub fn rotation_axis(&self) -> Vec3 {
        self.rotation_axis
    }

    pub fn scale(&self) -> Vec3 {
        self.scale
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::from_translation(Vec3::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn default_is_identity() {
        let transform = Transform::default();
        assert_eq!(*transform.get_local_matrix(), Mat4::IDENTITY);
    }

    #[test]
    fn local_matrix_is_translate_rotate_scale() {
        let mut transform = Transform::default();
        transform.set_scale(2.0, 3.0, 4.0);
        transform.set_rotation(90.0, 0.0, 0.0, 1.0);
        transform.set_translation(1.0, -2.0, 5.0);

        let t = Mat4::from_translation(Vec3::new(1.0, -2.0, 5.0));
        let r = Mat4::from_rotation_z(90f32.to_radians());
        let s = Mat4::from_scale(Vec3::new(2.0, 3.0, 4.0));

        assert_abs_diff_eq!(*transform.get_local_matrix(), t * r * s, epsilon = 1e-5);
    }

    #[test]
    fn unnormalized_axis_is_normalized() {
        let mut a = Transform::default();
        a.set_rotation(45.0, 0.0, 10.0, 0.0);
        let mut b = Transform::default();
        b.set_rotation(45.0, 0.0, 1.0, 0.0);

        assert_abs_diff_eq!(*a.get_local_matrix(), *b.get_local_matrix(), epsilon = 1e-6);
    }

    #[test]
    fn zero_axis_means_no_rotation() {
        let mut transform = Transform::default();
        transform.set_rotation(30.0, 0.0, 0.0, 0.0);
        assert_eq!(*transform.get_local_matrix(), Mat4::IDENTITY);
    }

    #[test]
    fn setters_invalidate_cache() {
        let mut transform = Transform::default();
        let _ = transform.get_local_matrix();
        assert!(!transform.is_local_dirty());

        transform.set_translation(0.0, 1.0, 0.0);
        assert!(transform.is_local_dirty());
        assert_eq!(
            *transform.get_local_matrix(),
            Mat4::from_translation(Vec3::Y)
        );
        assert!(!transform.is_local_dirty());
    }

    #[test]
    fn angle_is_stored_in_radians() {
        let mut transform = Transform::default();
        transform.set_rotation(180.0, 0.0, 1.0, 0.0);
        assert_abs_diff_eq!(transform.rotation_angle(), std::f32::consts::PI, epsilon = 1e-6);
    }
}
