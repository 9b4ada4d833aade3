//! Model transform composition
//!
//! A draw block positions its mesh with independent scale, rotation and
//! translation components. They are combined as `T * Rz * Ry * Rx * S`, so a
//! vertex is scaled first, then rotated about X, Y and Z in that order, then
//! translated.

use cgmath::{Deg, Matrix4, Vector3};

use super::shader::{uniforms, ShaderContext};

/// Scale, rotation (degrees about X, Y, Z) and translation for one draw.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransformSpec {
    pub scale: Vector3<f32>,
    pub rotation_degrees: Vector3<f32>,
    pub translation: Vector3<f32>,
}

impl Default for TransformSpec {
    fn default() -> Self {
        Self {
            scale: Vector3::new(1.0, 1.0, 1.0),
            rotation_degrees: Vector3::new(0.0, 0.0, 0.0),
            translation: Vector3::new(0.0, 0.0, 0.0),
        }
    }
}

impl TransformSpec {
    pub fn new(scale: Vector3<f32>, rotation_degrees: Vector3<f32>, translation: Vector3<f32>) -> Self {
        Self {
            scale,
            rotation_degrees,
            translation,
        }
    }

    pub fn with_scale(mut self, x: f32, y: f32, z: f32) -> Self {
        self.scale = Vector3::new(x, y, z);
        self
    }

    pub fn with_rotation(mut self, x_deg: f32, y_deg: f32, z_deg: f32) -> Self {
        self.rotation_degrees = Vector3::new(x_deg, y_deg, z_deg);
        self
    }

    pub fn with_translation(mut self, x: f32, y: f32, z: f32) -> Self {
        self.translation = Vector3::new(x, y, z);
        self
    }

    /// Model matrix `T * Rz * Ry * Rx * S`.
    ///
    /// Scale is passed through untouched; zero or negative factors are the
    /// caller's business.
    pub fn compose(&self) -> Matrix4<f32> {
        let scale = Matrix4::from_nonuniform_scale(self.scale.x, self.scale.y, self.scale.z);
        let rotation_x = Matrix4::from_angle_x(Deg(self.rotation_degrees.x));
        let rotation_y = Matrix4::from_angle_y(Deg(self.rotation_degrees.y));
        let rotation_z = Matrix4::from_angle_z(Deg(self.rotation_degrees.z));
        let translation = Matrix4::from_translation(self.translation);

        translation * rotation_z * rotation_y * rotation_x * scale
    }

    /// Composes the matrix and writes it to the `model` uniform.
    pub fn apply<S: ShaderContext + ?Sized>(&self, shader: &mut S) {
        shader.set_mat4(uniforms::MODEL, &self.compose());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::recording::RecordingShader;
    use cgmath::{SquareMatrix, Vector4};

    const EPSILON: f32 = 1e-5;

    fn assert_mat_close(a: Matrix4<f32>, b: Matrix4<f32>) {
        let a: [[f32; 4]; 4] = a.into();
        let b: [[f32; 4]; 4] = b.into();
        for col in 0..4 {
            for row in 0..4 {
                assert!(
                    (a[col][row] - b[col][row]).abs() < EPSILON,
                    "mismatch at [{}][{}]: {:?} vs {:?}",
                    col,
                    row,
                    a,
                    b
                );
            }
        }
    }

    fn assert_vec_close(a: Vector4<f32>, b: Vector4<f32>) {
        for i in 0..4 {
            assert!((a[i] - b[i]).abs() < EPSILON, "{:?} vs {:?}", a, b);
        }
    }

    #[test]
    fn test_default_is_identity() {
        assert_mat_close(TransformSpec::default().compose(), Matrix4::identity());
    }

    #[test]
    fn test_pure_scale() {
        let spec = TransformSpec::default().with_scale(2.0, 1.0, 1.0);
        assert_mat_close(spec.compose(), Matrix4::from_nonuniform_scale(2.0, 1.0, 1.0));
    }

    #[test]
    fn test_rotate_then_translate() {
        let spec = TransformSpec::default()
            .with_rotation(0.0, 90.0, 0.0)
            .with_translation(1.0, 0.0, 0.0);
        let expected =
            Matrix4::from_translation(Vector3::new(1.0, 0.0, 0.0)) * Matrix4::from_angle_y(Deg(90.0));
        assert_mat_close(spec.compose(), expected);
    }

    #[test]
    fn test_y_rotation_maps_x_to_negative_z() {
        let spec = TransformSpec::default().with_rotation(0.0, 90.0, 0.0);
        let rotated = spec.compose() * Vector4::new(1.0, 0.0, 0.0, 1.0);
        assert_vec_close(rotated, Vector4::new(0.0, 0.0, -1.0, 1.0));
    }

    #[test]
    fn test_scale_applies_before_rotation() {
        // Stretch along X, then turn X into -Z: the stretch must follow the point.
        let spec = TransformSpec::default()
            .with_scale(3.0, 1.0, 1.0)
            .with_rotation(0.0, 90.0, 0.0);
        let p = spec.compose() * Vector4::new(1.0, 0.0, 0.0, 1.0);
        assert_vec_close(p, Vector4::new(0.0, 0.0, -3.0, 1.0));
    }

    #[test]
    fn test_x_rotation_applies_before_z() {
        // Y --Rx(90)--> Z --Rz(90)--> Z ; the reverse order would give -X.
        let spec = TransformSpec::default().with_rotation(90.0, 0.0, 90.0);
        let p = spec.compose() * Vector4::new(0.0, 1.0, 0.0, 1.0);
        assert_vec_close(p, Vector4::new(0.0, 0.0, 1.0, 1.0));
    }

    #[test]
    fn test_zero_scale_passes_through() {
        let spec = TransformSpec::default().with_scale(0.0, -1.0, 1.0);
        let p = spec.compose() * Vector4::new(5.0, 2.0, 1.0, 1.0);
        assert_vec_close(p, Vector4::new(0.0, -2.0, 1.0, 1.0));
    }

    #[test]
    fn test_apply_writes_model() {
        let mut shader = RecordingShader::new();
        let spec = TransformSpec::default().with_translation(4.0, -3.0, 0.0);
        spec.apply(&mut shader);

        assert_eq!(shader.written_names(), vec!["model"]);
        assert_mat_close(shader.mat4_value("model").unwrap(), spec.compose());
    }
}
