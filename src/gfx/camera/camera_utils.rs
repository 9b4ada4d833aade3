use cgmath::Matrix4;

/// Remaps OpenGL depth (-1..1) to wgpu depth (0..1).
#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: Matrix4<f32> = Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.0,
    0.0, 0.0, 0.5, 1.0,
);

/// Combined view-projection matrix ready for a wgpu vertex shader.
pub fn to_wgpu_clip_space(projection: Matrix4<f32>, view: Matrix4<f32>) -> Matrix4<f32> {
    OPENGL_TO_WGPU_MATRIX * projection * view
}

pub fn convert_matrix4_to_array(matrix4: Matrix4<f32>) -> [[f32; 4]; 4] {
    let mut result = [[0.0; 4]; 4];

    for i in 0..4 {
        for j in 0..4 {
            result[i][j] = matrix4[i][j];
        }
    }

    result
}
