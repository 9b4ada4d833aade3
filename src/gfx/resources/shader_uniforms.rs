//! Uniform blocks for the scene shader
//!
//! [`UniformShader`] implements [`ShaderContext`] by mapping uniform names onto
//! two `bytemuck::Pod` blocks that mirror the structs in `scene.wgsl`:
//! [`FrameUniform`] (camera and lights, bound once per frame) and
//! [`ObjectUniform`] (everything a single draw needs, snapshotted per draw).
//! The layouts MUST match the WGSL declarations exactly.

use std::collections::HashSet;

use cgmath::{Matrix, Matrix4, SquareMatrix, Vector2, Vector3, Vector4};

use crate::gfx::camera::{convert_matrix4_to_array, to_wgpu_clip_space};
use crate::scene::{uniforms, ShaderContext, MAX_POINT_LIGHTS};

/// Per-draw state. 192 bytes.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ObjectUniform {
    pub model: [[f32; 4]; 4],
    /// Inverse transpose of `model`, for transforming normals
    pub normal_matrix: [[f32; 4]; 4],
    pub object_color: [f32; 4],
    pub uv_scale: [f32; 2],
    pub use_texture: u32,
    pub texture_unit: i32,
    pub material_diffuse: [f32; 3],
    pub material_shininess: f32,
    pub material_specular: [f32; 3],
    pub _padding: f32,
}

impl Default for ObjectUniform {
    fn default() -> Self {
        let identity = convert_matrix4_to_array(Matrix4::identity());
        Self {
            model: identity,
            normal_matrix: identity,
            object_color: [1.0, 1.0, 1.0, 1.0],
            uv_scale: [1.0, 1.0],
            use_texture: 0,
            texture_unit: 0,
            material_diffuse: [1.0, 1.0, 1.0],
            material_shininess: 1.0,
            material_specular: [0.0, 0.0, 0.0],
            _padding: 0.0,
        }
    }
}

/// 64 bytes.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct DirectionalLightRaw {
    pub direction: [f32; 3],
    pub active: u32,
    pub ambient: [f32; 3],
    pub _padding0: f32,
    pub diffuse: [f32; 3],
    pub _padding1: f32,
    pub specular: [f32; 3],
    pub _padding2: f32,
}

/// 64 bytes.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct PointLightRaw {
    pub position: [f32; 3],
    pub active: u32,
    pub ambient: [f32; 3],
    pub _padding0: f32,
    pub diffuse: [f32; 3],
    pub _padding1: f32,
    pub specular: [f32; 3],
    pub _padding2: f32,
}

/// Per-frame state. 480 bytes.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct FrameUniform {
    pub view_proj: [[f32; 4]; 4],
    pub view_position: [f32; 4],
    pub directional: DirectionalLightRaw,
    pub point_lights: [PointLightRaw; MAX_POINT_LIGHTS],
    pub use_lighting: u32,
    pub _padding: [u32; 3],
}

impl Default for FrameUniform {
    fn default() -> Self {
        Self {
            view_proj: convert_matrix4_to_array(Matrix4::identity()),
            view_position: [0.0, 0.0, 0.0, 1.0],
            directional: DirectionalLightRaw::default(),
            point_lights: [PointLightRaw::default(); MAX_POINT_LIGHTS],
            use_lighting: 0,
            _padding: [0; 3],
        }
    }
}

fn parse_point_light(name: &str) -> Option<(usize, &str)> {
    let rest = name.strip_prefix("pointLights[")?;
    let (index, field) = rest.split_once("].")?;
    let index = index.parse::<usize>().ok()?;
    (index < MAX_POINT_LIGHTS).then_some((index, field))
}

/// CPU-side shader state for the wgpu backend.
#[derive(Debug, Clone)]
pub struct UniformShader {
    frame: FrameUniform,
    object: ObjectUniform,
    view: Matrix4<f32>,
    projection: Matrix4<f32>,
    ignored: HashSet<String>,
}

impl Default for UniformShader {
    fn default() -> Self {
        Self {
            frame: FrameUniform::default(),
            object: ObjectUniform::default(),
            view: Matrix4::identity(),
            projection: Matrix4::identity(),
            ignored: HashSet::new(),
        }
    }
}

impl UniformShader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frame_uniform(&self) -> FrameUniform {
        self.frame
    }

    pub fn object_uniform(&self) -> ObjectUniform {
        self.object
    }

    fn ignore(&mut self, name: &str) {
        if self.ignored.insert(name.to_string()) {
            log::warn!("Shader has no uniform named '{}'", name);
        }
    }

    fn update_view_proj(&mut self) {
        self.frame.view_proj =
            convert_matrix4_to_array(to_wgpu_clip_space(self.projection, self.view));
    }
}

impl ShaderContext for UniformShader {
    fn set_mat4(&mut self, name: &str, value: &Matrix4<f32>) {
        match name {
            uniforms::MODEL => {
                self.object.model = convert_matrix4_to_array(*value);
                // Degenerate (zero scale) models have no inverse; their normals don't matter.
                let normal = value.invert().map(|m| m.transpose()).unwrap_or(*value);
                self.object.normal_matrix = convert_matrix4_to_array(normal);
            }
            uniforms::VIEW => {
                self.view = *value;
                self.update_view_proj();
            }
            uniforms::PROJECTION => {
                self.projection = *value;
                self.update_view_proj();
            }
            _ => self.ignore(name),
        }
    }

    fn set_vec4(&mut self, name: &str, value: Vector4<f32>) {
        match name {
            uniforms::OBJECT_COLOR => self.object.object_color = value.into(),
            _ => self.ignore(name),
        }
    }

    fn set_vec3(&mut self, name: &str, value: Vector3<f32>) {
        let value: [f32; 3] = value.into();
        match name {
            uniforms::VIEW_POSITION => {
                self.frame.view_position = [value[0], value[1], value[2], 1.0]
            }
            uniforms::MATERIAL_DIFFUSE => self.object.material_diffuse = value,
            uniforms::MATERIAL_SPECULAR => self.object.material_specular = value,
            uniforms::DIRECTIONAL_DIRECTION => self.frame.directional.direction = value,
            uniforms::DIRECTIONAL_AMBIENT => self.frame.directional.ambient = value,
            uniforms::DIRECTIONAL_DIFFUSE => self.frame.directional.diffuse = value,
            uniforms::DIRECTIONAL_SPECULAR => self.frame.directional.specular = value,
            _ => match parse_point_light(name) {
                Some((index, "position")) => self.frame.point_lights[index].position = value,
                Some((index, "ambient")) => self.frame.point_lights[index].ambient = value,
                Some((index, "diffuse")) => self.frame.point_lights[index].diffuse = value,
                Some((index, "specular")) => self.frame.point_lights[index].specular = value,
                _ => self.ignore(name),
            },
        }
    }

    fn set_vec2(&mut self, name: &str, value: Vector2<f32>) {
        match name {
            uniforms::UV_SCALE => self.object.uv_scale = value.into(),
            _ => self.ignore(name),
        }
    }

    fn set_bool(&mut self, name: &str, value: bool) {
        let flag = u32::from(value);
        match name {
            uniforms::USE_TEXTURE => self.object.use_texture = flag,
            uniforms::USE_LIGHTING => self.frame.use_lighting = flag,
            uniforms::DIRECTIONAL_ACTIVE => self.frame.directional.active = flag,
            _ => match parse_point_light(name) {
                Some((index, "bActive")) => self.frame.point_lights[index].active = flag,
                _ => self.ignore(name),
            },
        }
    }

    fn set_int(&mut self, name: &str, value: i32) {
        match name {
            uniforms::OBJECT_TEXTURE => self.object.texture_unit = value,
            _ => self.ignore(name),
        }
    }

    fn set_float(&mut self, name: &str, value: f32) {
        match name {
            uniforms::MATERIAL_SHININESS => self.object.material_shininess = value,
            _ => self.ignore(name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_sizes_match_wgsl() {
        assert_eq!(std::mem::size_of::<ObjectUniform>(), 192);
        assert_eq!(std::mem::size_of::<DirectionalLightRaw>(), 64);
        assert_eq!(std::mem::size_of::<PointLightRaw>(), 64);
        assert_eq!(std::mem::size_of::<FrameUniform>(), 480);
    }

    #[test]
    fn test_object_fields() {
        let mut shader = UniformShader::new();
        shader.set_mat4(
            uniforms::MODEL,
            &Matrix4::from_translation(Vector3::new(4.0, -3.0, 0.0)),
        );
        shader.set_bool(uniforms::USE_TEXTURE, true);
        shader.set_int(uniforms::OBJECT_TEXTURE, 3);
        shader.set_vec2(uniforms::UV_SCALE, Vector2::new(2.0, 1.0));
        shader.set_vec3(uniforms::MATERIAL_DIFFUSE, Vector3::new(0.2, 0.2, 0.3));
        shader.set_float(uniforms::MATERIAL_SHININESS, 0.1);

        let object = shader.object_uniform();
        assert_eq!(object.model[3], [4.0, -3.0, 0.0, 1.0]);
        assert_eq!(object.use_texture, 1);
        assert_eq!(object.texture_unit, 3);
        assert_eq!(object.uv_scale, [2.0, 1.0]);
        assert_eq!(object.material_diffuse, [0.2, 0.2, 0.3]);
        assert_eq!(object.material_shininess, 0.1);
    }

    #[test]
    fn test_point_light_fields() {
        let mut shader = UniformShader::new();
        shader.set_vec3("pointLights[2].position", Vector3::new(3.8, 5.5, 4.0));
        shader.set_bool("pointLights[2].bActive", true);
        shader.set_bool("directionalLight.bActive", true);
        shader.set_bool(uniforms::USE_LIGHTING, true);

        let frame = shader.frame_uniform();
        assert_eq!(frame.point_lights[2].position, [3.8, 5.5, 4.0]);
        assert_eq!(frame.point_lights[2].active, 1);
        assert_eq!(frame.point_lights[1].active, 0);
        assert_eq!(frame.directional.active, 1);
        assert_eq!(frame.use_lighting, 1);
    }

    #[test]
    fn test_out_of_range_light_is_ignored() {
        let mut shader = UniformShader::new();
        shader.set_vec3("pointLights[7].position", Vector3::new(1.0, 1.0, 1.0));
        shader.set_vec3("pointLights[x].position", Vector3::new(1.0, 1.0, 1.0));
        assert_eq!(shader.frame_uniform(), FrameUniform::default());
    }

    #[test]
    fn test_degenerate_model_keeps_normal_matrix_finite() {
        let mut shader = UniformShader::new();
        shader.set_mat4(uniforms::MODEL, &Matrix4::from_nonuniform_scale(0.0, 1.0, 1.0));
        let object = shader.object_uniform();
        assert!(object.normal_matrix.iter().flatten().all(|v| v.is_finite()));
    }
}
