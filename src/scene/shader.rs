//! Shader parameter upload abstraction
//!
//! The scene core never touches GPU state directly. Every value it wants a
//! draw to see is written by name through a [`ShaderContext`] immediately
//! before the draw call. Writes are last-wins.

use cgmath::{Matrix4, Vector2, Vector3, Vector4};

/// Uniform names written by the scene core.
pub mod uniforms {
    pub const MODEL: &str = "model";
    pub const VIEW: &str = "view";
    pub const PROJECTION: &str = "projection";
    pub const VIEW_POSITION: &str = "viewPosition";

    pub const OBJECT_COLOR: &str = "objectColor";
    pub const OBJECT_TEXTURE: &str = "objectTexture";
    pub const USE_TEXTURE: &str = "bUseTexture";
    pub const USE_LIGHTING: &str = "bUseLighting";
    pub const UV_SCALE: &str = "UVscale";

    pub const MATERIAL_DIFFUSE: &str = "material.diffuseColor";
    pub const MATERIAL_SPECULAR: &str = "material.specularColor";
    pub const MATERIAL_SHININESS: &str = "material.shininess";

    pub const DIRECTIONAL_DIRECTION: &str = "directionalLight.direction";
    pub const DIRECTIONAL_AMBIENT: &str = "directionalLight.ambient";
    pub const DIRECTIONAL_DIFFUSE: &str = "directionalLight.diffuse";
    pub const DIRECTIONAL_SPECULAR: &str = "directionalLight.specular";
    pub const DIRECTIONAL_ACTIVE: &str = "directionalLight.bActive";

    /// Name of a field of the point light at `index`, e.g. `pointLights[2].diffuse`.
    pub fn point_light(index: usize, field: &str) -> String {
        format!("pointLights[{}].{}", index, field)
    }
}

/// Named uniform sink for a single shader program.
///
/// Implementations decide how values reach the GPU; the scene core only
/// relies on the write order. Unknown names should be ignored (and may be
/// logged), mirroring how a GL program ignores inactive uniforms.
pub trait ShaderContext {
    /// Makes this program current. Most backends have nothing to do here.
    fn use_program(&mut self) {}

    fn set_mat4(&mut self, name: &str, value: &Matrix4<f32>);
    fn set_vec4(&mut self, name: &str, value: Vector4<f32>);
    fn set_vec3(&mut self, name: &str, value: Vector3<f32>);
    fn set_vec2(&mut self, name: &str, value: Vector2<f32>);
    fn set_bool(&mut self, name: &str, value: bool);
    fn set_int(&mut self, name: &str, value: i32);
    fn set_float(&mut self, name: &str, value: f32);
}
