//! Headless backends
//!
//! Recording implementations of the shader, mesh and texture collaborators.
//! They back the demo's `--dry-run` mode and the test suites: every uniform
//! write, mesh draw and texture upload is captured for inspection instead of
//! reaching a GPU.

use std::collections::HashMap;

use cgmath::{Matrix4, Vector2, Vector3, Vector4};

use super::{
    mesh::{MeshKind, MeshLibrary},
    shader::ShaderContext,
    textures::{DecodedImage, TextureBackend},
};

/// A single value written through [`ShaderContext`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UniformValue {
    Mat4(Matrix4<f32>),
    Vec4(Vector4<f32>),
    Vec3(Vector3<f32>),
    Vec2(Vector2<f32>),
    Bool(bool),
    Int(i32),
    Float(f32),
}

/// Shader that records every named write.
#[derive(Debug, Default, Clone)]
pub struct RecordingShader {
    writes: Vec<(String, UniformValue)>,
    current: HashMap<String, UniformValue>,
    program_uses: usize,
}

impl RecordingShader {
    pub fn new() -> Self {
        Self::default()
    }

    fn record(&mut self, name: &str, value: UniformValue) {
        log::trace!("uniform {} = {:?}", name, value);
        self.writes.push((name.to_string(), value));
        self.current.insert(name.to_string(), value);
    }

    /// Every write in order.
    pub fn writes(&self) -> &[(String, UniformValue)] {
        &self.writes
    }

    /// Names written since the last [`Self::clear_writes`], in order.
    pub fn written_names(&self) -> Vec<&str> {
        self.writes.iter().map(|(name, _)| name.as_str()).collect()
    }

    /// Forgets the write log but keeps current values.
    pub fn clear_writes(&mut self) {
        self.writes.clear();
    }

    /// Latest value written under `name`.
    pub fn value(&self, name: &str) -> Option<UniformValue> {
        self.current.get(name).copied()
    }

    pub fn bool_value(&self, name: &str) -> Option<bool> {
        match self.value(name)? {
            UniformValue::Bool(b) => Some(b),
            _ => None,
        }
    }

    pub fn int_value(&self, name: &str) -> Option<i32> {
        match self.value(name)? {
            UniformValue::Int(i) => Some(i),
            _ => None,
        }
    }

    pub fn float_value(&self, name: &str) -> Option<f32> {
        match self.value(name)? {
            UniformValue::Float(f) => Some(f),
            _ => None,
        }
    }

    pub fn vec4_value(&self, name: &str) -> Option<Vector4<f32>> {
        match self.value(name)? {
            UniformValue::Vec4(v) => Some(v),
            _ => None,
        }
    }

    pub fn vec3_value(&self, name: &str) -> Option<Vector3<f32>> {
        match self.value(name)? {
            UniformValue::Vec3(v) => Some(v),
            _ => None,
        }
    }

    pub fn vec2_value(&self, name: &str) -> Option<Vector2<f32>> {
        match self.value(name)? {
            UniformValue::Vec2(v) => Some(v),
            _ => None,
        }
    }

    pub fn mat4_value(&self, name: &str) -> Option<Matrix4<f32>> {
        match self.value(name)? {
            UniformValue::Mat4(m) => Some(m),
            _ => None,
        }
    }

    pub fn program_uses(&self) -> usize {
        self.program_uses
    }

    /// Copy of every current value, keyed by uniform name.
    pub fn snapshot(&self) -> HashMap<String, UniformValue> {
        self.current.clone()
    }
}

impl ShaderContext for RecordingShader {
    fn use_program(&mut self) {
        self.program_uses += 1;
    }

    fn set_mat4(&mut self, name: &str, value: &Matrix4<f32>) {
        self.record(name, UniformValue::Mat4(*value));
    }

    fn set_vec4(&mut self, name: &str, value: Vector4<f32>) {
        self.record(name, UniformValue::Vec4(value));
    }

    fn set_vec3(&mut self, name: &str, value: Vector3<f32>) {
        self.record(name, UniformValue::Vec3(value));
    }

    fn set_vec2(&mut self, name: &str, value: Vector2<f32>) {
        self.record(name, UniformValue::Vec2(value));
    }

    fn set_bool(&mut self, name: &str, value: bool) {
        self.record(name, UniformValue::Bool(value));
    }

    fn set_int(&mut self, name: &str, value: i32) {
        self.record(name, UniformValue::Int(value));
    }

    fn set_float(&mut self, name: &str, value: f32) {
        self.record(name, UniformValue::Float(value));
    }
}

/// A draw captured by [`RecordingMeshes`], with the shader state it saw.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedDraw {
    pub mesh: MeshKind,
    pub state: HashMap<String, UniformValue>,
}

impl RecordedDraw {
    pub fn uses_texture(&self) -> bool {
        matches!(
            self.state.get(super::shader::uniforms::USE_TEXTURE),
            Some(UniformValue::Bool(true))
        )
    }
}

/// Mesh library that remembers loads and draws.
#[derive(Debug, Default)]
pub struct RecordingMeshes {
    loaded: Vec<MeshKind>,
    draws: Vec<RecordedDraw>,
}

impl RecordingMeshes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn loaded(&self) -> &[MeshKind] {
        &self.loaded
    }

    pub fn draws(&self) -> &[RecordedDraw] {
        &self.draws
    }

    pub fn take_draws(&mut self) -> Vec<RecordedDraw> {
        std::mem::take(&mut self.draws)
    }
}

impl MeshLibrary<RecordingShader> for RecordingMeshes {
    fn load_mesh(&mut self, kind: MeshKind) {
        if !self.loaded.contains(&kind) {
            self.loaded.push(kind);
        }
    }

    fn draw_mesh(&mut self, kind: MeshKind, shader: &RecordingShader) {
        if !self.loaded.contains(&kind) {
            log::warn!("Drawing {} before it was loaded", kind);
        }
        self.draws.push(RecordedDraw {
            mesh: kind,
            state: shader.snapshot(),
        });
    }
}

/// Texture backend that hands out numeric handles and logs what happens to them.
#[derive(Debug, Default)]
pub struct HeadlessTextures {
    next_handle: u64,
    uploads: Vec<(String, u32, u32)>,
    bindings: Vec<(usize, u64)>,
    released: Vec<u64>,
    fail_uploads: bool,
}

impl HeadlessTextures {
    pub fn new() -> Self {
        Self::default()
    }

    /// Backend whose uploads always fail, for exercising error paths.
    pub fn failing() -> Self {
        Self {
            fail_uploads: true,
            ..Self::default()
        }
    }

    /// `(label, width, height)` per successful upload.
    pub fn uploads(&self) -> &[(String, u32, u32)] {
        &self.uploads
    }

    /// `(slot, handle)` per bind call.
    pub fn bindings(&self) -> &[(usize, u64)] {
        &self.bindings
    }

    pub fn released(&self) -> &[u64] {
        &self.released
    }
}

impl TextureBackend for HeadlessTextures {
    type Handle = u64;

    fn upload(&mut self, image: &DecodedImage, label: &str) -> Result<u64, String> {
        if self.fail_uploads {
            return Err("headless backend configured to fail".to_string());
        }
        let handle = self.next_handle;
        self.next_handle += 1;
        self.uploads
            .push((label.to_string(), image.width, image.height));
        Ok(handle)
    }

    fn bind(&mut self, slot: usize, handle: &u64) {
        self.bindings.push((slot, *handle));
    }

    fn release(&mut self, handle: u64) {
        self.released.push(handle);
    }
}
