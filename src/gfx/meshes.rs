//! GPU primitive meshes
//!
//! [`ShapeMeshes`] uploads the procedural primitives once and records one
//! [`DrawCall`] per `draw_mesh`, snapshotting the object uniform at call time.
//! The render engine drains the draw list when it encodes the frame.

use std::collections::HashMap;
use std::sync::Arc;

use wgpu::util::DeviceExt;

use crate::gfx::geometry::GeometryData;
use crate::gfx::resources::{ObjectUniform, UniformShader};
use crate::scene::{MeshKind, MeshLibrary};

/// Vertex and index buffers of one primitive.
pub struct GpuMesh {
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub index_count: u32,
}

impl GpuMesh {
    fn upload(device: &wgpu::Device, kind: MeshKind) -> Self {
        let geometry = GeometryData::for_mesh(kind);
        let vertices = geometry.to_vertices();

        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{} Vertex Buffer", kind)),
            contents: bytemuck::cast_slice(&vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{} Index Buffer", kind)),
            contents: bytemuck::cast_slice(&geometry.indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        Self {
            vertex_buffer,
            index_buffer,
            index_count: geometry.indices.len() as u32,
        }
    }
}

/// A queued draw: which mesh, with which per-object state.
#[derive(Debug, Clone, Copy)]
pub struct DrawCall {
    pub mesh: MeshKind,
    pub object: ObjectUniform,
}

/// [`MeshLibrary`] backed by wgpu buffers.
pub struct ShapeMeshes {
    device: Arc<wgpu::Device>,
    meshes: HashMap<MeshKind, GpuMesh>,
    draws: Vec<DrawCall>,
}

impl ShapeMeshes {
    pub fn new(device: Arc<wgpu::Device>) -> Self {
        Self {
            device,
            meshes: HashMap::new(),
            draws: Vec::new(),
        }
    }

    pub fn mesh(&self, kind: MeshKind) -> Option<&GpuMesh> {
        self.meshes.get(&kind)
    }

    pub fn is_loaded(&self, kind: MeshKind) -> bool {
        self.meshes.contains_key(&kind)
    }

    pub fn draws(&self) -> &[DrawCall] {
        &self.draws
    }

    /// Removes and returns the draws queued since the last call.
    pub fn take_draws(&mut self) -> Vec<DrawCall> {
        std::mem::take(&mut self.draws)
    }
}

impl MeshLibrary<UniformShader> for ShapeMeshes {
    fn load_mesh(&mut self, kind: MeshKind) {
        if self.meshes.contains_key(&kind) {
            return;
        }
        let mesh = GpuMesh::upload(&self.device, kind);
        log::debug!("Uploaded {} mesh ({} indices)", kind, mesh.index_count);
        self.meshes.insert(kind, mesh);
    }

    fn draw_mesh(&mut self, kind: MeshKind, shader: &UniformShader) {
        if !self.meshes.contains_key(&kind) {
            log::warn!("Draw of {} requested before the mesh was loaded", kind);
            return;
        }
        self.draws.push(DrawCall {
            mesh: kind,
            object: shader.object_uniform(),
        });
    }
}
