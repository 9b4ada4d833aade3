// src/gfx/resources/mod.rs
//! GPU resource management
//!
//! Handles textures, uniform blocks, and texture bind groups for rendering.

pub mod gpu_textures;
pub mod shader_uniforms;
pub mod texture_resource;

// Re-export main types
pub use gpu_textures::GpuTextureBackend;
pub use shader_uniforms::{FrameUniform, ObjectUniform, UniformShader};
pub use texture_resource::TextureResource;
