//! # Graphics Module
//!
//! The wgpu side of the desk scene: GPU implementations of the scene
//! collaborators plus the engine that presents frames.
//!
//! ## Architecture Overview
//!
//! - **Camera Utilities** ([`camera`]) - clip space correction, matrix packing and input-driven camera control
//! - **Geometry** ([`geometry`]) - procedural primitives (plane, sphere, cylinder, torus, box)
//! - **Meshes** ([`meshes`]) - GPU buffers per primitive and the recorded draw list
//! - **Resources** ([`resources`]) - uniform blocks, textures and texture slot bind groups
//! - **Rendering Pipeline** ([`rendering`]) - pipeline cache and the render engine
//!
//! ## Usage
//!
//! ```no_run
//! use desk_scene::gfx::RenderEngine;
//!
//! // The render engine is created by DeskApp once a window exists:
//! // let engine = RenderEngine::new(window, width, height, &config).await?;
//! // let mut scene = engine.create_scene(definition, &config);
//! ```

pub mod camera;
pub mod geometry;
pub mod meshes;
pub mod rendering;
pub mod resources;

// Re-export commonly used types
pub use camera::CameraController;
pub use meshes::ShapeMeshes;
pub use rendering::render_engine::{GpuScene, RenderEngine};
pub use resources::{GpuTextureBackend, UniformShader};
