// src/gfx/rendering/mod.rs
//! Core rendering functionality
//!
//! Handles the vertex format, render pipelines, and frame rendering.

pub mod pipeline_manager;
pub mod render_engine;
pub mod vertex;

// Re-export main types
pub use pipeline_manager::{PipelineConfig, PipelineManager};
pub use render_engine::{GpuScene, RenderEngine};
pub use vertex::Vertex3D;
