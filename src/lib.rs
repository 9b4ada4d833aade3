// src/lib.rs
//! Desk Scene
//!
//! A static, textured and lit 3D desk scene built from procedural primitives
//! and rendered with wgpu and winit.
//!
//! The [`scene`] module is backend independent: it prepares textures,
//! materials and lights and walks declarative draw blocks against the
//! [`scene::ShaderContext`], [`scene::MeshLibrary`] and
//! [`scene::TextureBackend`] traits. [`gfx`] implements those traits on the
//! GPU and [`app`] puts the result in a window.

pub mod app;
pub mod config;
pub mod error;
pub mod gfx;
pub mod logging;
pub mod prelude;
pub mod scene;
pub mod wgpu_utils;

// Re-export main types for convenience
pub use app::DeskApp;
pub use config::AppConfig;
pub use error::{Result, SceneError};

/// Creates the desk scene application configured from the environment
pub fn default() -> anyhow::Result<DeskApp> {
    DeskApp::new(AppConfig::from_env())
}
