//! # Desk Scene Prelude
//!
//! Commonly used types in one import.
//!
//! ```rust
//! use desk_scene::prelude::*;
//!
//! let definition = desk_scene(std::path::Path::new("textures"));
//! assert_eq!(definition.draw_count(), 13);
//! ```

pub use crate::app::DeskApp;
pub use crate::config::AppConfig;
pub use crate::error::{Result, SceneError};
pub use crate::logging::{init_logging, LoggingConfig};

pub use crate::scene::{
    desk::desk_scene, Appearance, Camera, DirectionalLight, DrawBlock, FrameStats, MaterialEntry,
    MaterialRegistry, MaterialSource, MeshKind, MeshLibrary, PointLight, PrepareReport,
    ProjectionMode, SceneDefinition, SceneLights, SceneManager, SceneObject, ShaderContext,
    ShaderStateBinder, TextureBackend, TextureRegistry, TransformSpec,
};

pub use crate::gfx::{camera::CameraController, GpuScene, RenderEngine};

// Re-export commonly used external types
pub use cgmath::{Deg, Matrix4, Point3, Vector2, Vector3, Vector4};
