//! # Scene Core
//!
//! Backend-independent scene preparation and per-draw state binding.
//!
//! ## Architecture Overview
//!
//! - **Texture Registry** ([`textures`]) - image decoding, slot assignment, tag lookup
//! - **Material Registry** ([`materials`]) - named Phong parameter sets
//! - **Transform Composer** ([`transform`]) - `T * Rz * Ry * Rx * S` model matrices
//! - **Shader State Binder** ([`binder`]) - color/texture/UV/material uniform writes
//! - **Scene Manager** ([`manager`]) - one-time preparation and the per-frame walk
//!
//! The GPU is reached only through three collaborator traits:
//! [`ShaderContext`], [`MeshLibrary`] and [`TextureBackend`]. The
//! [`recording`] module implements all three without a GPU.
//!
//! ## Usage
//!
//! ```no_run
//! use desk_scene::scene::{
//!     desk::desk_scene,
//!     recording::{HeadlessTextures, RecordingMeshes, RecordingShader},
//!     SceneManager, TextureRegistry,
//! };
//!
//! let definition = desk_scene(std::path::Path::new("textures"));
//! let textures = TextureRegistry::new(HeadlessTextures::new(), 16);
//! let mut scene = SceneManager::new(
//!     definition,
//!     Some(RecordingShader::new()),
//!     RecordingMeshes::new(),
//!     textures,
//! );
//! scene.prepare()?;
//! let stats = scene.render()?;
//! println!("{} draws", stats.draws);
//! # Ok::<(), desk_scene::SceneError>(())
//! ```

pub mod binder;
pub mod definition;
pub mod desk;
pub mod lights;
pub mod manager;
pub mod materials;
pub mod mesh;
pub mod recording;
pub mod shader;
pub mod textures;
pub mod transform;
pub mod view;

pub use binder::ShaderStateBinder;
pub use definition::{Appearance, DrawBlock, MaterialSource, SceneDefinition, SceneObject, TextureSource};
pub use lights::{DirectionalLight, PointLight, SceneLights, MAX_POINT_LIGHTS};
pub use manager::{FrameStats, PrepareReport, SceneManager};
pub use materials::{MaterialEntry, MaterialRegistry};
pub use mesh::{MeshKind, MeshLibrary};
pub use shader::{uniforms, ShaderContext};
pub use textures::{DecodedImage, ImageCrateDecoder, ImageDecoder, TextureBackend, TextureEntry, TextureRegistry};
pub use transform::TransformSpec;
pub use view::{Camera, ProjectionMode};
