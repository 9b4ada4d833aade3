//! Camera helpers for the wgpu backend
//!
//! Scene-side view and projection matrices use the OpenGL clip-space
//! convention; these helpers convert them for upload. [`CameraController`]
//! maps winit input onto the scene camera.

pub mod camera_controller;
pub mod camera_utils;

pub use camera_controller::CameraController;
pub use camera_utils::{convert_matrix4_to_array, to_wgpu_clip_space, OPENGL_TO_WGPU_MATRIX};
