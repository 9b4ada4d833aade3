// src/error.rs
//! Error types for scene preparation and rendering

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by the texture and material registries and the scene manager.
///
/// None of these are fatal to the process. Callers log and continue, with the
/// exception of [`SceneError::NotPrepared`] which signals a call-order bug.
#[derive(Debug, Error)]
pub enum SceneError {
    #[error("Failed to decode image '{}': {reason}", path.display())]
    DecodeFailure { path: PathBuf, reason: String },

    #[error("Image '{}' has {channels} color channels; only 3 or 4 are supported", path.display())]
    UnsupportedChannelCount { path: PathBuf, channels: u8 },

    #[error("Texture registry is full ({capacity} slots)")]
    CapacityExceeded { capacity: usize },

    #[error("Texture tag '{0}' is already registered")]
    DuplicateTextureTag(String),

    #[error("Failed to upload texture '{tag}': {reason}")]
    Upload { tag: String, reason: String },

    #[error("No texture or material registered under tag '{0}'")]
    TagNotFound(String),

    #[error("Material '{tag}' has invalid shininess {shininess}; it must be positive and finite")]
    InvalidShininess { tag: String, shininess: f32 },

    #[error("Scene must be prepared before rendering")]
    NotPrepared,

    #[error("Scene has already been prepared")]
    AlreadyPrepared,
}

pub type Result<T> = std::result::Result<T, SceneError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_name_the_offender() {
        let err = SceneError::UnsupportedChannelCount {
            path: PathBuf::from("textures/gray.png"),
            channels: 1,
        };
        let message = err.to_string();
        assert!(message.contains("textures/gray.png"));
        assert!(message.contains('1'));

        let err = SceneError::TagNotFound("marble".to_string());
        assert!(err.to_string().contains("marble"));
    }
}
