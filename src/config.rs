// src/config.rs
//! Application and scene configuration
//!
//! [`AppConfig`] is built with `with_*` methods on top of [`Default`], and can
//! be overlaid from `DESK_SCENE_*` environment variables via
//! [`AppConfig::from_env`].

use std::path::PathBuf;

use crate::scene::ProjectionMode;

/// Default number of texture slots a registry accepts.
pub const DEFAULT_MAX_TEXTURE_SLOTS: usize = 16;

/// Runtime configuration for the desk scene application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub window_title: String,
    pub window_width: u32,
    pub window_height: u32,
    pub clear_color: [f64; 4],
    pub vsync: bool,
    pub projection_mode: ProjectionMode,
    /// Directory the scene's texture paths are resolved against.
    pub texture_dir: PathBuf,
    pub max_texture_slots: usize,
    /// Flat color used when a draw block asks for a texture that never loaded.
    pub missing_texture_color: [f32; 4],
    pub log_filter: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            window_title: "Desk Scene".to_string(),
            window_width: 1000,
            window_height: 800,
            clear_color: [0.0, 0.0, 0.0, 1.0],
            vsync: true,
            projection_mode: ProjectionMode::Perspective,
            texture_dir: PathBuf::from("textures"),
            max_texture_slots: DEFAULT_MAX_TEXTURE_SLOTS,
            missing_texture_color: [1.0, 0.0, 1.0, 1.0],
            log_filter: None,
        }
    }
}

impl AppConfig {
    /// Default configuration overlaid with `DESK_SCENE_*` environment variables.
    ///
    /// Recognized variables:
    /// * `DESK_SCENE_TEXTURES` - texture directory
    /// * `DESK_SCENE_MAX_TEXTURES` - texture slot count
    /// * `DESK_SCENE_ORTHO` - start in orthographic projection when set to `1` or `true`
    /// * `DESK_SCENE_LOG` - `env_logger` filter string
    ///
    /// Unparseable values are logged and ignored.
    pub fn from_env() -> Self {
        Self::default().overlay(|key| std::env::var(key).ok())
    }

    /// Applies overrides looked up through `lookup`, keyed by variable name.
    pub fn overlay<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(dir) = lookup("DESK_SCENE_TEXTURES") {
            self.texture_dir = PathBuf::from(dir);
        }

        if let Some(raw) = lookup("DESK_SCENE_MAX_TEXTURES") {
            match raw.trim().parse::<usize>() {
                Ok(slots) if slots > 0 => self.max_texture_slots = slots,
                _ => log::warn!("Ignoring DESK_SCENE_MAX_TEXTURES={:?}", raw),
            }
        }

        if let Some(raw) = lookup("DESK_SCENE_ORTHO") {
            match raw.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" => self.projection_mode = ProjectionMode::Orthographic,
                "0" | "false" | "no" => self.projection_mode = ProjectionMode::Perspective,
                _ => log::warn!("Ignoring DESK_SCENE_ORTHO={:?}", raw),
            }
        }

        if let Some(filter) = lookup("DESK_SCENE_LOG") {
            self.log_filter = Some(filter);
        }

        self
    }

    pub fn with_title(mut self, title: &str) -> Self {
        self.window_title = title.to_owned();
        self
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.window_width = width;
        self.window_height = height;
        self
    }

    pub fn with_clear_color(mut self, color: [f64; 4]) -> Self {
        self.clear_color = color;
        self
    }

    pub fn with_vsync(mut self, vsync: bool) -> Self {
        self.vsync = vsync;
        self
    }

    pub fn with_projection_mode(mut self, mode: ProjectionMode) -> Self {
        self.projection_mode = mode;
        self
    }

    /// Sets the directory texture paths are resolved against (builder pattern)
    ///
    /// # Arguments
    /// * `dir` - Directory containing the scene's image files
    pub fn with_texture_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.texture_dir = dir.into();
        self
    }

    pub fn with_max_texture_slots(mut self, slots: usize) -> Self {
        self.max_texture_slots = slots;
        self
    }

    pub fn with_missing_texture_color(mut self, color: [f32; 4]) -> Self {
        self.missing_texture_color = color;
        self
    }

    pub fn with_log_filter(mut self, filter: &str) -> Self {
        self.log_filter = Some(filter.to_owned());
        self
    }

    /// Window aspect ratio, guarding against a zero height.
    pub fn aspect_ratio(&self) -> f32 {
        self.window_width as f32 / self.window_height.max(1) as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.max_texture_slots, 16);
        assert_eq!(config.projection_mode, ProjectionMode::Perspective);
        assert_eq!(config.texture_dir, PathBuf::from("textures"));
    }

    #[test]
    fn test_env_overlay() {
        let config = AppConfig::default().overlay(lookup_from(&[
            ("DESK_SCENE_TEXTURES", "/tmp/tex"),
            ("DESK_SCENE_MAX_TEXTURES", "4"),
            ("DESK_SCENE_ORTHO", "true"),
            ("DESK_SCENE_LOG", "debug"),
        ]));

        assert_eq!(config.texture_dir, PathBuf::from("/tmp/tex"));
        assert_eq!(config.max_texture_slots, 4);
        assert_eq!(config.projection_mode, ProjectionMode::Orthographic);
        assert_eq!(config.log_filter.as_deref(), Some("debug"));
    }

    #[test]
    fn test_env_overlay_ignores_garbage() {
        let config = AppConfig::default().overlay(lookup_from(&[
            ("DESK_SCENE_MAX_TEXTURES", "lots"),
            ("DESK_SCENE_ORTHO", "maybe"),
        ]));

        assert_eq!(config.max_texture_slots, DEFAULT_MAX_TEXTURE_SLOTS);
        assert_eq!(config.projection_mode, ProjectionMode::Perspective);
    }

    #[test]
    fn test_aspect_ratio_zero_height() {
        let config = AppConfig::default().with_size(800, 0);
        assert_eq!(config.aspect_ratio(), 800.0);
    }
}
