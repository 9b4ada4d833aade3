//! Per-draw shader state binding
//!
//! Pushes appearance parameters (flat color or texture, UV scale, material)
//! into the shader right before a draw. Every write is last-wins, so the most
//! recent of `set_flat_color` / `set_texture` decides whether the draw samples
//! a texture.

use cgmath::{Vector2, Vector3, Vector4};

use super::{
    materials::MaterialRegistry,
    shader::{uniforms, ShaderContext},
    textures::{TextureBackend, TextureRegistry},
};
use crate::error::{Result, SceneError};

/// Writes appearance uniforms for a draw block.
#[derive(Debug, Clone, Copy)]
pub struct ShaderStateBinder {
    missing_texture_color: Vector4<f32>,
}

impl Default for ShaderStateBinder {
    fn default() -> Self {
        Self::new(Vector4::new(1.0, 0.0, 1.0, 1.0))
    }
}

impl ShaderStateBinder {
    /// # Arguments
    /// * `missing_texture_color` - Flat color drawn when a texture tag does not resolve
    pub fn new(missing_texture_color: Vector4<f32>) -> Self {
        Self {
            missing_texture_color,
        }
    }

    pub fn missing_texture_color(&self) -> Vector4<f32> {
        self.missing_texture_color
    }

    /// Switches the shader to flat color mode with `color`.
    pub fn set_flat_color<S: ShaderContext + ?Sized>(&self, shader: &mut S, color: Vector4<f32>) {
        shader.set_bool(uniforms::USE_TEXTURE, false);
        shader.set_vec4(uniforms::OBJECT_COLOR, color);
    }

    /// Switches the shader to sample the texture registered under `tag`.
    ///
    /// An unknown tag never reaches the sampler: the shader is put in flat
    /// color mode with the missing-texture color and
    /// [`SceneError::TagNotFound`] is returned for the caller to count.
    ///
    /// # Returns
    /// The texture slot now selected
    pub fn set_texture<S, B>(
        &self,
        shader: &mut S,
        textures: &TextureRegistry<B>,
        tag: &str,
    ) -> Result<usize>
    where
        S: ShaderContext + ?Sized,
        B: TextureBackend,
    {
        match textures.find_slot(tag) {
            Some(slot) => {
                shader.set_bool(uniforms::USE_TEXTURE, true);
                shader.set_int(uniforms::OBJECT_TEXTURE, slot as i32);
                Ok(slot)
            }
            None => {
                log::debug!(
                    "Texture '{}' is not loaded; drawing flat color instead",
                    tag
                );
                self.set_flat_color(shader, self.missing_texture_color);
                Err(SceneError::TagNotFound(tag.to_string()))
            }
        }
    }

    /// Sets the texture coordinate multiplier.
    pub fn set_uv_scale<S: ShaderContext + ?Sized>(&self, shader: &mut S, u: f32, v: f32) {
        shader.set_vec2(uniforms::UV_SCALE, Vector2::new(u, v));
    }

    /// Writes the material registered under `tag`.
    ///
    /// Nothing is written when the tag is unknown.
    ///
    /// # Returns
    /// Whether the material was found
    pub fn set_material<S: ShaderContext + ?Sized>(
        &self,
        shader: &mut S,
        materials: &MaterialRegistry,
        tag: &str,
    ) -> bool {
        let Some(material) = materials.find(tag) else {
            log::debug!("Material '{}' is not defined; keeping previous values", tag);
            return false;
        };

        shader.set_vec3(uniforms::MATERIAL_DIFFUSE, material.diffuse_color);
        shader.set_vec3(uniforms::MATERIAL_SPECULAR, material.specular_color);
        shader.set_float(uniforms::MATERIAL_SHININESS, material.shininess);
        true
    }

    /// Clears lighting-relevant material state to a neutral matte surface.
    pub fn reset_material<S: ShaderContext + ?Sized>(&self, shader: &mut S) {
        shader.set_vec3(uniforms::MATERIAL_DIFFUSE, Vector3::new(1.0, 1.0, 1.0));
        shader.set_vec3(uniforms::MATERIAL_SPECULAR, Vector3::new(0.0, 0.0, 0.0));
        shader.set_float(uniforms::MATERIAL_SHININESS, 1.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{
        recording::{HeadlessTextures, RecordingShader},
        textures::DecodedImage,
    };
    use std::path::Path;

    fn rgb_decoder(_: &Path) -> std::result::Result<DecodedImage, String> {
        Ok(DecodedImage {
            width: 1,
            height: 1,
            channels: 3,
            pixels: vec![255, 255, 255],
        })
    }

    fn textures_with(tags: &[&str]) -> TextureRegistry<HeadlessTextures> {
        let mut textures =
            TextureRegistry::new(HeadlessTextures::new(), 16).with_decoder(rgb_decoder);
        for tag in tags {
            textures.load_texture(format!("{}.png", tag), tag).unwrap();
        }
        textures
    }

    #[test]
    fn test_flat_color_disables_texture() {
        let binder = ShaderStateBinder::default();
        let mut shader = RecordingShader::new();
        binder.set_flat_color(&mut shader, Vector4::new(0.2, 0.2, 0.2, 1.0));

        assert_eq!(shader.written_names(), vec!["bUseTexture", "objectColor"]);
        assert_eq!(shader.bool_value("bUseTexture"), Some(false));
        assert_eq!(
            shader.vec4_value("objectColor"),
            Some(Vector4::new(0.2, 0.2, 0.2, 1.0))
        );
    }

    #[test]
    fn test_texture_selects_slot() {
        let binder = ShaderStateBinder::default();
        let textures = textures_with(&["table", "wall"]);
        let mut shader = RecordingShader::new();

        assert_eq!(binder.set_texture(&mut shader, &textures, "wall").unwrap(), 1);
        assert_eq!(shader.bool_value("bUseTexture"), Some(true));
        assert_eq!(shader.int_value("objectTexture"), Some(1));
    }

    #[test]
    fn test_last_appearance_write_wins() {
        let binder = ShaderStateBinder::default();
        let textures = textures_with(&["table"]);

        let mut shader = RecordingShader::new();
        binder.set_flat_color(&mut shader, Vector4::new(1.0, 0.0, 0.0, 1.0));
        binder.set_texture(&mut shader, &textures, "table").unwrap();
        assert_eq!(shader.bool_value("bUseTexture"), Some(true));

        let mut shader = RecordingShader::new();
        binder.set_texture(&mut shader, &textures, "table").unwrap();
        binder.set_flat_color(&mut shader, Vector4::new(1.0, 0.0, 0.0, 1.0));
        assert_eq!(shader.bool_value("bUseTexture"), Some(false));
    }

    #[test]
    fn test_missing_texture_falls_back_to_flat_color() {
        let missing = Vector4::new(1.0, 0.0, 1.0, 1.0);
        let binder = ShaderStateBinder::new(missing);
        let textures = textures_with(&["table"]);
        let mut shader = RecordingShader::new();

        let err = binder
            .set_texture(&mut shader, &textures, "window")
            .unwrap_err();
        assert!(matches!(err, SceneError::TagNotFound(tag) if tag == "window"));
        assert_eq!(shader.bool_value("bUseTexture"), Some(false));
        assert_eq!(shader.vec4_value("objectColor"), Some(missing));
        assert_eq!(shader.int_value("objectTexture"), None);
    }

    #[test]
    fn test_uv_scale() {
        let binder = ShaderStateBinder::default();
        let mut shader = RecordingShader::new();
        binder.set_uv_scale(&mut shader, 2.0, 0.5);
        assert_eq!(shader.vec2_value("UVscale"), Some(Vector2::new(2.0, 0.5)));
    }

    #[test]
    fn test_material_found_and_missing() {
        let binder = ShaderStateBinder::default();
        let mut materials = MaterialRegistry::new();
        materials
            .define("ball", Vector3::new(0.4, 0.4, 0.4), Vector3::new(0.7, 0.7, 0.6), 52.0)
            .unwrap();

        let mut shader = RecordingShader::new();
        assert!(binder.set_material(&mut shader, &materials, "ball"));
        assert_eq!(
            shader.written_names(),
            vec![
                "material.diffuseColor",
                "material.specularColor",
                "material.shininess"
            ]
        );
        assert_eq!(shader.float_value("material.shininess"), Some(52.0));

        shader.clear_writes();
        assert!(!binder.set_material(&mut shader, &materials, "glass"));
        assert!(shader.writes().is_empty());
    }
}
