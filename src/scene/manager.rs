//! Scene preparation and rendering
//!
//! [`SceneManager`] owns the registries and collaborators for one scene. It
//! is prepared exactly once, then [`SceneManager::render`] walks the scene
//! definition each frame, binding transform and appearance state before every
//! mesh draw.

use super::{
    binder::ShaderStateBinder,
    definition::{Appearance, DrawBlock, SceneDefinition},
    materials::MaterialRegistry,
    mesh::MeshLibrary,
    shader::ShaderContext,
    textures::{TextureBackend, TextureRegistry},
    view::{Camera, ProjectionMode},
};
use crate::error::{Result, SceneError};

/// Outcome of [`SceneManager::prepare`]. Failures listed here were logged and skipped.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct PrepareReport {
    /// `(tag, slot)` of each texture that loaded
    pub loaded_textures: Vec<(String, usize)>,
    /// `(tag, reason)` of each texture that did not
    pub failed_textures: Vec<(String, String)>,
    pub meshes_loaded: usize,
    pub materials_defined: usize,
    /// `(tag, reason)` of each material rejected by the registry
    pub rejected_materials: Vec<(String, String)>,
    pub lights_applied: bool,
}

/// Counters for one [`SceneManager::render`] call.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FrameStats {
    pub draws: usize,
    /// Draws whose texture tag did not resolve and fell back to flat color
    pub texture_fallbacks: usize,
    /// Draws whose material tag did not resolve
    pub material_misses: usize,
    /// Draws skipped because no shader is attached
    pub skipped_draws: usize,
}

/// Prepares and renders a [`SceneDefinition`].
///
/// Generic over the shader (`S`), mesh library (`M`) and texture backend
/// (`B`) so the same walk drives both the GPU and the recording backends.
pub struct SceneManager<S, M, B>
where
    S: ShaderContext,
    M: MeshLibrary<S>,
    B: TextureBackend,
{
    shader: Option<S>,
    meshes: M,
    textures: TextureRegistry<B>,
    materials: MaterialRegistry,
    binder: ShaderStateBinder,
    definition: SceneDefinition,
    projection_mode: ProjectionMode,
    aspect_ratio: f32,
    prepared: bool,
}

impl<S, M, B> SceneManager<S, M, B>
where
    S: ShaderContext,
    M: MeshLibrary<S>,
    B: TextureBackend,
{
    /// Creates an unprepared manager.
    ///
    /// # Arguments
    /// * `definition` - What to load and draw
    /// * `shader` - Uniform sink; with `None` all shader writes and draws are skipped
    /// * `meshes` - Mesh library
    /// * `textures` - Empty texture registry
    pub fn new(
        definition: SceneDefinition,
        shader: Option<S>,
        meshes: M,
        textures: TextureRegistry<B>,
    ) -> Self {
        Self {
            shader,
            meshes,
            textures,
            materials: MaterialRegistry::new(),
            binder: ShaderStateBinder::default(),
            definition,
            projection_mode: ProjectionMode::default(),
            aspect_ratio: 1.0,
            prepared: false,
        }
    }

    pub fn with_binder(mut self, binder: ShaderStateBinder) -> Self {
        self.binder = binder;
        self
    }

    pub fn with_projection_mode(mut self, mode: ProjectionMode) -> Self {
        self.projection_mode = mode;
        self
    }

    /// Initial width/height ratio. Non-positive or non-finite ratios are ignored.
    pub fn with_aspect_ratio(mut self, aspect_ratio: f32) -> Self {
        self.set_aspect_ratio(aspect_ratio);
        self
    }

    /// One-time setup: textures, meshes, materials and lights, in that order.
    ///
    /// Texture and material failures are logged and reported, never fatal.
    pub fn prepare(&mut self) -> Result<PrepareReport> {
        if self.prepared {
            return Err(SceneError::AlreadyPrepared);
        }

        let mut report = PrepareReport::default();

        for source in &self.definition.textures {
            match self.textures.load_texture(&source.path, &source.tag) {
                Ok(slot) => report.loaded_textures.push((source.tag.clone(), slot)),
                Err(err) => {
                    log::error!("Skipping texture '{}': {}", source.tag, err);
                    report
                        .failed_textures
                        .push((source.tag.clone(), err.to_string()));
                }
            }
        }
        self.textures.bind_all();

        for kind in &self.definition.meshes {
            self.meshes.load_mesh(*kind);
            report.meshes_loaded += 1;
        }

        for source in &self.definition.materials {
            match source.to_entry() {
                Ok(entry) => {
                    self.materials.insert(entry);
                    report.materials_defined += 1;
                }
                Err(err) => {
                    log::error!("Skipping material '{}': {}", source.tag, err);
                    report
                        .rejected_materials
                        .push((source.tag.clone(), err.to_string()));
                }
            }
        }

        if let Some(shader) = self.shader.as_mut() {
            shader.use_program();
            self.binder.reset_material(shader);
            self.definition.lights.apply(shader);
            report.lights_applied = true;
        } else {
            log::warn!("No shader attached; lights were not applied");
        }

        self.prepared = true;
        log::info!(
            "Scene prepared: {}/{} textures, {} meshes, {} materials",
            report.loaded_textures.len(),
            self.definition.textures.len(),
            report.meshes_loaded,
            report.materials_defined
        );
        Ok(report)
    }

    /// Draws every object of the scene in definition order.
    ///
    /// Missing textures degrade to flat color and missing materials keep the
    /// previous values; neither aborts the frame.
    pub fn render(&mut self) -> Result<FrameStats> {
        if !self.prepared {
            return Err(SceneError::NotPrepared);
        }

        let mut stats = FrameStats::default();

        let Some(shader) = self.shader.as_mut() else {
            stats.skipped_draws = self.definition.draw_count();
            log::debug!("No shader attached; skipped {} draws", stats.skipped_draws);
            return Ok(stats);
        };

        shader.use_program();
        self.definition
            .camera
            .apply(shader, self.projection_mode, self.aspect_ratio);

        for object in &self.definition.objects {
            log::trace!("Drawing '{}' ({} blocks)", object.name, object.blocks.len());
            for block in &object.blocks {
                Self::bind_block(
                    &self.binder,
                    shader,
                    &self.textures,
                    &self.materials,
                    block,
                    &mut stats,
                );
                self.meshes.draw_mesh(block.mesh, shader);
                stats.draws += 1;
            }
        }

        Ok(stats)
    }

    /// Applies transform, appearance, UV scale and material for one block.
    fn bind_block(
        binder: &ShaderStateBinder,
        shader: &mut S,
        textures: &TextureRegistry<B>,
        materials: &MaterialRegistry,
        block: &DrawBlock,
        stats: &mut FrameStats,
    ) {
        block.transform.apply(shader);

        match &block.appearance {
            Appearance::Color(color) => binder.set_flat_color(shader, *color),
            Appearance::Texture(tag) => {
                if binder.set_texture(shader, textures, tag).is_err() {
                    stats.texture_fallbacks += 1;
                }
            }
        }

        if let Some(uv) = block.uv_scale {
            binder.set_uv_scale(shader, uv.x, uv.y);
        }

        if let Some(tag) = &block.material {
            if !binder.set_material(shader, materials, tag) {
                stats.material_misses += 1;
            }
        }
    }

    /// Records a new width/height ratio and pushes the matching projection.
    ///
    /// A ratio that is not a positive finite number is logged and dropped;
    /// the previous ratio stays in effect.
    pub fn update_projection(&mut self, aspect_ratio: f32) {
        if self.set_aspect_ratio(aspect_ratio) {
            self.push_camera();
        }
    }

    fn set_aspect_ratio(&mut self, aspect_ratio: f32) -> bool {
        if !(aspect_ratio.is_finite() && aspect_ratio > 0.0) {
            log::warn!(
                "Ignoring aspect ratio {}; keeping {}",
                aspect_ratio,
                self.aspect_ratio
            );
            return false;
        }
        self.aspect_ratio = aspect_ratio;
        true
    }

    pub fn camera(&self) -> &Camera {
        &self.definition.camera
    }

    /// Replaces the viewer and pushes the new view and projection.
    pub fn set_camera(&mut self, camera: Camera) {
        self.definition.camera = camera;
        self.push_camera();
    }

    pub fn set_projection_mode(&mut self, mode: ProjectionMode) {
        if self.projection_mode != mode {
            log::info!("Switching to {} projection", mode);
        }
        self.projection_mode = mode;
        self.push_camera();
    }

    fn push_camera(&mut self) {
        if let Some(shader) = self.shader.as_mut() {
            self.definition
                .camera
                .apply(shader, self.projection_mode, self.aspect_ratio);
        }
    }

    pub fn projection_mode(&self) -> ProjectionMode {
        self.projection_mode
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.aspect_ratio
    }

    pub fn is_prepared(&self) -> bool {
        self.prepared
    }

    pub fn definition(&self) -> &SceneDefinition {
        &self.definition
    }

    pub fn shader(&self) -> Option<&S> {
        self.shader.as_ref()
    }

    pub fn shader_mut(&mut self) -> Option<&mut S> {
        self.shader.as_mut()
    }

    pub fn meshes(&self) -> &M {
        &self.meshes
    }

    pub fn meshes_mut(&mut self) -> &mut M {
        &mut self.meshes
    }

    pub fn textures(&self) -> &TextureRegistry<B> {
        &self.textures
    }

    pub fn materials(&self) -> &MaterialRegistry {
        &self.materials
    }

    /// Split borrow of shader, meshes and textures, for backends that
    /// submit recorded draws after [`Self::render`].
    pub fn parts_mut(&mut self) -> (Option<&mut S>, &mut M, &mut TextureRegistry<B>) {
        (self.shader.as_mut(), &mut self.meshes, &mut self.textures)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{
        definition::{MaterialSource, SceneObject},
        mesh::MeshKind,
        recording::{HeadlessTextures, RecordingMeshes, RecordingShader, UniformValue},
        textures::DecodedImage,
    };
    use cgmath::{Point3, Vector3, Vector4};
    use std::path::Path;

    type TestManager = SceneManager<RecordingShader, RecordingMeshes, HeadlessTextures>;

    fn rgba_decoder(path: &Path) -> std::result::Result<DecodedImage, String> {
        if path.to_string_lossy().contains("broken") {
            return Err("corrupt file".to_string());
        }
        Ok(DecodedImage {
            width: 4,
            height: 4,
            channels: 4,
            pixels: vec![0; 64],
        })
    }

    fn small_scene() -> SceneDefinition {
        SceneDefinition::new()
            .with_texture("wood.png", "wood")
            .with_texture("broken.png", "broken")
            .with_material(MaterialSource::new("metal", [0.7, 0.7, 0.7], [1.0, 1.0, 1.0], 100.0))
            .with_material(MaterialSource::new("bad", [0.7, 0.7, 0.7], [1.0, 1.0, 1.0], 0.0))
            .with_object(
                SceneObject::new("desk")
                    .with_block(
                        DrawBlock::new(MeshKind::Box)
                            .textured("wood")
                            .uv_scale(2.0, 2.0)
                            .material("metal"),
                    )
                    .with_block(DrawBlock::new(MeshKind::Sphere).textured("broken"))
                    .with_block(
                        DrawBlock::new(MeshKind::Torus)
                            .colored(0.0, 0.0, 0.0, 1.0)
                            .material("glass"),
                    ),
            )
    }

    fn manager(shader: Option<RecordingShader>) -> TestManager {
        let textures =
            TextureRegistry::new(HeadlessTextures::new(), 16).with_decoder(rgba_decoder);
        SceneManager::new(small_scene(), shader, RecordingMeshes::new(), textures)
    }

    #[test]
    fn test_render_before_prepare() {
        let mut scene = manager(Some(RecordingShader::new()));
        assert!(matches!(scene.render(), Err(SceneError::NotPrepared)));
    }

    #[test]
    fn test_prepare_twice() {
        let mut scene = manager(Some(RecordingShader::new()));
        scene.prepare().unwrap();
        assert!(matches!(scene.prepare(), Err(SceneError::AlreadyPrepared)));
    }

    #[test]
    fn test_prepare_report() {
        let mut scene = manager(Some(RecordingShader::new()));
        let report = scene.prepare().unwrap();

        assert_eq!(report.loaded_textures, vec![("wood".to_string(), 0)]);
        assert_eq!(report.failed_textures.len(), 1);
        assert_eq!(report.failed_textures[0].0, "broken");
        assert_eq!(report.meshes_loaded, 5);
        assert_eq!(report.materials_defined, 1);
        assert_eq!(report.rejected_materials.len(), 1);
        assert!(report.lights_applied);

        assert_eq!(scene.meshes().loaded(), &MeshKind::ALL);
        assert_eq!(scene.textures().backend().bindings(), &[(0, 0)]);
    }

    #[test]
    fn test_render_binds_before_each_draw() {
        let mut scene = manager(Some(RecordingShader::new()));
        scene.prepare().unwrap();
        let stats = scene.render().unwrap();

        assert_eq!(
            stats,
            FrameStats {
                draws: 3,
                texture_fallbacks: 1,
                material_misses: 1,
                skipped_draws: 0,
            }
        );

        let draws = scene.meshes().draws();
        assert_eq!(draws.len(), 3);

        assert_eq!(draws[0].mesh, MeshKind::Box);
        assert!(draws[0].uses_texture());
        assert_eq!(draws[0].state.get("objectTexture"), Some(&UniformValue::Int(0)));
        assert_eq!(draws[0].state.get("material.shininess"), Some(&UniformValue::Float(100.0)));

        // Unresolved texture falls back to flat color.
        assert!(!draws[1].uses_texture());
        assert_eq!(
            draws[1].state.get("objectColor"),
            Some(&UniformValue::Vec4(Vector4::new(1.0, 0.0, 1.0, 1.0)))
        );

        // Unknown material keeps the previous values.
        assert!(!draws[2].uses_texture());
        assert_eq!(draws[2].state.get("material.shininess"), Some(&UniformValue::Float(100.0)));
    }

    #[test]
    fn test_write_order_within_block() {
        let mut scene = manager(Some(RecordingShader::new()));
        scene.prepare().unwrap();
        scene.shader_mut().unwrap().clear_writes();
        scene.render().unwrap();

        let names = scene.shader().unwrap().written_names();
        let first_model = names.iter().position(|n| *n == "model").unwrap();
        assert_eq!(
            &names[first_model..first_model + 8],
            &[
                "model",
                "bUseTexture",
                "objectTexture",
                "UVscale",
                "material.diffuseColor",
                "material.specularColor",
                "material.shininess",
                "model",
            ]
        );
    }

    #[test]
    fn test_render_without_shader_skips_draws() {
        let mut scene = manager(None);
        let report = scene.prepare().unwrap();
        assert!(!report.lights_applied);

        let stats = scene.render().unwrap();
        assert_eq!(stats.draws, 0);
        assert_eq!(stats.skipped_draws, 3);
        assert!(scene.meshes().draws().is_empty());
    }

    #[test]
    fn test_projection_updates() {
        let mut scene = manager(Some(RecordingShader::new()));
        scene.update_projection(2.0);
        let perspective = scene.shader().unwrap().mat4_value("projection").unwrap();

        scene.set_projection_mode(ProjectionMode::Orthographic);
        let orthographic = scene.shader().unwrap().mat4_value("projection").unwrap();

        assert_eq!(scene.projection_mode(), ProjectionMode::Orthographic);
        assert_eq!(scene.aspect_ratio(), 2.0);
        assert_ne!(perspective, orthographic);
    }

    #[test]
    fn test_invalid_aspect_ratios_are_ignored() {
        let mut scene = manager(Some(RecordingShader::new())).with_aspect_ratio(0.0);
        assert_eq!(scene.aspect_ratio(), 1.0);

        scene.prepare().unwrap();
        scene.update_projection(1.5);
        let projection = scene.shader().unwrap().mat4_value("projection").unwrap();

        for aspect in [0.0, -2.0, f32::NAN, f32::INFINITY] {
            scene.update_projection(aspect);
            assert_eq!(scene.aspect_ratio(), 1.5, "aspect {}", aspect);
            assert_eq!(
                scene.shader().unwrap().mat4_value("projection"),
                Some(projection)
            );
        }

        assert_eq!(scene.render().unwrap().draws, 3);
    }

    #[test]
    fn test_set_camera_pushes_view() {
        let mut scene = manager(Some(RecordingShader::new()));
        scene.prepare().unwrap();

        let camera = Camera::looking_at(Point3::new(3.0, 2.0, 1.0), Point3::new(0.0, 0.0, 0.0));
        scene.set_camera(camera);

        assert_eq!(scene.camera(), &camera);
        assert_eq!(
            scene.shader().unwrap().mat4_value("view"),
            Some(camera.view_matrix())
        );

        scene.render().unwrap();
        assert_eq!(
            scene.shader().unwrap().vec3_value("viewPosition"),
            Some(Vector3::new(3.0, 2.0, 1.0))
        );
    }
}
