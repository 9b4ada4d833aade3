//! Declarative scene description
//!
//! A [`SceneDefinition`] lists what preparation loads (textures, materials,
//! lights, meshes) and what each frame draws: a sequence of named objects,
//! each a list of [`DrawBlock`]s producing exactly one draw call apiece.

use std::path::PathBuf;

use cgmath::{Vector2, Vector4};

use super::{
    lights::SceneLights, materials::MaterialEntry, mesh::MeshKind, transform::TransformSpec,
    view::Camera,
};

/// An image file to register under `tag`.
#[derive(Debug, Clone, PartialEq)]
pub struct TextureSource {
    pub path: PathBuf,
    pub tag: String,
}

impl TextureSource {
    pub fn new(path: impl Into<PathBuf>, tag: &str) -> Self {
        Self {
            path: path.into(),
            tag: tag.to_string(),
        }
    }
}

/// Material values before validation by the registry.
#[derive(Debug, Clone, PartialEq)]
pub struct MaterialSource {
    pub tag: String,
    pub diffuse: [f32; 3],
    pub specular: [f32; 3],
    pub shininess: f32,
}

impl MaterialSource {
    pub fn new(tag: &str, diffuse: [f32; 3], specular: [f32; 3], shininess: f32) -> Self {
        Self {
            tag: tag.to_string(),
            diffuse,
            specular,
            shininess,
        }
    }

    pub fn to_entry(&self) -> crate::error::Result<MaterialEntry> {
        MaterialEntry::new(
            &self.tag,
            self.diffuse.into(),
            self.specular.into(),
            self.shininess,
        )
    }
}

/// Surface source for a draw.
#[derive(Debug, Clone, PartialEq)]
pub enum Appearance {
    Color(Vector4<f32>),
    Texture(String),
}

/// One mesh draw with its transform and appearance.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawBlock {
    pub mesh: MeshKind,
    pub transform: TransformSpec,
    pub appearance: Appearance,
    /// Left untouched from the previous draw when `None`
    pub uv_scale: Option<Vector2<f32>>,
    /// Left untouched from the previous draw when `None`
    pub material: Option<String>,
}

impl DrawBlock {
    /// A white, untransformed draw of `mesh`.
    pub fn new(mesh: MeshKind) -> Self {
        Self {
            mesh,
            transform: TransformSpec::default(),
            appearance: Appearance::Color(Vector4::new(1.0, 1.0, 1.0, 1.0)),
            uv_scale: None,
            material: None,
        }
    }

    pub fn scaled(mut self, x: f32, y: f32, z: f32) -> Self {
        self.transform = self.transform.with_scale(x, y, z);
        self
    }

    pub fn rotated(mut self, x_deg: f32, y_deg: f32, z_deg: f32) -> Self {
        self.transform = self.transform.with_rotation(x_deg, y_deg, z_deg);
        self
    }

    pub fn at(mut self, x: f32, y: f32, z: f32) -> Self {
        self.transform = self.transform.with_translation(x, y, z);
        self
    }

    pub fn colored(mut self, r: f32, g: f32, b: f32, a: f32) -> Self {
        self.appearance = Appearance::Color(Vector4::new(r, g, b, a));
        self
    }

    pub fn textured(mut self, tag: &str) -> Self {
        self.appearance = Appearance::Texture(tag.to_string());
        self
    }

    pub fn uv_scale(mut self, u: f32, v: f32) -> Self {
        self.uv_scale = Some(Vector2::new(u, v));
        self
    }

    pub fn material(mut self, tag: &str) -> Self {
        self.material = Some(tag.to_string());
        self
    }
}

/// A named group of draw blocks, drawn in order.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneObject {
    pub name: String,
    pub blocks: Vec<DrawBlock>,
}

impl SceneObject {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            blocks: Vec::new(),
        }
    }

    pub fn with_block(mut self, block: DrawBlock) -> Self {
        self.blocks.push(block);
        self
    }
}

/// Everything needed to prepare and draw a static scene.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneDefinition {
    pub textures: Vec<TextureSource>,
    pub materials: Vec<MaterialSource>,
    pub lights: SceneLights,
    pub meshes: Vec<MeshKind>,
    pub camera: Camera,
    pub objects: Vec<SceneObject>,
}

impl Default for SceneDefinition {
    fn default() -> Self {
        Self {
            textures: Vec::new(),
            materials: Vec::new(),
            lights: SceneLights::default(),
            meshes: MeshKind::ALL.to_vec(),
            camera: Camera::default(),
            objects: Vec::new(),
        }
    }
}

impl SceneDefinition {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_texture(mut self, path: impl Into<PathBuf>, tag: &str) -> Self {
        self.textures.push(TextureSource::new(path, tag));
        self
    }

    pub fn with_material(mut self, material: MaterialSource) -> Self {
        self.materials.push(material);
        self
    }

    pub fn with_lights(mut self, lights: SceneLights) -> Self {
        self.lights = lights;
        self
    }

    pub fn with_camera(mut self, camera: Camera) -> Self {
        self.camera = camera;
        self
    }

    pub fn with_object(mut self, object: SceneObject) -> Self {
        self.objects.push(object);
        self
    }

    /// Total number of draw calls per frame.
    pub fn draw_count(&self) -> usize {
        self.objects.iter().map(|object| object.blocks.len()).sum()
    }
}
