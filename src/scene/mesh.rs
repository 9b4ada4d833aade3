//! Mesh library collaborator
//!
//! Meshes are a fixed set of procedural primitives. A library loads each kind
//! once during preparation and later draws it using whatever state the shader
//! currently holds.

use std::fmt;

use super::shader::ShaderContext;

/// The primitive shapes a draw block can reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MeshKind {
    Plane,
    Sphere,
    Cylinder,
    Torus,
    Box,
}

impl MeshKind {
    /// Every kind, in the order they are loaded during preparation.
    pub const ALL: [MeshKind; 5] = [
        MeshKind::Plane,
        MeshKind::Sphere,
        MeshKind::Cylinder,
        MeshKind::Torus,
        MeshKind::Box,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            MeshKind::Plane => "plane",
            MeshKind::Sphere => "sphere",
            MeshKind::Cylinder => "cylinder",
            MeshKind::Torus => "torus",
            MeshKind::Box => "box",
        }
    }
}

impl fmt::Display for MeshKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Loads and draws primitive meshes.
///
/// `draw_mesh` consumes the shader's current state: a backend that defers
/// submission must snapshot what it needs from `shader` at call time.
pub trait MeshLibrary<S: ShaderContext + ?Sized> {
    fn load_mesh(&mut self, kind: MeshKind);

    fn draw_mesh(&mut self, kind: MeshKind, shader: &S);
}
