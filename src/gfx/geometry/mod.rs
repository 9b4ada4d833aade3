//! # Procedural Geometry Generation
//!
//! Generates the primitive shapes the scene is built from, so no model files
//! are needed.
//!
//! ## Supported Primitives
//!
//! - **Box**: Unit box centered at the origin
//! - **Sphere**: UV sphere of radius 1
//! - **Plane**: Flat XZ plane facing +Y
//! - **Cylinder**: Radius 1, base at y = 0, top at y = 1
//! - **Torus**: Ring of radius 1 in the XY plane, tube radius 0.2
//!
//! ## Usage
//!
//! ```rust
//! use desk_scene::gfx::geometry::GeometryData;
//! use desk_scene::scene::MeshKind;
//!
//! let torus = GeometryData::for_mesh(MeshKind::Torus);
//! assert!(torus.triangle_count() > 0);
//! ```

pub mod primitives;

pub use primitives::*;

use crate::gfx::rendering::vertex::Vertex3D;
use crate::scene::MeshKind;

/// Represents generated geometry data ready for GPU upload
#[derive(Debug, Clone, Default)]
pub struct GeometryData {
    /// Vertex positions (x, y, z)
    pub vertices: Vec<[f32; 3]>,
    /// Texture coordinates (u, v)
    pub tex_coords: Vec<[f32; 2]>,
    /// Normal vectors (x, y, z)
    pub normals: Vec<[f32; 3]>,
    /// Triangle indices (counter-clockwise winding)
    pub indices: Vec<u32>,
}

impl GeometryData {
    /// Create a new empty geometry data structure
    pub fn new() -> Self {
        Self::default()
    }

    /// Geometry for a scene mesh kind at its canonical size and resolution.
    pub fn for_mesh(kind: MeshKind) -> Self {
        match kind {
            MeshKind::Plane => generate_plane(1.0, 1.0, 1, 1),
            MeshKind::Sphere => generate_sphere(48, 24),
            MeshKind::Cylinder => generate_cylinder(1.0, 1.0, 48),
            MeshKind::Torus => generate_torus(1.0, 0.2, 48, 16),
            MeshKind::Box => generate_box(),
        }
    }

    /// Get the number of vertices in this geometry
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Get the number of triangles in this geometry
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Interleaves positions, normals and texture coordinates for the vertex buffer.
    pub fn to_vertices(&self) -> Vec<Vertex3D> {
        self.vertices
            .iter()
            .enumerate()
            .map(|(i, position)| Vertex3D {
                position: *position,
                normal: self.normals.get(i).copied().unwrap_or([0.0, 1.0, 0.0]),
                tex_coords: self.tex_coords.get(i).copied().unwrap_or([0.0, 0.0]),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_mesh_kind_has_geometry() {
        for kind in MeshKind::ALL {
            let data = GeometryData::for_mesh(kind);
            assert!(data.triangle_count() > 0, "{}", kind);
            assert_eq!(data.to_vertices().len(), data.vertex_count());
        }
    }
}
