//! # Primitive Shape Generation
//!
//! Procedural meshes for every [`MeshKind`](crate::scene::MeshKind). All shapes
//! are Y-up, wound counter-clockwise when seen from outside, and carry normals
//! and texture coordinates.

use super::GeometryData;
use std::f32::consts::PI;

/// Generate a unit box centered at the origin
///
/// Returns a box with vertices from -0.5 to 0.5 on all axes.
/// Each face has its own four vertices so normals stay flat and every face
/// maps the full texture.
pub fn generate_box() -> GeometryData {
    let mut data = GeometryData::new();

    let positions = [
        // Front face (+Z)
        [-0.5, -0.5,  0.5], [ 0.5, -0.5,  0.5], [ 0.5,  0.5,  0.5], [-0.5,  0.5,  0.5],
        // Back face (-Z)
        [-0.5, -0.5, -0.5], [-0.5,  0.5, -0.5], [ 0.5,  0.5, -0.5], [ 0.5, -0.5, -0.5],
        // Left face (-X)
        [-0.5, -0.5, -0.5], [-0.5, -0.5,  0.5], [-0.5,  0.5,  0.5], [-0.5,  0.5, -0.5],
        // Right face (+X)
        [ 0.5, -0.5,  0.5], [ 0.5, -0.5, -0.5], [ 0.5,  0.5, -0.5], [ 0.5,  0.5,  0.5],
        // Top face (+Y)
        [-0.5,  0.5,  0.5], [ 0.5,  0.5,  0.5], [ 0.5,  0.5, -0.5], [-0.5,  0.5, -0.5],
        // Bottom face (-Y)
        [-0.5, -0.5, -0.5], [ 0.5, -0.5, -0.5], [ 0.5, -0.5,  0.5], [-0.5, -0.5,  0.5],
    ];

    let tex_coords = [
        [0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0],
        [1.0, 0.0], [1.0, 1.0], [0.0, 1.0], [0.0, 0.0],
        [0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0],
        [0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0],
        [0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0],
        [0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0],
    ];

    let face_normals = [
        [0.0, 0.0, 1.0],
        [0.0, 0.0, -1.0],
        [-1.0, 0.0, 0.0],
        [1.0, 0.0, 0.0],
        [0.0, 1.0, 0.0],
        [0.0, -1.0, 0.0],
    ];

    data.vertices = positions.to_vec();
    data.tex_coords = tex_coords.to_vec();
    data.normals = face_normals
        .iter()
        .flat_map(|normal| std::iter::repeat(*normal).take(4))
        .collect();

    for face in 0..6u32 {
        let base = face * 4;
        data.indices
            .extend_from_slice(&[base, base + 1, base + 2, base + 2, base + 3, base]);
    }

    data
}

/// Generate a UV sphere with specified resolution
///
/// # Arguments
/// * `longitude_segments` - Number of vertical segments (longitude lines)
/// * `latitude_segments` - Number of horizontal segments (latitude lines)
///
/// Returns a sphere of radius 1.0 centered at the origin.
pub fn generate_sphere(longitude_segments: u32, latitude_segments: u32) -> GeometryData {
    let mut data = GeometryData::new();

    let long_segs = longitude_segments.max(3);
    let lat_segs = latitude_segments.max(2);

    for lat in 0..=lat_segs {
        let theta = lat as f32 * PI / lat_segs as f32; // 0 at the north pole
        let sin_theta = theta.sin();
        let cos_theta = theta.cos();

        for long in 0..=long_segs {
            let phi = long as f32 * 2.0 * PI / long_segs as f32;
            let x = sin_theta * phi.cos();
            let y = cos_theta;
            let z = sin_theta * phi.sin();

            data.vertices.push([x, y, z]);
            data.normals.push([x, y, z]);
            data.tex_coords.push([
                long as f32 / long_segs as f32,
                1.0 - lat as f32 / lat_segs as f32,
            ]);
        }
    }

    for lat in 0..lat_segs {
        for long in 0..long_segs {
            let first = lat * (long_segs + 1) + long;
            let second = first + long_segs + 1;

            data.indices.extend_from_slice(&[first, first + 1, second]);
            data.indices.extend_from_slice(&[second, first + 1, second + 1]);
        }
    }

    data
}

/// Generate a plane in the XZ plane facing +Y
///
/// # Arguments
/// * `width` - Extent along X
/// * `depth` - Extent along Z
/// * `width_segments` - Number of subdivisions along X
/// * `depth_segments` - Number of subdivisions along Z
pub fn generate_plane(width: f32, depth: f32, width_segments: u32, depth_segments: u32) -> GeometryData {
    let mut data = GeometryData::new();

    let w_segs = width_segments.max(1);
    let d_segs = depth_segments.max(1);

    for row in 0..=d_segs {
        let v = row as f32 / d_segs as f32;
        let pos_z = (v - 0.5) * depth;

        for col in 0..=w_segs {
            let u = col as f32 / w_segs as f32;
            let pos_x = (u - 0.5) * width;

            data.vertices.push([pos_x, 0.0, pos_z]);
            data.normals.push([0.0, 1.0, 0.0]);
            data.tex_coords.push([u, 1.0 - v]);
        }
    }

    for row in 0..d_segs {
        for col in 0..w_segs {
            let i = row * (w_segs + 1) + col;
            let next_row = i + w_segs + 1;

            data.indices.extend_from_slice(&[i, next_row, i + 1]);
            data.indices.extend_from_slice(&[next_row, next_row + 1, i + 1]);
        }
    }

    data
}

/// Generate a capped cylinder standing on the XZ plane
///
/// # Arguments
/// * `radius` - Radius of the cylinder
/// * `height` - Height along +Y; the base sits at y = 0
/// * `segments` - Number of circular segments
pub fn generate_cylinder(radius: f32, height: f32, segments: u32) -> GeometryData {
    let mut data = GeometryData::new();

    let segs = segments.max(3);

    // Side
    for i in 0..=segs {
        let angle = i as f32 * 2.0 * PI / segs as f32;
        let (sin_a, cos_a) = angle.sin_cos();
        let x = radius * cos_a;
        let z = radius * sin_a;
        let u = i as f32 / segs as f32;

        data.vertices.push([x, 0.0, z]);
        data.normals.push([cos_a, 0.0, sin_a]);
        data.tex_coords.push([u, 0.0]);

        data.vertices.push([x, height, z]);
        data.normals.push([cos_a, 0.0, sin_a]);
        data.tex_coords.push([u, 1.0]);
    }

    for i in 0..segs {
        let bottom_current = i * 2;
        let top_current = bottom_current + 1;
        let bottom_next = bottom_current + 2;
        let top_next = bottom_next + 1;

        data.indices
            .extend_from_slice(&[bottom_current, top_current, bottom_next]);
        data.indices
            .extend_from_slice(&[top_current, top_next, bottom_next]);
    }

    // Caps get their own rim vertices so their normals stay flat.
    for (y, normal_y) in [(0.0, -1.0f32), (height, 1.0)] {
        let center = data.vertices.len() as u32;
        data.vertices.push([0.0, y, 0.0]);
        data.normals.push([0.0, normal_y, 0.0]);
        data.tex_coords.push([0.5, 0.5]);

        for i in 0..=segs {
            let angle = i as f32 * 2.0 * PI / segs as f32;
            let (sin_a, cos_a) = angle.sin_cos();
            data.vertices.push([radius * cos_a, y, radius * sin_a]);
            data.normals.push([0.0, normal_y, 0.0]);
            data.tex_coords.push([0.5 + 0.5 * cos_a, 0.5 + 0.5 * sin_a]);
        }

        for i in 0..segs {
            let current = center + 1 + i;
            let next = current + 1;
            if normal_y < 0.0 {
                data.indices.extend_from_slice(&[center, current, next]);
            } else {
                data.indices.extend_from_slice(&[center, next, current]);
            }
        }
    }

    data
}

/// Generate a torus lying in the XY plane, centered at the origin
///
/// # Arguments
/// * `main_radius` - Distance from the center to the middle of the tube
/// * `tube_radius` - Radius of the tube
/// * `main_segments` - Segments around the main ring
/// * `tube_segments` - Segments around the tube
pub fn generate_torus(
    main_radius: f32,
    tube_radius: f32,
    main_segments: u32,
    tube_segments: u32,
) -> GeometryData {
    let mut data = GeometryData::new();

    let main_segs = main_segments.max(3);
    let tube_segs = tube_segments.max(3);

    for i in 0..=main_segs {
        let u = i as f32 * 2.0 * PI / main_segs as f32;
        let (sin_u, cos_u) = u.sin_cos();

        for j in 0..=tube_segs {
            let v = j as f32 * 2.0 * PI / tube_segs as f32;
            let (sin_v, cos_v) = v.sin_cos();

            let normal = [cos_v * cos_u, cos_v * sin_u, sin_v];
            data.vertices.push([
                main_radius * cos_u + tube_radius * normal[0],
                main_radius * sin_u + tube_radius * normal[1],
                tube_radius * normal[2],
            ]);
            data.normals.push(normal);
            data.tex_coords.push([
                i as f32 / main_segs as f32,
                j as f32 / tube_segs as f32,
            ]);
        }
    }

    for i in 0..main_segs {
        for j in 0..tube_segs {
            let a = i * (tube_segs + 1) + j;
            let b = a + tube_segs + 1;

            data.indices.extend_from_slice(&[a, b, a + 1]);
            data.indices.extend_from_slice(&[b, b + 1, a + 1]);
        }
    }

    data
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_consistent(data: &GeometryData) {
        assert_eq!(data.vertices.len(), data.normals.len());
        assert_eq!(data.vertices.len(), data.tex_coords.len());
        assert_eq!(data.indices.len() % 3, 0);
        assert!(data
            .indices
            .iter()
            .all(|&i| (i as usize) < data.vertices.len()));
    }

    #[test]
    fn test_box_generation() {
        let cube = generate_box();
        assert_eq!(cube.vertices.len(), 24); // 6 faces * 4 vertices
        assert_eq!(cube.indices.len(), 36); // 6 faces * 2 triangles * 3 indices
        assert_eq!(cube.vertex_count(), 24);
        assert_eq!(cube.triangle_count(), 12);
        assert_consistent(&cube);
    }

    #[test]
    fn test_sphere_generation() {
        let sphere = generate_sphere(8, 6);
        assert_eq!(sphere.vertices.len(), 9 * 7);
        assert_consistent(&sphere);
        for v in &sphere.vertices {
            let len = (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt();
            assert!((len - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn test_plane_generation() {
        let plane = generate_plane(2.0, 2.0, 2, 2);
        assert_eq!(plane.vertices.len(), 9); // 3x3 grid
        assert_eq!(plane.indices.len(), 24); // 4 quads * 2 triangles * 3 indices
        assert!(plane.vertices.iter().all(|v| v[1] == 0.0));
        assert_consistent(&plane);
    }

    #[test]
    fn test_cylinder_spans_base_to_height() {
        let cylinder = generate_cylinder(1.0, 1.0, 12);
        assert_consistent(&cylinder);
        let min_y = cylinder.vertices.iter().map(|v| v[1]).fold(f32::MAX, f32::min);
        let max_y = cylinder.vertices.iter().map(|v| v[1]).fold(f32::MIN, f32::max);
        assert_eq!(min_y, 0.0);
        assert_eq!(max_y, 1.0);
    }

    #[test]
    fn test_torus_lies_in_xy_plane() {
        let torus = generate_torus(1.0, 0.2, 16, 8);
        assert_consistent(&torus);
        assert_eq!(torus.triangle_count(), 16 * 8 * 2);
        for v in &torus.vertices {
            assert!(v[2].abs() <= 0.2 + 1e-5);
            let ring = (v[0] * v[0] + v[1] * v[1]).sqrt();
            assert!(ring >= 0.8 - 1e-5 && ring <= 1.2 + 1e-5);
        }
    }
}
