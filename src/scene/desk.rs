//! The desk scene
//!
//! A textured table against a drywall wall with a window, a basketball, a
//! laptop and a coffee mug, lit by a warm directional light and five point
//! lights.

use std::path::Path;

use cgmath::{Point3, Vector3};

use super::{
    definition::{DrawBlock, MaterialSource, SceneDefinition, SceneObject},
    lights::{DirectionalLight, PointLight, SceneLights},
    mesh::MeshKind,
    view::Camera,
};

/// `(file name, tag)` of every texture the desk scene uses.
pub const DESK_TEXTURES: [(&str, &str); 4] = [
    ("rusticwood.jpg", "table"),
    ("drywall.jpg", "wall"),
    ("ball.jpg", "ball"),
    ("window.jpg", "window"),
];

/// Builds the desk scene, resolving texture files inside `texture_dir`.
pub fn desk_scene(texture_dir: &Path) -> SceneDefinition {
    let mut definition = SceneDefinition::new()
        .with_camera(Camera::looking_at(
            Point3::new(4.0, 12.0, 38.0),
            Point3::new(4.0, 6.0, 0.0),
        ))
        .with_lights(desk_lights());

    for (file, tag) in DESK_TEXTURES {
        definition = definition.with_texture(texture_dir.join(file), tag);
    }

    definition
        .with_material(MaterialSource::new("ball", [0.4, 0.4, 0.4], [0.7, 0.7, 0.6], 52.0))
        .with_material(MaterialSource::new("wood", [0.2, 0.2, 0.3], [0.0, 0.0, 0.0], 0.1))
        .with_material(MaterialSource::new("mug", [0.8, 0.5, 0.3], [0.2, 0.2, 0.2], 10.0))
        .with_material(MaterialSource::new("metal", [0.7, 0.7, 0.7], [1.0, 1.0, 1.0], 100.0))
        .with_object(table())
        .with_object(ball())
        .with_object(wall())
        .with_object(window())
        .with_object(laptop())
        .with_object(coffee_mug())
}

fn desk_lights() -> SceneLights {
    // Two overhead fills, a pair over the laptop and a bright lamp behind the ball.
    SceneLights::new()
        .with_directional(
            DirectionalLight::new(Vector3::new(0.0, -1.0, -0.1))
                .with_ambient(0.8, 0.8, 0.6)
                .with_diffuse(0.07, 0.06, 0.04)
                .with_specular(1.0, 0.9, 0.6),
        )
        .with_point_light(
            PointLight::new(Vector3::new(-4.0, 8.0, 0.0))
                .with_ambient(0.05, 0.05, 0.05)
                .with_diffuse(0.3, 0.3, 0.1)
                .with_specular(0.2, 0.2, 0.0),
        )
        .with_point_light(
            PointLight::new(Vector3::new(4.0, 8.0, 0.0))
                .with_ambient(0.05, 0.05, 0.05)
                .with_diffuse(0.3, 0.3, 0.1)
                .with_specular(0.2, 0.2, 0.0),
        )
        .with_point_light(
            PointLight::new(Vector3::new(3.8, 5.5, 4.0))
                .with_ambient(0.05, 0.05, 0.05)
                .with_diffuse(0.2, 0.2, 0.0)
                .with_specular(0.8, 0.8, 0.6),
        )
        .with_point_light(
            PointLight::new(Vector3::new(3.8, 3.5, 4.0))
                .with_ambient(0.05, 0.05, 0.05)
                .with_diffuse(0.2, 0.2, 0.0)
                .with_specular(0.8, 0.8, 0.6),
        )
        .with_point_light(
            PointLight::new(Vector3::new(-3.2, 6.0, -4.0))
                .with_ambient(0.05, 0.05, 0.05)
                .with_diffuse(0.9, 0.9, 0.7)
                .with_specular(0.2, 0.2, 0.0),
        )
}

fn table() -> SceneObject {
    SceneObject::new("table").with_block(
        DrawBlock::new(MeshKind::Box)
            .scaled(40.0, 6.0, 20.0)
            .at(4.0, -3.0, 0.0)
            .textured("table")
            .uv_scale(1.0, 1.0)
            .material("wood"),
    )
}

fn ball() -> SceneObject {
    // Three thin black tori make the seams.
    let seam = |x_deg: f32, depth: f32| {
        DrawBlock::new(MeshKind::Torus)
            .scaled(3.4, 3.4, depth)
            .rotated(x_deg, 0.0, 0.0)
            .at(-7.0, 4.0, 5.0)
            .colored(0.0, 0.0, 0.0, 1.0)
    };

    SceneObject::new("ball")
        .with_block(
            DrawBlock::new(MeshKind::Sphere)
                .scaled(4.0, 4.0, 4.0)
                .at(-7.0, 4.0, 5.0)
                .textured("ball")
                .material("ball")
                .uv_scale(1.0, 1.0),
        )
        .with_block(seam(90.0, 0.5))
        .with_block(seam(135.0, 0.1))
        .with_block(seam(45.0, 0.1))
}

fn wall() -> SceneObject {
    SceneObject::new("wall").with_block(
        DrawBlock::new(MeshKind::Box)
            .scaled(40.0, 1.0, 40.0)
            .rotated(90.0, 0.0, 0.0)
            .at(4.0, 15.0, -8.0)
            .textured("wall"),
    )
}

fn window() -> SceneObject {
    SceneObject::new("window").with_block(
        DrawBlock::new(MeshKind::Box)
            .scaled(30.0, 1.0, 30.0)
            .rotated(90.0, 0.0, 0.0)
            .at(4.0, 15.0, -7.0)
            .textured("window"),
    )
}

fn laptop() -> SceneObject {
    SceneObject::new("laptop")
        // base
        .with_block(
            DrawBlock::new(MeshKind::Box)
                .scaled(10.0, 2.0, 5.0)
                .at(5.0, 0.0, 5.0)
                .colored(0.2, 0.2, 0.2, 1.0)
                .material("metal"),
        )
        // keyboard
        .with_block(
            DrawBlock::new(MeshKind::Box)
                .scaled(8.0, 0.2, 2.5)
                .at(5.0, 1.0, 6.0)
                .colored(1.0, 0.9, 0.9, 1.0)
                .material("wood"),
        )
        // lid
        .with_block(
            DrawBlock::new(MeshKind::Box)
                .scaled(10.0, 1.0, 10.0)
                .rotated(90.0, 0.0, 0.0)
                .at(5.0, 5.0, 2.5)
                .colored(0.2, 0.2, 0.2, 1.0)
                .material("metal"),
        )
        // screen
        .with_block(
            DrawBlock::new(MeshKind::Box)
                .scaled(8.0, 0.1, 6.0)
                .rotated(90.0, 0.0, 0.0)
                .at(5.0, 6.0, 3.0)
                .colored(0.0, 0.0, 0.0, 1.0),
        )
}

fn coffee_mug() -> SceneObject {
    SceneObject::new("coffee mug")
        .with_block(
            DrawBlock::new(MeshKind::Cylinder)
                .scaled(2.0, 5.0, 2.0)
                .at(15.0, 0.0, 3.0)
                .colored(0.43, 0.4, 0.49, 1.0),
        )
        // handle
        .with_block(
            DrawBlock::new(MeshKind::Torus)
                .scaled(1.5, 1.5, 3.0)
                .at(18.0, 2.0, 3.0)
                .colored(0.43, 0.4, 0.49, 1.0),
        )
}
