//! Scene lighting
//!
//! One directional light plus up to [`MAX_POINT_LIGHTS`] point lights, written
//! to the shader once during preparation.

use cgmath::Vector3;

use super::shader::{uniforms, ShaderContext};

/// Size of the point light array in the shader.
pub const MAX_POINT_LIGHTS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectionalLight {
    pub direction: Vector3<f32>,
    pub ambient: Vector3<f32>,
    pub diffuse: Vector3<f32>,
    pub specular: Vector3<f32>,
    pub active: bool,
}

impl DirectionalLight {
    pub fn new(direction: Vector3<f32>) -> Self {
        Self {
            direction,
            ambient: Vector3::new(0.1, 0.1, 0.1),
            diffuse: Vector3::new(0.5, 0.5, 0.5),
            specular: Vector3::new(0.5, 0.5, 0.5),
            active: true,
        }
    }

    pub fn with_ambient(mut self, r: f32, g: f32, b: f32) -> Self {
        self.ambient = Vector3::new(r, g, b);
        self
    }

    pub fn with_diffuse(mut self, r: f32, g: f32, b: f32) -> Self {
        self.diffuse = Vector3::new(r, g, b);
        self
    }

    pub fn with_specular(mut self, r: f32, g: f32, b: f32) -> Self {
        self.specular = Vector3::new(r, g, b);
        self
    }

    fn apply<S: ShaderContext + ?Sized>(&self, shader: &mut S) {
        shader.set_vec3(uniforms::DIRECTIONAL_DIRECTION, self.direction);
        shader.set_vec3(uniforms::DIRECTIONAL_AMBIENT, self.ambient);
        shader.set_vec3(uniforms::DIRECTIONAL_DIFFUSE, self.diffuse);
        shader.set_vec3(uniforms::DIRECTIONAL_SPECULAR, self.specular);
        shader.set_bool(uniforms::DIRECTIONAL_ACTIVE, self.active);
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointLight {
    pub position: Vector3<f32>,
    pub ambient: Vector3<f32>,
    pub diffuse: Vector3<f32>,
    pub specular: Vector3<f32>,
    pub active: bool,
}

impl PointLight {
    pub fn new(position: Vector3<f32>) -> Self {
        Self {
            position,
            ambient: Vector3::new(0.05, 0.05, 0.05),
            diffuse: Vector3::new(0.5, 0.5, 0.5),
            specular: Vector3::new(0.5, 0.5, 0.5),
            active: true,
        }
    }

    pub fn with_ambient(mut self, r: f32, g: f32, b: f32) -> Self {
        self.ambient = Vector3::new(r, g, b);
        self
    }

    pub fn with_diffuse(mut self, r: f32, g: f32, b: f32) -> Self {
        self.diffuse = Vector3::new(r, g, b);
        self
    }

    pub fn with_specular(mut self, r: f32, g: f32, b: f32) -> Self {
        self.specular = Vector3::new(r, g, b);
        self
    }

    fn apply<S: ShaderContext + ?Sized>(&self, shader: &mut S, index: usize) {
        shader.set_vec3(&uniforms::point_light(index, "position"), self.position);
        shader.set_vec3(&uniforms::point_light(index, "ambient"), self.ambient);
        shader.set_vec3(&uniforms::point_light(index, "diffuse"), self.diffuse);
        shader.set_vec3(&uniforms::point_light(index, "specular"), self.specular);
        shader.set_bool(&uniforms::point_light(index, "bActive"), self.active);
    }
}

/// All light sources of a scene.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SceneLights {
    pub directional: Option<DirectionalLight>,
    pub point_lights: Vec<PointLight>,
}

impl SceneLights {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_directional(mut self, light: DirectionalLight) -> Self {
        self.directional = Some(light);
        self
    }

    pub fn with_point_light(mut self, light: PointLight) -> Self {
        self.point_lights.push(light);
        self
    }

    /// Writes every light and enables lighting.
    ///
    /// Unused point light entries are explicitly deactivated. Lights beyond
    /// [`MAX_POINT_LIGHTS`] are dropped with a warning.
    pub fn apply<S: ShaderContext + ?Sized>(&self, shader: &mut S) {
        match &self.directional {
            Some(light) => light.apply(shader),
            None => shader.set_bool(uniforms::DIRECTIONAL_ACTIVE, false),
        }

        if self.point_lights.len() > MAX_POINT_LIGHTS {
            log::warn!(
                "Scene defines {} point lights; only the first {} are used",
                self.point_lights.len(),
                MAX_POINT_LIGHTS
            );
        }

        for index in 0..MAX_POINT_LIGHTS {
            match self.point_lights.get(index) {
                Some(light) => light.apply(shader, index),
                None => shader.set_bool(&uniforms::point_light(index, "bActive"), false),
            }
        }

        shader.set_bool(uniforms::USE_LIGHTING, true);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::recording::RecordingShader;

    #[test]
    fn test_apply_writes_lights_and_enables_lighting() {
        let lights = SceneLights::new()
            .with_directional(DirectionalLight::new(Vector3::new(0.0, -1.0, -0.1)))
            .with_point_light(
                PointLight::new(Vector3::new(-4.0, 8.0, 0.0)).with_diffuse(0.3, 0.3, 0.1),
            );

        let mut shader = RecordingShader::new();
        lights.apply(&mut shader);

        assert_eq!(shader.bool_value("directionalLight.bActive"), Some(true));
        assert_eq!(
            shader.vec3_value("directionalLight.direction"),
            Some(Vector3::new(0.0, -1.0, -0.1))
        );
        assert_eq!(
            shader.vec3_value("pointLights[0].diffuse"),
            Some(Vector3::new(0.3, 0.3, 0.1))
        );
        assert_eq!(shader.bool_value("pointLights[0].bActive"), Some(true));
        assert_eq!(shader.bool_value("pointLights[1].bActive"), Some(false));
        assert_eq!(shader.bool_value("pointLights[4].bActive"), Some(false));
        assert_eq!(shader.bool_value("bUseLighting"), Some(true));

        let names = shader.written_names();
        assert_eq!(names.last(), Some(&"bUseLighting"));
    }

    #[test]
    fn test_extra_point_lights_are_dropped() {
        let mut lights = SceneLights::new();
        for i in 0..7 {
            lights = lights.with_point_light(PointLight::new(Vector3::new(i as f32, 0.0, 0.0)));
        }

        let mut shader = RecordingShader::new();
        lights.apply(&mut shader);

        assert_eq!(
            shader.vec3_value("pointLights[4].position"),
            Some(Vector3::new(4.0, 0.0, 0.0))
        );
        assert_eq!(shader.value("pointLights[5].position"), None);
        assert_eq!(shader.bool_value("directionalLight.bActive"), Some(false));
    }
}
