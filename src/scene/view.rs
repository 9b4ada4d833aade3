//! Camera and projection
//!
//! A look-at camera with a switchable projection. The camera can orbit,
//! zoom, pan and fly relative to its own view; the scene is otherwise static.
//! Matrices follow the OpenGL clip-space convention; GPU backends with a
//! different depth range correct them on upload.

use std::f32::consts::FRAC_PI_2;
use std::fmt;

use cgmath::{Deg, EuclideanSpace, InnerSpace, Matrix4, Point3, Vector3};

use super::shader::{uniforms, ShaderContext};

/// How the scene is projected onto the screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProjectionMode {
    #[default]
    Perspective,
    Orthographic,
}

impl fmt::Display for ProjectionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProjectionMode::Perspective => f.write_str("perspective"),
            ProjectionMode::Orthographic => f.write_str("orthographic"),
        }
    }
}

/// Viewer placement and projection parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub eye: Point3<f32>,
    pub target: Point3<f32>,
    pub up: Vector3<f32>,
    pub fov_y_degrees: f32,
    /// Half width and half height of the orthographic view volume
    pub ortho_half_extent: f32,
    pub near: f32,
    pub far: f32,
}

/// Closest and farthest the eye may get to its target.
pub const MIN_VIEW_DISTANCE: f32 = 0.5;
pub const MAX_VIEW_DISTANCE: f32 = 50.0;

/// Keeps orbiting short of the poles, where `look_at` degenerates.
const MAX_PITCH: f32 = FRAC_PI_2 - 0.01;

impl Default for Camera {
    fn default() -> Self {
        Self {
            eye: Point3::new(0.0, 5.0, 12.0),
            target: Point3::new(0.0, 0.0, 0.0),
            up: Vector3::unit_y(),
            fov_y_degrees: 45.0,
            ortho_half_extent: 10.0,
            near: 0.1,
            far: 100.0,
        }
    }
}

impl Camera {
    pub fn looking_at(eye: Point3<f32>, target: Point3<f32>) -> Self {
        Self {
            eye,
            target,
            ..Default::default()
        }
    }

    pub fn view_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(self.eye, self.target, self.up)
    }

    /// Projection for `mode` at the given width/height ratio.
    pub fn projection_matrix(&self, mode: ProjectionMode, aspect: f32) -> Matrix4<f32> {
        match mode {
            ProjectionMode::Perspective => {
                cgmath::perspective(Deg(self.fov_y_degrees), aspect, self.near, self.far)
            }
            ProjectionMode::Orthographic => {
                let e = self.ortho_half_extent;
                cgmath::ortho(-e, e, -e, e, self.near, self.far)
            }
        }
    }

    pub fn distance(&self) -> f32 {
        (self.eye - self.target).magnitude()
    }

    /// Rotates the eye around the target, in radians. Pitch is clamped
    /// short of straight up and down.
    pub fn orbit(&mut self, yaw_delta: f32, pitch_delta: f32) {
        let offset = self.eye - self.target;
        let distance = offset.magnitude();
        if distance <= f32::EPSILON {
            return;
        }

        let yaw = offset.x.atan2(offset.z) + yaw_delta;
        let pitch = ((offset.y / distance).clamp(-1.0, 1.0).asin() + pitch_delta)
            .clamp(-MAX_PITCH, MAX_PITCH);

        self.eye = self.target
            + Vector3::new(
                distance * yaw.sin() * pitch.cos(),
                distance * pitch.sin(),
                distance * yaw.cos() * pitch.cos(),
            );
    }

    /// Moves the eye toward (negative) or away from (positive) the target.
    pub fn zoom(&mut self, delta: f32) {
        let offset = self.eye - self.target;
        let distance = offset.magnitude();
        if distance <= f32::EPSILON {
            return;
        }

        let new_distance = (distance + delta).clamp(MIN_VIEW_DISTANCE, MAX_VIEW_DISTANCE);
        self.eye = self.target + offset * (new_distance / distance);
    }

    /// Shifts eye and target together across the view plane. The step
    /// grows with the distance so panning feels the same at any zoom.
    pub fn pan(&mut self, right: f32, up: f32) {
        let Some((_, side, lift)) = self.basis() else {
            return;
        };
        let scale = self.distance() * 0.1;
        let movement = side * (right * scale) + lift * (up * scale);
        self.eye += movement;
        self.target += movement;
    }

    /// Flies eye and target together along the view direction, its right
    /// vector and world up.
    pub fn travel(&mut self, forward: f32, right: f32, up: f32) {
        let Some((front, side, _)) = self.basis() else {
            return;
        };
        let movement = front * forward + side * right + self.up * up;
        self.eye += movement;
        self.target += movement;
    }

    /// Unit front, right and camera-up vectors, if the view is well defined.
    fn basis(&self) -> Option<(Vector3<f32>, Vector3<f32>, Vector3<f32>)> {
        let forward = self.target - self.eye;
        if forward.magnitude() <= f32::EPSILON {
            return None;
        }
        let front = forward.normalize();
        let side = front.cross(self.up);
        if side.magnitude() <= f32::EPSILON {
            return None;
        }
        let side = side.normalize();
        Some((front, side, side.cross(front)))
    }

    /// Writes `view`, `projection` and `viewPosition`.
    pub fn apply<S: ShaderContext + ?Sized>(&self, shader: &mut S, mode: ProjectionMode, aspect: f32) {
        shader.set_mat4(uniforms::VIEW, &self.view_matrix());
        shader.set_mat4(uniforms::PROJECTION, &self.projection_matrix(mode, aspect));
        shader.set_vec3(uniforms::VIEW_POSITION, self.eye.to_vec());
    }
}
