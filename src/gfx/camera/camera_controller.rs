use winit::{
    dpi::PhysicalPosition,
    event::{ElementState, KeyEvent, MouseButton, MouseScrollDelta},
    keyboard::{KeyCode, PhysicalKey},
};

use crate::scene::Camera;

/// Scroll pixels treated as one wheel line.
const PIXELS_PER_LINE: f32 = 40.0;
const MIN_MOVE_SPEED: f32 = 0.05;
const MAX_MOVE_SPEED: f32 = 5.0;

/// Turns mouse and keyboard input into [`Camera`] motion.
///
/// - left drag orbits, `Shift` + left drag pans
/// - wheel zooms, `Shift` + wheel changes the movement speed
/// - `W`/`S` forward and back, `A`/`D` left and right, `Q`/`E` up and down
///
/// Every `process_*` call returns whether the camera changed.
#[derive(Debug, Clone)]
pub struct CameraController {
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub pan_speed: f32,
    /// World units per movement key press
    pub move_speed: f32,
    is_shift_held: bool,
    is_mouse_pressed: bool,
}

impl Default for CameraController {
    fn default() -> Self {
        Self::new(0.005, 0.5)
    }
}

impl CameraController {
    pub fn new(rotate_speed: f32, zoom_speed: f32) -> Self {
        Self {
            rotate_speed,
            zoom_speed,
            pan_speed: 0.01,
            move_speed: 0.25,
            is_shift_held: false,
            is_mouse_pressed: false,
        }
    }

    pub fn process_mouse_button(&mut self, button: MouseButton, state: ElementState) {
        if button == MouseButton::Left {
            self.is_mouse_pressed = state == ElementState::Pressed;
        }
    }

    /// Raw pointer motion; only acts while the left button is down.
    pub fn process_mouse_motion(&self, delta: (f64, f64), camera: &mut Camera) -> bool {
        if !self.is_mouse_pressed {
            return false;
        }

        let (dx, dy) = (delta.0 as f32, delta.1 as f32);
        if self.is_shift_held {
            camera.pan(-dx * self.pan_speed, dy * self.pan_speed);
        } else {
            camera.orbit(-dx * self.rotate_speed, dy * self.rotate_speed);
        }
        true
    }

    pub fn process_scroll(&mut self, delta: &MouseScrollDelta, camera: &mut Camera) -> bool {
        let lines = match delta {
            MouseScrollDelta::LineDelta(_, y) => *y,
            MouseScrollDelta::PixelDelta(PhysicalPosition { y, .. }) => {
                *y as f32 / PIXELS_PER_LINE
            }
        };
        if lines == 0.0 {
            return false;
        }

        if self.is_shift_held {
            self.move_speed =
                (self.move_speed * 1.1f32.powf(lines)).clamp(MIN_MOVE_SPEED, MAX_MOVE_SPEED);
            log::debug!("Camera move speed {:.2}", self.move_speed);
            false
        } else {
            camera.zoom(-lines * self.zoom_speed);
            true
        }
    }

    pub fn process_key(&mut self, event: &KeyEvent, camera: &mut Camera) -> bool {
        match event.physical_key {
            PhysicalKey::Code(code) => self.process_key_code(code, event.state, camera),
            PhysicalKey::Unidentified(_) => false,
        }
    }

    /// Key handling by physical key code. Held movement keys repeat through
    /// the platform's key repeat.
    pub fn process_key_code(
        &mut self,
        code: KeyCode,
        state: ElementState,
        camera: &mut Camera,
    ) -> bool {
        if matches!(code, KeyCode::ShiftLeft | KeyCode::ShiftRight) {
            self.is_shift_held = state == ElementState::Pressed;
            return false;
        }
        if state != ElementState::Pressed {
            return false;
        }

        let step = self.move_speed;
        let (forward, right, up) = match code {
            KeyCode::KeyW => (step, 0.0, 0.0),
            KeyCode::KeyS => (-step, 0.0, 0.0),
            KeyCode::KeyA => (0.0, -step, 0.0),
            KeyCode::KeyD => (0.0, step, 0.0),
            KeyCode::KeyQ => (0.0, 0.0, step),
            KeyCode::KeyE => (0.0, 0.0, -step),
            _ => return false,
        };
        camera.travel(forward, right, up);
        true
    }

    pub fn is_panning(&self) -> bool {
        self.is_mouse_pressed && self.is_shift_held
    }

    pub fn is_rotating(&self) -> bool {
        self.is_mouse_pressed && !self.is_shift_held
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::{EuclideanSpace, InnerSpace, Point3, Vector3};

    fn camera() -> Camera {
        Camera::looking_at(Point3::new(0.0, 0.0, 10.0), Point3::new(0.0, 0.0, 0.0))
    }

    #[test]
    fn test_motion_needs_left_button() {
        let mut controller = CameraController::default();
        let mut cam = camera();

        assert!(!controller.process_mouse_motion((50.0, 0.0), &mut cam));
        assert_eq!(cam, camera());

        controller.process_mouse_button(MouseButton::Right, ElementState::Pressed);
        assert!(!controller.process_mouse_motion((50.0, 0.0), &mut cam));

        controller.process_mouse_button(MouseButton::Left, ElementState::Pressed);
        assert!(controller.is_rotating());
        assert!(controller.process_mouse_motion((50.0, 0.0), &mut cam));
        assert!((cam.distance() - 10.0).abs() < 1e-4);
        assert_eq!(cam.target, Point3::new(0.0, 0.0, 0.0));
        assert!(cam.eye.x < 0.0);

        controller.process_mouse_button(MouseButton::Left, ElementState::Released);
        assert!(!controller.is_rotating());
    }

    #[test]
    fn test_shift_drag_pans() {
        let mut controller = CameraController::default();
        let mut cam = camera();
        controller.process_key_code(KeyCode::ShiftLeft, ElementState::Pressed, &mut cam);
        controller.process_mouse_button(MouseButton::Left, ElementState::Pressed);
        assert!(controller.is_panning());

        assert!(controller.process_mouse_motion((-100.0, 0.0), &mut cam));
        // 100 px * 0.01 * (distance 10 * 0.1) to the right
        assert!((cam.target.x - 1.0).abs() < 1e-4);
        assert!((cam.eye.x - 1.0).abs() < 1e-4);
        assert!((cam.distance() - 10.0).abs() < 1e-4);
    }

    #[test]
    fn test_wheel_zooms() {
        let mut controller = CameraController::default();
        let mut cam = camera();

        assert!(controller.process_scroll(&MouseScrollDelta::LineDelta(0.0, 2.0), &mut cam));
        assert!((cam.distance() - 9.0).abs() < 1e-4);

        let pixels = MouseScrollDelta::PixelDelta(PhysicalPosition::new(0.0, -80.0));
        assert!(controller.process_scroll(&pixels, &mut cam));
        assert!((cam.distance() - 10.0).abs() < 1e-4);

        assert!(!controller.process_scroll(&MouseScrollDelta::LineDelta(0.0, 0.0), &mut cam));
    }

    #[test]
    fn test_shift_wheel_changes_move_speed() {
        let mut controller = CameraController::default();
        let mut cam = camera();
        controller.process_key_code(KeyCode::ShiftRight, ElementState::Pressed, &mut cam);

        let before = controller.move_speed;
        assert!(!controller.process_scroll(&MouseScrollDelta::LineDelta(0.0, 1.0), &mut cam));
        assert!(controller.move_speed > before);
        assert_eq!(cam, camera());

        for _ in 0..200 {
            controller.process_scroll(&MouseScrollDelta::LineDelta(0.0, -1.0), &mut cam);
        }
        assert!((controller.move_speed - MIN_MOVE_SPEED).abs() < 1e-6);
    }

    #[test]
    fn test_movement_keys() {
        let mut controller = CameraController::default();
        controller.move_speed = 1.0;
        let mut cam = camera();

        assert!(controller.process_key_code(KeyCode::KeyW, ElementState::Pressed, &mut cam));
        assert!((cam.eye.to_vec() - Vector3::new(0.0, 0.0, 9.0)).magnitude() < 1e-5);

        controller.process_key_code(KeyCode::KeyD, ElementState::Pressed, &mut cam);
        controller.process_key_code(KeyCode::KeyQ, ElementState::Pressed, &mut cam);
        assert!((cam.eye.to_vec() - Vector3::new(1.0, 1.0, 9.0)).magnitude() < 1e-5);

        controller.process_key_code(KeyCode::KeyS, ElementState::Pressed, &mut cam);
        controller.process_key_code(KeyCode::KeyA, ElementState::Pressed, &mut cam);
        controller.process_key_code(KeyCode::KeyE, ElementState::Pressed, &mut cam);
        assert!((cam.eye.to_vec() - Vector3::new(0.0, 0.0, 10.0)).magnitude() < 1e-5);
        assert!((cam.target.to_vec()).magnitude() < 1e-5);
    }

    #[test]
    fn test_released_and_unbound_keys_do_nothing() {
        let mut controller = CameraController::default();
        let mut cam = camera();
        assert!(!controller.process_key_code(KeyCode::KeyW, ElementState::Released, &mut cam));
        assert!(!controller.process_key_code(KeyCode::KeyP, ElementState::Pressed, &mut cam));
        assert_eq!(cam, camera());
    }
}
