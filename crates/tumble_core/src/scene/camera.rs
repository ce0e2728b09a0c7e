use std::f32::consts::FRAC_PI_2;

use glam::{Mat4, Vec3};

use crate::input::InputState;
use crate::scene::controller::Controller;

/// Free-flying camera described by an eye position and two angles.
///
/// `horizontal` rotates about world +Y, `vertical` tilts up/down.  The
/// projection is right-handed with a `[0, 1]` depth range as wgpu expects.
#[derive(Debug, Clone)]
pub struct Camera {
    // --- view parameters --------------------------------------------------
    pub eye: Vec3,
    pub horizontal: f32,
    pub vertical: f32,
    // --- projection parameters --------------------------------------------
    pub fovy: f32,
    pub aspect: f32,
    pub znear: f32,
    pub zfar: f32,
    // --- input controller --------------------------------------------------
    pub controller: Controller,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            eye: Vec3::ZERO,
            horizontal: 0.0,
            vertical: 0.0,
            fovy: 45.0f32.to_radians(),
            aspect: 1.0,
            znear: 0.25,
            zfar: 4000.0,
            controller: Controller::fly(),
        }
    }
}

impl Camera {
    pub fn new(eye: Vec3, horizontal: f32, vertical: f32, fovy: f32) -> Self {
        Self { eye, horizontal, vertical, fovy, ..Default::default() }
    }

    /// Unit view direction.
    pub fn direction(&self) -> Vec3 {
        let (sh, ch) = self.horizontal.sin_cos();
        let (sv, cv) = self.vertical.sin_cos();
        Vec3::new(cv * sh, sv, cv * ch)
    }

    /// Horizontal right vector (always `y == 0`).
    pub fn right(&self) -> Vec3 {
        let (s, c) = (self.horizontal - FRAC_PI_2).sin_cos();
        Vec3::new(s, 0.0, c)
    }

    pub fn up(&self) -> Vec3 {
        self.right().cross(self.direction())
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.eye + self.direction(), self.up())
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fovy, self.aspect, self.znear, self.zfar)
    }

    /// `projection * view`.
    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Update aspect ratio when viewport dimensions change.  Zero-sized
    /// viewports (minimised windows) keep the previous aspect.
    pub fn set_viewport(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }

    /// Apply one frame of input: drag to turn, bound keys to move.
    pub fn update(&mut self, input: &mut InputState, dt: f32) {
        let (dx, dy) = input.consume_mouse_delta();
        if input.is_button_down(self.controller.turn_button) {
            self.horizontal -= self.controller.mouse_sensitivity * dx;
            self.vertical -= self.controller.mouse_sensitivity * dy;
        }

        let local = self.controller.direction(input);
        if local == Vec3::ZERO {
            return;
        }
        let step = self.controller.current_speed(input) * dt;
        self.eye += (self.right() * local.x + self.up() * local.y + self.direction() * local.z) * step;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{KeyCode, MouseButton};

    #[test]
    fn basis_is_orthonormal() {
        let cam = Camera::new(Vec3::ZERO, -0.75 * std::f32::consts::PI, 0.3, 1.0);
        let (d, r, u) = (cam.direction(), cam.right(), cam.up());
        assert!((d.length() - 1.0).abs() < 1e-5);
        assert!((r.length() - 1.0).abs() < 1e-5);
        assert!(d.dot(r).abs() < 1e-5);
        assert!(u.dot(d).abs() < 1e-5);
        assert!(u.y > 0.0);
    }

    #[test]
    fn forward_key_moves_along_direction() {
        let mut cam = Camera::new(Vec3::ZERO, 0.0, 0.0, 1.0);
        let mut input = InputState::new();
        input.update_key(KeyCode::KeyW, true);
        cam.update(&mut input, 0.5);
        assert!(cam.eye.abs_diff_eq(Vec3::new(0.0, 0.0, 5.0), 1e-5));
    }

    #[test]
    fn mouse_only_turns_while_button_held() {
        let mut cam = Camera::default();
        let mut input = InputState::new();
        input.set_mouse_position(0.0, 0.0);
        input.set_mouse_position(100.0, 0.0);
        cam.update(&mut input, 0.016);
        assert_eq!(cam.horizontal, 0.0);

        input.update_mouse_button(MouseButton::Right, true);
        input.set_mouse_position(200.0, 0.0);
        cam.update(&mut input, 0.016);
        assert!((cam.horizontal + 0.075).abs() < 1e-6);
    }

    #[test]
    fn view_looks_down_negative_z_in_view_space() {
        let cam = Camera::new(Vec3::new(1.0, 2.0, 3.0), 0.4, 0.1, 1.0);
        let ahead = cam.eye + cam.direction() * 10.0;
        let p = cam.view_matrix().transform_point3(ahead);
        assert!(p.x.abs() < 1e-4 && p.y.abs() < 1e-4);
        assert!((p.z + 10.0).abs() < 1e-4);
    }
}
