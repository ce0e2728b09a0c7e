use std::collections::HashMap;

use crate::input::{InputState, KeyCode, MouseButton};
use glam::Vec3;

/// Maps keys to movement directions and stores all camera-motion parameters.
///
/// Directions are camera-space: +X right, +Y camera up, +Z forward.
///
/// # Example
/// ```rust,ignore
/// use tumble_core::scene::Controller;
/// use tumble_core::input::KeyCode;
/// use glam::Vec3;
///
/// let mut controller = Controller::fly();
/// controller.bind(KeyCode::ArrowUp, Vec3::Z);
/// controller.speed = 2.0;
/// ```
#[derive(Debug, Clone)]
pub struct Controller {
    /// Key → camera-space unit direction mappings.
    mappings: HashMap<KeyCode, Vec3>,

    /// Translation speed in world-units per second.
    ///
    /// Default: `10.0`
    pub speed: f32,

    /// Speed multiplier while [`Self::boost_key`] is held.
    ///
    /// Default: `10.0`
    pub boost: f32,

    /// Key that applies [`Self::boost`].
    pub boost_key: KeyCode,

    /// Mouse drag sensitivity (radians per pixel).
    ///
    /// Default: `0.00075`
    pub mouse_sensitivity: f32,

    /// Button that must be held for mouse movement to turn the camera.
    pub turn_button: MouseButton,
}

impl Controller {
    /// Creates an empty controller with no key bindings and default parameters.
    pub fn new() -> Self {
        Self {
            mappings:          HashMap::new(),
            speed:             10.0,
            boost:             10.0,
            boost_key:         KeyCode::ShiftLeft,
            mouse_sensitivity: 0.00075,
            turn_button:       MouseButton::Right,
        }
    }

    /// WASD on the horizontal plane, Q/E down/up.
    pub fn fly() -> Self {
        let mut ctl = Self::new();
        ctl.bind(KeyCode::KeyW, Vec3::new( 0.0,  0.0,  1.0));
        ctl.bind(KeyCode::KeyS, Vec3::new( 0.0,  0.0, -1.0));
        ctl.bind(KeyCode::KeyA, Vec3::new(-1.0,  0.0,  0.0));
        ctl.bind(KeyCode::KeyD, Vec3::new( 1.0,  0.0,  0.0));
        ctl.bind(KeyCode::KeyQ, Vec3::new( 0.0, -1.0,  0.0));
        ctl.bind(KeyCode::KeyE, Vec3::new( 0.0,  1.0,  0.0));
        ctl
    }

    /// Binds `key` to a camera-space direction.  Rebinding overwrites.
    pub fn bind(&mut self, key: KeyCode, dir: Vec3) {
        self.mappings.insert(key, dir);
    }

    /// Sum of bound directions whose keys are held.  Not normalised.
    pub fn direction(&self, input: &InputState) -> Vec3 {
        self.mappings
            .iter()
            .filter(|(key, _)| input.is_key_pressed(**key))
            .map(|(_, dir)| *dir)
            .sum()
    }

    /// Effective speed for this frame.
    pub fn current_speed(&self, input: &InputState) -> f32 {
        if input.is_key_pressed(self.boost_key) {
            self.speed * self.boost
        } else {
            self.speed
        }
    }
}

impl Default for Controller {
    fn default() -> Self {
        Self::fly()
    }
}
