use std::collections::HashSet;

/// Re-exported key and mouse enums from `winit` for convenience.
pub use winit::event::MouseButton;
pub use winit::keyboard::KeyCode;

/// State of the keyboard and mouse at a given moment.
///
/// The runner drives this structure by feeding it the events coming from
/// `winit` and calls [`InputState::end_frame`] once the frame has been
/// consumed, so edge queries (`just_pressed`) hold for exactly one frame.
#[derive(Default)]
pub struct InputState {
    keys_down: HashSet<KeyCode>,
    keys_pressed_this_frame: HashSet<KeyCode>,
    mouse_buttons: HashSet<MouseButton>,
    mouse_pos: Option<(f64, f64)>,
    /// accumulated movement since last `consume_mouse_delta`
    mouse_delta: (f32, f32),
}

impl InputState {
    /// Creates a fresh, empty input state.
    pub fn new() -> Self {
        Default::default()
    }

    /// Called by the event loop when a keyboard event arrives.
    ///
    /// OS key-repeat delivers repeated "pressed" events; those do not count
    /// as a new press.
    pub fn update_key(&mut self, key: KeyCode, pressed: bool) {
        if pressed {
            if self.keys_down.insert(key) {
                self.keys_pressed_this_frame.insert(key);
            }
        } else {
            self.keys_down.remove(&key);
        }
    }

    /// Returns true if the given key is currently pressed down.
    pub fn is_key_pressed(&self, key: KeyCode) -> bool {
        self.keys_down.contains(&key)
    }

    /// Returns true if the key went down during the current frame.
    pub fn just_pressed(&self, key: KeyCode) -> bool {
        self.keys_pressed_this_frame.contains(&key)
    }

    /// Called by the event loop when a mouse button event arrives.
    pub fn update_mouse_button(&mut self, button: MouseButton, pressed: bool) {
        if pressed {
            self.mouse_buttons.insert(button);
        } else {
            self.mouse_buttons.remove(&button);
        }
    }

    /// Returns true if the given mouse button is currently held.
    pub fn is_button_down(&self, button: MouseButton) -> bool {
        self.mouse_buttons.contains(&button)
    }

    /// Update the current mouse cursor position (window coordinates).
    ///
    /// The first sample only establishes the origin and produces no delta.
    pub fn set_mouse_position(&mut self, x: f64, y: f64) {
        if let Some((px, py)) = self.mouse_pos {
            self.mouse_delta.0 += (x - px) as f32;
            self.mouse_delta.1 += (y - py) as f32;
        }
        self.mouse_pos = Some((x, y));
    }

    /// Retrieve the last recorded mouse position.
    pub fn mouse_position(&self) -> (f64, f64) {
        self.mouse_pos.unwrap_or((0.0, 0.0))
    }

    /// Retrieve and reset the mouse movement delta (in pixels) since the
    /// last call.
    pub fn consume_mouse_delta(&mut self) -> (f32, f32) {
        std::mem::take(&mut self.mouse_delta)
    }

    /// Forget every held key and button, e.g. when the window loses focus.
    pub fn clear(&mut self) {
        self.keys_down.clear();
        self.keys_pressed_this_frame.clear();
        self.mouse_buttons.clear();
        self.mouse_delta = (0.0, 0.0);
    }

    /// Drop the per-frame edge state.
    pub fn end_frame(&mut self) {
        self.keys_pressed_this_frame.clear();
    }
}
