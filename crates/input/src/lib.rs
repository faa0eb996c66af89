//! Input handling: keyboard state with per-frame edge detection,
//! mapped to flight control axes.

use engine_core::ControlInputs;
use std::collections::HashSet;

/// Manages input state for the current frame.
#[derive(Debug, Default)]
pub struct InputState {
    /// Keys currently held down.
    keys_held: HashSet<KeyCode>,
    /// Keys pressed this frame.
    keys_pressed: HashSet<KeyCode>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear per-frame state. Call at the start of each frame.
    pub fn begin_frame(&mut self) {
        self.keys_pressed.clear();
    }

    /// Process a keyboard event.
    pub fn process_keyboard(&mut self, key: KeyCode, state: ElementState) {
        match state {
            ElementState::Pressed => {
                // Key repeat arrives as another Pressed; only the first counts as an edge.
                if !self.keys_held.contains(&key) {
                    self.keys_pressed.insert(key);
                }
                self.keys_held.insert(key);
            }
            ElementState::Released => {
                self.keys_held.remove(&key);
            }
        }
    }

    // Query methods

    /// Check if a key is currently held.
    pub fn is_key_held(&self, key: KeyCode) -> bool {
        self.keys_held.contains(&key)
    }

    /// Check if a key was pressed this frame.
    pub fn is_key_pressed(&self, key: KeyCode) -> bool {
        self.keys_pressed.contains(&key)
    }

    /// `+1` when only `positive` is held, `-1` when only `negative` is, else 0.
    pub fn axis(&self, positive: KeyCode, negative: KeyCode) -> f32 {
        let mut value = 0.0;
        if self.is_key_held(positive) {
            value += 1.0;
        }
        if self.is_key_held(negative) {
            value -= 1.0;
        }
        value
    }

    /// Sample this frame's flight controls through `keymap`.
    pub fn flight_controls(&self, keymap: &FlightKeymap) -> ControlInputs {
        ControlInputs {
            pitch: self.axis(keymap.pitch_up, keymap.pitch_down),
            yaw: self.axis(keymap.yaw_right, keymap.yaw_left),
            roll: self.axis(keymap.roll_right, keymap.roll_left),
            throttle: self.axis(keymap.throttle_up, keymap.throttle_down),
            interact_pressed: self.is_key_pressed(keymap.interact),
        }
        .sanitized()
    }
}

/// Key bindings for flying.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlightKeymap {
    pub pitch_up: KeyCode,
    pub pitch_down: KeyCode,
    pub yaw_left: KeyCode,
    pub yaw_right: KeyCode,
    pub roll_left: KeyCode,
    pub roll_right: KeyCode,
    pub throttle_up: KeyCode,
    pub throttle_down: KeyCode,
    pub interact: KeyCode,
}

impl Default for FlightKeymap {
    fn default() -> Self {
        Self {
            pitch_up: KeyCode::KeyS,
            pitch_down: KeyCode::KeyW,
            yaw_left: KeyCode::KeyA,
            yaw_right: KeyCode::KeyD,
            roll_left: KeyCode::KeyQ,
            roll_right: KeyCode::KeyE,
            throttle_up: KeyCode::ShiftLeft,
            throttle_down: KeyCode::ControlLeft,
            interact: KeyCode::KeyF,
        }
    }
}

// Re-export for convenience
pub use winit::event::ElementState;
pub use winit::keyboard::KeyCode;
