//! Scripted keyboard input for the headless demo.

use input::{ElementState, InputState, KeyCode};

/// Hold `key` from `start` to `end` (seconds). `start == end` is a tap.
#[derive(Debug, Clone, Copy)]
pub struct KeyHold {
    pub key: KeyCode,
    pub start: f32,
    pub end: f32,
}

const fn hold(key: KeyCode, start: f32, end: f32) -> KeyHold {
    KeyHold { key, start, end }
}

const fn tap(key: KeyCode, at: f32) -> KeyHold {
    KeyHold { key, start: at, end: at }
}

#[derive(Debug, Clone)]
pub struct InputScript {
    holds: Vec<KeyHold>,
}

impl InputScript {
    pub fn new(holds: Vec<KeyHold>) -> Self {
        Self { holds }
    }

    pub fn push(&mut self, hold: KeyHold) {
        self.holds.push(hold);
    }

    /// Board, take off, climb, bank around, then bail out mid-air.
    pub fn demo_flight() -> Self {
        Self::new(vec![
            tap(KeyCode::KeyF, 0.5),
            hold(KeyCode::ShiftLeft, 1.0, 3.0),
            hold(KeyCode::KeyS, 9.0, 11.0),
            hold(KeyCode::KeyE, 15.0, 15.6),
            hold(KeyCode::KeyD, 15.0, 17.0),
            hold(KeyCode::KeyQ, 18.0, 18.6),
            hold(KeyCode::ControlLeft, 24.0, 25.0),
            tap(KeyCode::KeyF, 26.0),
        ])
    }

    /// Feed key transitions falling in `(from, to]` into `input`. Presses are
    /// fed before releases so a tap inside one window still registers.
    pub fn play(&self, from: f32, to: f32, input: &mut InputState) {
        let within = |t: f32| from < t && t <= to;
        for h in self.holds.iter().filter(|h| within(h.start)) {
            input.process_keyboard(h.key, ElementState::Pressed);
        }
        for h in self.holds.iter().filter(|h| within(h.end)) {
            input.process_keyboard(h.key, ElementState::Released);
        }
    }
}
