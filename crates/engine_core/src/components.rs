//! Common ECS components used across the sim crates.

use glam::Vec3;

/// Velocity component for moving entities.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Velocity {
    pub linear: Vec3,
}

impl Velocity {
    pub fn new(linear: Vec3) -> Self {
        Self { linear }
    }
}

/// Tag component for actors that are allowed to pilot vehicles.
#[derive(Debug, Clone, Copy, Default)]
pub struct Pilot;

/// Whether an entity is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Visibility(pub bool);

impl Default for Visibility {
    fn default() -> Self {
        Self(true)
    }
}

/// Per-actor processing switches. A possessed actor has both turned off.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Processing {
    /// Actor reads its own input.
    pub input: bool,
    /// Actor runs its own movement/physics.
    pub physics: bool,
}

impl Default for Processing {
    fn default() -> Self {
        Self {
            input: true,
            physics: true,
        }
    }
}

/// A collision shape attached to an actor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Collider {
    pub enabled: bool,
}

impl Collider {
    pub fn enabled() -> Self {
        Self { enabled: true }
    }

    pub fn disabled() -> Self {
        Self { enabled: false }
    }
}

/// Scene-graph parent link. The entity's `Transform` is local to this parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Parent(pub hecs::Entity);

/// Direct children of an entity (collision shapes, camera pivots, ...).
#[derive(Debug, Clone, Default)]
pub struct Children(pub Vec<hecs::Entity>);

/// Links an actor to the camera node it looks through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CameraLink(pub hecs::Entity);

/// One tick of sampled control input.
///
/// Axes are in `[-1, 1]`. Positive pitch raises the nose, positive yaw swings
/// the nose right, positive roll drops the right wing, positive throttle
/// opens the throttle. `interact_pressed` is edge-triggered: true only on the
/// tick the key went down.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ControlInputs {
    pub pitch: f32,
    pub yaw: f32,
    pub roll: f32,
    pub throttle: f32,
    pub interact_pressed: bool,
}

impl ControlInputs {
    /// Just an interact press, all axes neutral.
    pub fn interact() -> Self {
        Self {
            interact_pressed: true,
            ..Default::default()
        }
    }

    /// Clamp every axis to `[-1, 1]`, replacing non-finite values with 0.
    pub fn sanitized(self) -> Self {
        fn axis(v: f32) -> f32 {
            if v.is_finite() {
                v.clamp(-1.0, 1.0)
            } else {
                0.0
            }
        }
        Self {
            pitch: axis(self.pitch),
            yaw: axis(self.yaw),
            roll: axis(self.roll),
            throttle: axis(self.throttle),
            interact_pressed: self.interact_pressed,
        }
    }
}
