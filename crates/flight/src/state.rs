//! Mutable per-vehicle runtime state.

use engine_core::{Transform, Vec3};

/// Kinematic state owned by a single vehicle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VehicleState {
    /// World transform.
    pub transform: Transform,
    /// World-space velocity, m/s.
    pub linear_velocity: Vec3,
    /// Body-space angular velocity (x = pitch, y = yaw, z = roll), rad/s. Always zero in simple mode.
    pub angular_velocity: Vec3,
    /// Throttle in `[0, 1]`.
    pub throttle: f32,
    /// Airspeed of the last tick, m/s.
    pub speed: f32,
    /// Cosmetic propeller angle, radians in `[0, TAU)`.
    pub propeller_angle: f32,
}

impl Default for VehicleState {
    fn default() -> Self {
        Self::at(Transform::default())
    }
}

impl VehicleState {
    /// A vehicle at rest at `transform`.
    pub fn at(transform: Transform) -> Self {
        Self {
            transform,
            linear_velocity: Vec3::ZERO,
            angular_velocity: Vec3::ZERO,
            throttle: 0.0,
            speed: 0.0,
            propeller_angle: 0.0,
        }
    }

    /// Zero throttle, speed and angular velocity. Linear velocity is kept so
    /// an aircraft abandoned mid-air keeps coasting into its idle sink.
    pub fn reset_controls(&mut self) {
        self.throttle = 0.0;
        self.speed = 0.0;
        self.angular_velocity = Vec3::ZERO;
    }

    /// Speed along the nose, m/s.
    pub fn forward_speed(&self) -> f32 {
        self.linear_velocity.dot(self.transform.forward())
    }
}

/// Derived flight values from the most recent tick, for HUD and logging.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Telemetry {
    pub airspeed: f32,
    pub altitude: f32,
    pub throttle: f32,
    /// Radians.
    pub angle_of_attack: f32,
    /// Radians.
    pub sideslip: f32,
    /// 1 = attached flow, 0 = fully stalled.
    pub stall_blend: f32,
    pub control_effectiveness: f32,
    pub on_ground: bool,
}
