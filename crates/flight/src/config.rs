//! Aircraft tuning. Set once per vehicle type; never mutated during a flight.

use serde::{Deserialize, Serialize};

/// Which force model runs while the aircraft is flown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AeroMode {
    /// Lift proportional to forward speed, attitude driven straight from input.
    Simple,
    /// Angle of attack, stall, sideslip and angular dynamics.
    #[default]
    Full,
}

/// Immutable per-type flight configuration. Missing RON fields take the defaults below.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlightConfig {
    pub mode: AeroMode,

    // ── Airframe ──
    /// Mass in kg.
    pub mass: f32,
    /// Thrust at full throttle, N.
    pub max_thrust: f32,
    /// Wing reference area, m².
    pub wing_area: f32,
    /// Wing span, m.
    pub wing_span: f32,
    /// Air density, kg/m³.
    pub air_density: f32,

    // ── Aerodynamics (Full) ──
    /// dCl/dα per radian.
    pub lift_curve_slope: f32,
    pub max_lift_coefficient: f32,
    pub base_drag_coefficient: f32,
    /// Drag multiplier when fully stalled.
    pub stall_drag_multiplier: f32,
    pub side_force_coefficient: f32,
    /// |α| where lift starts to collapse, degrees.
    pub stall_angle_deg: f32,
    /// |α| where the wing is fully stalled, degrees.
    pub stall_recovery_angle_deg: f32,

    // ── Control ──
    /// Airspeed at which control surfaces reach full authority, m/s.
    pub takeoff_speed: f32,
    pub min_control_effectiveness: f32,
    /// Angular acceleration at full deflection, rad/s².
    pub pitch_authority: f32,
    pub yaw_authority: f32,
    pub roll_authority: f32,
    pub pitch_stability: f32,
    pub yaw_stability: f32,
    pub roll_stability: f32,
    pub angular_damping: f32,
    /// rad/s
    pub max_angular_speed: f32,
    /// Throttle change per second at full input.
    pub throttle_response: f32,

    // ── Numeric guards ──
    /// Below this airspeed α and β are forced to zero, m/s.
    pub min_airspeed: f32,
    /// Hard cap on linear speed, m/s.
    pub max_speed: f32,

    // ── Idle / parked ──
    /// Downward speed the idle velocity relaxes toward while airborne, m/s.
    /// A target velocity, not an acceleration.
    pub idle_gravity_force: f32,
    /// Exponential decay rate of throttle, speed and velocity while idle, 1/s.
    pub idle_decay_rate: f32,
    /// Rate at which pitch and roll settle to level on the ground, 1/s.
    pub ground_align_rate: f32,

    // ── Simple mode ──
    /// Upward acceleration per m/s of forward speed.
    pub lift_per_speed: f32,
    /// Quadratic drag factor.
    pub simple_drag: f32,
    /// Attitude rates at full deflection, rad/s.
    pub simple_pitch_rate: f32,
    pub simple_yaw_rate: f32,
    pub simple_roll_rate: f32,
}

impl Default for FlightConfig {
    fn default() -> Self {
        Self {
            mode: AeroMode::Full,
            mass: 1200.0,
            max_thrust: 9000.0,
            wing_area: 16.0,
            wing_span: 11.0,
            air_density: 1.225,
            lift_curve_slope: 5.5,
            max_lift_coefficient: 1.4,
            base_drag_coefficient: 0.03,
            stall_drag_multiplier: 4.0,
            side_force_coefficient: 1.2,
            stall_angle_deg: 15.0,
            stall_recovery_angle_deg: 25.0,
            takeoff_speed: 28.0,
            min_control_effectiveness: 0.15,
            pitch_authority: 2.4,
            yaw_authority: 1.2,
            roll_authority: 3.5,
            pitch_stability: 2.0,
            yaw_stability: 1.5,
            roll_stability: 1.2,
            angular_damping: 2.5,
            max_angular_speed: 2.5,
            throttle_response: 1.8,
            min_airspeed: 0.5,
            max_speed: 250.0,
            idle_gravity_force: 9.8,
            idle_decay_rate: 2.0,
            ground_align_rate: 3.0,
            lift_per_speed: 0.35,
            simple_drag: 0.02,
            simple_pitch_rate: 1.2,
            simple_yaw_rate: 0.8,
            simple_roll_rate: 1.8,
        }
    }
}

impl FlightConfig {
    /// Default tuning with the simplified force model.
    pub fn simple() -> Self {
        Self {
            mode: AeroMode::Simple,
            ..Default::default()
        }
    }

    /// Wing aspect ratio `span² / area`, with area floored away from zero.
    pub fn aspect_ratio(&self) -> f32 {
        crate::math::safe_div(self.wing_span * self.wing_span, self.wing_area)
    }
}
