//! Airflow relative to the airframe: airspeed, angle of attack, sideslip,
//! plus the stall and control-authority blends derived from them.

use crate::math::{lerp, safe_div};
use engine_core::{Transform, Vec3};

/// Air data for one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AirData {
    /// Magnitude of the relative wind, m/s.
    pub airspeed: f32,
    /// World velocity expressed in the body frame.
    pub local_velocity: Vec3,
    /// Vertical flow angle, radians. Positive when the flow strikes the underside.
    pub angle_of_attack: f32,
    /// Lateral flow angle, radians. Positive when drifting to the right of the nose.
    pub sideslip: f32,
}

impl AirData {
    /// Measure the airflow for a body at `transform` moving at `velocity` through still air.
    ///
    /// Below `min_airspeed` both flow angles are reported as zero.
    pub fn measure(transform: &Transform, velocity: Vec3, min_airspeed: f32) -> Self {
        let local_velocity = transform.inverse_rotate(velocity);
        let airspeed = local_velocity.length();

        if !airspeed.is_finite() || airspeed < min_airspeed.max(f32::EPSILON) {
            return Self {
                airspeed: if airspeed.is_finite() { airspeed } else { 0.0 },
                local_velocity,
                ..Default::default()
            };
        }

        // Forward is -Z, so a nose-high attitude shows up as flow with negative local Y.
        let angle_of_attack = (-local_velocity.y).atan2(-local_velocity.z);
        let sideslip = (local_velocity.x / airspeed).clamp(-1.0, 1.0).asin();

        Self {
            airspeed,
            local_velocity,
            angle_of_attack,
            sideslip,
        }
    }

    /// Dynamic pressure `½ρV²`, Pa.
    pub fn dynamic_pressure(&self, air_density: f32) -> f32 {
        0.5 * air_density.max(0.0) * self.airspeed * self.airspeed
    }
}

/// Attached-flow factor for `|α|` in degrees: 1 up to the stall angle, falling
/// linearly to 0 at the recovery angle, 0 beyond.
pub fn stall_blend(abs_angle_of_attack_deg: f32, stall_angle_deg: f32, recovery_angle_deg: f32) -> f32 {
    if !abs_angle_of_attack_deg.is_finite() {
        return 0.0;
    }
    if abs_angle_of_attack_deg <= stall_angle_deg {
        return 1.0;
    }
    let band = (recovery_angle_deg - stall_angle_deg).max(crate::math::EPSILON);
    let overshoot = (abs_angle_of_attack_deg - stall_angle_deg).min(band);
    (1.0 - overshoot / band).clamp(0.0, 1.0)
}

/// `clamp(speed / reference, 0, 1)` with the reference floored away from zero.
pub fn speed_ramp(speed: f32, reference_speed: f32) -> f32 {
    let ramp = safe_div(speed, reference_speed);
    if ramp.is_finite() {
        ramp.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

/// Control-surface authority in `[min_effectiveness, 1]`.
///
/// Grows with the speed ramp, then is pulled back towards the minimum as the wing stalls.
pub fn control_effectiveness(speed_ramp: f32, min_effectiveness: f32, stall_blend: f32) -> f32 {
    let min = min_effectiveness.clamp(0.0, 1.0);
    let from_speed = lerp(min, 1.0, speed_ramp.clamp(0.0, 1.0));
    lerp(min, from_speed, stall_blend.clamp(0.0, 1.0))
}
