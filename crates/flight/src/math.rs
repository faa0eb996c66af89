//! Small numeric helpers shared by the flight model.

use glam::Vec3;
use std::f32::consts::{PI, TAU};

/// Floor applied to any quantity used as a divisor (mass, wing area, speeds).
pub const EPSILON: f32 = 1e-3;

pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Divide, treating a denominator below [`EPSILON`] as [`EPSILON`].
pub fn safe_div(numerator: f32, denominator: f32) -> f32 {
    numerator / denominator.max(EPSILON)
}

/// Wrap an angle (radians) into `[-PI, PI]`.
pub fn wrap_angle(angle: f32) -> f32 {
    let wrapped = (angle + PI).rem_euclid(TAU) - PI;
    // rem_euclid can land exactly on -PI for +PI input; either end is fine.
    if wrapped.is_finite() {
        wrapped
    } else {
        0.0
    }
}

/// Interpolate between two angles along the shortest arc.
pub fn lerp_angle(from: f32, to: f32, t: f32) -> f32 {
    from + wrap_angle(to - from) * t
}

/// Blend factor for exponential decay over one tick: `clamp(dt * rate, 0, 1)`.
pub fn decay_factor(dt: f32, rate: f32) -> f32 {
    (dt * rate).clamp(0.0, 1.0)
}

/// Replace a non-finite vector with zero.
pub fn finite_or_zero(v: Vec3) -> Vec3 {
    if v.is_finite() {
        v
    } else {
        log::debug!("Discarding non-finite vector {:?}", v);
        Vec3::ZERO
    }
}
