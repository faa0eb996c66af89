//! Unpossessed behaviour: throttle spools down, the airframe sinks or rests,
//! and on the ground it settles wings-level.

use crate::body::VehicleBody;
use crate::math::{decay_factor, finite_or_zero, lerp, lerp_angle};
use crate::model::{spin_propeller, valid_dt, FlightModel};
use crate::state::{Telemetry, VehicleState};
use engine_core::{EulerRot, Quat, Vec3};

impl FlightModel {
    /// One idle tick against the host body.
    pub fn idle(&self, state: &mut VehicleState, body: &mut impl VehicleBody, dt: f32) -> Telemetry {
        if !valid_dt(dt) {
            return Telemetry::default();
        }
        let cfg = self.config();
        let on_ground = body.is_on_ground(&state.transform);
        let k = decay_factor(dt, cfg.idle_decay_rate);

        state.throttle = lerp(state.throttle, 0.0, k).clamp(0.0, 1.0);
        state.speed = lerp(state.speed, 0.0, k);
        state.angular_velocity = finite_or_zero(state.angular_velocity).lerp(Vec3::ZERO, k);

        let target = if on_ground {
            Vec3::ZERO
        } else {
            Vec3::new(0.0, -cfg.idle_gravity_force, 0.0)
        };
        let desired = finite_or_zero(state.linear_velocity).lerp(target, k);

        let applied = finite_or_zero(body.move_and_resolve(&state.transform, desired, dt));
        state.linear_velocity = applied;
        state.transform.position += applied * dt;

        if on_ground {
            state.transform.rotation = settle_level(
                state.transform.rotation,
                decay_factor(dt, cfg.ground_align_rate),
            );
        }
        spin_propeller(state, dt);

        Telemetry {
            airspeed: applied.length(),
            altitude: state.transform.position.y,
            throttle: state.throttle,
            stall_blend: 1.0,
            control_effectiveness: cfg.min_control_effectiveness,
            on_ground,
            ..Default::default()
        }
    }
}

/// Move pitch and roll a fraction `t` of the way to zero along the shortest arc, keeping heading.
pub fn settle_level(rotation: Quat, t: f32) -> Quat {
    let (yaw, pitch, roll) = rotation.normalize().to_euler(EulerRot::YXZ);
    let pitch = lerp_angle(pitch, 0.0, t);
    let roll = lerp_angle(roll, 0.0, t);
    Quat::from_euler(EulerRot::YXZ, yaw, pitch, roll).normalize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::body::{FlatGround, OpenSky};
    use engine_core::Transform;

    const DT: f32 = 1.0 / 60.0;

    #[test]
    fn throttle_and_speed_decay_toward_zero() {
        let model = FlightModel::default();
        let mut state = VehicleState {
            throttle: 1.0,
            speed: 40.0,
            ..VehicleState::default()
        };
        let mut ground = FlatGround::at(0.0);
        let mut previous = state.throttle;
        for _ in 0..300 {
            model.idle(&mut state, &mut ground, DT);
            assert!(state.throttle <= previous);
            previous = state.throttle;
        }
        assert!(state.throttle < 1e-3);
        assert!(state.speed < 0.05);
    }

    #[test]
    fn airborne_idle_sinks_at_idle_gravity() {
        let model = FlightModel::default();
        let mut state = VehicleState::at(Transform::from_position(Vec3::new(0.0, 100.0, 0.0)));
        for _ in 0..600 {
            model.idle(&mut state, &mut OpenSky, DT);
        }
        let sink = model.config().idle_gravity_force;
        assert!((state.linear_velocity.y + sink).abs() < 0.01, "{:?}", state.linear_velocity);
        assert!(state.transform.position.y < 100.0);
    }

    #[test]
    fn grounded_idle_brakes_to_a_stop() {
        let model = FlightModel::default();
        let mut state = VehicleState {
            linear_velocity: Vec3::new(0.0, 0.0, -20.0),
            ..VehicleState::default()
        };
        let mut ground = FlatGround::at(0.0);
        for _ in 0..600 {
            model.idle(&mut state, &mut ground, DT);
        }
        assert!(state.linear_velocity.length() < 0.01);
        assert_eq!(state.transform.position.y, 0.0);
    }

    #[test]
    fn grounded_idle_levels_wings_and_keeps_heading() {
        let model = FlightModel::default();
        let heading = 2.0;
        let tilted = Quat::from_euler(EulerRot::YXZ, heading, 0.4, -0.6);
        let mut state = VehicleState::at(Transform::from_position_rotation(Vec3::ZERO, tilted));
        let mut ground = FlatGround::at(0.0);
        for _ in 0..600 {
            model.idle(&mut state, &mut ground, DT);
        }
        let (yaw, pitch, roll) = state.transform.rotation.to_euler(EulerRot::YXZ);
        assert!(pitch.abs() < 1e-3 && roll.abs() < 1e-3, "pitch {} roll {}", pitch, roll);
        assert!((yaw - heading).abs() < 1e-3);
    }

    #[test]
    fn settle_level_moves_a_fraction_of_the_way() {
        let start = Quat::from_euler(EulerRot::YXZ, 0.0, 0.0, 170f32.to_radians());
        let next = settle_level(start, 0.1);
        let (_, _, roll) = next.to_euler(EulerRot::YXZ);
        assert!((roll.to_degrees() - 153.0).abs() < 0.1, "roll {}", roll.to_degrees());
    }
}
