//! The powered flight step.

use crate::air_data::{control_effectiveness, speed_ramp, stall_blend, AirData};
use crate::body::VehicleBody;
use crate::config::{AeroMode, FlightConfig};
use crate::math::{finite_or_zero, lerp, safe_div, EPSILON};
use crate::state::{Telemetry, VehicleState};
use crate::GRAVITY;
use engine_core::{ControlInputs, Vec3};
use std::f32::consts::{PI, TAU};

/// Propeller spin rate at idle and at full throttle, rad/s.
const PROP_IDLE_SPIN: f32 = 3.0;
const PROP_FULL_SPIN: f32 = 40.0;
/// Forward push per unit throttle when the aircraft is (nearly) stationary.
const STANDSTILL_NUDGE: f32 = 2.0;

/// Cosmetic propeller spin rate for a throttle setting.
pub fn propeller_spin_speed(throttle: f32) -> f32 {
    lerp(PROP_IDLE_SPIN, PROP_FULL_SPIN, throttle.clamp(0.0, 1.0))
}

/// `clamp(throttle + input * response * dt, 0, 1)`.
pub fn integrate_throttle(throttle: f32, input: f32, response: f32, dt: f32) -> f32 {
    let next = throttle + input * response * dt;
    if next.is_finite() {
        next.clamp(0.0, 1.0)
    } else {
        throttle.clamp(0.0, 1.0)
    }
}

pub(crate) fn valid_dt(dt: f32) -> bool {
    dt.is_finite() && dt > 0.0
}

/// Flight model for one aircraft type.
#[derive(Debug, Clone, Default)]
pub struct FlightModel {
    config: FlightConfig,
}

impl FlightModel {
    pub fn new(config: FlightConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &FlightConfig {
        &self.config
    }

    /// Advance `state` by one powered tick and return the next state.
    ///
    /// The returned `linear_velocity` is the *desired* velocity; the position
    /// is not integrated here (see [`FlightModel::fly`]). A non-positive or
    /// non-finite `dt` returns the state unchanged.
    pub fn step(&self, state: &VehicleState, controls: &ControlInputs, dt: f32) -> (VehicleState, Telemetry) {
        if !valid_dt(dt) {
            log::trace!("Skipping flight step with dt = {}", dt);
            return (*state, Telemetry::default());
        }
        let controls = controls.sanitized();
        match self.config.mode {
            AeroMode::Full => self.step_full(state, &controls, dt),
            AeroMode::Simple => self.step_simple(state, &controls, dt),
        }
    }

    /// One possessed tick: step, hand the desired velocity to the host, and
    /// integrate the position with whatever the host applied.
    pub fn fly(
        &self,
        state: &mut VehicleState,
        controls: &ControlInputs,
        body: &mut impl VehicleBody,
        dt: f32,
    ) -> Telemetry {
        if !valid_dt(dt) {
            return Telemetry::default();
        }
        let (mut next, mut telemetry) = self.step(state, controls, dt);

        let applied = finite_or_zero(body.move_and_resolve(&next.transform, next.linear_velocity, dt));
        next.linear_velocity = applied;
        next.transform.position += applied * dt;
        spin_propeller(&mut next, dt);

        telemetry.altitude = next.transform.position.y;
        telemetry.on_ground = body.is_on_ground(&next.transform);
        *state = next;
        telemetry
    }

    fn step_full(&self, state: &VehicleState, controls: &ControlInputs, dt: f32) -> (VehicleState, Telemetry) {
        let cfg = &self.config;
        let mut next = *state;
        next.throttle = integrate_throttle(state.throttle, controls.throttle, cfg.throttle_response, dt);

        let velocity = finite_or_zero(state.linear_velocity);
        let transform = state.transform;
        let air = AirData::measure(&transform, velocity, cfg.min_airspeed);

        let stall = stall_blend(
            air.angle_of_attack.to_degrees().abs(),
            cfg.stall_angle_deg,
            cfg.stall_recovery_angle_deg,
        );
        let ramp = speed_ramp(air.airspeed, cfg.takeoff_speed);
        let effectiveness = control_effectiveness(ramp, cfg.min_control_effectiveness, stall);

        // Coefficients.
        let max_cl = cfg.max_lift_coefficient.abs();
        let lift_coefficient = (cfg.lift_curve_slope * air.angle_of_attack).clamp(-max_cl, max_cl) * stall;
        let induced = safe_div(lift_coefficient * lift_coefficient, PI * cfg.aspect_ratio());
        let clean_drag = cfg.base_drag_coefficient + induced;
        let drag_coefficient = lerp(clean_drag * cfg.stall_drag_multiplier, clean_drag, stall);
        let side_coefficient = -cfg.side_force_coefficient * air.sideslip * stall * ramp;

        // Forces.
        let qs = air.dynamic_pressure(cfg.air_density) * cfg.wing_area.max(0.0);
        // Drag opposes the relative wind; with forward -Z that is +Z in level flight.
        let drag_dir = -air.local_velocity.normalize_or_zero();
        let aero_body = Vec3::new(side_coefficient * qs, lift_coefficient * qs, 0.0) + drag_dir * drag_coefficient * qs;
        let aero_world = transform.rotation * aero_body;

        let mass = cfg.mass.max(EPSILON);
        let thrust = transform.forward() * cfg.max_thrust * next.throttle;
        let gravity = Vec3::NEG_Y * GRAVITY * mass;
        let acceleration = (aero_world + thrust + gravity) / mass;

        let mut new_velocity = velocity + acceleration * dt;
        if air.airspeed < cfg.min_airspeed {
            new_velocity += transform.forward() * next.throttle * dt * STANDSTILL_NUDGE;
        }
        next.linear_velocity = cap_speed(finite_or_zero(new_velocity), cfg.max_speed);

        // Rotational dynamics, body frame (x = pitch, y = yaw, z = roll).
        let control_torque = Vec3::new(
            controls.pitch * cfg.pitch_authority,
            -controls.yaw * cfg.yaw_authority,
            -controls.roll * cfg.roll_authority,
        ) * effectiveness;
        let bank = transform.right().y;
        let stability_torque = Vec3::new(
            -cfg.pitch_stability * air.angle_of_attack,
            -cfg.yaw_stability * air.sideslip,
            -cfg.roll_stability * bank,
        );
        let omega = finite_or_zero(state.angular_velocity);
        let damping_torque = -omega * cfg.angular_damping * effectiveness;

        let omega = finite_or_zero(omega + (control_torque + stability_torque + damping_torque) * dt)
            .clamp_length_max(cfg.max_angular_speed.max(0.0));
        next.angular_velocity = omega;

        next.transform.rotate_local_x(omega.x * dt);
        next.transform.rotate_local_y(omega.y * dt);
        next.transform.rotate_local_z(omega.z * dt);

        next.speed = air.airspeed;

        let telemetry = Telemetry {
            airspeed: air.airspeed,
            altitude: transform.position.y,
            throttle: next.throttle,
            angle_of_attack: air.angle_of_attack,
            sideslip: air.sideslip,
            stall_blend: stall,
            control_effectiveness: effectiveness,
            on_ground: false,
        };
        (next, telemetry)
    }

    fn step_simple(&self, state: &VehicleState, controls: &ControlInputs, dt: f32) -> (VehicleState, Telemetry) {
        let cfg = &self.config;
        let mut next = *state;
        next.throttle = integrate_throttle(state.throttle, controls.throttle, cfg.throttle_response, dt);
        next.angular_velocity = Vec3::ZERO;

        let velocity = finite_or_zero(state.linear_velocity);
        let air = AirData::measure(&state.transform, velocity, cfg.min_airspeed);
        let ramp = speed_ramp(air.airspeed, cfg.takeoff_speed);
        let effectiveness = control_effectiveness(ramp, cfg.min_control_effectiveness, 1.0);

        // Attitude follows the stick directly.
        next.transform.rotate_local_x(controls.pitch * cfg.simple_pitch_rate * effectiveness * dt);
        next.transform.rotate_local_y(-controls.yaw * cfg.simple_yaw_rate * effectiveness * dt);
        next.transform.rotate_local_z(-controls.roll * cfg.simple_roll_rate * effectiveness * dt);

        let forward = state.transform.forward();
        let forward_speed = velocity.dot(forward).max(0.0);
        let mass = cfg.mass.max(EPSILON);

        let lift = state.transform.up() * cfg.lift_per_speed * forward_speed;
        let thrust = forward * safe_div(cfg.max_thrust * next.throttle, mass);
        let drag = -velocity * cfg.simple_drag * air.airspeed;
        let gravity = Vec3::NEG_Y * GRAVITY;

        let mut new_velocity = velocity + (lift + thrust + drag + gravity) * dt;
        if air.airspeed < cfg.min_airspeed {
            new_velocity += forward * next.throttle * dt * STANDSTILL_NUDGE;
        }
        next.linear_velocity = cap_speed(finite_or_zero(new_velocity), cfg.max_speed);
        next.speed = air.airspeed;

        let telemetry = Telemetry {
            airspeed: air.airspeed,
            altitude: state.transform.position.y,
            throttle: next.throttle,
            angle_of_attack: air.angle_of_attack,
            sideslip: air.sideslip,
            stall_blend: 1.0,
            control_effectiveness: effectiveness,
            on_ground: false,
        };
        (next, telemetry)
    }
}

fn cap_speed(velocity: Vec3, max_speed: f32) -> Vec3 {
    velocity.clamp_length_max(max_speed.max(0.0))
}

pub(crate) fn spin_propeller(state: &mut VehicleState, dt: f32) {
    let angle = state.propeller_angle + propeller_spin_speed(state.throttle) * dt;
    state.propeller_angle = if angle.is_finite() { angle.rem_euclid(TAU) } else { 0.0 };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::body::{FlatGround, OpenSky};
    use engine_core::{Quat, Transform};

    const DT: f32 = 1.0 / 60.0;

    fn airborne(velocity: Vec3) -> VehicleState {
        VehicleState {
            linear_velocity: velocity,
            ..VehicleState::at(Transform::from_position(Vec3::new(0.0, 500.0, 0.0)))
        }
    }

    fn assert_finite(state: &VehicleState) {
        assert!(state.linear_velocity.is_finite(), "velocity {:?}", state.linear_velocity);
        assert!(state.angular_velocity.is_finite(), "angular {:?}", state.angular_velocity);
        assert!(state.transform.is_finite());
        assert!(state.throttle.is_finite());
    }

    #[test]
    fn throttle_stays_in_unit_range() {
        let inputs = [1.0, 1.0, -1.0, 0.3, 1.0, -0.7, -1.0, -1.0, 1.0];
        let dts = [0.016, 0.5, 2.0, 0.001, 10.0, 0.1, 0.3, 5.0, 0.05];
        let mut throttle = 0.0;
        for round in 0..50 {
            for (i, (&input, &dt)) in inputs.iter().zip(dts.iter()).enumerate() {
                throttle = integrate_throttle(throttle, input, 1.8, dt * (1.0 + round as f32 * 0.1));
                assert!((0.0..=1.0).contains(&throttle), "round {} step {}: {}", round, i, throttle);
            }
        }
    }

    #[test]
    fn degenerate_airframe_never_produces_nan() {
        let config = FlightConfig {
            mass: 0.0,
            wing_area: 0.0,
            takeoff_speed: 0.0,
            ..Default::default()
        };
        let controls = ControlInputs {
            pitch: 1.0,
            yaw: 1.0,
            roll: 1.0,
            throttle: 1.0,
            interact_pressed: false,
        };
        for mode in [AeroMode::Full, AeroMode::Simple] {
            let model = FlightModel::new(FlightConfig { mode, ..config.clone() });
            for velocity in [Vec3::ZERO, Vec3::new(0.0, 0.0, -30.0), Vec3::new(5.0, -20.0, 3.0)] {
                let (next, telemetry) = model.step(&airborne(velocity), &controls, DT);
                assert_finite(&next);
                assert!(telemetry.control_effectiveness.is_finite());
            }
        }
    }

    #[test]
    fn zero_wing_span_and_mass_survive_many_ticks() {
        let model = FlightModel::new(FlightConfig {
            mass: 0.0,
            wing_area: 0.0,
            wing_span: 0.0,
            takeoff_speed: 0.0,
            ..Default::default()
        });
        let controls = ControlInputs {
            throttle: 1.0,
            pitch: 0.5,
            ..Default::default()
        };
        let mut state = airborne(Vec3::ZERO);
        for _ in 0..600 {
            model.fly(&mut state, &controls, &mut OpenSky, DT);
            assert_finite(&state);
            assert!(state.linear_velocity.length() <= model.config().max_speed + 1e-3);
        }
    }

    #[test]
    fn non_finite_velocity_is_discarded() {
        let model = FlightModel::default();
        let state = airborne(Vec3::new(f32::NAN, 0.0, f32::INFINITY));
        let (next, _) = model.step(&state, &ControlInputs::default(), DT);
        assert_finite(&next);
    }

    #[test]
    fn invalid_dt_leaves_state_untouched() {
        let model = FlightModel::default();
        let state = airborne(Vec3::new(0.0, 0.0, -40.0));
        for dt in [0.0, -0.1, f32::NAN] {
            let (next, _) = model.step(&state, &ControlInputs::default(), dt);
            assert_eq!(next, state);
        }
    }

    #[test]
    fn stationary_takeoff_roll_accelerates_monotonically() {
        let model = FlightModel::default();
        assert_eq!(model.config().throttle_response, 1.8);
        let mut state = VehicleState::default();
        let mut runway = FlatGround::at(0.0);
        let controls = ControlInputs {
            throttle: 1.0,
            ..Default::default()
        };

        let mut previous = state.forward_speed();
        assert_eq!(previous, 0.0);
        let ticks = (5.0 / DT).round() as usize;
        for tick in 0..ticks {
            model.fly(&mut state, &controls, &mut runway, DT);
            let forward = state.forward_speed();
            assert!(forward >= previous - 1e-5, "tick {}: {} < {}", tick, forward, previous);
            previous = forward;
        }
        assert_eq!(state.throttle, 1.0);
        assert!(previous > 10.0, "only reached {} m/s", previous);
    }

    #[test]
    fn standstill_nudge_moves_a_stationary_aircraft() {
        let model = FlightModel::default();
        let state = VehicleState {
            throttle: 1.0,
            ..VehicleState::default()
        };
        let mut runway = FlatGround::at(0.0);
        let mut moved = state;
        model.fly(&mut moved, &ControlInputs::default(), &mut runway, DT);
        assert!(moved.forward_speed() > 0.0);
    }

    #[test]
    fn angular_speed_never_exceeds_limit() {
        let model = FlightModel::default();
        let limit = model.config().max_angular_speed;
        let controls = ControlInputs {
            pitch: 1.0,
            yaw: 1.0,
            roll: 1.0,
            throttle: 1.0,
            interact_pressed: false,
        };
        let mut state = airborne(Vec3::new(0.0, 0.0, -60.0));
        for tick in 0..2000 {
            model.fly(&mut state, &controls, &mut OpenSky, DT);
            let w = state.angular_velocity.length();
            assert!(w <= limit + 1e-4, "tick {}: |w| = {}", tick, w);
        }
    }

    #[test]
    fn lift_balances_gravity_at_cruise_attitude() {
        // 3° nose-up at 60 m/s: Cl = 5.5 * 0.052 = 0.29, lift ≈ 0.29 * 2205 * 16 ≈ 10.2 kN,
        // close to the 11.8 kN weight, so the climb rate change stays small.
        let model = FlightModel::default();
        let state = VehicleState {
            transform: Transform::from_position_rotation(
                Vec3::new(0.0, 500.0, 0.0),
                Quat::from_rotation_x(3f32.to_radians()),
            ),
            linear_velocity: Vec3::new(0.0, 0.0, -60.0),
            throttle: 0.5,
            ..Default::default()
        };
        let (next, telemetry) = model.step(&state, &ControlInputs::default(), DT);
        assert!(telemetry.stall_blend == 1.0);
        let vertical_accel = (next.linear_velocity.y - state.linear_velocity.y) / DT;
        assert!(vertical_accel.abs() < 3.0, "vertical accel {}", vertical_accel);
    }

    #[test]
    fn deep_stall_loses_lift_and_authority() {
        let model = FlightModel::default();
        let state = VehicleState {
            transform: Transform::from_position_rotation(
                Vec3::new(0.0, 500.0, 0.0),
                Quat::from_rotation_x(40f32.to_radians()),
            ),
            linear_velocity: Vec3::new(0.0, 0.0, -40.0),
            ..Default::default()
        };
        let (_, telemetry) = model.step(&state, &ControlInputs::default(), DT);
        assert_eq!(telemetry.stall_blend, 0.0);
        assert!((telemetry.control_effectiveness - model.config().min_control_effectiveness).abs() < 1e-5);
    }

    #[test]
    fn banked_aircraft_rolls_back_toward_level() {
        let model = FlightModel::default();
        let state = VehicleState {
            transform: Transform::from_position_rotation(
                Vec3::new(0.0, 500.0, 0.0),
                Quat::from_rotation_z(30f32.to_radians()),
            ),
            linear_velocity: Vec3::new(0.0, 0.0, -50.0),
            ..Default::default()
        };
        let (next, _) = model.step(&state, &ControlInputs::default(), DT);
        // Right wing is up (positive bank), so the roll rate must go negative.
        assert!(next.angular_velocity.z < 0.0);
    }

    #[test]
    fn positive_pitch_input_raises_the_nose() {
        let model = FlightModel::default();
        let mut state = airborne(Vec3::new(0.0, 0.0, -50.0));
        let controls = ControlInputs {
            pitch: 1.0,
            ..Default::default()
        };
        for _ in 0..10 {
            let (next, _) = model.step(&state, &controls, DT);
            state = next;
        }
        assert!(state.transform.forward().y > 0.0);
    }

    #[test]
    fn simple_mode_has_no_angular_state_and_turns_directly() {
        let model = FlightModel::new(FlightConfig::simple());
        let state = airborne(Vec3::new(0.0, 0.0, -40.0));
        let controls = ControlInputs {
            yaw: 1.0,
            ..Default::default()
        };
        let (next, _) = model.step(&state, &controls, DT);
        assert_eq!(next.angular_velocity, Vec3::ZERO);
        // Positive yaw swings the nose right (+X).
        assert!(next.transform.forward().x > 0.0);
    }

    #[test]
    fn simple_mode_lift_grows_with_forward_speed() {
        let model = FlightModel::new(FlightConfig::simple());
        let slow = model.step(&airborne(Vec3::new(0.0, 0.0, -10.0)), &ControlInputs::default(), DT).0;
        let fast = model.step(&airborne(Vec3::new(0.0, 0.0, -60.0)), &ControlInputs::default(), DT).0;
        assert!(fast.linear_velocity.y > slow.linear_velocity.y);
    }

    #[test]
    fn propeller_spin_follows_throttle() {
        assert_eq!(propeller_spin_speed(0.0), 3.0);
        assert_eq!(propeller_spin_speed(1.0), 40.0);
        assert_eq!(propeller_spin_speed(7.0), 40.0);
    }
}
