//! One headless play session: a pilot, a plane on a runway and the fixed-tick loop.

use crate::config::SimConfig;
use crate::script::InputScript;
use engine_core::{ControlInputs, Entity, FixedTimestep, Transform, Vec3};
use input::{FlightKeymap, InputState};
use physics::{PhysicsWorld, TriggerEvent, TriggerZone, VehicleHull};
use std::time::Duration;
use vehicle::{ActorHost, EcsHost, Plane, SeatRig};

/// Pilot collision capsule.
const PILOT_HALF_HEIGHT: f32 = 0.6;
const PILOT_RADIUS: f32 = 0.3;

/// Running totals for the end-of-session summary.
#[derive(Debug, Clone, Copy, Default)]
pub struct SessionStats {
    pub ticks: u64,
    pub entries: u32,
    pub exits: u32,
    pub max_airspeed: f32,
    pub max_altitude: f32,
}

pub struct Session {
    config: SimConfig,
    host: EcsHost,
    physics: PhysicsWorld,
    hull: VehicleHull,
    trigger: TriggerZone,
    plane: Plane,
    plane_node: Entity,
    pilot: Entity,
    input: InputState,
    keymap: FlightKeymap,
    script: InputScript,
    timestep: FixedTimestep,
    clock: f32,
    next_log: f32,
    pending_interact: bool,
    stats: SessionStats,
}

impl Session {
    pub fn new(config: SimConfig, script: InputScript) -> Self {
        let mut host = EcsHost::new();
        let mut physics = PhysicsWorld::new();
        physics.add_ground_plane(0.0);
        // A hangar well off the runway, so the hull has something besides the ground.
        physics.add_static_cuboid(Vec3::new(40.0, 4.0, 20.0), 0.0, Vec3::new(10.0, 4.0, 8.0));

        let spawn = Transform::default();
        let plane_node = host.spawn_node(None, spawn);
        let mount = host.spawn_node(Some(plane_node), Transform::default());
        let plane = Plane::new(config.flight.clone(), SeatRig::new(config.seat.clone(), Some(mount)), spawn);

        let pilot = host.spawn_pilot(Transform::from_position(config.pilot_spawn), &[true]);
        physics.register_actor(&mut host.world, pilot, PILOT_HALF_HEIGHT, PILOT_RADIUS);
        physics.update_query_pipeline();

        let timestep = FixedTimestep::from_hz(config.tick_rate_hz);
        log::info!(
            "Session ready: {:.0} Hz, {:.0} s, pilot at {:?}",
            config.tick_rate_hz,
            config.duration_secs,
            config.pilot_spawn
        );
        Self {
            trigger: TriggerZone::new(config.trigger_radius),
            config,
            host,
            physics,
            hull: VehicleHull::default(),
            plane,
            plane_node,
            pilot,
            input: InputState::new(),
            keymap: FlightKeymap::default(),
            script,
            timestep,
            clock: 0.0,
            next_log: 0.0,
            pending_interact: false,
            stats: SessionStats::default(),
        }
    }

    pub fn is_finished(&self) -> bool {
        self.clock >= self.config.duration_secs
    }

    pub fn plane(&self) -> &Plane {
        &self.plane
    }

    pub fn host(&self) -> &EcsHost {
        &self.host
    }

    pub fn pilot(&self) -> Entity {
        self.pilot
    }

    pub fn stats(&self) -> SessionStats {
        self.stats
    }

    /// Process one rendered frame of `frame_time`: sample input, then run
    /// however many fixed ticks the frame owes.
    pub fn frame(&mut self, frame_time: Duration) {
        let from = self.clock;
        self.clock += frame_time.as_secs_f32();

        self.input.begin_frame();
        self.script.play(from, self.clock, &mut self.input);
        let mut controls = self.input.flight_controls(&self.keymap);
        // Hold the edge until a tick consumes it.
        self.pending_interact |= controls.interact_pressed;

        let ticks = self.timestep.advance(frame_time);
        let dt = self.timestep.step_seconds();
        for _ in 0..ticks {
            controls.interact_pressed = std::mem::take(&mut self.pending_interact);
            self.tick(dt, &controls);
        }
    }

    fn tick(&mut self, dt: f32, controls: &ControlInputs) {
        self.physics.sync_actor_colliders(&self.host.world);
        for event in self.trigger.update(&self.physics, self.plane.transform().position) {
            match event {
                TriggerEvent::Entered(actor) => self.plane.on_actor_entered_trigger(actor, &self.host),
                TriggerEvent::Exited(actor) => self.plane.on_actor_exited_trigger(actor),
            }
        }

        let occupant = self.plane.possession().occupant();
        let mut body = self.hull.in_world(&self.physics);
        let telemetry = self.plane.tick(dt, controls, &mut body, &mut self.host);
        self.host.set_transform(self.plane_node, *self.plane.transform());

        match (occupant, self.plane.possession().is_possessed()) {
            (None, true) => self.stats.entries += 1,
            (Some(pilot), false) => {
                // The pilot's shape was off while seated, so the zone lost track
                // of it. Re-track it so stepping out beyond the radius still
                // ends its nearby status.
                self.trigger.track(pilot);
                self.stats.exits += 1;
            }
            _ => {}
        }
        self.stats.ticks += 1;
        self.stats.max_airspeed = self.stats.max_airspeed.max(telemetry.airspeed);
        self.stats.max_altitude = self.stats.max_altitude.max(telemetry.altitude);

        if self.clock >= self.next_log {
            self.next_log += self.config.log_interval_secs.max(dt);
            log::info!(
                "t={:5.1}s {} alt {:6.1} m  ias {:5.1} m/s  thr {:3.0}%  aoa {:5.1}°  slip {:5.1}°  ctl {:.2}{}",
                self.clock,
                if self.plane.possession().is_possessed() { "flying" } else { "idle  " },
                telemetry.altitude,
                telemetry.airspeed,
                telemetry.throttle * 100.0,
                telemetry.angle_of_attack.to_degrees(),
                telemetry.sideslip.to_degrees(),
                telemetry.control_effectiveness,
                if telemetry.on_ground { "  [ground]" } else { "" },
            );
        } else {
            log::trace!("tick {} {:?}", self.stats.ticks, telemetry);
        }
    }
}
