//! A pilotable aircraft: flight model, runtime state and possession bundled
//! behind one fixed-tick entry point.

use crate::host::ActorHost;
use crate::possession::PossessionController;
use crate::rig::SeatRig;
use engine_core::{ControlInputs, Entity, Transform};
use flight::{FlightConfig, FlightModel, Telemetry, VehicleBody, VehicleState};

pub struct Plane {
    model: FlightModel,
    state: VehicleState,
    possession: PossessionController,
    telemetry: Telemetry,
}

impl Plane {
    pub fn new(config: FlightConfig, rig: SeatRig, spawn: Transform) -> Self {
        log::info!("Spawning {:?}-mode plane at {:?}", config.mode, spawn.position);
        Self {
            model: FlightModel::new(config),
            state: VehicleState::at(spawn),
            possession: PossessionController::new(rig),
            telemetry: Telemetry::default(),
        }
    }

    /// Run one simulation tick.
    ///
    /// Possessed: fly on `controls`, weld the occupant to the seat, then exit
    /// if interact was pressed. Idle: run idle physics, then seat the nearby
    /// actor if interact was pressed. `controls` are ignored while idle except
    /// for the interact edge.
    pub fn tick(
        &mut self,
        dt: f32,
        controls: &ControlInputs,
        body: &mut impl VehicleBody,
        host: &mut impl ActorHost,
    ) -> Telemetry {
        if self.possession.is_possessed() {
            self.telemetry = self.model.fly(&mut self.state, controls, body, dt);
            self.possession.sync_occupant(&self.state.transform, host);
            if controls.interact_pressed {
                self.possession.exit(&mut self.state, host);
            }
        } else {
            self.telemetry = self.model.idle(&mut self.state, body, dt);
            if controls.interact_pressed {
                if let Some(actor) = self.possession.nearby_actor() {
                    self.possession.enter(actor, &self.state.transform, host);
                }
            }
        }
        self.telemetry
    }

    /// Teleport the plane and clear all motion. Refused while someone is aboard.
    pub fn reset(&mut self, transform: Transform) -> bool {
        if self.possession.is_possessed() {
            log::warn!("Refusing to reset a possessed plane");
            return false;
        }
        self.state = VehicleState::at(transform);
        self.telemetry = Telemetry::default();
        true
    }

    pub fn on_actor_entered_trigger(&mut self, actor: Entity, host: &impl ActorHost) {
        self.possession.on_actor_entered_trigger(actor, host);
    }

    pub fn on_actor_exited_trigger(&mut self, actor: Entity) {
        self.possession.on_actor_exited_trigger(actor);
    }

    /// Values from the most recent tick.
    pub fn telemetry(&self) -> Telemetry {
        self.telemetry
    }

    pub fn state(&self) -> &VehicleState {
        &self.state
    }

    pub fn transform(&self) -> &Transform {
        &self.state.transform
    }

    pub fn model(&self) -> &FlightModel {
        &self.model
    }

    pub fn possession(&self) -> &PossessionController {
        &self.possession
    }

    pub fn possession_mut(&mut self) -> &mut PossessionController {
        &mut self.possession
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs_host::EcsHost;
    use crate::rig::SeatConfig;
    use engine_core::Vec3;
    use flight::{FlatGround, OpenSky};

    const DT: f32 = 1.0 / 60.0;

    fn plane(host: &mut EcsHost, config: FlightConfig, spawn: Transform) -> Plane {
        let mount = host.spawn_node(None, Transform::default());
        Plane::new(config, SeatRig::new(SeatConfig::default(), Some(mount)), spawn)
    }

    #[test]
    fn walk_up_take_off_and_climb_out() {
        let mut host = EcsHost::new();
        let mut plane = plane(&mut host, FlightConfig::default(), Transform::default());
        let mut ground = FlatGround::at(0.0);
        let pilot = host.spawn_pilot(Transform::from_position(Vec3::new(3.0, 0.0, 0.0)), &[true]);

        // Interact with nobody nearby does nothing.
        plane.tick(DT, &ControlInputs::interact(), &mut ground, &mut host);
        assert!(!plane.possession().is_possessed());

        plane.on_actor_entered_trigger(pilot, &host);
        plane.tick(DT, &ControlInputs::interact(), &mut ground, &mut host);
        assert_eq!(plane.possession().occupant(), Some(pilot));

        let full_throttle = ControlInputs {
            throttle: 1.0,
            ..Default::default()
        };
        for _ in 0..(60 * 5) {
            plane.tick(DT, &full_throttle, &mut ground, &mut host);
            let t = plane.telemetry();
            assert!((0.0..=1.0).contains(&t.throttle));
            assert!(plane.state().linear_velocity.is_finite());
        }
        assert!(plane.state().forward_speed() > 10.0);

        // Seat follows the aircraft down the runway.
        let seat = plane.possession().rig().seat_world(plane.transform()).unwrap();
        assert_eq!(host.component::<Transform>(pilot), Some(seat));

        plane.tick(DT, &ControlInputs::interact(), &mut ground, &mut host);
        assert!(!plane.possession().is_possessed());
        assert_eq!(plane.possession().nearby_actor(), Some(pilot));
        assert_eq!(plane.state().throttle, 0.0);
        assert!(host.is_visible(pilot));
        assert!(host.is_input_enabled(pilot));
    }

    #[test]
    fn controls_are_ignored_while_idle() {
        let mut host = EcsHost::new();
        let mut plane = plane(&mut host, FlightConfig::default(), Transform::default());
        let mut ground = FlatGround::at(0.0);
        let full = ControlInputs {
            pitch: 1.0,
            yaw: 1.0,
            roll: 1.0,
            throttle: 1.0,
            interact_pressed: false,
        };
        for _ in 0..120 {
            plane.tick(DT, &full, &mut ground, &mut host);
        }
        assert_eq!(plane.state().throttle, 0.0);
        assert_eq!(plane.state().angular_velocity, Vec3::ZERO);
    }

    #[test]
    fn maximal_input_never_exceeds_angular_limit() {
        let mut host = EcsHost::new();
        let spawn = Transform::from_position(Vec3::new(0.0, 500.0, 0.0));
        let mut plane = plane(&mut host, FlightConfig::default(), spawn);
        let pilot = host.spawn_pilot(Transform::default(), &[true]);
        plane.on_actor_entered_trigger(pilot, &host);
        plane.tick(DT, &ControlInputs::interact(), &mut OpenSky, &mut host);
        assert!(plane.possession().is_possessed());

        let limit = plane.model().config().max_angular_speed;
        let slam = ControlInputs {
            pitch: 1.0,
            yaw: 1.0,
            roll: 1.0,
            throttle: 1.0,
            interact_pressed: false,
        };
        for _ in 0..2000 {
            plane.tick(DT, &slam, &mut OpenSky, &mut host);
            assert!(plane.state().angular_velocity.length() <= limit + 1e-4);
        }
    }

    #[test]
    fn reset_is_refused_while_possessed() {
        let mut host = EcsHost::new();
        let mut plane = plane(&mut host, FlightConfig::simple(), Transform::default());
        let pilot = host.spawn_pilot(Transform::default(), &[true]);
        plane.on_actor_entered_trigger(pilot, &host);
        plane.tick(DT, &ControlInputs::interact(), &mut OpenSky, &mut host);

        let before = *plane.state();
        assert!(!plane.reset(Transform::from_position(Vec3::splat(10.0))));
        assert_eq!(*plane.state(), before);

        plane.tick(DT, &ControlInputs::interact(), &mut OpenSky, &mut host);
        let target = Transform::from_position(Vec3::new(0.0, 50.0, 0.0));
        assert!(plane.reset(target));
        assert_eq!(*plane.state(), VehicleState::at(target));
        assert_eq!(plane.telemetry(), Telemetry::default());
    }
}
