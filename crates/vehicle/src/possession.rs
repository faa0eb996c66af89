//! Who is flying the vehicle: the enter/exit state machine and the
//! camera/input handoff that goes with it.
//!
//! Every transition is total. Entering while possessed, exiting while idle,
//! or entering a vehicle with a faulty rig are silent no-ops that return
//! `false`; nothing is half-applied.

use crate::host::ActorHost;
use crate::rig::{RigError, SeatRig};
use engine_core::{Entity, Transform, Vec3};
use flight::VehicleState;

/// What an occupant looked like before it climbed in. Only exists while possessed.
#[derive(Debug, Clone, PartialEq)]
pub struct OccupantSnapshot {
    pub visible: bool,
    pub input_enabled: bool,
    pub physics_enabled: bool,
    /// Shapes this controller turned off. Shapes that were already off are not listed.
    pub disabled_colliders: Vec<Entity>,
    pub camera: Entity,
    pub camera_parent: Option<Entity>,
    pub camera_local: Transform,
    pub cursor_captured: bool,
}

#[derive(Debug, Clone, PartialEq)]
enum Seat {
    Empty,
    Occupied {
        occupant: Entity,
        snapshot: OccupantSnapshot,
    },
}

/// Single-seat possession state for one vehicle.
#[derive(Debug, Clone, PartialEq)]
pub struct PossessionController {
    rig: SeatRig,
    fault: Option<RigError>,
    seat: Seat,
    nearby_actor: Option<Entity>,
}

impl PossessionController {
    /// Build a controller. A faulty rig is logged once here and the vehicle
    /// then refuses every `enter`.
    pub fn new(rig: SeatRig) -> Self {
        let fault = rig.validate().err();
        if let Some(e) = &fault {
            log::error!("Vehicle cannot be possessed: {}", e);
        }
        Self {
            rig,
            fault,
            seat: Seat::Empty,
            nearby_actor: None,
        }
    }

    /// Like [`PossessionController::new`], but hands the setup fault back to the caller.
    pub fn try_new(rig: SeatRig) -> Result<Self, RigError> {
        rig.validate()?;
        Ok(Self::new(rig))
    }

    pub fn rig(&self) -> &SeatRig {
        &self.rig
    }

    /// The setup fault that blocks possession, if any.
    pub fn fault(&self) -> Option<&RigError> {
        self.fault.as_ref()
    }

    pub fn is_possessed(&self) -> bool {
        matches!(self.seat, Seat::Occupied { .. })
    }

    pub fn occupant(&self) -> Option<Entity> {
        match &self.seat {
            Seat::Occupied { occupant, .. } => Some(*occupant),
            Seat::Empty => None,
        }
    }

    pub fn snapshot(&self) -> Option<&OccupantSnapshot> {
        match &self.seat {
            Seat::Occupied { snapshot, .. } => Some(snapshot),
            Seat::Empty => None,
        }
    }

    pub fn nearby_actor(&self) -> Option<Entity> {
        self.nearby_actor
    }

    /// An actor stepped into the entry trigger.
    pub fn on_actor_entered_trigger(&mut self, actor: Entity, host: &impl ActorHost) {
        if host.is_pilot(actor) && self.occupant() != Some(actor) {
            self.nearby_actor = Some(actor);
        }
    }

    /// An actor left the entry trigger.
    pub fn on_actor_exited_trigger(&mut self, actor: Entity) {
        if self.nearby_actor == Some(actor) {
            self.nearby_actor = None;
        }
    }

    /// The host despawned `actor`; drop any reference we hold to it.
    pub fn forget_actor(&mut self, actor: Entity) {
        if self.occupant() == Some(actor) {
            log::warn!("Actor {:?} despawned while seated; exit it first", actor);
            return;
        }
        self.on_actor_exited_trigger(actor);
    }

    /// Seat `actor` in the vehicle. Returns whether possession happened.
    pub fn enter(&mut self, actor: Entity, vehicle: &Transform, host: &mut impl ActorHost) -> bool {
        if self.is_possessed() {
            log::trace!("Enter by {:?} ignored: seat taken", actor);
            return false;
        }
        if self.fault.is_some() {
            log::debug!("Enter by {:?} refused: rig fault", actor);
            return false;
        }
        // Resolve everything that can fail before touching the actor.
        let (Some(seat), Some(mount)) = (self.rig.seat_world(vehicle), self.rig.camera_mount) else {
            return false;
        };
        if !host.is_pilot(actor) {
            log::warn!("Enter refused: {:?} is not a pilot", actor);
            return false;
        }
        let Some(camera) = host.camera_of(actor) else {
            log::warn!("Enter refused: pilot {:?} has no camera", actor);
            return false;
        };

        let colliders = host.colliders(actor);
        let disabled_colliders: Vec<Entity> = colliders
            .into_iter()
            .filter(|&shape| host.is_collider_enabled(shape))
            .collect();
        let snapshot = OccupantSnapshot {
            visible: host.is_visible(actor),
            input_enabled: host.is_input_enabled(actor),
            physics_enabled: host.is_physics_enabled(actor),
            disabled_colliders,
            camera,
            camera_parent: host.parent_of(camera),
            camera_local: host.local_transform(camera),
            cursor_captured: host.is_cursor_captured(),
        };

        host.set_visible(actor, false);
        host.set_input_enabled(actor, false);
        host.set_physics_enabled(actor, false);
        for &shape in &snapshot.disabled_colliders {
            host.set_collider_enabled(shape, false);
        }
        host.set_transform(actor, seat);
        host.set_velocity(actor, Vec3::ZERO);

        host.attach(camera, Some(mount));
        host.set_local_transform(camera, self.rig.config.camera_offset);
        host.set_cursor_captured(true);

        self.nearby_actor = None;
        self.seat = Seat::Occupied {
            occupant: actor,
            snapshot,
        };
        log::info!("Actor {:?} entered vehicle", actor);
        true
    }

    /// Put the occupant back on foot beside the vehicle and zero the vehicle's
    /// throttle, speed and angular velocity. Returns whether anyone left.
    pub fn exit(&mut self, vehicle: &mut VehicleState, host: &mut impl ActorHost) -> bool {
        let Seat::Occupied { occupant, snapshot } = std::mem::replace(&mut self.seat, Seat::Empty) else {
            log::trace!("Exit ignored: seat empty");
            return false;
        };

        host.attach(snapshot.camera, snapshot.camera_parent);
        host.set_local_transform(snapshot.camera, snapshot.camera_local);
        host.set_visible(occupant, snapshot.visible);

        host.set_transform(occupant, self.rig.exit_world(&vehicle.transform));
        host.set_velocity(occupant, Vec3::ZERO);

        host.set_input_enabled(occupant, snapshot.input_enabled);
        host.set_physics_enabled(occupant, snapshot.physics_enabled);
        for &shape in &snapshot.disabled_colliders {
            host.set_collider_enabled(shape, true);
        }
        host.set_cursor_captured(snapshot.cursor_captured);

        // Still standing in the trigger volume.
        self.nearby_actor = Some(occupant);
        vehicle.reset_controls();
        log::info!("Actor {:?} exited vehicle", occupant);
        true
    }

    /// Weld the occupant to the seat. Called every possessed tick.
    pub fn sync_occupant(&self, vehicle: &Transform, host: &mut impl ActorHost) {
        let Some(occupant) = self.occupant() else {
            return;
        };
        if let Some(seat) = self.rig.seat_world(vehicle) {
            host.set_transform(occupant, seat);
            host.set_velocity(occupant, Vec3::ZERO);
        }
    }
}
