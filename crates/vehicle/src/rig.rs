//! Seat and camera attachment points of a vehicle, validated once at setup.

use engine_core::{Entity, Quat, Transform, Vec3};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Setup faults that stop a vehicle from accepting an occupant.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RigError {
    #[error("vehicle has no seat anchor")]
    MissingSeatAnchor,
    #[error("vehicle has no camera mount")]
    MissingCameraMount,
    #[error("seat rig contains non-finite offsets")]
    NonFiniteSeat,
}

/// Data-driven part of the rig, loadable from RON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeatConfig {
    /// Where the occupant is welded, local to the vehicle. `None` means the model has no seat.
    pub seat_anchor: Option<Transform>,
    /// Camera local transform under the camera mount while seated.
    pub camera_offset: Transform,
    /// Where the occupant is dropped on exit, local to the vehicle.
    pub exit_offset: Vec3,
}

impl Default for SeatConfig {
    fn default() -> Self {
        Self {
            seat_anchor: Some(Transform::from_position(Vec3::new(0.0, 0.6, 0.3))),
            camera_offset: Transform::from_position(Vec3::new(0.0, 1.1, 0.2)),
            exit_offset: Vec3::new(-2.2, 0.5, -1.5),
        }
    }
}

/// A seat config bound to the host node the camera is parented under.
#[derive(Debug, Clone, PartialEq)]
pub struct SeatRig {
    pub config: SeatConfig,
    pub camera_mount: Option<Entity>,
}

impl SeatRig {
    pub fn new(config: SeatConfig, camera_mount: Option<Entity>) -> Self {
        Self {
            config,
            camera_mount,
        }
    }

    /// Check that every collaborator the possession handoff needs is present.
    pub fn validate(&self) -> Result<(), RigError> {
        let seat = self.config.seat_anchor.ok_or(RigError::MissingSeatAnchor)?;
        self.camera_mount.ok_or(RigError::MissingCameraMount)?;
        if !seat.is_finite() || !self.config.camera_offset.is_finite() || !self.config.exit_offset.is_finite() {
            return Err(RigError::NonFiniteSeat);
        }
        Ok(())
    }

    /// World transform of the seat for a vehicle at `vehicle`.
    pub fn seat_world(&self, vehicle: &Transform) -> Option<Transform> {
        self.config.seat_anchor.map(|seat| vehicle.mul_transform(&seat))
    }

    /// World transform an occupant is dropped at on exit: `origin + basis * exit_offset`,
    /// standing upright with the vehicle's heading.
    pub fn exit_world(&self, vehicle: &Transform) -> Transform {
        let position = vehicle.transform_point(self.config.exit_offset);
        let forward = vehicle.forward();
        let heading = if forward.x.abs() + forward.z.abs() > f32::EPSILON {
            (-forward.x).atan2(-forward.z)
        } else {
            0.0
        };
        Transform::from_position_rotation(position, Quat::from_rotation_y(heading))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mount() -> Entity {
        let mut world = engine_core::World::new();
        world.spawn(())
    }

    #[test]
    fn default_rig_with_mount_is_valid() {
        let rig = SeatRig::new(SeatConfig::default(), Some(mount()));
        assert_eq!(rig.validate(), Ok(()));
    }

    #[test]
    fn missing_pieces_are_reported() {
        let no_mount = SeatRig::new(SeatConfig::default(), None);
        assert_eq!(no_mount.validate(), Err(RigError::MissingCameraMount));

        let no_seat = SeatRig::new(
            SeatConfig {
                seat_anchor: None,
                ..Default::default()
            },
            Some(mount()),
        );
        assert_eq!(no_seat.validate(), Err(RigError::MissingSeatAnchor));

        let broken = SeatRig::new(
            SeatConfig {
                exit_offset: Vec3::new(f32::NAN, 0.0, 0.0),
                ..Default::default()
            },
            Some(mount()),
        );
        assert_eq!(broken.validate(), Err(RigError::NonFiniteSeat));
    }

    #[test]
    fn exit_world_at_origin_is_the_raw_offset() {
        let rig = SeatRig::new(SeatConfig::default(), None);
        let exit = rig.exit_world(&Transform::default());
        assert_eq!(exit.position, Vec3::new(-2.2, 0.5, -1.5));
    }

    #[test]
    fn exit_world_follows_vehicle_heading() {
        let rig = SeatRig::new(SeatConfig::default(), None);
        let vehicle = Transform::from_position_rotation(
            Vec3::new(10.0, 0.0, 0.0),
            Quat::from_rotation_y(std::f32::consts::PI),
        );
        let exit = rig.exit_world(&vehicle);
        assert!((exit.position - Vec3::new(12.2, 0.5, 1.5)).length() < 1e-4);
        assert!((exit.forward() - vehicle.forward()).length() < 1e-4);
    }

    #[test]
    fn seat_config_from_ron() {
        let cfg: SeatConfig = ron::from_str("(exit_offset: (2.0, 0.0, 0.0))").unwrap();
        assert_eq!(cfg.exit_offset, Vec3::new(2.0, 0.0, 0.0));
        assert!(cfg.seat_anchor.is_some());
    }
}
