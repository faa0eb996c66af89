//! Aircraft hull motion against the static world.

use crate::collision::CollisionGroup;
use crate::physics_world::{from_vector, to_isometry, to_vector, PhysicsWorld};
use engine_core::{Transform, Vec3};
use flight::VehicleBody;
use rapier3d::control::{CharacterLength, KinematicCharacterController};
use rapier3d::prelude::*;

/// Collision shape and sweep settings for one aircraft type.
#[derive(Clone)]
pub struct VehicleHull {
    pub shape: SharedShape,
    /// Shape center relative to the vehicle origin, in vehicle space.
    pub center_offset: Vec3,
    /// Distance below the origin still counted as ground contact.
    pub contact_tolerance: f32,
    pub controller: KinematicCharacterController,
}

impl VehicleHull {
    /// A box hull whose bottom face sits on the vehicle origin.
    pub fn cuboid(half_extents: Vec3) -> Self {
        Self {
            shape: SharedShape::cuboid(half_extents.x, half_extents.y, half_extents.z),
            center_offset: Vec3::new(0.0, half_extents.y, 0.0),
            contact_tolerance: 0.1,
            controller: KinematicCharacterController {
                offset: CharacterLength::Absolute(0.02),
                // Aircraft neither climb steps nor stick to the ground on takeoff.
                autostep: None,
                snap_to_ground: None,
                ..Default::default()
            },
        }
    }

    /// Bind the hull to a world for one tick.
    pub fn in_world<'w>(&'w self, world: &'w PhysicsWorld) -> RapierVehicleBody<'w> {
        RapierVehicleBody { hull: self, world }
    }

    fn filter() -> QueryFilter<'static> {
        QueryFilter::default().groups(CollisionGroup::vehicle()).exclude_sensors()
    }
}

impl Default for VehicleHull {
    fn default() -> Self {
        Self::cuboid(Vec3::new(5.5, 0.8, 4.0))
    }
}

/// [`VehicleBody`] backed by rapier shape casts. The world's query pipeline
/// must be up to date.
pub struct RapierVehicleBody<'w> {
    hull: &'w VehicleHull,
    world: &'w PhysicsWorld,
}

impl VehicleBody for RapierVehicleBody<'_> {
    fn is_on_ground(&self, transform: &Transform) -> bool {
        let lift = self.hull.center_offset.y.max(self.hull.contact_tolerance);
        let origin = transform.position + Vec3::Y * lift;
        self.world
            .raycast(origin, Vec3::NEG_Y, lift + self.hull.contact_tolerance, VehicleHull::filter())
            .is_some()
    }

    fn move_and_resolve(&mut self, transform: &Transform, desired_velocity: Vec3, dt: f32) -> Vec3 {
        if !(dt > 0.0) || !desired_velocity.is_finite() {
            return desired_velocity;
        }
        let center = transform.position + transform.rotation * self.hull.center_offset;
        let pose = to_isometry(center, transform.rotation);
        let movement = self.hull.controller.move_shape(
            dt,
            &self.world.rigid_body_set,
            &self.world.collider_set,
            &self.world.query_pipeline,
            &*self.hull.shape,
            &pose,
            to_vector(desired_velocity * dt),
            VehicleHull::filter(),
            |_| {},
        );
        from_vector(&movement.translation) / dt
    }
}
