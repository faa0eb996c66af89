//! Sphere-shaped entry volumes that report which actors walk in and out.

use crate::collision::CollisionGroup;
use crate::physics_world::{to_isometry, PhysicsWorld};
use engine_core::{Entity, Quat, Vec3};
use rapier3d::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerEvent {
    Entered(Entity),
    Exited(Entity),
}

/// Overlap tracker for one volume. Call [`TriggerZone::update`] once per tick.
#[derive(Debug, Clone)]
pub struct TriggerZone {
    pub radius: f32,
    inside: Vec<Entity>,
}

impl TriggerZone {
    pub fn new(radius: f32) -> Self {
        Self {
            radius,
            inside: Vec::new(),
        }
    }

    /// Actors overlapping the volume as of the last update.
    pub fn inside(&self) -> &[Entity] {
        &self.inside
    }

    /// Query the volume at `center` and diff against the previous tick.
    /// Disabled actor colliders count as outside.
    pub fn update(&mut self, world: &PhysicsWorld, center: Vec3) -> Vec<TriggerEvent> {
        let shape = Ball::new(self.radius);
        let pose = to_isometry(center, Quat::IDENTITY);
        let filter = QueryFilter::default().groups(CollisionGroup::trigger());

        let mut now: Vec<Entity> = Vec::new();
        world.query_pipeline.intersections_with_shape(
            &world.rigid_body_set,
            &world.collider_set,
            &pose,
            &shape,
            filter,
            |handle| {
                if let Some(actor) = world.collider_entity(handle) {
                    if !now.contains(&actor) {
                        now.push(actor);
                    }
                }
                true
            },
        );

        let mut events: Vec<TriggerEvent> = self
            .inside
            .iter()
            .filter(|a| !now.contains(*a))
            .map(|&a| TriggerEvent::Exited(a))
            .collect();
        events.extend(
            now.iter()
                .filter(|a| !self.inside.contains(*a))
                .map(|&a| TriggerEvent::Entered(a)),
        );
        for event in &events {
            log::debug!("Trigger {:?}", event);
        }
        self.inside = now;
        events
    }

    /// Count `actor` as inside without emitting `Entered`. The next update
    /// reports `Exited` if it is not actually overlapping. Used when an actor
    /// reappears next to the volume, e.g. stepping out of a vehicle.
    pub fn track(&mut self, actor: Entity) {
        if !self.inside.contains(&actor) {
            self.inside.push(actor);
        }
    }
}
