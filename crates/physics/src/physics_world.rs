//! Physics world management with Rapier3D.

use crate::collision::{CollisionGroup, PhysicsCollider};
use engine_core::{Children, Collider, Entity, Parent, Quat, Transform, Vec3, World};
use rapier3d::na::{Quaternion, Translation3, UnitQuaternion};
use rapier3d::prelude::*;

pub(crate) fn to_vector(v: Vec3) -> Vector<Real> {
    vector![v.x, v.y, v.z]
}

pub(crate) fn from_vector(v: &Vector<Real>) -> Vec3 {
    Vec3::new(v.x, v.y, v.z)
}

pub(crate) fn to_isometry(position: Vec3, rotation: Quat) -> Isometry<Real> {
    let rotation = rotation.normalize();
    Isometry::from_parts(
        Translation3::new(position.x, position.y, position.z),
        UnitQuaternion::from_quaternion(Quaternion::new(rotation.w, rotation.x, rotation.y, rotation.z)),
    )
}

/// Result of a raycast query.
#[derive(Debug, Clone, Copy)]
pub struct RaycastHit {
    pub collider: ColliderHandle,
    pub distance: f32,
    pub point: Vec3,
}

/// Collision world for static scenery and actor shapes.
///
/// Nothing here is integrated by rapier's dynamics: aircraft move through
/// shape casts and actors are placed by the game, so only the collider set
/// and the query pipeline are kept.
pub struct PhysicsWorld {
    pub rigid_body_set: RigidBodySet,
    pub collider_set: ColliderSet,
    pub island_manager: IslandManager,
    pub query_pipeline: QueryPipeline,
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl PhysicsWorld {
    pub fn new() -> Self {
        Self {
            rigid_body_set: RigidBodySet::new(),
            collider_set: ColliderSet::new(),
            island_manager: IslandManager::new(),
            query_pipeline: QueryPipeline::new(),
        }
    }

    /// Refresh the query pipeline. Call after moving or toggling colliders and before queries.
    pub fn update_query_pipeline(&mut self) {
        self.query_pipeline.update(&self.collider_set);
    }

    /// Add an infinite flat ground at `height`.
    pub fn add_ground_plane(&mut self, height: f32) -> ColliderHandle {
        let collider = ColliderBuilder::halfspace(Vector::y_axis())
            .translation(vector![0.0, height, 0.0])
            .collision_groups(CollisionGroup::environment())
            .build();
        self.collider_set.insert(collider)
    }

    /// Add a static cuboid (hangar, fence, ...). No parent body; the collider is fixed in world.
    pub fn add_static_cuboid(&mut self, translation: Vec3, rotation_y_rad: f32, half_extents: Vec3) -> ColliderHandle {
        let position = to_isometry(translation, Quat::from_rotation_y(rotation_y_rad));
        let collider = ColliderBuilder::cuboid(half_extents.x, half_extents.y, half_extents.z)
            .position(position)
            .collision_groups(CollisionGroup::environment())
            .build();
        self.collider_set.insert(collider)
    }

    /// Add a capsule for an actor's collision shape. The ECS entity is stored
    /// in the collider's user data so queries can report it.
    pub fn add_actor_capsule(&mut self, actor: Entity, position: Vec3, half_height: f32, radius: f32) -> ColliderHandle {
        let collider = ColliderBuilder::capsule_y(half_height, radius)
            .translation(to_vector(position))
            .collision_groups(CollisionGroup::actor())
            .user_data(actor.to_bits().get() as u128)
            .build();
        self.collider_set.insert(collider)
    }

    /// The ECS entity recorded on a collider, if any.
    pub fn collider_entity(&self, handle: ColliderHandle) -> Option<Entity> {
        let bits = self.collider_set.get(handle)?.user_data;
        u64::try_from(bits).ok().and_then(Entity::from_bits)
    }

    pub fn set_collider_translation(&mut self, handle: ColliderHandle, position: Vec3) {
        if let Some(collider) = self.collider_set.get_mut(handle) {
            collider.set_translation(to_vector(position));
        }
    }

    pub fn set_collider_enabled(&mut self, handle: ColliderHandle, enabled: bool) {
        if let Some(collider) = self.collider_set.get_mut(handle) {
            collider.set_enabled(enabled);
        }
    }

    pub fn is_collider_enabled(&self, handle: ColliderHandle) -> bool {
        self.collider_set.get(handle).is_some_and(|c| c.is_enabled())
    }

    pub fn remove_collider(&mut self, handle: ColliderHandle) {
        self.collider_set.remove(handle, &mut self.island_manager, &mut self.rigid_body_set, true);
    }

    /// Cast a ray and return the first hit accepted by `filter`.
    pub fn raycast(&self, origin: Vec3, direction: Vec3, max_distance: f32, filter: QueryFilter) -> Option<RaycastHit> {
        let ray = Ray::new(point![origin.x, origin.y, origin.z], to_vector(direction));
        self.query_pipeline
            .cast_ray(&self.rigid_body_set, &self.collider_set, &ray, max_distance, true, filter)
            .map(|(collider, toi)| {
                let point = ray.point_at(toi);
                RaycastHit {
                    collider,
                    distance: toi,
                    point: Vec3::new(point.x, point.y, point.z),
                }
            })
    }

    /// Mirror ECS collision shapes into rapier: each shape with a
    /// [`PhysicsCollider`] follows its parent's position and enabled flag.
    pub fn sync_actor_colliders(&mut self, world: &World) {
        for (_, (collider, link, parent)) in world.query::<(&Collider, &PhysicsCollider, &Parent)>().iter() {
            if let Ok(owner) = world.get::<&Transform>(parent.0) {
                self.set_collider_translation(link.0, owner.position);
            }
            self.set_collider_enabled(link.0, collider.enabled);
        }
        self.update_query_pipeline();
    }

    /// Give every collision shape under `actor` a capsule in this world.
    pub fn register_actor(&mut self, world: &mut World, actor: Entity, half_height: f32, radius: f32) {
        let position = world.get::<&Transform>(actor).map(|t| t.position).unwrap_or(Vec3::ZERO);
        let shapes: Vec<Entity> = world
            .get::<&Children>(actor)
            .map(|children| {
                children
                    .0
                    .iter()
                    .copied()
                    .filter(|&c| world.get::<&Collider>(c).is_ok())
                    .collect()
            })
            .unwrap_or_default();
        for shape in shapes {
            let handle = self.add_actor_capsule(actor, position, half_height, radius);
            if let Err(e) = world.insert_one(shape, PhysicsCollider(handle)) {
                log::warn!("Could not link collider for actor {:?}: {}", actor, e);
                self.remove_collider(handle);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ground_ray_hits_plane_height() {
        let mut physics = PhysicsWorld::new();
        physics.add_ground_plane(2.0);
        physics.update_query_pipeline();
        let hit = physics
            .raycast(Vec3::new(0.0, 10.0, 0.0), Vec3::NEG_Y, 100.0, QueryFilter::default())
            .expect("hit ground");
        assert!((hit.distance - 8.0).abs() < 1e-4);
        assert!((hit.point.y - 2.0).abs() < 1e-4);
    }

    #[test]
    fn collider_user_data_round_trips_entity() {
        let mut world = World::new();
        let actor = world.spawn(());
        let mut physics = PhysicsWorld::new();
        let handle = physics.add_actor_capsule(actor, Vec3::ZERO, 0.6, 0.3);
        assert_eq!(physics.collider_entity(handle), Some(actor));
    }

    #[test]
    fn sync_mirrors_enabled_flag_and_position() {
        let mut world = World::new();
        let actor = world.spawn((Transform::from_position(Vec3::new(1.0, 0.0, 0.0)), Children::default()));
        let shape = world.spawn((Collider::enabled(), Parent(actor)));
        world.get::<&mut Children>(actor).unwrap().0.push(shape);

        let mut physics = PhysicsWorld::new();
        physics.register_actor(&mut world, actor, 0.6, 0.3);
        let handle = world.get::<&PhysicsCollider>(shape).unwrap().0;

        world.get::<&mut Transform>(actor).unwrap().position = Vec3::new(4.0, 0.0, 0.0);
        world.get::<&mut Collider>(shape).unwrap().enabled = false;
        physics.sync_actor_colliders(&world);

        assert!(!physics.is_collider_enabled(handle));
        let translation = physics.collider_set[handle].translation();
        assert_eq!(from_vector(translation), Vec3::new(4.0, 0.0, 0.0));
    }
}
