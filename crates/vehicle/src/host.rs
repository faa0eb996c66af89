//! Capabilities the host engine exposes for actors, cameras and the cursor.

use engine_core::{Entity, Transform, Vec3};

/// Thin per-actor capability interface.
///
/// Actors, collision shapes, cameras and mounts are all addressed by
/// non-owning [`Entity`] handles; the vehicle never owns their lifetime.
/// Implementations treat unknown entities as no-ops.
pub trait ActorHost {
    /// Whether `actor` is a type allowed to pilot vehicles.
    fn is_pilot(&self, actor: Entity) -> bool;

    fn is_visible(&self, actor: Entity) -> bool;
    fn set_visible(&mut self, actor: Entity, visible: bool);

    fn is_input_enabled(&self, actor: Entity) -> bool;
    fn set_input_enabled(&mut self, actor: Entity, enabled: bool);

    fn is_physics_enabled(&self, actor: Entity) -> bool;
    fn set_physics_enabled(&mut self, actor: Entity, enabled: bool);

    /// The actor's direct-child collision shapes.
    fn colliders(&self, actor: Entity) -> Vec<Entity>;
    fn is_collider_enabled(&self, collider: Entity) -> bool;
    fn set_collider_enabled(&mut self, collider: Entity, enabled: bool);

    /// Place the actor in the world.
    fn set_transform(&mut self, actor: Entity, transform: Transform);
    fn set_velocity(&mut self, actor: Entity, velocity: Vec3);

    /// The camera node the actor looks through, if it has one.
    fn camera_of(&self, actor: Entity) -> Option<Entity>;

    fn parent_of(&self, node: Entity) -> Option<Entity>;
    /// Reparent `node`; `None` detaches it to the scene root.
    fn attach(&mut self, node: Entity, parent: Option<Entity>);
    fn local_transform(&self, node: Entity) -> Transform;
    fn set_local_transform(&mut self, node: Entity, transform: Transform);

    fn is_cursor_captured(&self) -> bool;
    fn set_cursor_captured(&mut self, captured: bool);
}
