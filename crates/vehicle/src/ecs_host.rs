//! [`ActorHost`] over a `hecs` world using the shared engine components.

use crate::host::ActorHost;
use engine_core::{
    CameraLink, Children, Collider, Entity, Parent, Pilot, Processing, Transform, Vec3, Velocity,
    Visibility, World,
};

/// Default camera pivot for a walking pilot (eye height).
const PILOT_EYE_OFFSET: Vec3 = Vec3::new(0.0, 1.6, 0.0);

/// Owns the ECS world that actors live in, plus the window cursor mode.
#[derive(Default)]
pub struct EcsHost {
    pub world: World,
    cursor_captured: bool,
}

impl EcsHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawn a scene node (camera mount, pivot, ...) with a local transform.
    pub fn spawn_node(&mut self, parent: Option<Entity>, local: Transform) -> Entity {
        let node = self.world.spawn((local,));
        if parent.is_some() {
            self.attach(node, parent);
        }
        node
    }

    /// Spawn a pilot with a first-person camera and one collision shape per
    /// entry of `colliders` (`true` = enabled).
    pub fn spawn_pilot(&mut self, transform: Transform, colliders: &[bool]) -> Entity {
        let actor = self.world.spawn((
            Pilot,
            transform,
            Velocity::default(),
            Visibility(true),
            Processing::default(),
            Children::default(),
        ));
        for &enabled in colliders {
            let shape = self.world.spawn((Collider { enabled }, Transform::default()));
            self.attach(shape, Some(actor));
        }
        let camera = self.spawn_node(Some(actor), Transform::from_position(PILOT_EYE_OFFSET));
        if let Err(e) = self.world.insert_one(actor, CameraLink(camera)) {
            log::warn!("Could not link camera to pilot {:?}: {}", actor, e);
        }
        actor
    }

    /// Read a copy of a component, if present.
    pub fn component<T: hecs::Component + Copy>(&self, entity: Entity) -> Option<T> {
        self.world.get::<&T>(entity).ok().map(|c| *c)
    }

    fn put<T: hecs::Component>(&mut self, entity: Entity, value: T) {
        if !self.world.contains(entity) {
            log::debug!("Ignoring write to despawned entity {:?}", entity);
            return;
        }
        if let Ok(mut slot) = self.world.get::<&mut T>(entity) {
            *slot = value;
            return;
        }
        if let Err(e) = self.world.insert_one(entity, value) {
            log::debug!("Could not insert component on {:?}: {}", entity, e);
        }
    }

    fn unlink_child(&mut self, parent: Entity, child: Entity) {
        if let Ok(mut children) = self.world.get::<&mut Children>(parent) {
            children.0.retain(|&c| c != child);
        }
    }
}

impl ActorHost for EcsHost {
    fn is_pilot(&self, actor: Entity) -> bool {
        self.world.get::<&Pilot>(actor).is_ok()
    }

    fn is_visible(&self, actor: Entity) -> bool {
        self.component::<Visibility>(actor).unwrap_or_default().0
    }

    fn set_visible(&mut self, actor: Entity, visible: bool) {
        self.put(actor, Visibility(visible));
    }

    fn is_input_enabled(&self, actor: Entity) -> bool {
        self.component::<Processing>(actor).unwrap_or_default().input
    }

    fn set_input_enabled(&mut self, actor: Entity, enabled: bool) {
        let mut processing = self.component::<Processing>(actor).unwrap_or_default();
        processing.input = enabled;
        self.put(actor, processing);
    }

    fn is_physics_enabled(&self, actor: Entity) -> bool {
        self.component::<Processing>(actor).unwrap_or_default().physics
    }

    fn set_physics_enabled(&mut self, actor: Entity, enabled: bool) {
        let mut processing = self.component::<Processing>(actor).unwrap_or_default();
        processing.physics = enabled;
        self.put(actor, processing);
    }

    fn colliders(&self, actor: Entity) -> Vec<Entity> {
        let Ok(children) = self.world.get::<&Children>(actor) else {
            return Vec::new();
        };
        children
            .0
            .iter()
            .copied()
            .filter(|&child| self.world.get::<&Collider>(child).is_ok())
            .collect()
    }

    fn is_collider_enabled(&self, collider: Entity) -> bool {
        self.component::<Collider>(collider).map(|c| c.enabled).unwrap_or(false)
    }

    fn set_collider_enabled(&mut self, collider: Entity, enabled: bool) {
        if let Ok(mut c) = self.world.get::<&mut Collider>(collider) {
            c.enabled = enabled;
        }
    }

    fn set_transform(&mut self, actor: Entity, transform: Transform) {
        self.put(actor, transform);
    }

    fn set_velocity(&mut self, actor: Entity, velocity: Vec3) {
        self.put(actor, Velocity::new(velocity));
    }

    fn camera_of(&self, actor: Entity) -> Option<Entity> {
        self.component::<CameraLink>(actor).map(|link| link.0)
    }

    fn parent_of(&self, node: Entity) -> Option<Entity> {
        self.component::<Parent>(node).map(|p| p.0)
    }

    fn attach(&mut self, node: Entity, parent: Option<Entity>) {
        if !self.world.contains(node) {
            return;
        }
        if let Some(old) = self.parent_of(node) {
            self.unlink_child(old, node);
        }
        match parent {
            Some(parent) if self.world.contains(parent) => {
                self.put(node, Parent(parent));
                let recorded = match self.world.get::<&mut Children>(parent) {
                    Ok(mut children) => {
                        children.0.push(node);
                        true
                    }
                    Err(_) => false,
                };
                if !recorded {
                    self.put(parent, Children(vec![node]));
                }
            }
            _ => {
                // Detached (or parent despawned): the node becomes a root.
                let _ = self.world.remove_one::<Parent>(node);
            }
        }
    }

    fn local_transform(&self, node: Entity) -> Transform {
        self.component::<Transform>(node).unwrap_or_default()
    }

    fn set_local_transform(&mut self, node: Entity, transform: Transform) {
        self.put(node, transform);
    }

    fn is_cursor_captured(&self) -> bool {
        self.cursor_captured
    }

    fn set_cursor_captured(&mut self, captured: bool) {
        self.cursor_captured = captured;
    }
}
