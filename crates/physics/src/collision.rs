//! Collision groups and the ECS link to rapier colliders.

use rapier3d::prelude::*;

/// Collision groups for different entity types.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionGroup {
    /// Static environment (ground, runways, hangars)
    Environment = 1 << 0,
    /// Aircraft hulls
    Vehicle = 1 << 1,
    /// Walking pilots and other actors
    Actor = 1 << 2,
    /// Entry volumes and other sensors
    Trigger = 1 << 3,
}

impl CollisionGroup {
    fn bits(groups: &[CollisionGroup]) -> Group {
        Group::from_bits_retain(groups.iter().fold(0, |acc, g| acc | *g as u32))
    }

    /// Environment is hit by everything.
    pub fn environment() -> InteractionGroups {
        InteractionGroups::new(Self::bits(&[Self::Environment]), Group::ALL)
    }

    /// Hull sweeps only stop on the environment.
    pub fn vehicle() -> InteractionGroups {
        InteractionGroups::new(Self::bits(&[Self::Vehicle]), Self::bits(&[Self::Environment]))
    }

    /// Actors stand on the environment and are seen by triggers.
    pub fn actor() -> InteractionGroups {
        InteractionGroups::new(
            Self::bits(&[Self::Actor]),
            Self::bits(&[Self::Environment, Self::Trigger]),
        )
    }

    /// Triggers only report actors.
    pub fn trigger() -> InteractionGroups {
        InteractionGroups::new(Self::bits(&[Self::Trigger]), Self::bits(&[Self::Actor]))
    }
}

/// Component linking an ECS collision shape to its rapier collider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhysicsCollider(pub ColliderHandle);
