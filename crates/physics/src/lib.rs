//! Rapier3D collaborators for SkyRoam: static scenery, actor shapes, hull
//! sweeps for aircraft and trigger volumes.

pub mod collision;
pub mod physics_world;
pub mod trigger;
pub mod vehicle_body;

pub use collision::*;
pub use physics_world::*;
pub use trigger::*;
pub use vehicle_body::*;

// Re-export Rapier for downstream crates
pub use rapier3d;
