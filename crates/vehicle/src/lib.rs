//! Player-vehicle possession and the per-tick plane controller.
//!
//! [`PossessionController`] owns the occupant relationship (enter/exit,
//! camera and input handoff). [`Plane`] ties it to the flight model and runs
//! the fixed-tick control flow. Everything the host engine must provide is
//! behind [`ActorHost`] and [`flight::VehicleBody`].

pub mod ecs_host;
pub mod host;
pub mod plane;
pub mod possession;
pub mod rig;

pub use ecs_host::EcsHost;
pub use host::ActorHost;
pub use plane::Plane;
pub use possession::{OccupantSnapshot, PossessionController};
pub use rig::{RigError, SeatConfig, SeatRig};
