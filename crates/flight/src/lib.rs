//! Flight dynamics for player-flown aircraft.
//!
//! A fixed-tick rigid-body model: throttle integration, angle of attack and
//! sideslip, continuous stall blending, lift/drag/side force, control and
//! stability torques, plus a simplified idle mode for parked aircraft.
//! Collision handling is delegated to the host through [`VehicleBody`].

pub mod air_data;
pub mod body;
pub mod config;
pub mod ground;
pub mod math;
pub mod model;
pub mod state;

pub use air_data::{control_effectiveness, speed_ramp, stall_blend, AirData};
pub use body::{FlatGround, OpenSky, VehicleBody};
pub use config::{AeroMode, FlightConfig};
pub use ground::settle_level;
pub use model::{integrate_throttle, propeller_spin_speed, FlightModel};
pub use state::{Telemetry, VehicleState};

/// Standard gravity (m/s²).
pub const GRAVITY: f32 = 9.81;
