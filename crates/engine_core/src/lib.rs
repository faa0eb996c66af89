//! Core engine types and utilities for SkyRoam.
//!
//! This crate provides the foundational types used across all sim crates:
//! - Transform and spatial helpers
//! - Fixed-step time management
//! - Common component types for the ECS (actor flags, scene links, control inputs)

pub mod components;
pub mod time;
pub mod transform;

pub use components::*;
pub use time::*;
pub use transform::*;

// Re-export commonly used types
pub use glam::{EulerRot, Mat3, Quat, Vec3};
pub use hecs::{Entity, World};
