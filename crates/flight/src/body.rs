//! Host collaborators for ground contact and collision-aware motion.

use engine_core::{Transform, Vec3};

/// The physics side of a vehicle as seen by the flight model.
///
/// The flight model computes a desired velocity; the host moves the body,
/// resolves collisions and reports the velocity it actually applied. That
/// applied velocity is authoritative for the next tick.
pub trait VehicleBody {
    /// Whether the body is resting on a surface.
    fn is_on_ground(&self, transform: &Transform) -> bool;

    /// Resolve `desired_velocity` over `dt` starting from `transform` and
    /// return the velocity that was actually applied.
    fn move_and_resolve(&mut self, transform: &Transform, desired_velocity: Vec3, dt: f32) -> Vec3;
}

/// Empty sky: never grounded, nothing to collide with.
#[derive(Debug, Clone, Copy, Default)]
pub struct OpenSky;

impl VehicleBody for OpenSky {
    fn is_on_ground(&self, _transform: &Transform) -> bool {
        false
    }

    fn move_and_resolve(&mut self, _transform: &Transform, desired_velocity: Vec3, _dt: f32) -> Vec3 {
        desired_velocity
    }
}

/// An infinite horizontal floor at `height`. The body origin rests on it.
#[derive(Debug, Clone, Copy)]
pub struct FlatGround {
    pub height: f32,
    /// Distance above the floor still counted as contact.
    pub contact_tolerance: f32,
}

impl Default for FlatGround {
    fn default() -> Self {
        Self::at(0.0)
    }
}

impl FlatGround {
    pub fn at(height: f32) -> Self {
        Self {
            height,
            contact_tolerance: 0.05,
        }
    }
}

impl VehicleBody for FlatGround {
    fn is_on_ground(&self, transform: &Transform) -> bool {
        transform.position.y <= self.height + self.contact_tolerance
    }

    fn move_and_resolve(&mut self, transform: &Transform, desired_velocity: Vec3, dt: f32) -> Vec3 {
        if !(dt > 0.0) {
            return desired_velocity;
        }
        let mut applied = desired_velocity;
        let y = transform.position.y;
        if y <= self.height {
            applied.y = applied.y.max(0.0);
        } else if y + applied.y * dt < self.height {
            // Land exactly on the floor this tick.
            applied.y = (self.height - y) / dt;
        }
        applied
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flat_ground_stops_descent_at_floor() {
        let mut ground = FlatGround::at(0.0);
        let t = Transform::from_position(Vec3::new(0.0, 1.0, 0.0));
        let v = ground.move_and_resolve(&t, Vec3::new(3.0, -10.0, 0.0), 0.5);
        assert_eq!(v.x, 3.0);
        // 1 m above the floor over 0.5 s -> at most 2 m/s down.
        assert!((v.y - -2.0).abs() < 1e-5);
    }

    #[test]
    fn flat_ground_cancels_sinking_when_resting() {
        let mut ground = FlatGround::at(0.0);
        let t = Transform::default();
        assert!(ground.is_on_ground(&t));
        let v = ground.move_and_resolve(&t, Vec3::new(0.0, -5.0, -2.0), 1.0 / 60.0);
        assert_eq!(v, Vec3::new(0.0, 0.0, -2.0));
    }

    #[test]
    fn open_sky_passes_velocity_through() {
        let mut sky = OpenSky;
        let v = Vec3::new(1.0, 2.0, 3.0);
        assert_eq!(sky.move_and_resolve(&Transform::default(), v, 0.1), v);
        assert!(!sky.is_on_ground(&Transform::default()));
    }
}
