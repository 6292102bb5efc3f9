//! Movement intent written by the client each frame and consumed by the simulation.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// The player's movement intent for the current frame.
#[derive(Resource, Serialize, Deserialize, Debug, PartialEq, Clone, Default)]
pub struct PlayerInput {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
    /// Shift held
    pub sprint: bool,
    /// Jump request (spacebar held)
    pub jump: bool,
    /// Facing direction (yaw, radians) used to orient movement
    pub yaw: f32,
}

impl PlayerInput {
    /// Local-space wish direction: +X strafes right, -Z moves forward.
    ///
    /// Opposite keys cancel and diagonals are normalized, so the result is
    /// either zero or unit length.
    pub fn wish_direction(&self) -> Vec3 {
        let mut dir = Vec3::ZERO;
        if self.forward {
            dir.z -= 1.0;
        }
        if self.backward {
            dir.z += 1.0;
        }
        if self.left {
            dir.x -= 1.0;
        }
        if self.right {
            dir.x += 1.0;
        }
        dir.normalize_or_zero()
    }

    pub fn has_movement(&self) -> bool {
        self.wish_direction().length_squared() > 0.0
    }

    /// Same facing, no keys held. Used while the game is paused.
    pub fn cleared(&self) -> Self {
        Self {
            yaw: self.yaw,
            ..default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opposite_keys_cancel() {
        let input = PlayerInput {
            forward: true,
            backward: true,
            left: true,
            right: true,
            ..default()
        };
        assert_eq!(input.wish_direction(), Vec3::ZERO);
        assert!(!input.has_movement());
    }

    #[test]
    fn test_diagonal_is_normalized() {
        let input = PlayerInput {
            forward: true,
            right: true,
            ..default()
        };
        let dir = input.wish_direction();
        assert!((dir.length() - 1.0).abs() < 1e-6);
        assert!(dir.x > 0.0 && dir.z < 0.0);
    }

    #[test]
    fn test_cleared_keeps_yaw() {
        let input = PlayerInput {
            forward: true,
            jump: true,
            sprint: true,
            yaw: 1.25,
            ..default()
        };
        let cleared = input.cleared();
        assert_eq!(cleared.yaw, 1.25);
        assert!(!cleared.forward && !cleared.jump && !cleared.sprint);
    }
}
