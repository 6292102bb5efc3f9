//! Turning local movement intent into a world-space direction.

use bevy::prelude::*;

use crate::PlayerInput;

/// Horizontal forward/right basis for a yaw angle.
///
/// In Bevy: +X is right, +Y is up, -Z is forward (yaw = 0 looks down -Z).
#[inline]
pub fn yaw_basis(yaw: f32) -> (Vec3, Vec3) {
    let forward = Vec3::new(-yaw.sin(), 0.0, -yaw.cos());
    let right = Vec3::new(yaw.cos(), 0.0, -yaw.sin());
    (forward, right)
}

/// World-space XZ direction the player wants to move in (zero or unit length).
pub fn world_wish_direction(input: &PlayerInput) -> Vec3 {
    let local = input.wish_direction();
    if local == Vec3::ZERO {
        return Vec3::ZERO;
    }
    let (forward, right) = yaw_basis(input.yaw);
    // local.z is negative for "forward"
    (forward * -local.z + right * local.x).normalize_or_zero()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    fn approx(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-5
    }

    #[test]
    fn test_forward_at_zero_yaw_is_negative_z() {
        let input = PlayerInput {
            forward: true,
            ..default()
        };
        assert!(approx(world_wish_direction(&input), Vec3::NEG_Z));
    }

    #[test]
    fn test_strafe_right_is_positive_x() {
        let input = PlayerInput {
            right: true,
            ..default()
        };
        assert!(approx(world_wish_direction(&input), Vec3::X));
    }

    #[test]
    fn test_yaw_rotates_forward() {
        // Turning left by 90 degrees (positive yaw) makes forward point at -X
        let input = PlayerInput {
            forward: true,
            yaw: FRAC_PI_2,
            ..default()
        };
        assert!(approx(world_wish_direction(&input), Vec3::NEG_X));
    }

    #[test]
    fn test_basis_matches_camera_rotation() {
        let yaw = 0.7;
        let (forward, right) = yaw_basis(yaw);
        let rot = Quat::from_rotation_y(yaw);
        assert!(approx(forward, rot * Vec3::NEG_Z));
        assert!(approx(right, rot * Vec3::X));
    }
}
