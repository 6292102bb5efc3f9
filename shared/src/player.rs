//! Player-related constants and types

use bevy::prelude::*;

use crate::aabb::Aabb3;

/// Eye height above the feet. The player position is the eye (camera) position.
pub const PLAYER_HEIGHT: f32 = 1.6;

/// Footprint width (X) of the player box
pub const PLAYER_WIDTH: f32 = 0.6;

/// Footprint depth (Z) of the player box
pub const PLAYER_DEPTH: f32 = 0.6;

/// Walking speed factor (units per second before friction)
pub const WALK_SPEED: f32 = 8.0;

/// Sprinting speed factor (Shift held)
pub const SPRINT_SPEED: f32 = 20.0;

/// Mouse sensitivity for look (radians per pixel)
pub const MOUSE_SENSITIVITY: f32 = 0.002;

/// Spawn eye position: standing on the floor a few metres in front of the first platform
pub const SPAWN_POSITION: [f32; 3] = [0.0, PLAYER_HEIGHT, 6.0];

/// Bounding box of the player body for a given eye position.
///
/// The box hangs below the eye: its top is the eye, its bottom is the feet.
pub fn player_box(eye: Vec3) -> Aabb3 {
    Aabb3 {
        min: Vec3::new(
            eye.x - PLAYER_WIDTH * 0.5,
            eye.y - PLAYER_HEIGHT,
            eye.z - PLAYER_DEPTH * 0.5,
        ),
        max: Vec3::new(eye.x + PLAYER_WIDTH * 0.5, eye.y, eye.z + PLAYER_DEPTH * 0.5),
    }
}

/// Feet altitude for a given eye position.
#[inline]
pub fn feet_y(eye: Vec3) -> f32 {
    eye.y - PLAYER_HEIGHT
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_box_hangs_below_eye() {
        let b = player_box(Vec3::new(1.0, 3.0, -2.0));
        assert_eq!(b.max.y, 3.0);
        assert!((b.min.y - 1.4).abs() < 1e-6);
        assert!((b.max.x - b.min.x - PLAYER_WIDTH).abs() < 1e-6);
        assert!((b.max.z - b.min.z - PLAYER_DEPTH).abs() < 1e-6);
    }

    #[test]
    fn test_spawn_is_standing_on_floor() {
        let spawn = Vec3::from_array(SPAWN_POSITION);
        assert!(feet_y(spawn).abs() < 1e-6);
    }
}
