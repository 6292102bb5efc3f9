//! First-person camera

use bevy::prelude::*;
use shared::{Player, PlayerLook, PlayerPosition};

/// Near/far clip planes
const NEAR: f32 = 0.1;
const FAR: f32 = 1000.0;

/// Marker for the camera that follows the player's eyes
#[derive(Component)]
pub struct PlayerCamera;

/// Perspective projection for a vertical field of view in degrees.
pub fn player_projection(fov_degrees: f32) -> Projection {
    Projection::Perspective(PerspectiveProjection {
        fov: fov_degrees.to_radians(),
        near: NEAR,
        far: FAR,
        ..default()
    })
}

/// Camera pose for a player: at the eye, yaw then pitch, no roll.
pub fn first_person_pose(position: &PlayerPosition, look: &PlayerLook) -> Transform {
    Transform::from_translation(position.0).with_rotation(look.rotation())
}

/// Snap the camera onto the player's eye every frame.
pub fn update_camera(
    player_query: Query<(&PlayerPosition, &PlayerLook), With<Player>>,
    mut camera_query: Query<&mut Transform, With<PlayerCamera>>,
) {
    let Ok((position, look)) = player_query.single() else {
        return;
    };
    let Ok(mut camera_transform) = camera_query.single_mut() else {
        return;
    };

    *camera_transform = first_person_pose(position, look);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pose_looks_along_yaw() {
        let pose = first_person_pose(
            &PlayerPosition(Vec3::new(1.0, 2.0, 3.0)),
            &PlayerLook {
                yaw: std::f32::consts::FRAC_PI_2,
                pitch: 0.0,
            },
        );
        assert_eq!(pose.translation, Vec3::new(1.0, 2.0, 3.0));
        let forward = pose.forward();
        assert!((forward.as_vec3() - Vec3::NEG_X).length() < 1e-5);
    }

    #[test]
    fn test_pitch_tilts_view_up() {
        let pose = first_person_pose(
            &PlayerPosition(Vec3::ZERO),
            &PlayerLook {
                yaw: 0.0,
                pitch: 0.5,
            },
        );
        assert!(pose.forward().y > 0.0);
    }

    #[test]
    fn test_projection_fov_in_radians() {
        let Projection::Perspective(p) = player_projection(75.0) else {
            panic!("expected perspective projection");
        };
        assert!((p.fov - 75.0_f32.to_radians()).abs() < 1e-6);
        assert_eq!(p.near, NEAR);
    }
}
