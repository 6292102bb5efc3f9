//! Rendering setup: sky, lights and the first-person camera.

use bevy::prelude::*;
use shared::SpawnPoint;

use crate::camera::{player_projection, PlayerCamera};
use crate::config::ClientConfig;

/// Light blue sky (#87CEEB)
const SKY_COLOR: Color = Color::srgb(0.529, 0.808, 0.922);

/// Stand-in for a sky/ground hemisphere light
const AMBIENT_BRIGHTNESS: f32 = 600.0;

const SUN_ILLUMINANCE: f32 = 6_000.0;

/// One-time rendering setup.
pub fn setup_rendering(
    mut commands: Commands,
    config: Res<ClientConfig>,
    spawn: Res<SpawnPoint>,
) {
    commands.insert_resource(ClearColor(SKY_COLOR));
    commands.insert_resource(AmbientLight {
        color: Color::WHITE,
        brightness: AMBIENT_BRIGHTNESS,
        ..default()
    });

    commands.spawn((
        DirectionalLight {
            illuminance: SUN_ILLUMINANCE,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_xyz(-3.0, 10.0, -10.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));

    commands.spawn((
        PlayerCamera,
        Camera3d::default(),
        player_projection(config.fov_degrees),
        Transform::from_translation(spawn.0),
    ));
}

/// Small axes helper at the origin to help orientation
pub fn draw_axes(mut gizmos: Gizmos) {
    gizmos.axes(Transform::IDENTITY, 2.0);
}
