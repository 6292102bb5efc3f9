//! ECS components and resources describing the player.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::SPAWN_POSITION;

/// Marker component for the player entity
#[derive(Component, Clone, Copy, Debug, Default)]
pub struct Player;

/// Eye position of the player. The camera sits exactly here.
#[derive(Component, Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct PlayerPosition(pub Vec3);

impl Default for PlayerPosition {
    fn default() -> Self {
        Self(Vec3::from_array(SPAWN_POSITION))
    }
}

/// Player velocity in m/s
#[derive(Component, Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq)]
pub struct PlayerVelocity(pub Vec3);

/// Grounded state, recomputed every step by the ground test.
#[derive(Component, Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq)]
pub struct PlayerGrounded {
    pub can_jump: bool,
}

/// Look angles driven by the mouse. Yaw also orients movement.
#[derive(Component, Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq)]
pub struct PlayerLook {
    pub yaw: f32,
    pub pitch: f32,
}

impl PlayerLook {
    /// Camera orientation: yaw around +Y, then pitch around local +X.
    pub fn rotation(&self) -> Quat {
        Quat::from_euler(EulerRot::YXZ, self.yaw, self.pitch, 0.0)
    }
}

/// Where a fallen player is put back.
#[derive(Resource, Clone, Copy, Debug, PartialEq)]
pub struct SpawnPoint(pub Vec3);

impl Default for SpawnPoint {
    fn default() -> Self {
        Self(Vec3::from_array(SPAWN_POSITION))
    }
}

/// Everything needed to spawn the player entity.
#[derive(Bundle, Default)]
pub struct PlayerBundle {
    pub player: Player,
    pub position: PlayerPosition,
    pub velocity: PlayerVelocity,
    pub grounded: PlayerGrounded,
    pub look: PlayerLook,
}

impl PlayerBundle {
    pub fn at(spawn: Vec3) -> Self {
        Self {
            position: PlayerPosition(spawn),
            ..default()
        }
    }
}
