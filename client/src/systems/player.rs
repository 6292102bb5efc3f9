//! Player entity spawning

use bevy::prelude::*;
use shared::{PlayerBundle, SpawnPoint};

/// Spawn the player at the spawn point, looking down -Z.
pub fn spawn_player(mut commands: Commands, spawn: Res<SpawnPoint>) {
    commands.spawn(PlayerBundle::at(spawn.0));
    info!("Player spawned at {:?}", spawn.0);
}

