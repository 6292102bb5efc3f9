//! Bevy wiring for the player simulation.
//!
//! Host apps add [`SimulationPlugin`], insert a [`LevelGround`] and gate [`SimulationSet`]
//! with whatever run conditions they need (the client only simulates while playing).

use bevy::prelude::*;

use crate::{
    colliders::TriangleMesh,
    level::PlatformLayout,
    physics::{step_character, MovementTuning, PlatformGround, RaycastGround, StepOutcome},
    Player, PlayerGrounded, PlayerInput, PlayerPosition, PlayerVelocity, SpawnPoint,
};

/// The collidable set the player is tested against.
#[derive(Resource, Clone, Debug)]
pub enum LevelGround {
    /// Footprint overlap + vertical window on each platform top
    Platforms(PlatformLayout),
    /// One downward ray against the platforms and floor
    PlatformsRaycast(PlatformLayout),
    /// One downward ray against the baked level mesh
    Mesh(TriangleMesh),
}

/// Sent whenever the player fell out of the world and was put back at spawn.
#[derive(Message, Clone, Copy, Debug)]
pub struct PlayerRespawned {
    pub entity: Entity,
    /// Where the player was when the fall was detected
    pub fell_from: Vec3,
}

/// Systems that advance the player simulation.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct SimulationSet;

pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PlayerInput>();
        app.init_resource::<MovementTuning>();
        app.init_resource::<SpawnPoint>();
        app.add_message::<PlayerRespawned>();
        app.add_systems(Update, simulate_player.in_set(SimulationSet));
    }
}

/// Per-frame movement and ground collision for every player entity.
pub fn simulate_player(
    time: Res<Time>,
    input: Res<PlayerInput>,
    tuning: Res<MovementTuning>,
    spawn: Res<SpawnPoint>,
    ground: Option<Res<LevelGround>>,
    mut players: Query<
        (
            Entity,
            &mut PlayerPosition,
            &mut PlayerVelocity,
            &mut PlayerGrounded,
        ),
        With<Player>,
    >,
    mut respawned: MessageWriter<PlayerRespawned>,
) {
    let Some(ground) = ground else {
        return;
    };
    let dt = time.delta_secs();

    for (entity, mut position, mut velocity, mut grounded) in players.iter_mut() {
        let before = position.0;
        let outcome = match &*ground {
            LevelGround::Platforms(layout) => step_character(
                &input,
                &PlatformGround(layout),
                &tuning,
                spawn.0,
                &mut position,
                &mut velocity,
                &mut grounded,
                dt,
            ),
            LevelGround::PlatformsRaycast(layout) => step_character(
                &input,
                &RaycastGround(layout),
                &tuning,
                spawn.0,
                &mut position,
                &mut velocity,
                &mut grounded,
                dt,
            ),
            LevelGround::Mesh(mesh) => step_character(
                &input,
                &RaycastGround(mesh),
                &tuning,
                spawn.0,
                &mut position,
                &mut velocity,
                &mut grounded,
                dt,
            ),
        };

        if outcome == StepOutcome::Respawned {
            info!(
                "Player fell out of the world at {:.1?}; respawning at {:.1?}",
                before, spawn.0
            );
            respawned.write(PlayerRespawned {
                entity,
                fell_from: before,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{PlayerBundle, PLAYER_HEIGHT};
    use bevy::time::TimeUpdateStrategy;
    use std::time::Duration;

    fn test_app(ground: LevelGround) -> App {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_millis(16)));
        app.add_plugins(SimulationPlugin);
        app.insert_resource(ground);
        app
    }

    #[derive(Resource, Default)]
    struct RespawnCount(usize);

    fn count_respawns(mut reader: MessageReader<PlayerRespawned>, mut count: ResMut<RespawnCount>) {
        count.0 += reader.read().count();
    }

    #[test]
    fn test_player_settles_on_floor() {
        let mut app = test_app(LevelGround::Platforms(PlatformLayout::default()));
        let player = app
            .world_mut()
            .spawn(PlayerBundle::at(Vec3::new(10.0, 6.0, 10.0)))
            .id();

        for _ in 0..120 {
            app.update();
        }

        let pos = app.world().get::<PlayerPosition>(player).unwrap();
        let grounded = app.world().get::<PlayerGrounded>(player).unwrap();
        assert!((pos.0.y - PLAYER_HEIGHT).abs() < 1e-4);
        assert!(grounded.can_jump);
    }

    #[test]
    fn test_player_walks_with_input() {
        let mut app = test_app(LevelGround::PlatformsRaycast(PlatformLayout::default()));
        let player = app
            .world_mut()
            .spawn(PlayerBundle::at(Vec3::new(10.0, PLAYER_HEIGHT, 10.0)))
            .id();

        app.world_mut().resource_mut::<PlayerInput>().forward = true;
        for _ in 0..30 {
            app.update();
        }

        let pos = app.world().get::<PlayerPosition>(player).unwrap();
        assert!(pos.0.z < 9.0, "player should have moved toward -Z, got {:?}", pos.0);
        assert!((pos.0.y - PLAYER_HEIGHT).abs() < 1e-4);
    }

    #[test]
    fn test_fall_sends_respawn_message() {
        let layout = PlatformLayout {
            floor: None,
            platforms: vec![],
        };
        let mut app = test_app(LevelGround::Platforms(layout));
        app.init_resource::<RespawnCount>();
        app.add_systems(Update, count_respawns.after(SimulationSet));
        let player = app
            .world_mut()
            .spawn(PlayerBundle::at(Vec3::new(0.0, 0.0, 0.0)))
            .id();

        // Falling 30m takes a little over a second at this gravity
        for _ in 0..150 {
            app.update();
        }

        assert!(app.world().resource::<RespawnCount>().0 >= 1);
        let pos = app.world().get::<PlayerPosition>(player).unwrap();
        assert!(pos.0.y > -30.0);
    }

    #[test]
    fn test_no_ground_resource_means_no_simulation() {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_millis(16)));
        app.add_plugins(SimulationPlugin);
        let player = app
            .world_mut()
            .spawn(PlayerBundle::at(Vec3::new(0.0, 5.0, 0.0)))
            .id();
        for _ in 0..10 {
            app.update();
        }
        assert_eq!(app.world().get::<PlayerPosition>(player).unwrap().0.y, 5.0);
    }
}
