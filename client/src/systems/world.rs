//! World systems
//!
//! Builds the level once at startup: visuals for the chosen mode plus the
//! [`LevelGround`] the simulation collides against.

use bevy::prelude::*;
use shared::{
    load_level_collider_from_file, ColliderError, LevelGround, LevelMode, PlatformLayout,
    SpawnPoint, TriangleMesh, PLAYER_HEIGHT,
};
use std::path::{Path, PathBuf};

use crate::config::ClientConfig;

// =============================================================================
// RESOURCES & COMPONENTS
// =============================================================================

/// Filesystem location of the assets folder (also used for non-asset files like the collider).
#[derive(Resource, Clone, Debug)]
pub struct AssetDir(pub PathBuf);

/// Root entity for all level visuals
#[derive(Component)]
pub struct ClientWorldRoot;

// =============================================================================
// LEVEL GROUND
// =============================================================================

/// Build the collidable set for a level mode.
pub fn level_ground_for(
    level: &LevelMode,
    layout: &PlatformLayout,
    asset_dir: &Path,
) -> Result<LevelGround, ColliderError> {
    match level {
        LevelMode::Platforms => Ok(LevelGround::Platforms(layout.clone())),
        LevelMode::PlatformsRaycast => Ok(LevelGround::PlatformsRaycast(layout.clone())),
        LevelMode::Mesh { collider, .. } => {
            let baked = load_level_collider_from_file(asset_dir.join(collider))?;
            let mesh = TriangleMesh::try_from(&baked)?;
            Ok(LevelGround::Mesh(mesh))
        }
    }
}

/// Fractions of the bounds (x, z) tried in order when looking for somewhere to stand:
/// the middle, then the four corners pulled halfway in.
const SPAWN_SAMPLES: [(f32, f32); 5] = [
    (0.5, 0.5),
    (0.25, 0.25),
    (0.75, 0.25),
    (0.25, 0.75),
    (0.75, 0.75),
];

/// Spawn on the first surface found straight down from above the mesh, if any.
pub fn mesh_spawn_point(mesh: &TriangleMesh) -> Option<Vec3> {
    let bounds = mesh.bounds();
    let size = bounds.size();
    let start_y = bounds.max.y + 1.0;

    SPAWN_SAMPLES.iter().find_map(|&(fx, fz)| {
        let origin = Vec3::new(
            bounds.min.x + size.x * fx,
            start_y,
            bounds.min.z + size.z * fz,
        );
        let hit = mesh.raycast(origin, Vec3::NEG_Y, size.y + 2.0)?;
        Some(hit.point + Vec3::Y * PLAYER_HEIGHT)
    })
}

// =============================================================================
// SPAWNING
// =============================================================================

/// Spawn the level visuals and insert the matching [`LevelGround`].
pub fn spawn_world(
    mut commands: Commands,
    world_roots: Query<Entity, With<ClientWorldRoot>>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    asset_server: Res<AssetServer>,
    config: Res<ClientConfig>,
    asset_dir: Res<AssetDir>,
) {
    if !world_roots.is_empty() {
        return;
    }

    let ground = match level_ground_for(&config.level, &config.layout, &asset_dir.0) {
        Ok(ground) => ground,
        Err(e) => {
            warn!(
                "Could not load level collider ({e}); falling back to the platform layout"
            );
            LevelGround::Platforms(config.layout.clone())
        }
    };

    let root = commands
        .spawn((
            ClientWorldRoot,
            Transform::default(),
            Visibility::default(),
        ))
        .id();

    match (&config.level, &ground) {
        (LevelMode::Mesh { scene, .. }, LevelGround::Mesh(mesh)) => {
            info!(
                "Level mesh collider: {} triangles, bounds {:?}",
                mesh.len(),
                mesh.bounds()
            );
            if let Some(spawn) = mesh_spawn_point(mesh) {
                commands.insert_resource(SpawnPoint(spawn));
            } else {
                warn!("No surface found under the level mesh; keeping the default spawn");
            }
            let scene_entity = commands
                .spawn(SceneRoot(asset_server.load(scene.clone())))
                .id();
            commands.entity(root).add_child(scene_entity);
        }
        (_, LevelGround::Platforms(layout) | LevelGround::PlatformsRaycast(layout)) => {
            spawn_platform_visuals(&mut commands, root, layout, &mut meshes, &mut materials);
        }
        (_, LevelGround::Mesh(_)) => {
            warn!("Mesh collider without a mesh level; nothing to show");
        }
    }

    commands.insert_resource(ground);
}

fn spawn_platform_visuals(
    commands: &mut Commands,
    root: Entity,
    layout: &PlatformLayout,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
) {
    if let Some(floor) = &layout.floor {
        let size = Vec3::from_array(floor.size);
        let floor_entity = commands
            .spawn((
                Mesh3d(meshes.add(Cuboid::from_size(size))),
                MeshMaterial3d(materials.add(StandardMaterial {
                    base_color: floor.bevy_color(),
                    perceptual_roughness: 0.9,
                    ..default()
                })),
                Transform::from_translation(floor.center()),
            ))
            .id();
        commands.entity(root).add_child(floor_entity);
    }

    for platform in &layout.platforms {
        let aabb = platform.aabb();
        let entity = commands
            .spawn((
                Mesh3d(meshes.add(Cuboid::from_size(aabb.size()))),
                MeshMaterial3d(materials.add(StandardMaterial {
                    base_color: platform.bevy_color(),
                    ..default()
                })),
                Transform::from_translation(aabb.center()),
            ))
            .id();
        commands.entity(root).add_child(entity);
    }

    info!(
        "Spawned {} platforms (highest top {:?})",
        layout.platforms.len(),
        layout.highest_top()
    );
}
