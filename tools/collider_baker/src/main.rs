//! Offline level collider baking tool.
//!
//! Reads `client/assets/level_collider_manifest.ron`, loads the level scene via Bevy,
//! gathers every mesh triangle in world space, cleans the soup with parry and writes
//! the result (usually `client/assets/level_collider.bin`) for runtime ground queries.

use std::fs;
use std::path::{Path, PathBuf};

use bevy::app::AppExit;
use bevy::asset::RecursiveDependencyLoadState;
use bevy::prelude::*;
use bevy_mesh::{Indices, PrimitiveTopology, VertexAttributeValues};

use bevy_rapier3d::parry::shape::{TriMesh, TriMeshFlags};
use bevy_rapier3d::rapier::na::Point3;

use serde::Deserialize;
use shared::{BakedLevelCollider, LEVEL_COLLIDER_VERSION};
use thiserror::Error;

const MANIFEST_FILE_NAME: &str = "level_collider_manifest.ron";

// -----------------------------------------------------------------------------
// Manifest types
// -----------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
struct BakeManifest {
    version: u32,
    /// Scene path, e.g. "models/level.glb#Scene0"
    scene: String,
    /// Output file, relative to the assets folder
    output: String,
}

#[derive(Debug, Error)]
enum BakeError {
    #[error("failed to read manifest {path}: {source}")]
    ReadManifest {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse manifest {path}: {source}")]
    ParseManifest {
        path: String,
        #[source]
        source: ron::error::SpannedError,
    },
    #[error("unsupported manifest version {0} (expected 1)")]
    ManifestVersion(u32),
    #[error("failed to load scene '{scene}': {reason}")]
    SceneLoad { scene: String, reason: String },
    #[error("scene '{0}' contains no triangle meshes")]
    NoTriangles(String),
    #[error("triangle cleanup failed: {0}")]
    Cleanup(String),
    #[error("bincode serialize failed: {0}")]
    Encode(#[from] bincode::Error),
    #[error("failed to write {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

// -----------------------------------------------------------------------------
// Bake state
// -----------------------------------------------------------------------------

#[derive(Resource)]
struct BakeConfig {
    assets_dir: PathBuf,
}

#[derive(Resource)]
struct BakeState {
    manifest: BakeManifest,
    scene: Handle<Scene>,
}

fn main() -> AppExit {
    let workspace_root = match std::env::current_dir() {
        Ok(dir) => dir,
        Err(e) => {
            eprintln!("collider_baker: cannot resolve working directory: {e}");
            return AppExit::error();
        }
    };
    // Absolute, since Bevy resolves relative asset roots against the executable
    let assets_dir = workspace_root.join("client/assets");

    let mut app = App::new();

    // DefaultPlugins for GLTF loading + Mesh asset types, headless.
    app.add_plugins(
        DefaultPlugins
            .set(WindowPlugin {
                primary_window: None,
                exit_condition: bevy::window::ExitCondition::DontExit,
                ..default()
            })
            .set(AssetPlugin {
                file_path: assets_dir.to_string_lossy().to_string(),
                ..default()
            }),
    );

    app.insert_resource(BakeConfig { assets_dir });

    app.add_systems(Startup, start_bake);
    app.add_systems(Update, poll_and_bake);

    app.run()
}

fn fail(err: BakeError, app_exit: &mut MessageWriter<AppExit>) {
    error!("Bake failed: {err}");
    app_exit.write(AppExit::error());
}

fn load_manifest(path: &Path) -> Result<BakeManifest, BakeError> {
    let text = fs::read_to_string(path).map_err(|source| BakeError::ReadManifest {
        path: path.display().to_string(),
        source,
    })?;
    let manifest: BakeManifest = ron::from_str(&text).map_err(|source| BakeError::ParseManifest {
        path: path.display().to_string(),
        source,
    })?;
    if manifest.version != 1 {
        return Err(BakeError::ManifestVersion(manifest.version));
    }
    Ok(manifest)
}

fn start_bake(
    mut commands: Commands,
    config: Res<BakeConfig>,
    asset_server: Res<AssetServer>,
    mut app_exit: MessageWriter<AppExit>,
) {
    let manifest_path = config.assets_dir.join(MANIFEST_FILE_NAME);
    let manifest = match load_manifest(&manifest_path) {
        Ok(manifest) => manifest,
        Err(e) => return fail(e, &mut app_exit),
    };

    info!("Loading level scene {}", manifest.scene);
    let scene: Handle<Scene> = asset_server.load(manifest.scene.clone());
    commands.insert_resource(BakeState { manifest, scene });
}

fn poll_and_bake(
    mut commands: Commands,
    config: Res<BakeConfig>,
    state: Option<Res<BakeState>>,
    asset_server: Res<AssetServer>,
    scenes: Res<Assets<Scene>>,
    meshes: Res<Assets<Mesh>>,
    mut app_exit: MessageWriter<AppExit>,
) {
    let Some(state) = state else { return };

    // Wait for the scene (and its meshes) to finish loading.
    match asset_server.get_recursive_dependency_load_state(&state.scene) {
        Some(RecursiveDependencyLoadState::Loaded) => {}
        Some(RecursiveDependencyLoadState::Failed(err)) => {
            commands.remove_resource::<BakeState>();
            return fail(
                BakeError::SceneLoad {
                    scene: state.manifest.scene.clone(),
                    reason: format!("{err:?}"),
                },
                &mut app_exit,
            );
        }
        _ => return,
    }

    commands.remove_resource::<BakeState>();

    let result = scenes
        .get(&state.scene)
        .ok_or_else(|| BakeError::SceneLoad {
            scene: state.manifest.scene.clone(),
            reason: "scene asset missing after load".to_string(),
        })
        .and_then(|scene| bake_scene(scene, &meshes, &state.manifest.scene))
        .and_then(|baked| write_collider(&baked, &config.assets_dir.join(&state.manifest.output)));

    match result {
        Ok(()) => {
            app_exit.write(AppExit::Success);
        }
        Err(e) => fail(e, &mut app_exit),
    }
}

fn bake_scene(
    scene: &Scene,
    meshes: &Assets<Mesh>,
    scene_path: &str,
) -> Result<BakedLevelCollider, BakeError> {
    let triangles = collect_scene_triangles(scene, meshes);
    if triangles.is_empty() {
        return Err(BakeError::NoTriangles(scene_path.to_string()));
    }
    info!("Collected {} raw triangles. Cleaning…", triangles.len());
    clean_triangles(&triangles)
}

fn write_collider(baked: &BakedLevelCollider, path: &Path) -> Result<(), BakeError> {
    let bytes = bincode::serialize(baked)?;
    fs::write(path, &bytes).map_err(|source| BakeError::Write {
        path: path.display().to_string(),
        source,
    })?;
    info!(
        "Wrote level collider to {:?} ({} bytes, {} vertices, {} triangles)",
        path,
        bytes.len(),
        baked.vertices.len(),
        baked.indices.len()
    );
    Ok(())
}

fn collect_scene_triangles(scene: &Scene, meshes: &Assets<Mesh>) -> Vec<[Vec3; 3]> {
    let mut out = Vec::new();

    let world = &scene.world;

    #[allow(deprecated)]
    for entity_ref in world.iter_entities() {
        let Some(mesh3d) = entity_ref.get::<Mesh3d>() else { continue };
        let Some(mesh) = meshes.get(&mesh3d.0) else { continue };

        let mat = world_matrix_for(entity_ref.id(), world);
        out.extend(
            mesh_triangles(mesh)
                .into_iter()
                .map(|tri| tri.map(|v| mat.transform_point3(v))),
        );
    }

    out
}

/// Local-space triangles of a triangle-list mesh. Other topologies yield nothing.
fn mesh_triangles(mesh: &Mesh) -> Vec<[Vec3; 3]> {
    if mesh.primitive_topology() != PrimitiveTopology::TriangleList {
        return Vec::new();
    }
    let Some(VertexAttributeValues::Float32x3(positions)) = mesh.attribute(Mesh::ATTRIBUTE_POSITION)
    else {
        return Vec::new();
    };

    let indices: Vec<usize> = match mesh.indices() {
        Some(Indices::U16(idx)) => idx.iter().map(|&i| i as usize).collect(),
        Some(Indices::U32(idx)) => idx.iter().map(|&i| i as usize).collect(),
        None => (0..positions.len()).collect(),
    };

    indices
        .chunks_exact(3)
        .filter_map(|tri| {
            let a = positions.get(tri[0])?;
            let b = positions.get(tri[1])?;
            let c = positions.get(tri[2])?;
            Some([Vec3::from_array(*a), Vec3::from_array(*b), Vec3::from_array(*c)])
        })
        .collect()
}

fn world_matrix_for(entity: Entity, world: &World) -> Mat4 {
    let mut mat = Mat4::IDENTITY;
    let mut current = entity;

    loop {
        if let Some(t) = world.get::<Transform>(current) {
            mat = t.to_matrix() * mat;
        }

        if let Some(parent) = world.get::<ChildOf>(current) {
            current = parent.parent();
        } else {
            break;
        }
    }

    mat
}

/// Weld vertices and drop degenerate / duplicate triangles.
fn clean_triangles(triangles: &[[Vec3; 3]]) -> Result<BakedLevelCollider, BakeError> {
    let mut vertices = Vec::with_capacity(triangles.len() * 3);
    let mut indices = Vec::with_capacity(triangles.len());
    for tri in triangles {
        let base = vertices.len() as u32;
        vertices.extend(tri.iter().map(|v| Point3::new(v.x, v.y, v.z)));
        indices.push([base, base + 1, base + 2]);
    }

    let flags = TriMeshFlags::MERGE_DUPLICATE_VERTICES
        | TriMeshFlags::DELETE_DEGENERATE_TRIANGLES
        | TriMeshFlags::DELETE_DUPLICATE_TRIANGLES;
    let trimesh = TriMesh::with_flags(vertices, indices, flags)
        .map_err(|e| BakeError::Cleanup(format!("{e:?}")))?;

    Ok(BakedLevelCollider {
        version: LEVEL_COLLIDER_VERSION,
        vertices: trimesh.vertices().iter().map(|p| [p.x, p.y, p.z]).collect(),
        indices: trimesh.indices().to_vec(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::asset::RenderAssetUsages;
    use shared::TriangleMesh;

    fn quad_mesh() -> Mesh {
        Mesh::new(PrimitiveTopology::TriangleList, RenderAssetUsages::default())
            .with_inserted_attribute(
                Mesh::ATTRIBUTE_POSITION,
                vec![
                    [-1.0f32, 0.0, -1.0],
                    [-1.0, 0.0, 1.0],
                    [1.0, 0.0, 1.0],
                    [1.0, 0.0, -1.0],
                ],
            )
            .with_inserted_indices(Indices::U32(vec![0, 1, 2, 0, 2, 3]))
    }

    #[test]
    fn test_mesh_triangles_follow_indices() {
        let tris = mesh_triangles(&quad_mesh());
        assert_eq!(tris.len(), 2);
        assert_eq!(tris[1][2], Vec3::new(1.0, 0.0, -1.0));
    }

    #[test]
    fn test_non_triangle_list_is_skipped() {
        let lines = Mesh::new(PrimitiveTopology::LineList, RenderAssetUsages::default())
            .with_inserted_attribute(
                Mesh::ATTRIBUTE_POSITION,
                vec![[0.0f32, 0.0, 0.0], [1.0, 0.0, 0.0]],
            );
        assert!(mesh_triangles(&lines).is_empty());
    }

    #[test]
    fn test_world_matrix_walks_parents() {
        let mut world = World::new();
        let parent = world.spawn(Transform::from_xyz(0.0, 5.0, 0.0)).id();
        let child = world
            .spawn((Transform::from_xyz(1.0, 0.0, 0.0), ChildOf(parent)))
            .id();
        let p = world_matrix_for(child, &world).transform_point3(Vec3::ZERO);
        assert!((p - Vec3::new(1.0, 5.0, 0.0)).length() < 1e-6);
    }

    #[test]
    fn test_clean_welds_and_drops_duplicates() {
        let mut tris = mesh_triangles(&quad_mesh());
        tris.push(tris[0]);

        let baked = clean_triangles(&tris).unwrap();
        assert_eq!(baked.version, LEVEL_COLLIDER_VERSION);
        assert_eq!(baked.indices.len(), 2);
        assert!(baked.vertices.len() < 9);

        let mesh = TriangleMesh::try_from(&baked).unwrap();
        let hit = mesh.raycast(Vec3::new(0.2, 3.0, 0.2), Vec3::NEG_Y, 10.0);
        assert!(hit.is_some());
    }
}
