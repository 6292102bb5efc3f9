//! Baked triangle collider for the imported level mesh.
//!
//! The offline `collider_baker` tool writes `level_collider.bin` using these types.
//! The client loads it and raycasts against it to find the ground.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use crate::aabb::Aabb3;

/// Current baked collider format version.
pub const LEVEL_COLLIDER_VERSION: u32 = 1;

/// World-space triangle soup baked from the level scene.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BakedLevelCollider {
    pub version: u32,
    pub vertices: Vec<[f32; 3]>,
    pub indices: Vec<[u32; 3]>,
}

#[derive(Debug, Error)]
pub enum ColliderError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("bincode deserialize failed: {0}")]
    Decode(#[from] bincode::Error),
    #[error("unsupported level collider version {found} (expected {expected})", expected = LEVEL_COLLIDER_VERSION)]
    Version { found: u32 },
    #[error("triangle {triangle} references vertex {index} but only {vertex_count} vertices exist")]
    IndexOutOfRange {
        triangle: usize,
        index: u32,
        vertex_count: usize,
    },
    #[error("level collider has no triangles")]
    Empty,
}

/// Load a baked level collider from bytes (bincode).
pub fn load_level_collider_from_bytes(bytes: &[u8]) -> Result<BakedLevelCollider, ColliderError> {
    let baked: BakedLevelCollider = bincode::deserialize(bytes)?;
    if baked.version != LEVEL_COLLIDER_VERSION {
        return Err(ColliderError::Version {
            found: baked.version,
        });
    }
    Ok(baked)
}

/// Load a baked level collider from a file path (bincode).
pub fn load_level_collider_from_file(
    path: impl AsRef<Path>,
) -> Result<BakedLevelCollider, ColliderError> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(|source| ColliderError::Io {
        path: path.display().to_string(),
        source,
    })?;
    load_level_collider_from_bytes(&bytes)
}

/// A single world-space triangle with its geometric normal.
#[derive(Clone, Copy, Debug)]
pub struct Triangle {
    pub vertices: [Vec3; 3],
    pub normal: Vec3,
}

/// Closest ray hit against the mesh.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RayHit {
    pub distance: f32,
    pub point: Vec3,
    pub normal: Vec3,
}

/// Triangle mesh ready for ray queries.
#[derive(Clone, Debug)]
pub struct TriangleMesh {
    triangles: Vec<Triangle>,
    bounds: Aabb3,
}

impl TryFrom<&BakedLevelCollider> for TriangleMesh {
    type Error = ColliderError;

    fn try_from(baked: &BakedLevelCollider) -> Result<Self, Self::Error> {
        let vertex_count = baked.vertices.len();
        let mut triangles = Vec::with_capacity(baked.indices.len());
        for (triangle, tri) in baked.indices.iter().enumerate() {
            let mut v = [Vec3::ZERO; 3];
            for (slot, &index) in v.iter_mut().zip(tri.iter()) {
                let Some(p) = baked.vertices.get(index as usize) else {
                    return Err(ColliderError::IndexOutOfRange {
                        triangle,
                        index,
                        vertex_count,
                    });
                };
                *slot = Vec3::from_array(*p);
            }
            triangles.push(v);
        }
        Self::from_triangles(triangles)
    }
}

impl TriangleMesh {
    /// Build from world-space triangles. Degenerate triangles are dropped.
    pub fn from_triangles(
        triangles: impl IntoIterator<Item = [Vec3; 3]>,
    ) -> Result<Self, ColliderError> {
        let triangles: Vec<Triangle> = triangles
            .into_iter()
            .filter_map(|vertices| {
                let n = (vertices[1] - vertices[0]).cross(vertices[2] - vertices[0]);
                (n.length_squared() > 1e-12).then(|| Triangle {
                    vertices,
                    normal: n.normalize(),
                })
            })
            .collect();

        let bounds = Aabb3::from_points(triangles.iter().flat_map(|t| t.vertices))
            .ok_or(ColliderError::Empty)?;

        Ok(Self { triangles, bounds })
    }

    pub fn len(&self) -> usize {
        self.triangles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    pub fn bounds(&self) -> Aabb3 {
        self.bounds
    }

    /// Nearest hit on a front face (normal facing against the ray) within `max_dist`.
    ///
    /// Back faces are skipped so a ray starting inside a closed mesh does not
    /// report its far wall as ground.
    pub fn raycast(&self, origin: Vec3, dir: Vec3, max_dist: f32) -> Option<RayHit> {
        // Broad phase: the whole mesh bounds
        self.bounds.ray_entry(origin, dir, max_dist)?;

        let mut best: Option<RayHit> = None;
        for tri in &self.triangles {
            if tri.normal.dot(dir) >= 0.0 {
                continue;
            }
            let [v0, v1, v2] = tri.vertices;
            if let Some((t, point)) = ray_triangle_intersection(origin, dir, max_dist, v0, v1, v2) {
                match best {
                    Some(hit) if hit.distance <= t => {}
                    _ => {
                        best = Some(RayHit {
                            distance: t,
                            point,
                            normal: tri.normal,
                        })
                    }
                }
            }
        }
        best
    }
}

/// Möller–Trumbore ray-triangle intersection
pub fn ray_triangle_intersection(
    ray_origin: Vec3,
    ray_dir: Vec3,
    max_t: f32,
    v0: Vec3,
    v1: Vec3,
    v2: Vec3,
) -> Option<(f32, Vec3)> {
    const EPSILON: f32 = 1e-6;

    let edge1 = v1 - v0;
    let edge2 = v2 - v0;
    let h = ray_dir.cross(edge2);
    let a = edge1.dot(h);

    if a.abs() < EPSILON {
        return None; // Ray is parallel to triangle
    }

    let f = 1.0 / a;
    let s = ray_origin - v0;
    let u = f * s.dot(h);

    if !(0.0..=1.0).contains(&u) {
        return None;
    }

    let q = s.cross(edge1);
    let v = f * ray_dir.dot(q);

    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    // Unlike a bullet trace, a hit exactly at the origin counts (feet resting on the surface)
    let t = f * edge2.dot(q);
    if (0.0..=max_t).contains(&t) {
        Some((t, ray_origin + ray_dir * t))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Upward-facing 10x10 quad at height `y` (counter-clockwise seen from above).
    fn quad(y: f32) -> BakedLevelCollider {
        BakedLevelCollider {
            version: LEVEL_COLLIDER_VERSION,
            vertices: vec![
                [-5.0, y, -5.0],
                [-5.0, y, 5.0],
                [5.0, y, 5.0],
                [5.0, y, -5.0],
            ],
            indices: vec![[0, 1, 2], [0, 2, 3]],
        }
    }

    #[test]
    fn test_raycast_down_hits_quad() {
        let mesh = TriangleMesh::try_from(&quad(2.0)).unwrap();
        assert_eq!(mesh.len(), 2);
        let hit = mesh.raycast(Vec3::new(1.0, 5.0, 1.0), Vec3::NEG_Y, 10.0).unwrap();
        assert!((hit.distance - 3.0).abs() < 1e-5);
        assert!((hit.point.y - 2.0).abs() < 1e-5);
        assert!(hit.normal.y > 0.99);
    }

    #[test]
    fn test_raycast_ignores_back_faces_and_misses() {
        let mesh = TriangleMesh::try_from(&quad(2.0)).unwrap();
        // From below, looking up: back face
        assert!(mesh.raycast(Vec3::new(0.0, 0.0, 0.0), Vec3::Y, 10.0).is_none());
        // Outside the quad
        assert!(mesh.raycast(Vec3::new(9.0, 5.0, 0.0), Vec3::NEG_Y, 10.0).is_none());
        // Too short
        assert!(mesh.raycast(Vec3::new(0.0, 5.0, 0.0), Vec3::NEG_Y, 2.0).is_none());
    }

    #[test]
    fn test_nearest_hit_wins() {
        let mut baked = quad(0.0);
        let upper = quad(3.0);
        baked.vertices.extend(upper.vertices);
        baked.indices.extend(upper.indices.iter().map(|t| t.map(|i| i + 4)));
        let mesh = TriangleMesh::try_from(&baked).unwrap();
        let hit = mesh.raycast(Vec3::new(0.5, 10.0, 0.5), Vec3::NEG_Y, 20.0).unwrap();
        assert!((hit.point.y - 3.0).abs() < 1e-5);
    }

    #[test]
    fn test_bincode_version_check() {
        let mut baked = quad(0.0);
        let bytes = bincode::serialize(&baked).unwrap();
        assert_eq!(load_level_collider_from_bytes(&bytes).unwrap(), baked);

        baked.version = 7;
        let bytes = bincode::serialize(&baked).unwrap();
        assert!(matches!(
            load_level_collider_from_bytes(&bytes),
            Err(ColliderError::Version { found: 7 })
        ));
    }

    #[test]
    fn test_rejects_bad_indices_and_empty() {
        let mut baked = quad(0.0);
        baked.indices.push([0, 1, 9]);
        assert!(matches!(
            TriangleMesh::try_from(&baked),
            Err(ColliderError::IndexOutOfRange { index: 9, .. })
        ));

        let empty = BakedLevelCollider {
            version: LEVEL_COLLIDER_VERSION,
            vertices: vec![],
            indices: vec![],
        };
        assert!(matches!(TriangleMesh::try_from(&empty), Err(ColliderError::Empty)));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = load_level_collider_from_file("definitely/not/here.bin").unwrap_err();
        assert!(matches!(err, ColliderError::Io { .. }));
    }
}
