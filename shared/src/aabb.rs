//! Axis-aligned bounding boxes for platforms and the player body.

use bevy::prelude::*;

/// An axis-aligned bounding box in world space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb3 {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb3 {
    /// Create from center position and full size.
    pub fn from_center_size(center: Vec3, size: Vec3) -> Self {
        let half = size * 0.5;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    /// Altitude of the top face.
    #[inline]
    pub fn top(&self) -> f32 {
        self.max.y
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Strict overlap of the XZ projections. Boxes that only touch along an edge do not overlap.
    pub fn overlaps_xz(&self, other: &Aabb3) -> bool {
        other.max.x > self.min.x
            && other.min.x < self.max.x
            && other.max.z > self.min.z
            && other.min.z < self.max.z
    }

    /// Is the XZ position of `point` inside the footprint (edges inclusive)?
    pub fn contains_xz(&self, point: Vec3) -> bool {
        point.x >= self.min.x && point.x <= self.max.x && point.z >= self.min.z && point.z <= self.max.z
    }

    /// Distance from `origin` straight down to the top face, if the ray hits it within `max_dist`.
    ///
    /// Only the top face counts: a ray starting inside or below the box does not hit.
    pub fn ray_down(&self, origin: Vec3, max_dist: f32) -> Option<f32> {
        if !self.contains_xz(origin) || origin.y < self.max.y {
            return None;
        }
        let dist = origin.y - self.max.y;
        (dist <= max_dist).then_some(dist)
    }

    /// Smallest box containing every point.
    pub fn from_points(points: impl IntoIterator<Item = Vec3>) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let mut out = Self { min: first, max: first };
        for p in iter {
            out.min = out.min.min(p);
            out.max = out.max.max(p);
        }
        Some(out)
    }

    /// Slab test for a ray with an arbitrary direction. Returns the entry distance.
    pub fn ray_entry(&self, origin: Vec3, dir: Vec3, max_dist: f32) -> Option<f32> {
        let mut t_min = 0.0_f32;
        let mut t_max = max_dist;
        for axis in 0..3 {
            let o = origin[axis];
            let d = dir[axis];
            let (lo, hi) = (self.min[axis], self.max[axis]);
            if d.abs() < 1e-8 {
                if o < lo || o > hi {
                    return None;
                }
                continue;
            }
            let inv = 1.0 / d;
            let mut t0 = (lo - o) * inv;
            let mut t1 = (hi - o) * inv;
            if t0 > t1 {
                std::mem::swap(&mut t0, &mut t1);
            }
            t_min = t_min.max(t0);
            t_max = t_max.min(t1);
            if t_min > t_max {
                return None;
            }
        }
        Some(t_min)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_center_size() {
        let b = Aabb3::from_center_size(Vec3::new(4.0, 2.0, -8.0), Vec3::new(3.0, 0.5, 3.0));
        assert_eq!(b.top(), 2.25);
        assert_eq!(b.min, Vec3::new(2.5, 1.75, -9.5));
        assert_eq!(b.center(), Vec3::new(4.0, 2.0, -8.0));
    }

    #[test]
    fn test_overlap_xz_is_strict() {
        let a = Aabb3::from_center_size(Vec3::ZERO, Vec3::splat(2.0));
        let touching = Aabb3::from_center_size(Vec3::new(2.0, 5.0, 0.0), Vec3::splat(2.0));
        let overlapping = Aabb3::from_center_size(Vec3::new(1.9, 5.0, 0.0), Vec3::splat(2.0));
        assert!(!a.overlaps_xz(&touching));
        // Vertical separation does not matter for the XZ projection
        assert!(a.overlaps_xz(&overlapping));
    }

    #[test]
    fn test_ray_down_hits_top_only() {
        let b = Aabb3::from_center_size(Vec3::ZERO, Vec3::splat(2.0));
        assert_eq!(b.ray_down(Vec3::new(0.5, 3.0, 0.5), 5.0), Some(2.0));
        // Too short
        assert_eq!(b.ray_down(Vec3::new(0.5, 3.0, 0.5), 1.0), None);
        // Starts inside
        assert_eq!(b.ray_down(Vec3::new(0.5, 0.5, 0.5), 5.0), None);
        // Outside footprint
        assert_eq!(b.ray_down(Vec3::new(3.0, 3.0, 0.5), 5.0), None);
    }

    #[test]
    fn test_ray_entry() {
        let b = Aabb3::from_center_size(Vec3::ZERO, Vec3::splat(2.0));
        let t = b.ray_entry(Vec3::new(-5.0, 0.0, 0.0), Vec3::X, 10.0).unwrap();
        assert!((t - 4.0).abs() < 1e-5);
        assert!(b.ray_entry(Vec3::new(-5.0, 3.0, 0.0), Vec3::X, 10.0).is_none());
        assert!(b.ray_entry(Vec3::new(-5.0, 0.0, 0.0), Vec3::X, 3.0).is_none());
    }

    #[test]
    fn test_from_points() {
        let b = Aabb3::from_points([Vec3::new(1.0, -1.0, 0.0), Vec3::new(-2.0, 4.0, 3.0)]).unwrap();
        assert_eq!(b.min, Vec3::new(-2.0, -1.0, 0.0));
        assert_eq!(b.max, Vec3::new(1.0, 4.0, 3.0));
        assert!(Aabb3::from_points(std::iter::empty()).is_none());
    }
}
