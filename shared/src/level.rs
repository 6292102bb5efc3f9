//! Static level description: a floor plus hand-authored box platforms,
//! or a single imported mesh with a baked collider.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::aabb::Aabb3;

/// A hand-authored box platform.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Platform {
    pub center: [f32; 3],
    pub size: [f32; 3],
    /// sRGB color, 0-255 per channel
    pub color: [u8; 3],
}

impl Platform {
    pub fn new(center: [f32; 3], size: [f32; 3], color: u32) -> Self {
        Self {
            center,
            size,
            color: hex_rgb(color),
        }
    }

    pub fn aabb(&self) -> Aabb3 {
        Aabb3::from_center_size(Vec3::from_array(self.center), Vec3::from_array(self.size))
    }

    pub fn bevy_color(&self) -> Color {
        Color::srgb_u8(self.color[0], self.color[1], self.color[2])
    }
}

/// The ground slab. Collision treats it as an infinite plane at `top_y`;
/// `size` only matters for the visual.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Floor {
    pub top_y: f32,
    pub size: [f32; 3],
    pub color: [u8; 3],
}

impl Default for Floor {
    fn default() -> Self {
        Self {
            top_y: 0.0,
            size: [50.0, 1.0, 50.0],
            color: hex_rgb(0x228B22),
        }
    }
}

impl Floor {
    /// Center of the visual slab (its top sits at `top_y`).
    pub fn center(&self) -> Vec3 {
        Vec3::new(0.0, self.top_y - self.size[1] * 0.5, 0.0)
    }

    pub fn bevy_color(&self) -> Color {
        Color::srgb_u8(self.color[0], self.color[1], self.color[2])
    }
}

/// Floor plus platforms, in landing-test order.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct PlatformLayout {
    pub floor: Option<Floor>,
    pub platforms: Vec<Platform>,
}

impl Default for PlatformLayout {
    fn default() -> Self {
        Self {
            floor: Some(Floor::default()),
            platforms: vec![
                // Starting platform, slightly below the eye line
                Platform::new([0.0, 0.5, -5.0], [6.0, 1.0, 6.0], 0x777777),
                Platform::new([4.0, 2.0, -8.0], [3.0, 0.5, 3.0], 0xFF4444),
                Platform::new([-4.0, 3.5, -12.0], [3.0, 0.5, 3.0], 0x44FF44),
                Platform::new([2.0, 5.5, -16.0], [4.0, 0.5, 4.0], 0x4444FF),
                Platform::new([0.0, 9.0, -20.0], [6.0, 0.5, 6.0], 0xFFFF44),
            ],
        }
    }
}

impl PlatformLayout {
    pub fn aabbs(&self) -> impl Iterator<Item = Aabb3> + '_ {
        self.platforms.iter().map(Platform::aabb)
    }

    /// Highest platform top, or the floor if there are no platforms.
    pub fn highest_top(&self) -> Option<f32> {
        self.aabbs()
            .map(|b| b.top())
            .chain(self.floor.as_ref().map(|f| f.top_y))
            .reduce(f32::max)
    }
}

/// Which iteration of the demo to run.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Default)]
pub enum LevelMode {
    /// Box platforms, landing by footprint overlap and a vertical window on each top.
    #[default]
    Platforms,
    /// Box platforms, landing by a single downward ray.
    PlatformsRaycast,
    /// One imported glTF scene; ground comes from its baked triangle collider.
    Mesh {
        /// Scene asset path, e.g. `models/level.glb#Scene0`
        scene: String,
        /// Baked collider path relative to the assets folder
        collider: String,
    },
}

impl LevelMode {
    pub fn label(&self) -> &'static str {
        match self {
            LevelMode::Platforms => "platforms (aabb)",
            LevelMode::PlatformsRaycast => "platforms (raycast)",
            LevelMode::Mesh { .. } => "imported mesh",
        }
    }
}

fn hex_rgb(hex: u32) -> [u8; 3] {
    [
        ((hex >> 16) & 0xFF) as u8,
        ((hex >> 8) & 0xFF) as u8,
        (hex & 0xFF) as u8,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_layout_matches_scene() {
        let layout = PlatformLayout::default();
        assert_eq!(layout.platforms.len(), 5);
        assert_eq!(layout.platforms[1].color, [0xFF, 0x44, 0x44]);
        // Starting platform top is at 1.0
        assert_eq!(layout.platforms[0].aabb().top(), 1.0);
        assert_eq!(layout.highest_top(), Some(9.25));
    }

    #[test]
    fn test_floor_visual_sits_below_top() {
        let floor = Floor::default();
        assert_eq!(floor.center(), Vec3::new(0.0, -0.5, 0.0));
    }

    #[test]
    fn test_hex_rgb() {
        assert_eq!(hex_rgb(0x228B22), [0x22, 0x8B, 0x22]);
    }
}
