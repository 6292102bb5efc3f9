//! Shared simulation for the first-person platformer.
//!
//! Everything here is renderer-agnostic: the client drives it every frame and the
//! collider baker reuses the collider types.

pub mod aabb;
pub mod colliders;
pub mod components;
pub mod input;
pub mod level;
pub mod movement;
pub mod physics;
pub mod player;
pub mod simulation;

pub use aabb::Aabb3;
pub use colliders::{
    load_level_collider_from_bytes, load_level_collider_from_file, BakedLevelCollider,
    ColliderError, TriangleMesh, LEVEL_COLLIDER_VERSION,
};
pub use components::*;
pub use input::PlayerInput;
pub use level::{Floor, LevelMode, Platform, PlatformLayout};
pub use physics::{step_character, MovementTuning, StepOutcome};
pub use player::*;
pub use simulation::{LevelGround, PlayerRespawned, SimulationPlugin, SimulationSet};
