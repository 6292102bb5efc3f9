//! Kinematic first-person character physics.
//!
//! Each frame:
//! - Damps horizontal velocity (friction) and applies gravity
//! - Accelerates along the yaw-relative wish direction
//! - Integrates position
//! - Asks a [`GroundQuery`] for a surface under the feet and snaps onto it
//! - Teleports back to spawn after falling below `respawn_y`
//!
//! There is no broad phase: the collidable set is a handful of boxes or one baked mesh.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{
    colliders::TriangleMesh,
    level::PlatformLayout,
    movement::world_wish_direction,
    player::{feet_y, player_box},
    PlayerGrounded, PlayerInput, PlayerPosition, PlayerVelocity, PLAYER_HEIGHT, SPRINT_SPEED,
    WALK_SPEED,
};

/// Tunable movement constants.
#[derive(Resource, Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct MovementTuning {
    /// Horizontal damping per second (velocity -= velocity * friction * dt)
    pub friction: f32,
    /// Downward acceleration in m/s^2
    pub gravity: f32,
    /// Upward velocity applied on jump
    pub jump_velocity: f32,
    pub walk_speed: f32,
    pub sprint_speed: f32,
    /// Multiplier on `speed * dt` when accelerating
    pub accel_scale: f32,
    /// Longest frame we integrate in one go (seconds)
    pub max_frame_delta: f32,
    /// Feet may be this far above a platform top and still land on it
    pub land_above: f32,
    /// Feet may be this far below a platform top and still land on it
    pub land_below: f32,
    /// Raycast ground: how far below the feet a surface still snaps
    pub snap_distance: f32,
    /// Eye altitude below which the player is sent back to spawn
    pub respawn_y: f32,
}

impl Default for MovementTuning {
    fn default() -> Self {
        Self {
            friction: 10.0,
            gravity: 9.8 * 5.0,
            jump_velocity: 7.0,
            walk_speed: WALK_SPEED,
            sprint_speed: SPRINT_SPEED,
            accel_scale: 10.0,
            max_frame_delta: 0.05,
            land_above: 0.1,
            land_below: 1.0,
            snap_distance: 0.1,
            respawn_y: -30.0,
        }
    }
}

/// Finds the surface the player's feet should rest on this frame.
pub trait GroundQuery {
    /// Altitude of the surface to stand on, or `None` when airborne.
    fn ground_height(&self, eye: Vec3, velocity_y: f32, tuning: &MovementTuning) -> Option<f32>;
}

/// Something a straight-down ray can hit.
pub trait RayTarget {
    /// Distance from `origin` straight down to the nearest surface within `max_dist`.
    fn cast_down(&self, origin: Vec3, max_dist: f32) -> Option<f32>;
}

/// Box-platform ground: infinite floor plane plus footprint/tolerance landing on platform tops.
pub struct PlatformGround<'a>(pub &'a PlatformLayout);

impl GroundQuery for PlatformGround<'_> {
    fn ground_height(&self, eye: Vec3, velocity_y: f32, tuning: &MovementTuning) -> Option<f32> {
        let layout = self.0;
        let mut eye = eye;
        let mut ground = None;
        let mut vy = velocity_y;

        // Floor clamp applies whatever the vertical velocity, and the platform
        // windows are measured from the clamped feet
        if let Some(floor) = &layout.floor {
            if feet_y(eye) < floor.top_y {
                ground = Some(floor.top_y);
                eye.y = floor.top_y + PLAYER_HEIGHT;
                vy = 0.0;
            }
        }

        for platform in layout.aabbs() {
            let body = player_box(eye);
            let feet = body.min.y;
            let top = platform.top();
            if body.overlaps_xz(&platform)
                && feet <= top + tuning.land_above
                && feet >= top - tuning.land_below
                && vy <= 0.0
            {
                ground = Some(top);
                eye.y = top + PLAYER_HEIGHT;
                vy = 0.0;
            }
        }

        ground
    }
}

impl RayTarget for PlatformLayout {
    fn cast_down(&self, origin: Vec3, max_dist: f32) -> Option<f32> {
        // The floor is a solid half-space: starting below it still hits its top
        let floor = self
            .floor
            .as_ref()
            .map(|f| (origin.y - f.top_y).max(0.0))
            .filter(|d| *d <= max_dist);

        self.aabbs()
            .filter_map(|b| b.ray_down(origin, max_dist))
            .chain(floor)
            .reduce(f32::min)
    }
}

impl RayTarget for TriangleMesh {
    fn cast_down(&self, origin: Vec3, max_dist: f32) -> Option<f32> {
        self.raycast(origin, Vec3::NEG_Y, max_dist).map(|hit| hit.distance)
    }
}

/// Ground found by one ray cast straight down from the eye through the feet.
pub struct RaycastGround<'a, T: RayTarget + ?Sized>(pub &'a T);

impl<T: RayTarget + ?Sized> GroundQuery for RaycastGround<'_, T> {
    fn ground_height(&self, eye: Vec3, velocity_y: f32, tuning: &MovementTuning) -> Option<f32> {
        if velocity_y > 0.0 {
            return None;
        }
        let max_dist = PLAYER_HEIGHT + tuning.snap_distance;
        self.0.cast_down(eye, max_dist).map(|dist| eye.y - dist)
    }
}

/// What happened to the player during a step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepOutcome {
    Airborne,
    Grounded,
    Respawned,
}

/// Step the player one frame.
#[allow(clippy::too_many_arguments)]
pub fn step_character<G: GroundQuery + ?Sized>(
    input: &PlayerInput,
    ground: &G,
    tuning: &MovementTuning,
    spawn: Vec3,
    position: &mut PlayerPosition,
    velocity: &mut PlayerVelocity,
    grounded: &mut PlayerGrounded,
    dt: f32,
) -> StepOutcome {
    let dt = dt.min(tuning.max_frame_delta);
    if dt <= 0.0 {
        return if grounded.can_jump {
            StepOutcome::Grounded
        } else {
            StepOutcome::Airborne
        };
    }

    // --- Jump ---
    if input.jump && grounded.can_jump {
        velocity.0.y = tuning.jump_velocity;
        grounded.can_jump = false;
    }

    // --- Friction ---
    velocity.0.x -= velocity.0.x * tuning.friction * dt;
    velocity.0.z -= velocity.0.z * tuning.friction * dt;

    // --- Gravity ---
    velocity.0.y -= tuning.gravity * dt;

    // --- Desired horizontal movement ---
    if input.has_movement() {
        let wish = world_wish_direction(input);
        let speed = if input.sprint {
            tuning.sprint_speed
        } else {
            tuning.walk_speed
        };
        let gain = speed * dt * tuning.accel_scale;
        velocity.0.x += wish.x * gain;
        velocity.0.z += wish.z * gain;
    }

    // --- Integrate ---
    position.0 += velocity.0 * dt;

    // --- Ground ---
    grounded.can_jump = false;
    if let Some(top) = ground.ground_height(position.0, velocity.0.y, tuning) {
        position.0.y = top + PLAYER_HEIGHT;
        velocity.0.y = 0.0;
        grounded.can_jump = true;
    }

    // --- Fell out of the world ---
    if position.0.y < tuning.respawn_y {
        position.0 = spawn;
        velocity.0 = Vec3::ZERO;
        grounded.can_jump = false;
        return StepOutcome::Respawned;
    }

    if grounded.can_jump {
        StepOutcome::Grounded
    } else {
        StepOutcome::Airborne
    }
}
