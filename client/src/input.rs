//! Player input handling

use bevy::input::mouse::MouseMotion;
use bevy::prelude::*;
use bevy::window::{CursorGrabMode, CursorOptions, PrimaryWindow};
use shared::{Player, PlayerInput, PlayerLook};
use std::f32::consts::FRAC_PI_2;

use crate::config::ClientConfig;
use crate::states::GameState;

/// Keep pitch just short of straight up/down so the view never flips.
const PITCH_LIMIT: f32 = FRAC_PI_2 - 0.01;

/// Client-side input state
#[derive(Resource, Default, Debug, Clone, PartialEq)]
pub struct InputState {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
    /// Shift held
    pub sprint: bool,
    /// Jump request (spacebar)
    pub jump: bool,
    /// Mouse-controlled yaw
    pub yaw: f32,
    /// Mouse-controlled pitch
    pub pitch: f32,
}

impl InputState {
    /// Read the movement keys. WASD and the arrow keys are equivalent.
    pub fn read_keys(&mut self, keyboard: &ButtonInput<KeyCode>) {
        self.forward = keyboard.any_pressed([KeyCode::KeyW, KeyCode::ArrowUp]);
        self.backward = keyboard.any_pressed([KeyCode::KeyS, KeyCode::ArrowDown]);
        self.left = keyboard.any_pressed([KeyCode::KeyA, KeyCode::ArrowLeft]);
        self.right = keyboard.any_pressed([KeyCode::KeyD, KeyCode::ArrowRight]);
        self.sprint = keyboard.any_pressed([KeyCode::ShiftLeft, KeyCode::ShiftRight]);
        self.jump = keyboard.pressed(KeyCode::Space);
    }

    /// Turn by a mouse delta (pixels). Moving the mouse right turns right, up looks up.
    pub fn apply_look_delta(&mut self, delta: Vec2, sensitivity: f32) {
        self.yaw -= delta.x * sensitivity;
        self.pitch = (self.pitch - delta.y * sensitivity).clamp(-PITCH_LIMIT, PITCH_LIMIT);
    }

    pub fn to_player_input(&self) -> PlayerInput {
        PlayerInput {
            forward: self.forward,
            backward: self.backward,
            left: self.left,
            right: self.right,
            sprint: self.sprint,
            jump: self.jump,
            yaw: self.yaw,
        }
    }
}

/// Handle keyboard input for movement
pub fn handle_keyboard_input(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut input_state: ResMut<InputState>,
) {
    input_state.read_keys(&keyboard);
}

/// Handle mouse input for looking around. Only while the pointer is locked.
pub fn handle_mouse_input(
    mut mouse_motion: MessageReader<MouseMotion>,
    windows: Query<&CursorOptions, With<PrimaryWindow>>,
    config: Res<ClientConfig>,
    mut input_state: ResMut<InputState>,
) {
    let delta: Vec2 = mouse_motion.read().map(|m| m.delta).sum();

    let locked = windows
        .single()
        .map(|cursor| cursor.grab_mode != CursorGrabMode::None)
        .unwrap_or(false);
    if !locked || delta == Vec2::ZERO {
        return;
    }

    input_state.apply_look_delta(delta, config.mouse_sensitivity);
}

/// Publish the frame's movement intent and look angles to the simulation.
pub fn publish_player_input(
    input_state: Res<InputState>,
    game_state: Res<State<GameState>>,
    mut player_input: ResMut<PlayerInput>,
    mut looks: Query<&mut PlayerLook, With<Player>>,
) {
    let input = input_state.to_player_input();
    *player_input = if game_state.get() == &GameState::Playing {
        input
    } else {
        input.cleared()
    };

    for mut look in looks.iter_mut() {
        look.yaw = input_state.yaw;
        look.pitch = input_state.pitch;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arrows_and_wasd_are_equivalent() {
        let mut keyboard = ButtonInput::<KeyCode>::default();
        keyboard.press(KeyCode::ArrowUp);
        keyboard.press(KeyCode::KeyD);
        keyboard.press(KeyCode::ShiftRight);

        let mut state = InputState::default();
        state.read_keys(&keyboard);
        assert!(state.forward && state.right && state.sprint);
        assert!(!state.backward && !state.left && !state.jump);

        keyboard.release(KeyCode::ArrowUp);
        keyboard.press(KeyCode::Space);
        state.read_keys(&keyboard);
        assert!(!state.forward && state.jump);
    }

    #[test]
    fn test_pitch_is_clamped() {
        let mut state = InputState::default();
        state.apply_look_delta(Vec2::new(0.0, -100_000.0), 0.002);
        assert!((state.pitch - PITCH_LIMIT).abs() < 1e-6);
        state.apply_look_delta(Vec2::new(0.0, 200_000.0), 0.002);
        assert!((state.pitch + PITCH_LIMIT).abs() < 1e-6);
    }

    #[test]
    fn test_mouse_right_turns_right() {
        let mut state = InputState::default();
        state.apply_look_delta(Vec2::new(100.0, 0.0), 0.002);
        assert!(state.yaw < 0.0);
        // Negative yaw turns the forward vector toward +X
        let (forward, _) = shared::movement::yaw_basis(state.yaw);
        assert!(forward.x > 0.0);
    }

    #[test]
    fn test_player_input_copies_state() {
        let state = InputState {
            left: true,
            jump: true,
            yaw: 0.5,
            pitch: 0.2,
            ..default()
        };
        let input = state.to_player_input();
        assert!(input.left && input.jump);
        assert_eq!(input.yaw, 0.5);
    }
}
