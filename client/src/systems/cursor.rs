//! Pointer lock: hide and lock the cursor while playing, release it in menus.

use bevy::prelude::*;
use bevy::window::{CursorGrabMode, CursorOptions, PrimaryWindow};

fn set_cursor_lock(
    windows: &Query<Entity, With<PrimaryWindow>>,
    cursor_opts: &mut Query<&mut CursorOptions>,
    locked: bool,
) {
    let Ok(window_entity) = windows.single() else {
        return;
    };
    if let Ok(mut cursor) = cursor_opts.get_mut(window_entity) {
        cursor.grab_mode = if locked {
            CursorGrabMode::Locked
        } else {
            CursorGrabMode::None
        };
        cursor.visible = !locked;
    }
}

/// Lock the cursor when entering gameplay
pub fn lock_cursor(
    windows: Query<Entity, With<PrimaryWindow>>,
    mut cursor_opts: Query<&mut CursorOptions>,
) {
    set_cursor_lock(&windows, &mut cursor_opts, true);
    debug!("Pointer locked");
}

/// Release the cursor when leaving gameplay
pub fn release_cursor(
    windows: Query<Entity, With<PrimaryWindow>>,
    mut cursor_opts: Query<&mut CursorOptions>,
) {
    set_cursor_lock(&windows, &mut cursor_opts, false);
    debug!("Pointer released");
}

/// Re-grab the cursor on click (the OS may release it when the window loses focus)
pub fn grab_cursor_on_click(
    windows: Query<Entity, With<PrimaryWindow>>,
    mut cursor_opts: Query<&mut CursorOptions>,
    mouse_button: Res<ButtonInput<MouseButton>>,
) {
    if mouse_button.just_pressed(MouseButton::Left) {
        set_cursor_lock(&windows, &mut cursor_opts, true);
    }
}
