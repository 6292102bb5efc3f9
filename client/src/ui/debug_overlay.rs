//! F3 debug line: position, velocity, grounded state and respawn count.

use bevy::prelude::*;
use shared::{Player, PlayerGrounded, PlayerPosition, PlayerRespawned, PlayerVelocity};

use super::styles::TEXT_COLOR;
use crate::config::ClientConfig;

pub struct DebugOverlayPlugin;

impl Plugin for DebugOverlayPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<DebugOverlay>();
        app.add_systems(Startup, spawn_debug_overlay);
        app.add_systems(
            Update,
            (toggle_debug_overlay, count_respawns, update_debug_overlay).chain(),
        );
    }
}

#[derive(Resource, Default, Debug)]
pub struct DebugOverlay {
    pub visible: bool,
    pub respawns: u32,
}

/// Marker for the overlay text
#[derive(Component)]
struct DebugOverlayText;

fn spawn_debug_overlay(mut commands: Commands) {
    commands.spawn((
        DebugOverlayText,
        Text::new(""),
        TextFont {
            font_size: 14.0,
            ..default()
        },
        TextColor(TEXT_COLOR),
        Node {
            position_type: PositionType::Absolute,
            top: Val::Px(8.0),
            left: Val::Px(8.0),
            padding: UiRect::all(Val::Px(6.0)),
            ..default()
        },
        BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 0.45)),
        Visibility::Hidden,
        Pickable::IGNORE,
    ));
}

fn toggle_debug_overlay(keyboard: Res<ButtonInput<KeyCode>>, mut overlay: ResMut<DebugOverlay>) {
    if keyboard.just_pressed(KeyCode::F3) {
        overlay.visible = !overlay.visible;
    }
}

fn count_respawns(mut respawns: MessageReader<PlayerRespawned>, mut overlay: ResMut<DebugOverlay>) {
    overlay.respawns += respawns.read().count() as u32;
}

pub fn format_debug_line(
    position: Vec3,
    velocity: Vec3,
    grounded: bool,
    level: &str,
    respawns: u32,
) -> String {
    format!(
        "pos {:>7.2} {:>7.2} {:>7.2}\nvel {:>7.2} {:>7.2} {:>7.2}\n{} | {} | respawns {}",
        position.x,
        position.y,
        position.z,
        velocity.x,
        velocity.y,
        velocity.z,
        if grounded { "grounded" } else { "airborne" },
        level,
        respawns,
    )
}

fn update_debug_overlay(
    overlay: Res<DebugOverlay>,
    config: Res<ClientConfig>,
    players: Query<(&PlayerPosition, &PlayerVelocity, &PlayerGrounded), With<Player>>,
    mut texts: Query<(&mut Text, &mut Visibility), With<DebugOverlayText>>,
) {
    let Ok((mut text, mut visibility)) = texts.single_mut() else {
        return;
    };

    *visibility = if overlay.visible {
        Visibility::Inherited
    } else {
        Visibility::Hidden
    };
    if !overlay.visible {
        return;
    }

    if let Ok((position, velocity, grounded)) = players.single() {
        text.0 = format_debug_line(
            position.0,
            velocity.0,
            grounded.can_jump,
            config.level.label(),
            overlay.respawns,
        );
    }
}
