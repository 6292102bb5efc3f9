//! Pause menu UI (in-game escape menu)

use bevy::app::AppExit;
use bevy::prelude::*;

use super::styles::*;
use crate::states::GameState;
use crate::systems::release_cursor;

pub struct PauseMenuPlugin;

impl Plugin for PauseMenuPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(OnEnter(GameState::Paused), (spawn_pause_menu, release_cursor));
        app.add_systems(OnExit(GameState::Paused), despawn_pause_menu);
        app.add_systems(
            Update,
            (button_interactions, handle_pause_actions).run_if(in_state(GameState::Paused)),
        );
        app.add_systems(
            Update,
            toggle_pause.run_if(in_state(GameState::Playing).or(in_state(GameState::Paused))),
        );
    }
}

/// Marker for the pause menu root
#[derive(Component)]
struct PauseMenuRoot;

/// Pause menu button actions
#[derive(Component, Clone, Copy)]
enum PauseButton {
    Resume,
    Exit,
}

fn spawn_pause_menu(mut commands: Commands) {
    commands
        .spawn((
            PauseMenuRoot,
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                flex_direction: FlexDirection::Column,
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                ..default()
            },
            BackgroundColor(MENU_BACKGROUND),
        ))
        .with_children(|parent| {
            parent.spawn((
                Text::new("PAUSED"),
                title_text_style(),
                TextColor(TEXT_COLOR),
                Node {
                    margin: UiRect::bottom(Val::Px(40.0)),
                    ..default()
                },
            ));

            spawn_button(parent, "RESUME", PauseButton::Resume);
            spawn_button(parent, "EXIT", PauseButton::Exit);

            parent.spawn((
                Text::new("Press ESC to resume"),
                TextFont {
                    font_size: 14.0,
                    ..default()
                },
                TextColor(TEXT_MUTED),
                Node {
                    margin: UiRect::top(Val::Px(30.0)),
                    ..default()
                },
            ));
        });
}

fn despawn_pause_menu(mut commands: Commands, query: Query<Entity, With<PauseMenuRoot>>) {
    for entity in query.iter() {
        commands.entity(entity).despawn();
    }
}

fn handle_pause_actions(
    buttons: Query<(&Interaction, &PauseButton), Changed<Interaction>>,
    mut next_state: ResMut<NextState<GameState>>,
    mut exit: MessageWriter<AppExit>,
) {
    for (interaction, action) in buttons.iter() {
        if *interaction == Interaction::Pressed {
            match action {
                PauseButton::Resume => {
                    next_state.set(GameState::Playing);
                }
                PauseButton::Exit => {
                    info!("Exiting game...");
                    exit.write(AppExit::Success);
                }
            }
        }
    }
}

/// The state Escape leads to from `current`, if any.
pub fn escape_target(current: GameState) -> Option<GameState> {
    match current {
        GameState::Playing => Some(GameState::Paused),
        GameState::Paused => Some(GameState::Playing),
        GameState::MainMenu => None,
    }
}

fn toggle_pause(
    keyboard: Res<ButtonInput<KeyCode>>,
    state: Res<State<GameState>>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    if !keyboard.just_pressed(KeyCode::Escape) {
        return;
    }
    if let Some(target) = escape_target(*state.get()) {
        next_state.set(target);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_toggles_between_play_and_pause() {
        assert_eq!(escape_target(GameState::Playing), Some(GameState::Paused));
        assert_eq!(escape_target(GameState::Paused), Some(GameState::Playing));
        assert_eq!(escape_target(GameState::MainMenu), None);
    }
}
