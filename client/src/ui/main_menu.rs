//! Instructions overlay shown before play starts

use bevy::app::AppExit;
use bevy::prelude::*;

use super::styles::*;
use crate::config::ClientConfig;
use crate::states::GameState;

pub struct MainMenuPlugin;

impl Plugin for MainMenuPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(OnEnter(GameState::MainMenu), spawn_main_menu);
        app.add_systems(OnExit(GameState::MainMenu), despawn_main_menu);
        app.add_systems(
            Update,
            (button_interactions, handle_menu_actions).run_if(in_state(GameState::MainMenu)),
        );
    }
}

/// Marker for the main menu root
#[derive(Component)]
struct MainMenuRoot;

/// Button action types
#[derive(Component, Clone, Copy)]
enum MenuButton {
    Start,
    Exit,
}

pub const CONTROLS_TEXT: &str = "Move: WASD / Arrow keys\n\
Jump: SPACE\n\
Sprint: SHIFT\n\
Look: Mouse\n\
Pause: ESC\n\
Debug info: F3";

fn spawn_main_menu(mut commands: Commands, config: Res<ClientConfig>) {
    commands
        .spawn((
            MainMenuRoot,
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
                Text::new("3D PLATFORMER"),
                title_text_style(),
                TextColor(TEXT_COLOR),
                Node {
                    margin: UiRect::bottom(Val::Px(24.0)),
                    ..default()
                },
            ));

            parent.spawn((
                Text::new(CONTROLS_TEXT),
                body_text_style(),
                TextColor(TEXT_COLOR),
                TextLayout::new_with_justify(Justify::Center),
                Node {
                    margin: UiRect::bottom(Val::Px(24.0)),
                    ..default()
                },
            ));

            spawn_button(parent, "START", MenuButton::Start);
            spawn_button(parent, "EXIT", MenuButton::Exit);

            parent.spawn((
                Text::new(format!("Level: {}", config.level.label())),
                TextFont {
                    font_size: 14.0,
                    ..default()
                },
                TextColor(TEXT_MUTED),
                Node {
                    position_type: PositionType::Absolute,
                    bottom: Val::Px(20.0),
                    ..default()
                },
            ));
        });
}

fn despawn_main_menu(mut commands: Commands, query: Query<Entity, With<MainMenuRoot>>) {
    for entity in query.iter() {
        commands.entity(entity).despawn();
    }
}

fn handle_menu_actions(
    buttons: Query<(&Interaction, &MenuButton), Changed<Interaction>>,
    mut next_state: ResMut<NextState<GameState>>,
    mut exit_writer: MessageWriter<AppExit>,
) {
    for (interaction, action) in buttons.iter() {
        if *interaction == Interaction::Pressed {
            match action {
                MenuButton::Start => {
                    info!("Start pressed - entering play");
                    next_state.set(GameState::Playing);
                }
                MenuButton::Exit => {
                    info!("Exit pressed - quitting game");
                    exit_writer.write(AppExit::Success);
                }
            }
        }
    }
}
