//! Shared UI styles - sky and slate, to sit on top of the blue clear color

use bevy::ecs::hierarchy::ChildSpawnerCommands;
use bevy::prelude::*;

/// Translucent backdrop so the level stays visible behind menus
pub const MENU_BACKGROUND: Color = Color::srgba(0.0, 0.0, 0.0, 0.5);

/// Button colors
pub const BUTTON_NORMAL: Color = Color::srgb(0.14, 0.16, 0.20);
pub const BUTTON_HOVERED: Color = Color::srgb(0.20, 0.26, 0.34);
pub const BUTTON_PRESSED: Color = Color::srgb(0.18, 0.42, 0.58);

pub const BUTTON_BORDER: Color = Color::srgb(0.30, 0.36, 0.44);

/// Accent color - the sky blue
pub const ACCENT_COLOR: Color = Color::srgb(0.529, 0.808, 0.922); // #87CEEB

/// Text colors
pub const TEXT_COLOR: Color = Color::srgb(0.95, 0.95, 0.95);
pub const TEXT_MUTED: Color = Color::srgb(0.65, 0.68, 0.72);

/// Standard button style
pub fn button_style() -> Node {
    Node {
        width: Val::Px(240.0),
        height: Val::Px(50.0),
        justify_content: JustifyContent::Center,
        align_items: AlignItems::Center,
        margin: UiRect::all(Val::Px(8.0)),
        border: UiRect::all(Val::Px(2.0)),
        ..default()
    }
}

/// Standard button text style
pub fn button_text_style() -> TextFont {
    TextFont {
        font_size: 22.0,
        ..default()
    }
}

/// Title text style
pub fn title_text_style() -> TextFont {
    TextFont {
        font_size: 56.0,
        ..default()
    }
}

pub fn body_text_style() -> TextFont {
    TextFont {
        font_size: 18.0,
        ..default()
    }
}

/// Spawn a menu button carrying `action`.
pub fn spawn_button<A: Component>(parent: &mut ChildSpawnerCommands<'_>, text: &str, action: A) {
    parent
        .spawn((
            Button,
            action,
            button_style(),
            BackgroundColor(BUTTON_NORMAL),
            BorderColor::from(BUTTON_BORDER),
            BorderRadius::all(Val::Px(6.0)),
        ))
        .with_children(|btn| {
            btn.spawn((Text::new(text), button_text_style(), TextColor(TEXT_COLOR)));
        });
}

/// Hover/press feedback for every menu button.
pub fn button_interactions(
    mut buttons: Query<
        (&Interaction, &mut BackgroundColor, &mut BorderColor),
        (Changed<Interaction>, With<Button>),
    >,
) {
    for (interaction, mut bg_color, mut border_color) in buttons.iter_mut() {
        match interaction {
            Interaction::Pressed => {
                *bg_color = BackgroundColor(BUTTON_PRESSED);
                *border_color = BorderColor::from(ACCENT_COLOR);
            }
            Interaction::Hovered => {
                *bg_color = BackgroundColor(BUTTON_HOVERED);
                *border_color = BorderColor::from(ACCENT_COLOR);
            }
            Interaction::None => {
                *bg_color = BackgroundColor(BUTTON_NORMAL);
                *border_color = BorderColor::from(BUTTON_BORDER);
            }
        };
    }
}
