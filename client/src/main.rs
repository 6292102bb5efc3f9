//! Game Client - first-person platformer: window, input, camera, level visuals and menus

mod camera;
mod config;
mod input;
mod states;
mod systems;
mod ui;

use bevy::asset::AssetPlugin;
use bevy::prelude::*;
use bevy::window::WindowResolution;
use shared::{SimulationPlugin, SimulationSet};
use states::GameState;
use std::path::PathBuf;

/// Get the asset path - for bundled macOS apps, use path relative to executable
fn get_asset_path() -> PathBuf {
    // Try to find assets relative to executable (for .app bundles)
    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            let bundled_assets = exe_dir.join("assets");
            if bundled_assets.exists() {
                return bundled_assets;
            }
        }
    }
    // Fall back to default "assets" folder (for development)
    PathBuf::from("assets")
}

fn main() {
    let asset_path = get_asset_path();
    // Read before the App exists so the window can be sized from it; logged at startup
    let (client_config, config_origin) = config::load_config(&asset_path);

    let mut app = App::new();

    app.add_plugins(
        DefaultPlugins
            .set(WindowPlugin {
                primary_window: Some(Window {
                    title: client_config.window_title.clone(),
                    resolution: WindowResolution::new(
                        client_config.window_width,
                        client_config.window_height,
                    ),
                    ..default()
                }),
                ..default()
            })
            .set(AssetPlugin {
                file_path: asset_path.to_string_lossy().to_string(),
                ..default()
            }),
    );

    // Game state machine
    app.init_state::<GameState>();

    app.insert_resource(client_config.tuning.clone());
    app.insert_resource(client_config);
    app.insert_resource(config_origin);
    app.insert_resource(systems::AssetDir(asset_path));
    app.init_resource::<input::InputState>();

    // Movement + ground collision; frozen outside of play
    app.add_plugins(SimulationPlugin);
    app.configure_sets(Update, SimulationSet.run_if(in_state(GameState::Playing)));

    // UI plugins
    app.add_plugins(ui::MainMenuPlugin);
    app.add_plugins(ui::PauseMenuPlugin);
    app.add_plugins(ui::DebugOverlayPlugin);

    // Setup systems (run once at startup)
    app.add_systems(
        Startup,
        (
            config::log_config_origin,
            (systems::spawn_world, systems::setup_rendering, systems::spawn_player).chain(),
        ),
    );

    // Input runs before the simulation, the camera follows after it
    app.add_systems(
        Update,
        (
            input::handle_keyboard_input,
            input::handle_mouse_input,
            input::publish_player_input,
        )
            .chain()
            .before(SimulationSet),
    );
    app.add_systems(
        Update,
        systems::grab_cursor_on_click.run_if(in_state(GameState::Playing)),
    );
    app.add_systems(Update, camera::update_camera.after(SimulationSet));
    app.add_systems(Update, systems::draw_axes);

    app.add_systems(OnEnter(GameState::Playing), systems::lock_cursor);

    app.run();
}
