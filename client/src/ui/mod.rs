//! UI module

pub mod debug_overlay;
pub mod main_menu;
pub mod pause_menu;
pub mod styles;

pub use debug_overlay::DebugOverlayPlugin;
pub use main_menu::MainMenuPlugin;
pub use pause_menu::PauseMenuPlugin;
