//! Game state machine

use bevy::prelude::*;

/// Main game states
#[derive(States, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GameState {
    /// Instructions overlay, cursor free
    #[default]
    MainMenu,
    /// Cursor locked, simulation running
    Playing,
    /// Escape pressed: cursor released, simulation frozen
    Paused,
}
