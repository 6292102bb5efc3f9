//! Client-side game systems
//!
//! Organized into submodules for maintainability.

mod cursor;
mod player;
mod rendering;
mod world;

// Re-export everything for easy access from main.rs
pub use cursor::*;
pub use player::*;
pub use rendering::*;
pub use world::*;
