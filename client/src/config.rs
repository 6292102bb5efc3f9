//! Client configuration (`platformer.ron` in the assets folder).
//!
//! Every field has a default, so a missing file or a partial file both work.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use shared::{LevelMode, MovementTuning, PlatformLayout, MOUSE_SENSITIVITY};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Environment variable that overrides the config file location.
pub const CONFIG_ENV_VAR: &str = "PLATFORMER_CONFIG";

/// Config file name inside the assets folder.
pub const CONFIG_FILE_NAME: &str = "platformer.ron";

#[derive(Resource, Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct ClientConfig {
    pub window_title: String,
    pub window_width: u32,
    pub window_height: u32,
    /// Radians of look per pixel of mouse motion
    pub mouse_sensitivity: f32,
    /// Vertical field of view
    pub fov_degrees: f32,
    pub level: LevelMode,
    /// Box layout used by the platform modes (and as fallback for the mesh mode)
    pub layout: PlatformLayout,
    pub tuning: MovementTuning,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            window_title: "Platformer 3D".to_string(),
            window_width: 1280,
            window_height: 720,
            mouse_sensitivity: MOUSE_SENSITIVITY,
            fov_degrees: 75.0,
            level: LevelMode::default(),
            layout: PlatformLayout::default(),
            tuning: MovementTuning::default(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: ron::error::SpannedError,
    },
}

/// Where the active config came from. Logged once the log plugin is up.
#[derive(Resource, Clone, Debug)]
pub enum ConfigOrigin {
    File(PathBuf),
    /// No file at the expected location
    Defaults(PathBuf),
    /// The file exists but could not be used
    Fallback(String),
}

pub fn parse_config(text: &str) -> Result<ClientConfig, ron::error::SpannedError> {
    ron::from_str(text)
}

pub fn load_config_from_file(path: impl AsRef<Path>) -> Result<ClientConfig, ConfigError> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    })?;
    parse_config(&text).map_err(|source| ConfigError::Parse {
        path: path.display().to_string(),
        source,
    })
}

/// Resolve and load the config. Never fails: problems fall back to defaults.
pub fn load_config(asset_dir: &Path) -> (ClientConfig, ConfigOrigin) {
    let path = std::env::var_os(CONFIG_ENV_VAR)
        .map(PathBuf::from)
        .unwrap_or_else(|| asset_dir.join(CONFIG_FILE_NAME));

    if !path.exists() {
        return (ClientConfig::default(), ConfigOrigin::Defaults(path));
    }

    match load_config_from_file(&path) {
        Ok(config) => (config, ConfigOrigin::File(path)),
        Err(e) => (ClientConfig::default(), ConfigOrigin::Fallback(e.to_string())),
    }
}

pub fn log_config_origin(origin: Res<ConfigOrigin>, config: Res<ClientConfig>) {
    match &*origin {
        ConfigOrigin::File(path) => info!("Loaded config from {:?}", path),
        ConfigOrigin::Defaults(path) => info!("No config at {:?}, using defaults", path),
        ConfigOrigin::Fallback(err) => warn!("Ignoring config ({err}); using defaults"),
    }
    info!("Level mode: {}", config.level.label());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_is_default() {
        assert_eq!(parse_config("()").unwrap(), ClientConfig::default());
    }

    #[test]
    fn test_partial_config_keeps_other_defaults() {
        let config = parse_config(
            r#"(
                fov_degrees: 90.0,
                level: PlatformsRaycast,
                tuning: (gravity: 20.0),
            )"#,
        )
        .unwrap();
        assert_eq!(config.fov_degrees, 90.0);
        assert_eq!(config.level, LevelMode::PlatformsRaycast);
        assert_eq!(config.tuning.gravity, 20.0);
        assert_eq!(config.tuning.jump_velocity, MovementTuning::default().jump_velocity);
        assert_eq!(config.window_width, 1280);
    }

    #[test]
    fn test_mesh_level_parses() {
        let config = parse_config(
            r#"(level: Mesh(scene: "models/level.glb#Scene0", collider: "level_collider.bin"))"#,
        )
        .unwrap();
        assert!(matches!(config.level, LevelMode::Mesh { .. }));
    }

    #[test]
    fn test_bad_config_is_parse_error() {
        let dir = std::env::temp_dir().join("platformer_config_test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("broken.ron");
        std::fs::write(&path, "(fov_degrees: \"wide\")").unwrap();
        assert!(matches!(
            load_config_from_file(&path),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn test_shipped_config_parses() {
        let text = include_str!("../assets/platformer.ron");
        parse_config(text).unwrap();
    }
}
