//! Game settings and preferences
//!
//! Persisted separately from the leaderboard as a small JSON file.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::persistence::{PersistenceError, load_json, save_json};

/// Name recorded when the player never entered one
pub const DEFAULT_PLAYER_NAME: &str = "Unknown";

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Name shown on the leaderboard
    pub player_name: String,

    // === Debug ===
    /// Stats overlay (pool sizes, grid cells, progress)
    pub debug_overlay: bool,
    /// Draw collision circles and grid cells
    pub collision_debug: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            player_name: DEFAULT_PLAYER_NAME.to_string(),
            debug_overlay: false,
            collision_debug: false,
        }
    }
}

impl Settings {
    /// Accept a trimmed, non-empty name. Anything else leaves the current
    /// name in place and returns false.
    pub fn set_player_name(&mut self, name: &str) -> bool {
        let name = name.trim();
        if name.is_empty() {
            return false;
        }
        self.player_name = name.to_string();
        true
    }

    pub fn toggle_debug_overlay(&mut self) -> bool {
        self.debug_overlay = !self.debug_overlay;
        self.debug_overlay
    }

    pub fn toggle_collision_debug(&mut self) -> bool {
        self.collision_debug = !self.collision_debug;
        self.collision_debug
    }

    /// Load settings from `path`, using defaults when missing or unreadable
    pub fn load(path: &Path) -> Self {
        match load_json::<Settings>(path) {
            Ok(Some(mut settings)) => {
                if settings.player_name.trim().is_empty() {
                    settings.player_name = DEFAULT_PLAYER_NAME.to_string();
                }
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Ok(None) => {
                log::info!("Using default settings");
                Self::default()
            }
            Err(e) => {
                log::warn!("Ignoring settings at {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    pub fn save(&self, path: &Path) -> Result<(), PersistenceError> {
        save_json(path, self)?;
        log::info!("Settings saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_name() {
        assert_eq!(Settings::default().player_name, "Unknown");
    }

    #[test]
    fn test_set_player_name_trims() {
        let mut settings = Settings::default();
        assert!(settings.set_player_name("  Ada  "));
        assert_eq!(settings.player_name, "Ada");

        assert!(!settings.set_player_name("   "));
        assert_eq!(settings.player_name, "Ada");
    }

    #[test]
    fn test_toggles() {
        let mut settings = Settings::default();
        assert!(settings.toggle_debug_overlay());
        assert!(!settings.toggle_debug_overlay());
        assert!(settings.toggle_collision_debug());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");

        let mut settings = Settings::default();
        settings.set_player_name("Grace");
        settings.debug_overlay = true;
        settings.save(&path).unwrap();

        assert_eq!(Settings::load(&path), settings);
    }

    #[test]
    fn test_bad_file_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "[]").unwrap();
        assert_eq!(Settings::load(&path), Settings::default());

        std::fs::write(&path, r#"{"player_name": "  "}"#).unwrap();
        assert_eq!(Settings::load(&path).player_name, "Unknown");
        assert_eq!(Settings::load(&dir.path().join("missing.json")), Settings::default());
    }
}
