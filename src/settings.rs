//! Host settings
//!
//! Read from a JSON file next to the binary. Every field has a default, so a
//! partial file only overrides what it names.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::{RESTART_DELAY, UPDATE_INTERVAL};
use crate::error::Result;

/// How the level generator places blobs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LevelLayout {
    /// Every blob at the field center, at rest, at full radius
    #[default]
    Centered,
    /// Random positions, radii and velocities from the seeded RNG
    Scattered,
}

impl LevelLayout {
    pub fn as_str(&self) -> &'static str {
        match self {
            LevelLayout::Centered => "centered",
            LevelLayout::Scattered => "scattered",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "centered" | "center" => Some(LevelLayout::Centered),
            "scattered" | "random" => Some(LevelLayout::Scattered),
            _ => None,
        }
    }
}

/// Level generation parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelSettings {
    pub blob_count: u32,
    /// Scattered speeds fall in `[-max_speed / 2, 3 * max_speed / 2)`
    pub max_speed: f64,
    pub max_radius: f64,
    pub layout: LevelLayout,
}

impl Default for LevelSettings {
    fn default() -> Self {
        Self {
            blob_count: 1,
            max_speed: 1.0,
            max_radius: 20.0,
            layout: LevelLayout::Centered,
        }
    }
}

/// Host settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Schedule ===
    /// Milliseconds between simulation updates
    pub update_interval_ms: f64,
    /// Subtracted from wall time before stepping; lets a client trail the
    /// server by a fixed amount
    pub skew_ms: f64,
    /// Pause between a victory and the next round
    pub restart_delay_ms: f64,

    // === Rounds ===
    /// Seed for scattered levels
    pub seed: u64,
    /// Rounds to play before the host exits (0 = forever)
    pub rounds: u32,

    pub level: LevelSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            update_interval_ms: UPDATE_INTERVAL,
            skew_ms: 0.0,
            restart_delay_ms: RESTART_DELAY,

            seed: 0,
            rounds: 3,

            level: LevelSettings::default(),
        }
    }
}

impl Settings {
    /// Default settings file name
    pub const DEFAULT_PATH: &'static str = "blob-pong.json";

    /// Strict parse; fails on malformed JSON or wrongly typed fields
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load settings from `path`, falling back to defaults if the file is
    /// missing or unreadable
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match std::fs::read_to_string(path)
            .map_err(crate::Error::from)
            .and_then(|json| Self::from_json(&json))
        {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(e) => {
                log::info!("Using default settings ({}: {})", path.display(), e);
                Self::default()
            }
        }
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        std::fs::write(path.as_ref(), self.to_json()?)?;
        log::info!("Settings saved to {}", path.as_ref().display());
        Ok(())
    }

    /// Round limit as an option (`None` = play forever)
    pub fn round_limit(&self) -> Option<u32> {
        (self.rounds > 0).then_some(self.rounds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let s = Settings::from_json(r#"{"seed": 7, "level": {"layout": "scattered"}}"#).unwrap();
        assert_eq!(s.seed, 7);
        assert_eq!(s.level.layout, LevelLayout::Scattered);
        assert_eq!(s.level.blob_count, 1);
        assert_eq!(s.update_interval_ms, 33.0);
        assert_eq!(s.restart_delay_ms, 1000.0);
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        assert!(matches!(Settings::from_json("{\"seed\": \"x\"}"), Err(Error::Json(_))));
        assert!(Settings::from_json("not json").is_err());
    }

    #[test]
    fn test_load_missing_file_falls_back() {
        let s = Settings::load("/nonexistent/blob-pong-settings.json");
        assert_eq!(s, Settings::default());
    }

    #[test]
    fn test_save_then_load() {
        let path = std::env::temp_dir().join(format!("blob-pong-settings-{}.json", std::process::id()));
        let mut s = Settings::default();
        s.rounds = 0;
        s.level.max_radius = 12.5;
        s.save(&path).unwrap();
        let back = Settings::load(&path);
        std::fs::remove_file(&path).ok();
        assert_eq!(back, s);
        assert_eq!(back.round_limit(), None);
    }

    #[test]
    fn test_layout_names() {
        for layout in [LevelLayout::Centered, LevelLayout::Scattered] {
            assert_eq!(LevelLayout::from_str(layout.as_str()), Some(layout));
        }
        assert_eq!(LevelLayout::from_str("RANDOM"), Some(LevelLayout::Scattered));
        assert_eq!(LevelLayout::from_str("spiral"), None);
    }
}
