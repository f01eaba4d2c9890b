use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use smileblink_core::shared::constants::{
    DEFAULT_CAMERA_INDEX, DEFAULT_CASCADE_DIR, DEFAULT_FRAME_INTERVAL,
};
use smileblink_core::shared::detection_mode::DetectionMode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Appearance {
    System,
    Dark,
    Light,
}

impl Appearance {
    pub const ALL: &[Appearance] = &[Appearance::System, Appearance::Dark, Appearance::Light];
}

impl std::fmt::Display for Appearance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Appearance::System => write!(f, "System"),
            Appearance::Dark => write!(f, "Dark"),
            Appearance::Light => write!(f, "Light"),
        }
    }
}

/// User preferences persisted between runs. Missing fields take their defaults
/// so older files keep loading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub camera_index: i32,
    pub cascade_dir: PathBuf,
    pub frame_interval_ms: u64,
    pub last_mode: Option<DetectionMode>,
    pub appearance: Appearance,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            camera_index: DEFAULT_CAMERA_INDEX,
            cascade_dir: PathBuf::from(DEFAULT_CASCADE_DIR),
            frame_interval_ms: DEFAULT_FRAME_INTERVAL.as_millis() as u64,
            last_mode: None,
            appearance: Appearance::System,
        }
    }
}

impl Settings {
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("SmileBlink").join("settings.json"))
    }

    /// Reads settings from `path`, falling back to defaults on any error.
    pub fn load_from(path: &Path) -> Self {
        fs::read_to_string(path)
            .ok()
            .and_then(|json| serde_json::from_str(&json).ok())
            .unwrap_or_default()
    }

    /// Best-effort save; failures are logged.
    pub fn save_to(&self, path: &Path) {
        if let Some(parent) = path.parent() {
            let _ = fs::create_dir_all(parent);
        }
        match serde_json::to_string_pretty(self) {
            Ok(json) => {
                if let Err(e) = fs::write(path, json) {
                    log::warn!("Could not save settings to {}: {e}", path.display());
                }
            }
            Err(e) => log::warn!("Could not serialise settings: {e}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.camera_index, 0);
        assert_eq!(settings.frame_interval_ms, 33);
        assert_eq!(settings.cascade_dir, PathBuf::from("resources/haarcascades"));
        assert_eq!(settings.last_mode, None);
        assert_eq!(settings.appearance, Appearance::System);
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.json");
        let settings = Settings {
            camera_index: 2,
            frame_interval_ms: 50,
            last_mode: Some(DetectionMode::EyesInFace),
            appearance: Appearance::Dark,
            ..Settings::default()
        };
        settings.save_to(&path);

        assert_eq!(Settings::load_from(&path), settings);
    }

    #[test]
    fn test_mode_written_in_kebab_case() {
        let settings = Settings {
            last_mode: Some(DetectionMode::FaceAndSmile),
            ..Settings::default()
        };
        let json = serde_json::to_string(&settings).unwrap();
        assert!(json.contains("\"face-and-smile\""));
        assert!(json.contains("\"system\""));
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let settings: Settings = serde_json::from_str(r#"{"camera_index": 1}"#).unwrap();
        assert_eq!(settings.camera_index, 1);
        assert_eq!(settings.frame_interval_ms, 33);
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::load_from(&dir.path().join("absent.json"));
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_corrupt_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "{ not json").unwrap();
        assert_eq!(Settings::load_from(&path), Settings::default());
    }
}
