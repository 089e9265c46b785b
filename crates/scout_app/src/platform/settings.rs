//! Optional RON settings file. Missing or unreadable files fall back to the
//! defaults; the run never fails because of it.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use engine_logging::{engine_info, engine_warn};
use scout_engine::{FetchSettings, DEFAULT_MAX_DEPTH, DEFAULT_MAX_ITEMS};
use serde::{Deserialize, Serialize};

const SETTINGS_FILENAME: &str = ".scout.ron";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct Settings {
    pub download_dir: PathBuf,
    pub max_items: usize,
    pub max_depth: usize,
    /// Per request.
    pub timeout_secs: u64,
    pub retries: u32,
}

impl Default for Settings {
    fn default() -> Self {
        let fetch = FetchSettings::default();
        Self {
            download_dir: PathBuf::from("downloads"),
            max_items: DEFAULT_MAX_ITEMS,
            max_depth: DEFAULT_MAX_DEPTH,
            timeout_secs: fetch.request_timeout.as_secs(),
            retries: fetch.max_retries,
        }
    }
}

impl Settings {
    pub fn fetch_settings(&self) -> FetchSettings {
        self.apply_to(FetchSettings::default())
    }

    pub fn download_settings(&self) -> FetchSettings {
        self.apply_to(FetchSettings::for_downloads())
    }

    fn apply_to(&self, base: FetchSettings) -> FetchSettings {
        FetchSettings {
            request_timeout: Duration::from_secs(self.timeout_secs.max(1)),
            max_retries: self.retries,
            ..base
        }
    }
}

pub(crate) fn default_settings_path() -> PathBuf {
    PathBuf::from(".").join(SETTINGS_FILENAME)
}

pub(crate) fn load_settings(path: &Path) -> Settings {
    let content = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return Settings::default();
        }
        Err(err) => {
            engine_warn!("Failed to read settings from {:?}: {}", path, err);
            return Settings::default();
        }
    };

    match ron::from_str(&content) {
        Ok(settings) => {
            engine_info!("Loaded settings from {:?}", path);
            settings
        }
        Err(err) => {
            engine_warn!("Failed to parse settings from {:?}: {}", path, err);
            Settings::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn missing_file_gives_defaults() {
        let temp = TempDir::new().unwrap();
        let settings = load_settings(&temp.path().join(SETTINGS_FILENAME));
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.max_items, 1000);
        assert_eq!(settings.max_depth, 5);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(SETTINGS_FILENAME);
        fs::write(&path, "(max_items: 50, download_dir: \"/tmp/media\")").unwrap();

        let settings = load_settings(&path);

        assert_eq!(settings.max_items, 50);
        assert_eq!(settings.download_dir, PathBuf::from("/tmp/media"));
        assert_eq!(settings.max_depth, DEFAULT_MAX_DEPTH);
        assert_eq!(settings.retries, 3);
    }

    #[test]
    fn broken_file_falls_back_to_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(SETTINGS_FILENAME);
        fs::write(&path, "(max_items: \"lots\"").unwrap();

        assert_eq!(load_settings(&path), Settings::default());
    }

    #[test]
    fn fetch_settings_take_timeout_and_retries() {
        let settings = Settings {
            timeout_secs: 0,
            retries: 1,
            ..Settings::default()
        };
        let fetch = settings.fetch_settings();
        assert_eq!(fetch.request_timeout, Duration::from_secs(1));
        assert_eq!(fetch.max_retries, 1);
        assert_eq!(fetch.max_bytes, FetchSettings::default().max_bytes);
        assert!(settings.download_settings().max_bytes > fetch.max_bytes);
    }
}
