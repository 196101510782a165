//! User settings stored as settings.json in the app data directory

use crate::constants::{DEFAULT_ENDPOINT, ENDPOINT_ENV_VAR};
use crate::types::Language;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // Window geometry
    pub window_x: Option<f32>,
    pub window_y: Option<f32>,
    pub window_w: Option<f32>,
    pub window_h: Option<f32>,

    // Caption server
    pub endpoint: String,
    pub request_timeout_secs: Option<u64>,

    // Language preselected on startup
    pub language: Language,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            window_x: None,
            window_y: None,
            window_w: None,
            window_h: None,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            request_timeout_secs: None,
            language: Language::En,
        }
    }
}

impl Settings {
    pub fn load(data_dir: &Path) -> Self {
        let path = data_dir.join("settings.json");
        match std::fs::read_to_string(&path) {
            Ok(s) => match serde_json::from_str(&s) {
                Ok(settings) => {
                    debug!(path = %path.display(), "Settings loaded");
                    settings
                }
                Err(e) => {
                    warn!(error = %e, "Failed to parse settings, using defaults");
                    Self::default()
                }
            },
            Err(_) => {
                debug!("No settings file found, using defaults");
                Self::default()
            }
        }
    }

    pub fn save(&self, data_dir: &Path) {
        let path = data_dir.join("settings.json");
        match serde_json::to_string_pretty(self) {
            Ok(json) => {
                if let Err(e) = std::fs::write(&path, json) {
                    warn!(error = %e, "Failed to save settings");
                }
            }
            Err(e) => warn!(error = %e, "Failed to serialize settings"),
        }
    }

    /// Endpoint to use, honoring the environment override
    pub fn effective_endpoint(&self) -> String {
        Self::endpoint_with_override(&self.endpoint, std::env::var(ENDPOINT_ENV_VAR).ok())
    }

    fn endpoint_with_override(stored: &str, env_value: Option<String>) -> String {
        match env_value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty()) {
            Some(endpoint) => {
                info!(%endpoint, "Using endpoint from {}", ENDPOINT_ENV_VAR);
                endpoint
            }
            None if stored.trim().is_empty() => DEFAULT_ENDPOINT.to_string(),
            None => stored.trim().to_string(),
        }
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::load(dir.path());
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.endpoint, DEFAULT_ENDPOINT);
    }

    #[test]
    fn save_then_load_keeps_values() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings {
            endpoint: "http://10.0.0.5:9000/generate".to_string(),
            request_timeout_secs: Some(90),
            language: Language::Ur,
            window_w: Some(1200.0),
            ..Settings::default()
        };
        settings.save(dir.path());
        assert_eq!(Settings::load(dir.path()), settings);
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("settings.json"), r#"{"language":"es"}"#).unwrap();
        let settings = Settings::load(dir.path());
        assert_eq!(settings.language, Language::Es);
        assert_eq!(settings.endpoint, DEFAULT_ENDPOINT);
    }

    #[test]
    fn corrupt_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("settings.json"), "{ not json").unwrap();
        assert_eq!(Settings::load(dir.path()), Settings::default());
    }

    #[test]
    fn env_value_overrides_stored_endpoint() {
        let stored = "http://127.0.0.1:8000/generate";
        assert_eq!(
            Settings::endpoint_with_override(stored, Some("http://gpu-box:8000/generate".into())),
            "http://gpu-box:8000/generate"
        );
        assert_eq!(Settings::endpoint_with_override(stored, Some("  ".into())), stored);
        assert_eq!(Settings::endpoint_with_override("", None), DEFAULT_ENDPOINT);
    }

    #[test]
    fn zero_timeout_means_none() {
        let mut settings = Settings::default();
        assert_eq!(settings.request_timeout(), None);
        settings.request_timeout_secs = Some(0);
        assert_eq!(settings.request_timeout(), None);
        settings.request_timeout_secs = Some(30);
        assert_eq!(settings.request_timeout(), Some(Duration::from_secs(30)));
    }
}
